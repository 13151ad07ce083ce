use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use plaza_client::{
    DEFAULT_ROOM_NAME, HeadlessPipeline, LocalIdentity, LoopbackHub, PeerHandle, Session,
    SessionConfig, SessionHandle, SessionSnapshot,
};
use plaza_core::{AvatarCode, AvatarVariant};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "plaza")]
#[command(about = "Avatar presence sync over an in-process room")]
struct Cli {
    /// Used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join several peers to one room and print what each of them sees.
    Simulate {
        #[arg(long, default_value_t = 3)]
        peers: usize,

        /// How many of the last peers use a custom avatar.
        #[arg(long, default_value_t = 0)]
        custom: usize,

        #[arg(long, default_value = DEFAULT_ROOM_NAME)]
        room: String,

        #[arg(long, default_value_t = 500)]
        settle_ms: u64,

        /// Make the first peer start walking.
        #[arg(long)]
        walk: bool,

        /// Make the last peer leave before printing.
        #[arg(long)]
        leave_last: bool,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Simulate {
            peers,
            custom,
            room,
            settle_ms,
            walk,
            leave_last,
            json,
        } => {
            simulate(SimulateArgs {
                peers,
                custom,
                room,
                settle: Duration::from_millis(settle_ms),
                walk,
                leave_last,
                json,
            })
            .await
        }
    }
}

struct SimulateArgs {
    peers: usize,
    custom: usize,
    room: String,
    settle: Duration,
    walk: bool,
    leave_last: bool,
    json: bool,
}

async fn simulate(args: SimulateArgs) -> Result<()> {
    if args.peers == 0 {
        bail!("Need at least one peer");
    }
    if args.custom > args.peers {
        bail!("--custom ({}) exceeds --peers ({})", args.custom, args.peers);
    }

    let hub = LoopbackHub::new();
    let mut handles = Vec::with_capacity(args.peers);

    for index in 0..args.peers {
        let identity = if index >= args.peers - args.custom {
            LocalIdentity::custom()
        } else {
            LocalIdentity::generated(AvatarCode::generate())
        };
        let identity = identity.with_image_index(index as u32);

        let config = SessionConfig::new(identity)
            .with_room_name(args.room.clone())
            .with_announce_settle(args.settle);
        let (transport, events) = hub.transport();
        let (handle, _task) =
            Session::spawn(transport, Arc::new(HeadlessPipeline::new()), events, config);

        wait_until_joined(&handle)
            .await
            .with_context(|| format!("Peer #{index} did not join"))?;
        info!("Peer #{} is in room {}", index, args.room);
        handles.push(handle);
    }

    if args.walk {
        handles[0].set_walking(true).await?;
    }
    if args.leave_last && args.peers > 1 {
        if let Some(last) = handles.last() {
            last.leave().await?;
        }
    }

    // Catch-ups and live state are in flight; give them the settle window.
    sleep(args.settle * 2).await;

    let mut snapshots = Vec::with_capacity(handles.len());
    for handle in &handles {
        snapshots.push(handle.snapshot().await?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
    } else {
        for (index, snapshot) in snapshots.iter().enumerate() {
            print_snapshot(index, snapshot);
        }
    }

    Ok(())
}

async fn wait_until_joined(handle: &SessionHandle) -> Result<()> {
    let deadline = Instant::now() + JOIN_TIMEOUT;
    loop {
        if handle.snapshot().await?.room.is_some() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("Timeout waiting for room join");
        }
        sleep(Duration::from_millis(10)).await;
    }
}

fn print_snapshot(index: usize, snapshot: &SessionSnapshot) {
    let title = format!("Peer #{index}");
    match (&snapshot.room, snapshot.phase) {
        (Some(room), Some(phase)) => {
            println!("{} in {} ({:?})", title.bold(), room.cyan(), phase)
        }
        _ => {
            println!("{} {}", title.bold(), "not in a room".dimmed());
            return;
        }
    }

    for handle in &snapshot.directory.peers {
        println!("   {}", describe(handle));
    }
}

fn describe(handle: &PeerHandle) -> String {
    let id = handle.peer_id().to_string();
    let marker = if handle.is_local() { "*" } else { " " };
    let variant = match handle.variant() {
        AvatarVariant::Generated => "generated".green(),
        AvatarVariant::Custom => "custom".blue(),
        AvatarVariant::Uninitialized => "pending".yellow(),
    };
    let code = handle
        .avatar_code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let walking = if handle.is_walking() {
        "walking".magenta()
    } else {
        "idle".normal()
    };

    format!("{marker} {:.8}  {:<10} {:<36} {}", id, variant, code, walking)
}
