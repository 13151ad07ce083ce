mod test_late_joiner_catches_up;
mod test_single_peer_announces;
