mod test_reconnect_rejoins;
