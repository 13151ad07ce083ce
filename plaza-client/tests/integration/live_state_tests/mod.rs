mod test_refresh_reaches_late_joiner;
