use super::*;

#[test]
fn client_config_maps_scheme_to_mode() {
    let cli = Cli::try_parse_from(["counter-cli", "--api-type", "wss", "--host", "example.test", "--port", "9000", "watch"])
        .expect("args should parse");
    let config = cli.client_config().expect("config");
    assert_eq!(config.mode, TransportMode::Streaming);
    assert!(config.tls);
    assert_eq!(config.endpoint(), "wss://example.test:9000");
    assert_eq!(config.request_timeout, None);
}

#[test]
fn client_config_carries_timeout() {
    let cli = Cli::try_parse_from(["counter-cli", "--api-type", "http", "--timeout-secs", "3", "increment", "--count", "2"])
        .expect("args should parse");
    let config = cli.client_config().expect("config");
    assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
    assert!(matches!(cli.command, Command::Increment { count: 2 }));
}

#[test]
fn client_config_rejects_unknown_scheme() {
    let cli = Cli::try_parse_from(["counter-cli", "--api-type", "ftp", "hello"]).expect("args should parse");
    assert!(cli.client_config().is_err());
}
