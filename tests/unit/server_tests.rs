// Server module unit tests

use utsushi::config::Config;
use utsushi::server::{ServerArgs, UtsushiServer};

#[test]
fn test_can_import_pingora_dependencies() {
    use pingora::server::configuration::ServerConf;
    use pingora_core::upstreams::peer::HttpPeer;

    let server_conf_type = std::any::type_name::<ServerConf>();
    let peer_type = std::any::type_name::<HttpPeer>();

    assert!(server_conf_type.contains("ServerConf"));
    assert!(peer_type.contains("HttpPeer"));
}

#[test]
fn test_server_uses_configured_address() {
    let mut config = Config::default();
    config.server.address = "127.0.0.1".to_string();
    config.server.port = 18080;

    let server = UtsushiServer::from_config(&config, ServerArgs::default());
    assert_eq!(server.listen_addr(), "127.0.0.1:18080");
    assert!(!server.server_opt().test);
}
