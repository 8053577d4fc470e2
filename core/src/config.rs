use core::time::Duration;
use sapper_protocol::{GameSize, PROTOCOL_VSN};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Socket mount point, either a path on the serving host or a full `ws(s)://` url.
    pub socket_url: String,
    pub topic: String,
    pub request_timeout_ms: u32,
    pub heartbeat_interval_ms: u32,
    pub default_size: GameSize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_url: "/socket".to_string(),
            topic: "minesweeper:lobby".to_string(),
            request_timeout_ms: 10_000,
            heartbeat_interval_ms: 30_000,
            default_size: GameSize::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.into())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms.into())
    }

    /// Full websocket url for a page served from `host`, e.g.
    /// `/socket` on `example.com` over https becomes
    /// `wss://example.com/socket/websocket?vsn=2.0.0`.
    pub fn websocket_endpoint(&self, host: &str, secure: bool) -> String {
        let base = self.socket_url.trim_end_matches('/');
        let base = if base.starts_with("ws://") || base.starts_with("wss://") {
            base.to_string()
        } else {
            let scheme = if secure { "wss" } else { "ws" };
            let path = base.trim_start_matches('/');
            format!("{}://{}/{}", scheme, host, path)
        };
        format!("{}/websocket?vsn={}", base, PROTOCOL_VSN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_lobby_setup() {
        let config = ClientConfig::default();
        assert_eq!(config.topic, "minesweeper:lobby");
        assert_eq!(config.default_size, GameSize::Large);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"topic": "minesweeper:dev", "default_size": "small"}"#)
                .unwrap();
        assert_eq!(config.topic, "minesweeper:dev");
        assert_eq!(config.default_size, GameSize::Small);
        assert_eq!(config.socket_url, "/socket");
    }

    #[test]
    fn relative_socket_path_uses_page_host() {
        let config = ClientConfig::default();
        assert_eq!(
            config.websocket_endpoint("localhost:4000", false),
            "ws://localhost:4000/socket/websocket?vsn=2.0.0"
        );
        assert_eq!(
            config.websocket_endpoint("example.com", true),
            "wss://example.com/socket/websocket?vsn=2.0.0"
        );
    }

    #[test]
    fn absolute_socket_url_is_kept() {
        let config = ClientConfig {
            socket_url: "wss://games.example.com/socket/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.websocket_endpoint("ignored", false),
            "wss://games.example.com/socket/websocket?vsn=2.0.0"
        );
    }
}
