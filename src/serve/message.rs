//! Live-reload message protocol.
//!
//! JSON messages pushed from the preview server to browser clients. The
//! channel is server-to-client only and carries exactly one meaningful
//! event: "regenerate/refetch now".

use serde::Serialize;

/// Message sent over the reload WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload.
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Connection established.
    Connected {
        /// Server version, logged client-side.
        version: String,
    },
}

impl ReloadMessage {
    pub fn reload() -> Self {
        Self::Reload { reason: None }
    }

    pub fn reload_with_reason(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_serialization() {
        let json = ReloadMessage::reload().to_json();
        assert_eq!(json, r#"{"type":"reload"}"#);

        let json = ReloadMessage::reload_with_reason("document changed").to_json();
        assert!(json.contains(r#""type":"reload""#));
        assert!(json.contains(r#""reason":"document changed""#));
    }

    #[test]
    fn test_connected_carries_version() {
        let json = ReloadMessage::connected().to_json();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }
}
