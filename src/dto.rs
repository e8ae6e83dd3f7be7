//! Payload types for the auth handshake.
//!
//! These match the XML the service returns inside the `lfm` envelope.
//! Endpoint-specific payloads beyond the handshake are up to the caller:
//! any `serde::Deserialize` type works with [`crate::LastFmClient::call`].

use serde::Deserialize;

/// Base URL of the page where a user authorizes a request token.
pub const AUTH_PAGE: &str = "http://www.last.fm/api/auth/";

/// `auth.getToken` payload: `<token>cf45fe5a3e3cebe168480a086d7fe481</token>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    #[serde(rename = "$text")]
    pub value: String,
}

impl Token {
    /// URL the user must visit to authorize this token for `api_key`.
    pub fn authorization_url(&self, api_key: &str) -> String {
        format!(
            "{}?api_key={}&token={}",
            AUTH_PAGE,
            urlencoding::encode(api_key),
            urlencoding::encode(&self.value)
        )
    }
}

/// `auth.getSession` / `auth.getMobileSession` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    /// Username the session belongs to
    pub name: String,
    /// Session key, to be stored in [`crate::Credentials::session_key`]
    pub key: String,
    #[serde(default)]
    pub subscriber: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseFormat;
    use crate::response::decode;

    #[test]
    fn test_token_payload() {
        let body = br#"<lfm status="ok"><token>cf45fe5a3e3cebe168480a086d7fe481</token></lfm>"#;
        let token: Token = decode(ResponseFormat::Xml, body).unwrap();
        assert_eq!(token.value, "cf45fe5a3e3cebe168480a086d7fe481");
    }

    #[test]
    fn test_authorization_url() {
        let token = Token {
            value: "tok".to_string(),
        };
        assert_eq!(
            token.authorization_url("key"),
            "http://www.last.fm/api/auth/?api_key=key&token=tok"
        );
    }

    #[test]
    fn test_session_payload() {
        let body = br#"<lfm status="ok">
  <session>
    <name>MyLastFMUsername</name>
    <key>d580d57f32848f5dcf574d1ce18d78b2</key>
    <subscriber>1</subscriber>
  </session>
</lfm>"#;
        let session: Session = decode(ResponseFormat::Xml, body).unwrap();
        assert_eq!(session.name, "MyLastFMUsername");
        assert_eq!(session.key, "d580d57f32848f5dcf574d1ce18d78b2");
        assert_eq!(session.subscriber, 1);
    }
}
