//! HTTP transport boundary.
//!
//! The pipeline only needs two operations: GET a URL and POST a form. The
//! [`Transport`] trait keeps the real HTTP client out of the rest of the
//! crate, so tests can substitute a stub that records what was sent.

use async_trait::async_trait;

use crate::args::Params;
use crate::error::Result;

/// Raw response: status plus the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one request and reads the whole response body.
///
/// Implementations must not retry; errors go straight back to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post_form(&self, url: &str, form: &Params) -> Result<HttpResponse>;
}

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with gzip enabled and our User-Agent.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http_client })
    }

    /// Wrap an already configured client (custom timeouts, proxies).
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.http_client.get(url).send().await?;
        Self::read(response).await
    }

    async fn post_form(&self, url: &str, form: &Params) -> Result<HttpResponse> {
        let response = self.http_client.post(url).form(form).send().await?;
        Self::read(response).await
    }
}

/// Stub transport for tests.
#[cfg(test)]
pub mod mocks {
    use std::sync::Mutex;

    use super::*;

    /// One recorded request.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Get(String),
        Post(String, Params),
    }

    /// Returns a canned response and records every request it receives.
    pub struct RecordingTransport {
        response: HttpResponse,
        sent: Mutex<Vec<Sent>>,
    }

    impl RecordingTransport {
        pub fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                },
                sent: Mutex::new(Vec::new()),
            }
        }

        /// A transport that answers every call with `<lfm status="ok"/>`.
        pub fn ok() -> Self {
            Self::new(200, r#"<lfm status="ok"></lfm>"#)
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.sent.lock().unwrap().push(Sent::Get(url.to_string()));
            Ok(self.response.clone())
        }

        async fn post_form(&self, url: &str, form: &Params) -> Result<HttpResponse> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Post(url.to_string(), form.clone()));
            Ok(self.response.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_recording_transport() {
            let transport = RecordingTransport::ok();
            let response = transport.get("http://x/?a=1").await.unwrap();
            assert!(response.is_success());
            assert_eq!(transport.sent(), vec![Sent::Get("http://x/?a=1".into())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("lastfm-api/"));
    }

    #[test]
    fn test_is_success() {
        let ok = HttpResponse { status: 200, body: vec![] };
        let bad = HttpResponse { status: 400, body: vec![] };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
