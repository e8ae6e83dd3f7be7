//! Client: normalize, sign, send, decode.
//!
//! [`LastFmClient`] owns read-only configuration and a [`Transport`]. It
//! holds no other state, so one client can serve concurrent calls; the
//! caller-owned [`Credentials`] are borrowed per call.
//!
//! # Example
//!
//! ```ignore
//! use lastfm_api::{Args, Credentials, LastFmClient, endpoint};
//!
//! let client = LastFmClient::new(ApiConfig::default())?;
//! let creds = Credentials::new(api_key, secret).with_session_key(sk);
//!
//! let args = Args::new()
//!     .with("artist", vec!["Cher", "Björk"])
//!     .with("track", vec!["Believe", "Hyperballad"])
//!     .with("timestamp", vec!["1700000000", "1700000300"]);
//! client.call_unit(&endpoint::TRACK_SCROBBLE, &creds, &args).await?;
//! ```

use serde::de::DeserializeOwned;

use crate::args::{Args, FormatRules};
use crate::config::ApiConfig;
use crate::credentials::Credentials;
use crate::endpoint::{CallKind, Endpoint};
use crate::error::{Error, Result};
use crate::request::{self, HttpMethod, Request};
use crate::response;
use crate::transport::{HttpResponse, ReqwestTransport, Transport};

/// Last.fm API client
pub struct LastFmClient<T = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
}

impl LastFmClient<ReqwestTransport> {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> LastFmClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the request for a call without sending it.
    pub fn prepare(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
    ) -> Result<Request> {
        request::build(&self.config, endpoint, creds, args)
    }

    /// Call `endpoint` and decode the success payload as `R`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
    ) -> Result<R> {
        let reply = self.execute(endpoint, creds, args).await?;
        self.decode_with(&reply, |body| response::decode(self.config.format, body))
    }

    /// Call `endpoint`, populating `dest` on success.
    ///
    /// With `dest == None` only the status is checked. `dest` is untouched
    /// on any error.
    pub async fn call_into<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
        dest: Option<&mut R>,
    ) -> Result<()> {
        let reply = self.execute(endpoint, creds, args).await?;
        self.decode_with(&reply, |body| {
            response::parse_response(self.config.format, body, dest)
        })
    }

    /// Call `endpoint` for its side effect; the payload is ignored.
    pub async fn call_unit(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
    ) -> Result<()> {
        let reply = self.execute(endpoint, creds, args).await?;
        self.decode_with(&reply, |body| response::check(self.config.format, body))
    }

    /// Call `endpoint` and return the success payload as text.
    pub async fn call_raw(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
    ) -> Result<String> {
        let reply = self.execute(endpoint, creds, args).await?;
        self.decode_with(&reply, |body| {
            response::decode_raw(self.config.format, body)
        })
    }

    /// Unsigned GET, with explicit `method` and rules.
    pub async fn call_get<R: DeserializeOwned>(
        &self,
        method: &str,
        creds: &Credentials,
        args: &Args,
        rules: FormatRules<'_>,
    ) -> Result<R> {
        self.call(&Endpoint::new(method, CallKind::Get, rules), creds, args)
            .await
    }

    /// Signed POST carrying the session key.
    pub async fn call_post<R: DeserializeOwned>(
        &self,
        method: &str,
        creds: &Credentials,
        args: &Args,
        rules: FormatRules<'_>,
    ) -> Result<R> {
        self.call(&Endpoint::new(method, CallKind::SignedSession, rules), creds, args)
            .await
    }

    /// Signed POST without a session key.
    pub async fn call_post_without_session<R: DeserializeOwned>(
        &self,
        method: &str,
        creds: &Credentials,
        args: &Args,
        rules: FormatRules<'_>,
    ) -> Result<R> {
        self.call(&Endpoint::new(method, CallKind::Signed, rules), creds, args)
            .await
    }

    async fn execute(
        &self,
        endpoint: &Endpoint<'_>,
        creds: &Credentials,
        args: &Args,
    ) -> Result<HttpResponse> {
        let request = self.prepare(endpoint, creds, args)?;

        match request.method {
            HttpMethod::Get => {
                tracing::debug!(method = endpoint.method, "GET {}", self.config.api_base);
                self.transport.get(&request.url).await
            }
            HttpMethod::Post => {
                let form = request.form.unwrap_or_default();
                tracing::debug!(
                    method = endpoint.method,
                    params = form.len(),
                    "POST {}",
                    self.config.secure_api_base
                );
                self.transport.post_form(&request.url, &form).await
            }
        }
    }

    /// Run `decode` on the body. The service sends error envelopes with 4xx
    /// statuses, so the body is always tried first; only an unreadable body
    /// on a non-success status becomes [`Error::Http`].
    fn decode_with<V>(
        &self,
        reply: &HttpResponse,
        decode: impl FnOnce(&[u8]) -> Result<V>,
    ) -> Result<V> {
        match decode(&reply.body) {
            Err(Error::Format(reason)) if !reply.is_success() => {
                tracing::debug!(status = reply.status, %reason, "Unreadable error response");
                Err(Error::http(reply.status, &reply.body))
            }
            other => other,
        }
    }
}
