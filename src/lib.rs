//! Client library for the Last.fm web service (API 2.0).
//!
//! The crate is a request pipeline:
//!
//! ```text
//! Args + FormatRules ──normalize──▶ Params ──sign──▶ Request ──Transport──▶ body ──decode──▶ R
//! ```
//!
//! - [`args`]: argument bags and their wire encoding (indexed vs. comma-joined)
//! - [`signature`]: `api_sig` computation
//! - [`request`]: GET / signed POST construction
//! - [`transport`]: HTTP boundary (`reqwest` in production)
//! - [`response`]: `lfm` envelope decoding into caller types or [`ApiError`]
//! - [`client`]: [`LastFmClient`], which runs the whole pipeline
//!
//! Configuration is explicit ([`ApiConfig`]); credentials are owned by the
//! caller and borrowed per call. There is no caching, retrying or rate
//! limiting.

pub mod args;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dto;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod response;
pub mod signature;
pub mod transport;

pub use args::{ArgValue, Args, FormatRules, InferredRules, MAX_LIST_ITEMS, Params, normalize};
pub use client::LastFmClient;
pub use config::{ApiConfig, ResponseFormat};
pub use credentials::Credentials;
pub use endpoint::{CallKind, Endpoint};
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use request::{HttpMethod, Request};
pub use response::parse_response;
pub use signature::sign;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
