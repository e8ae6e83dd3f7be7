//! Request construction.
//!
//! Three shapes, selected by [`CallKind`]:
//!
//! | kind            | verb | target            | auth fields                   |
//! |-----------------|------|-------------------|-------------------------------|
//! | `Get`           | GET  | plain base URL    | `api_key`                     |
//! | `Signed`        | POST | secure base URL   | `api_key`, `api_sig`          |
//! | `SignedSession` | POST | secure base URL   | `api_key`, `sk`, `api_sig`    |
//!
//! POST targets also carry `method` in the query string, and every URL gets
//! `format=json` when JSON rendering is configured. On POST, `format` and
//! `callback` arguments travel on the query string too: the service leaves
//! them out when it recomputes `api_sig`, so they stay out of the signed body.

use crate::args::{Args, Params, normalize};
use crate::config::ApiConfig;
use crate::credentials::Credentials;
use crate::endpoint::{CallKind, Endpoint};
use crate::error::Result;
use crate::signature::{SIGNATURE_PARAM, sign};

/// Arguments the service does not sign.
const UNSIGNED_PARAMS: &[&str] = &["format", "callback"];

/// HTTP verb of a built request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully built request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    /// Target URL including the encoded query string
    pub url: String,
    /// Form body for POST requests
    pub form: Option<Params>,
}

/// Encode `params` as `application/x-www-form-urlencoded`, keys in order.
pub fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `base?query`, adding the `format` switch when configured.
fn construct_url(config: &ApiConfig, base: &str, mut query: Params) -> String {
    if let Some(format) = config.format.query_value() {
        query.insert("format".to_string(), format.to_string());
    }
    format!("{}?{}", base, encode_query(&query))
}

/// Build the request for `endpoint`.
///
/// Session calls check the session key before anything else, so a missing
/// key never costs a normalization pass or a network round trip.
pub fn build(
    config: &ApiConfig,
    endpoint: &Endpoint<'_>,
    creds: &Credentials,
    args: &Args,
) -> Result<Request> {
    let session_key = match endpoint.kind {
        CallKind::SignedSession => Some(creds.require_session()?),
        CallKind::Get | CallKind::Signed => None,
    };

    let params = normalize(args, &endpoint.rules)?;

    match endpoint.kind {
        CallKind::Get => Ok(build_get(config, endpoint.method, creds, params)),
        CallKind::Signed | CallKind::SignedSession => Ok(build_post(
            config,
            endpoint.method,
            creds,
            session_key,
            params,
        )),
    }
}

/// Unsigned GET: `method`, `api_key` and the normalized arguments in the query.
pub fn build_get(config: &ApiConfig, method: &str, creds: &Credentials, mut params: Params) -> Request {
    params.insert("method".to_string(), method.to_string());
    params.insert("api_key".to_string(), creds.api_key.clone());

    Request {
        method: HttpMethod::Get,
        url: construct_url(config, &config.api_base, params),
        form: None,
    }
}

/// Signed POST. `sk` is included (and signed) only when `session_key` is given.
pub fn build_post(
    config: &ApiConfig,
    method: &str,
    creds: &Credentials,
    session_key: Option<&str>,
    mut params: Params,
) -> Request {
    params.remove(SIGNATURE_PARAM);
    let mut query: Params = UNSIGNED_PARAMS
        .iter()
        .filter_map(|name| params.remove_entry(*name))
        .collect();
    query.insert("method".to_string(), method.to_string());

    params.insert("method".to_string(), method.to_string());
    params.insert("api_key".to_string(), creds.api_key.clone());
    if let Some(sk) = session_key {
        params.insert("sk".to_string(), sk.to_string());
    }

    let signature = sign(&params, &creds.secret);
    params.insert(SIGNATURE_PARAM.to_string(), signature);

    Request {
        method: HttpMethod::Post,
        url: construct_url(config, &config.secure_api_base, query),
        form: Some(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FormatRules;
    use crate::config::ResponseFormat;
    use crate::endpoint::{AUTH_GET_SESSION, TRACK_LOVE};
    use crate::error::Error;

    fn creds() -> Credentials {
        Credentials::new("KEY", "SECRET")
    }

    fn config() -> ApiConfig {
        ApiConfig::with_base_url("http://api.test/2.0/")
    }

    #[test]
    fn test_get_query() {
        let endpoint = Endpoint::new("artist.getInfo", CallKind::Get, FormatRules::normal(&["artist"]));
        let args = Args::new().with("artist", "Sigur Rós");
        let req = build(&config(), &endpoint, &creds(), &args).unwrap();

        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.form.is_none());
        assert_eq!(
            req.url,
            "http://api.test/2.0/?api_key=KEY&artist=Sigur%20R%C3%B3s&method=artist.getInfo"
        );
        assert!(!req.url.contains("api_sig"));
    }

    #[test]
    fn test_get_with_json_format() {
        let config = config().format(ResponseFormat::Json);
        let req = build_get(&config, "auth.getToken", &creds(), Params::new());
        assert!(req.url.contains("format=json"));
    }

    #[test]
    fn test_indexed_keys_are_encoded() {
        let endpoint = Endpoint::new("track.scrobble", CallKind::Get, FormatRules::new(&["artist"], &[]));
        let args = Args::new().with("artist", vec!["A", "B"]);
        let req = build(&config(), &endpoint, &creds(), &args).unwrap();
        assert!(req.url.contains("artist%5B0%5D=A&artist%5B1%5D=B"));
    }

    #[test]
    fn test_session_post_requires_session_key() {
        let args = Args::new().with("artist", "A").with("track", "T");
        let err = build(&config(), &TRACK_LOVE, &creds(), &args).unwrap_err();
        assert!(matches!(err, Error::AuthRequired));
    }

    #[test]
    fn test_session_post_body() {
        let creds = creds().with_session_key("SK");
        let args = Args::new().with("artist", "A").with("track", "T");
        let req = build(&config(), &TRACK_LOVE, &creds, &args).unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://api.test/2.0/?method=track.love");

        let form = req.form.unwrap();
        assert_eq!(form["method"], "track.love");
        assert_eq!(form["api_key"], "KEY");
        assert_eq!(form["sk"], "SK");
        assert_eq!(form["artist"], "A");

        let expected = format!(
            "{:x}",
            md5::compute(b"api_keyKEYartistAmethodtrack.loveskSKtrackTSECRET")
        );
        assert_eq!(form["api_sig"], expected);
    }

    #[test]
    fn test_sessionless_post_omits_sk() {
        let creds = creds().with_session_key("SK");
        let args = Args::new().with("token", "TOK");
        let req = build(&config(), &AUTH_GET_SESSION, &creds, &args).unwrap();

        let form = req.form.unwrap();
        assert!(!form.contains_key("sk"));
        let expected = format!(
            "{:x}",
            md5::compute(b"api_keyKEYmethodauth.getSessiontokenTOKSECRET")
        );
        assert_eq!(form["api_sig"], expected);
    }

    #[test]
    fn test_post_json_format_goes_on_url_only() {
        let config = config().format(ResponseFormat::Json);
        let req = build_post(&config, "track.love", &creds(), Some("SK"), Params::new());
        assert_eq!(req.url, "http://api.test/2.0/?format=json&method=track.love");
        assert!(!req.form.unwrap().contains_key("format"));
    }

    #[test]
    fn test_post_moves_unsigned_args_to_url() {
        let endpoint = Endpoint::new(
            "track.love",
            CallKind::Signed,
            FormatRules::normal(&["artist", "callback", "format", "api_sig"]),
        );
        let args = Args::new()
            .with("artist", "A")
            .with("callback", "cb")
            .with("format", "json")
            .with("api_sig", "stale");
        let req = build(&config(), &endpoint, &creds(), &args).unwrap();

        assert_eq!(
            req.url,
            "http://api.test/2.0/?callback=cb&format=json&method=track.love"
        );
        let mut form = req.form.unwrap();
        assert!(!form.contains_key("callback"));
        assert!(!form.contains_key("format"));

        let sig = form.remove("api_sig").unwrap();
        assert_ne!(sig, "stale");
        assert_eq!(sig, sign(&form, "SECRET"));
        assert_eq!(
            sig,
            format!("{:x}", md5::compute(b"api_keyKEYartistAmethodtrack.loveSECRET"))
        );
    }
}
