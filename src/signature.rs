//! Request signing (`api_sig`).
//!
//! The service recomputes the signature server-side, so the algorithm is
//! fixed: sort parameters by key, concatenate `key + value` pairs, append
//! the shared secret, MD5, lowercase hex.

use crate::args::Params;

/// Name of the signature parameter itself.
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Compute `api_sig` for `params` with the shared `secret`.
///
/// Every entry of `params` is signed. Callers keep `api_sig` and anything
/// the service does not sign out of the map (see [`crate::request`]).
/// `Params` iterates in byte-wise ascending key order, so insertion order
/// never affects the result.
pub fn sign(params: &Params, secret: &str) -> String {
    let mut plain = String::new();
    for (key, value) in params {
        plain.push_str(key);
        plain.push_str(value);
    }
    plain.push_str(secret);

    format!("{:x}", md5::compute(plain.as_bytes()))
}
