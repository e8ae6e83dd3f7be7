//! Commands that only build requests: no network.

use anyhow::Context;

use lastfm_api::config::Config;
use lastfm_api::endpoint::CallKind;
use lastfm_api::{Args, Endpoint, FormatRules, InferredRules, Params, request, sign};

/// Print the signature for explicit parameters
pub fn cmd_sign(config: &Config, pairs: &[(String, String)]) -> anyhow::Result<()> {
    if config.credentials.secret.is_empty() {
        anyhow::bail!("Shared secret required: use --secret or set LASTFM_SECRET");
    }

    let params: Params = pairs.iter().cloned().collect();
    println!("{}", sign(&params, &config.credentials.secret));
    Ok(())
}

/// Print the GET URL for `method`
pub fn cmd_url(config: &Config, method: &str, args: &Args) -> anyhow::Result<()> {
    let inferred = InferredRules::from_args(args);
    let indexing = inferred.indexing();
    let normal = inferred.normal();

    let rules = match Endpoint::lookup(method) {
        Some(known) => known.rules,
        None => FormatRules::new(&indexing, &normal),
    };
    let endpoint = Endpoint::new(method, CallKind::Get, rules);

    let request = request::build(&config.api, &endpoint, &config.credentials, args)
        .with_context(|| format!("Failed to build request for {method}"))?;
    println!("{}", request.url);
    Ok(())
}
