//! Raw API calls.

use tokio::runtime::Runtime;

use lastfm_api::config::Config;
use lastfm_api::endpoint::CallKind;
use lastfm_api::{Args, Endpoint, Error, FormatRules, InferredRules, LastFmClient};

/// Call `method` and print the payload.
///
/// Catalogued methods keep their declared call kind and rules; anything
/// else is sent as a plain GET with rules inferred from the arguments.
pub fn cmd_get(rt: &Runtime, config: &Config, method: &str, args: &Args) -> anyhow::Result<()> {
    if config.credentials.api_key.is_empty() {
        anyhow::bail!("API key required: use --api-key or set LASTFM_API_KEY");
    }

    let inferred = InferredRules::from_args(args);
    let indexing = inferred.indexing();
    let normal = inferred.normal();
    let endpoint = match Endpoint::lookup(method) {
        Some(known) => *known,
        None => Endpoint::new(method, CallKind::Get, FormatRules::new(&indexing, &normal)),
    };

    let client = LastFmClient::new(config.api.clone())?;

    rt.block_on(async {
        match client.call_raw(&endpoint, &config.credentials, args).await {
            Ok(payload) => {
                println!("{}", payload);
                Ok(())
            }
            Err(Error::Api(e)) => {
                eprintln!("✗ {} ({})", e.message, e.kind());
                if e.is_retryable() {
                    eprintln!("  The service reported a temporary failure; try again later.");
                }
                std::process::exit(1);
            }
            Err(Error::AuthRequired) => {
                eprintln!("✗ {} needs a session key.", method);
                eprintln!("  Run `token`, authorize it, then `session <token> --save`.");
                std::process::exit(1);
            }
            Err(e) => Err(anyhow::Error::from(e)),
        }
    })
}
