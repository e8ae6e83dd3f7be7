//! Desktop auth handshake: token, user authorization, session.

use tokio::runtime::Runtime;

use lastfm_api::config::{self, ApiConfig, Config, ResponseFormat};
use lastfm_api::dto::{Session, Token};
use lastfm_api::endpoint::{AUTH_GET_SESSION, AUTH_GET_TOKEN};
use lastfm_api::{ApiErrorKind, Args, Error, LastFmClient};

/// The handshake payload types are XML-shaped, whatever the config says.
fn handshake_client(api: &ApiConfig) -> anyhow::Result<LastFmClient> {
    let api = ApiConfig {
        format: ResponseFormat::Xml,
        ..api.clone()
    };
    Ok(LastFmClient::new(api)?)
}

fn require_keys(config: &Config) -> anyhow::Result<()> {
    let creds = &config.credentials;
    if creds.api_key.is_empty() || creds.secret.is_empty() {
        anyhow::bail!(
            "API key and shared secret required.\n\
             Get them at: https://www.last.fm/api/account/create\n\
             Then use --api-key/--secret or set LASTFM_API_KEY/LASTFM_SECRET"
        );
    }
    Ok(())
}

/// Fetch a request token and show where to authorize it
pub fn cmd_token(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    require_keys(config)?;
    let client = handshake_client(&config.api)?;

    let token: Token = rt.block_on(client.call(&AUTH_GET_TOKEN, &config.credentials, &Args::new()))?;

    println!("Token: {}", token.value);
    println!();
    println!("Authorize it in your browser:");
    println!("  {}", token.authorization_url(&config.credentials.api_key));
    println!();
    println!("Then run: session {}", token.value);
    Ok(())
}

/// Exchange an authorized token for a session key
pub fn cmd_session(rt: &Runtime, mut config: Config, token: &str, save: bool) -> anyhow::Result<()> {
    require_keys(&config)?;
    let client = handshake_client(&config.api)?;
    let args = Args::new().with("token", token);

    let result: Result<Session, Error> =
        rt.block_on(client.call(&AUTH_GET_SESSION, &config.credentials, &args));

    let session = match result {
        Ok(session) => session,
        Err(Error::Api(e)) if e.kind() == ApiErrorKind::UnauthorizedToken => {
            println!("✗ Token not authorized yet. Open the authorization URL first.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("✓ Session for {}", session.name);
    println!("  Key: {}", session.key);

    if save {
        config.credentials.set_session_key(session.key);
        config::save(&config)?;
        println!("✓ Saved to {:?}", config::config_path().unwrap_or_default());
    }
    Ok(())
}
