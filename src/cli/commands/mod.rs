//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `offline`: signing and URL construction, no network
//! - `call`: raw API calls
//! - `auth`: the token / session handshake

mod auth;
mod call;
mod offline;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use lastfm_api::config::{self, Config};
use lastfm_api::{Args, Credentials};

pub use auth::{cmd_session, cmd_token};
pub use call::cmd_get;
pub use offline::{cmd_sign, cmd_url};

/// Last.fm API command-line client
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key (overrides the config file)
    #[arg(long, global = true, env = "LASTFM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Shared secret (overrides the config file)
    #[arg(long, global = true, env = "LASTFM_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Session key (overrides the config file)
    #[arg(long, global = true, env = "LASTFM_SESSION_KEY", hide_env_values = true)]
    pub session_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the api_sig for a set of parameters
    Sign {
        /// Parameters as key=value
        #[arg(required = true, value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
    /// Print the unsigned GET URL for a method call
    Url {
        /// API method, e.g. artist.getInfo
        method: String,
        /// Arguments as key=value; repeat a key to pass a list
        #[arg(value_parser = parse_pair)]
        args: Vec<(String, String)>,
    },
    /// Call a method and print the raw response payload
    Get {
        /// API method, e.g. artist.getInfo
        method: String,
        /// Arguments as key=value; repeat a key to pass a list
        #[arg(value_parser = parse_pair)]
        args: Vec<(String, String)>,
    },
    /// Request an auth token and print the authorization URL
    Token,
    /// Exchange an authorized token for a session key
    Session {
        /// Token from the `token` command, after the user authorized it
        token: String,
        /// Store the session key in the config file
        #[arg(long)]
        save: bool,
    },
}

/// Parse a `key=value` argument.
fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Collect `key=value` pairs into an argument bag.
fn collect_args(pairs: &[(String, String)]) -> Args {
    let mut args = Args::new();
    for (key, value) in pairs {
        args.push(key.as_str(), value.as_str());
    }
    args
}

/// Config file values, with command-line credentials layered on top.
fn resolve(cli: &Cli) -> Config {
    let mut config = config::load();
    let creds: &mut Credentials = &mut config.credentials;
    if let Some(key) = &cli.api_key {
        creds.api_key = key.clone();
    }
    if let Some(secret) = &cli.secret {
        creds.secret = secret.clone();
    }
    if let Some(sk) = &cli.session_key {
        creds.session_key = sk.clone();
    }
    config
}

/// Run the selected command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve(cli);

    match &cli.command {
        Commands::Sign { params } => cmd_sign(&config, params),
        Commands::Url { method, args } => cmd_url(&config, method, &collect_args(args)),
        Commands::Get { method, args } => {
            let rt = Runtime::new()?;
            cmd_get(&rt, &config, method, &collect_args(args))
        }
        Commands::Token => {
            let rt = Runtime::new()?;
            cmd_token(&rt, &config)
        }
        Commands::Session { token, save } => {
            let rt = Runtime::new()?;
            cmd_session(&rt, config, token, *save)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("artist=Cher").unwrap(),
            ("artist".to_string(), "Cher".to_string())
        );
        assert_eq!(
            parse_pair("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_collect_args_repeats_become_lists() {
        let pairs = vec![
            ("tags".to_string(), "a".to_string()),
            ("tags".to_string(), "b".to_string()),
            ("artist".to_string(), "Cher".to_string()),
        ];
        let args = collect_args(&pairs);
        assert_eq!(
            args.get("tags"),
            Some(&lastfm_api::ArgValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            args.get("artist"),
            Some(&lastfm_api::ArgValue::Str("Cher".into()))
        );
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["lastfm-api", "sign", "method=auth.getSession", "token=t"])
            .unwrap();
        match cli.command {
            Commands::Sign { params } => assert_eq!(params.len(), 2),
            _ => panic!("expected sign"),
        }
    }
}
