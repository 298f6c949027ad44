//! eBay OAuth command line host
//!
//! Loads a TOML config, builds the clients explicitly, and runs one library
//! operation per invocation:
//!
//! ```text
//! ebay-cli [--config <path>] consent-url [--state S] [--locale L] [--prompt-login]
//! ebay-cli [--config <path>] exchange <code>
//! ebay-cli [--config <path>] refresh <refresh_token> [--scopes S]
//! ebay-cli [--config <path>] app-token [--scopes S]
//! ebay-cli [--config <path>] search <query> [--limit N]
//! ```

mod config;

use anyhow::{Context, Result, bail};
use ebay_oauth::constants::DEFAULT_SEARCH_LIMIT;
use ebay_oauth::{AppClient, OAuthClient, generate_state};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// One parsed invocation
#[derive(Debug, PartialEq, Eq)]
enum Command {
    ConsentUrl {
        state: Option<String>,
        locale: Option<String>,
        prompt_login: bool,
    },
    Exchange {
        code: String,
    },
    Refresh {
        refresh_token: String,
        scopes: Option<String>,
    },
    AppToken {
        scopes: Option<String>,
    },
    Search {
        query: String,
        limit: u32,
    },
}

/// Parsed command line: optional `--config` path plus the command.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    config_path: Option<String>,
    command: Command,
}

/// Value following `flag`, if the flag is present.
fn flag_value(args: &[String], flag: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => match args.get(i + 1) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.clone())),
            _ => bail!("{flag} requires a value"),
        },
        None => Ok(None),
    }
}

/// First argument after the command name that is neither a flag nor a flag's value.
fn positional(args: &[String], value_flags: &[&str]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if value_flags.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let config_path = flag_value(args, "--config")?;

    // Drop `--config <path>` so the remaining args start at the command
    let mut rest: Vec<String> = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            iter.next();
        } else {
            rest.push(arg.clone());
        }
    }

    let Some((name, tail)) = rest.split_first() else {
        bail!("missing command (consent-url, exchange, refresh, app-token, search)");
    };

    let command = match name.as_str() {
        "consent-url" => Command::ConsentUrl {
            state: flag_value(tail, "--state")?,
            locale: flag_value(tail, "--locale")?,
            prompt_login: tail.iter().any(|a| a == "--prompt-login"),
        },
        "exchange" => Command::Exchange {
            code: positional(tail, &[]).context("exchange requires an authorization code")?,
        },
        "refresh" => Command::Refresh {
            refresh_token: positional(tail, &["--scopes"])
                .context("refresh requires a refresh token")?,
            scopes: flag_value(tail, "--scopes")?,
        },
        "app-token" => Command::AppToken {
            scopes: flag_value(tail, "--scopes")?,
        },
        "search" => Command::Search {
            query: positional(tail, &["--limit"]).context("search requires a query")?,
            limit: match flag_value(tail, "--limit")? {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("--limit must be a positive integer, got: {raw}"))?,
                None => DEFAULT_SEARCH_LIMIT,
            },
        },
        other => bail!("unknown command: {other}"),
    };

    Ok(Invocation {
        config_path,
        command,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for command output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    let config_path = Config::resolve_path(invocation.config_path.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let options = config.ebay.options;

    info!(
        environment = ?options.environment,
        api_origin = %options.api_origin(),
        "configuration loaded"
    );

    let http = reqwest::Client::new();

    match invocation.command {
        Command::ConsentUrl {
            state,
            locale,
            prompt_login,
        } => {
            let client = OAuthClient::with_http_client(options, http)?;
            let state = state.unwrap_or_else(generate_state);
            info!(state = %state, "built consent state");
            let url = client.consent_url(Some(&state), prompt_login, locale.as_deref())?;
            println!("{url}");
        }
        Command::Exchange { code } => {
            let client = OAuthClient::with_http_client(options, http)?;
            let tokens = client
                .exchange_code_for_tokens(&code)
                .await
                .context("authorization code exchange failed")?;
            print_json(&tokens)?;
        }
        Command::Refresh {
            refresh_token,
            scopes,
        } => {
            let client = OAuthClient::with_http_client(options, http)?;
            let tokens = client
                .refresh_access_token(&refresh_token, scopes.as_deref())
                .await
                .context("token refresh failed")?;
            print_json(&tokens)?;
        }
        Command::AppToken { scopes } => {
            let client = AppClient::with_http_client(options, http)?;
            let token = client
                .get_application_token(scopes.as_deref())
                .await
                .context("application token request failed")?;
            print_json(&token)?;
        }
        Command::Search { query, limit } => {
            let client = AppClient::with_http_client(options, http)?;
            if !client
                .initialize()
                .await
                .context("application token request failed")?
            {
                bail!("token endpoint returned an empty application token");
            }
            let body = client.search(&query, limit).await.context("search failed")?;
            println!("{body}");
        }
    }

    Ok(())
}
