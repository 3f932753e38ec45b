//! Dbx Auth - obtain a Dropbox access token from the console

use clap::Parser;
use dbx_auth::{authorize_interactively, WebAuthNoRedirect, DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dbx-auth")]
#[command(about = "Obtain a Dropbox access token via the no-redirect OAuth2 flow")]
#[command(version)]
struct Args {
    /// App key from the Dropbox app console
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    app_key: String,

    /// App secret from the Dropbox app console
    #[arg(long, env = "API_SECRET", hide_env_values = true)]
    app_secret: String,

    /// Locale for the authorization page
    #[arg(long, env = "DBX_LOCALE")]
    locale: Option<String>,

    /// Enable debug logging
    #[arg(short, long, env = "DBX_DEBUG")]
    debug: bool,

    #[arg(long, hide = true, default_value = DEFAULT_AUTHORIZE_URL)]
    authorize_url: String,

    #[arg(long, hide = true, default_value = DEFAULT_TOKEN_URL)]
    token_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr; stdout carries the prompt and the token
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("dbx_auth={}", log_level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut auth = WebAuthNoRedirect::with_endpoints(
        args.app_key,
        args.app_secret,
        &args.authorize_url,
        &args.token_url,
    )?;
    if let Some(locale) = args.locale {
        auth = auth.with_locale(locale);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let token = authorize_interactively(&auth, &mut stdin.lock(), &mut stdout).await?;

    println!("The access token is: {}", token);

    Ok(())
}
