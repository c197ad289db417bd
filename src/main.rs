use optic::OpticError;
use optic::config::fetch_config;
use optic::credentials;
use optic::session::Session;

#[tokio::main]
async fn main() -> Result<(), OpticError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    credentials::populate_env_from_keychain();
    let config = fetch_config()?;

    let session = Session::login(config).await?;
    session.subscribe_market("EURUSD", 60).await?;

    tokio::signal::ctrl_c().await.ok();
    session.shutdown().await;

    Ok(())
}
