use arogya_api::setup;
use arogya_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, services, routes, background sweepers)
    let app = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, app.router, app.background_tasks).await?;

    Ok(())
}
