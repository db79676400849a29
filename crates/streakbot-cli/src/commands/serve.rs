use streakbot_core::{Config, Database, WebhookServer};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    tracing::info!(
        db = %config.database_path.display(),
        port = config.port,
        "starting streakbot"
    );
    let db = Database::open(&config.database_path)?;
    let server = WebhookServer::new(config, db);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run())?;
    Ok(())
}
