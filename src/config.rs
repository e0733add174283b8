use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://filmcatalog.db?mode=rwc".to_string());
        if !database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must be a sqlite:// url, got `{database_url}`");
        }

        let log_filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "info,filmcatalog=debug,sqlx=warn".to_string());
        tracing_subscriber::EnvFilter::try_new(&log_filter).context("RUST_LOG")?;

        Ok(Self { database_url, log_filter })
    }
}
