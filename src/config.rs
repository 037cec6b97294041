use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    /// Bearer token attached to every store request, when present.
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let store = StoreConfig {
            base_url: std::env::var("BILLS_API_URL")?,
            token: std::env::var("BILLS_API_TOKEN").ok(),
            timeout_seconds: std::env::var("BILLS_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        Ok(Self { store })
    }
}
