use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Environment-driven settings. Missing upstream URLs do not prevent
/// startup; they surface through `/health` instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the pricing engine serving forecast resources.
    pub pricing_api_url: String,
    /// Base URL of the booking service receiving accepted selections.
    pub booking_api_url: String,
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .unwrap_or(DEFAULT_PORT);

        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            pricing_api_url: env::var("PRICING_API_URL").unwrap_or_default(),
            booking_api_url: env::var("BOOKING_API_URL").unwrap_or_default(),
            upstream_timeout_secs,
        }
    }
}
