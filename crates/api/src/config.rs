use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Razorpay signing secrets.
    pub razorpay: RazorpayConfig,
}

/// Razorpay secrets used for signature verification.
///
/// Only verification happens server-side; order creation and capture are
/// gateway concerns.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Key secret -- signs checkout callbacks (`order_id|payment_id`).
    pub key_secret: String,
    /// Webhook secret -- signs webhook delivery bodies.
    pub webhook_secret: String,
}

impl RazorpayConfig {
    /// Load Razorpay secrets from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `RAZORPAY_KEY_SECRET` or `RAZORPAY_WEBHOOK_SECRET` is unset.
    pub fn from_env() -> Self {
        let key_secret =
            std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET must be set");
        let webhook_secret =
            std::env::var("RAZORPAY_WEBHOOK_SECRET").expect("RAZORPAY_WEBHOOK_SECRET must be set");
        Self {
            key_secret,
            webhook_secret,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `JWT_SECRET`              | required                   |
    /// | `RAZORPAY_KEY_SECRET`     | required                   |
    /// | `RAZORPAY_WEBHOOK_SECRET` | required                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            razorpay: RazorpayConfig::from_env(),
        }
    }
}
