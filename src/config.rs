use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// The distinguished administrator identity. Accounts registered with
    /// this email are persisted with the admin role, and role resolution
    /// falls back to comparing against it when no role is stored.
    pub admin_email: String,
    pub relay: RelaySettings,
    pub receipt_dir: PathBuf,
}

/// Mail-relay identifiers. Placeholder values (empty or `YOUR_…`) mean the
/// relay is not configured and receipts fall back to local files.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub url: String,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let relay = RelaySettings {
            url: env::var("RELAY_URL")
                .unwrap_or_else(|_| "https://api.emailjs.com/api/v1.0/email/send".to_string()),
            service_id: env::var("RELAY_SERVICE_ID").ok(),
            template_id: env::var("RELAY_TEMPLATE_ID").ok(),
            public_key: env::var("RELAY_PUBLIC_KEY").ok(),
        };
        let receipt_dir = env::var("RECEIPT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("receipts"));
        Ok(Self {
            database_url,
            host,
            port,
            admin_email,
            relay,
            receipt_dir,
        })
    }
}
