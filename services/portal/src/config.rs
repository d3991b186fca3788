use serde::Deserialize;

use portal_core::config::Config;

/// Portal service configuration, loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct PortalConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session JWTs. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Cookie domain attribute (e.g. "portal.example.com").
    pub cookie_domain: String,
    /// Public origin used to build reset links (e.g. "https://portal.example.com").
    pub public_base_url: String,
    /// Mail delivery API endpoint.
    pub mail_api_url: String,
    /// Bearer key for the mail delivery API.
    pub mail_api_key: String,
    /// `From` address on outgoing mail.
    pub mail_sender: String,
    /// TCP port to listen on (default 3110). Env var: `PORTAL_PORT`.
    #[serde(default = "default_port")]
    pub portal_port: u16,
}

fn default_port() -> u16 {
    3110
}

impl Config for PortalConfig {}
