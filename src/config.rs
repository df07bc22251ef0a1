//! Application configuration read from the environment.
//!
//! Every value has a default good enough for a local run, so `cargo run` works
//! with an empty environment. Secrets (`CSRF_PASS`, `CSRF_SALT`,
//! `GAME_SERVER_API_KEY`, `LOGFIRE_TOKEN`) must never be logged.

use anyhow::Context;
use chrono_tz::Tz;
use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Public host, also used as cookie domain
    #[envconfig(default = "localhost")]
    pub web_server_host: String,

    /// Port for web server binding
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, prod only
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, prod only
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// SENSITIVE: CSRF protection password (UUID format). Random key when unset
    pub csrf_pass: Option<String>,

    /// SENSITIVE: CSRF protection salt (UUID format)
    pub csrf_salt: Option<String>,

    /// Timezone the card expiry is compared in
    #[envconfig(default = "Asia/Seoul")]
    pub shop_timezone: String,

    /// External payment endpoint. The in-process endpoint is used when unset
    pub payment_endpoint_url: Option<String>,

    /// Game server base url. Credit grants are simulated when unset
    pub game_server_url: Option<String>,

    /// SENSITIVE: value of the `X-API-KEY` header sent to the game server
    #[envconfig(default = "")]
    pub game_server_api_key: String,

    /// SENSITIVE: Logfire write token
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Gets the server URL host with port for non-production environments
    pub fn url_host(&self) -> String {
        if self.is_prod() {
            return self.web_server_host.to_string();
        }

        format!(
            "{host}:{port}",
            host = self.web_server_host,
            port = self.web_server_port
        )
    }

    /// Gets the appropriate protocol (HTTP/HTTPS) based on environment
    pub fn web_server_protocol(&self) -> String {
        if self.is_prod() {
            return "https".into();
        }
        "http".into()
    }

    /// Constructs the complete base URL for the application
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.web_server_protocol(), self.url_host())
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.shop_timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid SHOP_TIMEZONE {}", self.shop_timezone))
    }
}
