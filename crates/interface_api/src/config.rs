//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Every key can be overridden through an `API_`-prefixed environment
/// variable, e.g. `API_PORT=9090` or `API_JWT_SECRET=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// JWT secret for authentication
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,
    /// Issuer written into and required from every token
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Database URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Page size used when a listing request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub bootstrap_user_name: Option<String>,
    #[serde(default)]
    pub bootstrap_user_email: Option<String>,
    #[serde(default)]
    pub bootstrap_user_password: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_jwt_expiration_secs() -> u64 {
    3600
}

fn default_jwt_issuer() -> String {
    "payment-api-auth".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost/payment".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_page_size() -> u32 {
    core_kernel::DEFAULT_PAGE_SIZE
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: default_jwt_secret(),
            jwt_expiration_secs: default_jwt_expiration_secs(),
            jwt_issuer: default_jwt_issuer(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            default_page_size: default_page_size(),
            max_upload_bytes: default_max_upload_bytes(),
            bootstrap_user_name: None,
            bootstrap_user_email: None,
            bootstrap_user_password: None,
        }
    }
}

/// Credentials of the user created at start-up
#[derive(Debug, Clone)]
pub struct BootstrapUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// The start-up user, when both an email and a password are configured
    pub fn bootstrap_user(&self) -> Option<BootstrapUser> {
        let email = self.bootstrap_user_email.as_deref()?.trim();
        let password = self.bootstrap_user_password.as_deref()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }

        Some(BootstrapUser {
            name: self
                .bootstrap_user_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Admin".to_string()),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.jwt_issuer, "payment-api-auth");
        assert_eq!(config.default_page_size, 10);
        assert!(!config.json_logs());
        assert!(config.bootstrap_user().is_none());
    }

    #[test]
    fn test_bootstrap_user_requires_email_and_password() {
        let mut config = ApiConfig {
            bootstrap_user_email: Some("admin@bmstech.com.br".to_string()),
            ..ApiConfig::default()
        };
        assert!(config.bootstrap_user().is_none());

        config.bootstrap_user_password = Some("123456".to_string());
        let user = config.bootstrap_user().unwrap();
        assert_eq!(user.name, "Admin");
        assert_eq!(user.email, "admin@bmstech.com.br");
    }
}
