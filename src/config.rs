use secrecy::SecretString;

use crate::error::ConfigError;

/// Sample value shipped in `.env.example`; treated the same as an unset user.
pub const PLACEHOLDER_SMTP_USER: &str = "your-email@gmail.com";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_BOOKING_URL: &str = "https://calendly.com/your-link";
const DEFAULT_SITE_URL: &str = "https://workwithmida.com";
const DEFAULT_PUBLIC_EMAIL: &str = "hello@workwithmida.com";

/// Process-wide settings, read once at startup.
#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` when SMTP credentials are missing or still the placeholder.
    pub relay: Option<RelayConfig>,
    /// `None` when no model API key is set.
    pub model: Option<ModelConfig>,
    pub site: SiteConfig,
}

#[derive(Debug)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Where internal notifications are delivered.
    pub operator_address: String,
}

#[derive(Debug)]
pub struct ModelConfig {
    pub api_key: SecretString,
    pub model: String,
    pub api_base: String,
}

/// Public-facing details used by the page and the confirmation email.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub booking_url: String,
    pub site_url: String,
    pub public_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_port("PORT", get("PORT"), DEFAULT_PORT)?;

        let relay = match get("SMTP_USER") {
            Some(username) if username != PLACEHOLDER_SMTP_USER => Some(RelayConfig {
                host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_port("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                password: SecretString::from(get("SMTP_PASSWORD").unwrap_or_default()),
                operator_address: get("CONTACT_EMAIL").unwrap_or_else(|| username.clone()),
                username,
            }),
            _ => None,
        };

        let model = get("GEMINI_API_KEY").map(|key| ModelConfig {
            api_key: SecretString::from(key),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_base: get("GEMINI_API_BASE")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        });

        let site = SiteConfig {
            booking_url: get("CALENDLY_URL").unwrap_or_else(|| DEFAULT_BOOKING_URL.to_string()),
            site_url: get("SITE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            public_email: get("PUBLIC_EMAIL").unwrap_or_else(|| DEFAULT_PUBLIC_EMAIL.to_string()),
        };

        Ok(Self {
            host,
            port,
            relay,
            model,
            site,
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            booking_url: DEFAULT_BOOKING_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            public_email: DEFAULT_PUBLIC_EMAIL.to_string(),
        }
    }
}

fn parse_port(key: &str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?} is not a valid port: {e}"),
        }),
    }
}
