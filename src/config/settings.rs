//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MEDIA_API_URL,
    DEFAULT_MEDIA_FOLDER, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SHIPPING_DEFAULT_RATE, DEFAULT_SHIPPING_LOCAL_RATE, DEFAULT_SHIPPING_LOCAL_REGION,
    MIN_JWT_SECRET_LENGTH,
};
use crate::domain::{OrderPolicy, ShippingRates};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub media: MediaConfig,
    pub shipping: ShippingRates,
    pub orders: OrderPolicy,
}

/// Media host connection settings
#[derive(Clone)]
pub struct MediaConfig {
    pub api_url: String,
    api_key: String,
    pub folder: String,
}

impl MediaConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            folder: folder.into(),
        }
    }

    /// API key sent as a bearer token to the media host.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("media", &self.media)
            .field("shipping", &self.shipping)
            .field("orders", &self.orders)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let shipping = ShippingRates::new(
            env::var("SHIPPING_LOCAL_REGION")
                .unwrap_or_else(|_| DEFAULT_SHIPPING_LOCAL_REGION.to_string()),
            parse_var("SHIPPING_LOCAL_RATE")
                .unwrap_or_else(|| Decimal::from(DEFAULT_SHIPPING_LOCAL_RATE)),
            parse_var("SHIPPING_DEFAULT_RATE")
                .unwrap_or_else(|| Decimal::from(DEFAULT_SHIPPING_DEFAULT_RATE)),
        );

        let orders = OrderPolicy {
            verify_totals: parse_var("ORDER_VERIFY_TOTALS").unwrap_or(false),
            clear_cart_on_checkout: parse_var("ORDER_CLEAR_CART_ON_CHECKOUT").unwrap_or(false),
            strict_transitions: parse_var("ORDER_STRICT_TRANSITIONS").unwrap_or(false),
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            media: MediaConfig::new(
                env::var("MEDIA_API_URL").unwrap_or_else(|_| DEFAULT_MEDIA_API_URL.to_string()),
                env::var("MEDIA_API_KEY").unwrap_or_default(),
                env::var("MEDIA_FOLDER").unwrap_or_else(|_| DEFAULT_MEDIA_FOLDER.to_string()),
            ),
            shipping,
            orders,
        }
    }

    /// Defaults with a fixed secret, independent of the environment.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-that-is-32-chars-long".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            media: MediaConfig::new(DEFAULT_MEDIA_API_URL, "test-key", DEFAULT_MEDIA_FOLDER),
            shipping: ShippingRates::default(),
            orders: OrderPolicy::default(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read and parse an optional environment variable, ignoring malformed values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, "Ignoring malformed setting");
                None
            }
        },
        Err(_) => None,
    }
}
