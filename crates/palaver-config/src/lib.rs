//! Server configuration, loaded from `palaver.toml` overlaid with
//! `PALAVER_`-prefixed environment variables.

use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::IpAddr;
use thiserror::Error;

pub mod logging;

pub use self::logging::Logging;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "defaults::ip")]
    pub ip: IpAddr,
    #[serde(default = "defaults::port")]
    pub port: u16,
    pub database: Database,
    pub auth: Auth,
    #[serde(default)]
    pub events: Events,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// HS256 secret the identity service signs bearer tokens with.
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct Events {
    /// Service tag stamped on every emitted envelope.
    #[serde(default = "defaults::service")]
    pub service: String,
    /// Bounded wait for broker acknowledgment before an event is dropped.
    #[serde(default = "defaults::ack_timeout_ms")]
    pub ack_timeout_ms: u64,
}

impl Default for Events {
    fn default() -> Self {
        Self {
            service: defaults::service(),
            ack_timeout_ms: defaults::ack_timeout_ms(),
        }
    }
}

mod defaults {
    use std::net::{IpAddr, Ipv4Addr};

    pub fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    pub fn port() -> u16 {
        3002
    }

    pub fn max_connections() -> u32 {
        8
    }

    pub fn service() -> String {
        "palaver-posts".to_string()
    }

    pub fn ack_timeout_ms() -> u64 {
        2000
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "palaver.toml";

    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();
        Self::figment()
            .extract::<Self>()
            .map_err(|error| Report::new(error).change_context(ParseError))
    }

    pub(crate) fn figment() -> figment::Figment {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // The env provider splits on `_` which clashes with snake_case
            // field names, so multi-word keys are mapped by hand.
            .merge(Env::prefixed("PALAVER_").map(|key| match key.as_str() {
                "DATABASE_URL" => "database.url".into(),
                "DATABASE_MAX_CONNECTIONS" => "database.max_connections".into(),
                "AUTH_JWT_SECRET" => "auth.jwt_secret".into(),
                "EVENTS_SERVICE" => "events.service".into(),
                "EVENTS_ACK_TIMEOUT_MS" => "events.ack_timeout_ms".into(),
                "LOGGING_FILTER" => "logging.filter".into(),
                "LOGGING_JSON" => "logging.json".into(),
                _ => key.as_str().replace('_', ".").into(),
            }))
    }

    /// Fixed configuration for the test suite; nothing external is read.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            ip: defaults::ip(),
            port: 0,
            database: Database {
                url: "postgres://localhost/palaver_test".to_string(),
                max_connections: 1,
            },
            auth: Auth {
                jwt_secret: "palaver-test-secret-key-000000000".to_string(),
            },
            events: Events::default(),
            logging: Logging::default(),
        }
    }
}
