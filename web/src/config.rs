use std::net::{AddrParseError, SocketAddr};

use availability::blocked::DEFAULT_UPCOMING_WINDOW_DAYS;
use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_SITE_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SITE_ADDR `{value}` is not a socket address")]
    InvalidSiteAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("BOOKING_TIMEZONE `{0}` is not an IANA time zone")]
    InvalidTimeZone(String),
    #[error("UPCOMING_WINDOW_DAYS `{0}` is not a whole number of days")]
    InvalidWindow(String),
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub site_addr: SocketAddr,
    /// Zone the business's slot labels are read in.
    pub time_zone: Tz,
    pub upcoming_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            time_zone: Tz::UTC,
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site_addr = lookup("SITE_ADDR").unwrap_or_else(|| DEFAULT_SITE_ADDR.to_string());
        let site_addr: SocketAddr = site_addr
            .parse()
            .map_err(|source| ConfigError::InvalidSiteAddr {
                value: site_addr.clone(),
                source,
            })?;

        let time_zone = match lookup("BOOKING_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimeZone(name.clone()))?,
            None => Tz::UTC,
        };

        let upcoming_window_days = match lookup("UPCOMING_WINDOW_DAYS") {
            Some(days) => days
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidWindow(days.clone()))?,
            None => DEFAULT_UPCOMING_WINDOW_DAYS,
        };

        Ok(Self {
            site_addr,
            time_zone,
            upcoming_window_days,
        })
    }
}
