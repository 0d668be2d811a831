use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub eager_program_lookup: bool,
    /// Inbound requests per second for the HTTP service. Unset means no limiter.
    pub rate_limit_per_second: Option<NonZeroU32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            eager_program_lookup: true,
            rate_limit_per_second: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let rate_limit_per_second = match get("HOLDERS_RATE_LIMIT_PER_SECOND") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) => NonZeroU32::new(n),
                Err(_) => {
                    warn!("Invalid HOLDERS_RATE_LIMIT_PER_SECOND {:?}, using default", raw);
                    defaults.rate_limit_per_second
                }
            },
            None => defaults.rate_limit_per_second,
        };

        Self {
            rpc_url: get("SOLANA_RPC_URL").unwrap_or(defaults.rpc_url),
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), defaults.bind_addr),
            port: parse_or("PORT", get("PORT"), defaults.port),
            eager_program_lookup: match get("HOLDERS_EAGER_PROGRAM_LOOKUP") {
                Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                    warn!("Invalid HOLDERS_EAGER_PROGRAM_LOOKUP {:?}, using default", raw);
                    defaults.eager_program_lookup
                }),
                None => defaults.eager_program_lookup,
            },
            rate_limit_per_second,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
