use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
/// Envelopes are small: a wrapped key is 256 bytes, messages are chat-sized.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Config {
    /// Read `SEALPOST_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("SEALPOST_HOST").unwrap_or_else(|| DEFAULT_HOST.into());

        let port = match lookup("SEALPOST_PORT") {
            Some(v) => v.parse().with_context(|| format!("SEALPOST_PORT is not a port: {}", v))?,
            None => DEFAULT_PORT,
        };

        let max_body_bytes = match lookup("SEALPOST_MAX_BODY_BYTES") {
            Some(v) => v
                .parse()
                .with_context(|| format!("SEALPOST_MAX_BODY_BYTES is not a byte count: {}", v))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self { host, port, max_body_bytes })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
