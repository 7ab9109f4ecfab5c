//! Relay configuration types
//!
//! Defines the on-disk configuration file, the command line / environment
//! overrides, and the resolved configuration shared by every request.

use crate::allowlist::Allowlist;
use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default HTTP listen port
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// Largest payload a single IPv4 UDP datagram can carry
pub const MAX_UDP_PAYLOAD: usize = 65_507;

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_max_body_bytes() -> usize {
    MAX_UDP_PAYLOAD
}

/// Root of the optional TOML configuration file
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FileConfig {
    /// Relay section
    #[serde(default)]
    pub relay: RelaySection,
}

/// `[relay]` section of the configuration file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RelaySection {
    /// HTTP listen port
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Address the HTTP listener binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,

    /// Allowed UDP destinations; absent or empty allows every destination
    #[serde(default)]
    pub allowed_udp_hosts: Option<Vec<String>>,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            bind_addr: default_bind_addr(),
            allowed_udp_hosts: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// Every field that is set wins over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--port` / `PORT`
    pub listen_port: Option<u16>,
    /// `--bind` / `BIND_ADDR`
    pub bind_addr: Option<IpAddr>,
    /// `--allowed-udp-hosts` / `ALLOWED_UDP_HOSTS`, comma separated
    pub allowed_udp_hosts: Option<String>,
    /// `--max-body-bytes` / `MAX_BODY_BYTES`
    pub max_body_bytes: Option<usize>,
}

/// Process-wide relay configuration
///
/// Built once at startup and shared read-only with every request.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// HTTP listen port
    pub listen_port: u16,
    /// Address the HTTP listener binds to
    pub bind_addr: IpAddr,
    /// Permitted UDP destinations
    pub allowlist: Allowlist,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            bind_addr: default_bind_addr(),
            allowlist: Allowlist::allow_all(),
            max_body_bytes: MAX_UDP_PAYLOAD,
        }
    }
}

impl RelayConfig {
    /// Merge a file section with overrides; overrides take precedence
    pub fn from_parts(section: RelaySection, overrides: ConfigOverrides) -> Self {
        let allowlist = match overrides.allowed_udp_hosts {
            Some(spec) => Allowlist::parse(&spec),
            None => section
                .allowed_udp_hosts
                .map(Allowlist::from_entries)
                .unwrap_or_default(),
        };

        Self {
            listen_port: overrides.listen_port.unwrap_or(section.listen_port),
            bind_addr: overrides.bind_addr.unwrap_or(section.bind_addr),
            allowlist,
            max_body_bytes: overrides.max_body_bytes.unwrap_or(section.max_body_bytes),
        }
    }

    /// Socket address the HTTP listener binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.listen_port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.listen_port == 0 {
            return Err(RelayError::Config(
                "listen port must be between 1 and 65535".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(RelayError::Config(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
