//! UDP destination allowlist
//!
//! Decides whether a caller-supplied destination host may receive datagrams.
//! Entries are either literal host strings or `network/bits` ranges; ranges
//! are matched by exact CIDR containment on the parsed address.

use std::fmt;
use std::net::IpAddr;

/// A parsed `network/bits` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    network: IpAddr,
    prefix_len: u8,
}

impl IpRange {
    /// Parse a `network/bits` specifier
    ///
    /// Returns `None` when the separator is missing, the network is not an IP
    /// literal, or the prefix is wider than the address family.
    pub fn parse(spec: &str) -> Option<Self> {
        let (network, bits) = spec.split_once('/')?;
        let network: IpAddr = network.trim().parse().ok()?;
        let prefix_len: u8 = bits.trim().parse().ok()?;

        let max_len = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix_len > max_len {
            return None;
        }

        Some(IpRange {
            network,
            prefix_len,
        })
    }

    /// Network address as written in the entry
    pub fn network(&self) -> IpAddr {
        self.network
    }

    /// Number of leading bits that must match
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Check whether `ip` lies inside this range
    ///
    /// Addresses of the other family never match.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = v4_mask(self.prefix_len);
                u32::from(net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = v6_mask(self.prefix_len);
                u128::from(net) & mask == u128::from(*ip) & mask
            }
            _ => false,
        }
    }
}

fn v4_mask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n => u32::MAX << (32 - u32::from(n)),
    }
}

fn v6_mask(prefix_len: u8) -> u128 {
    match prefix_len {
        0 => 0,
        n => u128::MAX << (128 - u32::from(n)),
    }
}

/// One configured allowlist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowEntry {
    raw: String,
    range: Option<IpRange>,
}

impl AllowEntry {
    /// Build an entry from its configured text
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let range = if raw.contains('/') {
            IpRange::parse(&raw)
        } else {
            None
        };
        AllowEntry { raw, range }
    }

    /// Entry text as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed range, if this entry is a well-formed `network/bits`
    pub fn range(&self) -> Option<&IpRange> {
        self.range.as_ref()
    }

    /// Literal match first, then range containment
    pub fn matches(&self, host: &str) -> bool {
        if self.raw == host {
            return true;
        }

        match (&self.range, host.parse::<IpAddr>()) {
            (Some(range), Ok(ip)) => range.contains(&ip),
            _ => false,
        }
    }
}

/// Set of permitted UDP destinations
///
/// An empty allowlist admits every destination (development mode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    entries: Vec<AllowEntry>,
}

impl Allowlist {
    /// Allowlist that admits every destination
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"203.0.113.5, 10.0.0.0/8"`
    ///
    /// Blank entries are dropped, so an empty string yields an allow-all list.
    pub fn parse(spec: &str) -> Self {
        Self::from_entries(spec.split(','))
    }

    /// Build from individual entries, dropping blank ones
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter(|e| !e.as_ref().trim().is_empty())
            .map(|e| AllowEntry::new(e.as_ref()))
            .collect();
        Allowlist { entries }
    }

    /// True when no restriction is configured
    pub fn is_allow_all(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured entries in order
    pub fn entries(&self) -> &[AllowEntry] {
        &self.entries
    }

    /// Check whether `host` may receive datagrams
    pub fn is_allowed(&self, host: &str) -> bool {
        self.is_allow_all() || self.entries.iter().any(|e| e.matches(host))
    }
}

impl fmt::Display for Allowlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_allow_all() {
            return write!(f, "*");
        }
        let joined = self
            .entries
            .iter()
            .map(AllowEntry::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}
