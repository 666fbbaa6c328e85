//! Destination URL policy for server-side request forgery (SSRF) defense.
//!
//! A destination is accepted only when it is an absolute `http`/`https` URL
//! whose host is not a local name and not a literal address in a loopback,
//! private, link-local, carrier-grade NAT or benchmark range.
//!
//! The check is a pure function of the string: DNS names are accepted without
//! resolution, so a public name that resolves to a private address is not
//! caught here. Anything that dereferences a stored URL must re-validate the
//! resolved address before connecting.

use ipnetwork::{Ipv4Network, Ipv6Network};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use url::{Host, Url};

/// IPv4 ranges that never leave the local network.
const BLOCKED_V4: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "0.0.0.0/8",
    "100.64.0.0/10",
    "198.18.0.0/15",
];

/// Link-local and unique-local IPv6 ranges.
const BLOCKED_V6: &[&str] = &["fe80::/10", "fc00::/7"];

static BLOCKED_V4_NETWORKS: LazyLock<Vec<Ipv4Network>> = LazyLock::new(|| {
    BLOCKED_V4
        .iter()
        .map(|cidr| cidr.parse::<Ipv4Network>().unwrap())
        .collect()
});

static BLOCKED_V6_NETWORKS: LazyLock<Vec<Ipv6Network>> = LazyLock::new(|| {
    BLOCKED_V6
        .iter()
        .map(|cidr| cidr.parse::<Ipv6Network>().unwrap())
        .collect()
});

/// Why a destination URL was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsafeUrl {
    #[error("URL could not be parsed as an absolute URL")]
    Malformed,

    #[error("scheme '{0}' is not allowed, only http and https")]
    Scheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("host '{0}' refers to the local machine or network")]
    LocalHostname(String),

    #[error("address {0} is in a private or reserved range")]
    PrivateAddress(String),
}

impl UnsafeUrl {
    /// Short machine-readable label, used for metrics and error details.
    pub fn label(&self) -> &'static str {
        match self {
            UnsafeUrl::Malformed => "malformed",
            UnsafeUrl::Scheme(_) => "scheme",
            UnsafeUrl::MissingHost => "missing_host",
            UnsafeUrl::LocalHostname(_) => "local_hostname",
            UnsafeUrl::PrivateAddress(_) => "private_address",
        }
    }
}

/// Returns true if `url` may be stored as a redirect destination.
///
/// Never panics; malformed input yields `false`.
///
/// # Examples
///
/// ```ignore
/// assert!(is_safe_url("https://example.com"));
/// assert!(!is_safe_url("http://169.254.169.254/latest/meta-data"));
/// assert!(!is_safe_url("javascript:alert(1)"));
/// ```
pub fn is_safe_url(url: &str) -> bool {
    check_url(url).is_ok()
}

/// Checks `url` against the destination policy and reports the first violation.
pub fn check_url(url: &str) -> Result<(), UnsafeUrl> {
    let parsed = Url::parse(url).map_err(|_| UnsafeUrl::Malformed)?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UnsafeUrl::Scheme(other.to_string())),
    }

    match parsed.host().ok_or(UnsafeUrl::MissingHost)? {
        Host::Domain(name) => check_hostname(name),
        Host::Ipv4(addr) => check_ipv4(addr),
        Host::Ipv6(addr) => check_ipv6(addr),
    }
}

fn check_hostname(name: &str) -> Result<(), UnsafeUrl> {
    let name = name.trim_end_matches('.');

    if name == "localhost" || name.ends_with(".local") {
        return Err(UnsafeUrl::LocalHostname(name.to_string()));
    }

    Ok(())
}

fn check_ipv4(addr: Ipv4Addr) -> Result<(), UnsafeUrl> {
    if BLOCKED_V4_NETWORKS.iter().any(|net| net.contains(addr)) {
        return Err(UnsafeUrl::PrivateAddress(addr.to_string()));
    }

    Ok(())
}

fn check_ipv6(addr: Ipv6Addr) -> Result<(), UnsafeUrl> {
    // ::ffff:a.b.c.d reaches the embedded IPv4 host
    if let Some(v4) = addr.to_ipv4_mapped() {
        return check_ipv4(v4);
    }

    if addr.is_loopback()
        || addr.is_unspecified()
        || BLOCKED_V6_NETWORKS.iter().any(|net| net.contains(addr))
    {
        return Err(UnsafeUrl::PrivateAddress(addr.to_string()));
    }

    Ok(())
}
