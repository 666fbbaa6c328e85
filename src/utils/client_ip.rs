//! Client address resolution from the peer address and proxy headers.
//!
//! The resolved address is computed once per request and used both as the
//! anonymous rate-limit key and as the audit address stored with links and
//! click logs.
//!
//! # Trust model
//!
//! `X-Forwarded-For` is a comma-separated hop list that any client can
//! prefill. Taking the left-most entry is only sound when the edge proxy
//! strips or overwrites the header. Deployments with a known number of
//! appending proxies should set [`ClientIpPolicy::trusted_proxy_hops`] so the
//! address is read from the right-hand side instead.

use axum::http::HeaderMap;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Derives one client address from the three available signals.
///
/// Precedence:
/// 1. `direct`, when present and non-empty
/// 2. the left-most non-empty segment of `forwarded_for`
/// 3. `real_ip`, trimmed
///
/// Returns `None` when no address is known. An empty string is never returned.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     resolve_client_ip(None, Some("1.2.3.4, 10.0.0.1"), None).as_deref(),
///     Some("1.2.3.4")
/// );
/// assert_eq!(resolve_client_ip(None, None, Some(" 9.9.9.9 ")).as_deref(), Some("9.9.9.9"));
/// assert_eq!(resolve_client_ip(None, None, None), None);
/// ```
pub fn resolve_client_ip(
    direct: Option<&str>,
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
) -> Option<String> {
    resolve_with_hops(direct, forwarded_for, real_ip, 0)
}

/// Same as [`resolve_client_ip`], selecting the forwarded hop by trust depth.
///
/// With `trusted_hops == 0` the left-most segment is used. With `n > 0` the
/// `n`-th segment from the right is used, which is the address recorded by the
/// outermost of `n` trusted proxies. Headers shorter than `n` fall back to the
/// left-most segment.
pub fn resolve_with_hops(
    direct: Option<&str>,
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    trusted_hops: usize,
) -> Option<String> {
    if let Some(ip) = direct.filter(|ip| !ip.is_empty()) {
        return Some(ip.to_string());
    }

    if let Some(header) = forwarded_for {
        let hops: Vec<&str> = header
            .split(',')
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .collect();

        let picked = match trusted_hops {
            0 => hops.first(),
            n if n <= hops.len() => hops.get(hops.len() - n),
            _ => hops.first(),
        };

        if let Some(hop) = picked {
            return Some(hop.to_string());
        }
    }

    real_ip
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// Deployment-specific rules for trusting proxy headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientIpPolicy {
    /// When false, the socket peer address is authoritative and proxy headers
    /// are only consulted if the peer address is unavailable.
    pub behind_proxy: bool,
    /// Number of trusted proxies appending to `X-Forwarded-For`. Zero keeps
    /// the left-most entry.
    pub trusted_proxy_hops: usize,
}

impl ClientIpPolicy {
    /// Resolves the client address for a request.
    ///
    /// `peer` is the socket address of the direct connection, when known.
    pub fn resolve(&self, peer: Option<&str>, headers: &HeaderMap) -> Option<String> {
        let direct = if self.behind_proxy { None } else { peer };

        resolve_with_hops(
            direct,
            header_str(headers, X_FORWARDED_FOR),
            header_str(headers, X_REAL_IP),
            self.trusted_proxy_hops,
        )
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
