/* src/select.rs */

use std::net::IpAddr;

use tracing::{debug, trace};

use crate::classify::is_private;
use crate::peer::peer_host;

/// Pick the client address the nearest proxies vouch for.
///
/// Scans `forwarded` from the last entry to the first and returns the first
/// entry that parses as an IP address and is not private. When nothing
/// qualifies, returns the host part of `peer` without any filtering.
///
/// This result can be trusted only when every hop in front of the service is
/// a proxy you control that appends to `X-Forwarded-For`.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::secure_select;
///
/// let forwarded = ["127.0.0.1", "144.12.54.87", "119.14.55.11"];
/// assert_eq!(secure_select(&forwarded, "119.15.55.11:443"), "119.14.55.11");
///
/// let forwarded = ["10.0.0.1", "192.168.1.1"];
/// assert_eq!(secure_select(&forwarded, "144.12.54.87:80"), "144.12.54.87");
/// ```
pub fn secure_select<S: AsRef<str>>(forwarded: &[S], peer: &str) -> String {
    if let Some(ip) = forwarded.iter().rev().find_map(|entry| public_ip(entry.as_ref())) {
        debug!(%ip, "client address taken from forwarded list (right to left)");
        return canonical(ip);
    }

    fallback(peer)
}

/// Best-effort guess at the original client address.
///
/// A non-empty, valid, non-private `real_ip` wins. Otherwise `forwarded` is
/// scanned from first to last and the first valid non-private entry is
/// returned. When nothing qualifies, returns the host part of `peer`.
///
/// Every input here can be forged by the client; use it for display or
/// diagnostics, never for access control.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::naive_select;
///
/// let forwarded = ["144.12.54.87", "127.0.0.1", "119.14.55.11"];
/// assert_eq!(naive_select("", &forwarded, "119.15.55.11"), "144.12.54.87");
/// assert_eq!(naive_select("119.16.55.11", &forwarded, "119.15.55.11"), "119.16.55.11");
/// ```
pub fn naive_select<S: AsRef<str>>(real_ip: &str, forwarded: &[S], peer: &str) -> String {
    if let Some(ip) = public_ip(real_ip) {
        debug!(%ip, "client address taken from real-ip header");
        return canonical(ip);
    }

    if let Some(ip) = forwarded.iter().find_map(|entry| public_ip(entry.as_ref())) {
        debug!(%ip, "client address taken from forwarded list (left to right)");
        return canonical(ip);
    }

    fallback(peer)
}

/// Parse a trimmed candidate and keep it only if it is a public address.
fn public_ip(value: &str) -> Option<IpAddr> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let Ok(ip) = value.parse::<IpAddr>() else {
        trace!(value, "skipping unparseable address");
        return None;
    };

    if is_private(ip) {
        trace!(%ip, "skipping private address");
        return None;
    }

    Some(ip)
}

fn canonical(ip: IpAddr) -> String {
    ip.to_canonical().to_string()
}

fn fallback(peer: &str) -> String {
    let host = peer_host(peer);
    debug!(host = %host, "no usable header address, falling back to peer");
    host
}
