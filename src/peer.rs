/* src/peer.rs */

use crate::error::{RealIpError, Result};

/// Split a `host:port`, `host%zone:port` or `[host]:port` string into host and port.
///
/// The host of a bracketed address is returned without brackets. An empty port
/// (`"1.2.3.4:"`) is accepted.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::split_host_port;
///
/// assert_eq!(split_host_port("144.12.54.87:80").unwrap(), ("144.12.54.87", "80"));
/// assert_eq!(split_host_port("[::1]:8080").unwrap(), ("::1", "8080"));
/// assert!(split_host_port("::1").is_err());
/// ```
pub fn split_host_port(hostport: &str) -> Result<(&str, &str)> {
    let Some(colon) = hostport.rfind(':') else {
        return Err(RealIpError::MissingPort(hostport.to_string()));
    };

    let (host, host_start, port_search_start) = if hostport.starts_with('[') {
        let Some(end) = hostport.find(']') else {
            return Err(RealIpError::MissingBracket(hostport.to_string()));
        };
        if end + 1 == hostport.len() {
            // "[host]" with nothing after it
            return Err(RealIpError::MissingPort(hostport.to_string()));
        }
        if end + 1 != colon {
            // "[host]x:port" or "[host]:a:b"
            return Err(if hostport.as_bytes()[end + 1] == b':' {
                RealIpError::TooManyColons(hostport.to_string())
            } else {
                RealIpError::MissingPort(hostport.to_string())
            });
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(RealIpError::TooManyColons(hostport.to_string()));
        }
        (host, 0, 0)
    };

    if hostport[host_start..].contains('[') || hostport[port_search_start..].contains(']') {
        return Err(RealIpError::UnexpectedBracket(hostport.to_string()));
    }

    Ok((host, &hostport[colon + 1..]))
}

/// Extract the host portion of a transport peer address.
///
/// Surrounding whitespace is trimmed. A string containing a colon has its
/// trailing port split off; if that split fails the trimmed string is returned
/// unchanged. Strings without a colon are returned as they are.
pub fn peer_host(peer: &str) -> String {
    let address = peer.trim();

    if !address.contains(':') {
        return address.to_string();
    }

    match split_host_port(address) {
        Ok((host, _)) => host.to_string(),
        Err(err) => {
            tracing::trace!(%err, "peer address has no splittable port, using it as-is");
            address.to_string()
        }
    }
}
