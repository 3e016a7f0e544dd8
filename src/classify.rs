/* src/classify.rs */

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Check if an address is private, local, or otherwise not a usable public
/// client identity.
///
/// Covers loopback, link-local unicast, link-local multicast, RFC 1918 and
/// unique-local ranges, and the RFC 6598 shared address space. IPv4-mapped
/// IPv6 addresses are classified by their IPv4 form.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::is_private;
///
/// assert!(is_private("192.168.1.1".parse().unwrap()));
/// assert!(is_private("100.64.0.1".parse().unwrap()));
/// assert!(!is_private("144.12.54.87".parse().unwrap()));
/// ```
pub fn is_private(ip: IpAddr) -> bool {
    match ip.to_canonical() {
        IpAddr::V4(ipv4) => is_private_v4(ipv4),
        IpAddr::V6(ipv6) => is_private_v6(ipv6),
    }
}

/// Check if an address is in the shared address space `100.64.0.0/10`.
///
/// Pure IPv6 addresses are never in this block.
pub fn is_shared_address_space(ip: IpAddr) -> bool {
    match ip.to_canonical() {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            octets[0] == 100 && octets[1] & 0xc0 == 0x40
        }
        IpAddr::V6(_) => false,
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_loopback()
        || ip.is_link_local()
        || (octets[0] == 224 && octets[1] == 0 && octets[2] == 0) // 224.0.0.0/24
        || ip.is_private()
        || is_shared_address_space(IpAddr::V4(ip))
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || (first & 0xffc0) == 0xfe80 // Link local
        || (first & 0xff0f) == 0xff02 // Link local multicast
        || (first & 0xfe00) == 0xfc00 // Unique local
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_private_addresses() {
        for addr in [
            "127.0.0.1",
            "127.0.0.0",
            "::1",
            "169.254.1.1",
            "10.0.0.1",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.1.1",
            "100.64.0.1",
            "100.100.0.1",
            "100.127.255.255",
        ] {
            assert!(is_private(ip(addr)), "{addr} should be private");
        }
    }

    #[test]
    fn test_public_addresses() {
        for addr in [
            "144.12.54.87",
            "119.14.55.11",
            "119.15.55.11",
            "100.63.255.255",
            "100.128.0.0",
            "172.32.0.1",
            "8.8.8.8",
            "2001:4860:4860::8888",
        ] {
            assert!(!is_private(ip(addr)), "{addr} should be public");
        }
    }

    #[test]
    fn test_ipv6_ranges() {
        assert!(is_private(ip("fe80::1")));
        assert!(is_private(ip("febf::1")));
        assert!(is_private(ip("fc00::1")));
        assert!(is_private(ip("fd12:3456::1")));
        assert!(is_private(ip("ff02::1")));
        assert!(!is_private(ip("ff0e::1")));
        assert!(!is_private(ip("fec0::1")));
    }

    #[test]
    fn test_link_local_multicast_v4() {
        assert!(is_private(ip("224.0.0.251")));
        assert!(!is_private(ip("224.0.1.1")));
    }

    #[test]
    fn test_ipv4_mapped() {
        assert!(is_private(ip("::ffff:192.168.1.1")));
        assert!(is_private(ip("::ffff:100.64.0.1")));
        assert!(!is_private(ip("::ffff:144.12.54.87")));
    }

    #[test]
    fn test_shared_address_space_bounds() {
        assert!(is_shared_address_space(ip("100.64.0.0")));
        assert!(is_shared_address_space(ip("100.127.255.255")));
        assert!(!is_shared_address_space(ip("100.63.255.255")));
        assert!(!is_shared_address_space(ip("100.128.0.0")));
        assert!(!is_shared_address_space(ip("6440::1")));
    }
}
