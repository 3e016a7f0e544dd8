/* src/extractor.rs */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{RealIpError, Result};
use crate::select::{naive_select, secure_select};

/// Header map as seen by the selector: lowercase header name to every value
/// received for it, in receipt order.
pub type HeaderMap = HashMap<String, Vec<String>>;

/// Build a [`HeaderMap`] from `(name, value)` pairs.
///
/// Names are lowercased. Repeated names append to the existing list, they
/// never overwrite it.
pub fn header_map<I, K, V>(pairs: I) -> HeaderMap
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.entry(name.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }
    map
}

/// Which trust model to apply when picking the client address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Right-to-left over `X-Forwarded-For`, ignoring `X-Real-IP`.
    #[default]
    Secure,
    /// `X-Real-IP` first, then left-to-right over `X-Forwarded-For`.
    Naive,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Secure => f.write_str("secure"),
            Strategy::Naive => f.write_str("naive"),
        }
    }
}

impl FromStr for Strategy {
    type Err = RealIpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secure" => Ok(Strategy::Secure),
            "naive" => Ok(Strategy::Naive),
            _ => Err(RealIpError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Configuration for pulling selector inputs out of request headers.
#[derive(Debug, Clone)]
pub struct IpSelector {
    /// Strategy used by [`IpSelector::select`].
    pub strategy: Strategy,
    /// Multi-value header holding the forwarded chain.
    pub forwarded_header: String,
    /// Single-value header holding the proxy-reported client address.
    pub real_ip_header: String,
    /// Whether each forwarded header instance is split on commas.
    pub split_comma_lists: bool,
}

impl Default for IpSelector {
    fn default() -> Self {
        Self {
            strategy: Strategy::Secure,
            forwarded_header: "x-forwarded-for".to_string(),
            real_ip_header: "x-real-ip".to_string(),
            split_comma_lists: true,
        }
    }
}

impl IpSelector {
    /// Create a selector with the default (secure) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector using [`Strategy::Secure`].
    pub fn secure() -> Self {
        Self::default()
    }

    /// Create a selector using [`Strategy::Naive`].
    pub fn naive() -> Self {
        Self::default().with_strategy(Strategy::Naive)
    }

    /// Set the selection strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the forwarded-chain header name.
    pub fn with_forwarded_header(mut self, name: impl AsRef<str>) -> Self {
        self.forwarded_header = name.as_ref().to_ascii_lowercase();
        self
    }

    /// Set the real-ip header name.
    pub fn with_real_ip_header(mut self, name: impl AsRef<str>) -> Self {
        self.real_ip_header = name.as_ref().to_ascii_lowercase();
        self
    }

    /// Set whether comma-joined forwarded header values are split into hops.
    pub fn split_comma_lists(mut self, split: bool) -> Self {
        self.split_comma_lists = split;
        self
    }

    /// All hops of the forwarded chain, across every header instance, in
    /// receipt order.
    pub fn forwarded_list(&self, headers: &HeaderMap) -> Vec<String> {
        let Some(values) = lookup(headers, &self.forwarded_header) else {
            return Vec::new();
        };

        if self.split_comma_lists {
            values
                .iter()
                .flat_map(|value| value.split(','))
                .map(str::to_string)
                .collect()
        } else {
            values.clone()
        }
    }

    /// First received value of the real-ip header, or `""` when absent.
    pub fn real_ip_value<'a>(&self, headers: &'a HeaderMap) -> &'a str {
        lookup(headers, &self.real_ip_header)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Pick the client address for a request.
    ///
    /// `peer` is the transport address exactly as reported (`host` or
    /// `host:port`).
    pub fn select(&self, headers: &HeaderMap, peer: &str) -> String {
        let forwarded = self.forwarded_list(headers);
        match self.strategy {
            Strategy::Secure => secure_select(&forwarded, peer),
            Strategy::Naive => naive_select(self.real_ip_value(headers), &forwarded, peer),
        }
    }
}

fn lookup<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a Vec<String>> {
    headers.get(name).or_else(|| {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values)
    })
}

/// Secure client address from a header map.
///
/// Shortcut for `IpSelector::secure().select(headers, peer)`.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::{header_map, secure_real_ip};
///
/// let headers = header_map([
///     ("X-Forwarded-For", "203.0.113.7, 198.51.100.2"),
///     ("X-Forwarded-For", "10.0.0.3"),
/// ]);
///
/// assert_eq!(secure_real_ip(&headers, "10.0.0.4:51234"), "198.51.100.2");
/// ```
pub fn secure_real_ip(headers: &HeaderMap, peer: &str) -> String {
    IpSelector::secure().select(headers, peer)
}

/// Best-effort client address from a header map.
///
/// Shortcut for `IpSelector::naive().select(headers, peer)`.
pub fn naive_real_ip(headers: &HeaderMap, peer: &str) -> String {
    IpSelector::naive().select(headers, peer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_1: &str = "144.12.54.87";
    const PUBLIC_2: &str = "119.14.55.11";
    const PUBLIC_3: &str = "119.15.55.11";
    const PUBLIC_4: &str = "119.16.55.11";
    const LOCAL: &str = "127.0.0.0";
    const INVALID: &str = "invalidStr";

    fn request_headers(real_ip: &str, forwarded: &[&str]) -> HeaderMap {
        let mut pairs = Vec::new();
        if !real_ip.is_empty() {
            pairs.push(("X-Real-IP", real_ip));
        }
        for hop in forwarded {
            pairs.push(("X-Forwarded-For", *hop));
        }
        header_map(pairs)
    }

    #[test]
    fn test_header_map_appends_repeats() {
        let headers = header_map([
            ("X-Forwarded-For", "1.1.1.1"),
            ("x-forwarded-for", "2.2.2.2"),
            ("X-Real-IP", "3.3.3.3"),
        ]);

        assert_eq!(
            headers.get("x-forwarded-for"),
            Some(&vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()])
        );
        assert_eq!(headers.get("x-real-ip"), Some(&vec!["3.3.3.3".to_string()]));
    }

    #[test]
    fn test_forwarded_list_splits_and_preserves_order() {
        let headers = header_map([
            ("x-forwarded-for", "203.0.113.1, ,10.0.0.1"),
            ("x-forwarded-for", "198.51.100.9"),
        ]);

        let list = IpSelector::new().forwarded_list(&headers);
        assert_eq!(list, vec!["203.0.113.1", " ", "10.0.0.1", "198.51.100.9"]);
    }

    #[test]
    fn test_forwarded_list_without_splitting() {
        let headers = header_map([("x-forwarded-for", "203.0.113.1, 10.0.0.1")]);

        let selector = IpSelector::new().split_comma_lists(false);
        assert_eq!(selector.forwarded_list(&headers), vec!["203.0.113.1, 10.0.0.1"]);
        assert_eq!(selector.select(&headers, "198.51.100.1:80"), "198.51.100.1");
    }

    #[test]
    fn test_real_ip_first_wins() {
        let mut headers = request_headers(PUBLIC_2, &[PUBLIC_1]);
        headers.get_mut("x-real-ip").unwrap().push(PUBLIC_4.to_string());
        assert_eq!(naive_real_ip(&headers, PUBLIC_3), PUBLIC_2);

        let mut headers = request_headers(PUBLIC_2, &[PUBLIC_1]);
        headers.get_mut("x-real-ip").unwrap().push(INVALID.to_string());
        assert_eq!(naive_real_ip(&headers, PUBLIC_3), PUBLIC_2);

        let mut headers = request_headers(INVALID, &[PUBLIC_1]);
        headers.get_mut("x-real-ip").unwrap().push(PUBLIC_2.to_string());
        assert_eq!(naive_real_ip(&headers, PUBLIC_3), PUBLIC_1);
    }

    #[test]
    fn test_real_ip_absent_is_empty() {
        let headers = request_headers("", &[PUBLIC_1]);
        assert_eq!(IpSelector::naive().real_ip_value(&headers), "");
    }

    #[test]
    fn test_secure_ignores_real_ip() {
        let headers = request_headers(PUBLIC_2, &[PUBLIC_1, LOCAL]);
        assert_eq!(secure_real_ip(&headers, PUBLIC_3), PUBLIC_1);
    }

    #[test]
    fn test_secure_across_repeated_headers() {
        let headers = request_headers("", &[LOCAL, PUBLIC_1, PUBLIC_2]);
        assert_eq!(secure_real_ip(&headers, PUBLIC_3), PUBLIC_2);
        assert_eq!(naive_real_ip(&headers, PUBLIC_3), PUBLIC_1);
    }

    #[test]
    fn test_empty_request() {
        let headers = HeaderMap::new();
        assert_eq!(secure_real_ip(&headers, ""), "");
        assert_eq!(naive_real_ip(&headers, ""), "");
        assert_eq!(naive_real_ip(&headers, "144.12.54.87:80"), PUBLIC_1);
    }

    #[test]
    fn test_custom_header_names() {
        let headers = header_map([
            ("CF-Connecting-IP", PUBLIC_4),
            ("X-Original-Forwarded-For", PUBLIC_2),
            ("X-Real-IP", PUBLIC_1),
        ]);

        let selector = IpSelector::naive()
            .with_real_ip_header("CF-Connecting-IP")
            .with_forwarded_header("X-Original-Forwarded-For");
        assert_eq!(selector.select(&headers, PUBLIC_3), PUBLIC_4);

        let selector = IpSelector::secure().with_forwarded_header("X-Original-Forwarded-For");
        assert_eq!(selector.select(&headers, PUBLIC_3), PUBLIC_2);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For".to_string(), vec![PUBLIC_1.to_string()]);
        assert_eq!(secure_real_ip(&headers, PUBLIC_3), PUBLIC_1);
    }

    #[test]
    fn test_strategy_parse_and_display() {
        assert_eq!("secure".parse::<Strategy>(), Ok(Strategy::Secure));
        assert_eq!(" Naive ".parse::<Strategy>(), Ok(Strategy::Naive));
        assert_eq!(
            "trusting".parse::<Strategy>(),
            Err(RealIpError::UnknownStrategy("trusting".to_string()))
        );
        assert_eq!(Strategy::Naive.to_string(), "naive");
        assert_eq!(Strategy::default(), Strategy::Secure);
    }
}
