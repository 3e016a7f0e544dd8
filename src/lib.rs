/* src/lib.rs */
//! # Forwarded IP
//!
//! Pick the originating client address of an HTTP request that went through
//! reverse proxies, from `X-Forwarded-For`, `X-Real-IP` and the peer address.
//!
//! Two trust models are provided:
//!
//! - [`secure_select`] scans `X-Forwarded-For` right to left and returns the
//!   first public address. Safe only behind proxies you control.
//! - [`naive_select`] prefers `X-Real-IP`, then scans `X-Forwarded-For` left to
//!   right. A best guess that any client can spoof.
//!
//! Both skip unparseable and private addresses (see [`is_private`]) and fall
//! back to the host part of the peer address.
//!
//! ## Features
//!
//! - Pure, allocation-light selection functions over plain strings
//! - [`IpSelector`] for reading the inputs out of a header map
//! - Optional Axum middleware and extractor integration via the `axum` feature
//!
//! ## Examples
//!
//! ```rust
//! use forwarded_ip::{header_map, naive_real_ip, secure_real_ip};
//!
//! let headers = header_map([
//!     ("X-Real-IP", "198.51.100.23"),
//!     ("X-Forwarded-For", "203.0.113.5, 192.168.0.10"),
//!     ("X-Forwarded-For", "198.51.100.77"),
//! ]);
//!
//! assert_eq!(secure_real_ip(&headers, "10.0.0.1:443"), "198.51.100.77");
//! assert_eq!(naive_real_ip(&headers, "10.0.0.1:443"), "198.51.100.23");
//! ```

pub mod classify;
pub mod error;
pub mod extractor;
pub mod peer;
pub mod select;

#[cfg(feature = "axum")]
pub mod middleware;

pub use classify::{is_private, is_shared_address_space};
pub use error::{RealIpError, Result};
pub use extractor::{HeaderMap, IpSelector, Strategy, header_map, naive_real_ip, secure_real_ip};
pub use peer::{peer_host, split_host_port};
pub use select::{naive_select, secure_select};

#[cfg(feature = "axum")]
pub use middleware::{ClientIp, RealIpLayer, RealIpService};

/// Re-export commonly used types
pub use std::net::IpAddr;
