//! Field validation utilities.
//!
//! The presentation layer hands raw, user-typed strings to the core. These
//! helpers check and normalise them before any attribute is touched. They
//! return `Err(String)` with a human-readable reason; callers wrap that into
//! `TopologyError::InvalidAttribute` with the field name.

use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static MAC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$").unwrap());

/// Validate a MAC address and return it in lowercase colon-separated form
///
/// # Examples
/// ```
/// use topoedit::utils::validation::normalize_mac;
///
/// assert_eq!(normalize_mac("00:1A:2b:3C:4d:5E"), Ok("00:1a:2b:3c:4d:5e".to_string()));
/// assert!(normalize_mac("00-1a-2b-3c-4d-5e").is_err());
/// assert!(normalize_mac("").is_err());
/// ```
pub fn normalize_mac(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if MAC_PATTERN.is_match(trimmed) {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err("expected six colon-separated hex octets".to_string())
    }
}

/// Like [`normalize_mac`], but an empty string is accepted and kept empty
pub fn normalize_optional_mac(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Ok(String::new())
    } else {
        normalize_mac(raw)
    }
}

/// Check if a string is a valid IPv4 address
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Validate a plain IPv4 address (no prefix)
pub fn validate_ipv4(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if is_valid_ipv4(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err("expected a dotted-quad IPv4 address".to_string())
    }
}

/// Validate an interface address: IPv4 with an optional `/prefix` (0-32)
///
/// # Examples
/// ```
/// use topoedit::utils::validation::validate_interface_ip;
///
/// assert!(validate_interface_ip("10.0.0.1/24").is_ok());
/// assert!(validate_interface_ip("10.0.0.1").is_ok());
/// assert!(validate_interface_ip("10.0.0.1/33").is_err());
/// assert!(validate_interface_ip("10.0.0/24").is_err());
/// ```
pub fn validate_interface_ip(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let (addr, prefix) = match trimmed.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (trimmed, None),
    };

    if !is_valid_ipv4(addr) {
        return Err("expected an IPv4 address, optionally with a /prefix".to_string());
    }
    if let Some(prefix) = prefix {
        match prefix.parse::<u8>() {
            Ok(bits) if bits <= 32 => {}
            _ => return Err(format!("prefix length '{}' must be between 0 and 32", prefix)),
        }
    }
    Ok(trimmed.to_string())
}

/// Validate a TCP/UDP port given as text. The string form is kept.
pub fn validate_port(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    match trimmed.parse::<u16>() {
        Ok(0) | Err(_) => Err("expected a port number between 1 and 65535".to_string()),
        Ok(_) => Ok(trimmed.to_string()),
    }
}

/// Check that `value` lies within `min..=max`
pub fn validate_range(value: u32, min: u32, max: u32) -> Result<u32, String> {
    if value < min || value > max {
        Err(format!("must be between {} and {}", min, max))
    } else {
        Ok(value)
    }
}
