//! Shared utilities: raw field validation and file path helpers.

pub mod paths;
pub mod validation;

pub use paths::{document_id, with_default_extension};
pub use validation::{
    normalize_mac, normalize_optional_mac, validate_interface_ip, validate_ipv4, validate_port,
    validate_range,
};
