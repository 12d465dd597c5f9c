use serde::{Deserialize, Serialize};

use crate::topology::{DiskImage, NodeType};
use crate::utils::validation::{normalize_mac, validate_ipv4, validate_port, validate_range};

/// Editor settings that mirror the optional YAML settings file
///
/// Every section may be omitted; missing sections and fields fall back to
/// the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Base names used for generated node names
    pub naming: NamingConfig,
    /// Seeds for the address generators
    pub addresses: AddressConfig,
    /// Attribute defaults for newly created nodes
    pub defaults: DefaultsConfig,
}

/// Base names for generated node names (`{basename}{n}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub host: String,
    pub switch: String,
    pub controller: String,
    pub ovswitch: String,
    pub vm: String,
}

impl NamingConfig {
    /// Base name for the given node type
    pub fn basename(&self, node_type: NodeType) -> &str {
        match node_type {
            NodeType::Host => &self.host,
            NodeType::Switch => &self.switch,
            NodeType::Controller => &self.controller,
            NodeType::OVSwitch => &self.ovswitch,
            NodeType::Vm => &self.vm,
        }
    }
}

/// Starting values of the address counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    /// First IPv4 address handed out to new host interfaces
    pub ipv4_seed: String,
    /// First MAC address handed out to new interfaces
    pub mac_seed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    pub controller: ControllerDefaults,
    pub vm: VmDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerDefaults {
    pub ip: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmDefaults {
    pub memory_mb: u32,
    pub vcpu: u32,
    pub disk_image: DiskImage,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid naming configuration: {0}")]
    InvalidNaming(String),
    #[error("Invalid address configuration: {0}")]
    InvalidAddresses(String),
    #[error("Invalid defaults configuration: {0}")]
    InvalidDefaults(String),
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EditorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for node_type in NodeType::ALL {
            let basename = self.naming.basename(node_type);
            if basename.trim().is_empty() {
                return Err(ConfigError::InvalidNaming(format!(
                    "base name for {} cannot be empty",
                    node_type
                )));
            }
            if basename.contains('@') {
                return Err(ConfigError::InvalidNaming(format!(
                    "base name '{}' for {} cannot contain '@'",
                    basename, node_type
                )));
            }
        }

        validate_ipv4(&self.addresses.ipv4_seed).map_err(|e| {
            ConfigError::InvalidAddresses(format!("ipv4_seed '{}': {}", self.addresses.ipv4_seed, e))
        })?;
        normalize_mac(&self.addresses.mac_seed).map_err(|e| {
            ConfigError::InvalidAddresses(format!("mac_seed '{}': {}", self.addresses.mac_seed, e))
        })?;

        let controller = &self.defaults.controller;
        validate_ipv4(&controller.ip).map_err(|e| {
            ConfigError::InvalidDefaults(format!("controller ip '{}': {}", controller.ip, e))
        })?;
        validate_port(&controller.port).map_err(|e| {
            ConfigError::InvalidDefaults(format!("controller port '{}': {}", controller.port, e))
        })?;

        let vm = &self.defaults.vm;
        validate_range(vm.memory_mb, 1, crate::topology::MAX_VM_MEMORY_MB)
            .map_err(|e| ConfigError::InvalidDefaults(format!("vm memory_mb: {}", e)))?;
        validate_range(vm.vcpu, 1, crate::topology::MAX_VM_VCPU)
            .map_err(|e| ConfigError::InvalidDefaults(format!("vm vcpu: {}", e)))?;

        Ok(())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            host: "h".to_string(),
            switch: "s".to_string(),
            controller: "c".to_string(),
            ovswitch: "ovs".to_string(),
            vm: "vm".to_string(),
        }
    }
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            ipv4_seed: "192.168.0.1".to_string(),
            mac_seed: "00:00:00:00:00:00".to_string(),
        }
    }
}

impl Default for ControllerDefaults {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: "6653".to_string(),
        }
    }
}

impl Default for VmDefaults {
    fn default() -> Self {
        Self {
            memory_mb: 512,
            vcpu: 1,
            disk_image: DiskImage::ClickOnOsv,
        }
    }
}
