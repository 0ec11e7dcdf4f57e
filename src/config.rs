use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Library configuration module
/// Configuration is an explicit value threaded into the graph builder and
/// the translation constructors; nothing in this crate reads ambient
/// process-wide state.
/// Compute device used by the inference engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Run inference on the CPU
    #[default]
    Cpu,
    /// Run inference on a CUDA device
    Cuda,
}

impl Device {
    // @returns: Lowercase device identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Cpu => "cpu".to_string(),
            Self::Cuda => "cuda".to_string(),
        }
    }
}

// Implement Display trait for Device
impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for Device
impl std::str::FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            _ => Err(anyhow!("Invalid device type: {}", s)),
        }
    }
}

/// Represents the translation engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslateConfig {
    /// Device the inference engines run on
    #[serde(default)]
    pub device: Device,

    /// Directory scanned for installed packages
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig {
            device: Device::default(),
            packages_dir: default_packages_dir(),
        }
    }
}

impl TranslateConfig {
    /// Creates a configuration rooted at the given packages directory
    pub fn with_packages_dir<P: Into<PathBuf>>(packages_dir: P) -> Self {
        TranslateConfig {
            device: Device::default(),
            packages_dir: packages_dir.into(),
        }
    }
}

/// Default packages directory under the platform's local data dir
fn default_packages_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yaomt")
        .join("packages")
}
