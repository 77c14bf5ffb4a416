//! Defines a structure to store the configuration of a benchmark run. The configuration is
//! read from the file given on the command line, or from `Shmembench.toml` if it exists.
//! Some parameters can be overridden from the command line.
use log::warn;
use serde::{Deserialize, Serialize};
use shmembench::device::fake::FakeDevice;
use shmembench::{KernelMeasurement, Vendor, VECTOR_SIZE};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Shmembench.toml";

/// Accelerator runtime to run the benchmark on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Hip,
    Cuda,
    /// A simulated device, described by the `fake` section of the configuration.
    Fake,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Hip
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackendError {
    _priv: (),
}

impl fmt::Display for ParseBackendError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "invalid backend, expected one of: hip, cuda, fake")
    }
}

impl std::error::Error for ParseBackendError {}

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hip" => Ok(Backend::Hip),
            "cuda" => Ok(Backend::Cuda),
            "fake" => Ok(Backend::Fake),
            _ => Err(ParseBackendError { _priv: () }),
        }
    }
}

/// Parameters of the simulated device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FakeConfig {
    /// Runtime the fake device pretends to be driven by.
    pub vendor: Vendor,
    /// Makes the selection of the device fail, to exercise the error path.
    pub fail_device_selection: bool,
    /// Measurement reported by the simulated kernel pass.
    pub measurement: KernelMeasurement,
    /// Attributes of the device. Needs to be last for TOML serialization, because it is a
    /// table.
    pub device: FakeDevice,
}

impl Default for FakeConfig {
    fn default() -> Self {
        FakeConfig {
            vendor: Vendor::Hip,
            fail_device_selection: false,
            measurement: KernelMeasurement {
                throughput_gbps: 8192.0,
                elapsed_ms: 2.0,
            },
            device: FakeDevice::default(),
        }
    }
}

/// Stores the configuration of a benchmark run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Runtime to use.
    pub backend: Backend,
    /// Number of `f64` elements in the working set.
    pub working_set_elements: usize,
    /// Prints the results as JSON instead of the text report.
    pub json: bool,
    /// Simulated device used by the `fake` backend. Needs to be last for TOML
    /// serialization, because it is a table.
    pub fake: FakeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: Backend::default(),
            working_set_elements: VECTOR_SIZE,
            json: false,
            fake: FakeConfig::default(),
        }
    }
}

impl Config {
    fn create_parser() -> Result<config::Config, config::ConfigError> {
        let mut config_parser = config::Config::new();
        // An empty configuration is parsed as a unit value instead of a table. Setting an
        // explicit default ensures there is always a table to deserialize.
        config_parser.set_default("json", false)?;
        Ok(config_parser)
    }

    /// Extracts the configuration from the given configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let mut parser = Self::create_parser()?;
        parser.merge(config::File::from(path.as_ref()))?;
        parser.try_into::<Self>()
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        let mut parser = Self::create_parser()?;
        parser.merge(config::File::from_str(toml, config::FileFormat::Toml))?;
        parser.try_into::<Self>()
    }

    /// Reads the configuration from `path` if given, from `Shmembench.toml` if it exists,
    /// and uses the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    warn!("*** Loading config from {} ***", DEFAULT_CONFIG_FILE);
                    Self::from_path(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let toml = toml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", toml)
    }
}
