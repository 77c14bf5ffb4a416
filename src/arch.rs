//! Number of scalar lanes per execution unit, by architecture.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lane count used for architectures missing from the table. This is an approximation: it is
/// the width of recent generations, not a documented value for unknown hardware.
pub const DEFAULT_CORES_PER_UNIT: u32 = 128;

/// Lanes per compute unit on HIP devices. The unit count already reflects the physical
/// execution width, so the architecture revision does not matter.
pub const HIP_CORES_PER_UNIT: u32 = 64;

/// Accelerator families, each with its own runtime and lane-count policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// NVIDIA GPUs, driven through the CUDA runtime.
    Cuda,
    /// AMD GPUs, driven through the ROCm HIP runtime.
    Hip,
}

impl Vendor {
    /// Name of the runtime API, as it prefixes runtime errors.
    pub fn api_name(self) -> &'static str {
        match self {
            Vendor::Cuda => "Cuda",
            Vendor::Hip => "HIP",
        }
    }

    /// Name of the driver stack, as printed with the driver version.
    pub fn driver_name(self) -> &'static str {
        match self {
            Vendor::Cuda => "CUDA",
            Vendor::Hip => "ROCm",
        }
    }

    /// Name of the vendor, as printed in the banner of the benchmark.
    pub fn vendor_name(self) -> &'static str {
        match self {
            Vendor::Cuda => "NVIDIA",
            Vendor::Hip => "AMD",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.driver_name())
    }
}

/// CUDA lanes per streaming multiprocessor, indexed by compute capability. A `None` minor
/// revision matches any revision of the major version; entries are tried in order.
const CUDA_CORES_PER_SM: &[(i32, Option<i32>, u32)] = &[
    (1, None, 8),
    (2, Some(1), 48),
    (2, None, 32),
    (3, None, 192),
    (6, Some(0), 64),
    (6, None, 128),
];

/// Returns the number of lanes in an execution unit of the given architecture.
pub fn cores_per_unit(vendor: Vendor, major: i32, minor: i32) -> u32 {
    match vendor {
        Vendor::Hip => HIP_CORES_PER_UNIT,
        Vendor::Cuda => CUDA_CORES_PER_SM
            .iter()
            .find(|&&(maj, min, _)| maj == major && min.map_or(true, |min| min == minor))
            .map_or(DEFAULT_CORES_PER_UNIT, |&(_, _, cores)| cores),
    }
}

/// Returns the number of lanes of a device with `unit_count` execution units.
pub fn total_lanes(vendor: Vendor, major: i32, minor: i32, unit_count: i32) -> u64 {
    u64::from(cores_per_unit(vendor, major, minor)) * unit_count.max(0) as u64
}
