//! Interface with the accelerator runtime.
pub mod fake;
mod probe;

pub use self::probe::{probe, DeviceCapabilities};

use crate::arch::Vendor;
use crate::error::DeviceQueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device attributes read by the probe. Backends translate them to the attribute
/// identifiers of their runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceAttribute {
    /// Major compute capability version number.
    ComputeCapabilityMajor = 0,
    /// Minor compute capability version number.
    ComputeCapabilityMinor = 1,
    /// Number of streaming multiprocessors or compute units.
    MultiprocessorCount = 2,
    /// Peak core clock frequency in kilohertz.
    ClockRate = 3,
    /// Peak memory clock frequency in kilohertz.
    MemoryClockRate = 4,
    /// Width of the global memory bus in bits.
    MemoryBusWidth = 5,
    /// Size of the L2 cache in bytes.
    L2CacheSize = 6,
    /// Warp or wavefront size in threads.
    WarpSize = 7,
    /// Non-zero if ECC is enabled on the device memory.
    EccEnabled = 8,
}

impl DeviceAttribute {
    /// All the attributes, in the order the probe reads them.
    pub const ALL: [DeviceAttribute; 9] = [
        DeviceAttribute::ComputeCapabilityMajor,
        DeviceAttribute::ComputeCapabilityMinor,
        DeviceAttribute::MultiprocessorCount,
        DeviceAttribute::ClockRate,
        DeviceAttribute::MemoryClockRate,
        DeviceAttribute::MemoryBusWidth,
        DeviceAttribute::L2CacheSize,
        DeviceAttribute::WarpSize,
        DeviceAttribute::EccEnabled,
    ];
}

/// Free and total device memory, in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemInfo {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

/// Driver version, encoded as `1000 * major + minor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverVersion(pub i32);

impl DriverVersion {
    pub fn major(self) -> i32 {
        self.0 / 1000
    }

    pub fn minor(self) -> i32 {
        self.0 % 1000
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// The calls the benchmark issues to an accelerator runtime. Devices are designated by
/// their ordinal; the only call that changes the active device is `set_device`.
pub trait Runtime {
    /// The family of devices driven by the runtime.
    fn vendor(&self) -> Vendor;

    /// Returns the number of devices visible to the runtime.
    fn device_count(&self) -> Result<u32, DeviceQueryError>;

    /// Makes `ordinal` the active device.
    fn set_device(&self, ordinal: u32) -> Result<(), DeviceQueryError>;

    /// Queries a single attribute of a device.
    fn device_attribute(
        &self,
        ordinal: u32,
        attribute: DeviceAttribute,
    ) -> Result<i32, DeviceQueryError>;

    /// Returns the marketing name of a device.
    fn device_name(&self, ordinal: u32) -> Result<String, DeviceQueryError>;

    /// Returns the size of the device global memory in bytes.
    fn total_memory(&self, ordinal: u32) -> Result<u64, DeviceQueryError>;

    /// Returns the free and total memory of the active device.
    fn memory_info(&self, ordinal: u32) -> Result<MemInfo, DeviceQueryError>;

    /// Returns the version of the installed driver.
    fn driver_version(&self) -> Result<DriverVersion, DeviceQueryError>;

    /// Selects a device and returns a handle to it.
    fn select_device(&self, ordinal: u32) -> Result<DeviceHandle, DeviceQueryError>
    where
        Self: Sized,
    {
        DeviceHandle::select(self, ordinal)
    }
}

/// A device made active by `set_device`. Queries issued through the handle always target
/// that device, independently of any state kept by the runtime.
#[derive(Clone, Copy)]
pub struct DeviceHandle<'a> {
    runtime: &'a dyn Runtime,
    ordinal: u32,
}

impl<'a> DeviceHandle<'a> {
    /// Activates the device `ordinal` of `runtime`.
    pub fn select(runtime: &'a dyn Runtime, ordinal: u32) -> Result<Self, DeviceQueryError> {
        runtime.set_device(ordinal)?;
        log::info!("selected {} device {}", runtime.vendor(), ordinal);
        Ok(DeviceHandle { runtime, ordinal })
    }

    /// The ordinal of the device.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn vendor(&self) -> Vendor {
        self.runtime.vendor()
    }

    pub fn attribute(&self, attribute: DeviceAttribute) -> Result<i32, DeviceQueryError> {
        let value = self.runtime.device_attribute(self.ordinal, attribute)?;
        log::debug!("device {}: {:?} = {}", self.ordinal, attribute, value);
        Ok(value)
    }

    pub fn name(&self) -> Result<String, DeviceQueryError> {
        self.runtime.device_name(self.ordinal)
    }

    pub fn total_memory(&self) -> Result<u64, DeviceQueryError> {
        self.runtime.total_memory(self.ordinal)
    }

    pub fn memory_info(&self) -> Result<MemInfo, DeviceQueryError> {
        self.runtime.memory_info(self.ordinal)
    }

    pub fn driver_version(&self) -> Result<DriverVersion, DeviceQueryError> {
        self.runtime.driver_version()
    }
}

impl<'a> fmt::Debug for DeviceHandle<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("vendor", &self.runtime.vendor())
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeDevice, FakeRuntime};
    use super::*;

    #[test]
    fn driver_version_splits_thousands() {
        let version = DriverVersion(12020);
        assert_eq!((version.major(), version.minor()), (12, 20));
        assert_eq!(version.to_string(), "12.20");
        assert_eq!(DriverVersion(50_422).to_string(), "50.422");
    }

    #[test]
    fn handle_targets_its_own_ordinal() {
        let runtime = FakeRuntime::new(Vendor::Cuda, vec![FakeDevice::default(); 2]);
        let handle = DeviceHandle::select(&runtime, 1).unwrap();
        assert_eq!(handle.ordinal(), 1);
        assert_eq!(runtime.active_device(), Some(1));
        handle.attribute(DeviceAttribute::ClockRate).unwrap();
        assert_eq!(runtime.queried_devices(), vec![1]);
    }

    #[test]
    fn selecting_a_missing_device_fails() {
        let runtime = FakeRuntime::new(Vendor::Hip, vec![FakeDevice::default()]);
        assert!(runtime.select_device(3).is_err());
        assert_eq!(runtime.active_device(), None);
    }
}
