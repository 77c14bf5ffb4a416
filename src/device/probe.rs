//! Reads the capabilities of a device.
use crate::arch::{self, Vendor};
use crate::device::DeviceAttribute::*;
use crate::device::DeviceHandle;
use crate::error::DeviceQueryError;
use serde::{Deserialize, Serialize};

/// Hardware attributes of a device, as reported by its runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    /// The family of the device.
    pub vendor: Vendor,
    /// The name of the device.
    pub name: String,
    /// Major compute capability, or major ISA version on HIP devices.
    pub architecture_major: i32,
    /// Minor compute capability, or minor ISA version on HIP devices.
    pub architecture_minor: i32,
    /// Number of streaming multiprocessors or compute units.
    pub unit_count: i32,
    /// Peak core clock, in kHz.
    pub core_clock_hz: i32,
    /// Peak memory clock, in kHz.
    pub memory_clock_hz: i32,
    /// Width of the memory bus, in bits.
    pub memory_bus_width_bits: i32,
    /// Size of the L2 cache, in bytes.
    pub cache_size_bytes: i32,
    /// Size of the global memory, in bytes.
    pub total_memory_bytes: u64,
    pub warp_or_wave_size: i32,
    pub ecc_enabled: bool,
}

impl DeviceCapabilities {
    /// Number of lanes in a single execution unit.
    pub fn cores_per_unit(&self) -> u32 {
        arch::cores_per_unit(self.vendor, self.architecture_major, self.architecture_minor)
    }

    /// Number of lanes on the whole device.
    pub fn total_lanes(&self) -> u64 {
        arch::total_lanes(
            self.vendor,
            self.architecture_major,
            self.architecture_minor,
            self.unit_count,
        )
    }
}

/// Queries the capabilities of `device`. Clocks and bus width are always read through
/// explicit attribute queries since aggregate property structures do not carry them on all
/// runtime versions. Fails on the first query that fails, so the capabilities are either
/// complete or not returned at all.
pub fn probe(device: &DeviceHandle) -> Result<DeviceCapabilities, DeviceQueryError> {
    let caps = DeviceCapabilities {
        vendor: device.vendor(),
        name: device.name()?,
        architecture_major: device.attribute(ComputeCapabilityMajor)?,
        architecture_minor: device.attribute(ComputeCapabilityMinor)?,
        unit_count: device.attribute(MultiprocessorCount)?,
        core_clock_hz: device.attribute(ClockRate)?,
        memory_clock_hz: device.attribute(MemoryClockRate)?,
        memory_bus_width_bits: device.attribute(MemoryBusWidth)?,
        cache_size_bytes: device.attribute(L2CacheSize)?,
        total_memory_bytes: device.total_memory()?,
        warp_or_wave_size: device.attribute(WarpSize)?,
        ecc_enabled: device.attribute(EccEnabled)? != 0,
    };
    log::info!(
        "probed {} ({}.{}, {} units)",
        caps.name,
        caps.architecture_major,
        caps.architecture_minor,
        caps.unit_count
    );
    Ok(caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::{FakeDevice, FakeRuntime};
    use crate::device::{DeviceAttribute, Runtime};

    #[test]
    fn probe_reads_every_attribute() {
        let device = FakeDevice {
            name: "Radeon Instinct MI100".to_string(),
            architecture_major: 9,
            architecture_minor: 0,
            unit_count: 120,
            clock_rate_khz: 1_502_000,
            memory_clock_rate_khz: 1_200_000,
            memory_bus_width_bits: 4096,
            l2_cache_bytes: 8 * 1024 * 1024,
            total_memory_bytes: 32 << 30,
            warp_size: 64,
            ecc_enabled: true,
            ..FakeDevice::default()
        };
        let runtime = FakeRuntime::new(Vendor::Hip, vec![device]);
        let handle = runtime.select_device(0).unwrap();
        let caps = probe(&handle).unwrap();
        assert_eq!(
            caps,
            DeviceCapabilities {
                vendor: Vendor::Hip,
                name: "Radeon Instinct MI100".to_string(),
                architecture_major: 9,
                architecture_minor: 0,
                unit_count: 120,
                core_clock_hz: 1_502_000,
                memory_clock_hz: 1_200_000,
                memory_bus_width_bits: 4096,
                cache_size_bytes: 8 * 1024 * 1024,
                total_memory_bytes: 32 << 30,
                warp_or_wave_size: 64,
                ecc_enabled: true,
            }
        );
        assert_eq!(caps.total_lanes(), 120 * 64);
        for &attribute in &DeviceAttribute::ALL {
            assert!(runtime.queried_attributes().contains(&attribute));
        }
    }

    #[test]
    fn failing_attribute_aborts_the_probe() {
        let runtime = FakeRuntime::new(Vendor::Cuda, vec![FakeDevice::default()]);
        runtime.fail_attribute(DeviceAttribute::MemoryBusWidth);
        let handle = runtime.select_device(0).unwrap();
        let err = probe(&handle).unwrap_err();
        assert!(err.call.contains("MemoryBusWidth"), "{}", err.call);
        // Attributes after the failing one are never queried.
        assert!(!runtime.queried_attributes().contains(&DeviceAttribute::WarpSize));
    }
}
