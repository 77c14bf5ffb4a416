//! Helpers shared by the integration tests.
#![allow(dead_code)]

use shmembench::device::fake::{FakeDevice, FakeRuntime};
use shmembench::{KernelMeasurement, Vendor};

/// Returns a runtime exposing a single default fake device.
pub fn single_device(vendor: Vendor) -> FakeRuntime {
    FakeRuntime::new(vendor, vec![FakeDevice::default()])
}

/// A plausible shared memory measurement.
pub fn measurement() -> KernelMeasurement {
    KernelMeasurement {
        throughput_gbps: 10_512.25,
        elapsed_ms: 1.5,
    }
}
