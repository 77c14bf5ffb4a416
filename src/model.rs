//! Theoretical peak performance of a device.
use crate::device::DeviceCapabilities;
use serde::{Deserialize, Serialize};

/// Compute and memory throughput a device cannot exceed, derived from its clocks and
/// widths. The formulas are kept as they are so numbers stay comparable with existing
/// reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakEstimate {
    /// Instructions issued per second over all lanes, in giga-instructions.
    pub giga_instructions_per_sec: f64,
    /// Peak memory bandwidth. Despite the name, this is in bytes per second: reports
    /// divide it by 1e9 when displaying it.
    pub giga_bytes_per_sec: f64,
}

impl PeakEstimate {
    /// Computes the theoretical peaks of a fully probed device.
    pub fn from_capabilities(caps: &DeviceCapabilities) -> Self {
        let total_lanes = caps.total_lanes() as f64;
        PeakEstimate {
            giga_instructions_per_sec: 1000.0 * f64::from(caps.core_clock_hz) * total_lanes
                / 1.0e9,
            // Multiply by 2 because DDR memory transfers on both clock edges.
            giga_bytes_per_sec: 2.0
                * f64::from(caps.memory_clock_hz)
                * 1000.0
                * f64::from(caps.memory_bus_width_bits)
                / 8.0,
        }
    }

    /// Peak single precision throughput in GFLOPs, counting each instruction as an FMA.
    pub fn gflops(&self) -> f64 {
        2.0 * self.giga_instructions_per_sec
    }

    /// Peak memory bandwidth in GB/s.
    pub fn memory_bandwidth_gbps(&self) -> f64 {
        self.giga_bytes_per_sec / (1000.0 * 1000.0 * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::Vendor;
    use proptest::prelude::*;

    fn turing() -> DeviceCapabilities {
        DeviceCapabilities {
            vendor: Vendor::Cuda,
            name: "GeForce RTX 2080 Ti".to_string(),
            architecture_major: 7,
            architecture_minor: 5,
            unit_count: 80,
            core_clock_hz: 1_000_000,
            memory_clock_hz: 877_000,
            memory_bus_width_bits: 352,
            cache_size_bytes: 5632 * 1024,
            total_memory_bytes: 11 << 30,
            warp_or_wave_size: 32,
            ecc_enabled: false,
        }
    }

    #[test]
    fn instruction_throughput_by_hand() {
        let estimate = PeakEstimate::from_capabilities(&turing());
        // 1 GHz * 80 units * 128 lanes (fallback for 7.5).
        let expected = 1_000_000.0 * 1000.0 * (80.0 * 128.0) / 1e9;
        assert!((estimate.giga_instructions_per_sec - expected).abs() < 1e-9);
        assert!((estimate.giga_instructions_per_sec - 10240.0).abs() < 1e-9);
        assert!((estimate.gflops() - 20480.0).abs() < 1e-9);
    }

    #[test]
    fn memory_bandwidth_formula() {
        let estimate = PeakEstimate::from_capabilities(&turing());
        let expected = 2.0 * 877000.0 * 1000.0 * 352.0 / 8.0;
        assert_eq!(estimate.giga_bytes_per_sec, expected);
        assert!((estimate.memory_bandwidth_gbps() - 77.176).abs() < 1e-9);
    }

    #[test]
    fn hip_uses_64_lanes_per_unit() {
        let caps = DeviceCapabilities {
            vendor: Vendor::Hip,
            architecture_major: 9,
            architecture_minor: 0,
            unit_count: 60,
            core_clock_hz: 1_800_000,
            ..turing()
        };
        let estimate = PeakEstimate::from_capabilities(&caps);
        assert!((estimate.giga_instructions_per_sec - 1.8e6 * 1000.0 * 3840.0 / 1e9).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn estimate_is_deterministic(
            major in 0i32..10,
            minor in 0i32..10,
            units in 1i32..256,
            clock in 1i32..3_000_000,
            mem_clock in 1i32..3_000_000,
            width in 1i32..8192,
        ) {
            let caps = DeviceCapabilities {
                architecture_major: major,
                architecture_minor: minor,
                unit_count: units,
                core_clock_hz: clock,
                memory_clock_hz: mem_clock,
                memory_bus_width_bits: width,
                ..turing()
            };
            let first = PeakEstimate::from_capabilities(&caps);
            let second = PeakEstimate::from_capabilities(&caps.clone());
            prop_assert_eq!(
                first.giga_instructions_per_sec.to_bits(),
                second.giga_instructions_per_sec.to_bits()
            );
            prop_assert_eq!(first.giga_bytes_per_sec.to_bits(), second.giga_bytes_per_sec.to_bits());
        }
    }
}
