//! Human readable reports. The layout is fixed field for field, so outputs of different
//! runs and machines can be compared line by line.
use crate::arch::Vendor;
use crate::device::{DeviceCapabilities, DriverVersion};
use crate::harness::{BenchmarkResult, RunSummary};
use crate::model::PeakEstimate;
use std::fmt;

const HEADER: &str = "------------------------ Device specifications ------------------------";
const FOOTER: &str = "-----------------------------------------------------------------------";

/// Specifications and theoretical peaks of a device.
pub struct DeviceReport<'a> {
    caps: &'a DeviceCapabilities,
    driver_version: DriverVersion,
    estimate: &'a PeakEstimate,
}

impl<'a> DeviceReport<'a> {
    pub fn new(
        caps: &'a DeviceCapabilities,
        driver_version: DriverVersion,
        estimate: &'a PeakEstimate,
    ) -> Self {
        DeviceReport {
            caps,
            driver_version,
            estimate,
        }
    }
}

impl<'a> fmt::Display for DeviceReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let caps = self.caps;
        let vendor = caps.vendor;
        writeln!(f, "{}", HEADER)?;
        writeln!(f, "Device:              {}", caps.name)?;
        writeln!(
            f,
            "{} driver version: {}",
            vendor.driver_name(),
            self.driver_version
        )?;
        writeln!(f, "GPU clock rate:      {} MHz", caps.core_clock_hz / 1000)?;
        writeln!(f, "Memory clock rate:   {} MHz", caps.memory_clock_hz / 1000 / 2)?;
        writeln!(f, "Memory bus width:    {} bits", caps.memory_bus_width_bits)?;
        match vendor {
            Vendor::Cuda => writeln!(f, "WarpSize:            {}", caps.warp_or_wave_size)?,
            Vendor::Hip => writeln!(f, "Wavefront size:      {}", caps.warp_or_wave_size)?,
        }
        writeln!(f, "L2 cache size:       {} KB", caps.cache_size_bytes / 1024)?;
        writeln!(
            f,
            "Total global mem:    {} MB",
            caps.total_memory_bytes / 1024 / 1024
        )?;
        match vendor {
            Vendor::Cuda => {
                let ecc = if caps.ecc_enabled { "Yes" } else { "No" };
                writeln!(f, "ECC enabled:         {}", ecc)?;
                writeln!(
                    f,
                    "Compute Capability:  {}.{}",
                    caps.architecture_major, caps.architecture_minor
                )?;
                writeln!(
                    f,
                    "Total SPs:           {} ({} MPs x {} SPs/MP)",
                    caps.total_lanes(),
                    caps.unit_count,
                    caps.cores_per_unit()
                )?;
            }
            Vendor::Hip => {
                writeln!(f, "Compute Units:       {}", caps.unit_count)?;
                writeln!(
                    f,
                    "Total SPs:           {} ({} CUs x {} SPs/CU)",
                    caps.total_lanes(),
                    caps.unit_count,
                    caps.cores_per_unit()
                )?;
            }
        }
        writeln!(
            f,
            "Compute throughput:  {:.2} GFlops (theoretical single precision FMAs)",
            self.estimate.gflops()
        )?;
        writeln!(
            f,
            "Memory bandwidth:    {:.2} GB/sec",
            self.estimate.memory_bandwidth_gbps()
        )?;
        writeln!(f, "{}", FOOTER)
    }
}

/// The line printed once the kernel pass completed.
pub struct MeasurementReport<'a>(pub &'a BenchmarkResult);

impl<'a> fmt::Display for MeasurementReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let measurement = &self.0.measurement;
        writeln!(
            f,
            "Shared memory bandwidth: {:.2} GB/sec ({:.3} ms)",
            measurement.throughput_gbps, measurement.elapsed_ms
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            DeviceReport::new(&self.capabilities, self.driver_version, &self.estimate)
        )?;
        write!(f, "{}", MeasurementReport(&self.result))
    }
}

/// Banner printed before anything else.
pub fn banner(vendor: Vendor) -> String {
    format!(
        "{} shmembench (shared memory bandwidth microbenchmark)",
        vendor.vendor_name()
    )
}
