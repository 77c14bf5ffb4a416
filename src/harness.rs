//! Drives a timed kernel pass on the default device.
use crate::device::{self, DeviceCapabilities, DeviceHandle, DriverVersion, MemInfo, Runtime};
use crate::error::{AllocationError, DeviceQueryError, Error};
use crate::helper::Mebibytes;
use crate::model::PeakEstimate;
use crate::report::DeviceReport;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::mem;

/// Ordinal of the device the benchmark runs on.
pub const DEFAULT_DEVICE: u32 = 0;

/// Allocates and frees the host side of the working set.
pub trait HostAllocator {
    /// Returns a zero-initialized buffer of `elements` values.
    fn allocate(&self, elements: usize) -> Result<Vec<f64>, AllocationError>;

    /// Frees a buffer returned by `allocate`.
    fn release(&self, buffer: Vec<f64>);
}

/// Allocates on the process heap, reporting allocation failures instead of aborting.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl HostAllocator for SystemAllocator {
    fn allocate(&self, elements: usize) -> Result<Vec<f64>, AllocationError> {
        let bytes = elements.saturating_mul(mem::size_of::<f64>());
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(elements)
            .map_err(|_| AllocationError { bytes })?;
        buffer.resize(elements, 0.0);
        Ok(buffer)
    }

    fn release(&self, buffer: Vec<f64>) {
        mem::drop(buffer);
    }
}

/// The host buffer handed to the kernel pass. It goes back to its allocator when dropped,
/// whichever way the pass ends.
pub struct BenchmarkBuffer<'a> {
    data: Vec<f64>,
    allocator: &'a dyn HostAllocator,
}

impl<'a> BenchmarkBuffer<'a> {
    /// Allocates a zeroed buffer of `elements` values.
    pub fn allocate(
        allocator: &'a dyn HostAllocator,
        elements: usize,
    ) -> Result<Self, AllocationError> {
        let bytes = Self::bytes_for(elements)?;
        let mut data = allocator.allocate(elements)?;
        for x in data.iter_mut() {
            *x = 0.0;
        }
        debug!("allocated {} bytes of host memory", bytes);
        Ok(BenchmarkBuffer { data, allocator })
    }

    /// Size in bytes of a buffer of `elements` values. Fails if the size overflows.
    pub fn bytes_for(elements: usize) -> Result<usize, AllocationError> {
        elements
            .checked_mul(mem::size_of::<f64>())
            .ok_or(AllocationError { bytes: usize::max_value() })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl<'a> Drop for BenchmarkBuffer<'a> {
    fn drop(&mut self) {
        let data = mem::replace(&mut self.data, Vec::new());
        debug!("releasing {} elements of host memory", data.len());
        self.allocator.release(data);
    }
}

/// Result of a timed kernel pass, as measured by the kernel itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelMeasurement {
    /// Measured bandwidth, in GB/s.
    pub throughput_gbps: f64,
    /// Duration of the timed region, in milliseconds.
    pub elapsed_ms: f64,
}

/// A benchmark kernel. The kernel owns device allocations, transfers and timing; `run`
/// blocks until the device work is complete and timed.
pub trait TimedKernel {
    fn run(&mut self, buffer: &mut [f64]) -> Result<KernelMeasurement, DeviceQueryError>;
}

/// Outcome of a harness run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub device_ordinal: u32,
    /// Device memory, as reported before the allocation.
    pub memory: MemInfo,
    pub elements: usize,
    pub buffer_bytes: usize,
    pub measurement: KernelMeasurement,
}

/// Runs kernel passes against a single runtime.
pub struct Harness<'a> {
    runtime: &'a dyn Runtime,
    allocator: &'a dyn HostAllocator,
}

impl<'a> Harness<'a> {
    pub fn new(runtime: &'a dyn Runtime, allocator: &'a dyn HostAllocator) -> Self {
        Harness { runtime, allocator }
    }

    /// Makes the first device active. There is no multi-device selection.
    pub fn select_default_device(&self) -> Result<DeviceHandle<'a>, DeviceQueryError> {
        DeviceHandle::select(self.runtime, DEFAULT_DEVICE)
    }

    /// Runs `kernel` over a working set of `elements` values on `device`, reporting the
    /// memory state and buffer size to `out` on the way.
    pub fn run(
        &self,
        device: &DeviceHandle,
        kernel: &mut dyn TimedKernel,
        elements: usize,
        out: &mut dyn Write,
    ) -> Result<BenchmarkResult, Error> {
        let buffer_bytes = BenchmarkBuffer::bytes_for(elements)?;
        let memory = device.memory_info()?;
        writeln!(
            out,
            "Total GPU memory {}, free {}",
            memory.total_bytes, memory.free_bytes
        )?;
        if memory.free_bytes < buffer_bytes as u64 {
            warn!(
                "only {} bytes of device memory are free, the working set needs {}",
                memory.free_bytes, buffer_bytes
            );
        }
        writeln!(out, "Buffer sizes: {}", Mebibytes(buffer_bytes as u64))?;
        out.flush()?;

        let mut buffer = BenchmarkBuffer::allocate(self.allocator, elements)?;
        let measurement = kernel.run(buffer.as_mut_slice())?;
        mem::drop(buffer);
        info!(
            "kernel pass done: {:.2} GB/s in {:.3} ms",
            measurement.throughput_gbps, measurement.elapsed_ms
        );
        Ok(BenchmarkResult {
            device_ordinal: device.ordinal(),
            memory,
            elements,
            buffer_bytes,
            measurement,
        })
    }
}

/// Everything learned during a benchmark run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub capabilities: DeviceCapabilities,
    pub driver_version: DriverVersion,
    pub estimate: PeakEstimate,
    pub result: BenchmarkResult,
}

/// Selects the default device, reports its specifications and theoretical peaks to `out`,
/// then runs `kernel` over a working set of `elements` values.
pub fn run_benchmark(
    runtime: &dyn Runtime,
    allocator: &dyn HostAllocator,
    kernel: &mut dyn TimedKernel,
    elements: usize,
    out: &mut dyn Write,
) -> Result<RunSummary, Error> {
    BenchmarkBuffer::bytes_for(elements)?;
    let harness = Harness::new(runtime, allocator);
    let device = harness.select_default_device()?;
    let capabilities = device::probe(&device)?;
    let driver_version = device.driver_version()?;
    let estimate = PeakEstimate::from_capabilities(&capabilities);
    write!(
        out,
        "{}",
        DeviceReport::new(&capabilities, driver_version, &estimate)
    )?;
    let result = harness.run(&device, kernel, elements, out)?;
    Ok(RunSummary {
        capabilities,
        driver_version,
        estimate,
        result,
    })
}
