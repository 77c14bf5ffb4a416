//! Theoretical peak estimation and benchmark harness for GPUs.
//!
//! The crate is split along the data flow of a benchmark run: the `device` module queries
//! the accelerator, `arch` and `model` turn the answers into theoretical peaks, `harness`
//! drives the timed kernel pass and `report` renders everything for the user. Accelerator
//! runtimes plug in through the `device::Runtime` trait, implemented by the backend crates.
#![deny(bare_trait_objects)]
pub mod helper;
pub mod arch;
pub mod device;
mod error;
pub mod harness;
pub mod model;
pub mod report;

pub use self::arch::Vendor;
pub use self::device::{DeviceCapabilities, DeviceHandle, Runtime};
pub use self::error::{AllocationError, DeviceQueryError, Error, Location};
pub use self::harness::{
    run_benchmark, BenchmarkBuffer, BenchmarkResult, Harness, HostAllocator,
    KernelMeasurement, RunSummary, SystemAllocator, TimedKernel,
};
pub use self::model::PeakEstimate;
pub use self::report::DeviceReport;

/// Number of `f64` elements in the default working set.
pub const VECTOR_SIZE: usize = 1024 * 1024;
