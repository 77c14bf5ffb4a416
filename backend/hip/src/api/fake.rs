//! Provides a fake implementation of the HIP API so we can compile it even when ROCm is not
//! installed. This allows us to reference the HIP-specific types without ROCm installed.
use crate::api::InitError;
use shmembench::device::{DeviceAttribute, DriverVersion, MemInfo, Runtime};
use shmembench::{DeviceQueryError, KernelMeasurement, TimedKernel, Vendor};

/// Interface with the HIP runtime.
#[derive(Debug)]
pub enum Executor {}

impl Executor {
    /// Initializes the `Executor`.
    pub fn try_init() -> Result<Executor, InitError> {
        Err(InitError::NeedsRealGpu)
    }

    /// Returns the shared memory benchmark kernel.
    pub fn kernel(&self) -> ShmemKernel {
        match *self {}
    }
}

impl Runtime for Executor {
    fn vendor(&self) -> Vendor {
        match *self {}
    }

    fn device_count(&self) -> Result<u32, DeviceQueryError> {
        match *self {}
    }

    fn set_device(&self, _: u32) -> Result<(), DeviceQueryError> {
        match *self {}
    }

    fn device_attribute(&self, _: u32, _: DeviceAttribute) -> Result<i32, DeviceQueryError> {
        match *self {}
    }

    fn device_name(&self, _: u32) -> Result<String, DeviceQueryError> {
        match *self {}
    }

    fn total_memory(&self, _: u32) -> Result<u64, DeviceQueryError> {
        match *self {}
    }

    fn memory_info(&self, _: u32) -> Result<MemInfo, DeviceQueryError> {
        match *self {}
    }

    fn driver_version(&self) -> Result<DriverVersion, DeviceQueryError> {
        match *self {}
    }
}

/// The shared memory benchmark kernels.
pub struct ShmemKernel<'a> {
    executor: &'a Executor,
}

impl<'a> TimedKernel for ShmemKernel<'a> {
    fn run(&mut self, _: &mut [f64]) -> Result<KernelMeasurement, DeviceQueryError> {
        match *self.executor {}
    }
}
