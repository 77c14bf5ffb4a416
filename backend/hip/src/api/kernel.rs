//! The shared memory bandwidth kernels.
use crate::api::wrapper::*;
use crate::api::Executor;
use libc::c_long;
use shmembench::{DeviceQueryError, KernelMeasurement, TimedKernel};
use std::marker::PhantomData;

/// Runs the shared memory kernels on the active device. The kernels allocate and time
/// their own device buffers; the host buffer only seeds and receives the data.
/// The kernel borrows the executor so it cannot outlive the initialized runtime.
pub struct ShmemKernel<'a> {
    executor: PhantomData<&'a Executor>,
}

impl<'a> ShmemKernel<'a> {
    pub fn new(_: &'a Executor) -> Self {
        ShmemKernel {
            executor: PhantomData,
        }
    }
}

impl<'a> TimedKernel for ShmemKernel<'a> {
    fn run(&mut self, buffer: &mut [f64]) -> Result<KernelMeasurement, DeviceQueryError> {
        let mut measurement = KernelMeasurement::default();
        hip_call!(shmembench_gpu_hip(
            buffer.as_mut_ptr(),
            buffer.len() as c_long,
            &mut measurement.throughput_gbps,
            &mut measurement.elapsed_ms
        ))?;
        Ok(measurement)
    }
}
