//! Queries the CUDA runtime.
use crate::api::wrapper::*;
use crate::api::{InitError, ShmemKernel};
use libc::{c_char, c_int, size_t};
use log::debug;
use shmembench::device::{DeviceAttribute, DriverVersion, MemInfo, Runtime};
use shmembench::{DeviceQueryError, Vendor};
use std::ffi::CStr;

/// Maximum length of a device name, including the terminating null byte.
const NAME_LEN: usize = 256;
/// Status returned by the device count query when no CUDA device is installed.
const ERROR_NO_DEVICE: i32 = 100;

/// Interface with the CUDA runtime. Only the device count read at initialization is cached,
/// every other query goes to the runtime.
#[derive(Debug)]
pub struct Executor {
    device_count: u32,
}

impl Executor {
    /// Initializes the CUDA runtime. Fails if no device is available.
    pub fn try_init() -> Result<Executor, InitError> {
        let mut count: c_int = 0;
        match cuda_call!(shmembench_cuda_device_count(&mut count)) {
            Err(ref err) if err.code == ERROR_NO_DEVICE => return Err(InitError::NoDevice),
            result => result?,
        }
        debug!("CUDA runtime reports {} devices", count);
        if count <= 0 {
            return Err(InitError::NoDevice);
        }
        Ok(Executor {
            device_count: count as u32,
        })
    }

    /// Returns the shared memory benchmark kernel.
    pub fn kernel(&self) -> ShmemKernel {
        ShmemKernel::new(self)
    }
}

impl Runtime for Executor {
    fn vendor(&self) -> Vendor {
        Vendor::Cuda
    }

    fn device_count(&self) -> Result<u32, DeviceQueryError> {
        Ok(self.device_count)
    }

    fn set_device(&self, ordinal: u32) -> Result<(), DeviceQueryError> {
        cuda_call!(shmembench_cuda_set_device(ordinal as c_int))
    }

    fn device_attribute(
        &self,
        ordinal: u32,
        attribute: DeviceAttribute,
    ) -> Result<i32, DeviceQueryError> {
        let mut value: c_int = 0;
        cuda_call!(shmembench_cuda_device_attribute(
            &mut value,
            attribute as u32,
            ordinal as c_int
        ))?;
        Ok(value)
    }

    fn device_name(&self, ordinal: u32) -> Result<String, DeviceQueryError> {
        let mut name: [c_char; NAME_LEN] = [0; NAME_LEN];
        cuda_call!(shmembench_cuda_device_name(
            name.as_mut_ptr(),
            NAME_LEN as c_int,
            ordinal as c_int
        ))?;
        // Guarantee the string is terminated even if the runtime filled the buffer.
        name[NAME_LEN - 1] = 0;
        let name = unsafe { CStr::from_ptr(name.as_ptr()) };
        Ok(name.to_string_lossy().into_owned())
    }

    fn total_memory(&self, ordinal: u32) -> Result<u64, DeviceQueryError> {
        let mut bytes: size_t = 0;
        cuda_call!(shmembench_cuda_total_memory(&mut bytes, ordinal as c_int))?;
        Ok(bytes as u64)
    }

    fn memory_info(&self, ordinal: u32) -> Result<MemInfo, DeviceQueryError> {
        let mut free: size_t = 0;
        let mut total: size_t = 0;
        cuda_call!(shmembench_cuda_memory_info(
            &mut free,
            &mut total,
            ordinal as c_int
        ))?;
        Ok(MemInfo {
            free_bytes: free as u64,
            total_bytes: total as u64,
        })
    }

    fn driver_version(&self) -> Result<DriverVersion, DeviceQueryError> {
        let mut version: c_int = 0;
        cuda_call!(shmembench_cuda_driver_version(&mut version))?;
        Ok(DriverVersion(version))
    }
}
