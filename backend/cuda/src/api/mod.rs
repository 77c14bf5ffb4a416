//! Wrapper around the CUDA runtime.
use std::ffi::CStr;

/// Issues a call to the CUDA wrapper and converts a non-success status into a
/// `DeviceQueryError` pointing at the call site.
macro_rules! cuda_call {
    ($call:expr) => {{
        let code = unsafe { $call };
        if code == crate::api::CUDA_SUCCESS {
            Ok(())
        } else {
            Err(shmembench::DeviceQueryError::new(
                "Cuda",
                stringify!($call),
                code,
                crate::api::error_string(code),
            )
            .at(file!(), line!()))
        }
    }};
}

mod error;
mod executor;
mod kernel;
mod wrapper;

pub use self::error::*;
pub use self::executor::Executor;
pub use self::kernel::ShmemKernel;

/// Status returned by successful CUDA calls.
const CUDA_SUCCESS: i32 = 0;

/// Returns the description of a CUDA status code.
fn error_string(code: i32) -> String {
    let ptr = unsafe { wrapper::shmembench_cuda_error_string(code) };
    if ptr.is_null() {
        format!("unknown error {}", code)
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}
