use failure::Fail;
use shmembench::DeviceQueryError;

/// Error created when initializing the Executor.
#[derive(Debug, Fail)]
pub enum InitError {
    #[fail(display = "must be compiled with --features=real_gpu to use CUDA")]
    NeedsRealGpu,
    #[fail(display = "no CUDA device found")]
    NoDevice,
    #[fail(display = "{}", _0)]
    Runtime(#[cause] DeviceQueryError),
}

impl From<DeviceQueryError> for InitError {
    fn from(error: DeviceQueryError) -> Self {
        InitError::Runtime(error)
    }
}
