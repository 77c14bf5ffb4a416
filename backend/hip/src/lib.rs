//! Defines the ROCm/HIP backend.
#![deny(bare_trait_objects)]
#[cfg(feature = "real_gpu")]
mod api;
#[cfg(not(feature = "real_gpu"))]
mod api {
    mod error;
    mod fake;
    pub use self::error::*;
    pub use self::fake::*;
}

pub use self::api::{Executor, InitError, ShmemKernel};
