//! Defines the CUDA backend.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "real_gpu"))]
    #[test]
    fn init_requires_real_gpu() {
        let err = Executor::try_init().err();
        assert!(matches!(err, Some(InitError::NeedsRealGpu)), "{:?}", err);
    }

    #[test]
    fn init_error_messages() {
        assert_eq!(
            InitError::NeedsRealGpu.to_string(),
            "must be compiled with --features=real_gpu to use CUDA"
        );
        assert_eq!(InitError::NoDevice.to_string(), "no CUDA device found");
    }

    /// Probes the first device. Only meaningful on a machine with a CUDA GPU.
    #[cfg(feature = "real_gpu")]
    #[test]
    fn probe_first_device() {
        use shmembench::Runtime;
        let executor = Executor::try_init().unwrap();
        let device = executor.select_device(0).unwrap();
        let caps = shmembench::device::probe(&device).unwrap();
        assert_eq!(caps.vendor, shmembench::Vendor::Cuda);
        assert!(caps.unit_count > 0);
    }
}
