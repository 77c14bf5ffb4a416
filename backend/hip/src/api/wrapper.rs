//! Declarations of foreign functions.
use libc::{c_char, c_int, c_long, c_uint, size_t};

/// Imports the interface contained in wrapper.c.
extern "C" {
    pub fn shmembench_hip_device_count(count: *mut c_int) -> c_int;
    pub fn shmembench_hip_set_device(device: c_int) -> c_int;
    pub fn shmembench_hip_device_attribute(
        value: *mut c_int,
        attribute: c_uint,
        device: c_int,
    ) -> c_int;
    pub fn shmembench_hip_device_name(name: *mut c_char, len: c_int, device: c_int) -> c_int;
    pub fn shmembench_hip_total_memory(bytes: *mut size_t, device: c_int) -> c_int;
    pub fn shmembench_hip_memory_info(
        free: *mut size_t,
        total: *mut size_t,
        device: c_int,
    ) -> c_int;
    pub fn shmembench_hip_driver_version(version: *mut c_int) -> c_int;
    pub fn shmembench_hip_error_string(err: c_int) -> *const c_char;
}

/// Entry point of the shared memory kernels, built separately with hipcc.
extern "C" {
    pub fn shmembench_gpu_hip(
        buffer: *mut f64,
        elements: c_long,
        throughput_gbps: *mut f64,
        elapsed_ms: *mut f64,
    ) -> c_int;
}
