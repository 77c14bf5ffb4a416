//! End-to-end runs of the benchmark against the fake runtime.
mod common;

use common::*;
use shmembench::device::fake::{CountingAllocator, FakeKernel};
use shmembench::device::DeviceAttribute;
use shmembench::{run_benchmark, DeviceQueryError, Error, Vendor, VECTOR_SIZE};

#[test]
fn default_working_set_requests_8mb() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Hip);
    let allocator = CountingAllocator::default();
    let mut kernel = FakeKernel::new(measurement());
    let mut out = Vec::new();
    let summary = run_benchmark(&runtime, &allocator, &mut kernel, VECTOR_SIZE, &mut out).unwrap();

    assert_eq!(VECTOR_SIZE, 1_048_576);
    assert_eq!(allocator.last_request(), Some(8_388_608));
    assert_eq!(summary.result.buffer_bytes, 8_388_608);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("\nBuffer sizes: 8MB\n"), "{}", out);
    assert!(out.starts_with("------------------------ Device specifications"));
    assert_eq!(kernel.last_len(), Some(VECTOR_SIZE));
    assert_eq!(allocator.live(), 0);
}

#[test]
fn summary_matches_the_probed_device() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Cuda);
    let allocator = CountingAllocator::default();
    let mut kernel = FakeKernel::new(measurement());
    let summary = run_benchmark(&runtime, &allocator, &mut kernel, 1024, &mut Vec::new()).unwrap();

    assert_eq!(summary.capabilities.unit_count, 80);
    assert_eq!(summary.driver_version.to_string(), "12.20");
    assert!((summary.estimate.giga_instructions_per_sec - 10240.0).abs() < 1e-9);
    assert_eq!(summary.result.device_ordinal, 0);
    assert_eq!(summary.result.measurement, measurement());
    let text = summary.to_string();
    assert!(text.ends_with("Shared memory bandwidth: 10512.25 GB/sec (1.500 ms)\n"), "{}", text);
}

#[test]
fn buffer_is_released_when_the_kernel_fails() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Hip);
    let allocator = CountingAllocator::default();
    let failure = DeviceQueryError::new("HIP", "hipMalloc", 2, "out of memory").at("kernel.hip", 88);
    let mut kernel = FakeKernel::failing(failure.clone());
    let err = run_benchmark(&runtime, &allocator, &mut kernel, VECTOR_SIZE, &mut Vec::new())
        .unwrap_err();

    match err {
        Error::DeviceQuery(err) => assert_eq!(err, failure),
        err => panic!("unexpected error: {}", err),
    }
    assert_eq!(kernel.calls(), 1);
    assert_eq!(allocator.allocated(), 1);
    assert_eq!(allocator.released(), 1);
}

#[test]
fn failed_device_selection_never_runs_the_kernel() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Cuda);
    runtime.fail_set_device();
    let allocator = CountingAllocator::default();
    let mut kernel = FakeKernel::new(measurement());
    let mut out = Vec::new();
    let err = run_benchmark(&runtime, &allocator, &mut kernel, VECTOR_SIZE, &mut out).unwrap_err();

    assert!(matches!(err, Error::DeviceQuery(_)));
    assert!(err.to_string().starts_with("Cuda error in file '"), "{}", err);
    assert_eq!(kernel.calls(), 0);
    assert_eq!(allocator.allocated(), 0);
    assert!(out.is_empty());
}

#[test]
fn failed_probe_prints_no_partial_report() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Cuda);
    runtime.fail_attribute(DeviceAttribute::EccEnabled);
    let allocator = CountingAllocator::default();
    let mut kernel = FakeKernel::new(measurement());
    let mut out = Vec::new();
    assert!(run_benchmark(&runtime, &allocator, &mut kernel, 64, &mut out).is_err());
    assert!(out.is_empty());
    assert_eq!(kernel.calls(), 0);
}

#[test]
fn oversized_working_set_fails_before_selecting_a_device() {
    let _ = env_logger::try_init();
    let runtime = single_device(Vendor::Hip);
    let allocator = CountingAllocator::default();
    let mut kernel = FakeKernel::new(measurement());
    let mut out = Vec::new();
    let err = run_benchmark(&runtime, &allocator, &mut kernel, 1 << 62, &mut out).unwrap_err();

    assert!(matches!(err, Error::Allocation(_)), "{}", err);
    assert!(out.is_empty());
    assert_eq!(runtime.active_device(), None);
    assert_eq!(allocator.allocated(), 0);
    assert_eq!(kernel.calls(), 0);
}
