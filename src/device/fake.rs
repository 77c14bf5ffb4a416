//! A fake accelerator runtime, so the benchmark pipeline can run and be tested without a
//! GPU. The fake records the calls it receives and can be told to fail on specific ones.
use crate::arch::Vendor;
use crate::device::{DeviceAttribute, DriverVersion, MemInfo, Runtime};
use crate::error::{AllocationError, DeviceQueryError};
use crate::harness::{HostAllocator, KernelMeasurement, TimedKernel};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Status code returned for an invalid device ordinal by both CUDA and HIP.
const ERROR_INVALID_DEVICE: i32 = 101;
/// Status code used for injected failures.
const ERROR_INJECTED: i32 = 999;

/// Attributes of a simulated device. The defaults describe a Turing-class GPU.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FakeDevice {
    pub name: String,
    pub architecture_major: i32,
    pub architecture_minor: i32,
    pub unit_count: i32,
    pub clock_rate_khz: i32,
    pub memory_clock_rate_khz: i32,
    pub memory_bus_width_bits: i32,
    pub l2_cache_bytes: i32,
    pub total_memory_bytes: u64,
    pub free_memory_bytes: u64,
    pub warp_size: i32,
    pub ecc_enabled: bool,
    pub driver_version: i32,
}

impl Default for FakeDevice {
    fn default() -> Self {
        FakeDevice {
            name: "Fake GPU".to_string(),
            architecture_major: 7,
            architecture_minor: 5,
            unit_count: 80,
            clock_rate_khz: 1_000_000,
            memory_clock_rate_khz: 877_000,
            memory_bus_width_bits: 352,
            l2_cache_bytes: 5632 * 1024,
            total_memory_bytes: 11 << 30,
            free_memory_bytes: 10 << 30,
            warp_size: 32,
            ecc_enabled: false,
            driver_version: 12020,
        }
    }
}

impl FakeDevice {
    fn attribute(&self, attribute: DeviceAttribute) -> i32 {
        match attribute {
            DeviceAttribute::ComputeCapabilityMajor => self.architecture_major,
            DeviceAttribute::ComputeCapabilityMinor => self.architecture_minor,
            DeviceAttribute::MultiprocessorCount => self.unit_count,
            DeviceAttribute::ClockRate => self.clock_rate_khz,
            DeviceAttribute::MemoryClockRate => self.memory_clock_rate_khz,
            DeviceAttribute::MemoryBusWidth => self.memory_bus_width_bits,
            DeviceAttribute::L2CacheSize => self.l2_cache_bytes,
            DeviceAttribute::WarpSize => self.warp_size,
            DeviceAttribute::EccEnabled => self.ecc_enabled as i32,
        }
    }
}

/// A runtime backed by a list of `FakeDevice`.
#[derive(Debug)]
pub struct FakeRuntime {
    vendor: Vendor,
    devices: Vec<FakeDevice>,
    active: Cell<Option<u32>>,
    fail_set_device: Cell<bool>,
    fail_memory_info: Cell<bool>,
    failing_attributes: RefCell<HashSet<DeviceAttribute>>,
    queried_attributes: RefCell<Vec<DeviceAttribute>>,
    queried_devices: RefCell<Vec<u32>>,
}

impl FakeRuntime {
    pub fn new(vendor: Vendor, devices: Vec<FakeDevice>) -> Self {
        FakeRuntime {
            vendor,
            devices,
            active: Cell::new(None),
            fail_set_device: Cell::new(false),
            fail_memory_info: Cell::new(false),
            failing_attributes: RefCell::new(HashSet::new()),
            queried_attributes: RefCell::new(Vec::new()),
            queried_devices: RefCell::new(Vec::new()),
        }
    }

    /// Makes every subsequent `set_device` call fail.
    pub fn fail_set_device(&self) {
        self.fail_set_device.set(true);
    }

    /// Makes every subsequent `memory_info` call fail.
    pub fn fail_memory_info(&self) {
        self.fail_memory_info.set(true);
    }

    /// Makes every subsequent query of `attribute` fail.
    pub fn fail_attribute(&self, attribute: DeviceAttribute) {
        self.failing_attributes.borrow_mut().insert(attribute);
    }

    /// The device made active by the last successful `set_device`.
    pub fn active_device(&self) -> Option<u32> {
        self.active.get()
    }

    /// The attributes queried so far, in order.
    pub fn queried_attributes(&self) -> Vec<DeviceAttribute> {
        self.queried_attributes.borrow().clone()
    }

    /// The devices whose attributes were queried so far, without duplicates.
    pub fn queried_devices(&self) -> Vec<u32> {
        let mut devices = self.queried_devices.borrow().clone();
        devices.dedup();
        devices
    }

    fn error(&self, call: String, code: i32, description: &str) -> DeviceQueryError {
        DeviceQueryError::new(self.vendor.api_name(), call, code, description)
    }

    fn device(&self, ordinal: u32) -> Result<&FakeDevice, DeviceQueryError> {
        self.devices.get(ordinal as usize).ok_or_else(|| {
            self.error(
                format!("device({})", ordinal),
                ERROR_INVALID_DEVICE,
                "invalid device ordinal",
            )
            .at(file!(), line!())
        })
    }
}

impl Runtime for FakeRuntime {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn device_count(&self) -> Result<u32, DeviceQueryError> {
        Ok(self.devices.len() as u32)
    }

    fn set_device(&self, ordinal: u32) -> Result<(), DeviceQueryError> {
        if self.fail_set_device.get() {
            let call = format!("set_device({})", ordinal);
            return Err(self.error(call, ERROR_INJECTED, "injected failure").at(file!(), line!()));
        }
        self.device(ordinal)?;
        self.active.set(Some(ordinal));
        Ok(())
    }

    fn device_attribute(
        &self,
        ordinal: u32,
        attribute: DeviceAttribute,
    ) -> Result<i32, DeviceQueryError> {
        let device = self.device(ordinal)?;
        self.queried_attributes.borrow_mut().push(attribute);
        self.queried_devices.borrow_mut().push(ordinal);
        if self.failing_attributes.borrow().contains(&attribute) {
            let call = format!("device_attribute({:?}, {})", attribute, ordinal);
            return Err(self.error(call, ERROR_INJECTED, "injected failure").at(file!(), line!()));
        }
        Ok(device.attribute(attribute))
    }

    fn device_name(&self, ordinal: u32) -> Result<String, DeviceQueryError> {
        Ok(self.device(ordinal)?.name.clone())
    }

    fn total_memory(&self, ordinal: u32) -> Result<u64, DeviceQueryError> {
        Ok(self.device(ordinal)?.total_memory_bytes)
    }

    fn memory_info(&self, ordinal: u32) -> Result<MemInfo, DeviceQueryError> {
        let device = self.device(ordinal)?;
        if self.fail_memory_info.get() {
            let call = "memory_info".to_string();
            return Err(self.error(call, ERROR_INJECTED, "injected failure").at(file!(), line!()));
        }
        Ok(MemInfo {
            free_bytes: device.free_memory_bytes,
            total_bytes: device.total_memory_bytes,
        })
    }

    fn driver_version(&self) -> Result<DriverVersion, DeviceQueryError> {
        let version = self.devices.first().map_or(0, |d| d.driver_version);
        Ok(DriverVersion(version))
    }
}

/// A host allocator that counts allocations and releases.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    fail: Cell<bool>,
    allocated: Cell<usize>,
    released: Cell<usize>,
    last_request: Cell<Option<usize>>,
}

impl CountingAllocator {
    /// Makes every subsequent allocation fail.
    pub fn fail_allocations(&self) {
        self.fail.set(true);
    }

    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Number of buffers allocated and not yet released.
    pub fn live(&self) -> usize {
        self.allocated() - self.released()
    }

    /// Size in bytes of the last requested allocation.
    pub fn last_request(&self) -> Option<usize> {
        self.last_request.get()
    }
}

impl HostAllocator for CountingAllocator {
    fn allocate(&self, elements: usize) -> Result<Vec<f64>, AllocationError> {
        let bytes = elements
            .checked_mul(std::mem::size_of::<f64>())
            .unwrap_or(usize::max_value());
        self.last_request.set(Some(bytes));
        if bytes == usize::max_value() {
            return Err(AllocationError { bytes });
        }
        if self.fail.get() {
            return Err(AllocationError { bytes });
        }
        self.allocated.set(self.allocated.get() + 1);
        Ok(vec![0.0; elements])
    }

    fn release(&self, _: Vec<f64>) {
        self.released.set(self.released.get() + 1);
    }
}

/// A kernel pass that returns a fixed measurement, or fails.
#[derive(Debug)]
pub struct FakeKernel {
    outcome: Result<KernelMeasurement, DeviceQueryError>,
    calls: usize,
    last_len: Option<usize>,
    saw_zeroed_buffer: bool,
}

impl FakeKernel {
    /// A kernel reporting `measurement`.
    pub fn new(measurement: KernelMeasurement) -> Self {
        FakeKernel {
            outcome: Ok(measurement),
            calls: 0,
            last_len: None,
            saw_zeroed_buffer: false,
        }
    }

    /// A kernel failing with `error`.
    pub fn failing(error: DeviceQueryError) -> Self {
        FakeKernel {
            outcome: Err(error),
            ..FakeKernel::new(KernelMeasurement::default())
        }
    }

    /// Number of times the kernel was run.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Length of the buffer received by the last run.
    pub fn last_len(&self) -> Option<usize> {
        self.last_len
    }

    /// Indicates if the buffer received by the last run was zero-initialized.
    pub fn saw_zeroed_buffer(&self) -> bool {
        self.saw_zeroed_buffer
    }
}

impl TimedKernel for FakeKernel {
    fn run(&mut self, buffer: &mut [f64]) -> Result<KernelMeasurement, DeviceQueryError> {
        self.calls += 1;
        self.last_len = Some(buffer.len());
        self.saw_zeroed_buffer = buffer.iter().all(|&x| x == 0.0);
        self.outcome.clone()
    }
}
