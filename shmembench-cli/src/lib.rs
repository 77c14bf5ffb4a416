pub mod config;

use std::io::{self, Write};
use std::path::PathBuf;

use failure::Fail;
use log::info;
use structopt::StructOpt;

use shmembench::device::fake::{FakeKernel, FakeRuntime};
use shmembench::report::{self, MeasurementReport};
use shmembench::{run_benchmark, RunSummary, Runtime, SystemAllocator, TimedKernel};

use crate::config::{Backend, Config};

/// Measures the shared memory bandwidth of the first GPU.
#[derive(Debug, StructOpt)]
#[structopt(name = "shmembench")]
pub struct Opt {
    /// Path to the configuration file to use.
    ///
    /// Configuration file must be in TOML format.
    #[structopt(parse(from_os_str), long = "config")]
    pub config_path: Option<PathBuf>,

    /// Runtime to use: hip, cuda or fake.
    #[structopt(long = "backend")]
    pub backend: Option<Backend>,

    /// Number of f64 elements in the working set.
    #[structopt(long = "elements")]
    pub elements: Option<usize>,

    /// Print the results as JSON.
    #[structopt(long = "json")]
    pub json: bool,
}

impl Opt {
    /// Loads the configuration and applies the command line overrides.
    pub fn config(&self) -> Result<Config, CliError> {
        let mut config = Config::load(self.config_path.as_ref().map(|p| p.as_path()))?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(elements) = self.elements {
            config.working_set_elements = elements;
        }
        config.json |= self.json;
        Ok(config)
    }
}

#[derive(Debug, Fail)]
pub enum CliError {
    #[fail(display = "invalid configuration: {}", _0)]
    Config(#[cause] ::config::ConfigError),
    #[fail(display = "{}", _0)]
    HipInit(#[cause] shmembench_hip::InitError),
    #[fail(display = "{}", _0)]
    CudaInit(#[cause] shmembench_cuda::InitError),
    #[fail(display = "{}", _0)]
    Benchmark(#[cause] shmembench::Error),
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
    #[fail(display = "failed to serialize the results: {}", _0)]
    Json(#[cause] serde_json::Error),
}

macro_rules! from_error {
    ($($error:ty => $variant:ident),*) => {
        $(impl From<$error> for CliError {
            fn from(error: $error) -> Self {
                CliError::$variant(error)
            }
        })*
    };
}

from_error! {
    ::config::ConfigError => Config,
    shmembench_hip::InitError => HipInit,
    shmembench_cuda::InitError => CudaInit,
    shmembench::Error => Benchmark,
    io::Error => Io,
    serde_json::Error => Json
}

/// Runs the benchmark on the backend selected by `config`, writing the report to `out`.
pub fn run(config: &Config, out: &mut dyn Write) -> Result<RunSummary, CliError> {
    info!("running on the {:?} backend", config.backend);
    match config.backend {
        Backend::Hip => {
            let executor = shmembench_hip::Executor::try_init()?;
            bench(config, &executor, &mut executor.kernel(), out)
        }
        Backend::Cuda => {
            let executor = shmembench_cuda::Executor::try_init()?;
            bench(config, &executor, &mut executor.kernel(), out)
        }
        Backend::Fake => {
            let fake = &config.fake;
            let runtime = FakeRuntime::new(fake.vendor, vec![fake.device.clone()]);
            if fake.fail_device_selection {
                runtime.fail_set_device();
            }
            bench(config, &runtime, &mut FakeKernel::new(fake.measurement), out)
        }
    }
}

fn bench(
    config: &Config,
    runtime: &dyn Runtime,
    kernel: &mut dyn TimedKernel,
    out: &mut dyn Write,
) -> Result<RunSummary, CliError> {
    let elements = config.working_set_elements;
    if config.json {
        let summary =
            run_benchmark(runtime, &SystemAllocator, kernel, elements, &mut io::sink())?;
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        Ok(summary)
    } else {
        writeln!(out, "{}", report::banner(runtime.vendor()))?;
        let summary = run_benchmark(runtime, &SystemAllocator, kernel, elements, out)?;
        write!(out, "{}", MeasurementReport(&summary.result))?;
        Ok(summary)
    }
}
