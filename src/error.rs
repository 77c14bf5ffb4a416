//! Errors raised while querying the accelerator or running the benchmark.
use failure::Fail;
use serde::Serialize;
use std::fmt;
use std::io;

/// Position in the source code of a failing runtime call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

/// A call to the accelerator runtime returned a non-success status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceQueryError {
    /// Name of the runtime API, as printed in front of the error ("HIP", "Cuda").
    pub api: &'static str,
    /// The runtime call that failed.
    pub call: String,
    /// Raw status code returned by the runtime.
    pub code: i32,
    /// Textual description of `code`, provided by the runtime.
    pub description: String,
    /// Where the call was issued, when known.
    pub location: Option<Location>,
}

impl DeviceQueryError {
    /// Creates an error without a source location.
    pub fn new<S, D>(api: &'static str, call: S, code: i32, description: D) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        DeviceQueryError {
            api,
            call: call.into(),
            code,
            description: description.into(),
            location: None,
        }
    }

    /// Attaches the location of the failing call.
    pub fn at(mut self, file: &'static str, line: u32) -> Self {
        self.location = Some(Location { file, line });
        self
    }
}

impl fmt::Display for DeviceQueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.location {
            Some(Location { file, line }) => write!(
                f,
                "{} error in file '{}' in line {} : {}.",
                self.api, file, line, self.description
            ),
            None => write!(
                f,
                "{} error in call '{}' : {}.",
                self.api, self.call, self.description
            ),
        }
    }
}

impl Fail for DeviceQueryError {}

/// The host buffer could not be allocated.
#[derive(Clone, Copy, Debug, Fail, PartialEq, Eq)]
#[fail(display = "failed to allocate {} bytes of host memory", bytes)]
pub struct AllocationError {
    pub bytes: usize,
}

/// Errors that abort a benchmark run.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{}", _0)]
    DeviceQuery(#[cause] DeviceQueryError),
    #[fail(display = "{}", _0)]
    Allocation(#[cause] AllocationError),
    #[fail(display = "cannot write the report: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<DeviceQueryError> for Error {
    fn from(error: DeviceQueryError) -> Error {
        Error::DeviceQuery(error)
    }
}

impl From<AllocationError> for Error {
    fn from(error: AllocationError) -> Error {
        Error::Allocation(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}
