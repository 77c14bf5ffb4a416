//! Process boundary for unrecoverable errors.
//!
//! Library code only returns `Result`s. Binaries route them through `exit_on_error`, which
//! reports the failure and terminates: a benchmark computed on a partially failed device
//! context would be meaningless, so nothing is retried.
use failure::Fail;
use log::error;
use std::fmt;
use std::io::{self, Write};

/// Exit code used when a benchmark run is aborted.
pub const EXIT_FAILURE: i32 = 1;

/// Writes the error and its causes to `out`, one per line.
pub fn write_error<W: Write, E: Fail + ?Sized>(out: &mut W, err: &E) -> io::Result<()> {
    writeln!(out, "{}", err)?;
    let mut cause = err.cause();
    while let Some(inner) = cause {
        // `Error` variants wrap their cause with the same message.
        if inner.to_string() != err.to_string() {
            writeln!(out, "  caused by: {}", inner)?;
        }
        cause = inner.cause();
    }
    Ok(())
}

/// Unwraps `result`, or logs the error, prints it on stderr and exits the process.
pub fn exit_on_error<T, E: Fail>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("{}", err);
            let stderr = io::stderr();
            let _ = write_error(&mut stderr.lock(), &err);
            std::process::exit(EXIT_FAILURE)
        }
    }
}

/// Displays a byte count in whole mebibytes, rounding down.
pub struct Mebibytes(pub u64);

impl fmt::Display for Mebibytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}MB", self.0 / (1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceQueryError, Error};

    #[test]
    fn mebibytes_round_down() {
        assert_eq!(Mebibytes(8 * 1024 * 1024).to_string(), "8MB");
        assert_eq!(Mebibytes(8 * 1024 * 1024 - 1).to_string(), "7MB");
    }

    #[test]
    fn write_error_skips_duplicate_causes() {
        let err: Error = DeviceQueryError::new("HIP", "hipSetDevice(0)", 101, "invalid device")
            .at("executor.rs", 7)
            .into();
        let mut out = Vec::new();
        write_error(&mut out, &err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HIP error in file 'executor.rs' in line 7 : invalid device.\n"
        );
    }
}
