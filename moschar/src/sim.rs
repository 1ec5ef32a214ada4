//! Batch-mode invocation of the external ngspice simulator.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::log::info;

/// Handle for the external ngspice executable.
pub struct Ngspice {
    executable: PathBuf,
}

impl Default for Ngspice {
    fn default() -> Self {
        Self::new()
    }
}

impl Ngspice {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("ngspice"),
        }
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Runs the simulator in batch mode on `netlist`, directing the raw
    /// output to `rawfile`. The netlist is not modified.
    pub fn run(&self, netlist: impl AsRef<Path>, rawfile: impl AsRef<Path>) -> Result<()> {
        let netlist = netlist.as_ref();
        let rawfile = rawfile.as_ref();

        info!("running {:?} on {:?}", self.executable, netlist);
        let status = with_err_context(
            Command::new(&self.executable)
                .arg("-n")
                .arg("-b")
                .arg("-r")
                .arg(rawfile)
                .arg(netlist)
                .status(),
            || ErrorContext::Task(arcstr::format!("launching {:?}", self.executable)),
        )?;

        if !status.success() {
            return Err(ErrorSource::Internal(format!(
                "simulator exited with status {status}"
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn missing_executable_is_reported() {
        let tmp = TempDir::new("sim").unwrap();
        let sim = Ngspice::with_executable("/nonexistent/ngspice");
        let err = sim
            .run(tmp.path().join("a.cir"), tmp.path().join("a.raw"))
            .unwrap_err();
        assert!(matches!(err.source(), ErrorSource::Io(_)));
    }

    #[test]
    fn failing_simulator_is_reported() {
        let tmp = TempDir::new("sim").unwrap();
        // `false` takes any arguments and exits non-zero.
        let sim = Ngspice::with_executable("false");
        let err = sim
            .run(tmp.path().join("a.cir"), tmp.path().join("a.raw"))
            .unwrap_err();
        assert!(matches!(err.source(), ErrorSource::Internal(_)));
    }
}
