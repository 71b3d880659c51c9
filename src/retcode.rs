use std::fmt;

use crate::error::{Error, Result};
use crate::ffi;

/// Status returned by every native call.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HighsStatus {
    /// The call succeeded.
    Ok,
    /// The call succeeded but the solver emitted a warning.
    Warning,
    /// The call failed.
    Error,
}

impl HighsStatus {
    /// Returns the code used for this status at the C ABI (`0`, `1` or `2`).
    pub fn code(self) -> i32 {
        match self {
            HighsStatus::Ok => 0,
            HighsStatus::Warning => 1,
            HighsStatus::Error => 2,
        }
    }

    /// Parses a C ABI status code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(HighsStatus::Ok),
            1 => Some(HighsStatus::Warning),
            2 => Some(HighsStatus::Error),
            _ => None,
        }
    }

    /// Returns `true` unless the status is `Error`.
    pub fn is_success(self) -> bool {
        self != HighsStatus::Error
    }
}

#[allow(non_upper_case_globals)]
impl TryFrom<ffi::HighsInt> for HighsStatus {
    type Error = Error;

    fn try_from(val: ffi::HighsInt) -> Result<Self> {
        match val {
            ffi::kHighsStatusOk => Ok(HighsStatus::Ok),
            ffi::kHighsStatusWarning => Ok(HighsStatus::Warning),
            ffi::kHighsStatusError => Ok(HighsStatus::Error),
            other => Err(Error::native(
                "status conversion",
                format!("unrecognized native status {other}"),
            )),
        }
    }
}

/// Translates the status returned by the native call `operation`.
pub(crate) fn check_status(status: ffi::HighsInt, operation: &'static str) -> Result<HighsStatus> {
    let status = HighsStatus::try_from(status).map_err(|_| {
        Error::native(operation, format!("returned unrecognized status {status}"))
    })?;
    match status {
        HighsStatus::Ok => {}
        HighsStatus::Warning => {
            tracing::warn!(component = "highs", operation, "HiGHS emitted a warning")
        }
        HighsStatus::Error => {
            tracing::error!(component = "highs", operation, "HiGHS returned an error status")
        }
    }
    Ok(status)
}

impl fmt::Display for HighsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HighsStatus::Ok => "OK",
            HighsStatus::Warning => "Warning",
            HighsStatus::Error => "Error",
        };
        f.write_str(s)
    }
}
