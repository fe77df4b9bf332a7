//! Process exit codes and structured error reporting.

use serde::Serialize;

/// Exit codes reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and duplicates were found
    Success = 0,
    /// Unexpected or fatal error
    GeneralError = 1,
    /// Scan completed normally but no duplicates were found
    NoDuplicates = 2,
    /// Scan completed but some entries could not be read
    PartialSuccess = 3,
    /// Interrupted by the user (SIGINT)
    Interrupted = 130,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable error code prefix used in structured output.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            ExitCode::Success => "DD000",
            ExitCode::GeneralError => "DD001",
            ExitCode::NoDuplicates => "DD002",
            ExitCode::PartialSuccess => "DD003",
            ExitCode::Interrupted => "DD130",
        }
    }
}

/// Machine-readable error payload for JSON output mode.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: &'static str,
    pub exit_code: i32,
    pub message: String,
    pub interrupted: bool,
}

impl StructuredError {
    #[must_use]
    pub fn new(error: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", error),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_code_prefixes() {
        assert_eq!(ExitCode::GeneralError.code_prefix(), "DD001");
        assert_eq!(ExitCode::Interrupted.code_prefix(), "DD130");
    }

    #[test]
    fn test_structured_error_serializes() {
        let err = anyhow::anyhow!("root not found");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        let json = serde_json::to_value(&structured).unwrap();
        assert_eq!(json["code"], "DD001");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["interrupted"], false);
        assert!(json["message"].as_str().unwrap().contains("root not found"));
    }

    #[test]
    fn test_structured_error_interrupted_flag() {
        let err = anyhow::anyhow!("interrupted");
        let structured = StructuredError::new(&err, ExitCode::Interrupted);
        assert!(structured.interrupted);
        assert_eq!(structured.exit_code, 130);
    }
}
