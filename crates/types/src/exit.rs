//! Process exit statuses

/// Exit status reported to whatever supervises the server process.
///
/// Every failure category gets its own non-zero code so scripts can tell a
/// clean run apart from a misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Internal,
    Filesystem,
    Parse,
    Validation,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Internal => 1,
            ExitStatus::Filesystem => 2,
            ExitStatus::Parse => 3,
            ExitStatus::Validation => 4,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}
