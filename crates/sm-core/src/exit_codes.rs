//! Process exit codes for the sm-core binary.
//!
//! - 0-9: the run completed; the code says how much of it fitted
//! - 10-19: bad invocation or unreadable input, fixable by the caller
//! - 20-29: nothing usable was produced, or a bug

/// Stable exit codes. Scripts should branch on these, not on stderr text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every key fitted.
    Clean = 0,
    /// At least one key fitted and at least one failed.
    PartialFail = 3,
    /// Bad flags or configuration.
    ArgsError = 10,
    /// The event log is missing, unreadable or not valid JSON.
    InputError = 12,
    /// Serialization or other unexpected failure.
    InternalError = 20,
    /// No key produced a distribution.
    NothingFitted = 21,
}

impl ExitCode {
    /// Outcome of a mining run from its fitted and failed key counts.
    pub fn for_outcome(fitted: usize, failed: usize) -> Self {
        match (fitted, failed) {
            (0, _) => ExitCode::NothingFitted,
            (_, 0) => ExitCode::Clean,
            _ => ExitCode::PartialFail,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// True for 10-19.
    pub fn is_caller_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Anything other than a clean or partial run.
    pub fn is_failure(self) -> bool {
        self.as_i32() >= 10
    }

    /// Name used in the `status` field of JSON payloads.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialFail => "OK_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::NothingFitted => "ERR_NOTHING_FITTED",
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.code_name(), self.as_i32())
    }
}
