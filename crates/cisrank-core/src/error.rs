use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    InputParseError,
    ConfigParseError,
    ConflictingArguments,
    InvalidArgument,
    CycleResolutionIncomplete,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::InputParseError => "E1002",
            Self::ConfigParseError => "E1003",
            Self::ConflictingArguments => "E2001",
            Self::InvalidArgument => "E2002",
            Self::CycleResolutionIncomplete => "E3001",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Input file not found",
            Self::InputParseError => "Input is not a valid component map",
            Self::ConfigParseError => "Config file parse error",
            Self::ConflictingArguments => "Conflicting arguments",
            Self::InvalidArgument => "Invalid argument value",
            Self::CycleResolutionIncomplete => "Cycle resolution did not converge",
            Self::OutputWriteFailed => "Output file write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => {
                Some("Check the --input path points at the scanner's JSON output.")
            }
            Self::InputParseError => {
                Some("Expected an object keyed by component ID with component_type and depends_on.")
            }
            Self::ConfigParseError => Some("Fix syntax in cisrank.toml and retry."),
            Self::ConflictingArguments => {
                Some("Use only one of --print-top or --print-top-percent.")
            }
            Self::InvalidArgument => {
                Some("Weights must be non-negative and the damping factor must lie in [0, 1].")
            }
            Self::CycleResolutionIncomplete => None,
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 8] = [
        ErrorCode::InputNotFound,
        ErrorCode::InputParseError,
        ErrorCode::ConfigParseError,
        ErrorCode::ConflictingArguments,
        ErrorCode::InvalidArgument,
        ErrorCode::CycleResolutionIncomplete,
        ErrorCode::OutputWriteFailed,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
            assert_eq!(code.to_string(), text);
        }
    }
}
