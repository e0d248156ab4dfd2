use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    MissingHeader,
    InvalidCount,
    TruncatedEdgeList,
    ConfigUnreadable,
    ConfigParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::MissingHeader => "E1002",
            Self::InvalidCount => "E1003",
            Self::TruncatedEdgeList => "E1004",
            Self::ConfigParseError => "E2001",
            Self::ConfigUnreadable => "E2002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Input could not be read",
            Self::MissingHeader => "Missing vertex/edge count header",
            Self::InvalidCount => "Invalid vertex or edge count",
            Self::TruncatedEdgeList => "Edge list ended early",
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigUnreadable => "Config file could not be read",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the input path and read permissions."),
            Self::MissingHeader => {
                Some("Start the input with the vertex count and the edge count.")
            }
            Self::InvalidCount => Some("Counts must be non-negative integers."),
            Self::TruncatedEdgeList => {
                Some("Provide one `from to` pair per declared edge.")
            }
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::ConfigUnreadable => Some("Check the --config path and read permissions."),
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

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::InputUnreadable,
            ErrorCode::MissingHeader,
            ErrorCode::InvalidCount,
            ErrorCode::TruncatedEdgeList,
            ErrorCode::ConfigUnreadable,
            ErrorCode::ConfigParseError,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn config_hints_do_not_assume_a_file_name() {
        for code in [ErrorCode::ConfigUnreadable, ErrorCode::ConfigParseError] {
            let hint = code.hint().unwrap_or_default();
            assert!(!hint.contains("garrison.toml"), "{code}: {hint}");
        }
        assert_ne!(
            ErrorCode::ConfigUnreadable.code(),
            ErrorCode::ConfigParseError.code()
        );
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::TruncatedEdgeList.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
