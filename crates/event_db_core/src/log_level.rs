#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Unset or unrecognised values fall back to `Debug`.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_uppercase()).as_deref() {
            Some("INFO") => Self::Info,
            Some("WARNING") => Self::Warning,
            Some("ERROR") => Self::Error,
            Some("CRITICAL") => Self::Critical,
            _ => Self::Debug,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(LogLevel::from_env_value(Some("info")), LogLevel::Info);
        assert_eq!(LogLevel::from_env_value(Some(" Warning ")), LogLevel::Warning);
        assert_eq!(LogLevel::from_env_value(Some("CRITICAL")), LogLevel::Critical);
    }

    #[test]
    fn invalid_or_missing_falls_back_to_debug() {
        assert_eq!(LogLevel::from_env_value(None), LogLevel::Debug);
        assert_eq!(LogLevel::from_env_value(Some("verbose")), LogLevel::Debug);
        assert_eq!(LogLevel::from_env_value(Some("WARN")), LogLevel::Debug);
    }
}
