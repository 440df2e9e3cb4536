use {
    crate::LoggerError,
    std::{fmt, str::FromStr},
};

/// Severity of a log line.
///
/// Levels are ordered by rank and the rank is their only semantic: a line is
/// emitted when its level is greater than or equal to the logger's minimum.
/// [`Level::Fatal`] has the highest rank, so it passes every filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    /// All levels, lowest rank first.
    pub const ALL: [Level; 5] = [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Fatal];

    /// Numeric rank, `1` for DEBUG up to `5` for FATAL.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Fixed-width (5 character) label used inside log lines.
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// The bare level name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        self.label().trim_end()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    /// Case-sensitive: `"warn"` or `" WARN"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| LoggerError::InvalidLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Level::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Fatal);
        assert_eq!(Level::ALL.iter().max(), Some(&Level::Fatal));
    }

    #[test]
    fn labels_are_five_characters_wide() {
        for level in Level::ALL {
            assert_eq!(level.label().len(), 5, "{level:?}");
        }
        assert_eq!(Level::Warn.to_string(), "WARN ");
        assert_eq!(Level::Info.as_str(), "INFO");
    }

    #[test]
    fn parses_exact_names_only() {
        assert_eq!("ERROR".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("FATAL".parse::<Level>().unwrap(), Level::Fatal);
        for bad in ["error", "Warn", "WARN ", "", "TRACE"] {
            assert!(
                matches!(bad.parse::<Level>(), Err(LoggerError::InvalidLevel(ref v)) if v == bad),
                "{bad:?} should be rejected"
            );
        }
    }
}
