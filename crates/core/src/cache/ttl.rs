use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Collection TTL used when nothing else is configured.
pub const DEFAULT_TTL: Ttl = Ttl::After(Duration::from_secs(300));

/// Shortest lifetime handed to a cache backend.
pub const MIN_TTL: Duration = Duration::from_secs(1);

/// Lifetime of a cached record.
///
/// `Never` keeps the record until it is explicitly evicted. It is only ever
/// chosen explicitly; resolution never falls back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ttl {
    /// Expire the record once the duration has elapsed. Must be positive;
    /// a zero duration is treated as [`MIN_TTL`].
    After(Duration),
    /// Keep the record indefinitely.
    Never,
}

impl Ttl {
    /// A TTL of `secs` seconds.
    pub const fn secs(secs: u64) -> Self {
        Ttl::After(Duration::from_secs(secs))
    }

    /// Returns the expiry duration, or `None` for `Never`.
    ///
    /// A zero `After` is raised to [`MIN_TTL`], so every backend sees the same
    /// positive lifetime.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Ttl::After(duration) if duration.is_zero() => Some(MIN_TTL),
            Ttl::After(duration) => Some(*duration),
            Ttl::Never => None,
        }
    }

    /// Resolves the TTL of one operation: the override wins over the default.
    pub fn resolve(default: Ttl, overridden: Option<Ttl>) -> Ttl {
        overridden.unwrap_or(default)
    }
}

impl Default for Ttl {
    fn default() -> Self {
        DEFAULT_TTL
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::After(duration) => write!(f, "{}s", duration.as_secs()),
            Ttl::Never => f.write_str("never"),
        }
    }
}

/// Error returned when a TTL string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid TTL '{0}': expected a positive number of seconds or 'never'")]
pub struct ParseTtlError(pub String);

impl FromStr for Ttl {
    type Err = ParseTtlError;

    /// Parses `"never"` or a positive number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("never") {
            return Ok(Ttl::Never);
        }
        match trimmed.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Ttl::secs(secs)),
            _ => Err(ParseTtlError(s.to_string())),
        }
    }
}
