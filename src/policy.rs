use core::fmt;
use core::str::FromStr;

use crate::FilterError;

/// What pixel arithmetic does with a result outside `[0, 2^W - 1]`.
///
/// Every arithmetic entry point takes the policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Clamp to `[0, 2^W - 1]`.
    Saturation,
    /// Reduce modulo `2^W`.
    Wrap,
}

impl TryFrom<u8> for OverflowPolicy {
    type Error = FilterError;

    /// `0` is saturation, `1` is wrap.
    fn try_from(value: u8) -> Result<Self, FilterError> {
        match value {
            0 => Ok(Self::Saturation),
            1 => Ok(Self::Wrap),
            _ => Err(FilterError::InvalidPolicy),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, FilterError> {
        if s.eq_ignore_ascii_case("saturation") || s.eq_ignore_ascii_case("saturate") {
            Ok(Self::Saturation)
        } else if s.eq_ignore_ascii_case("wrap") {
            Ok(Self::Wrap)
        } else {
            Err(FilterError::InvalidPolicy)
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Saturation => "saturation",
            Self::Wrap => "wrap",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8() {
        assert_eq!(OverflowPolicy::try_from(0), Ok(OverflowPolicy::Saturation));
        assert_eq!(OverflowPolicy::try_from(1), Ok(OverflowPolicy::Wrap));
        assert_eq!(OverflowPolicy::try_from(2), Err(FilterError::InvalidPolicy));
    }

    #[test]
    fn parse_and_display() {
        for policy in [OverflowPolicy::Saturation, OverflowPolicy::Wrap] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
        assert_eq!("WRAP".parse(), Ok(OverflowPolicy::Wrap));
        assert_eq!(
            "clamp".parse::<OverflowPolicy>(),
            Err(FilterError::InvalidPolicy)
        );
    }
}
