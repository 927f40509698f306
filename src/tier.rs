//! src/tier.rs
//! Debug tier values and their strict range validation.

use std::fmt;

use thiserror::Error;

/// Severity tier attached to a single debug message.
///
/// Tier 1 is the most verbose and is emitted under every threshold; tier 5 is
/// the least verbose. A tier is valid only within `1..=5` and can only be
/// obtained through [`Tier::new`] or the named constants, so every `Tier`
/// value in the program is in range by construction.
///
/// # Examples
///
/// ```
/// use tiered_debug::Tier;
///
/// let tier = Tier::new(3)?;
/// assert_eq!(tier, Tier::Lv3);
/// assert_eq!(tier.get(), 3);
/// assert!(Tier::new(0).is_err());
/// assert!(Tier::new(6).is_err());
/// # Ok::<(), tiered_debug::TierRangeError>(())
/// ```
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// Tier 1, emitted under every threshold.
    Lv1 = 1,
    /// Tier 2, emitted when the threshold is 2 or higher.
    Lv2 = 2,
    /// Tier 3, emitted when the threshold is 3 or higher.
    Lv3 = 3,
    /// Tier 4, emitted when the threshold is 4 or higher.
    Lv4 = 4,
    /// Tier 5, emitted only when the threshold is 5.
    Lv5 = 5,
}

impl Tier {
    /// Smallest valid tier.
    pub const MIN: Self = Self::Lv1;

    /// Largest valid tier.
    pub const MAX: Self = Self::Lv5;

    /// Validates `value` and returns the corresponding tier.
    ///
    /// Values outside `1..=5` fail with [`TierRangeError`]; they are never
    /// clamped to a default.
    pub const fn new(value: u8) -> Result<Self, TierRangeError> {
        match value {
            1 => Ok(Self::Lv1),
            2 => Ok(Self::Lv2),
            3 => Ok(Self::Lv3),
            4 => Ok(Self::Lv4),
            5 => Ok(Self::Lv5),
            _ => Err(TierRangeError { value }),
        }
    }

    /// Returns the tier as its integer value in `1..=5`.
    #[must_use]
    pub const fn get(self) -> u8 {
        self as u8
    }

    /// Returns the message prefix used for records at this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lv1 => "DEBUG1",
            Self::Lv2 => "DEBUG2",
            Self::Lv3 => "DEBUG3",
            Self::Lv4 => "DEBUG4",
            Self::Lv5 => "DEBUG5",
        }
    }

    /// Decodes a raw byte previously produced by [`Tier::get`].
    ///
    /// Callers must only pass bytes that originated from a valid tier; the
    /// out-of-range arms exist to keep the decode total.
    pub(crate) const fn from_raw(value: u8) -> Self {
        match value {
            2 => Self::Lv2,
            3 => Self::Lv3,
            4 => Self::Lv4,
            5 => Self::Lv5,
            _ => Self::Lv1,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Tier {
    type Error = TierRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Error returned when a tier or threshold value falls outside `1..=5`.
///
/// Raised synchronously at the call that supplied the bad value; no gate or
/// logger state is mutated when construction fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("debug tier must be between 1 and 5, got {value}")]
pub struct TierRangeError {
    value: u8,
}

impl TierRangeError {
    /// Returns the rejected value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.value
    }
}
