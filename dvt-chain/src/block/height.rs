use std::ops::{Add, Sub};

use crate::serialization::SerializationError;

#[cfg(any(test, feature = "proptest-impl"))]
use proptest::prelude::*;

/// The length of the chain back to the genesis block.
///
/// Block heights can't be added, but they can be *subtracted*,
/// to get a difference of block heights, represented as an `i64`,
/// and adjusted by that difference.
pub type HeightDiff = i64;

/// The height of a block is the length of the chain back to the genesis block.
///
/// # Invariants
///
/// Users should not construct block heights greater than `Height::MAX`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height(pub u32);

impl std::str::FromStr for Height {
    type Err = SerializationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse() {
            Ok(h) if (Height(h) <= Height::MAX) => Ok(Height(h)),
            Ok(_) => Err(SerializationError::Parse("Height exceeds maximum height")),
            Err(_) => Err(SerializationError::Parse("Height(u32) integer parse error")),
        }
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Height {
    /// The minimum Height.
    ///
    /// Due to the underlying type, it is impossible to construct block heights
    /// less than `Height::MIN`.
    pub const MIN: Height = Height(0);

    /// The maximum Height.
    ///
    /// Users should not construct block heights greater than `Height::MAX`.
    pub const MAX: Height = Height(499_999_999);

    /// Returns the next [`Height`].
    ///
    /// # Panics
    ///
    /// - If the current height is at its maximum.
    pub fn next(self) -> Height {
        (self + 1).expect("next height should be valid")
    }
}

#[cfg(any(test, feature = "proptest-impl"))]
impl Arbitrary for Height {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (Height::MIN.0..=Height::MAX.0).prop_map(Height).boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

// Block heights live in a 1-dimensional space, so we only need to define
// subtraction between heights, and adjustment by a difference.

impl Sub<Height> for Height {
    type Output = HeightDiff;

    /// Subtract two heights, returning an `i64` that can be negative.
    fn sub(self, rhs: Height) -> Self::Output {
        HeightDiff::from(self.0) - HeightDiff::from(rhs.0)
    }
}

impl Sub<HeightDiff> for Height {
    type Output = Option<Height>;

    /// Subtract a height difference from a height, returning `None` if the
    /// resulting height is outside the valid `Height` range.
    fn sub(self, rhs: HeightDiff) -> Option<Height> {
        let lhs = HeightDiff::from(self.0);
        let res = lhs.checked_sub(rhs)?;
        let res = u32::try_from(res).ok()?;
        let res = Height(res);

        (res <= Height::MAX).then_some(res)
    }
}

impl Add<HeightDiff> for Height {
    type Output = Option<Height>;

    /// Add a height difference to a height, returning `None` if the
    /// resulting height is outside the valid `Height` range.
    fn add(self, rhs: HeightDiff) -> Option<Height> {
        let lhs = HeightDiff::from(self.0);
        let res = lhs.checked_add(rhs)?;
        let res = u32::try_from(res).ok()?;
        let res = Height(res);

        (res <= Height::MAX).then_some(res)
    }
}
