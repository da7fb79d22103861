//! Output values, in satoshis, checked against the money range.
//!
//! Every [`Amount`] is within the range of its [`Constraint`]. Operations that
//! could leave that range return a [`Result`](std::result::Result) instead of
//! wrapping or panicking.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    io,
    marker::PhantomData,
    ops::RangeInclusive,
};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::serialization::DvtSerialize;

#[cfg(test)]
mod tests;

/// The result of an amount operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Number of satoshis in 1 DVT.
pub const COIN: i64 = 100_000_000;

/// The largest value an output can hold.
pub const MAX_MONEY: i64 = 2_000_000_000 * COIN;

/// A satoshi value that has been checked against the range of `C`.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "i64")]
#[serde(into = "i64")]
#[serde(bound = "C: Constraint + Clone")]
pub struct Amount<C = NonNegative>(i64, #[serde(skip)] PhantomData<C>);

/// The range an [`Amount`] must stay within.
pub trait Constraint {
    /// Returns the valid satoshi values.
    fn valid_range() -> RangeInclusive<i64>;

    /// Returns `value` if it is in the valid range.
    fn validate(value: i64) -> Result<i64> {
        let range = Self::valid_range();

        if range.contains(&value) {
            Ok(value)
        } else {
            Err(Error::Constraint { value, range })
        }
    }
}

/// Output values: zero up to [`MAX_MONEY`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NonNegative;

impl Constraint for NonNegative {
    fn valid_range() -> RangeInclusive<i64> {
        0..=MAX_MONEY
    }
}

/// An invalid amount, or an invalid amount operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value is outside the money range.
    #[error("{value} satoshis is outside the valid amount range {range:?}")]
    Constraint {
        /// The rejected value.
        value: i64,
        /// The valid range.
        range: RangeInclusive<i64>,
    },

    /// The value does not fit in an `i64`.
    #[error("{value} does not fit in an i64 amount")]
    Convert {
        /// The rejected value.
        value: i128,
        /// The conversion failure.
        source: std::num::TryFromIntError,
    },

    /// Division by zero.
    #[error("cannot divide {amount} satoshis by zero")]
    DivideByZero {
        /// The dividend.
        amount: i64,
    },
}

impl Amount<NonNegative> {
    /// Returns an amount of `coins` whole coins.
    ///
    /// # Panics
    ///
    /// If the value is outside the money range. Only use this function with constants.
    pub const fn new_from_coins(coins: i64) -> Self {
        Self::new(match coins.checked_mul(COIN) {
            Some(satoshis) => satoshis,
            None => panic!("coin amount should fit in i64"),
        })
    }

    /// Returns an amount of `satoshis`.
    ///
    /// # Panics
    ///
    /// If the value is outside the money range. Only use this function with constants.
    pub const fn new(satoshis: i64) -> Self {
        assert!(satoshis >= 0 && satoshis <= MAX_MONEY);
        Self(satoshis, PhantomData)
    }
}

impl<C> Amount<C> {
    /// Returns the number of satoshis in this amount.
    pub fn satoshis(&self) -> i64 {
        self.0
    }

    /// Returns the number of whole coins in this amount, rounded down.
    ///
    /// Only used for logging.
    pub fn whole_coins(&self) -> i64 {
        self.0 / COIN
    }

    /// Returns the little-endian bytes of the satoshi value.
    pub fn to_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Decodes little-endian satoshi bytes, checking the range.
    pub fn from_bytes(bytes: [u8; 8]) -> Result<Amount<C>>
    where
        C: Constraint,
    {
        i64::from_le_bytes(bytes).try_into()
    }

    /// Returns a zero amount.
    pub fn zero() -> Amount<C>
    where
        C: Constraint,
    {
        Amount(0, PhantomData)
    }
}

impl<C: Constraint> Default for Amount<C> {
    fn default() -> Self {
        Amount::zero()
    }
}

impl<C> fmt::Display for Amount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<C> fmt::Debug for Amount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Amount").field(&self.0).finish()
    }
}

impl<C: Constraint> std::ops::Add<Amount<C>> for Amount<C> {
    type Output = Result<Amount<C>>;

    fn add(self, rhs: Amount<C>) -> Self::Output {
        // Both values are in the money range, so the sum fits in an i128.
        (i128::from(self.0) + i128::from(rhs.0)).try_into()
    }
}

impl<C: Constraint> std::ops::Div<u64> for Amount<C> {
    type Output = Result<Amount<C>>;

    fn div(self, rhs: u64) -> Self::Output {
        if rhs == 0 {
            return Err(Error::DivideByZero { amount: self.0 });
        }

        (i128::from(self.0) / i128::from(rhs)).try_into()
    }
}

impl<C> From<Amount<C>> for i64 {
    fn from(amount: Amount<C>) -> Self {
        amount.0
    }
}

impl<C: Constraint> TryFrom<i64> for Amount<C> {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        C::validate(value).map(|value| Amount(value, PhantomData))
    }
}

/// Used for the intermediate results of reward calculations.
impl<C: Constraint> TryFrom<i128> for Amount<C> {
    type Error = Error;

    fn try_from(value: i128) -> Result<Self> {
        let value: i64 = value
            .try_into()
            .map_err(|source| Error::Convert { value, source })?;

        value.try_into()
    }
}

impl<C> Hash for Amount<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<C> PartialEq for Amount<C> {
    fn eq(&self, other: &Amount<C>) -> bool {
        self.0 == other.0
    }
}

impl<C> PartialEq<i64> for Amount<C> {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl<C> Eq for Amount<C> {}

impl<C> PartialOrd for Amount<C> {
    fn partial_cmp(&self, other: &Amount<C>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Amount<C> {
    fn cmp(&self, other: &Amount<C>) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(any(test, feature = "proptest-impl"))]
impl<C> proptest::arbitrary::Arbitrary for Amount<C>
where
    C: Constraint + fmt::Debug,
{
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        C::valid_range()
            .prop_map(|value| Amount(value, PhantomData))
            .boxed()
    }

    type Strategy = proptest::strategy::BoxedStrategy<Self>;
}

impl DvtSerialize for Amount<NonNegative> {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> std::result::Result<(), io::Error> {
        writer.write_i64::<LittleEndian>(self.0)
    }
}
