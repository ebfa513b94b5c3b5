//! Fixed-point decimal arithmetic with 18 fractional digits, used for pool weights, fees
//! and the weighted invariant.
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core::primitives::prelude::*;
use primitive_types::{U256, U512};

use crate::error::InterchainSwapError;
use crate::Amount;

/// Number of fractional digits carried by [`Decimal`].
pub const DECIMAL_PLACES: usize = 18;

const DECIMAL_FRACTIONAL: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Bound on the number of square roots taken to bring a base into the
/// convergence range of the binomial series.
const MAX_RANGE_REDUCTIONS: usize = 64;

/// Bound on the number of binomial series terms.
const MAX_SERIES_TERMS: u64 = 300;

/// An unsigned fixed-point number with 18 fractional digits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(U256);

impl Decimal {
    pub const fn zero() -> Self {
        Self(U256([0, 0, 0, 0]))
    }

    pub const fn one() -> Self {
        Self(DECIMAL_FRACTIONAL)
    }

    /// Creates a decimal from its raw representation, i.e. the value times 10^18.
    pub const fn raw(atomics: U256) -> Self {
        Self(atomics)
    }

    /// Returns the raw representation, i.e. the value times 10^18.
    pub fn atomics(&self) -> U256 {
        self.0
    }

    pub fn percent(value: u64) -> Self {
        Self(U256::from(value) * U256::from(10_000_000_000_000_000u64))
    }

    pub fn permille(value: u64) -> Self {
        Self(U256::from(value) * U256::from(1_000_000_000_000_000u64))
    }

    /// Creates a decimal from basis points, so that `bps(10_000) == one()`.
    pub fn bps(value: u64) -> Self {
        Self(U256::from(value) * U256::from(100_000_000_000_000u64))
    }

    /// Returns `numerator / denominator`, rounding down.
    pub fn from_ratio(
        numerator: impl Into<U256>,
        denominator: impl Into<U256>,
    ) -> Result<Self, InterchainSwapError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(InterchainSwapError::DivisionByZero);
        }
        let scaled = numerator.into().full_mul(DECIMAL_FRACTIONAL) / U512::from(denominator);
        narrow(scaled).map(Self)
    }

    /// Converts a token amount into a decimal of the same value.
    pub fn from_amount(amount: Amount) -> Result<Self, InterchainSwapError> {
        amount
            .as_ref()
            .checked_mul(DECIMAL_FRACTIONAL)
            .map(Self)
            .ok_or(InterchainSwapError::Overflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, InterchainSwapError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(InterchainSwapError::Overflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, InterchainSwapError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(InterchainSwapError::Overflow)
    }

    pub fn checked_mul(self, rhs: Self) -> Result<Self, InterchainSwapError> {
        narrow(self.0.full_mul(rhs.0) / U512::from(DECIMAL_FRACTIONAL)).map(Self)
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, InterchainSwapError> {
        if rhs.is_zero() {
            return Err(InterchainSwapError::DivisionByZero);
        }
        narrow(self.0.full_mul(DECIMAL_FRACTIONAL) / U512::from(rhs.0)).map(Self)
    }

    /// Returns `|self - rhs|`.
    pub fn abs_diff(self, rhs: Self) -> Self {
        if self >= rhs {
            Self(self.0 - rhs.0)
        } else {
            Self(rhs.0 - self.0)
        }
    }

    /// Multiplies a token amount by this decimal, rounding down.
    pub fn mul_floor(self, amount: Amount) -> Result<Amount, InterchainSwapError> {
        narrow(amount.as_ref().full_mul(self.0) / U512::from(DECIMAL_FRACTIONAL)).map(Amount::from)
    }

    /// Multiplies a token amount by this decimal, rounding up.
    pub fn mul_ceil(self, amount: Amount) -> Result<Amount, InterchainSwapError> {
        let product = amount.as_ref().full_mul(self.0);
        let fractional = U512::from(DECIMAL_FRACTIONAL);
        let mut quotient = product / fractional;
        if !(product % fractional).is_zero() {
            quotient = quotient + U512::one();
        }
        narrow(quotient).map(Amount::from)
    }

    /// Returns the integral part as a token amount.
    pub fn to_amount_floor(self) -> Amount {
        Amount::from(self.0 / DECIMAL_FRACTIONAL)
    }

    /// Returns the smallest token amount that is not less than this decimal.
    pub fn to_amount_ceil(self) -> Amount {
        let floor = self.0 / DECIMAL_FRACTIONAL;
        if (self.0 % DECIMAL_FRACTIONAL).is_zero() {
            Amount::from(floor)
        } else {
            Amount::from(floor + U256::one())
        }
    }

    /// Square root, rounding down.
    pub fn sqrt(self) -> Result<Self, InterchainSwapError> {
        self.0
            .checked_mul(DECIMAL_FRACTIONAL)
            .map(|scaled| Self(scaled.integer_sqrt()))
            .ok_or(InterchainSwapError::Overflow)
    }

    /// Raises to an integer power by repeated squaring.
    pub fn checked_pow_int(self, mut exp: u64) -> Result<Self, InterchainSwapError> {
        let mut result = Self::one();
        let mut base = self;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.checked_mul(base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.checked_mul(base)?;
            }
        }
        Ok(result)
    }

    /// Raises to a fractional power.
    ///
    /// The base is first brought into `[0.5, 1.5)` by taking square roots, each of which
    /// doubles the exponent. The integral part of the exponent is then applied by
    /// repeated squaring and the fractional part by the binomial series of `(1 + x)^a`.
    pub fn pow(self, exp: Self) -> Result<Self, InterchainSwapError> {
        if exp.is_zero() {
            return Ok(Self::one());
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        let lower = Self::percent(50);
        let upper = Self::percent(150);

        let mut base = self;
        let mut exp = exp;
        let mut reductions = 0;
        while base < lower || base >= upper {
            if reductions == MAX_RANGE_REDUCTIONS {
                return Err(InterchainSwapError::PowApproximation);
            }
            base = base.sqrt()?;
            exp = exp.checked_add(exp)?;
            reductions += 1;
        }

        let integral = exp.0 / DECIMAL_FRACTIONAL;
        let fractional = Self(exp.0 % DECIMAL_FRACTIONAL);

        if integral > U256::from(u64::MAX) {
            return Err(InterchainSwapError::Overflow);
        }
        let integral_pow = base.checked_pow_int(integral.low_u64())?;

        if fractional.is_zero() {
            return Ok(integral_pow);
        }

        integral_pow.checked_mul(base.pow_series(fractional)?)
    }

    /// Evaluates `self^a` for `a` in `[0, 1)` and `self` in `[0.5, 1.5)` using the series
    /// `sum_k binom(a, k) x^k` where `x = self - 1`.
    fn pow_series(self, a: Self) -> Result<Self, InterchainSwapError> {
        let one = Self::one();
        let x_negative = self < one;
        let x = self.abs_diff(one);

        let mut term = one;
        let mut term_negative = false;
        let mut sum = one;

        for k in 1..=MAX_SERIES_TERMS {
            let k_minus_one = Self::from_amount(Amount::from(k - 1))?;
            let c_negative = k_minus_one > a;
            let c = a.abs_diff(k_minus_one);

            term = term
                .checked_mul(c)?
                .checked_mul(x)?
                .checked_div(Self::from_amount(Amount::from(k))?)?;

            if term.is_zero() {
                return Ok(sum);
            }

            term_negative ^= x_negative ^ c_negative;

            sum = if term_negative {
                sum.checked_sub(term)?
            } else {
                sum.checked_add(term)?
            };
        }

        Err(InterchainSwapError::PowApproximation)
    }
}

fn narrow(value: U512) -> Result<U256, InterchainSwapError> {
    U256::try_from(value).map_err(|_| InterchainSwapError::Overflow)
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let whole = self.0 / DECIMAL_FRACTIONAL;
        let fractional = self.0 % DECIMAL_FRACTIONAL;

        if fractional.is_zero() {
            return write!(f, "{whole}");
        }

        let digits = format!("{:0>width$}", fractional.to_string(), width = DECIMAL_PLACES);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Decimal {
    type Err = InterchainSwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InterchainSwapError::InvalidDecimal {
            value: s.to_string(),
        };

        let mut parts = s.split('.');
        let whole = parts.next().filter(|w| !w.is_empty()).ok_or_else(invalid)?;
        let fractional = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let whole = U256::from_dec_str(whole).map_err(|_| invalid())?;
        let mut atomics = whole.checked_mul(DECIMAL_FRACTIONAL).ok_or_else(invalid)?;

        if let Some(fractional) = fractional {
            if fractional.is_empty()
                || fractional.len() > DECIMAL_PLACES
                || !fractional.chars().all(|c| c.is_ascii_digit())
            {
                return Err(invalid());
            }
            let padded = format!("{fractional:0<width$}", width = DECIMAL_PLACES);
            let fractional = U256::from_dec_str(&padded).map_err(|_| invalid())?;
            atomics = atomics.checked_add(fractional).ok_or_else(invalid)?;
        }

        Ok(Self(atomics))
    }
}

impl serde::Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::from_str(<String>::deserialize(deserializer)?.as_str())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for Decimal {
    fn schema_name() -> String {
        "Decimal".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(gen)
    }
}
