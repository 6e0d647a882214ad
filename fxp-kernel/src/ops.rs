use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fixed_point::{FixedPointError, Q8_24, Result, FRACTIONAL_BITS};

/// What [`divide_with`] does when a quotient does not fit in 32 bits.
///
/// A zero divisor is not an overflow: every policy answers it with [`Q8_24::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the low 32 bits of the 64-bit quotient (two's-complement truncation).
    /// This is what the C ABI does.
    #[default]
    Wrap,
    /// Clamp to [`Q8_24::MIN`] or [`Q8_24::MAX`].
    Saturate,
}

/// `(a << 24) / b` in 64 bits, truncating toward zero.
///
/// |a << 24| <= 2^55, so `i64::MIN / -1` cannot occur.
#[inline]
fn wide_quotient(a: Q8_24, b: Q8_24) -> i64 {
    ((a.0 as i64) << FRACTIONAL_BITS) / b.0 as i64
}

/// Q8.24 division with the hardware contract: a zero divisor saturates to
/// [`Q8_24::MAX`], and an out-of-range quotient wraps.
///
/// ```
/// use fxp_kernel::{divide, Q8_24};
///
/// assert_eq!(divide(Q8_24(0x0400_0000), Q8_24(0x0200_0000)), Q8_24(0x0200_0000));
/// assert_eq!(divide(Q8_24::ONE, Q8_24::ZERO), Q8_24::MAX);
/// ```
#[inline]
pub fn divide(a: Q8_24, b: Q8_24) -> Q8_24 {
    divide_with(a, b, OverflowPolicy::Wrap)
}

/// Q8.24 division with an explicit overflow policy.
pub fn divide_with(a: Q8_24, b: Q8_24, policy: OverflowPolicy) -> Q8_24 {
    if b.0 == 0 {
        trace!(a = a.0, "division by zero, saturating to Q8.24 max");
        return Q8_24::MAX;
    }

    let quotient = wide_quotient(a, b);
    match i32::try_from(quotient) {
        Ok(raw) => Q8_24(raw),
        Err(_) => {
            trace!(a = a.0, b = b.0, quotient, ?policy, "Q8.24 quotient out of range");
            match policy {
                OverflowPolicy::Wrap => Q8_24(quotient as i32),
                OverflowPolicy::Saturate if quotient > 0 => Q8_24::MAX,
                OverflowPolicy::Saturate => Q8_24::MIN,
            }
        }
    }
}

/// Q8.24 division that reports a zero divisor or an out-of-range quotient as an error
/// instead of answering with a sentinel.
pub fn checked_divide(a: Q8_24, b: Q8_24) -> Result<Q8_24> {
    if b.0 == 0 {
        debug!(a = a.0, "checked division by zero");
        return Err(FixedPointError::DivisionByZero);
    }
    i32::try_from(wide_quotient(a, b)).map(Q8_24).map_err(|_| {
        debug!(a = a.0, b = b.0, "checked division overflow");
        FixedPointError::DivisionOverflow { a, b }
    })
}

/// Logistic sigmoid, evaluated in f64 and truncated back toward zero.
///
/// Outputs lie in `[0, 2^24]`; the endpoints appear once `e^-x` underflows or
/// vanishes next to 1.0. Reference precision only.
pub fn sigmoid(x: Q8_24) -> Q8_24 {
    let x = x.to_f64();
    Q8_24::from_f64_truncating(1.0 / (1.0 + (-x).exp()))
}

/// Hyperbolic tangent, evaluated in f64 and truncated back toward zero.
///
/// Outputs lie in `[-2^24, 2^24]`. Reference precision only.
pub fn tanh_approx(x: Q8_24) -> Q8_24 {
    Q8_24::from_f64_truncating(x.to_f64().tanh())
}
