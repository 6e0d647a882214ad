use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-Point Arithmetic with 24 fractional bits (Q8.24)
/// Dynamic range (with i32 backing): approximately [-128.0, 128.0)
/// Precision: 2^-24 (~6e-8)
/// Zero handling: Represents exact 0.0
pub const FRACTIONAL_BITS: u32 = 24;

/// `2^FRACTIONAL_BITS` as the floating-point bridge sees it.
pub const SCALE: f64 = (1u32 << FRACTIONAL_BITS) as f64;

/// A Q8.24 value: `raw / 2^24`.
///
/// `repr(transparent)` keeps it ABI-identical to `int32_t`, so the value crosses the
/// C boundary unchanged. The type carries no arithmetic of its own; only the kernel
/// operations in [`crate::ops`] compute with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Q8_24(pub i32);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixedPointError {
    #[error("Overflow during Q8.24 conversion: value {value} is outside [-128.0, 128.0)")]
    Overflow { value: f64 },

    #[error("Non-finite value {0} has no Q8.24 representation")]
    NotFinite(f64),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Division overflow: {a} / {b} does not fit in Q8.24")]
    DivisionOverflow { a: Q8_24, b: Q8_24 },

    #[error("Invalid Q8.24 literal: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FixedPointError>;

impl Q8_24 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRACTIONAL_BITS);
    /// Largest representable value, also the division-by-zero sentinel.
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);
    /// One unit in the last place (2^-24).
    pub const EPSILON: Self = Self(1);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert from f64 with deterministic quantization (Round to Nearest).
    ///
    /// Ties round away from zero. Values outside the Q8.24 range and non-finite
    /// inputs are rejected.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(FixedPointError::NotFinite(value));
        }
        let scaled = (value * SCALE).round();
        if scaled > i32::MAX as f64 || scaled < i32::MIN as f64 {
            return Err(FixedPointError::Overflow { value });
        }
        Ok(Self(scaled as i32))
    }

    /// Round to nearest, clamping to [`Q8_24::MIN`]/[`Q8_24::MAX`]. NaN maps to zero.
    pub fn from_f64_saturating(value: f64) -> Self {
        let scaled = value * SCALE;
        let raw = if scaled >= i32::MAX as f64 {
            i32::MAX
        } else if scaled <= i32::MIN as f64 {
            i32::MIN
        } else {
            // NaN falls through here and the cast turns it into 0
            scaled.round() as i32
        };
        Self(raw)
    }

    /// Multiply by 2^24 and truncate toward zero.
    ///
    /// This is the conversion the floating-point bridge uses on the way out. The cast
    /// clamps out-of-range values instead of wrapping; sigmoid and tanh never produce
    /// one, so for them it matches a plain C `(int)` cast bit for bit.
    #[inline]
    pub fn from_f64_truncating(value: f64) -> Self {
        Self((value * SCALE) as i32)
    }

    /// Convert back to f64. Exact: every Q8.24 value is representable in an f64.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE
    }
}

impl From<i32> for Q8_24 {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<Q8_24> for i32 {
    fn from(value: Q8_24) -> Self {
        value.0
    }
}

impl FromStr for Q8_24 {
    type Err = FixedPointError;

    /// `0x`-prefixed input is the raw 32-bit pattern (`_` separators allowed),
    /// anything else is a real number.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let digits: String = hex.chars().filter(|&c| c != '_').collect();
            // from_str_radix would also take a sign
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(FixedPointError::Parse(format!("{s}: not a hex word")));
            }
            let bits = u32::from_str_radix(&digits, 16)
                .map_err(|e| FixedPointError::Parse(format!("{s}: {e}")))?;
            return Ok(Self(bits as i32));
        }
        let value: f64 = s
            .parse()
            .map_err(|e| FixedPointError::Parse(format!("{s}: {e}")))?;
        Self::from_f64(value)
    }
}

impl fmt::Display for Q8_24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.to_f64())
    }
}

impl fmt::LowerHex for Q8_24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Q8_24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_roundtrip() {
        let input = [0.0, 1.0, -1.0, 0.5, -0.5, 0.123456, 127.0, -128.0];

        for &val in &input {
            let q = Q8_24::from_f64(val).unwrap();
            let diff = (val - q.to_f64()).abs();
            // Half an LSB is ~3e-8
            assert!(diff < 3.0e-8, "Mismatch for {}: got {}", val, q.to_f64());
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(Q8_24::ONE.raw(), 0x0100_0000);
        assert_eq!(Q8_24::ONE.to_f64(), 1.0);
        assert_eq!(Q8_24::MAX.raw(), 0x7FFF_FFFF);
        assert_eq!(Q8_24::MIN.to_f64(), -128.0);
        assert_eq!(Q8_24::EPSILON.to_f64(), 1.0 / SCALE);
        assert_eq!(Q8_24::default(), Q8_24::ZERO);
    }

    #[test]
    fn test_from_f64_rejects_out_of_range() {
        assert!(matches!(
            Q8_24::from_f64(128.0),
            Err(FixedPointError::Overflow { .. })
        ));
        assert!(matches!(
            Q8_24::from_f64(-128.5),
            Err(FixedPointError::Overflow { .. })
        ));
        assert!(matches!(
            Q8_24::from_f64(f64::NAN),
            Err(FixedPointError::NotFinite(_))
        ));
        assert!(matches!(
            Q8_24::from_f64(f64::INFINITY),
            Err(FixedPointError::NotFinite(_))
        ));
        // -128.0 is exactly i32::MIN
        assert_eq!(Q8_24::from_f64(-128.0).unwrap(), Q8_24::MIN);
    }

    #[test]
    fn test_rounding_is_to_nearest() {
        let half_lsb = 0.5 / SCALE;
        assert_eq!(Q8_24::from_f64(half_lsb).unwrap().raw(), 1);
        assert_eq!(Q8_24::from_f64(-half_lsb).unwrap().raw(), -1);
        assert_eq!(Q8_24::from_f64(0.4 / SCALE).unwrap().raw(), 0);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(Q8_24::from_f64_saturating(200.0), Q8_24::MAX);
        assert_eq!(Q8_24::from_f64_saturating(-200.0), Q8_24::MIN);
        assert_eq!(Q8_24::from_f64_saturating(f64::INFINITY), Q8_24::MAX);
        assert_eq!(Q8_24::from_f64_saturating(f64::NAN), Q8_24::ZERO);
        assert_eq!(Q8_24::from_f64_saturating(2.5), Q8_24(0x0280_0000));
    }

    #[test]
    fn test_truncation_toward_zero() {
        assert_eq!(Q8_24::from_f64_truncating(1.9 / SCALE).raw(), 1);
        assert_eq!(Q8_24::from_f64_truncating(-1.9 / SCALE).raw(), -1);
        assert_eq!(Q8_24::from_f64_truncating(0.5).raw(), 1 << 23);
        assert_eq!(Q8_24::from_f64_truncating(-1.0).raw(), -(1 << 24));
    }

    #[test]
    fn test_parse_hex_and_real() {
        assert_eq!("0x04000000".parse::<Q8_24>().unwrap(), Q8_24(0x0400_0000));
        assert_eq!("0X0200_0000".parse::<Q8_24>().unwrap(), Q8_24(0x0200_0000));
        assert_eq!("0xffffffff".parse::<Q8_24>().unwrap(), Q8_24(-1));
        assert_eq!("0x80000000".parse::<Q8_24>().unwrap(), Q8_24::MIN);
        assert_eq!(" 4.0 ".parse::<Q8_24>().unwrap(), Q8_24(0x0400_0000));
        assert_eq!("-0.5".parse::<Q8_24>().unwrap(), Q8_24(-(1 << 23)));

        assert!(matches!(
            "0xZZ".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "0x+1".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "0x-1".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "0x".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "0x1_0000_0000".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "four".parse::<Q8_24>(),
            Err(FixedPointError::Parse(_))
        ));
        assert!(matches!(
            "300".parse::<Q8_24>(),
            Err(FixedPointError::Overflow { .. })
        ));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(Q8_24::ONE.to_string(), "1.000000");
        assert_eq!(Q8_24(-(1 << 23)).to_string(), "-0.500000");
        assert_eq!(format!("{:08x}", Q8_24(0x0080_0000)), "00800000");
        assert_eq!(format!("{:08x}", Q8_24(-1)), "ffffffff");
        assert_eq!(format!("{:#010X}", Q8_24::MAX), "0x7FFFFFFF");
    }

    #[test]
    fn test_serde_is_raw_integer() {
        let json = serde_json::to_string(&Q8_24::ONE).unwrap();
        assert_eq!(json, "16777216");
        let back: Q8_24 = serde_json::from_str("-1").unwrap();
        assert_eq!(back, Q8_24(-1));
    }
}
