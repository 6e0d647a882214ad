//! # fxp-kernel
//!
//! Deterministic Q8.24 fixed-point primitives for hardware verification.
//!
//! This crate provides [`Q8_24`] — an `i32` representing a fixed-point number with
//! 24 fractional bits (~6e-8 precision, ±128.0 range) — and three stateless operations:
//! - [`divide`]: widen-shift-divide-narrow, saturating to [`Q8_24::MAX`] on a zero divisor
//! - [`sigmoid`]: `1 / (1 + e^-x)` through an `f64` bridge, truncated back to Q8.24
//! - [`tanh_approx`]: `tanh(x)` through the same bridge
//!
//! The [`ffi`] module exports the same operations with the C ABI so a simulator can
//! call them through DPI-C. Sigmoid and tanh are reference placeholders, not a model
//! of any hardware approximation table.

pub mod ffi;
pub mod fixed_point;
pub mod ops;

pub use fixed_point::{FixedPointError, Q8_24, Result, FRACTIONAL_BITS, SCALE};
pub use ops::{checked_divide, divide, divide_with, sigmoid, tanh_approx, OverflowPolicy};
