//! C ABI exports for DPI-C.
//!
//! A SystemVerilog testbench imports these as
//!
//! ```text
//! import "DPI-C" pure function int fxp_div_q8_24(input int a, input int b);
//! import "DPI-C" pure function int fxp_sigmoid_q8_24(input int x);
//! import "DPI-C" pure function int fxp_tanh_q8_24(input int x);
//! ```
//!
//! and links against the `cdylib` or `staticlib` build of this crate. The prototypes
//! are also in `include/fxp_kernel.h`. None of these functions can panic.

use crate::fixed_point::Q8_24;
use crate::ops;

/// Q8.24 division; `b == 0` returns `0x7FFFFFFF`.
#[no_mangle]
pub extern "C" fn fxp_div_q8_24(a: i32, b: i32) -> i32 {
    ops::divide(Q8_24(a), Q8_24(b)).raw()
}

#[no_mangle]
pub extern "C" fn fxp_sigmoid_q8_24(x: i32) -> i32 {
    ops::sigmoid(Q8_24(x)).raw()
}

#[no_mangle]
pub extern "C" fn fxp_tanh_q8_24(x: i32) -> i32 {
    ops::tanh_approx(Q8_24(x)).raw()
}
