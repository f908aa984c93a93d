//! Integer arithmetic for share accounting.
//!
//! Everything here is exact: floor division, a 256-bit intermediate for
//! every product of two amounts, and an integer square root.  No floating
//! point reaches the accounting paths.

mod checked;
mod mul_div;
mod protocol_fee;
mod sqrt;

pub use checked::CheckedArithmetic;
pub use mul_div::{mul_div, wide_mul};
pub use protocol_fee::protocol_fee_shares;
pub use sqrt::isqrt;
