//! Autograd operations with backward passes

mod basic;

pub use basic::{add, mul, scale, sum};
