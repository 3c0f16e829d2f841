//! Bit-exact software emulation of the 16-bit floating-point storage
//! formats `f16` (IEEE 754 binary16) and `bf16` (truncated binary32).
//!
//! This crate is the scalar reference: [`convert`] holds the total,
//! branchless bit codecs, [`f16`] and [`bf16`] wrap them in ordinary value
//! types with operators and the usual associated constants. The SIMD
//! batch kernels live in `halfpack-accel` and are required to agree with
//! these functions for every possible bit pattern.
//!
//! Supports `no_std` environments; the codec needs nothing beyond core.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bf16;
pub mod convert;
pub mod f16;

pub use bf16::Bf16;
pub use f16::F16;
