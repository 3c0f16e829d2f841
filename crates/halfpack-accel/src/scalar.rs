//! Portable scalar batch loops over the reference codec.
//! These serve as fallbacks when SIMD is not available and as the ground
//! truth the vector kernels are tested against.

use halfpack_core::convert::{bf16_to_f32, f16_to_f32, f32_to_bf16, f32_to_f16};

pub fn f16_decode_batch(input: &[u16], output: &mut [f32]) {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    for (out, &bits) in output.iter_mut().zip(input.iter()) {
        *out = f16_to_f32(bits);
    }
}

pub fn f16_encode_batch(input: &[f32], output: &mut [u16]) {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    for (out, &value) in output.iter_mut().zip(input.iter()) {
        *out = f32_to_f16(value);
    }
}

pub fn bf16_decode_batch(input: &[u16], output: &mut [f32]) {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    for (out, &bits) in output.iter_mut().zip(input.iter()) {
        *out = bf16_to_f32(bits);
    }
}

pub fn bf16_encode_batch(input: &[f32], output: &mut [u16]) {
    assert_eq!(input.len(), output.len(), "slices must have equal length");
    for (out, &value) in output.iter_mut().zip(input.iter()) {
        *out = f32_to_bf16(value);
    }
}
