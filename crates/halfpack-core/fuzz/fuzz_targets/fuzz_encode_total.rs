#![no_main]
use libfuzzer_sys::fuzz_target;

use halfpack_core::convert::{f16_to_f32, f32_to_bf16_nearest, f32_to_f16};

fuzz_target!(|data: &[u8]| {
    // Every f32 bit pattern must encode to a defined, classification-
    // preserving 16-bit result; nothing may panic.
    for chunk in data.chunks_exact(4) {
        let bits = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let f = f32::from_bits(bits);

        let h = f32_to_f16(f);
        let d = f16_to_f32(h);
        if f.is_nan() {
            assert!(d.is_nan());
        } else {
            assert_eq!(d.is_sign_negative(), f.is_sign_negative());
            assert!(d.is_infinite() || d.abs() <= 65504.0);
        }

        let b = f32_to_bf16_nearest(f);
        assert_eq!(f.is_nan(), b & 0x7FFF > 0x7F80);
    }
});
