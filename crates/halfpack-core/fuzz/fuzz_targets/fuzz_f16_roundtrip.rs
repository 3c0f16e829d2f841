#![no_main]
use libfuzzer_sys::fuzz_target;

use halfpack_core::convert::{bf16_to_f32, f16_to_f32, f32_to_bf16, f32_to_f16};

fuzz_target!(|data: &[u8]| {
    for chunk in data.chunks_exact(2) {
        let p = u16::from_le_bytes([chunk[0], chunk[1]]);

        let f = f16_to_f32(p);
        let back = f32_to_f16(f);
        if f.is_nan() {
            assert_eq!(back, (p & 0x8000) | 0x7E00);
        } else {
            assert_eq!(back, p);
        }

        // bf16 decode/encode is the identity on every pattern.
        assert_eq!(f32_to_bf16(bf16_to_f32(p)), p);
    }
});
