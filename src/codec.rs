//! Bit-level codecs for the 16-bit packed float encodings.
//!
//! Both codecs are exact by construction: any deviation from these bit
//! formulas silently changes numerical results downstream, so the tests
//! pin the behavior pattern-for-pattern.

/// Half-precision (1-bit sign, 5-bit exponent, 10-bit mantissa).
///
/// Conversion code put in the public domain by x4u:
/// <http://stackoverflow.com/a/6162687/523744>
pub mod half {
    /// Expands a half-precision bit pattern to `f32`.
    pub fn to_f32(hbits: u16) -> f32 {
        let mut mant = (hbits as u32) & 0x03ff; // 10 bits mantissa
        let mut exp = (hbits as u32) & 0x7c00; // 5 bits exponent
        if exp == 0x7c00 {
            // NaN/Inf: bias-adjust the exponent, keep the mantissa
            exp = 0x3fc00;
        } else if exp != 0 {
            // normalized value: exp - 15 + 127
            exp += 0x1c000;
        } else if mant != 0 {
            // subnormal: renormalize
            exp = 0x1c400;
            loop {
                mant <<= 1;
                exp -= 0x400;
                if mant & 0x400 != 0 {
                    break;
                }
            }
            mant &= 0x3ff; // discard the subnormal bit
        }
        // else signed zero stays signed zero
        f32::from_bits((((hbits as u32) & 0x8000) << 16) | ((exp | mant) << 13))
    }

    /// Packs an `f32` into a half-precision bit pattern.
    ///
    /// Rounds to nearest by adding `0x1000` to the mantissa bits before
    /// truncation. Magnitudes beyond the half range saturate to signed
    /// infinity unless the input already was NaN/Inf (whose payload bits
    /// propagate); magnitudes below the subnormal threshold flush to
    /// signed zero.
    pub fn from_f32(value: f32) -> u16 {
        let fbits = value.to_bits();
        let sign = (fbits >> 16) & 0x8000;
        let val = (fbits & 0x7fff_ffff).wrapping_add(0x1000); // rounded magnitude
        if val >= 0x4780_0000 {
            // might be or become NaN/Inf
            if (fbits & 0x7fff_ffff) >= 0x4780_0000 {
                if val < 0x7f80_0000 {
                    // was a finite value, too large: saturate
                    return (sign | 0x7c00) as u16;
                }
                // remains +/-Inf or NaN, keep the payload bits
                return (sign | 0x7c00 | ((fbits & 0x007f_ffff) >> 13)) as u16;
            }
            // rounding alone would overflow: largest finite half
            return (sign | 0x7bff) as u16;
        }
        if val >= 0x3880_0000 {
            // stays a normalized value: exp - 127 + 15
            return (sign | ((val - 0x3800_0000) >> 13)) as u16;
        }
        if val < 0x3300_0000 {
            // too small even for a subnormal
            return sign as u16;
        }
        // subnormal range: shift the mantissa by the exponent deficit
        let exp = (fbits & 0x7fff_ffff) >> 23;
        (sign
            | ((((fbits & 0x007f_ffff) | 0x0080_0000).wrapping_add(0x0080_0000 >> (exp - 102)))
                >> (126 - exp))) as u16
    }
}

/// Bfloat16: the top 16 bits of the `f32` pattern.
pub mod bf16 {
    /// Expands a bfloat16 bit pattern to `f32`.
    pub fn to_f32(hbits: u16) -> f32 {
        f32::from_bits((hbits as u32) << 16)
    }

    /// Packs an `f32` into a bfloat16 bit pattern.
    ///
    /// Plain truncation of the low 16 mantissa bits, not round-to-nearest.
    pub fn from_f32(value: f32) -> u16 {
        (value.to_bits() >> 16) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_known_patterns() {
        assert_eq!(half::to_f32(0x0000), 0.0);
        assert_eq!(half::to_f32(0x8000).to_bits(), (-0.0f32).to_bits());
        assert_eq!(half::to_f32(0x3c00), 1.0);
        assert_eq!(half::to_f32(0xbc00), -1.0);
        assert_eq!(half::to_f32(0x3555).to_bits(), 0x3eaa_a000);
        assert_eq!(half::to_f32(0x7bff), 65504.0);
        assert_eq!(half::to_f32(0x7c00), f32::INFINITY);
        assert_eq!(half::to_f32(0xfc00), f32::NEG_INFINITY);
        assert!(half::to_f32(0x7e00).is_nan());
    }

    #[test]
    fn test_half_subnormals() {
        // Smallest positive subnormal: 2^-24.
        assert_eq!(half::to_f32(0x0001), 2.0f32.powi(-24));
        // Largest subnormal: (1023/1024) * 2^-14.
        assert_eq!(half::to_f32(0x03ff), (1023.0 / 1024.0) * 2.0f32.powi(-14));
        assert_eq!(half::from_f32(2.0f32.powi(-24)), 0x0001);
    }

    #[test]
    fn test_half_round_trip_all_patterns() {
        // Every finite half pattern survives to_f32 -> from_f32 exactly.
        for hbits in 0u16..=u16::MAX {
            let value = half::to_f32(hbits);
            if value.is_nan() {
                assert!(half::to_f32(half::from_f32(value)).is_nan());
                continue;
            }
            assert_eq!(
                half::from_f32(value),
                hbits,
                "pattern {hbits:#06x} did not round-trip"
            );
        }
    }

    #[test]
    fn test_half_saturation() {
        assert_eq!(half::from_f32(1.0e30), 0x7c00);
        assert_eq!(half::from_f32(-1.0e30), 0xfc00);
        assert_eq!(half::from_f32(65504.0), 0x7bff);
        // Overflow caused by rounding alone stays at the largest finite
        // half; only magnitudes at or past 2^16 saturate.
        assert_eq!(half::from_f32(65520.0), 0x7bff);
        assert_eq!(half::from_f32(65536.0), 0x7c00);
    }

    #[test]
    fn test_half_flush_to_zero() {
        assert_eq!(half::from_f32(1.0e-10), 0x0000);
        assert_eq!(half::from_f32(-1.0e-10), 0x8000);
    }

    #[test]
    fn test_half_nan_propagates() {
        assert!(half::to_f32(half::from_f32(f32::NAN)).is_nan());
        assert_eq!(half::from_f32(f32::INFINITY), 0x7c00);
        assert_eq!(half::from_f32(f32::NEG_INFINITY), 0xfc00);
    }

    #[test]
    fn test_half_rounding() {
        // 1 + 2^-11 is exactly halfway between 1.0 and the next half;
        // the +0x1000 rounding bumps it up.
        assert_eq!(half::from_f32(1.0 + 2.0f32.powi(-11)), 0x3c01);
        // Below halfway rounds down.
        assert_eq!(half::from_f32(1.0 + 2.0f32.powi(-12)), 0x3c00);
    }

    #[test]
    fn test_bf16_known_patterns() {
        assert_eq!(bf16::from_f32(1.0), 0x3f80);
        assert_eq!(bf16::to_f32(0x3f80), 1.0);
        assert_eq!(bf16::from_f32(-2.0), 0xc000);
        assert_eq!(bf16::to_f32(0xc000), -2.0);
        assert_eq!(bf16::to_f32(0x7f80), f32::INFINITY);
    }

    #[test]
    fn test_bf16_truncates_low_mantissa() {
        let value = f32::from_bits(0x4049_0fdb); // pi
        let packed = bf16::from_f32(value);
        assert_eq!(bf16::to_f32(packed).to_bits(), 0x4049_0000);
    }

    #[test]
    fn test_bf16_round_trip_zeroes_low_bits() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let value = f32::from_bits(rng.gen::<u32>() & 0x7f7f_ffff); // finite
            let packed = bf16::to_f32(bf16::from_f32(value));
            assert_eq!(packed.to_bits(), value.to_bits() & 0xffff_0000);
        }
    }
}
