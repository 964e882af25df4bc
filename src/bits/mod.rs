//! Bit masking and packed fields over `u32`
//!
//! Shift amounts of 32 or more are well-defined here: every helper treats
//! an out-of-range bit position as selecting no bits instead of overflowing.
//!
//! ```rust
//! use memlab::bits::{self, BitField};
//!
//! const MODE: BitField = BitField::new(0, 4);
//! const ID: BitField = BitField::new(4, 8);
//!
//! let mut packed = 0u32;
//! MODE.set(&mut packed, 9);
//! ID.set(&mut packed, 200);
//! assert_eq!(MODE.get(packed), 9);
//! assert_eq!(ID.get(packed), 200);
//! assert!(bits::test(packed, 0));
//! ```

mod flags;

pub use flags::RenderFlags;

/// Mask with only bit `n` set, or 0 when `n >= 32`
#[inline]
pub const fn mask_u32(n: u32) -> u32 {
    if n < 32 {
        1u32 << n
    } else {
        0
    }
}

/// Check whether bit `n` of `x` is set
#[inline]
pub const fn test(x: u32, n: u32) -> bool {
    x & mask_u32(n) != 0
}

/// Set bit `n` of `x`
#[inline]
pub fn set(x: &mut u32, n: u32) {
    *x |= mask_u32(n);
}

/// Clear bit `n` of `x`
#[inline]
pub fn clear(x: &mut u32, n: u32) {
    *x &= !mask_u32(n);
}

/// Flip bit `n` of `x`
#[inline]
pub fn toggle(x: &mut u32, n: u32) {
    *x ^= mask_u32(n);
}

/// Mask covering bits `[offset, offset + width)`.
///
/// Returns 0 for an empty field or `offset >= 32`; a field running past bit
/// 31 is clipped at bit 31.
pub const fn range_mask(offset: u32, width: u32) -> u32 {
    if width == 0 || offset >= 32 {
        return 0;
    }
    if width >= 32 - offset {
        return u32::MAX << offset;
    }
    ((1u32 << width) - 1) << offset
}

/// Read the field `[offset, offset + width)` of `x`, shifted down to bit 0
pub const fn get_field(x: u32, offset: u32, width: u32) -> u32 {
    let mask = range_mask(offset, width);
    if mask == 0 {
        0
    } else {
        (x & mask) >> offset
    }
}

/// Write `value` into the field `[offset, offset + width)` of `x`.
///
/// `value` is truncated to `width` bits; bits outside the field are left
/// untouched. An empty field is a no-op.
pub fn set_field(x: &mut u32, offset: u32, width: u32, value: u32) {
    let mask = range_mask(offset, width);
    if mask == 0 {
        return;
    }

    let value = value & max_field_value(width);
    *x = (*x & !mask) | ((value << offset) & mask);
}

const fn max_field_value(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Named `[offset, offset + width)` field inside a packed `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    /// Position of the lowest bit
    pub offset: u32,
    /// Number of bits
    pub width: u32,
}

impl BitField {
    /// Describe a field
    pub const fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    /// Mask of the bits this field occupies
    #[inline]
    pub const fn mask(&self) -> u32 {
        range_mask(self.offset, self.width)
    }

    /// Largest value the field can hold
    #[inline]
    pub const fn max_value(&self) -> u32 {
        if self.width == 0 {
            0
        } else {
            max_field_value(self.width)
        }
    }

    /// Read this field out of `x`
    #[inline]
    pub const fn get(&self, x: u32) -> u32 {
        get_field(x, self.offset, self.width)
    }

    /// Write `value` into this field of `x`
    #[inline]
    pub fn set(&self, x: &mut u32, value: u32) {
        set_field(x, self.offset, self.width, value);
    }
}

/// Render the low `width` bits of `value`, most significant first.
///
/// Positions above bit 31 render as `0`, so `format_bits(5, 40)` is 37 zeros
/// followed by `101`.
pub fn format_bits(value: u32, width: usize) -> String {
    (0..width)
        .rev()
        .map(|i| {
            if i < 32 && test(value, i as u32) {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

/// Two's-complement view of a signed value as unsigned bits
#[inline]
pub const fn reinterpret_i32(value: i32) -> u32 {
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bits() {
        let mut x = 0u32;
        set(&mut x, 3);
        set(&mut x, 7);
        toggle(&mut x, 3);

        assert_eq!(x, 128);
        assert!(test(x, 7));
        assert!(!test(x, 3));
        assert_eq!(format_bits(x, 16), "0000000010000000");

        clear(&mut x, 7);
        assert_eq!(x, 0);
    }

    #[test]
    fn test_out_of_range_bit() {
        assert_eq!(mask_u32(31), 0x8000_0000);
        assert_eq!(mask_u32(32), 0);
        assert_eq!(mask_u32(100), 0);

        let mut x = 5u32;
        set(&mut x, 40);
        toggle(&mut x, 32);
        clear(&mut x, 33);
        assert_eq!(x, 5);
        assert!(!test(u32::MAX, 32));
    }

    #[test]
    fn test_range_mask() {
        assert_eq!(range_mask(0, 4), 0xF);
        assert_eq!(range_mask(4, 8), 0xFF0);
        assert_eq!(range_mask(0, 32), u32::MAX);
        assert_eq!(range_mask(28, 8), 0xF000_0000);
        assert_eq!(range_mask(0, 0), 0);
        assert_eq!(range_mask(32, 1), 0);
    }

    #[test]
    fn test_packed_fields() {
        let mut packed = 0u32;
        set_field(&mut packed, 0, 4, 9);
        set_field(&mut packed, 4, 8, 200);
        set_field(&mut packed, 12, 1, 1);

        assert_eq!(packed, 7305);
        assert_eq!(format_bits(packed, 16), "0001110010001001");
        assert_eq!(get_field(packed, 0, 4), 9);
        assert_eq!(get_field(packed, 4, 8), 200);
        assert_eq!(get_field(packed, 12, 1), 1);
    }

    #[test]
    fn test_set_field_clamps_and_preserves_neighbours() {
        let mut x = u32::MAX;
        set_field(&mut x, 4, 4, 0x1F);
        assert_eq!(x, u32::MAX);

        set_field(&mut x, 4, 4, 0);
        assert_eq!(x, 0xFFFF_FF0F);

        let mut y = 0u32;
        set_field(&mut y, 0, 32, 0xDEAD_BEEF);
        assert_eq!(y, 0xDEAD_BEEF);

        set_field(&mut y, 32, 4, 0);
        set_field(&mut y, 0, 0, 0);
        assert_eq!(y, 0xDEAD_BEEF);
    }

    #[test]
    fn test_bit_field_descriptor() {
        const ENABLED: BitField = BitField::new(12, 1);
        const ID: BitField = BitField::new(4, 8);

        assert_eq!(ID.mask(), 0xFF0);
        assert_eq!(ID.max_value(), 255);
        assert_eq!(ENABLED.max_value(), 1);
        assert_eq!(BitField::new(0, 0).max_value(), 0);
        assert_eq!(BitField::new(0, 32).max_value(), u32::MAX);

        let mut packed = 0;
        ENABLED.set(&mut packed, 1);
        ID.set(&mut packed, 300);
        assert_eq!(ENABLED.get(packed), 1);
        assert_eq!(ID.get(packed), 300 & 0xFF);
    }

    #[test]
    fn test_signedness() {
        assert_eq!(reinterpret_i32(-1), u32::MAX);
        assert_eq!(reinterpret_i32(-1), 4294967295);
        assert_eq!(format_bits(reinterpret_i32(-1), 16), "1111111111111111");
        assert_eq!(reinterpret_i32(i32::MIN), 0x8000_0000);
    }

    #[test]
    fn test_format_bits_wide() {
        let s = format_bits(5, 40);
        assert_eq!(s.len(), 40);
        assert!(s.ends_with("101"));
        assert!(s[..37].chars().all(|c| c == '0'));
        assert_eq!(format_bits(0xFF, 0), "");
    }
}
