//! Utilities for working with fixed-width bit vectors packed into a `u128`.

/// Widest bit vector these helpers can represent.
pub const MAX_WIDTH: u32 = u128::BITS;

/// Mask covering the low `width` bits.
#[inline]
pub const fn mask(width: u32) -> u128 {
    if width >= MAX_WIDTH {
        u128::MAX
    } else {
        (1 << width) - 1
    }
}

/// Reverse the order of the low `width` bits of `value`. Bits above `width` are dropped.
///
/// For example, `reverse(0b0011, 4)` is `0b1100`.
#[inline]
pub const fn reverse(value: u128, width: u32) -> u128 {
    if width == 0 {
        0
    } else {
        value.reverse_bits() >> (MAX_WIDTH - width)
    }
}

/// XOR of all bits in `value`.
#[inline]
pub const fn parity(value: u128) -> bool {
    value.count_ones() & 1 != 0
}

/// A contiguous group of bits within a `u128`. Provides utilities for extracting and
/// setting the selected bits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BitField {
    /// Index of the lowest bit of the field.
    offset: u32,
    /// Number of bits in the field.
    width: u32,
}

impl BitField {
    /// Create a field of `width` bits starting at bit `offset`.
    ///
    /// Panics if the field does not fit in a `u128`.
    #[inline]
    pub const fn new(offset: u32, width: u32) -> Self {
        assert!(offset + width <= MAX_WIDTH, "bit field extends past bit 127");
        Self { offset, width }
    }

    /// The field made up of the low `width` bits.
    #[inline]
    pub const fn low(width: u32) -> Self {
        Self::new(0, width)
    }

    /// The `width` bit field sitting directly above this one.
    #[inline]
    pub const fn above(self, width: u32) -> Self {
        Self::new(self.offset + self.width, width)
    }

    #[inline]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Mask of the bits in this field, in place.
    #[inline]
    pub const fn mask(self) -> u128 {
        if self.width == 0 {
            0
        } else {
            mask(self.width) << self.offset
        }
    }

    /// Masks the given value down to just these bits without applying any shifting.
    #[inline]
    pub const fn filter(self, val: u128) -> u128 {
        val & self.mask()
    }

    /// Extract these bits from the given value.
    ///
    /// The return value will be the input `val` masked to only the bits in this field and
    /// shifted over so the right-most bit of the field is in the 0th bit index.
    #[inline]
    pub const fn extract(self, val: u128) -> u128 {
        if self.width == 0 {
            0
        } else {
            (val >> self.offset) & mask(self.width)
        }
    }

    /// Write `val` to the part of `dest` represented by this field, returning the result.
    ///
    /// Bits of `val` that do not fit in the field are discarded.
    #[inline]
    pub const fn applied(self, dest: u128, val: u128) -> u128 {
        if self.width == 0 {
            dest
        } else {
            (dest & !self.mask()) | ((val & mask(self.width)) << self.offset)
        }
    }

    /// Write `val` to the part of `dest` represented by this field.
    #[inline]
    pub fn apply(self, dest: &mut u128, val: u128) {
        *dest = self.applied(*dest, val);
    }
}

/// Extension trait that adds the `with_bits` and `set_bits` methods to `u128`.
pub trait ApplyBitField {
    /// Make a new copy of `self` with the bits specified by the given `BitField` set to
    /// the `value` specified.
    fn with_bits(self, field: BitField, value: u128) -> Self;

    /// Set the bits specified by the given `BitField` to the `value` specified, in-place.
    fn set_bits(&mut self, field: BitField, value: u128);
}

impl ApplyBitField for u128 {
    fn with_bits(self, field: BitField, value: u128) -> Self {
        field.applied(self, value)
    }

    fn set_bits(&mut self, field: BitField, value: u128) {
        *self = self.with_bits(field, value)
    }
}
