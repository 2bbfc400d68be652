//! Bitmask helpers shared by every categorized enum in the crate.
//!
//! Flag sets themselves are declared with [`bitflags::bitflags!`]; this module
//! fills in the two conversions the generated types leave implicit.

pub use bitflags::Flags;

pub trait FlagsExt: Flags {
    /// Builds a flag set from a raw mask, dropping any bit not declared by the set.
    fn from_mask(mask: Self::Bits) -> Self {
        Self::from_bits_truncate(mask)
    }

    /// True iff at least one bit is set.
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Flags> FlagsExt for T {}
