//! Collision layers and masks.

use serde::{Deserialize, Serialize};

/// Number of distinct collision layers.
pub const LAYER_COUNT: u8 = 32;

/// Set of collision layers, one bit per layer.
///
/// Serializes as its raw bits, so `collidable_mask = 5` selects layers 0 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Mask that matches nothing.
    pub const NONE: Self = Self(0);

    /// Mask that matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Creates a mask containing only `layer`.
    ///
    /// Layers at or beyond [`LAYER_COUNT`] produce an empty mask.
    #[must_use]
    pub const fn single(layer: u8) -> Self {
        if layer < LAYER_COUNT {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    /// Returns this mask with `layer` added.
    #[must_use]
    pub const fn with(self, layer: u8) -> Self {
        Self(self.0 | Self::single(layer).0)
    }

    /// Checks if `layer` is part of this mask.
    #[must_use]
    pub const fn includes(self, layer: u8) -> bool {
        Self::single(layer).0 & self.0 != 0
    }

    /// Checks if two masks share any layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Checks if the mask matches nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_out_of_range_layer_is_empty() {
        assert!(LayerMask::single(LAYER_COUNT).is_empty());
        assert!(!LayerMask::ALL.includes(LAYER_COUNT));
    }

    #[test]
    fn test_mask_union_and_intersection() {
        let ground = LayerMask::single(1);
        let props = LayerMask::single(4);
        let both = ground | props;

        assert!(both.intersects(ground));
        assert!(!ground.intersects(props));
        assert_eq!(both.bits(), 0b1_0010);
    }

    #[test]
    fn test_mask_from_bits() {
        let mask = LayerMask::from_bits(5);
        assert!(mask.includes(0));
        assert!(mask.includes(2));
        assert!(!mask.includes(1));
        assert_eq!(LayerMask::single(0).with(2), mask);
    }

    proptest! {
        #[test]
        fn prop_with_adds_exactly_one_layer(bits in any::<u32>(), layer in 0u8..LAYER_COUNT) {
            let mask = LayerMask::from_bits(bits).with(layer);
            prop_assert!(mask.includes(layer));
            prop_assert_eq!(mask.bits() & !(1 << layer), bits & !(1 << layer));
        }

        #[test]
        fn prop_union_matches_either_side(a in any::<u32>(), b in any::<u32>(), layer in any::<u8>()) {
            let (a, b) = (LayerMask::from_bits(a), LayerMask::from_bits(b));
            prop_assert_eq!((a | b).includes(layer), a.includes(layer) || b.includes(layer));
            prop_assert_eq!(a.intersects(b), !LayerMask::from_bits(a.bits() & b.bits()).is_empty());
        }

        #[test]
        fn prop_out_of_range_layers_never_match(bits in any::<u32>(), layer in LAYER_COUNT..=u8::MAX) {
            let mask = LayerMask::from_bits(bits);
            prop_assert!(!mask.includes(layer));
            prop_assert_eq!(mask.with(layer), mask);
        }
    }
}
