//! Inclusive per-channel color bands.

use crate::color::{Channel, Hsv, HUE_MAX, HUE_MODULUS};
use crate::error::InvalidArgument;
use serde::{Deserialize, Serialize};

/// Inclusive band `[lower, upper]` on each HSV channel.
///
/// Saturation and value bounds must be non-decreasing. Hue bounds may wrap:
/// `lower.h > upper.h` selects `[lower.h, HUE_MAX] ∪ [0, upper.h]`, which is
/// how red (sitting at both ends of the hue circle) is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorRange {
    /// Build a validated range. Hue bounds are reduced modulo the hue modulus,
    /// except that an upper hue of exactly [`HUE_MODULUS`] (the top of the hue
    /// circle) becomes [`HUE_MAX`].
    pub fn new(lower: Hsv, upper: Hsv) -> Result<Self, InvalidArgument> {
        let range = Self {
            lower: lower.normalized(),
            upper: Hsv::new(upper_hue(upper.h), upper.s, upper.v),
        };
        range.validate()?;
        Ok(range)
    }

    /// Build a range without validation, for constant tables.
    pub const fn new_unchecked(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// Check the saturation/value ordering invariant.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        for channel in [Channel::Saturation, Channel::Value] {
            let lower = self.lower.channel(channel);
            let upper = self.upper.channel(channel);
            if lower > upper {
                return Err(InvalidArgument::InvertedBounds {
                    channel,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// True when the hue band passes through the cyclic origin.
    #[inline]
    pub fn wraps(&self) -> bool {
        hue_mod(self.lower.h) > upper_hue(self.upper.h)
    }

    /// Split into one or two non-wrapping ranges sharing the same
    /// saturation/value bounds.
    pub fn split(&self) -> (ColorRange, Option<ColorRange>) {
        let lo = hue_mod(self.lower.h);
        let hi = upper_hue(self.upper.h);
        if lo <= hi {
            return (self.with_hues(lo, hi), None);
        }
        (self.with_hues(lo, HUE_MAX), Some(self.with_hues(0, hi)))
    }

    fn with_hues(&self, lo: u8, hi: u8) -> Self {
        Self {
            lower: Hsv::new(lo, self.lower.s, self.lower.v),
            upper: Hsv::new(hi, self.upper.s, self.upper.v),
        }
    }

    /// Membership test treating the hue band as non-wrapping; hue is compared modulo
    /// the hue modulus.
    #[inline]
    pub fn contains_flat(&self, px: Hsv) -> bool {
        let h = hue_mod(px.h);
        self.lower.h <= h
            && h <= self.upper.h
            && self.lower.s <= px.s
            && px.s <= self.upper.s
            && self.lower.v <= px.v
            && px.v <= self.upper.v
    }

    /// Membership test honoring hue wraparound.
    pub fn contains(&self, px: Hsv) -> bool {
        let (first, second) = self.split();
        first.contains_flat(px) || second.is_some_and(|r| r.contains_flat(px))
    }
}

#[inline]
fn hue_mod(h: u8) -> u8 {
    (h as u16 % HUE_MODULUS) as u8
}

/// Upper hue bounds may name the top of the circle as `HUE_MODULUS`.
#[inline]
fn upper_hue(h: u8) -> u8 {
    if u16::from(h) == HUE_MODULUS {
        HUE_MAX
    } else {
        hue_mod(h)
    }
}
