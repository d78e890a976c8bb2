use serde::{Deserialize, Serialize};
use std::fmt;

/// Cyclic modulus of the hue channel (8-bit convention: degrees / 2).
pub const HUE_MODULUS: u16 = 180;

/// Largest hue value. The modulus itself is an exclusive bound, so a red
/// range wrapping through the origin covers `[lower, HUE_MAX] ∪ [0, upper]`.
pub const HUE_MAX: u8 = (HUE_MODULUS - 1) as u8;

/// Upper bound of the linear saturation and value channels.
pub const CHANNEL_MAX: u8 = u8::MAX;

/// Reduce an arbitrary (possibly negative) hue into `0..HUE_MODULUS`.
#[inline]
pub fn wrap_hue(h: i32) -> u8 {
    h.rem_euclid(HUE_MODULUS as i32) as u8
}

/// A hue/saturation/value color with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Same color with the hue reduced modulo [`HUE_MODULUS`].
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            h: wrap_hue(self.h as i32),
            ..self
        }
    }

    /// Channel value by name.
    #[inline]
    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Hue => self.h,
            Channel::Saturation => self.s,
            Channel::Value => self.v,
        }
    }
}

impl From<[u8; 3]> for Hsv {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Hsv> for [u8; 3] {
    fn from(c: Hsv) -> Self {
        [c.h, c.s, c.v]
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.h, self.s, self.v)
    }
}

/// One of the three HSV channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Value => "value",
        };
        f.write_str(name)
    }
}
