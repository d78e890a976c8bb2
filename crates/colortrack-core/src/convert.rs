//! RGB <-> HSV conversion in the 8-bit convention.
//!
//! Hue is stored as degrees / 2 (`0..180`), saturation and value are scaled
//! to `0..=255`.

use crate::color::{wrap_hue, Hsv};

pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0.0
    } else {
        255.0 * delta / max as f32
    };

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let h_deg = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (gf - bf) / delta
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    Hsv {
        h: wrap_hue((h_deg / 2.0).round() as i32),
        s: s.round().clamp(0.0, 255.0) as u8,
        v: max,
    }
}

pub fn hsv_to_rgb(c: Hsv) -> [u8; 3] {
    let v = c.v as f32 / 255.0;
    let s = c.s as f32 / 255.0;
    let chroma = v * s;
    let hp = (c.normalized().h as f32 * 2.0) / 60.0;
    let x = chroma * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = v - chroma;
    let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r1), to_u8(g1), to_u8(b1)]
}
