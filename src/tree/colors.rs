// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::models::AggregatedBucket;

const HUE_STEP: u64 = 30;
const LIGHTNESS_STEP: f64 = 0.1;
const MIN_LIGHTNESS: f64 = 0.2;
const MAX_LIGHTNESS: f64 = 0.8;

/// Give repeated bucket colors distinct variants so neighbouring slices stay
/// readable.
///
/// Colors are compared as exact strings. The first bucket with a color keeps
/// it; the n-th repeat after it gets [`color_variant`]`(color, n)`.
pub fn disambiguate_colors(buckets: Vec<AggregatedBucket>) -> Vec<AggregatedBucket> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    buckets
        .into_iter()
        .map(|mut bucket| {
            let count = seen.entry(bucket.color.clone()).or_insert(0);
            let n = *count;
            *count += 1;
            if n > 0 {
                bucket.color = color_variant(&bucket.color, n);
            }
            bucket
        })
        .collect()
}

/// The `n`-th variant of a hex color: hue turned by `n * 30` degrees,
/// lightness raised by 0.1 for even `n` and lowered for odd `n`, kept
/// within 0.2..=0.8. `n == 0` and anything that is not `#rgb`/`#rrggbb`
/// come back unchanged.
pub fn color_variant(color: &str, n: u32) -> String {
    if n == 0 {
        return color.to_string();
    }
    let Some((r, g, b)) = parse_hex(color) else {
        return color.to_string();
    };
    let (h, s, l) = rgb_to_hsl(r, g, b);
    let h = (h + (u64::from(n) * HUE_STEP % 360) as f64) % 360.0;
    let offset = if n % 2 == 0 {
        LIGHTNESS_STEP
    } else {
        -LIGHTNESS_STEP
    };
    let l = (l + offset).clamp(MIN_LIGHTNESS, MAX_LIGHTNESS);
    let (r, g, b) = hsl_to_rgb(h, s, l);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Hue in degrees, saturation and lightness in 0..=1.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let h = h / 360.0;
    (
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
