//! BGP/OBP0/OBP1 palette lookup and the shade table shared by every layer

use dmg_common::num::GetBit;

pub type Rgb = [u8; 3];

// Indexed by shade, lightest first
pub const SHADES: [Rgb; 4] = [[255, 255, 255], [0xCC, 0xCC, 0xCC], [0x77, 0x77, 0x77], [0, 0, 0]];

pub const WHITE: Rgb = SHADES[0];

/// Shade (0-3) that `palette` assigns to the 2-bit `color` index.
#[must_use]
pub fn shade(color: u8, palette: u8) -> u8 {
    let lo = 2 * color;
    palette.bits(lo..=lo + 1)
}

#[must_use]
pub fn resolve(color: u8, palette: u8) -> Rgb {
    SHADES[shade(color, palette) as usize]
}

/// Inverse of the shade table, for consumers that only see RGB.
#[must_use]
pub fn shade_of(rgb: Rgb) -> Option<u8> {
    SHADES.iter().position(|&s| s == rgb).map(|i| i as u8)
}
