use crate::ppu;
use crate::ppu::FrameBuffer;
use crate::ppu::palette::{self, Rgb};
use dmg_common::frontend::Color;
use dmg_config::DmgPalette;
use std::iter;
use std::ops::{Deref, DerefMut};

// Render with a light green tint
const DMG_SHADE_TO_RGB_GREEN_TINT: [Rgb; 4] =
    [[0xAE, 0xD2, 0x8D], [0x75, 0x9C, 0x68], [0x40, 0x5E, 0x2D], [0x0C, 0x1E, 0x09]];

// Render with an intense green tint that somewhat mimics the original Game Boy LCD screen
const DMG_SHADE_TO_RGB_LIME_GREEN: [Rgb; 4] =
    [[0x80, 0xA6, 0x08], [0x5D, 0x7F, 0x07], [0x25, 0x5C, 0x1A], [0x00, 0x32, 0x00]];

#[derive(Debug, Clone)]
pub(crate) struct RgbaFrameBuffer(Box<[Color; ppu::FRAME_BUFFER_LEN]>);

impl RgbaFrameBuffer {
    pub(crate) fn copy_from(&mut self, ppu_frame_buffer: &FrameBuffer, dmg_palette: DmgPalette) {
        let map_color = map_color(dmg_palette);
        for (rgb, rgba_color) in iter::zip(ppu_frame_buffer.pixels(), self.iter_mut()) {
            *rgba_color = map_color(rgb);
        }
    }
}

fn map_color(dmg_palette: DmgPalette) -> impl Fn(Rgb) -> Color {
    let color_mapping = match dmg_palette {
        DmgPalette::Classic => palette::SHADES,
        DmgPalette::GreenTint => DMG_SHADE_TO_RGB_GREEN_TINT,
        DmgPalette::LimeGreen => DMG_SHADE_TO_RGB_LIME_GREEN,
    };

    move |rgb| {
        let [r, g, b] = palette::shade_of(rgb).map_or(rgb, |shade| color_mapping[shade as usize]);
        Color::rgb(r, g, b)
    }
}

impl Default for RgbaFrameBuffer {
    fn default() -> Self {
        Self(vec![Color::default(); ppu::FRAME_BUFFER_LEN].into_boxed_slice().try_into().unwrap())
    }
}

impl Deref for RgbaFrameBuffer {
    type Target = [Color; ppu::FRAME_BUFFER_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RgbaFrameBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn classic_passes_shades_through() {
        let map = map_color(DmgPalette::Classic);
        for rgb in palette::SHADES {
            let [r, g, b] = rgb;
            assert_eq!(map(rgb), Color::rgb(r, g, b));
        }
    }

    #[test]
    fn tinted_palettes_remap_by_shade() {
        let map = map_color(DmgPalette::GreenTint);
        assert_eq!(map(palette::WHITE), Color::rgb(0xAE, 0xD2, 0x8D));
        assert_eq!(map(palette::SHADES[3]), Color::rgb(0x0C, 0x1E, 0x09));

        let map = map_color(DmgPalette::LimeGreen);
        assert_eq!(map(palette::SHADES[2]), Color::rgb(0x25, 0x5C, 0x1A));
    }

    #[test]
    fn copy_from_fresh_frame() {
        let mut rgba = RgbaFrameBuffer::default();
        rgba.copy_from(&FrameBuffer::default(), DmgPalette::Classic);
        assert!(rgba.iter().all(|&color| color == Color::rgb(255, 255, 255)));

        rgba.copy_from(&FrameBuffer::default(), DmgPalette::LimeGreen);
        assert!(rgba.iter().all(|&color| color == Color::rgb(0x80, 0xA6, 0x08)));
    }
}
