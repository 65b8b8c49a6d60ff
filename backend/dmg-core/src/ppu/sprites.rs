//! Sprite (OBJ) layer, composited over an already-drawn background line

use crate::memory::MemoryInterface;
use crate::ppu::background::{fetch_tile_row, tile_pixel_color};
use crate::ppu::registers::{LCDC, LcdControl, OAM_START, OBP0, OBP1, TileDataArea};
use crate::ppu::{FrameBuffer, SCREEN_WIDTH, palette};
use dmg_common::num::GetBit;

pub const OAM_SPRITE_COUNT: u16 = 40;
const OAM_ENTRY_LEN: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpriteData {
    // Screen coordinates of the top-left corner
    y: i16,
    x: i16,
    tile_number: u8,
    palette: usize,
    horizontal_flip: bool,
    vertical_flip: bool,
    behind_background: bool,
}

impl SpriteData {
    fn read<M: MemoryInterface>(memory: &M, index: u16) -> Self {
        let addr = OAM_START + index * OAM_ENTRY_LEN;
        let attributes = memory.read_directly(addr + 3);

        Self {
            y: i16::from(memory.read_directly(addr)) - 16,
            x: i16::from(memory.read_directly(addr + 1)) - 8,
            tile_number: memory.read_directly(addr + 2),
            palette: attributes.bit(4).into(),
            horizontal_flip: attributes.bit(5),
            vertical_flip: attributes.bit(6),
            behind_background: attributes.bit(7),
        }
    }
}

pub fn render_line<M: MemoryInterface>(scanline: u8, memory: &M, frame_buffer: &mut FrameBuffer) {
    let lcdc = LcdControl::from(memory.read_directly(LCDC));
    let sprite_height = i16::from(lcdc.sprite_height());
    let sprite_palettes = [memory.read_directly(OBP0), memory.read_directly(OBP1)];
    let line = i16::from(scanline);

    // Drawn in OAM order; later sprites overwrite earlier ones
    for index in 0..OAM_SPRITE_COUNT {
        let sprite = SpriteData::read(memory, index);
        if !(sprite.y..sprite.y + sprite_height).contains(&line) {
            continue;
        }

        let mut sprite_row = line - sprite.y;
        if sprite.vertical_flip {
            sprite_row = sprite_height - 1 - sprite_row;
        }

        let tile_addr = TileDataArea::SPRITES.tile_address(sprite.tile_number);
        let (tile_data_lsb, tile_data_msb) =
            fetch_tile_row(memory, tile_addr, sprite_row as u16);

        // A low-priority sprite stays hidden behind white background pixels until its first pixel
        // over a non-white pixel, after which the rest of the row is drawn normally
        let mut hidden = sprite.behind_background;

        for pixel in 0..8_u8 {
            let bit = if sprite.horizontal_flip { pixel } else { 7 - pixel };
            let color = tile_pixel_color(tile_data_lsb, tile_data_msb, bit);

            let screen_x = sprite.x + i16::from(pixel);
            if !(0..i16::from(SCREEN_WIDTH)).contains(&screen_x) {
                continue;
            }
            let screen_x = screen_x as u8;

            if hidden && frame_buffer.get(scanline, screen_x) != palette::WHITE {
                hidden = false;
            }

            if hidden {
                continue;
            }

            let rgb = palette::resolve(color, sprite_palettes[sprite.palette]);
            frame_buffer.set(scanline, screen_x, rgb);
        }
    }
}
