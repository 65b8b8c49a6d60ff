//! Background and window layer, one full line at a time

use crate::memory::MemoryInterface;
use crate::ppu::registers::{BGP, LCDC, LcdControl, SCX, SCY, TileDataArea, WX, WY};
use crate::ppu::{FrameBuffer, SCREEN_WIDTH, palette};
use dmg_common::num::GetBit;

// Tile maps are 32x32 tile numbers
const TILE_MAP_WIDTH: u16 = 32;

/// 2-bit color index of one pixel in a tile row, where `bit` counts down from 7 at the left edge.
pub(super) fn tile_pixel_color(tile_data_lsb: u8, tile_data_msb: u8, bit: u8) -> u8 {
    (u8::from(tile_data_msb.bit(bit)) << 1) | u8::from(tile_data_lsb.bit(bit))
}

/// Read the two bit-plane bytes for `row` of the tile at `tile_addr`.
pub(super) fn fetch_tile_row<M: MemoryInterface>(memory: &M, tile_addr: u16, row: u16) -> (u8, u8) {
    let row_addr = tile_addr.wrapping_add(row << 1);
    (memory.read_directly(row_addr), memory.read_directly(row_addr.wrapping_add(1)))
}

pub fn render_line<M: MemoryInterface>(scanline: u8, memory: &M, frame_buffer: &mut FrameBuffer) {
    let lcdc = LcdControl::from(memory.read_directly(LCDC));
    let bg_y_scroll = memory.read_directly(SCY);
    let bg_x_scroll = memory.read_directly(SCX);
    let window_y = memory.read_directly(WY);
    let bg_palette = memory.read_directly(BGP);

    // WX is offset by 7; keep it signed so WX < 7 still covers the left edge
    let window_left = i16::from(memory.read_directly(WX)) - 7;
    let window_on_line = lcdc.window_enabled() && window_y <= scanline;
    let tile_data_area = lcdc.bg_tile_data_area();

    for screen_x in 0..SCREEN_WIDTH {
        let in_window = window_on_line && i16::from(screen_x) >= window_left;

        let (tile_map_addr, x, y) = if in_window {
            let window_x = (i16::from(screen_x) - window_left) as u8;
            (lcdc.window_tile_map_addr(), window_x, scanline.wrapping_sub(window_y))
        } else {
            (
                lcdc.bg_tile_map_addr(),
                screen_x.wrapping_add(bg_x_scroll),
                scanline.wrapping_add(bg_y_scroll),
            )
        };

        let color = fetch_pixel(memory, tile_map_addr, tile_data_area, x, y);
        frame_buffer.set(scanline, screen_x, palette::resolve(color, bg_palette));
    }
}

fn fetch_pixel<M: MemoryInterface>(
    memory: &M,
    tile_map_addr: u16,
    tile_data_area: TileDataArea,
    x: u8,
    y: u8,
) -> u8 {
    let tile_map_row = u16::from(y / 8);
    let tile_map_col = u16::from(x / 8);
    let tile_number =
        memory.read_directly(tile_map_addr + tile_map_row * TILE_MAP_WIDTH + tile_map_col);

    let tile_addr = tile_data_area.tile_address(tile_number);
    let (tile_data_lsb, tile_data_msb) = fetch_tile_row(memory, tile_addr, u16::from(y % 8));

    tile_pixel_color(tile_data_lsb, tile_data_msb, 7 - (x % 8))
}
