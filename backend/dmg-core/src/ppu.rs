//! DMG PPU (picture processing unit)
//!
//! Timing is driven by the cycle cost of each CPU instruction rather than by individual dots.
//! Whenever LY moves onto a visible line, that whole line is drawn at once: background/window
//! first, then sprites on top.

mod background;
pub mod palette;
pub mod registers;
mod sprites;
mod timer;


use crate::interrupts::InterruptSink;
use crate::memory::MemoryInterface;
use crate::ppu::palette::Rgb;
use crate::ppu::registers::{LCDC, LcdControl};
use dmg_common::frontend::FrameSize;

pub use timer::{DOTS_PER_LINE, PpuTimer, TimerEvents};

pub const SCREEN_WIDTH: u8 = 160;
pub const SCREEN_HEIGHT: u8 = 144;

pub const FRAME_BUFFER_LEN: usize = SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize;

pub const FRAME_SIZE: FrameSize =
    FrameSize { width: SCREEN_WIDTH as u32, height: SCREEN_HEIGHT as u32 };

// 144 rendered lines + 10 VBlank lines
pub const LINES_PER_FRAME: u8 = 154;

type Row = [Rgb; SCREEN_WIDTH as usize];

#[derive(Debug, Clone)]
pub struct FrameBuffer(Box<[Row; SCREEN_HEIGHT as usize]>);

impl FrameBuffer {
    fn new(fill: Rgb) -> Self {
        let rows = vec![[fill; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize];
        Self(rows.into_boxed_slice().try_into().unwrap())
    }

    #[must_use]
    pub fn get(&self, line: u8, pixel: u8) -> Rgb {
        self.0[line as usize][pixel as usize]
    }

    fn set(&mut self, line: u8, pixel: u8, rgb: Rgb) {
        self.0[line as usize][pixel as usize] = rgb;
    }

    #[must_use]
    pub fn row(&self, line: u8) -> &Row {
        &self.0[line as usize]
    }

    fn fill_row(&mut self, line: u8, rgb: Rgb) {
        self.0[line as usize].fill(rgb);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.0.iter().flatten().copied()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(palette::WHITE)
    }
}

#[derive(Debug, Clone)]
pub struct Ppu {
    timer: PpuTimer,
    frame_buffer: FrameBuffer,
    frame_complete: bool,
}

impl Ppu {
    #[must_use]
    pub fn new() -> Self {
        Self { timer: PpuTimer::new(), frame_buffer: FrameBuffer::default(), frame_complete: false }
    }

    /// Run the PPU for the cycles taken by one CPU instruction.
    pub fn advance<M: MemoryInterface, I: InterruptSink>(
        &mut self,
        cycles: u16,
        memory: &mut M,
        interrupts: &mut I,
    ) {
        let events = self.timer.advance(cycles, memory, interrupts);

        if let Some(line) = events.line_to_render {
            self.render_scanline(line, memory);
        }

        if events.frame_complete {
            self.frame_complete = true;
        }
    }

    /// Draw one visible line from the current VRAM/OAM/register contents. VBlank lines are ignored.
    pub fn render_scanline<M: MemoryInterface>(&mut self, line: u8, memory: &M) {
        if line >= SCREEN_HEIGHT {
            log::debug!("Ignoring render of non-visible line {line}");
            return;
        }

        let lcdc = LcdControl::from(memory.read_directly(LCDC));

        if lcdc.bg_enabled() {
            background::render_line(line, memory, &mut self.frame_buffer);
        } else {
            self.frame_buffer.fill_row(line, palette::WHITE);
        }

        if lcdc.sprites_enabled() {
            sprites::render_line(line, memory, &mut self.frame_buffer);
        }
    }

    #[must_use]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    #[must_use]
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn clear_frame_complete(&mut self) {
        self.frame_complete = false;
    }

    #[must_use]
    pub fn scanline_counter(&self) -> i32 {
        self.timer.scanline_counter()
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
