//! Scanline countdown, LY, and STAT mode/interrupt bookkeeping

use crate::interrupts::{InterruptSink, InterruptType};
use crate::memory::MemoryInterface;
use crate::ppu::registers::{LCDC, LY, LYC, LcdControl, LcdStatus, PpuMode, SCX, SCY, STAT};
use crate::ppu::{LINES_PER_FRAME, SCREEN_HEIGHT};

pub const DOTS_PER_LINE: i32 = 456;
const OAM_SCAN_DOTS: i32 = 80;
const PIXEL_TRANSFER_DOTS: i32 = 172;

// Mode boundaries expressed as dots remaining in the line
const OAM_SCAN_BOUND: i32 = DOTS_PER_LINE - OAM_SCAN_DOTS;
const PIXEL_TRANSFER_BOUND: i32 = OAM_SCAN_BOUND - PIXEL_TRANSFER_DOTS;

/// What happened during one `advance` call that the rest of the PPU needs to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerEvents {
    /// Set when LY moved onto a visible line that should now be drawn
    pub line_to_render: Option<u8>,
    /// Set when LY wrapped from 153 back to 0
    pub frame_complete: bool,
}

#[derive(Debug, Clone)]
pub struct PpuTimer {
    scanline_counter: i32,
}

impl PpuTimer {
    #[must_use]
    pub fn new() -> Self {
        Self { scanline_counter: DOTS_PER_LINE }
    }

    #[must_use]
    pub fn scanline_counter(&self) -> i32 {
        self.scanline_counter
    }

    /// Advance by the cycle cost of one CPU instruction.
    pub fn advance<M: MemoryInterface, I: InterruptSink>(
        &mut self,
        cycles: u16,
        memory: &mut M,
        interrupts: &mut I,
    ) -> TimerEvents {
        log::trace!(
            "LCDC={:02X} STAT={:02X} LY={:02X} LYC={:02X} SCX={:02X} SCY={:02X}",
            memory.read_directly(LCDC),
            memory.read_directly(STAT),
            memory.read_directly(LY),
            memory.read_directly(LYC),
            memory.read_directly(SCX),
            memory.read_directly(SCY)
        );

        let lcdc = LcdControl::from(memory.read_directly(LCDC));
        let mut stat = LcdStatus::from(memory.read_directly(STAT));
        let previous_mode = stat.mode();

        let mut events = TimerEvents::default();

        if !lcdc.display_enabled() {
            // Display off holds the line at its start and reports mode 0
            self.scanline_counter = DOTS_PER_LINE;
            stat.set_mode(PpuMode::HBlank);
            memory.write_directly(STAT, stat.into());
            return events;
        }

        let mut scanline = memory.read_directly(LY);

        self.scanline_counter -= i32::from(cycles);
        if self.scanline_counter <= 0 {
            self.scanline_counter = DOTS_PER_LINE;
            scanline = scanline.wrapping_add(1);

            if scanline == SCREEN_HEIGHT {
                log::trace!("Entering VBlank");
                interrupts.request_interrupt(InterruptType::VBlank);
            } else if scanline >= LINES_PER_FRAME {
                log::trace!("Frame complete");
                scanline = 0;
                events.frame_complete = true;
            }

            if scanline < SCREEN_HEIGHT {
                events.line_to_render = Some(scanline);
            }

            memory.write_directly(LY, scanline);
        }

        let mode = self.mode_for_line(scanline);
        stat.set_mode(mode);

        if mode != previous_mode && stat.mode_interrupt_enabled(mode) {
            log::trace!("STAT interrupt on entering {mode:?} at LY={scanline}");
            interrupts.request_interrupt(InterruptType::LcdStatus);
        }

        let lyc_match = scanline == memory.read_directly(LYC);
        if lyc_match && !stat.lyc_match() && stat.lyc_interrupt_enabled() {
            log::trace!("STAT interrupt on LY=LYC={scanline}");
            interrupts.request_interrupt(InterruptType::LcdStatus);
        }
        stat.set_lyc_match(lyc_match);

        memory.write_directly(STAT, stat.into());

        events
    }

    fn mode_for_line(&self, scanline: u8) -> PpuMode {
        if scanline >= SCREEN_HEIGHT {
            PpuMode::VBlank
        } else if self.scanline_counter >= OAM_SCAN_BOUND {
            PpuMode::ScanningOam
        } else if self.scanline_counter >= PIXEL_TRANSFER_BOUND {
            PpuMode::Rendering
        } else {
            PpuMode::HBlank
        }
    }
}

impl Default for PpuTimer {
    fn default() -> Self {
        Self::new()
    }
}
