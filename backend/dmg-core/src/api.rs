//! DMG emulator public interface and main loop

use crate::graphics::RgbaFrameBuffer;
use crate::interrupts::InterruptRegisters;
use crate::memory::Memory;
use crate::ppu;
use crate::ppu::{DOTS_PER_LINE, LINES_PER_FRAME, Ppu};
use dmg_common::frontend::{Renderer, TickEffect, TickResult};
use dmg_config::DmgPalette;
use std::num::NonZeroU16;
use thiserror::Error;

const CYCLES_PER_LINE: u32 = DOTS_PER_LINE as u32;

#[derive(Debug, Error)]
pub enum DmgError<RErr> {
    #[error("Error rendering a frame: {0}")]
    Rendering(RErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DmgEmulatorConfig {
    pub palette: DmgPalette,
}

#[derive(Debug, Clone)]
pub struct DmgEmulator {
    ppu: Ppu,
    memory: Memory,
    interrupt_registers: InterruptRegisters,
    config: DmgEmulatorConfig,
    rgba_frame_buffer: RgbaFrameBuffer,
}

impl DmgEmulator {
    #[must_use]
    pub fn new(memory: Memory, config: DmgEmulatorConfig) -> Self {
        Self {
            ppu: Ppu::new(),
            memory,
            interrupt_registers: InterruptRegisters::default(),
            config,
            rgba_frame_buffer: RgbaFrameBuffer::default(),
        }
    }

    /// Advance the PPU by the cycle cost of one CPU instruction, presenting the frame if LY wrapped
    /// back to 0.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the renderer.
    pub fn step<R: Renderer>(
        &mut self,
        cycles: u16,
        renderer: &mut R,
    ) -> TickResult<DmgError<R::Err>> {
        self.ppu.advance(cycles, &mut self.memory, &mut self.interrupt_registers);

        if !self.ppu.frame_complete() {
            return Ok(TickEffect::None);
        }

        self.ppu.clear_frame_complete();
        self.render_frame(renderer)?;

        Ok(TickEffect::FrameRendered)
    }

    /// Step in fixed-size increments until one frame has been presented.
    ///
    /// A line never carries leftover cycles into the next one, so a frame takes
    /// `ceil(456 / cycles_per_step)` steps per line. With the display disabled LY never wraps, so
    /// after that many steps the current frame buffer is presented anyway.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the renderer.
    pub fn run_frame<R: Renderer>(
        &mut self,
        cycles_per_step: NonZeroU16,
        renderer: &mut R,
    ) -> Result<(), DmgError<R::Err>> {
        let steps_per_line = CYCLES_PER_LINE.div_ceil(u32::from(cycles_per_step.get()));
        let max_steps = u32::from(LINES_PER_FRAME) * steps_per_line;
        for _ in 0..max_steps {
            if self.step(cycles_per_step.get(), renderer)? == TickEffect::FrameRendered {
                return Ok(());
            }
        }

        log::debug!("No frame completed after {max_steps} steps; presenting current frame");
        self.force_render(renderer)
    }

    /// Present the current frame buffer regardless of where the PPU is in the frame.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the renderer.
    pub fn force_render<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), DmgError<R::Err>> {
        self.render_frame(renderer)
    }

    fn render_frame<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), DmgError<R::Err>> {
        self.rgba_frame_buffer.copy_from(self.ppu.frame_buffer(), self.config.palette);
        renderer
            .render_frame(self.rgba_frame_buffer.as_slice(), ppu::FRAME_SIZE)
            .map_err(DmgError::Rendering)
    }

    pub fn reload_config(&mut self, config: &DmgEmulatorConfig) {
        log::debug!("Reloading config: {config:?}");
        self.config = *config;
    }

    #[must_use]
    pub fn config(&self) -> &DmgEmulatorConfig {
        &self.config
    }

    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    #[must_use]
    pub fn interrupt_registers(&self) -> &InterruptRegisters {
        &self.interrupt_registers
    }

    pub fn interrupt_registers_mut(&mut self) -> &mut InterruptRegisters {
        &mut self.interrupt_registers
    }
}
