//! Cycle-driven DMG emulation core: SM83 flag register, PPU scanline timing, and the
//! background/window/sprite pixel pipeline

pub mod api;
mod graphics;
pub mod interrupts;
pub mod memory;
pub mod ppu;
pub mod sm83;

pub use dmg_config::DmgPalette;
