//! Flat DMG address space shared by the CPU and PPU

use crate::ppu::registers::{
    self, LCDC, LY, LcdControl, LcdStatus, OAM_END, OAM_START, PpuMode, STAT, VRAM_END,
    VRAM_START,
};
use thiserror::Error;

pub const ADDRESS_SPACE_LEN: usize = 0x10000;

/// Memory access as seen by the PPU.
///
/// `read`/`write` are the CPU-facing accessors and may be blocked depending on what the PPU is
/// currently doing. The `_directly` variants bypass all restrictions; the PPU uses them for its
/// own register and VRAM accesses so that it never locks itself out.
pub trait MemoryInterface {
    fn read(&self, address: u16) -> u8;

    fn write(&mut self, address: u16, value: u8);

    fn read_directly(&self, address: u16) -> u8;

    fn write_directly(&mut self, address: u16, value: u8);
}

#[derive(Debug, Error)]
pub enum MemoryImageError {
    #[error("Memory image must be exactly {expected} bytes, was {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },
}

type AddressSpace = [u8; ADDRESS_SPACE_LEN];

#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Box<AddressSpace>,
}

// Post-boot values: display + BG enabled with unsigned tile data, BGP = $FC
const POWER_ON_LCDC: u8 = 0x91;
const POWER_ON_BGP: u8 = 0xFC;

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        let mut memory = Self::zeroed();
        memory.bytes[LCDC as usize] = POWER_ON_LCDC;
        memory.bytes[registers::BGP as usize] = POWER_ON_BGP;
        memory
    }

    fn zeroed() -> Self {
        Self { bytes: vec![0; ADDRESS_SPACE_LEN].into_boxed_slice().try_into().unwrap() }
    }

    /// Build memory from a raw dump of the full 64 KiB address space.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not exactly 64 KiB.
    pub fn from_image(image: &[u8]) -> Result<Self, MemoryImageError> {
        if image.len() != ADDRESS_SPACE_LEN {
            return Err(MemoryImageError::InvalidLength {
                expected: ADDRESS_SPACE_LEN,
                actual: image.len(),
            });
        }

        let mut memory = Self::zeroed();
        memory.bytes.copy_from_slice(image);

        log::debug!(
            "Loaded memory image; LCDC={:02X} STAT={:02X} LY={:02X}",
            memory.bytes[LCDC as usize],
            memory.bytes[STAT as usize],
            memory.bytes[LY as usize]
        );

        Ok(memory)
    }

    fn cpu_access_blocked(&self, address: u16) -> bool {
        if !LcdControl::from(self.bytes[LCDC as usize]).display_enabled() {
            return false;
        }

        let mode = LcdStatus::from(self.bytes[STAT as usize]).mode();
        match address {
            VRAM_START..=VRAM_END => mode == PpuMode::Rendering,
            OAM_START..=OAM_END => matches!(mode, PpuMode::ScanningOam | PpuMode::Rendering),
            _ => false,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInterface for Memory {
    fn read(&self, address: u16) -> u8 {
        if self.cpu_access_blocked(address) {
            log::trace!("CPU read from {address:04X} blocked by PPU");
            return 0xFF;
        }

        match address {
            // Bit 7 is unused and always reads 1
            STAT => self.bytes[STAT as usize] | 0x80,
            _ => self.bytes[address as usize],
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        if self.cpu_access_blocked(address) {
            log::trace!("CPU write to {address:04X} blocked by PPU: {value:02X}");
            return;
        }

        match address {
            // LY, not writable
            LY => {}
            STAT => {
                let stat = LcdStatus::from(self.bytes[STAT as usize]).with_cpu_write(value);
                self.bytes[STAT as usize] = stat.into();
            }
            _ => self.bytes[address as usize] = value,
        }

        registers::trace_write(address, value);
    }

    fn read_directly(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn write_directly(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn memory_in_mode(mode: PpuMode) -> Memory {
        let mut memory = Memory::new();
        let mut stat = LcdStatus::from(0);
        stat.set_mode(mode);
        memory.write_directly(STAT, stat.into());
        memory
    }

    #[test]
    fn power_on_registers() {
        let memory = Memory::new();
        assert_eq!(memory.read(LCDC), 0x91);
        assert_eq!(memory.read(registers::BGP), 0xFC);
        assert_eq!(memory.read(STAT), 0x80);
    }

    #[test]
    fn vram_blocked_only_during_pixel_transfer() {
        let mut memory = memory_in_mode(PpuMode::Rendering);
        memory.write_directly(0x8000, 0x42);
        assert_eq!(memory.read(0x8000), 0xFF);
        memory.write(0x8000, 0x13);
        assert_eq!(memory.read_directly(0x8000), 0x42);

        let mut memory = memory_in_mode(PpuMode::ScanningOam);
        memory.write(0x8000, 0x13);
        assert_eq!(memory.read(0x8000), 0x13);
    }

    #[test]
    fn oam_blocked_during_scan_and_transfer() {
        for mode in [PpuMode::ScanningOam, PpuMode::Rendering] {
            let mut memory = memory_in_mode(mode);
            memory.write(OAM_START, 0x10);
            assert_eq!(memory.read(OAM_START), 0xFF);
            assert_eq!(memory.read_directly(OAM_START), 0x00);
        }

        for mode in [PpuMode::HBlank, PpuMode::VBlank] {
            let mut memory = memory_in_mode(mode);
            memory.write(OAM_START, 0x10);
            assert_eq!(memory.read(OAM_START), 0x10);
        }
    }

    #[test]
    fn nothing_blocked_with_display_off() {
        let mut memory = memory_in_mode(PpuMode::Rendering);
        memory.write(LCDC, 0x00);
        memory.write(0x9800, 0x01);
        assert_eq!(memory.read(0x9800), 0x01);
    }

    #[test]
    fn ly_is_read_only_to_cpu() {
        let mut memory = Memory::new();
        memory.write_directly(LY, 0x20);
        memory.write(LY, 0x00);
        assert_eq!(memory.read(LY), 0x20);
    }

    #[test]
    fn stat_write_only_changes_interrupt_enables() {
        let mut memory = memory_in_mode(PpuMode::VBlank);
        memory.write(STAT, 0xFF);
        assert_eq!(memory.read_directly(STAT), 0x79);
        memory.write(STAT, 0x00);
        assert_eq!(memory.read_directly(STAT), 0x01);
    }

    #[test]
    fn from_image_requires_full_address_space() {
        let err = Memory::from_image(&[0; 100]).unwrap_err();
        assert!(matches!(
            err,
            MemoryImageError::InvalidLength { expected: ADDRESS_SPACE_LEN, actual: 100 }
        ));

        let mut image = vec![0; ADDRESS_SPACE_LEN];
        image[0xC000] = 0xAB;
        let memory = Memory::from_image(&image).unwrap();
        assert_eq!(memory.read(0xC000), 0xAB);
    }
}
