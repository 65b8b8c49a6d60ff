//! Memory-mapped PPU registers and typed views over their bit layouts
//!
//! The registers themselves live in memory; these views are built from a single read and never
//! outlive the call that made them.

use dmg_common::num::{BitRegister, GetBit};
use std::fmt::{Display, Formatter};

pub const LCDC: u16 = 0xFF40;
pub const STAT: u16 = 0xFF41;
pub const SCY: u16 = 0xFF42;
pub const SCX: u16 = 0xFF43;
pub const LY: u16 = 0xFF44;
pub const LYC: u16 = 0xFF45;
pub const BGP: u16 = 0xFF47;
pub const OBP0: u16 = 0xFF48;
pub const OBP1: u16 = 0xFF49;
pub const WY: u16 = 0xFF4A;
pub const WX: u16 = 0xFF4B;

pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;

const TILE_MAP_AREA_0: u16 = 0x9800;
const TILE_MAP_AREA_1: u16 = 0x9C00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuMode {
    // Mode 0
    HBlank,
    // Mode 1
    VBlank,
    // Mode 2
    ScanningOam,
    // Mode 3
    Rendering,
}

impl PpuMode {
    #[must_use]
    pub fn to_bits(self) -> u8 {
        match self {
            Self::HBlank => 0,
            Self::VBlank => 1,
            Self::ScanningOam => 2,
            Self::Rendering => 3,
        }
    }

    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::HBlank,
            1 => Self::VBlank,
            2 => Self::ScanningOam,
            3 => Self::Rendering,
            _ => unreachable!("value & 0x3 is always <= 0x3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileDataArea {
    // $8800-$97FF, tile numbers are signed offsets from tile 128
    Signed,
    // $8000-$8FFF
    Unsigned,
}

impl TileDataArea {
    // Sprites always use $8000-$8FFF
    pub const SPRITES: Self = Self::Unsigned;

    /// Address of the first byte of the given tile. 16 bytes per tile.
    #[must_use]
    pub fn tile_address(self, tile_number: u8) -> u16 {
        match self {
            Self::Signed => {
                let tile = (i16::from(tile_number as i8) + 128) as u16;
                0x8800 + (tile << 4)
            }
            Self::Unsigned => VRAM_START + (u16::from(tile_number) << 4),
        }
    }

    fn from_bit(bit: bool) -> Self {
        if bit { Self::Unsigned } else { Self::Signed }
    }
}

impl Display for TileDataArea {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signed => write!(f, "$8800-$97FF"),
            Self::Unsigned => write!(f, "$8000-$8FFF"),
        }
    }
}

/// LCDC: LCD control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdControl(u8);

impl LcdControl {
    #[must_use]
    pub fn display_enabled(self) -> bool {
        self.0.bit(7)
    }

    #[must_use]
    pub fn window_tile_map_addr(self) -> u16 {
        if self.0.bit(6) { TILE_MAP_AREA_1 } else { TILE_MAP_AREA_0 }
    }

    #[must_use]
    pub fn window_enabled(self) -> bool {
        self.0.bit(5)
    }

    #[must_use]
    pub fn bg_tile_data_area(self) -> TileDataArea {
        TileDataArea::from_bit(self.0.bit(4))
    }

    #[must_use]
    pub fn bg_tile_map_addr(self) -> u16 {
        if self.0.bit(3) { TILE_MAP_AREA_1 } else { TILE_MAP_AREA_0 }
    }

    #[must_use]
    pub fn double_height_sprites(self) -> bool {
        self.0.bit(2)
    }

    #[must_use]
    pub fn sprite_height(self) -> u8 {
        if self.double_height_sprites() { 16 } else { 8 }
    }

    #[must_use]
    pub fn sprites_enabled(self) -> bool {
        self.0.bit(1)
    }

    #[must_use]
    pub fn bg_enabled(self) -> bool {
        self.0.bit(0)
    }
}

impl From<u8> for LcdControl {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// STAT: LCD status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdStatus(u8);

const LYC_MATCH_BIT: u8 = 2;
const CPU_WRITABLE_BITS: u8 = 0x78;

impl LcdStatus {
    #[must_use]
    pub fn mode(self) -> PpuMode {
        PpuMode::from_bits(self.0)
    }

    pub fn set_mode(&mut self, mode: PpuMode) {
        self.0 = (self.0 & !0x3) | mode.to_bits();
    }

    #[must_use]
    pub fn lyc_match(self) -> bool {
        self.0.bit(LYC_MATCH_BIT)
    }

    pub fn set_lyc_match(&mut self, lyc_match: bool) {
        self.0.assign_bit(LYC_MATCH_BIT, lyc_match);
    }

    #[must_use]
    pub fn lyc_interrupt_enabled(self) -> bool {
        self.0.bit(6)
    }

    /// Whether entering `mode` should raise a STAT interrupt. Mode 3 has no enable bit.
    #[must_use]
    pub fn mode_interrupt_enabled(self, mode: PpuMode) -> bool {
        match mode {
            PpuMode::HBlank => self.0.bit(3),
            PpuMode::VBlank => self.0.bit(4),
            PpuMode::ScanningOam => self.0.bit(5),
            PpuMode::Rendering => false,
        }
    }

    /// Merge a CPU write into the current value: the CPU only controls the interrupt enables.
    #[must_use]
    pub fn with_cpu_write(self, value: u8) -> Self {
        Self((self.0 & !CPU_WRITABLE_BITS) | (value & CPU_WRITABLE_BITS))
    }
}

impl From<u8> for LcdStatus {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<LcdStatus> for u8 {
    fn from(value: LcdStatus) -> Self {
        value.0
    }
}

/// Log the decoded contents of a CPU-side register write.
pub fn trace_write(address: u16, value: u8) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }

    match address {
        LCDC => {
            let lcdc = LcdControl(value);
            log::trace!("LCDC write: {value:02X}");
            log::trace!("  Display enabled: {}", lcdc.display_enabled());
            log::trace!("  BG/window enabled: {}", lcdc.bg_enabled());
            log::trace!("  Window enabled: {}", lcdc.window_enabled());
            log::trace!("  Sprites enabled: {}", lcdc.sprites_enabled());
            log::trace!("  BG tile map address: ${:04X}", lcdc.bg_tile_map_addr());
            log::trace!("  Window tile map address: ${:04X}", lcdc.window_tile_map_addr());
            log::trace!("  BG tile data area: {}", lcdc.bg_tile_data_area());
            log::trace!("  Double height sprites: {}", lcdc.double_height_sprites());
        }
        STAT => {
            log::trace!("STAT write: {value:02X}");
            log::trace!("  LY=LYC interrupt enabled: {}", value.bit(6));
            log::trace!("  Mode 2 (OAM scan) interrupt enabled: {}", value.bit(5));
            log::trace!("  Mode 1 (VBlank) interrupt enabled: {}", value.bit(4));
            log::trace!("  Mode 0 (HBlank) interrupt enabled: {}", value.bit(3));
        }
        SCY => log::trace!("SCY write: {value:02X}"),
        SCX => log::trace!("SCX write: {value:02X}"),
        LYC => log::trace!("LYC write: {value:02X}"),
        BGP => log::trace!("BGP write: {value:02X}"),
        OBP0 => log::trace!("OBP0 write: {value:02X}"),
        OBP1 => log::trace!("OBP1 write: {value:02X}"),
        WY => log::trace!("WY write: {value:02X}"),
        WX => log::trace!("WX write: {value:02X}"),
        _ => {}
    }
}
