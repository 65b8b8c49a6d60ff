//! Interrupt lines raised by the PPU and the IF/IE registers the CPU services them from

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    VBlank,
    LcdStatus,
}

impl InterruptType {
    // In descending priority order
    pub const ALL: [Self; 2] = [Self::VBlank, Self::LcdStatus];

    #[must_use]
    pub fn interrupt_vector(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStatus => 0x0048,
        }
    }

    #[must_use]
    pub fn register_mask(self) -> u8 {
        match self {
            Self::VBlank => 1 << 0,
            Self::LcdStatus => 1 << 1,
        }
    }
}

/// The CPU side of an interrupt request: latches a pending flag that the CPU checks at its next
/// instruction boundary.
pub trait InterruptSink {
    fn request_interrupt(&mut self, interrupt_type: InterruptType);
}

#[derive(Debug, Clone, Default)]
pub struct InterruptRegisters {
    enabled: u8,
    flags: u8,
}

const IMPLEMENTED_BITS: u8 = 0x1F;

impl InterruptRegisters {
    #[must_use]
    pub fn read_ie(&self) -> u8 {
        self.enabled | !IMPLEMENTED_BITS
    }

    pub fn write_ie(&mut self, value: u8) {
        self.enabled = value & IMPLEMENTED_BITS;
    }

    #[must_use]
    pub fn read_if(&self) -> u8 {
        self.flags | !IMPLEMENTED_BITS
    }

    pub fn write_if(&mut self, value: u8) {
        self.flags = value & IMPLEMENTED_BITS;
    }

    #[must_use]
    pub fn pending(&self, interrupt_type: InterruptType) -> bool {
        self.flags & interrupt_type.register_mask() != 0
    }

    pub fn acknowledge(&mut self, interrupt_type: InterruptType) {
        self.flags &= !interrupt_type.register_mask();
    }

    #[must_use]
    pub fn highest_priority_interrupt(&self) -> Option<InterruptType> {
        let interrupts_triggered = self.enabled & self.flags;
        InterruptType::ALL
            .into_iter()
            .find(|&interrupt_type| interrupts_triggered & interrupt_type.register_mask() != 0)
    }
}

impl InterruptSink for InterruptRegisters {
    fn request_interrupt(&mut self, interrupt_type: InterruptType) {
        log::trace!("Interrupt requested: {interrupt_type:?}");

        self.flags |= interrupt_type.register_mask();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn requested_interrupts_latch_until_acknowledged() {
        let mut registers = InterruptRegisters::default();
        registers.request_interrupt(InterruptType::LcdStatus);
        registers.request_interrupt(InterruptType::LcdStatus);
        assert!(registers.pending(InterruptType::LcdStatus));
        assert_eq!(registers.read_if(), 0xE2);

        registers.acknowledge(InterruptType::LcdStatus);
        assert!(!registers.pending(InterruptType::LcdStatus));
    }

    #[test]
    fn highest_priority_requires_enable() {
        let mut registers = InterruptRegisters::default();
        registers.request_interrupt(InterruptType::VBlank);
        registers.request_interrupt(InterruptType::LcdStatus);
        assert_eq!(registers.highest_priority_interrupt(), None);

        registers.write_ie(InterruptType::LcdStatus.register_mask());
        assert_eq!(registers.highest_priority_interrupt(), Some(InterruptType::LcdStatus));

        registers.write_ie(0xFF);
        assert_eq!(registers.highest_priority_interrupt(), Some(InterruptType::VBlank));
        assert_eq!(InterruptType::VBlank.interrupt_vector(), 0x0040);
    }
}
