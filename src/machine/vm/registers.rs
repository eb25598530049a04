use crate::machine::operand::NUM_REGS;

/// Register file holding the machine's eight general-purpose words.
///
/// Indices are produced by operand classification and are always `0..8`,
/// so access is infallible.
pub(super) struct Registers {
    regs: [u16; NUM_REGS],
}

impl Registers {
    /// Creates a register file with all registers zeroed.
    pub(super) fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Returns the word in register `idx`.
    pub(super) fn get(&self, idx: u8) -> u16 {
        self.regs[idx as usize]
    }

    /// Stores a word into register `idx`.
    pub(super) fn set(&mut self, idx: u8, value: u16) {
        self.regs[idx as usize] = value;
    }
}
