//! Operand classification.
//!
//! Every operand word is either a literal (`0..=32767`) or a register
//! reference (`32768..=32775`, naming register `value - 32768`). Anything
//! above [`MAX_OPERAND`] is illegal wherever it appears. Destination
//! operands must be register references; a literal destination is a fault
//! of its own kind.

use crate::machine::errors::VmError;

/// Largest value usable as a literal.
pub const MAX_LITERAL: u16 = 32767;
/// First register reference; register index = value - `REG_BASE`.
pub const REG_BASE: u16 = 32768;
/// Number of general-purpose registers.
pub const NUM_REGS: usize = 8;
/// Largest legal operand encoding (`REG_BASE + 7`).
pub const MAX_OPERAND: u16 = REG_BASE + NUM_REGS as u16 - 1;

/// A classified operand word.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    /// Value taken at face value.
    Literal(u16),
    /// Index of the referenced register, `0..8`.
    Register(u8),
}

impl Operand {
    /// Classifies a raw operand word.
    ///
    /// Returns [`VmError::InvalidOperand`] if `raw` exceeds [`MAX_OPERAND`].
    /// `address` is the memory address the word was read from, carried into
    /// the fault for diagnostics.
    pub fn classify(raw: u16, address: u16) -> Result<Self, VmError> {
        match raw {
            0..=MAX_LITERAL => Ok(Operand::Literal(raw)),
            REG_BASE..=MAX_OPERAND => Ok(Operand::Register((raw - REG_BASE) as u8)),
            _ => Err(VmError::InvalidOperand {
                value: raw,
                address,
            }),
        }
    }

    /// Classifies a raw word that must be a register reference.
    ///
    /// Returns [`VmError::InvalidRegisterOperand`] for any other value,
    /// legal literals included.
    pub fn register_index(raw: u16, address: u16) -> Result<u8, VmError> {
        match raw {
            REG_BASE..=MAX_OPERAND => Ok((raw - REG_BASE) as u8),
            _ => Err(VmError::InvalidRegisterOperand {
                value: raw,
                address,
            }),
        }
    }
}
