//! Execution fault types.
//!
//! Every fault is fatal: the machine stops at the first error and the
//! variant carries enough context (instruction address, opcode, raw operand
//! value) to reproduce it. [`VmError::exit_code`] maps each fault class to a
//! distinct process status for the binaries.

use thiserror::Error;

/// Errors raised while decoding an image or executing a program.
#[derive(Debug, Error)]
pub enum VmError {
    /// Fetched opcode is outside the instruction set (`0..=21`).
    #[error("malformed opcode {opcode} at address {address:#06x}")]
    MalformedOpcode { opcode: u16, address: u16 },
    /// Value operand encoding exceeds the legal range (`> 32775`).
    #[error("invalid operand value {value} at address {address:#06x}")]
    InvalidOperand { value: u16, address: u16 },
    /// Destination operand is not a register reference (`32768..=32775`).
    #[error("expected register operand, got {value} at address {address:#06x}")]
    InvalidRegisterOperand { value: u16, address: u16 },
    /// `push` or `call` attempted with the operand stack at capacity.
    #[error("stack overflow at address {address:#06x}")]
    StackOverflow { address: u16 },
    /// `pop` or `ret` attempted on an empty operand stack.
    #[error("stack underflow at address {address:#06x}")]
    StackUnderflow { address: u16 },
    /// `mod` with a divisor that resolved to zero.
    #[error("modulo by zero at address {address:#06x}")]
    DivisionByZero { address: u16 },
    /// Computed jump target or memory address outside `0..=32767`.
    #[error("effective address {address} out of range at {at:#06x}")]
    AddressOutOfRange { address: u16, at: u16 },
    /// Image byte length is not a whole number of 16-bit words.
    #[error("truncated image: {len} bytes is not a whole number of words")]
    TruncatedImage { len: usize },
    /// Image holds more words than the machine has memory.
    #[error("image of {words} words does not fit in 32768 words of memory")]
    ImageTooLarge { words: usize },
    /// Console input or output sink failure, including a closed input source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VmError {
    /// Process exit status for this fault class.
    ///
    /// Zero is reserved for a clean `halt`; every class maps to its own
    /// nonzero code so callers can distinguish faults without parsing
    /// diagnostics.
    pub const fn exit_code(&self) -> i32 {
        match self {
            VmError::MalformedOpcode { .. } => 2,
            VmError::InvalidOperand { .. } => 3,
            VmError::InvalidRegisterOperand { .. } => 4,
            VmError::StackOverflow { .. } => 5,
            VmError::StackUnderflow { .. } => 6,
            VmError::DivisionByZero { .. } => 7,
            VmError::AddressOutOfRange { .. } => 8,
            VmError::TruncatedImage { .. } | VmError::ImageTooLarge { .. } => 9,
            VmError::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn exit_codes_are_nonzero_and_distinct() {
        let faults = [
            VmError::MalformedOpcode {
                opcode: 22,
                address: 0,
            },
            VmError::InvalidOperand {
                value: 32776,
                address: 1,
            },
            VmError::InvalidRegisterOperand { value: 5, address: 1 },
            VmError::StackOverflow { address: 0 },
            VmError::StackUnderflow { address: 0 },
            VmError::DivisionByZero { address: 0 },
            VmError::AddressOutOfRange { address: 40000, at: 3 },
            VmError::TruncatedImage { len: 3 },
            VmError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "closed")),
        ];
        let mut codes: Vec<i32> = faults.iter().map(VmError::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), faults.len());
    }

    #[test]
    fn image_faults_share_a_code() {
        assert_eq!(
            VmError::TruncatedImage { len: 3 }.exit_code(),
            VmError::ImageTooLarge { words: 40000 }.exit_code()
        );
    }

    #[test]
    fn diagnostic_carries_context() {
        let msg = VmError::MalformedOpcode {
            opcode: 22,
            address: 0,
        }
        .to_string();
        assert!(msg.contains("22"));
        assert!(msg.contains("0x0000"));
    }
}
