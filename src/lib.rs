//! Virtual machine library.
//!
//! Provides a 15-bit word virtual machine with eight general-purpose
//! registers, a bounded operand stack, and a character-oriented console
//! channel, plus the program-image loader the binaries build on.

pub mod machine;
pub mod utils;
