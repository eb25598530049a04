//! Word-addressed virtual machine for binary program images.
//!
//! The machine executes a little-endian image of 16-bit words against a
//! fixed instruction set: 32768 words of memory, eight registers, and a
//! LIFO operand stack. Values `0..=32767` are literals; `32768..=32775`
//! name registers; everything above is illegal as an operand.
//!
//! # Architecture
//!
//! - **Memory**: 32768 words, image loaded at address 0, zero-filled beyond
//! - **Registers**: 8 words, written only through register-destination operands
//! - **Operand stack**: bounded at 32768 words, grown by `push`/`call`
//! - **Execution model**: fetch-decode-execute until `halt` or a fault;
//!   faults are terminal and carry the address they were raised at
//!
//! # Modules
//!
//! - [`errors`]: fault taxonomy and process exit codes
//! - [`image`]: program image decoding (raw little-endian words)
//! - [`isa`]: instruction set definition and opcode mappings
//! - [`operand`]: literal/register operand classification
//! - [`vm`]: core virtual machine implementation

pub mod errors;
pub mod image;
pub mod isa;
pub mod operand;
pub mod vm;
