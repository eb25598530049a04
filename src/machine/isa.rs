//! Instruction Set Architecture (ISA) definitions.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical instruction definitions and invokes a callback macro for code
//! generation, so multiple modules can generate instruction-related code
//! without duplicating the table. This module generates:
//!
//! - The [`Instruction`] enum with opcode mappings
//! - `TryFrom<u16>` for decoding opcodes
//! - Mnemonic and operand-count lookups used by the disassembler
//!
//! See [`vm`](super::vm) for the dispatch side of the same table.
//!
//! # Encoding
//!
//! An instruction is one opcode word followed by a fixed number of operand
//! words. Operand kinds:
//! - `Val`: literal `0..=32767`, or register reference `32768..=32775`
//!   resolved to the register's content
//! - `Reg`: register reference only, naming a destination

use crate::machine::errors::VmError;

/// Invokes a callback macro with the complete instruction definition list.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            /// halt ; stop execution normally
            Halt = 0, "halt" => [],
            /// set a b ; register a = b
            Set = 1, "set" => [a: Reg, b: Val],
            /// push a ; push a onto the operand stack
            Push = 2, "push" => [a: Val],
            /// pop a ; register a = top of the operand stack, removed
            Pop = 3, "pop" => [a: Reg],
            /// eq a b c ; register a = 1 if b == c else 0
            Eq = 4, "eq" => [a: Reg, b: Val, c: Val],
            /// gt a b c ; register a = 1 if b > c else 0
            Gt = 5, "gt" => [a: Reg, b: Val, c: Val],
            /// jmp a ; jump to address a
            Jmp = 6, "jmp" => [a: Val],
            /// jt a b ; if a is nonzero, jump to b
            Jt = 7, "jt" => [a: Val, b: Val],
            /// jf a b ; if a is zero, jump to b
            Jf = 8, "jf" => [a: Val, b: Val],
            /// add a b c ; register a = (b + c) mod 32768
            Add = 9, "add" => [a: Reg, b: Val, c: Val],
            /// mult a b c ; register a = (b * c) mod 32768
            Mult = 10, "mult" => [a: Reg, b: Val, c: Val],
            /// mod a b c ; register a = b mod c
            Mod = 11, "mod" => [a: Reg, b: Val, c: Val],
            /// and a b c ; register a = b AND c (15-bit)
            And = 12, "and" => [a: Reg, b: Val, c: Val],
            /// or a b c ; register a = b OR c (15-bit)
            Or = 13, "or" => [a: Reg, b: Val, c: Val],
            /// not a b ; register a = 15-bit complement of b
            Not = 14, "not" => [a: Reg, b: Val],
            /// rmem a b ; register a = memory[b]
            Rmem = 15, "rmem" => [a: Reg, b: Val],
            /// wmem a b ; memory[a] = b
            Wmem = 16, "wmem" => [a: Val, b: Val],
            /// call a ; push the next instruction address, jump to a
            Call = 17, "call" => [a: Val],
            /// ret ; jump to the popped address
            Ret = 18, "ret" => [],
            /// out a ; write the byte (a AND 0xFF) to the output sink
            Out = 19, "out" => [a: Val],
            /// in a ; register a = next character code from the console
            In = 20, "in" => [a: Reg],
            /// noop ; no effect
            Noop = 21, "noop" => [],
        }
    };
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:expr, $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        /// One variant per opcode `0..=21`. Dispatching through this closed
        /// enum guarantees at compile time that every opcode has a handler
        /// and that out-of-range values never reach dispatch.
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl TryFrom<u16> for Instruction {
            type Error = VmError;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $opcode => Ok(Instruction::$name), )*
                    _ => Err(VmError::MalformedOpcode {
                        opcode: value,
                        address: 0,
                    }),
                }
            }
        }

        impl Instruction {
            /// Returns the assembly mnemonic for this instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Instruction::$name => $mnemonic, )*
                }
            }

            /// Returns the number of operand words following the opcode.
            pub const fn operand_count(&self) -> usize {
                match self {
                    $( Instruction::$name => 0 $( + { let _ = stringify!($field); 1 } )*, )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);
