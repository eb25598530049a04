//! Core virtual machine implementation.
//!
//! The VM owns all execution state: memory, the register file, the operand
//! stack, the program counter, and the console input buffer. `run` drives
//! the fetch-decode-execute loop until a `halt` or the first fault; faults
//! are terminal and never reverted. Instruction semantics follow the ISA
//! table in [`isa`](super::isa) word for word.
//!
//! The machine is generic over its input source and output sink, so tests
//! drive it with in-memory buffers and the CLI with locked stdin/stdout.

use crate::machine::errors::VmError;
use crate::machine::image::{Image, MEM_WORDS};
use crate::machine::isa::Instruction;
use crate::machine::operand::{MAX_LITERAL, Operand};
use crate::machine::vm::console::Console;
use crate::machine::vm::registers::Registers;
use crate::machine::vm::stack::Stack;
use std::io::{BufRead, Write};

mod console;
mod registers;
mod stack;

/// Word count of the literal value space; arithmetic wraps at this modulus.
const MODULUS: u32 = MAX_LITERAL as u32 + 1;

/// Outcome of a single instruction: keep fetching or stop cleanly.
/// The third state of the machine, Faulted, is the `Err` branch of the
/// surrounding `Result` and is always terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Status {
    Running,
    Halted,
}

macro_rules! exec_vm {
    // Entry point
    (
        vm = $vm:ident,
        input = $input:ident,
        output = $output:ident,
        instr = $instr:ident,
        { $( $variant:ident => $handler:ident $args:tt ),* $(,)? }
    ) => {{
        match $instr {
            $(
                Instruction::$variant => {
                    exec_vm!(@call $vm, $input, $output, $handler, $args)
                }
            ),*
        }
    }};

    // Handler writing to the output sink (leading `out;`)
    (@call $vm:ident, $input:ident, $output:ident, $handler:ident,
        (out; $( $field:ident : $kind:ident ),* $(,)? )
    ) => {{
        $( let $field = exec_vm!(@read $vm, $kind)?; )*
        $vm.$handler($output, $( $field ),*)
    }};

    // Handler reading from the input source (leading `in;`)
    (@call $vm:ident, $input:ident, $output:ident, $handler:ident,
        (in; $( $field:ident : $kind:ident ),* $(,)? )
    ) => {{
        $( let $field = exec_vm!(@read $vm, $kind)?; )*
        $vm.$handler($input, $( $field ),*)
    }};

    // Pure handler
    (@call $vm:ident, $input:ident, $output:ident, $handler:ident,
        ( $( $field:ident : $kind:ident ),* $(,)? )
    ) => {{
        $( let $field = exec_vm!(@read $vm, $kind)?; )*
        $vm.$handler($( $field ),*)
    }};

    // Resolve a value operand: literal, or the referenced register's content
    (@read $vm:ident, Val) => {
        $vm.read_value()
    };

    // Resolve a destination register index
    (@read $vm:ident, Reg) => {
        $vm.read_register()
    };
}

/// Word-addressed virtual machine.
///
/// One `Vm` value owns the entire execution state; there are no globals,
/// so independent instances never share anything.
pub struct Vm {
    /// Memory, always [`MEM_WORDS`] long.
    memory: Vec<u16>,
    /// Eight general-purpose registers.
    registers: Registers,
    /// LIFO operand stack.
    stack: Stack,
    /// Address of the next word to fetch.
    pc: u16,
    /// Address the currently executing opcode was fetched from.
    instr_addr: u16,
    /// Line buffer backing the `in` instruction.
    console: Console,
}

impl Vm {
    /// Creates a machine with the given image loaded at address 0 and all
    /// other state zeroed.
    pub fn new(image: Image) -> Self {
        Self {
            memory: image.into_words(),
            registers: Registers::new(),
            stack: Stack::new(),
            pc: 0,
            instr_addr: 0,
            console: Console::new(),
        }
    }

    /// Enables the interactive `"> "` prompt before each input-line refill.
    pub fn set_prompt(&mut self, prompt: bool) {
        self.console.set_prompt(prompt);
    }

    /// Executes the loaded program until `halt` or the first fault.
    ///
    /// Returns `Ok(())` on a clean halt. On a fault the error names the
    /// fault kind, the faulting address, and the offending value where one
    /// exists; no instruction executes past the fault.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), VmError> {
        loop {
            self.instr_addr = self.pc;
            let opcode = self.read_word()?;
            let instr = Instruction::try_from(opcode).map_err(|_| VmError::MalformedOpcode {
                opcode,
                address: self.instr_addr,
            })?;
            if self.exec(instr, input, output)? == Status::Halted {
                return Ok(());
            }
        }
    }

    /// Reads the word at PC and advances PC by one.
    fn read_word(&mut self) -> Result<u16, VmError> {
        let address = self.pc;
        let word = *self
            .memory
            .get(address as usize)
            .ok_or(VmError::AddressOutOfRange {
                address,
                at: self.instr_addr,
            })?;
        self.pc += 1;
        Ok(word)
    }

    /// Consumes the next operand word and resolves it to a numeric value.
    fn read_value(&mut self) -> Result<u16, VmError> {
        let address = self.pc;
        let raw = self.read_word()?;
        match Operand::classify(raw, address)? {
            Operand::Literal(value) => Ok(value),
            Operand::Register(idx) => Ok(self.registers.get(idx)),
        }
    }

    /// Consumes the next operand word as a destination register index.
    fn read_register(&mut self) -> Result<u8, VmError> {
        let address = self.pc;
        let raw = self.read_word()?;
        Operand::register_index(raw, address)
    }

    /// Reads the memory word at `address`, faulting outside `0..=32767`.
    fn load(&self, address: u16) -> Result<u16, VmError> {
        self.memory
            .get(address as usize)
            .copied()
            .ok_or(VmError::AddressOutOfRange {
                address,
                at: self.instr_addr,
            })
    }

    /// Writes the memory word at `address`, faulting outside `0..=32767`.
    fn store(&mut self, address: u16, value: u16) -> Result<(), VmError> {
        let at = self.instr_addr;
        let slot = self
            .memory
            .get_mut(address as usize)
            .ok_or(VmError::AddressOutOfRange { address, at })?;
        *slot = value;
        Ok(())
    }

    /// Redirects PC to `target`, faulting on an out-of-range address.
    ///
    /// Register contents can exceed the literal range (e.g. via `rmem` of
    /// instruction-bearing memory), so computed targets are checked here
    /// even though literal operands never exceed it.
    fn branch_to(&mut self, target: u16) -> Result<Status, VmError> {
        if target as usize >= MEM_WORDS {
            return Err(VmError::AddressOutOfRange {
                address: target,
                at: self.instr_addr,
            });
        }
        self.pc = target;
        Ok(Status::Running)
    }

    /// Executes a single decoded instruction.
    fn exec<R: BufRead, W: Write>(
        &mut self,
        instruction: Instruction,
        input: &mut R,
        output: &mut W,
    ) -> Result<Status, VmError> {
        exec_vm! {
            vm = self,
            input = input,
            output = output,
            instr = instruction,
            {
                Halt => op_halt(),
                Set => op_set(a: Reg, b: Val),
                Push => op_push(a: Val),
                Pop => op_pop(a: Reg),
                Eq => op_eq(a: Reg, b: Val, c: Val),
                Gt => op_gt(a: Reg, b: Val, c: Val),
                Jmp => op_jmp(a: Val),
                Jt => op_jt(a: Val, b: Val),
                Jf => op_jf(a: Val, b: Val),
                Add => op_add(a: Reg, b: Val, c: Val),
                Mult => op_mult(a: Reg, b: Val, c: Val),
                Mod => op_mod(a: Reg, b: Val, c: Val),
                And => op_and(a: Reg, b: Val, c: Val),
                Or => op_or(a: Reg, b: Val, c: Val),
                Not => op_not(a: Reg, b: Val),
                Rmem => op_rmem(a: Reg, b: Val),
                Wmem => op_wmem(a: Val, b: Val),
                Call => op_call(a: Val),
                Ret => op_ret(),
                Out => op_out(out; a: Val),
                In => op_in(in; a: Reg),
                Noop => op_noop(),
            }
        }
    }

    fn op_halt(&mut self) -> Result<Status, VmError> {
        Ok(Status::Halted)
    }

    fn op_set(&mut self, a: u8, b: u16) -> Result<Status, VmError> {
        self.registers.set(a, b);
        Ok(Status::Running)
    }

    fn op_push(&mut self, a: u16) -> Result<Status, VmError> {
        if !self.stack.push(a) {
            return Err(VmError::StackOverflow {
                address: self.instr_addr,
            });
        }
        Ok(Status::Running)
    }

    fn op_pop(&mut self, a: u8) -> Result<Status, VmError> {
        let value = self.stack.pop().ok_or(VmError::StackUnderflow {
            address: self.instr_addr,
        })?;
        self.registers.set(a, value);
        Ok(Status::Running)
    }

    fn op_eq(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers.set(a, (b == c) as u16);
        Ok(Status::Running)
    }

    fn op_gt(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers.set(a, (b > c) as u16);
        Ok(Status::Running)
    }

    fn op_jmp(&mut self, a: u16) -> Result<Status, VmError> {
        self.branch_to(a)
    }

    fn op_jt(&mut self, a: u16, b: u16) -> Result<Status, VmError> {
        if a != 0 {
            return self.branch_to(b);
        }
        Ok(Status::Running)
    }

    fn op_jf(&mut self, a: u16, b: u16) -> Result<Status, VmError> {
        if a == 0 {
            return self.branch_to(b);
        }
        Ok(Status::Running)
    }

    fn op_add(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers
            .set(a, ((b as u32 + c as u32) % MODULUS) as u16);
        Ok(Status::Running)
    }

    fn op_mult(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers
            .set(a, ((b as u32 * c as u32) % MODULUS) as u16);
        Ok(Status::Running)
    }

    fn op_mod(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        if c == 0 {
            return Err(VmError::DivisionByZero {
                address: self.instr_addr,
            });
        }
        self.registers.set(a, b % c);
        Ok(Status::Running)
    }

    fn op_and(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers.set(a, b & c);
        Ok(Status::Running)
    }

    fn op_or(&mut self, a: u8, b: u16, c: u16) -> Result<Status, VmError> {
        self.registers.set(a, b | c);
        Ok(Status::Running)
    }

    fn op_not(&mut self, a: u8, b: u16) -> Result<Status, VmError> {
        // 15-bit complement: bit 15 stays clear, matching the literal range.
        self.registers.set(a, !b & MAX_LITERAL);
        Ok(Status::Running)
    }

    fn op_rmem(&mut self, a: u8, b: u16) -> Result<Status, VmError> {
        let value = self.load(b)?;
        self.registers.set(a, value);
        Ok(Status::Running)
    }

    fn op_wmem(&mut self, a: u16, b: u16) -> Result<Status, VmError> {
        self.store(a, b)?;
        Ok(Status::Running)
    }

    fn op_call(&mut self, a: u16) -> Result<Status, VmError> {
        // PC already sits past the operand; that is the return address.
        if !self.stack.push(self.pc) {
            return Err(VmError::StackOverflow {
                address: self.instr_addr,
            });
        }
        self.branch_to(a)
    }

    fn op_ret(&mut self) -> Result<Status, VmError> {
        let target = self.stack.pop().ok_or(VmError::StackUnderflow {
            address: self.instr_addr,
        })?;
        self.branch_to(target)
    }

    fn op_out<W: Write>(&mut self, output: &mut W, a: u16) -> Result<Status, VmError> {
        output.write_all(&[(a & 0xFF) as u8])?;
        Ok(Status::Running)
    }

    fn op_in<R: BufRead>(&mut self, input: &mut R, a: u8) -> Result<Status, VmError> {
        let code = self.console.next_char(input)?;
        self.registers.set(a, code);
        Ok(Status::Running)
    }

    fn op_noop(&mut self) -> Result<Status, VmError> {
        Ok(Status::Running)
    }
}
