//! Program image disassembler CLI.
//!
//! Renders an image as an instruction listing, one instruction per line.
//! Words that decode to no known opcode are shown as `dw` data.
//!
//! # Usage
//! ```text
//! disasm <image.bin> [OPTIONS]
//! ```
//!
//! # Options
//! - `--offset <addr>`: First address to list (default 0)
//! - `--count <n>`: Number of words to cover (default: the loaded length)

use std::env;
use std::process;
use wordvm::error;
use wordvm::machine::image::Image;
use wordvm::machine::isa::Instruction;
use wordvm::machine::operand::Operand;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let image_path = &args[1];
    let mut offset = 0usize;
    let mut count: Option<usize> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--offset" | "--count") => {
                i += 1;
                if i >= args.len() {
                    error!("{k} requires an argument");
                    process::exit(1);
                }
                let value = args[i].parse::<usize>().unwrap_or_else(|_| {
                    error!("Invalid value for {k}: '{}'", args[i]);
                    process::exit(1);
                });
                if k == "--offset" {
                    offset = value;
                } else {
                    count = Some(value);
                }
                i += 1;
            }
            other => {
                error!("Unexpected argument: {}", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let image = match Image::from_file(image_path) {
        Ok(image) => image,
        Err(e) => {
            error!("Failed to load {}: {}", image_path, e);
            process::exit(e.exit_code());
        }
    };

    let end = match count {
        Some(n) => offset.saturating_add(n),
        None => image.loaded_len(),
    }
    .min(image.words().len());

    disassemble(image.words(), offset, end);
}

/// Prints the listing for `words[offset..end]`.
///
/// Operand words are rendered through the same classification the machine
/// uses: literals at face value, register references as `rN`.
fn disassemble(words: &[u16], offset: usize, end: usize) {
    let mut addr = offset;
    while addr < end {
        let word = words[addr];
        let Ok(instr) = Instruction::try_from(word) else {
            println!("{:#06x}: dw {}", addr, word);
            addr += 1;
            continue;
        };

        let mut line = format!("{:#06x}: {}", addr, instr.mnemonic());
        let mut ascii = None;
        for n in 1..=instr.operand_count() {
            let Some(&raw) = words.get(addr + n) else {
                break;
            };
            match Operand::classify(raw, (addr + n) as u16) {
                Ok(Operand::Literal(v)) => {
                    line.push_str(&format!(" {}", v));
                    if instr == Instruction::Out {
                        ascii = printable(v);
                    }
                }
                Ok(Operand::Register(r)) => line.push_str(&format!(" r{}", r)),
                // Not executable as an operand; show the raw word.
                Err(_) => line.push_str(&format!(" {}?", raw)),
            }
        }
        if let Some(c) = ascii {
            line.push_str(&format!(" ; '{}'", c));
        }
        println!("{}", line);
        addr += 1 + instr.operand_count();
    }
}

/// Returns the character for `value` when it is a printable ASCII byte.
fn printable(value: u16) -> Option<char> {
    let byte = (value & 0xFF) as u8;
    (byte.is_ascii_graphic() || byte == b' ').then(|| byte as char)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <image.bin> [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --offset <addr>  First address to list (default 0)");
    eprintln!("  --count <n>      Number of words to cover (default: loaded length)");
    eprintln!("  -h, --help       Show this help");
}
