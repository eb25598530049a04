//! Virtual machine runner.
//!
//! Executes a binary program image until it halts or faults.
//!
//! # Usage
//! ```text
//! wordvm <image.bin> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `image.bin`: Program image (contiguous little-endian 16-bit words)
//!
//! # Options
//! - `--prompt`: Print a `> ` prompt on stderr before each input line
//! - `-q, --quiet`: Suppress info-level diagnostics
//!
//! # Exit status
//! `0` on a clean halt; every fault class maps to its own nonzero code so
//! scripts can tell faults apart without parsing stderr.

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::atomic::Ordering;
use wordvm::machine::image::Image;
use wordvm::machine::vm::Vm;
use wordvm::utils::log::QUIET;
use wordvm::{error, info};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let image_path = &args[1];
    let mut prompt = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--prompt" => {
                prompt = true;
                i += 1;
            }
            "--quiet" | "-q" => {
                QUIET.store(true, Ordering::Relaxed);
                i += 1;
            }
            other => {
                error!("Unexpected argument: {}", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    if !Path::new(image_path).exists() {
        error!("Image file does not exist: {}", image_path);
        process::exit(1);
    }

    let image = match Image::from_file(image_path) {
        Ok(image) => image,
        Err(e) => {
            error!("Failed to load {}: {}", image_path, e);
            process::exit(e.exit_code());
        }
    };
    info!("Loaded image {}", image_path);

    let mut vm = Vm::new(image);
    vm.set_prompt(prompt);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let result = vm.run(&mut input, &mut output);
    let _ = output.flush();

    match result {
        Ok(()) => info!("Execution finished"),
        Err(e) => {
            error!("{}", e);
            process::exit(e.exit_code());
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <image.bin> [OPTIONS]", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  image.bin      Program image (little-endian 16-bit words)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --prompt       Print a '> ' prompt on stderr before each input line");
    eprintln!("  -q, --quiet    Suppress info-level diagnostics");
    eprintln!("  -h, --help     Show this help");
}
