//! Interactive driver for the vcpu8 machine: assembles a source file,
//! builds a `Cpu`, and steps it one instruction at a time under the
//! command set reproduced from the original REPL — `S`tep, `C`ontinue,
//! `Q`uit, `P`rint, `H`elp, and hex-address memory peeks (`0x...`).
//!
//! None of this file is part of the core spec's correctness surface; it
//! exists so the workspace is runnable end to end.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use vcpu::{Cpu, CpuError, StepOutcome};

#[derive(Parser)]
#[command(about = "Assemble and interactively step a vcpu8 program")]
struct Args {
    /// Source file to assemble.
    file: String,

    /// Run to completion without prompting for commands.
    #[arg(short, long)]
    skip: bool,

    /// Enable trace-level logging of each executed instruction.
    #[arg(short, long)]
    verbose: bool,
}

fn menu() {
    println!("Available commands:");
    println!("If stuck in an infinite loop, Ctrl+C to stop the program completely");
    println!("Enter a memory address in hexadecimal prefixed by 0x to print its value");
    println!("Enter Q to stop execution, enter S to step, enter C to continue until end");
    println!("Enter P to print the state of the cpu, enter H for a reminder of this menu");
    println!();
}

fn handle_memory_peek(cpu: &Cpu, input: &str) {
    match vcpu::numeric::parse_auto_base(input) {
        Ok(addr) if (0..1024).contains(&addr) => match cpu.memory_read(addr as usize) {
            Ok(value) => println!("{:#x}: {}", addr, value),
            Err(_) => println!("Invalid memory address"),
        },
        _ => println!("Invalid memory address"),
    }
}

fn prompt_line() -> Option<String> {
    print!("Command: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_ascii_uppercase()),
        Err(_) => None,
    }
}

fn run() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Trace)
            .init();
    } else {
        env_logger::init();
    }

    let assembled = match vasm::assemble_file(&args.file) {
        Ok(assembled) => assembled,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };

    let mut cpu = Cpu::new(assembled.program, assembled.memory, assembled.labels);
    let mut skip = args.skip;

    if !skip {
        menu();
    }

    loop {
        println!("{}", cpu.render_state());

        let mut should_step = skip;
        if !skip {
            loop {
                let input = match prompt_line() {
                    Some(line) => line,
                    None => return ExitCode::SUCCESS,
                };
                if input.contains('X') {
                    handle_memory_peek(&cpu, &input);
                    continue;
                }
                match input.as_str() {
                    "Q" => {
                        println!("Stopping execution");
                        println!("{}", cpu.render_state());
                        return ExitCode::SUCCESS;
                    }
                    "S" => {
                        should_step = true;
                        break;
                    }
                    "C" => {
                        should_step = true;
                        skip = true;
                        break;
                    }
                    "P" => println!("{}", cpu.render_state()),
                    "H" => menu(),
                    _ => {}
                }
            }
        }

        if should_step {
            log::trace!("stepping at PC={}", cpu.pc());
            match cpu.step() {
                Ok(StepOutcome::Continued) => {}
                Ok(StepOutcome::EndOfProgram) => return ExitCode::SUCCESS,
                Err(err) => {
                    print_step_error(&err);
                    return ExitCode::from(1);
                }
            }
        }
    }
}

fn print_step_error(err: &CpuError) {
    eprintln!("Error executing instruction:");
    eprintln!("{}", err);
}

fn main() -> ExitCode {
    run()
}
