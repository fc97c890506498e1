//! Core library for the vcpu8 toy processor: byte/address registers, the
//! fixed 1 KiB data memory, the textual [`Instruction`](instruction::Instruction)
//! representation and the [`Cpu`](processor::Cpu) fetch-decode-execute loop.
//!
//! This crate has no notion of assembly *source* syntax — that lives in the
//! sibling `vasm` crate, which builds a `(Program, Memory, Labels)` triple
//! from a source file and hands it to [`Cpu::new`](processor::Cpu::new).

pub mod constants;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod numeric;
pub mod processor;
pub mod register;

pub use error::{CpuError, ParseError};
pub use instruction::{Instruction, Opcode};
pub use memory::Memory;
pub use processor::{Cpu, Flags, StepOutcome};
pub use register::{AddressRegisterName, ByteRegisterName, RegisterName};

pub type Labels = std::collections::HashMap<String, usize>;
