//! The fetch-decode-execute loop: [`Cpu`] owns every piece of machine state
//! and advances it one instruction at a time via [`Cpu::step`].

use crate::constants::{ADDRESS_REGISTER_COUNT, BYTE_REGISTER_COUNT, MEMORY_SIZE};
use crate::error::CpuError;
use crate::instruction::{Instruction, Opcode};
use crate::memory::Memory;
use crate::numeric::parse_auto_base;
use crate::register::{
    AddressRegister, AddressRegisterName, ByteRegister, ByteRegisterName, ByteSource, RegisterName,
};
use crate::Labels;
use std::fmt::Write as _;

/// `Z` (zero) and `N` (negative) condition flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    pub zero: bool,
    pub negative: bool,
}

/// What [`Cpu::step`] did, on success.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// One instruction ran; the program counter has advanced (or jumped).
    Continued,
    /// `PC` had run off the end of the program; no instruction executed.
    EndOfProgram,
}

/// Owns registers, flags, memory, labels, program and the program counter
/// for the machine's entire lifetime — there is no notion of sharing or
/// resetting any of these independently of constructing a fresh `Cpu`.
#[derive(Clone, Debug)]
pub struct Cpu {
    program: Vec<Instruction>,
    labels: Labels,
    memory: Memory,
    byte_registers: [ByteRegister; BYTE_REGISTER_COUNT],
    address_registers: [AddressRegister; ADDRESS_REGISTER_COUNT],
    flags: Flags,
    pc: usize,
}

impl Cpu {
    /// Builds a `Cpu` from an assembled program, memory, and label table.
    ///
    /// Unlike the source this machine is modeled on, there is nothing left
    /// to validate here: `memory` is always exactly [`MEMORY_SIZE`] cells
    /// because [`Memory`] has no other constructor, and `labels` values are
    /// always valid non-negative program indices because the assembler is
    /// the only thing that produces them. Rust's type system subsumes the
    /// runtime checks the original performs in its constructor.
    pub fn new(program: Vec<Instruction>, memory: Memory, labels: Labels) -> Cpu {
        Cpu {
            program,
            labels,
            memory,
            byte_registers: [
                ByteRegister::new(ByteRegisterName::A),
                ByteRegister::new(ByteRegisterName::B),
                ByteRegister::new(ByteRegisterName::C),
                ByteRegister::new(ByteRegisterName::D),
            ],
            address_registers: [
                AddressRegister::new(AddressRegisterName::X),
                AddressRegister::new(AddressRegisterName::Y),
            ],
            flags: Flags::default(),
            pc: 0,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn byte_register(&self, name: ByteRegisterName) -> u8 {
        self.byte_registers[name.index()].value()
    }

    pub fn address_register(&self, name: AddressRegisterName) -> u32 {
        self.address_registers[name.index()].value()
    }

    /// Reads one memory cell; `0 ≤ addr ≤ 1023` for the driver's use.
    pub fn memory_read(&self, addr: usize) -> Result<i16, crate::memory::AddressOutOfRange> {
        self.memory.read(addr)
    }

    fn byte_register_mut(&mut self, name: ByteRegisterName) -> &mut ByteRegister {
        &mut self.byte_registers[name.index()]
    }

    fn address_register_mut(&mut self, name: AddressRegisterName) -> &mut AddressRegister {
        &mut self.address_registers[name.index()]
    }

    fn resolve_register(token: &str) -> Result<RegisterName, CpuError> {
        RegisterName::parse(token).ok_or_else(|| CpuError::Type(format!("{} does not name a register", token)))
    }

    fn resolve_byte_register_name(token: &str) -> Result<ByteRegisterName, CpuError> {
        match Self::resolve_register(token)? {
            RegisterName::Byte(name) => Ok(name),
            RegisterName::Address(_) => Err(CpuError::Type(format!("{} is not a byte register", token))),
        }
    }

    fn resolve_address_register_name(token: &str) -> Result<AddressRegisterName, CpuError> {
        match Self::resolve_register(token)? {
            RegisterName::Address(name) => Ok(name),
            RegisterName::Byte(_) => Err(CpuError::Type(format!("{} is not an address register", token))),
        }
    }

    /// Resolves an `*I`-suffixed opcode's trailing operand (`CMPI`, `ADDI`,
    /// `SUBI`): these take a byte-sized immediate only, never a register —
    /// matching `codes.py`'s `_immediate`, which parses the token with
    /// `int(x, 0)` and so rejects a register name outright rather than
    /// reading its value.
    fn resolve_byte_immediate(token: &str) -> Result<ByteSource, CpuError> {
        let literal = parse_auto_base(token).map_err(|e| CpuError::Malformed(e.to_string()))?;
        Ok(ByteSource::Immediate(literal))
    }

    fn resolve_shift_amount(token: &str) -> Result<u32, CpuError> {
        let literal = parse_auto_base(token).map_err(|e| CpuError::Malformed(e.to_string()))?;
        if !(0..=7).contains(&literal) {
            return Err(CpuError::Range(format!("shift amount {} outside [0, 7]", literal)));
        }
        Ok(literal as u32)
    }

    fn resolve_label(&self, token: &str) -> Result<usize, CpuError> {
        self.labels
            .get(token)
            .copied()
            .ok_or_else(|| CpuError::Label(format!("label {} not found", token)))
    }

    fn set_flags(&mut self, val: i64) {
        self.flags.zero = val == 0;
        self.flags.negative = val < 127;
    }

    /// Advances the machine by one instruction.
    ///
    /// Returns [`StepOutcome::EndOfProgram`] without touching any state if
    /// `PC` has run past the end of the program. Any [`CpuError`] aborts
    /// the instruction entirely — `PC` is left exactly where it was, so the
    /// driver can report the failure and the caller may retry or halt.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        if self.pc >= self.program.len() {
            return Ok(StepOutcome::EndOfProgram);
        }

        let inst = self.program[self.pc].clone();
        let args = inst.args();
        let mut inc_pc = true;

        log::trace!("pc={}: {}", self.pc, inst);

        match inst.opcode() {
            Opcode::Mov => {
                let dst = Self::resolve_register(&args[0])?;
                let src = Self::resolve_register(&args[1])?;
                match (dst, src) {
                    (RegisterName::Byte(d), RegisterName::Byte(s)) => {
                        let value = self.byte_register(s);
                        self.byte_register_mut(d).load(ByteSource::Register(value))?;
                    }
                    (RegisterName::Address(d), RegisterName::Address(s)) => {
                        let value = self.address_register(s);
                        self.address_register_mut(d).load_raw(value);
                    }
                    _ => return Err(CpuError::Type(format!("MOV {}, {}: mismatched register widths", args[0], args[1]))),
                }
            }
            Opcode::Ldi => {
                let dst = Self::resolve_register(&args[0])?;
                let literal = parse_auto_base(&args[1]).map_err(|e| CpuError::Malformed(e.to_string()))?;
                match dst {
                    RegisterName::Byte(d) => {
                        self.byte_register_mut(d).load(ByteSource::Immediate(literal))?;
                    }
                    RegisterName::Address(d) => {
                        self.address_register_mut(d).load(literal)?;
                    }
                }
            }
            Opcode::Rdm => {
                let dst = Self::resolve_byte_register_name(&args[0])?;
                let addr_reg = Self::resolve_address_register_name(&args[1])?;
                let addr = self.address_registers[addr_reg.index()].memory_address();
                let value = self.memory.read_unchecked(addr);
                self.byte_register_mut(dst).load(ByteSource::Immediate(value as i64))?;
            }
            Opcode::Wrm => {
                let addr_reg = Self::resolve_address_register_name(&args[0])?;
                let src = Self::resolve_byte_register_name(&args[1])?;
                let addr = self.address_registers[addr_reg.index()].memory_address();
                let value = self.byte_register(src) as i16;
                self.memory.write_unchecked(addr, value);
            }
            Opcode::Cmp => {
                let r1 = Self::resolve_byte_register_name(&args[0])?;
                let r2 = Self::resolve_byte_register_name(&args[1])?;
                let other = ByteSource::Register(self.byte_register(r2));
                let result = self.byte_registers[r1.index()].cmp(other)?;
                self.set_flags(result as i64);
            }
            Opcode::Cmpi => {
                let r1 = Self::resolve_byte_register_name(&args[0])?;
                let imm = Self::resolve_byte_immediate(&args[1])?;
                let result = self.byte_registers[r1.index()].cmp(imm)?;
                self.set_flags(result as i64);
            }
            Opcode::Lsl | Opcode::Lsr => {
                let dst = Self::resolve_byte_register_name(&args[0])?;
                let src = Self::resolve_byte_register_name(&args[1])?;
                let k = Self::resolve_shift_amount(&args[2])?;
                let src_val = self.byte_register(src);
                let result = if inst.opcode() == Opcode::Lsl {
                    self.byte_register_mut(dst).lsl(src_val, k)?
                } else {
                    self.byte_register_mut(dst).lsr(src_val, k)?
                };
                self.set_flags(result as i64);
            }
            Opcode::Jmp => {
                self.pc = self.resolve_label(&args[0])?;
                inc_pc = false;
                log::debug!("jumped to {} (pc={})", args[0], self.pc);
            }
            Opcode::Jnz => {
                if !self.flags.zero {
                    self.pc = self.resolve_label(&args[0])?;
                    inc_pc = false;
                    log::debug!("jumped to {} (pc={})", args[0], self.pc);
                }
            }
            Opcode::Jez => {
                if self.flags.zero {
                    self.pc = self.resolve_label(&args[0])?;
                    inc_pc = false;
                    log::debug!("jumped to {} (pc={})", args[0], self.pc);
                }
            }
            Opcode::Jne => {
                if self.flags.negative {
                    self.pc = self.resolve_label(&args[0])?;
                    inc_pc = false;
                    log::debug!("jumped to {} (pc={})", args[0], self.pc);
                }
            }
            Opcode::Jpz => {
                if !self.flags.negative {
                    self.pc = self.resolve_label(&args[0])?;
                    inc_pc = false;
                    log::debug!("jumped to {} (pc={})", args[0], self.pc);
                }
            }
            Opcode::Inc => {
                let reg = Self::resolve_address_register_name(&args[0])?;
                self.address_register_mut(reg).increment();
            }
            Opcode::Dec => {
                let reg = Self::resolve_address_register_name(&args[0])?;
                self.address_register_mut(reg).decrement();
            }
            Opcode::Inv => {
                let reg = Self::resolve_byte_register_name(&args[0])?;
                self.byte_register_mut(reg).inv();
            }
            Opcode::Add | Opcode::Sub => {
                let dst = Self::resolve_byte_register_name(&args[0])?;
                let r1 = Self::resolve_byte_register_name(&args[1])?;
                let r2 = Self::resolve_byte_register_name(&args[2])?;
                let a = self.byte_register(r1);
                let b = ByteSource::Register(self.byte_register(r2));
                let result = if inst.opcode() == Opcode::Add {
                    self.byte_register_mut(dst).add(a, b)?
                } else {
                    self.byte_register_mut(dst).sub(a, b)?
                };
                self.set_flags(result as i64);
            }
            Opcode::Addi | Opcode::Subi => {
                let dst = Self::resolve_byte_register_name(&args[0])?;
                let r1 = Self::resolve_byte_register_name(&args[1])?;
                let imm = Self::resolve_byte_immediate(&args[2])?;
                let a = self.byte_register(r1);
                let result = if inst.opcode() == Opcode::Addi {
                    self.byte_register_mut(dst).add(a, imm)?
                } else {
                    self.byte_register_mut(dst).sub(a, imm)?
                };
                self.set_flags(result as i64);
            }
            Opcode::Orl | Opcode::Andl | Opcode::Xorl => {
                let dst = Self::resolve_byte_register_name(&args[0])?;
                let r1 = Self::resolve_byte_register_name(&args[1])?;
                let r2 = Self::resolve_byte_register_name(&args[2])?;
                let a = self.byte_register(r1);
                let b = self.byte_register(r2);
                let result = match inst.opcode() {
                    Opcode::Orl => self.byte_register_mut(dst).orl(a, b),
                    Opcode::Andl => self.byte_register_mut(dst).andl(a, b),
                    Opcode::Xorl => self.byte_register_mut(dst).xorl(a, b),
                    _ => unreachable!(),
                };
                self.flags.zero = result == 0;
            }
            Opcode::Nop => {}
        }

        if inc_pc {
            self.pc += 1;
        }

        Ok(StepOutcome::Continued)
    }

    /// Renders the machine's full observable state: each register (hex),
    /// the flags, `PC`, and either the next instruction or a terminal
    /// marker, for the driver to display between steps.
    pub fn render_state(&self) -> String {
        let mut out = String::new();
        for name in ByteRegisterName::ALL {
            let _ = writeln!(out, "{} = 0x{:02X}", name, self.byte_register(name));
        }
        for name in AddressRegisterName::ALL {
            let _ = writeln!(out, "{} = 0x{:04X}", name, self.address_register(name));
        }
        let _ = writeln!(out, "Z = {}", self.flags.zero);
        let _ = writeln!(out, "N = {}", self.flags.negative);
        let _ = writeln!(out, "PC = {}", self.pc);
        if self.pc >= self.program.len() {
            out.push_str("EXECUTION OVER\n");
        } else {
            let _ = writeln!(out, "{}", self.program[self.pc]);
        }
        out
    }
}

impl CpuError {
    /// Lifts a register-cell failure message from the byte/address
    /// register methods (which return plain `String`s so that crate
    /// doesn't need to know about `CpuError`) into the right variant.
    fn from_register_message(msg: String) -> CpuError {
        CpuError::Range(msg)
    }
}

impl From<String> for CpuError {
    fn from(msg: String) -> CpuError {
        CpuError::from_register_message(msg)
    }
}
