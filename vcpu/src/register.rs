//! Register identifiers and value cells.
//!
//! Registers are modeled as a fixed, statically-known set (per spec's
//! redesign guidance: "model the six registers as a fixed record... with a
//! small enum identifying each") rather than a name-to-register map; a
//! small `FromStr` impl is kept around purely for turning a source token
//! into the right enum variant.

use crate::constants::{self, ADDRESS_MODULUS};
use std::fmt;

/// Identifies one of the four byte registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ByteRegisterName {
    A,
    B,
    C,
    D,
}

impl ByteRegisterName {
    pub const ALL: [ByteRegisterName; 4] = [
        ByteRegisterName::A,
        ByteRegisterName::B,
        ByteRegisterName::C,
        ByteRegisterName::D,
    ];

    pub fn index(self) -> usize {
        match self {
            ByteRegisterName::A => 0,
            ByteRegisterName::B => 1,
            ByteRegisterName::C => 2,
            ByteRegisterName::D => 3,
        }
    }

    /// Parses a register token. Register tokens are matched literally
    /// (case-sensitively) against the uppercase name, unlike mnemonics,
    /// which are upper-cased before lookup — this asymmetry is
    /// intentional, see `instruction::Opcode::from_str`.
    pub fn parse(token: &str) -> Option<ByteRegisterName> {
        match token {
            "A" => Some(ByteRegisterName::A),
            "B" => Some(ByteRegisterName::B),
            "C" => Some(ByteRegisterName::C),
            "D" => Some(ByteRegisterName::D),
            _ => None,
        }
    }
}

impl fmt::Display for ByteRegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ByteRegisterName::A => "A",
            ByteRegisterName::B => "B",
            ByteRegisterName::C => "C",
            ByteRegisterName::D => "D",
        };
        write!(f, "{}", name)
    }
}

/// Identifies one of the two address registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AddressRegisterName {
    X,
    Y,
}

impl AddressRegisterName {
    pub const ALL: [AddressRegisterName; 2] = [AddressRegisterName::X, AddressRegisterName::Y];

    pub fn index(self) -> usize {
        match self {
            AddressRegisterName::X => 0,
            AddressRegisterName::Y => 1,
        }
    }

    pub fn parse(token: &str) -> Option<AddressRegisterName> {
        match token {
            "X" => Some(AddressRegisterName::X),
            "Y" => Some(AddressRegisterName::Y),
            _ => None,
        }
    }
}

impl fmt::Display for AddressRegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressRegisterName::X => "X",
            AddressRegisterName::Y => "Y",
        };
        write!(f, "{}", name)
    }
}

/// Either register class, as resolved from a source token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegisterName {
    Byte(ByteRegisterName),
    Address(AddressRegisterName),
}

impl RegisterName {
    /// Parses any of the six register tokens, byte or address.
    pub fn parse(token: &str) -> Option<RegisterName> {
        ByteRegisterName::parse(token)
            .map(RegisterName::Byte)
            .or_else(|| AddressRegisterName::parse(token).map(RegisterName::Address))
    }

    pub fn is_byte(self) -> bool {
        matches!(self, RegisterName::Byte(_))
    }

    pub fn is_address(self) -> bool {
        matches!(self, RegisterName::Address(_))
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterName::Byte(name) => write!(f, "{}", name),
            RegisterName::Address(name) => write!(f, "{}", name),
        }
    }
}

/// The right-hand operand of a byte-register operation: either another
/// byte register's current value, or an immediate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ByteSource {
    Register(u8),
    Immediate(i64),
}

fn reduce_byte(value: i64) -> u8 {
    value.rem_euclid(256) as u8
}

/// An 8-bit value cell (`A`, `B`, `C`, or `D`).
///
/// Invariant: `value()` is always in `0..=255`. Every mutator re-establishes
/// this by reduction modulo 256.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ByteRegister {
    name: ByteRegisterName,
    value: u8,
}

impl ByteRegister {
    pub fn new(name: ByteRegisterName) -> ByteRegister {
        ByteRegister { name, value: 0 }
    }

    pub fn name(&self) -> ByteRegisterName {
        self.name
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    fn source_value(source: ByteSource) -> Result<i64, String> {
        match source {
            ByteSource::Register(v) => Ok(v as i64),
            ByteSource::Immediate(imm) => {
                if (constants::BYTE_IMMEDIATE_MIN..=constants::BYTE_IMMEDIATE_MAX).contains(&imm) {
                    Ok(imm)
                } else {
                    Err(format!(
                        "immediate {} is not in correct range ({} to {})",
                        imm,
                        constants::BYTE_IMMEDIATE_MIN,
                        constants::BYTE_IMMEDIATE_MAX
                    ))
                }
            }
        }
    }

    /// Loads `source`, reduced modulo 256.
    pub fn load(&mut self, source: ByteSource) -> Result<u8, String> {
        self.value = reduce_byte(Self::source_value(source)?);
        Ok(self.value)
    }

    /// `self <- a + b`, stored modulo 256. `a` is the current value of a
    /// byte register, `b` may be another register's value or an immediate.
    pub fn add(&mut self, a: u8, b: ByteSource) -> Result<u8, String> {
        self.value = reduce_byte(a as i64 + Self::source_value(b)?);
        Ok(self.value)
    }

    /// `self <- a - b`, stored modulo 256.
    pub fn sub(&mut self, a: u8, b: ByteSource) -> Result<u8, String> {
        self.value = reduce_byte(a as i64 - Self::source_value(b)?);
        Ok(self.value)
    }

    /// `self <- a | b`. Both operands are byte register values.
    pub fn orl(&mut self, a: u8, b: u8) -> u8 {
        self.value = reduce_byte((a | b) as i64);
        self.value
    }

    /// `self <- a & b`. Both operands are byte register values.
    pub fn andl(&mut self, a: u8, b: u8) -> u8 {
        self.value = reduce_byte((a & b) as i64);
        self.value
    }

    /// `self <- a ^ b`. Both operands are byte register values.
    pub fn xorl(&mut self, a: u8, b: u8) -> u8 {
        self.value = reduce_byte((a ^ b) as i64);
        self.value
    }

    /// `self <- (a << k) mod 256`. `k` must be in `0..=7`.
    pub fn lsl(&mut self, a: u8, k: u32) -> Result<u8, String> {
        if !(constants::SHIFT_MIN..=constants::SHIFT_MAX).contains(&(k as i64)) {
            return Err(format!("shift amount {} outside [0, 7]", k));
        }
        self.value = reduce_byte(((a as u32) << k) as i64);
        Ok(self.value)
    }

    /// `self <- (a >> k) mod 256`. `k` must be in `0..=7`.
    pub fn lsr(&mut self, a: u8, k: u32) -> Result<u8, String> {
        if !(constants::SHIFT_MIN..=constants::SHIFT_MAX).contains(&(k as i64)) {
            return Err(format!("shift amount {} outside [0, 7]", k));
        }
        self.value = reduce_byte(((a as u32) >> k) as i64);
        Ok(self.value)
    }

    /// `self <- 255 - self` (bitwise NOT over 8 bits).
    pub fn inv(&mut self) -> u8 {
        self.value = 255 - self.value;
        self.value
    }

    /// Three-way comparison of `self` against `other`: `-1` if less,
    /// `0` if equal, `1` if greater. Does not mutate.
    pub fn cmp(&self, other: ByteSource) -> Result<i8, String> {
        let cmp_val = Self::source_value(other)?;
        let self_val = self.value as i64;
        Ok(if self_val == cmp_val {
            0
        } else if self_val > cmp_val {
            1
        } else {
            -1
        })
    }
}

/// A 16-bit value cell (`X` or `Y`) used for memory addressing.
///
/// Invariant: `value()` is always in `0..=65535`; reduced modulo
/// [`ADDRESS_MODULUS`] (65535, not 65536 — see the constant's docs) after
/// every mutation. `memory_address()` additionally projects the value
/// modulo 1024 to bound it to the data memory's size.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressRegister {
    name: AddressRegisterName,
    value: u32,
}

impl AddressRegister {
    pub fn new(name: AddressRegisterName) -> AddressRegister {
        AddressRegister { name, value: 0 }
    }

    pub fn name(&self) -> AddressRegisterName {
        self.name
    }

    /// The register's raw 16-bit value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The register's value projected modulo 1024, for use as a memory
    /// address.
    pub fn memory_address(&self) -> usize {
        (self.value as usize) % constants::MEMORY_SIZE
    }

    /// Loads `value` as-is; no reduction is applied to a valid input.
    pub fn load(&mut self, value: i64) -> Result<u32, String> {
        if !(constants::ADDRESS_IMMEDIATE_MIN..=constants::ADDRESS_IMMEDIATE_MAX).contains(&value) {
            return Err(format!(
                "argument {} out of bounds ({} to {})",
                value,
                constants::ADDRESS_IMMEDIATE_MIN,
                constants::ADDRESS_IMMEDIATE_MAX
            ));
        }
        self.value = value as u32;
        Ok(self.value)
    }

    /// Loads an already-valid value (e.g. copied from another address
    /// register) without re-checking its range.
    pub(crate) fn load_raw(&mut self, value: u32) {
        self.value = value;
    }

    pub fn increment(&mut self) -> u32 {
        self.value = ((self.value as i64 + 1).rem_euclid(ADDRESS_MODULUS as i64)) as u32;
        self.value
    }

    pub fn decrement(&mut self) -> u32 {
        self.value = ((self.value as i64 - 1).rem_euclid(ADDRESS_MODULUS as i64)) as u32;
        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_register_wraps_on_overflow() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        a.load(ByteSource::Immediate(200)).unwrap();
        let sum = a.add(200, ByteSource::Immediate(100)).unwrap();
        assert_eq!(sum, 44); // 300 mod 256
    }

    #[test]
    fn byte_register_sub_wraps_under_zero() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        let result = a.sub(0, ByteSource::Immediate(1)).unwrap();
        assert_eq!(result, 255);
    }

    #[test]
    fn byte_register_rejects_out_of_range_immediate() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        assert!(a.load(ByteSource::Immediate(256)).is_err());
        assert!(a.load(ByteSource::Immediate(-129)).is_err());
    }

    #[test]
    fn byte_register_inv_is_involution() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        a.load(ByteSource::Immediate(0x2A)).unwrap();
        a.inv();
        a.inv();
        assert_eq!(a.value(), 0x2A);
    }

    #[test]
    fn byte_register_cmp_does_not_mutate() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        a.load(ByteSource::Immediate(10)).unwrap();
        assert_eq!(a.cmp(ByteSource::Immediate(10)).unwrap(), 0);
        assert_eq!(a.cmp(ByteSource::Immediate(5)).unwrap(), 1);
        assert_eq!(a.cmp(ByteSource::Immediate(20)).unwrap(), -1);
        assert_eq!(a.value(), 10);
    }

    #[test]
    fn byte_register_shift() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        a.load(ByteSource::Immediate(1)).unwrap();
        let shifted = a.lsl(1, 7).unwrap();
        assert_eq!(shifted, 128);
    }

    #[test]
    fn byte_register_shift_rejects_out_of_range_amount() {
        let mut a = ByteRegister::new(ByteRegisterName::A);
        assert!(a.lsl(1, 8).is_err());
    }

    #[test]
    fn address_register_memory_projection() {
        let mut x = AddressRegister::new(AddressRegisterName::X);
        x.load(0x3FF + 5).unwrap();
        assert_eq!(x.memory_address(), 4);
    }

    #[test]
    fn address_register_wraps_at_65535_not_65536() {
        // Incrementing past 65534 lands on 0, one short of the true 16-bit
        // maximum of 65535 — the modulus is deliberately 65535, not 65536.
        let mut x = AddressRegister::new(AddressRegisterName::X);
        x.load(65534).unwrap();
        x.increment();
        assert_eq!(x.value(), 0);
    }

    #[test]
    fn address_register_load_accepts_65535_as_is() {
        let mut x = AddressRegister::new(AddressRegisterName::X);
        x.load(65535).unwrap();
        assert_eq!(x.value(), 65535);
    }

    #[test]
    fn address_register_decrement_wraps_below_zero() {
        let mut x = AddressRegister::new(AddressRegisterName::X);
        x.decrement();
        assert_eq!(x.value(), ADDRESS_MODULUS - 1);
    }
}
