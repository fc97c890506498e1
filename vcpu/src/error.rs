//! Error types for the core crate.
//!
//! Hand-rolled `Display`/`Error` impls rather than a derive-macro crate,
//! matching the style the assembler crate it sits next to uses for its own
//! error enum.

use std::fmt;

/// Failure to turn raw source tokens into an [`crate::Instruction`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The first token, upper-cased, did not name a known opcode.
    UnknownOpcode(String),
    /// The opcode was recognized but the argument count didn't match its
    /// declared arity.
    Arity {
        mnemonic: String,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownOpcode(token) => {
                write!(f, "operation {} does not match known list", token)
            }
            ParseError::Arity {
                mnemonic,
                expected,
                got,
            } => write!(
                f,
                "incorrect number of arguments for {}: requires {}, {} were given",
                mnemonic, expected, got
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure raised by [`crate::Cpu::step`] while executing one instruction.
///
/// `step()` aborts the instruction and leaves `PC` unchanged whenever any of
/// these is returned — see `Cpu::step`'s documentation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CpuError {
    /// An operand named a register of the wrong class (byte where address
    /// was required or vice versa), named something that isn't a register
    /// at all where one was required, or `MOV` was attempted across
    /// mismatched register widths.
    Type(String),
    /// An immediate (or shift amount) fell outside the range its
    /// destination or opcode requires.
    Range(String),
    /// A branch instruction named a label absent from the label table.
    Label(String),
    /// A numeric literal in an instruction operand could not be parsed.
    Malformed(String),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::Type(msg) => write!(f, "{}", msg),
            CpuError::Range(msg) => write!(f, "{}", msg),
            CpuError::Label(msg) => write!(f, "{}", msg),
            CpuError::Malformed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CpuError {}
