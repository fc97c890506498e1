//! Parsed, validated textual instructions.
//!
//! An `Instruction` stores an opcode identity and its raw argument tokens
//! verbatim — register names and numeric literals are resolved fresh on
//! every execution, not pre-resolved at parse time (see `Cpu::step`).

use crate::error::ParseError;
use std::fmt;

/// Every opcode the machine understands, grouped in the source's original
/// declaration order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Opcode {
    Mov,
    Ldi,
    Rdm,
    Wrm,
    Cmp,
    Cmpi,
    Lsl,
    Lsr,
    Jmp,
    Jnz,
    Jez,
    Jne,
    Jpz,
    Inc,
    Dec,
    Inv,
    Add,
    Addi,
    Sub,
    Subi,
    Orl,
    Andl,
    Xorl,
    Nop,
}

impl Opcode {
    /// The number of argument tokens this opcode's instructions must carry.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Nop => 0,
            Opcode::Jmp
            | Opcode::Jnz
            | Opcode::Jez
            | Opcode::Jne
            | Opcode::Jpz
            | Opcode::Inc
            | Opcode::Dec
            | Opcode::Inv => 1,
            Opcode::Mov | Opcode::Ldi | Opcode::Rdm | Opcode::Wrm | Opcode::Cmp | Opcode::Cmpi => 2,
            Opcode::Lsl
            | Opcode::Lsr
            | Opcode::Add
            | Opcode::Addi
            | Opcode::Sub
            | Opcode::Subi
            | Opcode::Orl
            | Opcode::Andl
            | Opcode::Xorl => 3,
        }
    }

    /// Looks up an opcode by its mnemonic, case-insensitively — mnemonics
    /// are folded to uppercase before matching, unlike register tokens.
    pub fn parse(token: &str) -> Option<Opcode> {
        let upper = token.to_ascii_uppercase();
        Some(match upper.as_str() {
            "MOV" => Opcode::Mov,
            "LDI" => Opcode::Ldi,
            "RDM" => Opcode::Rdm,
            "WRM" => Opcode::Wrm,
            "CMP" => Opcode::Cmp,
            "CMPI" => Opcode::Cmpi,
            "LSL" => Opcode::Lsl,
            "LSR" => Opcode::Lsr,
            "JMP" => Opcode::Jmp,
            "JNZ" => Opcode::Jnz,
            "JEZ" => Opcode::Jez,
            "JNE" => Opcode::Jne,
            "JPZ" => Opcode::Jpz,
            "INC" => Opcode::Inc,
            "DEC" => Opcode::Dec,
            "INV" => Opcode::Inv,
            "ADD" => Opcode::Add,
            "ADDI" => Opcode::Addi,
            "SUB" => Opcode::Sub,
            "SUBI" => Opcode::Subi,
            "ORL" => Opcode::Orl,
            "ANDL" => Opcode::Andl,
            "XORL" => Opcode::Xorl,
            "NOP" => Opcode::Nop,
            _ => return None,
        })
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Mov => "MOV",
            Opcode::Ldi => "LDI",
            Opcode::Rdm => "RDM",
            Opcode::Wrm => "WRM",
            Opcode::Cmp => "CMP",
            Opcode::Cmpi => "CMPI",
            Opcode::Lsl => "LSL",
            Opcode::Lsr => "LSR",
            Opcode::Jmp => "JMP",
            Opcode::Jnz => "JNZ",
            Opcode::Jez => "JEZ",
            Opcode::Jne => "JNE",
            Opcode::Jpz => "JPZ",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Inv => "INV",
            Opcode::Add => "ADD",
            Opcode::Addi => "ADDI",
            Opcode::Sub => "SUB",
            Opcode::Subi => "SUBI",
            Opcode::Orl => "ORL",
            Opcode::Andl => "ANDL",
            Opcode::Xorl => "XORL",
            Opcode::Nop => "NOP",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A single parsed instruction: an opcode plus its raw argument tokens,
/// plus the 1-based source line it came from (for error reporting further
/// up the assembler).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    opcode: Opcode,
    args: Vec<String>,
    line: usize,
}

impl Instruction {
    /// Parses one already comment/label/directive-stripped source line.
    ///
    /// Commas are treated as whitespace; the first whitespace-separated
    /// token names the opcode (case-insensitively), the rest are kept
    /// verbatim as argument tokens.
    pub fn parse(line_text: &str, line: usize) -> Result<Instruction, ParseError> {
        let normalized = line_text.replace(',', " ");
        let mut tokens = normalized.split_whitespace();
        let mnemonic = tokens.next().unwrap_or("");
        let opcode = Opcode::parse(mnemonic).ok_or_else(|| ParseError::UnknownOpcode(mnemonic.to_owned()))?;
        let args: Vec<String> = tokens.map(|t| t.to_owned()).collect();
        if args.len() != opcode.arity() {
            return Err(ParseError::Arity {
                mnemonic: opcode.mnemonic().to_owned(),
                expected: opcode.arity(),
                got: args.len(),
            });
        }
        Ok(Instruction { opcode, args, line })
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, self.args.join(", "))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_zero_arity() {
        let inst = Instruction::parse("nop", 1).unwrap();
        assert_eq!(inst.opcode(), Opcode::Nop);
        assert!(inst.args().is_empty());
    }

    #[test]
    fn mnemonic_is_case_insensitive() {
        let inst = Instruction::parse("mOv A, B", 1).unwrap();
        assert_eq!(inst.opcode(), Opcode::Mov);
    }

    #[test]
    fn commas_are_treated_as_whitespace() {
        let inst = Instruction::parse("ADD A,B,C", 1).unwrap();
        assert_eq!(inst.args(), &["A".to_owned(), "B".to_owned(), "C".to_owned()]);
    }

    #[test]
    fn register_tokens_keep_their_case() {
        let inst = Instruction::parse("LDI A, 0x2A", 1).unwrap();
        assert_eq!(inst.args()[0], "A");
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        let err = Instruction::parse("FROB A, B", 1).unwrap_err();
        assert_eq!(err, ParseError::UnknownOpcode("FROB".to_owned()));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let err = Instruction::parse("MOV A", 1).unwrap_err();
        assert_eq!(
            err,
            ParseError::Arity {
                mnemonic: "MOV".to_owned(),
                expected: 2,
                got: 1,
            }
        );
    }
}
