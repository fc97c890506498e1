//! Assembler error types.
//!
//! Two layers, same shape as the core crate's split between `ParseError`
//! and `CpuError`: [`AssembleError`] covers anything that can go wrong
//! while turning source text into a program, and [`Error`] adds the I/O
//! context (source path) that only `assemble_file` can add.

use std::fmt;
use std::path::PathBuf;

/// Something went wrong processing one source line. Always carries the
/// 1-based line number it occurred on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssembleError {
    /// The line didn't parse as an instruction (unknown mnemonic, wrong
    /// arity). Wraps the core crate's own parse error.
    Parse { line: usize, source: vcpu::ParseError },
    /// A `.byte`/`.list` directive had a malformed or out-of-range
    /// argument, or a malformed numeric literal within one.
    Directive { line: usize, message: String },
    /// A label name was defined twice.
    DuplicateLabel { line: usize, name: String },
}

impl AssembleError {
    pub fn line(&self) -> usize {
        match self {
            AssembleError::Parse { line, .. } => *line,
            AssembleError::Directive { line, .. } => *line,
            AssembleError::DuplicateLabel { line, .. } => *line,
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssembleError::Parse { line, source } => {
                write!(f, "line {}: {}", line, source)
            }
            AssembleError::Directive { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
            AssembleError::DuplicateLabel { line, name } => {
                write!(f, "line {}: label \"{}\" is already defined", line, name)
            }
        }
    }
}

impl std::error::Error for AssembleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssembleError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Top-level error from `assemble_file`: either assembly failed on some
/// line, or the file itself couldn't be read.
#[derive(Debug)]
pub enum Error {
    Assemble(AssembleError),
    Io { source: std::io::Error, path: PathBuf },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Assemble(e) => write!(f, "{}", e),
            Error::Io { source, path } => write!(f, "could not read {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Assemble(e) => Some(e),
            Error::Io { source, .. } => Some(source),
        }
    }
}

impl From<AssembleError> for Error {
    fn from(e: AssembleError) -> Error {
        Error::Assemble(e)
    }
}
