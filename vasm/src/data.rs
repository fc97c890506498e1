//! `.byte` and `.list` directive processing.

use crate::error::AssembleError;
use vcpu::numeric::parse_auto_base;
use vcpu::Memory;

const BYTE_DATA_MIN: i64 = -128;
const BYTE_DATA_MAX: i64 = 255;
const MEMORY_ADDR_MIN: i64 = 0;
const MEMORY_ADDR_MAX: i64 = 1023;
const LIST_LENGTH_MIN: usize = 1;
const LIST_LENGTH_MAX: usize = 10;

fn directive_error(line_no: usize, message: impl Into<String>) -> AssembleError {
    AssembleError::Directive {
        line: line_no,
        message: message.into(),
    }
}

fn parse_address(token: &str, line_no: usize) -> Result<usize, AssembleError> {
    let value = parse_auto_base(token).map_err(|e| directive_error(line_no, e.to_string()))?;
    if !(MEMORY_ADDR_MIN..=MEMORY_ADDR_MAX).contains(&value) {
        return Err(directive_error(
            line_no,
            format!("address {} out of bounds (0 to {})", value, MEMORY_ADDR_MAX),
        ));
    }
    Ok(value as usize)
}

fn parse_data_byte(token: &str, line_no: usize) -> Result<i16, AssembleError> {
    let value = parse_auto_base(token).map_err(|e| directive_error(line_no, e.to_string()))?;
    if !(BYTE_DATA_MIN..=BYTE_DATA_MAX).contains(&value) {
        return Err(directive_error(
            line_no,
            format!("data value {} out of bounds ({} to {})", value, BYTE_DATA_MIN, BYTE_DATA_MAX),
        ));
    }
    Ok(value as i16)
}

/// Applies a line already known to begin with a directive keyword
/// (something containing `.`). The keyword is matched case-insensitively,
/// matching the source this machine is modeled on (`tokens[0].lower()`).
/// Unknown directive keywords are silently ignored per spec.md §6.
pub fn apply_directive(memory: &mut Memory, keyword: &str, rest: &[&str], line_no: usize) -> Result<(), AssembleError> {
    match keyword.to_ascii_lowercase().as_str() {
        ".byte" => apply_byte(memory, rest, line_no),
        ".list" => apply_list(memory, rest, line_no),
        _ => Ok(()),
    }
}

fn apply_byte(memory: &mut Memory, rest: &[&str], line_no: usize) -> Result<(), AssembleError> {
    if rest.len() != 2 {
        return Err(directive_error(
            line_no,
            format!(".byte requires 2 arguments, {} were given", rest.len()),
        ));
    }
    let addr = parse_address(rest[0], line_no)?;
    let data = parse_data_byte(rest[1], line_no)?;
    memory
        .write(addr, data)
        .map_err(|e| directive_error(line_no, e.to_string()))
}

fn apply_list(memory: &mut Memory, rest: &[&str], line_no: usize) -> Result<(), AssembleError> {
    if rest.len() < 2 {
        return Err(directive_error(line_no, ".list requires at least a length and address"));
    }
    let length: usize = rest[0]
        .parse()
        .map_err(|_| directive_error(line_no, format!("malformed .list length \"{}\"", rest[0])))?;
    if !(LIST_LENGTH_MIN..=LIST_LENGTH_MAX).contains(&length) {
        return Err(directive_error(
            line_no,
            format!("{} is not in correct range ({} to {})", length, LIST_LENGTH_MIN, LIST_LENGTH_MAX),
        ));
    }
    if rest.len() != 2 + length {
        return Err(directive_error(
            line_no,
            format!(".list declares length {} but {} values were given", length, rest.len() - 2),
        ));
    }
    let addr = parse_address(rest[1], line_no)?;
    for (i, token) in rest[2..].iter().enumerate() {
        let data = parse_data_byte(token, line_no)?;
        // The original interpreter never checks `addr + length - 1` against
        // the memory bound, so a long enough `.list` silently clobbers
        // whatever memory wraps into; we reject that here instead (the
        // spec explicitly names this as a defect worth rejecting rather
        // than reproducing, rather than one of the bugs to preserve).
        memory
            .write(addr + i, data)
            .map_err(|e| directive_error(line_no, e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_directive_writes_one_cell() {
        let mut memory = Memory::new();
        apply_directive(&mut memory, ".byte", &["0x010", "99"], 1).unwrap();
        assert_eq!(memory.read(0x10).unwrap(), 99);
    }

    #[test]
    fn byte_directive_keyword_is_case_insensitive() {
        let mut memory = Memory::new();
        apply_directive(&mut memory, ".BYTE", &["0x010", "99"], 1).unwrap();
        assert_eq!(memory.read(0x10).unwrap(), 99);
    }

    #[test]
    fn byte_directive_accepts_negative_data() {
        let mut memory = Memory::new();
        apply_directive(&mut memory, ".byte", &["0", "-1"], 1).unwrap();
        assert_eq!(memory.read(0).unwrap(), -1);
    }

    #[test]
    fn byte_directive_rejects_out_of_range_address() {
        let mut memory = Memory::new();
        let err = apply_directive(&mut memory, ".byte", &["1024", "1"], 1).unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn list_directive_writes_contiguous_cells() {
        let mut memory = Memory::new();
        apply_directive(&mut memory, ".list", &["3", "0", "1", "2", "3"], 1).unwrap();
        assert_eq!(memory.read(0).unwrap(), 1);
        assert_eq!(memory.read(1).unwrap(), 2);
        assert_eq!(memory.read(2).unwrap(), 3);
    }

    #[test]
    fn list_directive_rejects_length_out_of_range() {
        let mut memory = Memory::new();
        let err = apply_directive(&mut memory, ".list", &["0", "0"], 1).unwrap_err();
        assert_eq!(err.line(), 1);
        let too_long: Vec<&str> = {
            let mut v = vec!["11", "0"];
            v.extend(std::iter::repeat("1").take(11));
            v
        };
        let err = apply_directive(&mut memory, ".list", &too_long, 1).unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn list_directive_rejects_overflowing_the_memory_bound() {
        let mut memory = Memory::new();
        let err = apply_directive(&mut memory, ".list", &["2", "1023", "1", "2"], 1).unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn unknown_directive_is_silently_ignored() {
        let mut memory = Memory::new();
        apply_directive(&mut memory, ".origin", &["0"], 1).unwrap();
        assert_eq!(memory.read(0).unwrap(), 0);
    }
}
