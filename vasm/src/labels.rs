//! Label definition lines (`name:`).

use crate::error::AssembleError;
use vcpu::Labels;

/// Strips the trailing `:` from a label-definition line and records it,
/// pointing at `program_index` — the index the *next* emitted instruction
/// will occupy. Fails if the name was already defined.
pub fn record_label(
    labels: &mut Labels,
    line: &str,
    line_no: usize,
    program_index: usize,
) -> Result<(), AssembleError> {
    let name = line.trim_end_matches(':').trim().to_owned();
    if labels.contains_key(&name) {
        return Err(AssembleError::DuplicateLabel { line: line_no, name });
    }
    labels.insert(name, program_index);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_label_at_current_index() {
        let mut labels = Labels::new();
        record_label(&mut labels, "loop:", 1, 3).unwrap();
        assert_eq!(labels.get("loop"), Some(&3));
    }

    #[test]
    fn duplicate_label_is_an_error() {
        let mut labels = Labels::new();
        record_label(&mut labels, "loop:", 1, 0).unwrap();
        let err = record_label(&mut labels, "loop:", 5, 2).unwrap_err();
        assert_eq!(err.line(), 5);
    }
}
