use std::str::FromStr;

use thiserror::Error;

use crate::alphabet::{SeqError, SeqType};
use crate::seq::BioSeq;
use crate::transform;

/// Written in place of the result for an input that is neither DNA nor RNA.
pub const INVALID_SEQUENCE: &str = "Invalid input: sequence must be DNA or RNA";

/// Written in place of the result when `transcribe_dna_complement` is given RNA.
pub const RNA_GIVEN: &str = "Sequence must be DNA, RNA given";

/// Operations that can be applied to a batch of sequences.
#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum Operation {
    /// DNA to RNA (T -> U), or RNA to DNA (U -> T)
    Transcribe,
    /// reverse the sequence
    Reverse,
    /// base-pairing complement
    Complement,
    /// transcribe DNA, then take the complement of the transcript. DNA only.
    TranscribeDnaComplement,
    /// reverse of the complement
    ReverseComplement,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Transcribe => "transcribe",
            Operation::Reverse => "reverse",
            Operation::Complement => "complement",
            Operation::TranscribeDnaComplement => "transcribe_dna_complement",
            Operation::ReverseComplement => "reverse_complement",
        }
    }

    /// Applies this operation to a sequence already known to be of type `ty`.
    fn apply(&self, seq: &str, ty: SeqType) -> Result<String, SeqError> {
        match self {
            Operation::Transcribe => transform::transcribe(seq, ty),
            Operation::Reverse => Ok(transform::reverse(seq)),
            Operation::Complement => transform::complement(seq, ty),
            Operation::TranscribeDnaComplement => transform::transcribe_dna_complement(seq),
            Operation::ReverseComplement => transform::reverse_complement(seq, ty),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcribe" => Ok(Operation::Transcribe),
            "reverse" => Ok(Operation::Reverse),
            "complement" => Ok(Operation::Complement),
            "transcribe_dna_complement" => Ok(Operation::TranscribeDnaComplement),
            "reverse_complement" => Ok(Operation::ReverseComplement),
            _ => Err(DispatchError::UnknownOperation(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error(
        "unknown operation `{0}`, expected one of:
  transcribe, reverse, complement, transcribe_dna_complement, reverse_complement"
    )]
    UnknownOperation(String),

    #[error(transparent)]
    Internal(#[from] SeqError),
}

/// The result of a dispatch: one string for a single input, otherwise one per input.
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    Single(String),
    Many(Vec<String>),
}

impl Output {
    /// All results in input order, regardless of how many inputs there were.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Output::Single(s) => vec![s],
            Output::Many(v) => v,
        }
    }
}

/// Runs `op` on a single input, substituting the in-band markers for invalid input.
fn dispatch_one(raw: &str, op: Operation) -> Result<String, SeqError> {
    let Some((seq, ty)) = BioSeq::nucleic(raw)
        .ok()
        .and_then(|seq| seq.seq_type().map(|ty| (seq, ty)))
    else {
        return Ok(INVALID_SEQUENCE.to_string());
    };

    if op == Operation::TranscribeDnaComplement && ty == SeqType::Rna {
        return Ok(RNA_GIVEN.to_string());
    }

    op.apply(seq.as_str(), ty)
}

/// Applies `op` to every sequence in `seqs`, each typed independently.
///
/// Inputs which are not DNA or RNA produce `INVALID_SEQUENCE` in their slot, and RNA given to
/// `transcribe_dna_complement` produces `RNA_GIVEN`; neither aborts the batch. An empty batch
/// gives an empty `Output::Many`.
///
/// # Errors
///
/// Returns `DispatchError::Internal` if a validated sequence could not be transformed, which
/// means type inference and the transform maps disagree.
///
/// # Example
///
/// ```
/// use bioinf_tools::dispatch::{run_dna_rna_tools, Operation, Output, INVALID_SEQUENCE};
///
/// let out = run_dna_rna_tools(&["ATGC"], Operation::Transcribe).unwrap();
/// assert_eq!(out, Output::Single("AUGC".to_string()));
///
/// let out = run_dna_rna_tools(&["ATGC", "XYZ"], Operation::Reverse).unwrap();
/// assert_eq!(out.into_vec(), vec!["CGTA", INVALID_SEQUENCE]);
/// ```
pub fn run_dna_rna_tools<S: AsRef<str>>(
    seqs: &[S],
    op: Operation,
) -> Result<Output, DispatchError> {
    let mut results = seqs
        .iter()
        .map(|s| dispatch_one(s.as_ref(), op))
        .collect::<Result<Vec<_>, _>>()?;

    match results.len() {
        1 => Ok(Output::Single(results.remove(0))),
        _ => Ok(Output::Many(results)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(s: &str) -> Output {
        Output::Single(s.to_string())
    }

    #[test]
    fn transcribe_single() {
        assert_eq!(
            run_dna_rna_tools(&["ATGC"], Operation::Transcribe),
            Ok(single("AUGC"))
        );
    }

    #[test]
    fn invalid_input_marker() {
        for op in [
            Operation::Transcribe,
            Operation::Reverse,
            Operation::Complement,
            Operation::TranscribeDnaComplement,
            Operation::ReverseComplement,
        ] {
            assert_eq!(run_dna_rna_tools(&["XYZ"], op), Ok(single(INVALID_SEQUENCE)));
        }
    }

    #[test]
    fn mixed_t_and_u_is_invalid() {
        assert_eq!(
            run_dna_rna_tools(&["ATU"], Operation::Reverse),
            Ok(single(INVALID_SEQUENCE))
        );
    }

    #[test]
    fn rna_given_to_dna_only_operation() {
        assert_eq!(
            run_dna_rna_tools(&["AUGC"], Operation::TranscribeDnaComplement),
            Ok(single(RNA_GIVEN))
        );
    }

    #[test]
    fn batch_keeps_order_and_types_each_input() {
        let out = run_dna_rna_tools(&["ATGC", "AUGC", "nope", "gg"], Operation::Complement);
        assert_eq!(
            out,
            Ok(Output::Many(vec![
                "TACG".to_string(),
                "UACG".to_string(),
                INVALID_SEQUENCE.to_string(),
                "cc".to_string(),
            ]))
        );
    }

    #[test]
    fn batch_with_dna_only_operation() {
        let out = run_dna_rna_tools(
            &["ATGC", "AUGC", "X"],
            Operation::TranscribeDnaComplement,
        )
        .unwrap();
        assert_eq!(out.into_vec(), vec!["UACG", RNA_GIVEN, INVALID_SEQUENCE]);
    }

    #[test]
    fn reverse_complement_batch() {
        let seqs = vec![String::from("ATGC"), String::from("aaug")];
        let out = run_dna_rna_tools(&seqs, Operation::ReverseComplement).unwrap();
        assert_eq!(out.into_vec(), vec!["GCAT", "cauu"]);
    }

    #[test]
    fn empty_batch_gives_empty_list() {
        let empty: [&str; 0] = [];
        for op in [Operation::Reverse, Operation::TranscribeDnaComplement] {
            assert_eq!(run_dna_rna_tools(&empty, op), Ok(Output::Many(Vec::new())));
        }
    }

    #[test]
    fn empty_sequence_is_dna() {
        assert_eq!(run_dna_rna_tools(&[""], Operation::Complement), Ok(single("")));
        assert_eq!(
            run_dna_rna_tools(&[""], Operation::TranscribeDnaComplement),
            Ok(single(""))
        );
    }

    #[test]
    fn operation_names_round_trip() {
        for name in [
            "transcribe",
            "reverse",
            "complement",
            "transcribe_dna_complement",
            "reverse_complement",
        ] {
            assert_eq!(name.parse::<Operation>().unwrap().name(), name);
        }
    }

    #[test]
    fn unknown_operation_is_an_error() {
        assert_eq!(
            "revcomp".parse::<Operation>(),
            Err(DispatchError::UnknownOperation("revcomp".to_string()))
        );
    }
}
