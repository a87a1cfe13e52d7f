//! Sequences validated against an alphabet. The dispatch layer builds one per input to type it.

use std::fmt;

use crate::alphabet::{infer_type, Alphabet, SeqError, SeqType};

/// A validated biological sequence: a residue string tagged with the alphabet it was checked
/// against. DNA, RNA and amino acid sequences share this one representation; behaviour that
/// differs between kinds lives in free functions which match on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BioSeq {
    kind: Alphabet,
    residues: String,
}

impl BioSeq {
    /// Validates `residues` against the alphabet of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `SeqError::InvalidResidue` pointing at the first character outside the alphabet.
    pub fn new(kind: Alphabet, residues: impl Into<String>) -> Result<Self, SeqError> {
        let residues = residues.into();

        if let Some((pos, residue)) = kind.first_invalid(&residues) {
            return Err(SeqError::InvalidResidue { residue, pos, kind });
        }

        Ok(Self { kind, residues })
    }

    /// Builds a DNA or RNA sequence, inferring which from the residues.
    pub fn nucleic(residues: impl Into<String>) -> Result<Self, SeqError> {
        let residues = residues.into();
        let ty = infer_type(&residues)?;
        Ok(Self {
            kind: ty.into(),
            residues,
        })
    }

    pub fn kind(&self) -> Alphabet {
        self.kind
    }

    /// The nucleic acid type, or `None` for amino acid sequences.
    pub fn seq_type(&self) -> Option<SeqType> {
        match self.kind {
            Alphabet::Dna => Some(SeqType::Dna),
            Alphabet::Rna => Some(SeqType::Rna),
            Alphabet::AminoAcid => None,
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The residue at position `i`.
    pub fn get(&self, i: usize) -> Option<char> {
        self.residues.as_bytes().get(i).map(|&b| b as char)
    }

    pub fn as_str(&self) -> &str {
        &self.residues
    }

    /// Percentage of G and C residues (either case). `None` for amino acid or empty sequences.
    pub fn gc_content(&self) -> Option<f64> {
        if self.seq_type().is_none() || self.is_empty() {
            return None;
        }

        let gc = self
            .residues
            .bytes()
            .filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c'))
            .count();

        Some(100.0 * gc as f64 / self.len() as f64)
    }
}

impl fmt::Display for BioSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.residues)
    }
}
