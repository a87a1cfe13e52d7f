use bio::alphabets;
use thiserror::Error;

/// The two nucleic acid types a raw string can be inferred as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SeqType {
    Dna,
    Rna,
}

impl std::fmt::Display for SeqType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeqType::Dna => f.write_str("DNA"),
            SeqType::Rna => f.write_str("RNA"),
        }
    }
}

/// Fixed character sets for each kind of biological sequence. Both cases are accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    Dna,
    Rna,
    AminoAcid,
}

impl Alphabet {
    /// Returns the symbols of this alphabet, upper and lower case.
    pub fn symbols(&self) -> alphabets::Alphabet {
        match self {
            Alphabet::Dna => alphabets::dna::alphabet(),
            Alphabet::Rna => alphabets::Alphabet::new(b"ACGUacgu"),
            Alphabet::AminoAcid => alphabets::protein::alphabet(),
        }
    }

    /// Checks that every character of `seq` belongs to this alphabet.
    pub fn is_word(&self, seq: &str) -> bool {
        self.symbols().is_word(seq.as_bytes())
    }

    /// Position and value of the first character of `seq` outside this alphabet, if any.
    pub fn first_invalid(&self, seq: &str) -> Option<(usize, char)> {
        let symbols = self.symbols();
        seq.char_indices()
            .find(|&(_, c)| !c.is_ascii() || !symbols.symbols.contains(c as usize))
    }
}

impl From<SeqType> for Alphabet {
    fn from(ty: SeqType) -> Self {
        match ty {
            SeqType::Dna => Alphabet::Dna,
            SeqType::Rna => Alphabet::Rna,
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::Dna => f.write_str("DNA"),
            Alphabet::Rna => f.write_str("RNA"),
            Alphabet::AminoAcid => f.write_str("amino acid"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeqError {
    #[error("sequence is neither DNA nor RNA")]
    NotNucleicAcid,

    #[error("invalid {kind} residue '{residue}' at position {pos}")]
    InvalidResidue {
        residue: char,
        pos: usize,
        kind: Alphabet,
    },

    /// A character slipped past validation into a transform. This is a bug in type inference.
    #[error("character '{ch}' at position {pos} has no {ty} mapping (type inference let it through)")]
    InvalidCharacter { ch: char, pos: usize, ty: SeqType },
}

/// Classifies a raw string as DNA or RNA.
///
/// A string is rejected if it holds anything other than `A`, `U`, `T`, `G`, `C` (either case),
/// or if it mixes `T` and `U`. Any `U` makes it RNA; everything else, including the empty
/// string and strings of only `A`/`G`/`C`, is DNA.
pub fn infer_type(seq: &str) -> Result<SeqType, SeqError> {
    let mut has_t = false;
    let mut has_u = false;

    for c in seq.chars() {
        match c {
            'A' | 'a' | 'G' | 'g' | 'C' | 'c' => {}
            'T' | 't' => has_t = true,
            'U' | 'u' => has_u = true,
            _ => return Err(SeqError::NotNucleicAcid),
        }
    }

    match (has_t, has_u) {
        (true, true) => Err(SeqError::NotNucleicAcid),
        (_, true) => Ok(SeqType::Rna),
        _ => Ok(SeqType::Dna),
    }
}
