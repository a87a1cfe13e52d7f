// no lookup tables: every map is a hardcoded match, one per (operation, type) pair

use crate::alphabet::{SeqError, SeqType};

fn map_bases(seq: &str, ty: SeqType, f: impl Fn(char) -> Option<char>) -> Result<String, SeqError> {
    seq.char_indices()
        .map(|(pos, ch)| f(ch).ok_or(SeqError::InvalidCharacter { ch, pos, ty }))
        .collect()
}

fn transcribe_base(ty: SeqType, b: char) -> Option<char> {
    match (ty, b) {
        (_, 'A' | 'a' | 'G' | 'g' | 'C' | 'c') => Some(b),
        (SeqType::Dna, 'T') => Some('U'),
        (SeqType::Dna, 't') => Some('u'),
        (SeqType::Rna, 'U') => Some('T'),
        (SeqType::Rna, 'u') => Some('t'),
        _ => None,
    }
}

fn complement_base(ty: SeqType, b: char) -> Option<char> {
    // the partner of A depends on the type, G and C pair the same way in both
    let partner_of_a = match ty {
        SeqType::Dna => 'T',
        SeqType::Rna => 'U',
    };

    let upper = match b.to_ascii_uppercase() {
        'A' => partner_of_a,
        'G' => 'C',
        'C' => 'G',
        x if x == partner_of_a => 'A',
        _ => return None,
    };

    Some(if b.is_ascii_lowercase() {
        upper.to_ascii_lowercase()
    } else {
        upper
    })
}

/// Swaps `T` for `U` in DNA, or `U` for `T` in RNA. Case is preserved.
pub fn transcribe(seq: &str, ty: SeqType) -> Result<String, SeqError> {
    map_bases(seq, ty, |b| transcribe_base(ty, b))
}

/// Reverses the character order. Works on any string.
pub fn reverse(seq: &str) -> String {
    seq.chars().rev().collect()
}

/// Replaces every base with its pairing partner: `A<->T, G<->C` for DNA and `A<->U, G<->C` for
/// RNA. Case is preserved.
pub fn complement(seq: &str, ty: SeqType) -> Result<String, SeqError> {
    map_bases(seq, ty, |b| complement_base(ty, b))
}

pub fn reverse_complement(seq: &str, ty: SeqType) -> Result<String, SeqError> {
    Ok(reverse(&complement(seq, ty)?))
}

/// Transcribes a DNA sequence, then returns the RNA complement of the transcript.
pub fn transcribe_dna_complement(seq: &str) -> Result<String, SeqError> {
    complement(&transcribe(seq, SeqType::Dna)?, SeqType::Rna)
}
