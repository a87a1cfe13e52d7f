use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use needletail::parser::{FastqReader, SequenceRecord};
use needletail::FastxReader;
use thiserror::Error;

/// Offset added to a Phred score to produce its FASTQ quality character.
pub const PHRED_OFFSET: u8 = 33;

/// A single FASTQ read. `qual` holds decoded Phred scores, one per base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: String,
    seq: String,
    qual: Vec<u8>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("record `{id}` has {seq_len} bases but {qual_len} quality scores")]
    LengthMismatch {
        id: String,
        seq_len: usize,
        qual_len: usize,
    },

    #[error("record `{id}` has quality character {byte:#04x} at position {pos}, below the Phred+33 range")]
    QualityOutOfRange { id: String, byte: u8, pos: usize },

    #[error("record `{id}` has no quality line")]
    MissingQuality { id: String },
}

impl Record {
    /// Creates a record from decoded Phred scores.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::LengthMismatch` if `seq` and `qual` differ in length.
    pub fn new(id: String, seq: String, qual: Vec<u8>) -> Result<Self, RecordError> {
        if seq.len() != qual.len() {
            return Err(RecordError::LengthMismatch {
                id,
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }

        Ok(Record { id, seq, qual })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    /// Decoded Phred scores, one per base.
    pub fn qual(&self) -> &[u8] {
        &self.qual
    }

    /// Creates a record from a quality line as it appears in a FASTQ file.
    pub fn from_fastq_parts(id: &str, seq: &str, qual: &str) -> Result<Self, RecordError> {
        let scores = decode_quality(id, qual.as_bytes())?;
        Record::new(id.to_string(), seq.to_string(), scores)
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn phred_quality_total(&self) -> u64 {
        self.qual.iter().map(|&q| q as u64).sum()
    }

    /// Mean Phred score of the read, or `None` for an empty read.
    pub fn phred_quality_avg(&self) -> Option<f64> {
        if self.qual.is_empty() {
            return None;
        }
        Some(self.phred_quality_total() as f64 / self.qual.len() as f64)
    }

    /// Percentage of bases which are `G` or `C`. Only uppercase bases are counted.
    /// `None` for an empty read.
    pub fn gc_content(&self) -> Option<f64> {
        if self.seq.is_empty() {
            return None;
        }

        let gc = self
            .seq
            .bytes()
            .filter(|&b| b == b'G' || b == b'C')
            .count();

        Some(100.0 * gc as f64 / self.len() as f64)
    }

    /// The quality line, re-encoded to Phred+33 characters.
    pub fn encoded_qual(&self) -> Vec<u8> {
        self.qual.iter().map(|&q| q.saturating_add(PHRED_OFFSET)).collect()
    }
}

fn decode_quality(id: &str, qual: &[u8]) -> Result<Vec<u8>, RecordError> {
    qual.iter()
        .enumerate()
        .map(|(pos, &byte)| {
            byte.checked_sub(PHRED_OFFSET)
                .ok_or_else(|| RecordError::QualityOutOfRange {
                    id: id.to_string(),
                    byte,
                    pos,
                })
        })
        .collect()
}

impl<'a> TryFrom<SequenceRecord<'a>> for Record {
    type Error = anyhow::Error;

    fn try_from(rec: SequenceRecord<'a>) -> anyhow::Result<Self> {
        let id = String::from_utf8(rec.id().to_vec()).context("Read ID is not valid UTF-8")?;
        let seq =
            String::from_utf8(rec.raw_seq().to_vec()).context("Sequence is not valid UTF-8")?;
        let Some(qual) = rec.qual() else {
            anyhow::bail!(RecordError::MissingQuality { id });
        };
        let qual = decode_quality(&id, qual)?;

        Ok(Record::new(id, seq, qual)?)
    }
}

/// Opens a FASTQ file and iterates over its records one at a time.
///
/// # Errors
///
/// This function will return an error if the file cannot be opened. The iterator yields
/// `Some(Err)` for a record which cannot be parsed; the caller should stop at the first one.
pub fn read_fastq(path: &Path) -> anyhow::Result<impl Iterator<Item = anyhow::Result<Record>>> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open file {}", path.display()))?;
    let mut reader = FastqReader::new(file);

    Ok(std::iter::from_fn(move || {
        let rec = reader.next()?;
        Some(
            rec.context("Malformed FASTQ record")
                .and_then(Record::try_from),
        )
    }))
}

/// Utility function to extract the error from an iterator and stop iteration immediately. Useful
/// for iterators which yield a Result<T>.
///
/// # Returns
///
/// This function returns an `Option<T>`. If the item is `Ok`, it returns `Some(T)`.
/// If the item is `Err`, it updates `err` with the error and returns `None`.
pub fn until_err<T>(err: &mut &mut anyhow::Result<()>, item: anyhow::Result<T>) -> Option<T> {
    match item {
        Ok(item) => Some(item),
        Err(e) => {
            **err = Err(e);
            None
        }
    }
}

/// Writes a record as four FASTQ lines: `@id`, the bases, `+`, and the Phred+33 quality.
///
/// # Arguments
///
/// * `writer` - Anything implementing `std::io::Write`. This is *not* `std::fmt::Write`, so to
///   write into memory use a `Vec<u8>` or a `std::io::Cursor`.
/// * `record` - The record to write.
pub fn write_record(writer: &mut impl Write, record: &Record) -> std::io::Result<()> {
    writeln!(writer, "@{}", record.id)?;
    writeln!(writer, "{}", record.seq)?;
    writer.write_all(b"+\n")?;
    writer.write_all(&record.encoded_qual())?;
    writer.write_all(b"\n")
}
