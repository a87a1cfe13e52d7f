use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::filter::{filter, FilterOpts};
use crate::io::{read_fastq, until_err, write_record, Record};

/// What a filtering run did.
#[derive(Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The output path was already taken, so nothing was read or written.
    AlreadyExists(PathBuf),
    /// Every record was read. The output file exists only if `kept > 0`.
    Written {
        path: PathBuf,
        total: usize,
        kept: usize,
    },
}

/// Survivors are written to a temporary file next to the destination, which is renamed into
/// place only once every record has been read. Until then `path` does not exist.
struct PendingOutput {
    path: PathBuf,
    // directories made for this output, deepest first
    created_dirs: Vec<PathBuf>,
    writer: BufWriter<NamedTempFile>,
}

impl PendingOutput {
    fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let created_dirs: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|d| !d.as_os_str().is_empty() && !d.exists())
            .map(Path::to_path_buf)
            .collect();

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Unable to create directory {}", dir.display()))?;

        let temp = match NamedTempFile::new_in(&dir) {
            Ok(temp) => temp,
            Err(e) => {
                remove_dirs(&created_dirs);
                return Err(e).with_context(|| {
                    format!("Unable to create a temporary file in {}", dir.display())
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            created_dirs,
            writer: BufWriter::new(temp),
        })
    }

    fn write(&mut self, rec: &Record) -> Result<()> {
        write_record(&mut self.writer, rec)
            .with_context(|| format!("Unable to write to {}", self.path.display()))
    }

    /// Moves the finished file to its destination. Fails rather than replace a file which
    /// appeared after the initial existence check.
    fn persist(self) -> Result<()> {
        let PendingOutput {
            path,
            created_dirs,
            writer,
        } = self;

        let res = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|temp| temp.persist_noclobber(&path).map_err(|e| e.error))
            .with_context(|| format!("Unable to create output file {}", path.display()));

        if res.is_err() {
            remove_dirs(&created_dirs);
        }
        res.map(|_| ())
    }

    /// Drops the temporary file and any directory made for it.
    fn discard(self) {
        let PendingOutput {
            created_dirs,
            writer,
            ..
        } = self;
        drop(writer);
        remove_dirs(&created_dirs);
    }
}

fn remove_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        if let Err(e) = std::fs::remove_dir(dir) {
            debug!("Could not remove {}: {e}", dir.display());
            break;
        }
    }
}

fn stream_survivors(
    records: impl Iterator<Item = Result<Record>>,
    output: &Path,
    opts: &FilterOpts,
    pending: &mut Option<PendingOutput>,
) -> Result<(usize, usize)> {
    // Start with a placeholder error object. This will be mutated if a record cannot be read.
    let mut err = Ok(());

    let mut total = 0usize;
    let mut kept = 0usize;

    records
        .scan(&mut err, until_err)
        .try_for_each(|rec| -> Result<()> {
            total += 1;

            if total % 50000 == 0 {
                info!("Processed: {total}");
            }

            if !filter(&rec, opts) {
                return Ok(());
            }

            if pending.is_none() {
                debug!("First read passed, creating {}", output.display());
                *pending = Some(PendingOutput::create(output)?);
            }
            if let Some(out) = pending.as_mut() {
                out.write(&rec)?;
            }
            kept += 1;

            Ok(())
        })?;

    err?;

    Ok((total, kept))
}

fn write_survivors(
    records: impl Iterator<Item = Result<Record>>,
    output: &Path,
    opts: &FilterOpts,
) -> Result<FilterOutcome> {
    // created on the first surviving record, so nothing appears if nothing passes
    let mut pending = None;

    let (total, kept) = match (stream_survivors(records, output, opts, &mut pending), pending) {
        (Ok(counts), Some(out)) => {
            out.persist()?;
            counts
        }
        (Ok(counts), None) => counts,
        (Err(e), out) => {
            if let Some(out) = out {
                out.discard();
            }
            return Err(e);
        }
    };

    Ok(FilterOutcome::Written {
        path: output.to_path_buf(),
        total,
        kept,
    })
}

fn already_exists(output: &Path) -> Option<FilterOutcome> {
    output
        .exists()
        .then(|| FilterOutcome::AlreadyExists(output.to_path_buf()))
}

/// Writes the records of `records` which pass `opts` to `output`, in their original order.
///
/// If `output` already exists, nothing is read and `FilterOutcome::AlreadyExists` is returned.
/// If no record passes, neither the output file nor its directory is created. If a record
/// cannot be read, `output` is not created either, even when earlier records passed.
///
/// # Errors
///
/// This function will return an error if a record cannot be read, or if the output cannot be
/// created or written.
pub fn filter_to_file(
    records: impl IntoIterator<Item = Result<Record>>,
    output: &Path,
    opts: &FilterOpts,
) -> Result<FilterOutcome> {
    if let Some(outcome) = already_exists(output) {
        return Ok(outcome);
    }

    write_survivors(records.into_iter(), output, opts)
}

/// Filters the FASTQ file `input` into `output`. See `filter_to_file` for the behaviour when
/// `output` exists, nothing passes or the input is malformed.
///
/// # Notes
/// The existence check and the creation of `output` are not atomic. If another process creates
/// `output` in between, the run fails rather than overwriting it.
pub fn filter_fastq(input: &Path, output: &Path, opts: &FilterOpts) -> Result<FilterOutcome> {
    // checked before the input is opened
    if let Some(outcome) = already_exists(output) {
        return Ok(outcome);
    }

    info!(
        "Filtering {} with GC% in [{}], length in [{}], mean quality >= {}",
        input.display(),
        opts.gc,
        opts.len,
        opts.quality_threshold
    );

    let outcome = write_survivors(read_fastq(input)?, output, opts)?;

    if let FilterOutcome::Written { total, kept, .. } = &outcome {
        info!(
            "Stats: {} reads, {} kept, {} filtered",
            total,
            kept,
            total - kept
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use indoc::indoc;

    const THREE_READS: &str = indoc! {"
        @r1
        ATGC
        +
        IIII
        @r2
        GGCC
        +
        !!!!
        @r3 second copy
        GCGA
        +
        I5I5
    "};

    fn quality(threshold: f64) -> FilterOpts {
        FilterOpts {
            quality_threshold: threshold,
            ..FilterOpts::default()
        }
    }

    #[test]
    fn keeps_passing_reads_in_order() {
        let dir = TempDir::new().unwrap();
        let input = dir.child("in.fastq");
        input.write_str(THREE_READS).unwrap();
        let output = dir.child("filtered").child("out.fastq");

        let outcome = filter_fastq(input.path(), output.path(), &quality(30.0)).unwrap();

        assert_eq!(
            outcome,
            FilterOutcome::Written {
                path: output.path().to_path_buf(),
                total: 3,
                kept: 2
            }
        );
        output.assert("@r1\nATGC\n+\nIIII\n@r3 second copy\nGCGA\n+\nI5I5\n");
    }

    #[test]
    fn nothing_created_when_nothing_passes() {
        let dir = TempDir::new().unwrap();
        let input = dir.child("in.fastq");
        input.write_str("@r1\nATGC\n+\n!!!!\n").unwrap();
        let outdir = dir.child("filtered");
        let output = outdir.child("out.fastq");

        let outcome = filter_fastq(input.path(), output.path(), &quality(10.0)).unwrap();

        assert!(matches!(outcome, FilterOutcome::Written { total: 1, kept: 0, .. }));
        outdir.assert(predicates::path::missing());
    }

    #[test]
    fn existing_output_is_untouched() {
        let dir = TempDir::new().unwrap();
        let input = dir.child("in.fastq");
        input.write_str(THREE_READS).unwrap();
        let output = dir.child("out.fastq");
        output.write_str("keep me").unwrap();

        let outcome = filter_fastq(input.path(), output.path(), &quality(0.0)).unwrap();

        assert_eq!(outcome, FilterOutcome::AlreadyExists(output.path().to_path_buf()));
        output.assert("keep me");
    }

    #[test]
    fn existing_output_short_circuits_before_reading() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("out.fastq");
        output.touch().unwrap();

        // the input does not exist, which would fail if it were opened
        let outcome = filter_fastq(
            &dir.path().join("missing.fastq"),
            output.path(),
            &FilterOpts::default(),
        )
        .unwrap();

        assert!(matches!(outcome, FilterOutcome::AlreadyExists(_)));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = filter_fastq(
            &dir.path().join("missing.fastq"),
            &dir.path().join("out.fastq"),
            &FilterOpts::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Unable to open file"));
    }

    #[test]
    fn in_memory_records() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("nested").child("out.fastq");
        let records = [("a", "GCGA", "IIII"), ("b", "ATAT", "IIII"), ("a", "GCGC", "IIII")]
            .into_iter()
            .map(|(id, seq, qual)| {
                Record::from_fastq_parts(id, seq, qual).map_err(anyhow::Error::from)
            });

        let opts = FilterOpts {
            gc: crate::bounds::Bounds::upper(90.0).unwrap(),
            ..FilterOpts::default()
        };
        let outcome = filter_to_file(records, output.path(), &opts).unwrap();

        assert!(matches!(outcome, FilterOutcome::Written { total: 3, kept: 2, .. }));
        output.assert("@a\nGCGA\n+\nIIII\n@b\nATAT\n+\nIIII\n");
    }

    #[test]
    fn read_error_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let output = dir.child("out.fastq");
        let records = vec![
            Ok(Record::from_fastq_parts("a", "GCGA", "IIII").unwrap()),
            Err(anyhow::anyhow!("broken record")),
        ];

        let err = filter_to_file(records, output.path(), &FilterOpts::default()).unwrap_err();
        assert_eq!(err.to_string(), "broken record");
        output.assert(predicates::path::missing());
        // no temporary file is left behind either
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn read_error_removes_created_directories() {
        let dir = TempDir::new().unwrap();
        let outdir = dir.child("filtered");
        let output = outdir.child("run1").child("out.fastq");
        let records = vec![
            Ok(Record::from_fastq_parts("a", "GCGA", "IIII").unwrap()),
            Ok(Record::from_fastq_parts("b", "GCGC", "IIII").unwrap()),
            Err(anyhow::anyhow!("broken record")),
        ];

        assert!(filter_to_file(records, output.path(), &FilterOpts::default()).is_err());
        outdir.assert(predicates::path::missing());
    }

    #[test]
    fn read_error_keeps_an_existing_directory() {
        let dir = TempDir::new().unwrap();
        let outdir = dir.child("filtered");
        outdir.child("other.fastq").touch().unwrap();
        let output = outdir.child("out.fastq");
        let records = vec![
            Ok(Record::from_fastq_parts("a", "GCGA", "IIII").unwrap()),
            Err(anyhow::anyhow!("broken record")),
        ];

        assert!(filter_to_file(records, output.path(), &FilterOpts::default()).is_err());
        output.assert(predicates::path::missing());
        outdir.child("other.fastq").assert(predicates::path::exists());
        assert_eq!(std::fs::read_dir(outdir.path()).unwrap().count(), 1);
    }

    #[test]
    fn malformed_fastq_after_a_passing_read_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.child("in.fastq");
        input
            .write_str("@r1\nATGC\n+\nIIII\n@r2\nATGC\n+\nII\n")
            .unwrap();
        let outdir = dir.child("filtered");
        let output = outdir.child("out.fastq");

        assert!(filter_fastq(input.path(), output.path(), &FilterOpts::default()).is_err());
        outdir.assert(predicates::path::missing());
    }
}
