use crate::bounds::{Bounds, GC_FULL, LENGTH_FULL};
use crate::io::Record;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterOpts {
    /// GC content, in percent
    pub gc: Bounds,
    pub len: Bounds,
    /// minimum mean Phred score (inclusive)
    pub quality_threshold: f64,
}

impl Default for FilterOpts {
    fn default() -> Self {
        FilterOpts {
            gc: GC_FULL,
            len: LENGTH_FULL,
            quality_threshold: 0.0,
        }
    }
}

/// Decides whether a read is kept. A read passes when its length and GC content fall inside
/// their bounds and its mean quality is at least the threshold. Empty reads have no GC content
/// and never pass.
pub fn filter(read: &Record, opts: &FilterOpts) -> bool {
    let (Some(gc), Some(quality)) = (read.gc_content(), read.phred_quality_avg()) else {
        return false;
    };

    opts.len.contains(read.len() as f64)
        && opts.gc.contains(gc)
        && quality >= opts.quality_threshold
}

/// Applies `filter` to an in-memory collection of reads, keeping their order.
pub fn filter_records<'a, I>(reads: I, opts: &'a FilterOpts) -> impl Iterator<Item = Record> + 'a
where
    I: IntoIterator<Item = Record>,
    I::IntoIter: 'a,
{
    reads.into_iter().filter(move |read| filter(read, opts))
}
