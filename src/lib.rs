//! FASTQ filtering by GC content, length and mean quality, and elementary DNA/RNA sequence
//! transformations.
//!
//! The transform and predicate modules are pure; only [`pipeline`] touches the filesystem or
//! logs.

#[macro_use]
extern crate log;

pub mod alphabet;
pub mod bounds;
pub mod dispatch;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod seq;
pub mod transform;
