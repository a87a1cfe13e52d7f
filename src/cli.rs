use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use bioinf_tools::bounds::{Bounds, BoundsError, GC_FULL, LENGTH_FULL};
use bioinf_tools::dispatch::Operation;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 bioinf version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   FASTQ filtering and DNA/RNA sequence tools";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

fn parse_bounds(x: &str) -> Result<Bounds, BoundsError> {
    Bounds::try_from(x)
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep the reads of a .fastq file which pass GC content, length and quality filters
    #[command(arg_required_else_help = true)]
    Filter {
        /// the input .fastq file
        input: String,

        /// name of the output .fastq file, created inside --outdir.
        /// nothing is written if this file already exists.
        #[arg(verbatim_doc_comment)]
        output: String,

        /// directory the output file is written into
        #[arg(long, default_value = "filtered")]
        outdir: String,

        /// keep reads whose GC content (in percent) is within the interval [a,b].
        /// a single value `b` means [0,b].
        ///   --gc-bounds 80
        ///   --gc-bounds 20,80
        #[arg(
            long,
            alias = "gc_bounds",
            value_parser = parse_bounds,
            default_value_t = GC_FULL,
            verbatim_doc_comment
        )]
        gc_bounds: Bounds,

        /// keep reads whose length is within the interval [a,b].
        /// a single value `b` means [0,b], and `b` may be `inf`.
        #[arg(
            long,
            alias = "length_bounds",
            value_parser = parse_bounds,
            default_value_t = LENGTH_FULL,
            verbatim_doc_comment
        )]
        length_bounds: Bounds,

        /// keep reads whose mean Phred quality is at least this value
        #[arg(long, alias = "quality_threshold", default_value_t = 0)]
        quality_threshold: u32,
    },

    /// Apply a transformation to one or more DNA/RNA sequences, printing one result per line
    #[command(arg_required_else_help = true)]
    Run {
        /// the sequences to transform
        #[arg(required = true)]
        seqs: Vec<String>,

        /// the operation to apply
        #[arg(short, long, value_enum)]
        operation: Operation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_defaults() {
        let cli = Cli::parse_from(["bioinf", "filter", "in.fastq", "out.fastq"]);
        let Commands::Filter {
            outdir,
            gc_bounds,
            length_bounds,
            quality_threshold,
            ..
        } = cli.command
        else {
            panic!("expected the filter subcommand");
        };

        assert_eq!(outdir, "filtered");
        assert_eq!(gc_bounds, GC_FULL);
        assert_eq!(length_bounds, LENGTH_FULL);
        assert_eq!(quality_threshold, 0);
    }

    #[test]
    fn underscore_aliases() {
        let cli = Cli::parse_from([
            "bioinf",
            "filter",
            "in.fastq",
            "out.fastq",
            "--gc_bounds",
            "90",
            "--length_bounds",
            "10,20",
            "--quality_threshold",
            "30",
        ]);
        let Commands::Filter {
            gc_bounds,
            length_bounds,
            quality_threshold,
            ..
        } = cli.command
        else {
            panic!("expected the filter subcommand");
        };

        assert_eq!(gc_bounds, Bounds::new(0.0, 90.0).unwrap());
        assert_eq!(length_bounds, Bounds::new(10.0, 20.0).unwrap());
        assert_eq!(quality_threshold, 30);
    }

    #[test]
    fn malformed_bounds_rejected() {
        let res = Cli::try_parse_from([
            "bioinf",
            "filter",
            "in.fastq",
            "out.fastq",
            "--gc-bounds",
            "10,20,30",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn run_operation() {
        let cli = Cli::parse_from(["bioinf", "run", "ATGC", "AUGC", "-o", "reverse_complement"]);
        let Commands::Run { seqs, operation } = cli.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(seqs, vec!["ATGC", "AUGC"]);
        assert_eq!(operation, Operation::ReverseComplement);

        assert!(Cli::try_parse_from(["bioinf", "run", "ATGC", "-o", "revcomp"]).is_err());
    }
}
