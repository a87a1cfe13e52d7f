extern crate env_logger;
#[macro_use]
extern crate log;
use std::{
    io::{prelude::*, stdout, BufWriter},
    path::Path,
};

use anyhow::Result;
use clap::Parser;

mod cli;

use bioinf_tools::filter::FilterOpts;
use bioinf_tools::pipeline::{self, FilterOutcome};
use bioinf_tools::dispatch;
use cli::{Cli, Commands};

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    debug!("bioinf v{}", cli::VERSION);

    match &cli.command {
        Commands::Filter {
            input,
            output,
            outdir,
            gc_bounds,
            length_bounds,
            quality_threshold,
        } => {
            let opts = FilterOpts {
                gc: *gc_bounds,
                len: *length_bounds,
                quality_threshold: *quality_threshold as f64,
            };
            let output = Path::new(outdir).join(output);

            match pipeline::filter_fastq(Path::new(input), &output, &opts)? {
                FilterOutcome::AlreadyExists(path) => {
                    println!("{} already exists, nothing was done", path.display());
                }
                FilterOutcome::Written { path, kept: 0, .. } => {
                    info!("No reads passed the filters, {} was not created", path.display());
                }
                FilterOutcome::Written { path, kept, .. } => {
                    info!("Wrote {kept} reads to {}", path.display());
                }
            }
        }
        Commands::Run { seqs, operation } => {
            let results = dispatch::run_dna_rna_tools(seqs.as_slice(), *operation)?;

            let mut writer = BufWriter::new(stdout());
            for line in results.into_vec() {
                writeln!(writer, "{line}")?;
            }
            writer.flush()?;
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
