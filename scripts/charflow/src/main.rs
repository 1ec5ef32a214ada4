use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use moschar::bins::BinTable;
use moschar::compare::{self, Reference, Scale};
use moschar::convert;
use moschar::refdata;
use moschar::rewrite::BinRewriter;
use moschar::sim::Ngspice;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "charflow",
    author,
    version,
    about,
    long_about = "Automates MOS characterization against ngspice: bin netlist models by W/L, \
                  run the simulator, convert its output to CSV, and compare results"
)]
struct Args {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite the model of every matching MOS instance to its W/L bin
    Bin {
        /// The netlist file, rewritten in place.
        netlist: PathBuf,
        /// Copy the original netlist aside before rewriting it.
        #[arg(short, long)]
        backup: bool,
        /// Base model name to rebin (default: the sky130 1.8V NMOS model).
        #[arg(long)]
        model: Option<String>,
        /// TOML bin table to use instead of the built-in sky130 table.
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Run ngspice in batch mode on a netlist
    Run {
        netlist: PathBuf,
        /// Raw output file (default: the netlist path with a .raw extension).
        #[arg(short, long)]
        raw: Option<PathBuf>,
        /// Path of the ngspice executable.
        #[arg(long, default_value = "ngspice")]
        ngspice: PathBuf,
    },
    /// Combine <circuit>.raw and <circuit>.csv_heads into <circuit>.csv
    Raw2csv {
        /// The circuit file whose outputs should be combined.
        cir_file: PathBuf,
        /// Keep the .raw and .csv_heads inputs instead of deleting them.
        #[arg(short, long)]
        keep: bool,
    },
    /// Compute RMSE of each listed CSV series against a reference series
    Compare {
        /// Text file listing one CSV path per line.
        listing: PathBuf,
        /// Use the first listed file as the reference (default: the last).
        #[arg(long)]
        first: bool,
        /// Compare in linear scale (default: log10).
        #[arg(long)]
        lin: bool,
    },
    /// Extract measured ID(VG) rows at one VDS into a V,I CSV
    Refdata {
        /// VDS value to filter on, in volts.
        vds: f64,
        /// The measured IV data file.
        #[arg(short, long)]
        file: PathBuf,
        /// Output CSV file.
        #[arg(short, long, default_value = "output.csv")]
        output: PathBuf,
    },
}

impl Args {
    fn level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

fn main_result() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.level())
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    match args.command {
        Command::Bin {
            netlist,
            backup,
            model,
            table,
        } => {
            let rewriter = match table {
                Some(path) => {
                    let table = BinTable::from_toml_file(&path)
                        .with_context(|| format!("load bin table {path:?}"))?;
                    let model = model.unwrap_or_else(|| sky130_bins::NFET_01V8_MODEL.to_string());
                    BinRewriter::new(model, table)
                }
                None => match model {
                    Some(model) => BinRewriter::new(model, sky130_bins::nfet_01v8_bins()),
                    None => sky130_bins::nfet_01v8_rewriter(),
                },
            };
            let summary = rewriter.rewrite_file(&netlist, backup)?;
            println!(
                "{netlist:?}: {} instances binned, {} corrected, {} already correct",
                summary.binned, summary.corrected, summary.unchanged
            );
        }
        Command::Run {
            netlist,
            raw,
            ngspice,
        } => {
            let raw = raw.unwrap_or_else(|| netlist.with_extension("raw"));
            Ngspice::with_executable(ngspice).run(&netlist, &raw)?;
            println!("simulation output written to {raw:?}");
        }
        Command::Raw2csv { cir_file, keep } => {
            let csv = convert::combine(&cir_file, !keep)?;
            println!("combined data and headers into {csv:?}");
        }
        Command::Compare {
            listing,
            first,
            lin,
        } => {
            let reference = if first {
                Reference::First
            } else {
                Reference::Last
            };
            let scale = if lin { Scale::Linear } else { Scale::Log10 };
            let comparisons = compare::compare_listing(&listing, reference, scale)?;
            let reference = match reference {
                Reference::First => comparisons.first(),
                Reference::Last => comparisons.last(),
            }
            .map(|c| c.path.clone())
            .unwrap_or_default();
            for c in &comparisons {
                println!(
                    "RMSE between {:?} and reference {:?}: {}",
                    c.path, reference, c.rmse
                );
            }
        }
        Command::Refdata { vds, file, output } => {
            let rows = refdata::extract_id_vg(&file, vds, &output)?;
            println!("extracted {rows} rows at vds={vds} into {output:?}");
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = main_result() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
