use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dataset_index::{
    GroupOrder, GrowthPolicy, Pipeline, PipelineConfig, RecordLayout, TrimMode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dataset-index",
    about = "Index trailing key/value groups of a line-oriented dataset file"
)]
struct Cli {
    /// Input filepath to a data set file.
    #[arg(short, long)]
    file: PathBuf,

    /// Single-character field delimiter.
    #[arg(short, long, default_value_t = ' ')]
    delimiter: char,

    /// Zero-based position of the count field.
    #[arg(long, default_value_t = 3)]
    count_field: usize,

    /// Order of the two trailing groups.
    #[arg(long, value_enum, default_value_t = Order::ValuesThenKeys)]
    group_order: Order,

    /// How much of each line to strip before splitting.
    #[arg(long, value_enum, default_value_t = Trim::Terminator)]
    trim: Trim,

    /// Pre-size the table for this many rows.
    #[arg(long)]
    capacity: Option<usize>,

    /// Fail instead of growing once --capacity is exceeded.
    #[arg(long, requires = "capacity")]
    strict_capacity: bool,

    /// Print the byte footprint report to stderr.
    #[arg(long)]
    footprint: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    ValuesThenKeys,
    KeysThenValues,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Trim {
    Terminator,
    Whitespace,
}

impl Cli {
    fn config(&self) -> PipelineConfig {
        let order = match self.group_order {
            Order::ValuesThenKeys => GroupOrder::ValuesThenKeys,
            Order::KeysThenValues => GroupOrder::KeysThenValues,
        };
        let trim = match self.trim {
            Trim::Terminator => TrimMode::Terminator,
            Trim::Whitespace => TrimMode::Whitespace,
        };
        let growth = match (self.capacity, self.strict_capacity) {
            (None, _) => GrowthPolicy::Amortized,
            (Some(rows), false) => GrowthPolicy::preallocated(rows),
            (Some(rows), true) => GrowthPolicy::fixed(rows),
        };

        PipelineConfig::default()
            .with_delimiter(self.delimiter)
            .with_trim(trim)
            .with_layout(
                RecordLayout::default()
                    .with_count_field(self.count_field)
                    .with_order(order),
            )
            .with_growth(growth)
            .with_space_profiling(self.footprint)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Pipeline::new(cli.config())
        .run(&cli.file)
        .with_context(|| format!("failed to index {}", cli.file.display()))?;

    println!("{}", result.index);

    if cli.footprint {
        eprintln!("{}", result.space_profile.report());
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
