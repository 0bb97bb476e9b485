use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use sylva_cv::{CrossValidation, FeatureTable, MetricRow, Split, TrainId, Treatment};
use sylva_io::{ExperimentName, FeatureTableReader, ReportWriter, TreatmentReader};

#[derive(Parser)]
#[command(name = "sylva")]
#[command(about = "Fixed-split repeated random forest cross-validation for feature tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel tree growth (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input files shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Feature table: header `feature,<samples...>`, one row per feature (.tsv/.txt are tab-delimited)
    #[arg(long)]
    data: PathBuf,

    /// Treatment file: header then `sample,treat` rows with logical values
    #[arg(long)]
    treatment: PathBuf,
}

/// How the training samples are chosen. Exactly one must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct TrainSelector {
    /// Regular expression; samples whose name contains a match train
    #[arg(long)]
    train_pattern: Option<String>,

    /// Comma-separated logical flags, one per sample in table order
    #[arg(long, value_delimiter = ',')]
    train_mask: Option<Vec<String>>,

    /// Comma-separated sample names that train
    #[arg(long, value_delimiter = ',')]
    train_samples: Option<Vec<String>>,
}

impl TrainSelector {
    fn to_train_id(&self) -> Result<TrainId> {
        match (&self.train_pattern, &self.train_mask, &self.train_samples) {
            (Some(pattern), _, _) => Ok(TrainId::pattern(pattern)?),
            (_, Some(mask), _) => {
                let flags = Treatment::parse(mask).context("--train-mask must hold logical values")?;
                Ok(TrainId::Mask(flags.as_slice().to_vec()))
            }
            (_, _, Some(names)) => Ok(TrainId::Names(names.clone())),
            (None, None, None) => bail!("one of --train-pattern, --train-mask, --train-samples is required"),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Grow forests on the training samples and score them on the rest
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        selector: TrainSelector,

        /// Number of forests to grow
        #[arg(long, default_value_t = 10)]
        n_forest: usize,

        /// Trees per forest
        #[arg(long, default_value_t = 500)]
        n_tree: usize,

        /// Candidate features per split (defaults to floor(sqrt(n_features)))
        #[arg(long)]
        mtry: Option<usize>,

        /// RNG seed; only honoured when --n-forest is 1
        #[arg(long)]
        seed: Option<u64>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show how a training selector partitions the samples, without training
    Split {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        selector: TrainSelector,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    n_samples: usize,
    n_features: usize,
    n_train: usize,
    n_test: usize,
    n_forest: usize,
    n_tree: usize,
    mean: MetricRow,
    sd: MetricRow,
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct SplitOutput<'a> {
    n_samples: usize,
    train: Vec<&'a str>,
    test: Vec<&'a str>,
}

fn load_inputs(input: &InputArgs) -> Result<(FeatureTable, Treatment)> {
    let table = FeatureTableReader::new(&input.data)
        .read()
        .context("failed to read feature table")?;
    let treatments = TreatmentReader::new(&input.treatment)
        .read()
        .context("failed to read treatment file")?;
    let tokens = treatments
        .align(table.sample_names())
        .context("failed to align treatments with table samples")?;
    let treatment = Treatment::parse(&tokens)
        .with_context(|| format!("invalid treatment in {}", display(&input.treatment)))?;
    Ok((table, treatment))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn names_at<'a>(table: &'a FeatureTable, indices: &[usize]) -> Vec<&'a str> {
    indices
        .iter()
        .map(|&i| table.sample_names()[i].as_str())
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            input,
            selector,
            n_forest,
            n_tree,
            mtry,
            seed,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let (table, treatment) = load_inputs(&input)?;
            let train_id = selector.to_train_id()?;

            let cv = CrossValidation::new(n_forest)?
                .with_n_tree(n_tree)
                .with_mtry(mtry)
                .with_seed(seed);
            let report = cv
                .evaluate(&table, &treatment, &train_id)
                .context("cross-validation failed")?;

            let writer = ReportWriter::new(&output_dir, experiment_name)?;
            let files = writer.write_all(&report).context("failed to write report")?;

            // Every run scores the same test partition.
            let n_test = report.confusion.first().map_or(0, |r| r.counts().total());

            let output = EvaluateOutput {
                experiment,
                n_samples: table.n_samples(),
                n_features: table.n_features(),
                n_train: table.n_samples() - n_test,
                n_test,
                n_forest,
                n_tree,
                mean: report.summary.mean,
                sd: report.summary.sd,
                files,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Split { input, selector } => {
            let (table, _) = load_inputs(&input)?;
            let train_id = selector.to_train_id()?;
            let split = Split::resolve(table.sample_names(), &train_id)
                .context("failed to resolve training samples")?;

            let output = SplitOutput {
                n_samples: table.n_samples(),
                train: names_at(&table, split.train()),
                test: names_at(&table, split.test()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
