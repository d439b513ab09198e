use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use arbor_io::{NominalReader, Schema};
use arbor_tree::{
    Classifier, ConfidenceLevel, DecisionTreeConfig, ImpurityCriterion, ModelSelection,
    NominalDataset, NominalTable, allowed_confidence_levels,
};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Categorical decision trees with chi-square pruning")]
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
}

#[derive(Subcommand)]
enum Command {
    /// Fit one tree and report its error on a second dataset
    Fit {
        /// Path to the training CSV file (class in the last column)
        #[arg(long)]
        train: PathBuf,

        /// Path to the evaluation CSV file
        #[arg(long)]
        eval: PathBuf,

        /// Impurity criterion: "gini" or "entropy"
        #[arg(long, default_value = "gini")]
        criterion: String,

        /// Chi-square confidence level (1.0 disables pruning)
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,

        /// Include the tree dump in the output
        #[arg(long, default_value_t = false)]
        show_tree: bool,
    },

    /// Choose criterion and confidence level on a validation set, then test
    Select {
        /// Path to the training CSV file (class in the last column)
        #[arg(long)]
        train: PathBuf,

        /// Path to the validation CSV file
        #[arg(long)]
        validation: PathBuf,

        /// Path to the test CSV file
        #[arg(long)]
        test: PathBuf,

        /// Include the selected tree's dump in the output
        #[arg(long, default_value_t = false)]
        show_tree: bool,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct FitOutput {
    n_train: usize,
    n_eval: usize,
    criterion: String,
    confidence: f64,
    n_nodes: usize,
    height: usize,
    training_error: f64,
    eval_error: f64,
    max_depth: usize,
    average_depth: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<String>,
}

#[derive(Serialize)]
struct SelectOutput {
    n_train: usize,
    n_validation: usize,
    n_test: usize,
    gini_validation_error: f64,
    entropy_validation_error: f64,
    criterion: String,
    sweep: Vec<SweepOutput>,
    best_confidence: f64,
    best_validation_error: f64,
    test_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<String>,
}

#[derive(Serialize)]
struct SweepOutput {
    confidence: f64,
    n_nodes: usize,
    training_error: f64,
    validation_error: f64,
    max_depth: usize,
    average_depth: f64,
}

/// Read every CSV file, infer one schema across them, and encode each.
fn load_tables(paths: &[&Path]) -> Result<(Schema, Vec<NominalTable>)> {
    let tables = paths
        .iter()
        .map(|path| {
            NominalReader::new(path)
                .read()
                .with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let refs: Vec<_> = tables.iter().collect();
    let schema = Schema::infer(&refs).context("failed to infer schema")?;
    let encoded = tables
        .iter()
        .map(|table| {
            schema
                .encode(table)
                .with_context(|| format!("failed to encode {}", table.path().display()))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        n_tables = encoded.len(),
        n_attributes = schema.n_attributes(),
        n_classes = schema.n_classes(),
        "datasets loaded"
    );
    Ok((schema, encoded))
}

fn parse_confidence(value: f64) -> Result<ConfidenceLevel> {
    ConfidenceLevel::from_value(value).with_context(|| {
        format!(
            "unknown confidence level: {value} (expected one of {:?})",
            allowed_confidence_levels()
        )
    })
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

    match cli.command {
        Command::Fit {
            train,
            eval,
            criterion,
            confidence,
            show_tree,
        } => {
            let criterion: ImpurityCriterion = criterion.parse()?;
            let confidence = parse_confidence(confidence)?;

            // 1. Read and encode both files with a shared schema
            let (schema, tables) = load_tables(&[train.as_path(), eval.as_path()])?;
            let [train_table, eval_table] = <[NominalTable; 2]>::try_from(tables)
                .map_err(|_| anyhow::anyhow!("expected two encoded tables"))?;

            // 2. Fit
            let tree = DecisionTreeConfig::new()
                .with_criterion(criterion)
                .with_confidence(confidence)
                .fit(&train_table)
                .context("tree induction failed")?;
            info!(n_nodes = tree.n_nodes(), height = tree.height(), "tree fitted");

            // 3. Evaluate; depth statistics come from the evaluation pass
            let mut classifier = Classifier::new(&tree);
            let training_error = classifier
                .average_error(&train_table)
                .context("training evaluation failed")?;
            let evaluation = classifier
                .evaluate(&eval_table)
                .context("evaluation failed")?;

            // 4. Print summary
            let output = FitOutput {
                n_train: train_table.n_records(),
                n_eval: eval_table.n_records(),
                criterion: criterion.to_string(),
                confidence: confidence.value(),
                n_nodes: tree.n_nodes(),
                height: tree.height(),
                training_error,
                eval_error: evaluation.error_rate,
                max_depth: evaluation.max_depth,
                average_depth: evaluation.average_depth,
                tree: show_tree.then(|| tree.display_with(&schema).to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Select {
            train,
            validation,
            test,
            show_tree,
        } => {
            // 1. Read and encode all three files with a shared schema
            let (schema, tables) =
                load_tables(&[train.as_path(), validation.as_path(), test.as_path()])?;
            let [train_table, validation_table, test_table] =
                <[NominalTable; 3]>::try_from(tables)
                    .map_err(|_| anyhow::anyhow!("expected three encoded tables"))?;

            // 2. Compare criteria and sweep confidence levels
            let report = ModelSelection::new(&train_table, &validation_table)
                .run()
                .context("model selection failed")?;

            // 3. Test the selected tree
            let test_error = report
                .test_error(&test_table)
                .context("test evaluation failed")?;
            info!(
                confidence = report.best().confidence.value(),
                test_error, "selected tree tested"
            );

            // 4. Print summary
            let best = report.best();
            let output = SelectOutput {
                n_train: train_table.n_records(),
                n_validation: validation_table.n_records(),
                n_test: test_table.n_records(),
                gini_validation_error: report.comparison.gini_error,
                entropy_validation_error: report.comparison.entropy_error,
                criterion: report.criterion.to_string(),
                sweep: report
                    .sweep
                    .iter()
                    .map(|e| SweepOutput {
                        confidence: e.confidence.value(),
                        n_nodes: e.n_nodes,
                        training_error: e.training_error,
                        validation_error: e.validation_error,
                        max_depth: e.max_depth,
                        average_depth: e.average_depth,
                    })
                    .collect(),
                best_confidence: best.confidence.value(),
                best_validation_error: best.validation_error,
                test_error,
                tree: show_tree.then(|| report.best_tree.display_with(&schema).to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
