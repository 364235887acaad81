//! mnist-knn - classify an MNIST-format test set against a training set with k-NN.
//!
//! Prints one line per test image, in order, with the predicted and actual label.
//! Diagnostics go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, Level};

use mnist_knn::{ImageSet, KNNClassifier, KNNConfig, LabelSet};

/// Brute-force k-nearest-neighbor classifier for MNIST-format datasets
#[derive(Parser, Debug, Clone)]
#[command(name = "mnist-knn")]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Test image set file
    test_images: PathBuf,

    /// Test label set file
    test_labels: PathBuf,

    /// Training image set file
    train_images: PathBuf,

    /// Training label set file
    train_labels: PathBuf,

    /// Number of nearest neighbors that vote on each prediction
    #[arg(short = 'k', long = "neighbors", default_value_t = 3,
          value_parser = clap::value_parser!(u32).range(1..))]
    k: u32,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // init() also routes the library's `log` records into this subscriber.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &CliArgs) -> Result<()> {
    // Open and validate all four files before classifying anything.
    let mut test_images = ImageSet::open(&args.test_images)
        .with_context(|| format!("test images: {}", args.test_images.display()))?;
    let mut test_labels = LabelSet::open(&args.test_labels)
        .with_context(|| format!("test labels: {}", args.test_labels.display()))?;
    let train_images = ImageSet::open(&args.train_images)
        .with_context(|| format!("training images: {}", args.train_images.display()))?;
    let train_labels = LabelSet::open(&args.train_labels)
        .with_context(|| format!("training labels: {}", args.train_labels.display()))?;

    let config = KNNConfig::new(args.k as usize);
    let mut knn = KNNClassifier::new(config, train_images, train_labels).with_context(|| {
        format!(
            "training set: {} / {}",
            args.train_images.display(),
            args.train_labels.display()
        )
    })?;

    knn.run(&mut test_images, &mut test_labels, |p| {
        println!(
            "image {}: predicted {}, actual {}",
            p.test_index, p.predicted, p.actual
        );
    })
    .with_context(|| {
        format!(
            "classifying {} / {}",
            args.test_images.display(),
            args.test_labels.display()
        )
    })?;

    Ok(())
}

fn main() {
    let args = CliArgs::parse();
    setup_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
