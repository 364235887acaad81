pub mod dataset;
pub mod error;
pub mod ml;

pub use dataset::{Image, ImageSet, Label, LabelSet};
pub use error::{Error, Result};
pub use ml::{KNNClassifier, KNNConfig, Prediction, RunSummary};
