pub mod k_nearest;

pub use k_nearest::{
    euclidean_distance, find_all_distances, majority_vote, sort_neighbors,
    squared_euclidean_distance, KNNClassifier, KNNConfig, Neighbor, Prediction, RunSummary,
};
