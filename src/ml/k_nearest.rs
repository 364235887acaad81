use std::collections::BTreeMap;
use std::io::{Read, Seek};

use log::{info, trace};

use crate::dataset::{Image, ImageSet, Label, LabelSet};
use crate::error::{Error, Result};

/// Configuration options for k-NN classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KNNConfig {
    /// Number of nearest neighbors that vote on a prediction. If it exceeds the
    /// training set size, every training image votes.
    pub k: usize,
}

impl KNNConfig {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Customize the number of voting neighbors.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

impl Default for KNNConfig {
    fn default() -> Self {
        Self { k: 3 }
    }
}

/// Distance from a query to one training image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    /// Position of the training image in its image set.
    pub index: usize,
}

/// Outcome of classifying one test image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub test_index: usize,
    pub predicted: Label,
    pub actual: Label,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// Totals over a full classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub correct: usize,
}

impl RunSummary {
    /// Fraction of test images classified correctly; 0 for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Returns the **squared** Euclidean distance between two images of equal shape.
///
/// Pixel differences are taken in a signed type before squaring; subtracting
/// two `u8`s directly would wrap.
pub fn squared_euclidean_distance(a: &Image, b: &Image) -> Result<u64> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            expected: a.shape(),
            found: b.shape(),
        });
    }
    Ok(a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(&x, &y)| {
            let d = i64::from(x) - i64::from(y);
            (d * d) as u64
        })
        .sum())
}

/// Euclidean (L2) distance between two images in pixel space.
///
/// # Errors
///
/// `ShapeMismatch` if the images differ in rows or columns.
pub fn euclidean_distance(a: &Image, b: &Image) -> Result<f64> {
    Ok((squared_euclidean_distance(a, b)? as f64).sqrt())
}

/// Scores `query` against every image in `training`, in training-set order.
///
/// Brute force: the result always holds exactly `training.len()` entries.
pub fn find_all_distances<R: Read + Seek>(
    training: &mut ImageSet<R>,
    query: &Image,
) -> Result<Vec<Neighbor>> {
    let mut neighbors = Vec::with_capacity(training.len());
    for index in 0..training.len() {
        let train_image = training.image(index)?;
        neighbors.push(Neighbor {
            distance: euclidean_distance(&train_image, query)?,
            index,
        });
    }
    Ok(neighbors)
}

/// Sorts by ascending distance, breaking ties by ascending training index.
pub fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.index.cmp(&b.index))
    });
}

/// Majority vote over a set of labels.
///
/// The label with the highest count wins. When several labels share the highest
/// count, the smallest label value among them is returned. `None` if `labels` is empty.
pub fn majority_vote<I: IntoIterator<Item = Label>>(labels: I) -> Option<Label> {
    let mut counts = BTreeMap::<Label, usize>::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    // Ascending key order plus a strict comparison keeps the smallest tied label.
    let mut best: Option<(Label, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// A brute-force k-NN classifier backed by an on-disk training set.
///
/// Training images and labels are read from their files on demand, one record
/// at a time; nothing but the two headers is held in memory between queries.
#[derive(Debug)]
pub struct KNNClassifier<I, L> {
    config: KNNConfig,
    images: ImageSet<I>,
    labels: LabelSet<L>,
}

impl<I: Read + Seek, L: Read + Seek> KNNClassifier<I, L> {
    /// Constructs a new `KNNClassifier`.
    ///
    /// # Errors
    ///
    /// - `InvalidNeighborCount` if `config.k == 0`.
    /// - `CountMismatch` if the image and label sets hold different numbers of records.
    pub fn new(config: KNNConfig, images: ImageSet<I>, labels: LabelSet<L>) -> Result<Self> {
        if config.k == 0 {
            return Err(Error::InvalidNeighborCount);
        }
        if images.len() != labels.len() {
            return Err(Error::CountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            config,
            images,
            labels,
        })
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Number of training images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// `(rows, cols)` every query must have.
    pub fn shape(&self) -> (usize, usize) {
        self.images.shape()
    }

    /// The `min(k, N)` training images closest to `query`, nearest first.
    pub fn find_k_nearest(&mut self, query: &Image) -> Result<Vec<Neighbor>> {
        let mut neighbors = find_all_distances(&mut self.images, query)?;
        sort_neighbors(&mut neighbors);
        neighbors.truncate(self.config.k);
        Ok(neighbors)
    }

    /// Predict the label for a single query image by majority vote among its
    /// `k` nearest training images.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use mnist_knn::dataset::{encode_image_set, encode_label_set, Image, ImageSet, LabelSet};
    /// use mnist_knn::{KNNClassifier, KNNConfig};
    ///
    /// let train = vec![Image::filled(2, 2, 0), Image::filled(2, 2, 255)];
    /// let images = ImageSet::from_reader(Cursor::new(encode_image_set(2, 2, &train).unwrap())).unwrap();
    /// let labels = LabelSet::from_reader(Cursor::new(encode_label_set(&[0, 1]).unwrap())).unwrap();
    ///
    /// let mut knn = KNNClassifier::new(KNNConfig::new(1), images, labels).unwrap();
    /// assert_eq!(knn.predict(&Image::filled(2, 2, 200)).unwrap(), 1);
    /// ```
    pub fn predict(&mut self, query: &Image) -> Result<Label> {
        if self.images.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        let neighbors = self.find_k_nearest(query)?;
        trace!("nearest neighbors: {:?}", neighbors);

        let mut votes = Vec::with_capacity(neighbors.len());
        for neighbor in &neighbors {
            votes.push(self.labels.label(neighbor.index)?);
        }
        majority_vote(votes).ok_or(Error::EmptyTrainingSet)
    }

    /// Predict labels for multiple query images at once.
    pub fn predict_batch(&mut self, queries: &[Image]) -> Result<Vec<Label>> {
        queries.iter().map(|q| self.predict(q)).collect()
    }

    /// Classifies every image of a test set against the training set.
    ///
    /// Before the first prediction this checks that the test images and labels
    /// pair up and that test and training images share a shape, so a mismatch
    /// fails the run without emitting anything. `on_prediction` is then called
    /// once per test image in increasing index order. The first error stops the run.
    pub fn run<TI, TL, F>(
        &mut self,
        test_images: &mut ImageSet<TI>,
        test_labels: &mut LabelSet<TL>,
        mut on_prediction: F,
    ) -> Result<RunSummary>
    where
        TI: Read + Seek,
        TL: Read + Seek,
        F: FnMut(&Prediction),
    {
        if test_images.len() != test_labels.len() {
            return Err(Error::CountMismatch {
                images: test_images.len(),
                labels: test_labels.len(),
            });
        }
        if test_images.shape() != self.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                found: test_images.shape(),
            });
        }
        if !test_images.is_empty() && self.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }

        info!(
            "classifying {} test images against {} training images (k = {})",
            test_images.len(),
            self.len(),
            self.k()
        );

        let mut summary = RunSummary::default();
        for test_index in 0..test_images.len() {
            let query = test_images.image(test_index)?;
            let prediction = Prediction {
                test_index,
                predicted: self.predict(&query)?,
                actual: test_labels.label(test_index)?,
            };
            summary.total += 1;
            if prediction.is_correct() {
                summary.correct += 1;
            }
            on_prediction(&prediction);
        }

        info!(
            "{} of {} correct ({:.2}%)",
            summary.correct,
            summary.total,
            summary.accuracy() * 100.0
        );
        Ok(summary)
    }
}
