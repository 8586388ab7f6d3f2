//! Seeded k-means over dense vectors
//!
//! k-means++ initialisation drawn from a seeded `fastrand::Rng`, then Lloyd
//! iterations until the total squared centroid shift falls under the
//! tolerance. A cluster left without members takes over the point farthest
//! from its own centroid, so every id keeps a member unless the points are
//! indistinguishable. Same seed and same input always give the same labels.

use crate::embeddings::squared_euclidean_distance;
use fastrand::Rng;

/// K-means parameters
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: usize,
    tolerance: f32,
}

/// Result of fitting
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// Cluster id per input point, in `0..centroids.len()`
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    /// Lloyd iterations actually run
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Partition `points` into at most `k` clusters
    ///
    /// `k` is clamped to `1..=points.len()`. All points must share a dimension.
    pub fn fit(&self, points: &[Vec<f32>]) -> Fit {
        if points.is_empty() {
            return Fit {
                labels: Vec::new(),
                centroids: Vec::new(),
                iterations: 0,
            };
        }

        let k = self.k.clamp(1, points.len());
        let mut rng = Rng::with_seed(self.seed);
        let mut centroids = init_plus_plus(points, k, &mut rng);
        let mut labels = vec![0; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut labels);
            relocate_empty(points, &mut centroids, &mut labels);

            let updated = recompute(points, &labels, &centroids);
            let shift: f32 = centroids
                .iter()
                .zip(updated.iter())
                .map(|(old, new)| squared_euclidean_distance(old, new))
                .sum();
            centroids = updated;

            if shift <= self.tolerance {
                break;
            }
        }

        // Centroids are the means of the final labels
        assign(points, &centroids, &mut labels);
        relocate_empty(points, &mut centroids, &mut labels);
        let centroids = recompute(points, &labels, &centroids);

        Fit {
            labels,
            centroids,
            iterations,
        }
    }
}

/// k-means++: first centroid uniform, each next one drawn with probability
/// proportional to squared distance from the nearest chosen centroid
fn init_plus_plus(points: &[Vec<f32>], k: usize, rng: &mut Rng) -> Vec<Vec<f32>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.usize(..n)].clone());

    let mut nearest: Vec<f32> = points
        .iter()
        .map(|p| squared_euclidean_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = nearest.iter().sum();

        // Degenerate input (every point on a chosen centroid): pick uniformly
        let next = if total <= 0.0 {
            rng.usize(..n)
        } else {
            let mut target = rng.f32() * total;
            let mut chosen = n - 1;
            for (i, d) in nearest.iter().enumerate() {
                if target < *d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        };

        let centroid = points[next].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_euclidean_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Nearest centroid per point; ties go to the lower id
fn assign(points: &[Vec<f32>], centroids: &[Vec<f32>], labels: &mut [usize]) {
    for (label, point) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (id, centroid) in centroids.iter().enumerate() {
            let distance = squared_euclidean_distance(point, centroid);
            if distance < best_distance {
                best = id;
                best_distance = distance;
            }
        }
        *label = best;
    }
}

/// Give each empty cluster the point farthest from its assigned centroid
///
/// Only points from clusters with more than one member are taken, and only
/// at a positive distance; identical points leave the empty cluster as is.
fn relocate_empty(points: &[Vec<f32>], centroids: &mut [Vec<f32>], labels: &mut [usize]) {
    let mut counts = vec![0usize; centroids.len()];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    for empty in 0..centroids.len() {
        if counts[empty] > 0 {
            continue;
        }

        let mut farthest: Option<(usize, f32)> = None;
        for (i, point) in points.iter().enumerate() {
            if counts[labels[i]] < 2 {
                continue;
            }
            let distance = squared_euclidean_distance(point, &centroids[labels[i]]);
            if distance > 0.0 && farthest.map_or(true, |(_, best)| distance > best) {
                farthest = Some((i, distance));
            }
        }

        let Some((i, _)) = farthest else {
            break;
        };
        counts[labels[i]] -= 1;
        counts[empty] += 1;
        labels[i] = empty;
        centroids[empty] = points[i].clone();
    }
}

/// Mean of each cluster's members; an empty cluster keeps its old centroid
fn recompute(points: &[Vec<f32>], labels: &[usize], centroids: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let dim = centroids.first().map_or(0, |c| c.len());
    let mut sums = vec![vec![0.0f32; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (s, x) in sums[label].iter_mut().zip(point) {
            *s += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(centroids)
        .map(|((sum, count), old)| {
            if count == 0 {
                old.clone()
            } else {
                sum.into_iter().map(|s| s / count as f32).collect()
            }
        })
        .collect()
}
