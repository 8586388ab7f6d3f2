//! Similarity and distance metrics for embeddings

/// Compute cosine similarity between two embedding vectors
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 = identical direction
/// - 0.0 = orthogonal vectors
/// - -1.0 = opposite vectors
///
/// Never panics. Returns 0.0 when either vector is empty, when the
/// dimensions differ, or when either magnitude is zero (e.g. a fallback
/// zero vector).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.len() != b.len() {
        log::debug!("cosine over mismatched dimensions: {} vs {}", a.len(), b.len());
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    // Handle zero magnitude case
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Squared Euclidean distance between two vectors of equal length
///
/// Extra trailing elements of the longer vector are ignored.
pub fn squared_euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
