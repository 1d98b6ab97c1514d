use ndarray::Array2;

use crate::assignment::cluster_sizes;

/// Per-cluster mean of the assigned instances, one row per cluster id.
///
/// Every id in `0..k` must own at least one instance; the assignment step
/// never lets a cluster run empty.
pub fn update_centroids(data: &Array2<f64>, assignment: &[usize], k: usize) -> Array2<f64> {
    let mut centroids = Array2::<f64>::zeros((k, data.ncols()));

    for (point, &cluster) in data.outer_iter().zip(assignment) {
        let mut sum = centroids.row_mut(cluster);
        sum += &point;
    }

    for (mut centroid, size) in centroids.outer_iter_mut().zip(cluster_sizes(assignment, k)) {
        debug_assert!(size > 0, "centroid of an empty cluster");
        centroid /= size as f64;
    }

    centroids
}
