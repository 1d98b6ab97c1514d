use ndarray::{Array2, ArrayView1};

use crate::distance::euclidean_distance;

/// Result of one reassignment pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Reassignment {
    /// Every instance is already closest to its own centroid.
    Unchanged,
    /// The nearest-centroid labels would leave `empty_cluster` without
    /// members, so the candidate was thrown away.
    Rejected { empty_cluster: usize },
    Changed(Vec<usize>),
}

/// Index of the closest centroid. Ties go to the lowest id.
pub fn nearest_centroid(point: ArrayView1<f64>, centroids: &Array2<f64>) -> usize {
    let mut best = 0;
    let mut best_distance = f64::MAX;
    for (idx, centroid) in centroids.outer_iter().enumerate() {
        let distance = euclidean_distance(point, centroid);
        if idx == 0 || distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}

pub fn cluster_sizes(assignment: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &cluster in assignment {
        sizes[cluster] += 1;
    }
    sizes
}

/// Maps every instance to its nearest centroid. The current assignment is
/// never modified; a candidate that would empty a cluster is rejected whole.
pub fn reassign(data: &Array2<f64>, centroids: &Array2<f64>, assignment: &[usize]) -> Reassignment {
    let candidate: Vec<usize> = data
        .outer_iter()
        .map(|point| nearest_centroid(point, centroids))
        .collect();

    if candidate.as_slice() == assignment {
        return Reassignment::Unchanged;
    }

    let sizes = cluster_sizes(&candidate, centroids.nrows());
    if let Some(empty_cluster) = sizes.iter().position(|&size| size == 0) {
        return Reassignment::Rejected { empty_cluster };
    }

    Reassignment::Changed(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_moves_instances_to_nearest_centroid() {
        let data = array![[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]];
        let centroids = array![[0.0, 0.0], [5.0, 5.0]];
        let outcome = reassign(&data, &centroids, &[1, 0, 0, 1]);
        assert_eq!(outcome, Reassignment::Changed(vec![0, 0, 1, 1]));
    }

    #[test]
    fn test_unchanged_when_already_nearest() {
        let data = array![[0.0], [1.0], [10.0]];
        let centroids = array![[0.5], [10.0]];
        assert_eq!(reassign(&data, &centroids, &[0, 0, 1]), Reassignment::Unchanged);
    }

    #[test]
    fn test_ties_go_to_lowest_id() {
        let centroids = array![[-1.0], [1.0], [1.0]];
        assert_eq!(nearest_centroid(array![0.0].view(), &centroids), 0);
        assert_eq!(nearest_centroid(array![1.0].view(), &centroids), 1);
    }

    #[test]
    fn test_rejects_candidate_that_empties_a_cluster() {
        let data = array![[0.0], [0.0], [0.0]];
        let centroids = array![[0.0], [0.0]];
        let current = [0, 1, 1];
        let outcome = reassign(&data, &centroids, &current);
        assert_eq!(outcome, Reassignment::Rejected { empty_cluster: 1 });
    }

    #[test]
    fn test_cluster_sizes() {
        assert_eq!(cluster_sizes(&[0, 2, 2, 0, 2], 4), vec![2, 0, 3, 0]);
    }
}
