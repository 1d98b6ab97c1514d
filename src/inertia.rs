use ndarray::Array2;

use crate::distance::euclidean_distance;

pub fn calculate_inertia(data: &Array2<f64>, centroids: &Array2<f64>, labels: &[usize]) -> f64 {
    data.outer_iter()
        .zip(labels)
        .map(|(point, &label)| euclidean_distance(point, centroids.row(label)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_inertia_sums_member_distances() {
        let data = array![[0.0, 0.0], [6.0, 8.0], [1.0, 1.0]];
        let centroids = array![[0.0, 0.0], [1.0, 1.0]];
        assert_eq!(calculate_inertia(&data, &centroids, &[0, 0, 1]), 10.0);
    }
}
