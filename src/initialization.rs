use rand::Rng;

use crate::error::ClusterError;

/// Source of the random cluster ids handed out during initialization.
///
/// Every `rand::Rng` is one; tests inject a fixed sequence of ids instead.
pub trait ClusterSource {
    /// Returns a cluster id in `0..clusters`.
    fn next_cluster(&mut self, clusters: usize) -> usize;
}

impl<R: Rng + ?Sized> ClusterSource for R {
    fn next_cluster(&mut self, clusters: usize) -> usize {
        self.gen_range(0..clusters)
    }
}

#[cfg(test)]
/// Replays a fixed list of cluster ids, cycling when it runs out. Each id is
/// reduced modulo the number of clusters.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    ids: Vec<usize>,
    position: usize,
}

#[cfg(test)]
impl FixedSequence {
    pub fn new(ids: Vec<usize>) -> Self {
        Self { ids, position: 0 }
    }
}

#[cfg(test)]
impl ClusterSource for FixedSequence {
    fn next_cluster(&mut self, clusters: usize) -> usize {
        if self.ids.is_empty() {
            return 0;
        }
        let id = self.ids[self.position % self.ids.len()];
        self.position += 1;
        id % clusters
    }
}

pub fn check_configuration(n: usize, k: usize) -> Result<(), ClusterError> {
    if k < 2 || k > n {
        return Err(ClusterError::invalid_configuration(k, n));
    }
    Ok(())
}

/// Initial assignment in which every cluster id owns at least one instance:
/// instance `i < k` goes to cluster `i`, the rest are drawn from `source`.
pub fn initial_assignment<S: ClusterSource + ?Sized>(
    n: usize,
    k: usize,
    source: &mut S,
) -> Result<Vec<usize>, ClusterError> {
    check_configuration(n, k)?;

    let mut assignment: Vec<usize> = (0..k).collect();
    assignment.extend((k..n).map(|_| source.next_cluster(k)));
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_k_instances_cover_every_cluster() {
        let mut rng = StdRng::seed_from_u64(7);
        let assignment = initial_assignment(50, 4, &mut rng).unwrap();
        assert_eq!(assignment.len(), 50);
        assert_eq!(&assignment[..4], &[0, 1, 2, 3]);
        assert!(assignment.iter().all(|&c| c < 4));
    }

    #[test]
    fn test_fixed_sequence_is_replayed() {
        let mut source = FixedSequence::new(vec![1, 0, 5]);
        let assignment = initial_assignment(8, 3, &mut source).unwrap();
        // 5 % 3 == 2, then the sequence wraps around
        assert_eq!(assignment, vec![0, 1, 2, 1, 0, 2, 1, 0]);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let a = initial_assignment(30, 3, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = initial_assignment(30, 3, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_cluster_counts() {
        let mut source = FixedSequence::new(vec![]);
        assert!(matches!(
            initial_assignment(2, 3, &mut source),
            Err(ClusterError::InvalidConfiguration { clusters: 3, instances: 2 })
        ));
        assert!(matches!(
            initial_assignment(5, 1, &mut source),
            Err(ClusterError::InvalidConfiguration { .. })
        ));
        assert_eq!(initial_assignment(2, 2, &mut source).unwrap(), vec![0, 1]);
    }
}
