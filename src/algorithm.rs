use itertools::Itertools;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::assignment::{reassign, Reassignment};
use crate::centroid::update_centroids;
use crate::dataset::Dataset;
use crate::error::ClusterError;
use crate::inertia::calculate_inertia;
use crate::initialization::{check_configuration, initial_assignment, ClusterSource};
use crate::normalize::{normalize, Spread};

/// The iteration cap of a run is `instances * ITERATION_FACTOR`.
pub const ITERATION_FACTOR: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    pub clusters: usize,
    pub spread: Spread,
}

impl KMeansConfig {
    pub fn new(clusters: usize) -> Self {
        Self { clusters, spread: Spread::default() }
    }

    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }
}

/// Why a run stopped. The assignment of a finished run is valid in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No instance changed cluster.
    Converged,
    /// The next reassignment would have emptied a cluster and was dropped.
    EmptyCluster,
    /// The iteration cap was reached while instances were still moving.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster id per instance, in input order.
    pub assignment: Vec<usize>,
    /// Centroids of `assignment`, in normalized feature space.
    pub centroids: Array2<f64>,
    pub iterations: usize,
    pub termination: Termination,
    pub inertia: f64,
}

/// Runs Lloyd's algorithm over the normalized dataset, starting from an
/// assignment whose random part is drawn from `source`.
pub fn kmeans<S: ClusterSource + ?Sized>(
    dataset: &Dataset,
    config: &KMeansConfig,
    source: &mut S,
) -> Result<Clustering, ClusterError> {
    let n = dataset.n_instances();
    let k = config.clusters;
    check_configuration(n, k)?;

    log::info!(
        "Starting KMeans on {} instances with {} features, k = {}, spread = {:?}",
        n,
        dataset.n_features(),
        k,
        config.spread
    );
    let data = normalize(dataset, config.spread);
    let assignment = initial_assignment(n, k, source)?;
    log::debug!("initialized assignment: {:?}", assignment);

    Ok(lloyd(&data, assignment, k, n * ITERATION_FACTOR))
}

fn lloyd(
    data: &Array2<f64>,
    mut assignment: Vec<usize>,
    k: usize,
    max_iters: usize,
) -> Clustering {
    let mut termination = Termination::Exhausted;
    let mut iterations = 0;

    while iterations < max_iters {
        iterations += 1;
        if iterations % 10 == 0 {
            log::info!("Finished iteration {}", iterations);
        }

        let centroids = update_centroids(data, &assignment, k);
        match reassign(data, &centroids, &assignment) {
            Reassignment::Changed(next) => assignment = next,
            Reassignment::Unchanged => {
                log::info!("Converged after {} iterations", iterations);
                termination = Termination::Converged;
                break;
            }
            Reassignment::Rejected { empty_cluster } => {
                log::warn!(
                    "Stopped after {} iterations: cluster {} would have been left empty",
                    iterations,
                    empty_cluster
                );
                termination = Termination::EmptyCluster;
                break;
            }
        }
    }
    if termination == Termination::Exhausted {
        log::warn!("Reached the iteration cap of {} without converging", max_iters);
    }

    let centroids = update_centroids(data, &assignment, k);
    let inertia = calculate_inertia(data, &centroids, &assignment);
    Clustering { assignment, centroids, iterations, termination, inertia }
}

/// Runs `restarts` independent initializations and keeps the one with the
/// lowest inertia; ties keep the earliest. Restart `i` is seeded with
/// `seed + i` when a seed is given, from OS entropy otherwise.
pub fn kmeans_restarts(
    dataset: &Dataset,
    config: &KMeansConfig,
    restarts: usize,
    seed: Option<u64>,
) -> Result<Clustering, ClusterError> {
    check_configuration(dataset.n_instances(), config.clusters)?;

    let runs = (0..restarts.max(1))
        .into_par_iter()
        .map(|initialization_index| {
            let mut rng = match seed {
                Some(seed) => {
                    StdRng::seed_from_u64(seed.wrapping_add(initialization_index as u64))
                }
                None => StdRng::from_entropy(),
            };
            kmeans(dataset, config, &mut rng)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Inertia per initialization: [{}]",
        runs.iter().map(|run| format!("{:.6}", run.inertia)).join(", ")
    );

    let (best_index, best) = runs
        .into_iter()
        .enumerate()
        .reduce(|best, run| if run.1.inertia < best.1.inertia { run } else { best })
        .ok_or_else(|| ClusterError::malformed("no initialization was run"))?;
    log::info!(
        "Best initialization is index #{} with {} inertia ({:?})",
        best_index,
        best.inertia,
        best.termination
    );
    Ok(best)
}
