mod proto;
mod logger;
mod load;
mod error;
mod dataset;
mod normalize;
mod distance;
mod initialization;
mod assignment;
mod centroid;
mod algorithm;
mod inertia;
mod report;

use clap::Parser;
use log::Level;
use std::path::PathBuf;

use crate::algorithm::{kmeans_restarts, Clustering, KMeansConfig};
use crate::dataset::ClusterRequest;
use crate::error::ClusterError;
use crate::load::{read_body, save_data};
use crate::logger::init_logger;
use crate::normalize::Spread;
use crate::report::{render_assignment, render_clusters};

/// Partition feature vectors into K clusters with Lloyd's K-Means over
/// normalized features.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// JSON file with `instances` and `clusters`; `-` reads stdin
    #[arg(default_value = "data.json")]
    input: PathBuf,

    /// Number of clusters, overriding the request's `clusters` field
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Seed for the initial assignment; random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Independent initializations; the lowest-inertia result is kept
    #[arg(long, default_value_t = 1)]
    restarts: usize,

    /// Divisor applied to each centered feature column
    #[arg(long, value_enum, default_value_t = Spread::Variance)]
    spread: Spread,

    /// Directory to write protobuf labels and centroids into
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print only the JSON response
    #[arg(long)]
    json: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

/// What a caller may set on top of the request body.
#[derive(Debug, Clone)]
struct RunSettings {
    clusters: Option<usize>,
    spread: Spread,
    restarts: usize,
    seed: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self { clusters: None, spread: Spread::default(), restarts: 1, seed: None }
    }
}

impl From<&Opts> for RunSettings {
    fn from(opts: &Opts) -> Self {
        Self {
            clusters: opts.clusters,
            spread: opts.spread,
            restarts: opts.restarts,
            seed: opts.seed,
        }
    }
}

fn cluster(request: &ClusterRequest, settings: &RunSettings) -> Result<Clustering, ClusterError> {
    let k = match settings.clusters {
        Some(k) => k,
        None => request.require_clusters()?,
    };
    log::info!("Amount of clusters is: {}", k);

    let config = KMeansConfig::new(k).with_spread(settings.spread);
    kmeans_restarts(&request.dataset, &config, settings.restarts, settings.seed)
}

fn response_body(clustering: &Clustering) -> Result<String, ClusterError> {
    Ok(serde_json::to_string(&clustering.assignment)?)
}

/// JSON request in, JSON array of cluster ids out.
fn handle_request(body: &str, settings: &RunSettings) -> Result<String, ClusterError> {
    let request = ClusterRequest::from_json(body)?;
    let clustering = cluster(&request, settings)?;
    let response = response_body(&clustering)?;
    log::info!("Result is: {}", response);
    Ok(response)
}

/// Line printed on stderr when a run fails.
fn failure_message(err: &ClusterError) -> String {
    format!("Error: {}", err)
}

fn main() {
    let opts = Opts::parse();
    if let Err(err) = run(&opts) {
        eprintln!("{}", failure_message(&err));
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), ClusterError> {
    let level = if opts.verbose {
        Level::Debug
    } else if opts.quiet {
        Level::Warn
    } else {
        Level::Info
    };
    init_logger(level)?;

    let settings = RunSettings::from(opts);
    let body = read_body(&opts.input)?;

    if opts.json && opts.export.is_none() {
        println!("{}", handle_request(&body, &settings)?);
        return Ok(());
    }

    let request = ClusterRequest::from_json(&body)?;
    let clustering = cluster(&request, &settings)?;
    if let Some(dir) = &opts.export {
        save_data(&clustering, dir)?;
    }

    if opts.json {
        println!("{}", response_body(&clustering)?);
    } else {
        println!(
            "Finished clustering after {} iterations ({:?}).",
            clustering.iterations, clustering.termination
        );
        println!("Result as an array - index is the instance, value is its cluster.");
        println!("{}", render_assignment(&clustering.assignment));
        println!();
        println!("Instances divided by clusters:");
        println!();
        let k = clustering.centroids.nrows();
        print!("{}", render_clusters(&request.dataset, &clustering.assignment, k));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RunSettings {
        RunSettings { seed: Some(seed), ..RunSettings::default() }
    }

    #[test]
    fn test_handle_request_returns_assignment_array() {
        let body = r#"{
            "instances": [[1, 1], [1.1, 1], [9, 9], [9.1, 9], [1, 1.2], [9, 9.2]],
            "clusters": 2
        }"#;
        let response = handle_request(body, &seeded(4)).unwrap();
        let labels: Vec<usize> = serde_json::from_str(&response).unwrap();
        assert_eq!(labels.len(), 6);
        assert!(labels.contains(&0) && labels.contains(&1));
    }

    #[test]
    fn test_handle_request_accepts_string_encoded_fields() {
        let body = r#"{"instances": "[[0, 0], [10, 10]]", "clusters": "2"}"#;
        assert_eq!(handle_request(body, &seeded(1)).unwrap(), "[0,1]");
    }

    #[test]
    fn test_handle_request_rejects_before_clustering() {
        let err = handle_request(r#"{"instances": [[1], [2]]}"#, &seeded(0)).unwrap_err();
        assert!(matches!(err, ClusterError::MalformedInput(_)));

        let body = r#"{"instances": [[1], [2]], "clusters": 3}"#;
        let err = handle_request(body, &seeded(0)).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidConfiguration { clusters: 3, instances: 2 }));

        let body = r#"{"instances": [[1, 2], [2]], "clusters": 2}"#;
        let err = handle_request(body, &seeded(0)).unwrap_err();
        assert!(matches!(err, ClusterError::MalformedInput(_)));
    }

    #[test]
    fn test_settings_override_request_clusters() {
        let body = r#"{"instances": [[0], [1], [10], [11]], "clusters": 3}"#;
        let request = ClusterRequest::from_json(body).unwrap();
        let settings = RunSettings { clusters: Some(2), ..seeded(7) };
        let clustering = cluster(&request, &settings).unwrap();
        assert_eq!(clustering.centroids.nrows(), 2);
    }

    #[test]
    fn test_cli_parses_flags() {
        let opts = Opts::try_parse_from([
            "kmeans",
            "points.json",
            "-k",
            "3",
            "--seed",
            "9",
            "--restarts",
            "4",
            "--spread",
            "std-dev",
            "--json",
        ])
        .unwrap();
        let settings = RunSettings::from(&opts);
        assert_eq!(settings.clusters, Some(3));
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.restarts, 4);
        assert_eq!(settings.spread, Spread::StandardDeviation);
        assert!(opts.json);

        let opts = Opts::try_parse_from(["kmeans"]).unwrap();
        assert_eq!(opts.input, PathBuf::from("data.json"));
        assert_eq!(opts.spread, Spread::Variance);
        assert!(Opts::try_parse_from(["kmeans", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_failure_message_uses_display_text() {
        let err = ClusterRequest::from_json(r#"{"clusters": 2}"#).unwrap_err();
        let message = failure_message(&err);
        assert_eq!(message, "Error: Malformed input: missing field `instances`");
        assert!(!message.contains("MalformedInput("));

        let message = failure_message(&ClusterError::invalid_configuration(3, 2));
        assert!(message.starts_with("Error: Invalid configuration: 3 clusters for 2 instances"));
    }
}
