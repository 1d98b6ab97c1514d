use itertools::Itertools;
use prost::Message;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::algorithm::Clustering;
use crate::error::ClusterError;
use crate::proto::{ClusteredDataCentroids, ClusteredDataLabels, FloatList};

/// Reads a request body from `path`, or from stdin when `path` is `-`.
pub fn read_body(path: &Path) -> Result<String, ClusterError> {
    let mut body = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut body)?;
    } else {
        File::open(path)?.read_to_string(&mut body)?;
    }
    log::debug!("read {} bytes of request from {}", body.len(), path.display());
    Ok(body)
}

fn write_message<M: Message>(path: &Path, message: &M) -> Result<(), ClusterError> {
    let mut buf = Vec::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&buf)?;
    file.flush()?;
    Ok(())
}

/// Writes `labels.bin` and `centroids.bin` into `dir`, creating it if needed.
/// Returns the paths written.
pub fn save_data(clustering: &Clustering, dir: &Path) -> Result<(PathBuf, PathBuf), ClusterError> {
    fs::create_dir_all(dir)?;

    let labels = ClusteredDataLabels {
        data: clustering.assignment.iter().map(|&label| label as u32).collect_vec(),
    };
    let filepath_labels = dir.join("labels.bin");
    write_message(&filepath_labels, &labels)?;

    let centroids = ClusteredDataCentroids {
        data: clustering
            .centroids
            .outer_iter()
            .map(|centroid| FloatList { values: centroid.iter().map(|&v| v as f32).collect_vec() })
            .collect_vec(),
    };
    let filepath_centroids = dir.join("centroids.bin");
    write_message(&filepath_centroids, &centroids)?;

    log::info!(
        "Saved labels to {} and centroids to {}",
        filepath_labels.display(),
        filepath_centroids.display()
    );
    Ok((filepath_labels, filepath_centroids))
}
