use itertools::Itertools;
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClusterError;

/// N instances of D features each, stored row-major. Row index is the
/// instance identity reported back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Array2<f64>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ClusterError> {
        let n = rows.len();
        if n == 0 {
            return Err(ClusterError::malformed("dataset has no instances"));
        }
        let d = rows[0].len();
        if d == 0 {
            return Err(ClusterError::malformed("instances have no features"));
        }
        if let Some((idx, row)) = rows.iter().find_position(|row| row.len() != d) {
            return Err(ClusterError::malformed(format!(
                "instance {} has {} features, expected {}",
                idx,
                row.len(),
                d
            )));
        }
        if let Some(idx) = rows.iter().position(|row| row.iter().any(|v| !v.is_finite())) {
            return Err(ClusterError::malformed(format!(
                "instance {} contains a non-finite value",
                idx
            )));
        }

        let flat = rows.into_iter().flatten().collect_vec();
        let rows = Array2::from_shape_vec((n, d), flat)
            .map_err(|e| ClusterError::malformed(e.to_string()))?;
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }

    pub fn n_instances(&self) -> usize {
        self.rows.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.rows.ncols()
    }
}

/// A field that arrives either as its JSON value or as a string holding
/// that JSON value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Encoded<T> {
    Direct(T),
    Text(String),
}

impl<T: DeserializeOwned> Encoded<T> {
    fn decode(self, field: &str) -> Result<T, ClusterError> {
        match self {
            Encoded::Direct(value) => Ok(value),
            Encoded::Text(text) => serde_json::from_str(&text).map_err(|e| {
                ClusterError::malformed(format!("field `{}` is not valid: {}", field, e))
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawRequest {
    instances: Option<Encoded<Vec<Vec<f64>>>>,
    clusters: Option<Encoded<i64>>,
}

/// A decoded clustering request: the instances and the requested K.
/// K itself is range-checked by the orchestrator, not here.
#[derive(Debug, Clone)]
pub struct ClusterRequest {
    pub dataset: Dataset,
    pub clusters: Option<usize>,
}

impl ClusterRequest {
    /// Decodes `{"instances": [[...], ...], "clusters": K}`. A missing
    /// `clusters` field is allowed here so a caller can supply K separately;
    /// use [`ClusterRequest::require_clusters`] when it must be present.
    pub fn from_json(body: &str) -> Result<Self, ClusterError> {
        let raw: RawRequest = serde_json::from_str(body)
            .map_err(|e| ClusterError::malformed(format!("request is not valid: {}", e)))?;

        let instances = raw
            .instances
            .ok_or_else(|| ClusterError::malformed("missing field `instances`"))?
            .decode("instances")?;
        let clusters = match raw.clusters {
            Some(encoded) => {
                let k = encoded.decode("clusters")?;
                let k = usize::try_from(k).map_err(|_| {
                    ClusterError::malformed(format!("field `clusters` must be positive, got {}", k))
                })?;
                Some(k)
            }
            None => None,
        };

        Ok(Self {
            dataset: Dataset::from_rows(instances)?,
            clusters,
        })
    }

    pub fn require_clusters(&self) -> Result<usize, ClusterError> {
        self.clusters
            .ok_or_else(|| ClusterError::malformed("missing field `clusters`"))
    }
}
