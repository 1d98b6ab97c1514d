use ndarray::{Array2, Axis};

use crate::dataset::Dataset;

/// What each centered feature column is divided by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Spread {
    /// Population variance of the column (no square root). Gives the same
    /// geometry as the historical service, not a true Z-score.
    #[default]
    Variance,
    /// Population standard deviation: a true Z-score.
    #[value(name = "std-dev")]
    StandardDeviation,
}

/// Per-column statistics gathered before rescaling.
///
/// Sums run over the column divided by its largest magnitude, so they stay
/// finite for any finite input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    scale: f64,
    scaled_mean: f64,
    scaled_variance: f64,
}

impl ColumnStats {
    pub fn mean(&self) -> f64 {
        self.scaled_mean * self.scale
    }

    pub fn variance(&self) -> f64 {
        self.scaled_variance * self.scale * self.scale
    }

    fn is_constant(&self) -> bool {
        self.scaled_variance == 0.0
    }

    /// `(value - mean) / spread`, evaluated in the scaled domain.
    fn rescale(&self, value: f64, spread: Spread) -> f64 {
        let centered = value / self.scale - self.scaled_mean;
        match spread {
            Spread::Variance => centered / self.scaled_variance / self.scale,
            Spread::StandardDeviation => centered / self.scaled_variance.sqrt(),
        }
    }
}

pub fn column_stats(rows: &Array2<f64>) -> Vec<ColumnStats> {
    let n = rows.nrows() as f64;
    rows.axis_iter(Axis(1))
        .map(|column| {
            let max_abs = column.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
            let scale = if max_abs > 0.0 { max_abs } else { 1.0 };
            let scaled_mean = column.iter().map(|&v| v / scale).sum::<f64>() / n;
            let scaled_variance = column
                .iter()
                .map(|&v| (v / scale - scaled_mean).powi(2))
                .sum::<f64>()
                / n;
            ColumnStats { scale, scaled_mean, scaled_variance }
        })
        .collect()
}

/// Rescales every feature column independently to `(raw - mean) / spread`.
///
/// Works on a copy; the dataset is left untouched. A constant column has a
/// spread of zero and comes out as all zeros instead of NaN.
pub fn normalize(dataset: &Dataset, spread: Spread) -> Array2<f64> {
    let mut normalized = dataset.rows().to_owned();
    let stats = column_stats(&normalized);

    for (idx, (mut column, stats)) in normalized.axis_iter_mut(Axis(1)).zip(&stats).enumerate() {
        log::debug!("column {}: mean {}, variance {}", idx, stats.mean(), stats.variance());
        if stats.is_constant() {
            log::debug!("constant feature column (mean {}), zeroing it", stats.mean());
            column.fill(0.0);
            continue;
        }
        column.mapv_inplace(|v| stats.rescale(v, spread));
    }

    normalized
}
