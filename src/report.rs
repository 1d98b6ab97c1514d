use itertools::Itertools;

use crate::dataset::Dataset;

const RULE: &str = "==========================";

/// `[ 0, 0, 1, ]`: index is the instance, value its cluster.
pub fn render_assignment(assignment: &[usize]) -> String {
    format!("[ {}]", assignment.iter().map(|c| format!("{}, ", c)).join(""))
}

fn render_feature(value: f64) -> String {
    if value >= 0.0 {
        format!(" {:.1}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// One block per cluster listing the raw features of its members. Features
/// are written back to back; non-negative ones get a leading space.
pub fn render_clusters(dataset: &Dataset, assignment: &[usize], k: usize) -> String {
    let mut out = String::new();
    for cluster in 0..k {
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("--------Cluster #{}--------\n", cluster + 1));
        out.push_str(RULE);
        out.push('\n');

        for (idx, row) in dataset.rows().outer_iter().enumerate() {
            if assignment[idx] != cluster {
                continue;
            }
            let features = row.iter().map(|&v| render_feature(v)).join("");
            out.push_str(&format!("{:>3} {}\n", idx, features));
        }
        out.push_str(RULE);
        out.push('\n');
    }
    out
}
