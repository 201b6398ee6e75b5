//! Descriptive statistics over annual amounts

use serde::Serialize;

/// Count, mean and median of a group of amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    /// None for an empty group
    pub fn of(values: &[i64]) -> Option<Self> {
        Some(Summary {
            count: values.len(),
            mean: mean(values)?,
            median: median(values)?,
        })
    }
}

pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: i128 = values.iter().map(|&v| v as i128).sum();
    Some(total as f64 / values.len() as f64)
}

/// Middle value after an ascending sort; the average of the two middle values
/// for an even count
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    }
}
