//! Profit-matrix cell type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cell of a time × price profit grid.
///
/// `price` and `profit` are rounded to cents, `z_score` to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub profit: f64,
    pub z_score: f64,
}
