//! Error types.

use thiserror::Error;

use crate::price::Price;

/// Errors surfaced by the validating insert path.
///
/// The plain `insert`, `remove` and `snapshot` operations are total and never
/// produce these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("negative lot size {lot_size} at price {price}")]
    NegativeQuantity { price: Price, lot_size: i64 },
}
