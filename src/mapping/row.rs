//! Target row

use crate::decode::Scalar;

/// One fully resolved row, values in `ColumnSpec` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRow {
    values: Vec<Scalar>,
}

impl TargetRow {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
