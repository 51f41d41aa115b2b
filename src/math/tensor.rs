use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// N-dimensional row-major tensor; the persisted form of every dataset array.
///
/// The first dimension indexes entries ("slots"); the remaining dimensions
/// describe one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

/// Product of `shape`, or `None` if it does not fit in a `usize`.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

impl<T: Clone + Default> Tensor<T> {
    /// Allocates a zero-filled tensor.
    pub fn zeros(shape: &[usize]) -> Result<Tensor<T>, ShapeError> {
        let len = element_count(shape)
            .ok_or_else(|| ShapeError::ShapeOverflow { shape: shape.to_vec() })?;
        Ok(Tensor { shape: shape.to_vec(), data: vec![T::default(); len] })
    }
}

impl<T> Tensor<T> {
    /// Number of entries along the first dimension.
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values per entry (product of the trailing dimensions). Saturates on
    /// shapes that overflow; `validate` rejects those.
    pub fn entry_size(&self) -> usize {
        element_count(self.shape.get(1..).unwrap_or(&[])).unwrap_or(usize::MAX)
    }

    /// Borrow one entry.
    pub fn entry(&self, index: usize) -> Option<&[T]> {
        if index >= self.len() {
            return None;
        }
        let range = self.entry_range(index)?;
        self.data.get(range)
    }

    /// Mutably borrow one entry; out-of-range slots are an error.
    pub fn entry_mut(&mut self, index: usize) -> Result<&mut [T], ShapeError> {
        let len = self.len();
        let out_of_range = ShapeError::SlotOutOfRange { slot: index, len };
        if index >= len {
            return Err(out_of_range);
        }
        match self.entry_range(index) {
            Some(range) => self.data.get_mut(range).ok_or(out_of_range),
            None => Err(out_of_range),
        }
    }

    fn entry_range(&self, index: usize) -> Option<std::ops::Range<usize>> {
        let size = self.entry_size();
        let start = index.checked_mul(size)?;
        Some(start..start.checked_add(size)?)
    }

    /// Checks that the data length matches the declared shape.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let expected = element_count(&self.shape)
            .ok_or_else(|| ShapeError::ShapeOverflow { shape: self.shape.clone() })?;
        if self.shape.is_empty() || expected != self.data.len() {
            return Err(ShapeError::TensorLength {
                shape: self.shape.clone(),
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}
