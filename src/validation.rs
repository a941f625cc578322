use crate::{Result, SymNmfError};
use num_traits::Float;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DataValidator<'a, T> {
    data: &'a [Vec<T>],
}

impl<'a, T: Float> DataValidator<'a, T> {
    pub(crate) fn new(data: &'a [Vec<T>]) -> Self {
        Self { data }
    }

    pub(crate) fn validate_input_data(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(SymNmfError::InvalidInput(String::from(
                "The point set provided is empty",
            )));
        }
        let dims_0th = self.data[0].len();
        if dims_0th == 0 {
            return Err(SymNmfError::InvalidInput(String::from(
                "Points must have at least one coordinate",
            )));
        }
        for (n, datapoint) in self.data.iter().enumerate() {
            if datapoint.iter().any(|element| !element.is_finite()) {
                return Err(SymNmfError::InvalidInput(format!(
                    "{n}th point contains non-finite coordinate(s)"
                )));
            }
            let dims_nth = datapoint.len();
            if dims_nth != dims_0th {
                return Err(SymNmfError::InvalidInput(format!(
                    "0th point has {dims_0th} dimensions, but {n}th has {dims_nth}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn validate_cluster_count(&self, k: usize) -> Result<()> {
        let n = self.data.len();
        if k < 1 || k > n {
            return Err(SymNmfError::InvalidInput(format!(
                "Cluster count {k} must be between 1 and the number of points ({n})"
            )));
        }
        Ok(())
    }

    pub(crate) fn validate_labels(&self, labels: &[usize]) -> Result<()> {
        if labels.len() != self.data.len() {
            return Err(SymNmfError::InvalidInput(format!(
                "Got {} labels for {} points",
                labels.len(),
                self.data.len()
            )));
        }
        Ok(())
    }
}
