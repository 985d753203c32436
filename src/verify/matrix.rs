use crate::client::Channel;
use crate::error::{DemoError, DemoResult};
use crate::nt::NT_MATRIX;

use super::{compare_slices, join, Verification, Verifier};

/// Splits a row-major flat array into rows of `width` elements.
///
/// A zero width yields the whole array as one row.
#[must_use]
pub fn reshape<T>(values: &[T], width: usize) -> Vec<&[T]> {
    if width == 0 {
        return vec![values];
    }
    values.chunks(width).collect()
}

/// NTMatrix: writes `dim` and a sequential row-major `value`.
#[derive(Debug, Clone, Copy)]
pub struct MatrixVerifier {
    rows: usize,
    cols: usize,
}

impl Default for MatrixVerifier {
    fn default() -> Self {
        Self { rows: 5, cols: 5 }
    }
}

impl MatrixVerifier {
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[allow(clippy::cast_precision_loss)]
    fn expected(&self) -> DemoResult<(Vec<i32>, Vec<f64>)> {
        let to_i32 = |n: usize| {
            i32::try_from(n).map_err(|_| DemoError::internal("matrix dimension exceeds i32"))
        };
        let dim = vec![to_i32(self.rows)?, to_i32(self.cols)?];
        let value = (0..self.rows * self.cols).map(|i| i as f64).collect();
        Ok((dim, value))
    }
}

impl Verifier for MatrixVerifier {
    fn schema(&self) -> &'static str {
        NT_MATRIX
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        let (dim, value) = self.expected()?;
        put_get.put_data_mut().replace("dim", dim.clone())?;
        put_get.put_data_mut().replace("value", value.clone())?;
        put_get.execute()?;

        let read = put_get.get_data();
        let read_dim = read.view::<i32>("dim")?;
        let read_val = read.view::<f64>("value")?;

        compare_slices(&mut v, "dim", &dim, read_dim);
        compare_slices(&mut v, "value", &value, read_val);

        let width = read_dim
            .get(1)
            .and_then(|w| usize::try_from(*w).ok())
            .unwrap_or(self.cols);
        v.line(format!("\tMatrix: dim: {}", join(read_dim, " ")));
        for (i, row) in reshape(read_val, width).into_iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|x| format!("{x:>4}")).collect();
            let lead = if i == 0 { "val:" } else { "    " };
            v.line(format!("\t        {lead} {}", cells.join(" ")));
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::Client;
    use crate::service::{InMemoryRecordService, RecordService};

    #[test]
    fn test_reshape_row_major() {
        let flat: Vec<usize> = (0..25).collect();
        let rows = reshape(&flat, 5);
        assert_eq!(rows.len(), 5);
        for i in 0..25 {
            assert_eq!(rows[i / 5][i % 5], i);
        }
    }

    #[test]
    fn test_reshape_ragged_and_zero_width() {
        let flat = [1, 2, 3, 4, 5];
        let rows = reshape(&flat, 2);
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
        assert_eq!(reshape(&flat, 0), vec![&flat[..]]);
    }

    #[test]
    fn test_matrix_round_trip() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc.clone()).channel("matrix").unwrap();
        let v = MatrixVerifier::default().run(&ch).unwrap();
        assert!(v.success(), "{}", v.transcript());

        let stored = svc.get("matrix").unwrap();
        assert_eq!(stored.view::<i32>("dim").unwrap(), &[5, 5]);
        let values = stored.view::<f64>("value").unwrap();
        assert_eq!(values.len(), 25);
        assert_eq!(values[24], 24.0);
    }

    #[test]
    fn test_matrix_non_square() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc).channel("matrix").unwrap();
        let v = MatrixVerifier::new(2, 3).run(&ch).unwrap();
        assert!(v.success());
        assert!(v.transcript().contains("dim: 2 3"));
    }
}
