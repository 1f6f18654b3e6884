//! Fixed-precision text encoding of numeric results.
//!
//! Plotting front ends consume solutions as array literals such as
//! `[0.000000,0.125000,0.250000]`. Every value is printed with a fixed number
//! of decimals (6 by default), so the output parses as a JSON array.
//! NaN and infinities have no literal form and are rejected.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use std::fmt::Write;

/// Decimal digits used by the plotting front end.
pub const DEFAULT_PRECISION: usize = 6;

/// Fixed-precision array encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultEncoder {
    precision: usize,
}

impl ResultEncoder {
    /// Encoder with the default 6-digit precision.
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Encoder with a custom number of decimals.
    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    /// Number of decimals written per value.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Encode a vector as `[v0,v1,...]`.
    ///
    /// # Errors
    ///
    /// [`Error::NonFiniteResult`] naming the first NaN or infinite entry.
    pub fn encode(&self, values: &[f64]) -> Result<String> {
        check_finite(values.iter().copied(), |i| format!("index {}", i))?;

        let mut out = String::with_capacity(2 + values.len() * (self.precision + 4));
        self.write_row(&mut out, values.iter().copied());
        Ok(out)
    }

    /// Encode a matrix as `[[r0c0,r0c1,...],[r1c0,...],...]`.
    ///
    /// # Errors
    ///
    /// [`Error::NonFiniteResult`] naming the first NaN or infinite entry.
    pub fn encode_table(&self, table: &DMatrix<f64>) -> Result<String> {
        for i in 0..table.nrows() {
            check_finite(table.row(i).iter().copied(), |j| format!("row {}, column {}", i, j))?;
        }

        let mut out = String::with_capacity(2 + table.len() * (self.precision + 4));
        out.push('[');
        for (i, row) in table.row_iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_row(&mut out, row.iter().copied());
        }
        out.push(']');
        Ok(out)
    }

    fn write_row(&self, out: &mut String, values: impl Iterator<Item = f64>) {
        out.push('[');
        for (i, v) in values.enumerate() {
            if i > 0 {
                out.push(',');
            }
            // Adding +0.0 turns -0.0 into 0.0; writing into a String cannot fail
            let _ = write!(out, "{:.*}", self.precision, v + 0.0);
        }
        out.push(']');
    }
}

impl Default for ResultEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_finite(values: impl Iterator<Item = f64>, locate: impl Fn(usize) -> String) -> Result<()> {
    for (i, v) in values.enumerate() {
        if !v.is_finite() {
            return Err(Error::NonFiniteResult(format!("{} at {}", v, locate(i))));
        }
    }
    Ok(())
}

/// Encode a vector with the default precision.
pub fn encode(values: &[f64]) -> Result<String> {
    ResultEncoder::new().encode(values)
}

/// Encode a matrix with the default precision.
pub fn encode_table(table: &DMatrix<f64>) -> Result<String> {
    ResultEncoder::new().encode_table(table)
}
