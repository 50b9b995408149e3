//! vtail-models
//!
//! Measured tail moment curve: the aerodynamic-centre pitching-moment
//! coefficient of the V-tail as a function of the total angle it sees,
//! stored as ordered samples and evaluated by piecewise-linear
//! interpolation:
//!
//!   cm(α) = cm_i + (α - α_i) * (cm_{i+1} - cm_i) / (α_{i+1} - α_i)
//!
//! Outside the sampled range the curve is clamped to the end samples. An
//! empty table evaluates to 0.0 everywhere.
//!
//! Samples are trusted to be sorted by α ascending; they are never
//! re-sorted. If no bracketing interval is found (non-monotone input) the
//! query falls back to the last sample, same as clamping above the range.
//!
//! Exports:
//!   - `AeroTable` (`load`, `query`, text loaders)
//!   - `parse_samples` / `parse_sample_bytes`
//!   - `Sample`
//!   - `DataError`

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// One measured point of the tail moment curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub alpha: f64, // deg
    pub cm: f64,    // dimensionless
}

impl Sample {
    pub fn new(alpha: f64, cm: f64) -> Self {
        Self { alpha, cm }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((alpha, cm): (f64, f64)) -> Self {
        Self { alpha, cm }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read aerodynamic data: {0}")]
    Io(#[from] io::Error),
    #[error("no numeric (alpha, cm) pairs found in '{}'", path.display())]
    Empty { path: PathBuf },
}

/// Ordered (alpha, cm) samples with clamped linear interpolation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AeroTable {
    samples: Vec<Sample>,
}

impl AeroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from samples already sorted by alpha.
    pub fn from_samples<I, S>(samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let mut table = Self::new();
        table.load(samples);
        table
    }

    /// Replace the table contents. Order is kept as given.
    pub fn load<I, S>(&mut self, samples: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        self.samples = samples.into_iter().map(Into::into).collect();
    }

    /// Parse the two-column text format from any reader.
    ///
    /// Zero parsed pairs is not an error here; the empty table degrades to
    /// 0.0 for every query. Bytes that are not UTF-8 only end the read at
    /// the token holding them.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DataError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self { samples: parse_sample_bytes(&bytes) })
    }

    /// Load the two-column text file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        if table.is_empty() {
            warn!(path = %path.display(), "aerodynamic table is empty; tail Cm will read as 0.0");
        } else {
            info!(path = %path.display(), points = table.len(), "loaded aerodynamic table");
        }
        Ok(table)
    }

    /// Like [`AeroTable::from_path`] but an empty result is an error.
    pub fn from_path_non_empty(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let table = Self::from_path(path)?;
        if table.is_empty() {
            return Err(DataError::Empty { path: path.to_path_buf() });
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// (first alpha, last alpha), or `None` for an empty table.
    pub fn alpha_range(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.alpha, last.alpha)),
            _ => None,
        }
    }

    /// Interpolated cm at `alpha` [deg], clamped to the end samples.
    pub fn query(&self, alpha: f64) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };

        // Clamp to the sampled range
        if alpha <= first.alpha {
            return first.cm;
        }
        if alpha >= last.alpha {
            return last.cm;
        }

        for pair in self.samples.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if alpha >= lo.alpha && alpha < hi.alpha {
                let slope = (hi.cm - lo.cm) / (hi.alpha - lo.alpha);
                return lo.cm + (alpha - lo.alpha) * slope;
            }
        }

        // No bracketing interval: malformed samples (or a NaN alpha)
        last.cm
    }
}

/// Read whitespace-separated numbers pairwise as (alpha, cm).
///
/// Stops at the first token that is not a finite number; a trailing
/// unpaired value is dropped.
pub fn parse_samples(text: &str) -> Vec<Sample> {
    parse_sample_bytes(text.as_bytes())
}

/// Byte-level [`parse_samples`]: tokens split on ASCII whitespace, and a
/// token that is not valid UTF-8 counts as a non-number.
pub fn parse_sample_bytes(bytes: &[u8]) -> Vec<Sample> {
    let mut numbers = bytes
        .split(u8::is_ascii_whitespace)
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            std::str::from_utf8(tok)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        });

    let mut out = Vec::new();
    while let (Some(Some(alpha)), Some(Some(cm))) = (numbers.next(), numbers.next()) {
        out.push(Sample { alpha, cm });
    }
    out
}

/* -------------------------------- tests -------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn three_point() -> AeroTable {
        AeroTable::from_samples([(-5.0, 0.10), (0.0, 0.02), (5.0, -0.06)])
    }

    #[test]
    fn empty_table_reads_zero() {
        let t = AeroTable::new();
        for a in [-100.0, -1.0, 0.0, 3.3, 1e6] {
            assert_eq!(t.query(a), 0.0);
        }
        assert_eq!(t.alpha_range(), None);
    }

    #[test]
    fn single_sample_is_constant() {
        let t = AeroTable::from_samples([(2.0, -0.3)]);
        assert_eq!(t.query(-10.0), -0.3);
        assert_eq!(t.query(2.0), -0.3);
        assert_eq!(t.query(10.0), -0.3);
    }

    #[test]
    fn hits_samples_exactly() {
        let t = three_point();
        assert_eq!(t.query(-5.0), 0.10);
        assert_eq!(t.query(0.0), 0.02);
        assert_eq!(t.query(5.0), -0.06);
    }

    #[test]
    fn interpolates_linearly_inside_range() {
        let t = three_point();
        assert_abs_diff_eq!(t.query(-2.5), 0.06, epsilon = 1e-15);
        assert_abs_diff_eq!(t.query(1.0), 0.004, epsilon = 1e-15);

        let v = t.query(-4.0);
        assert!(v < 0.10 && v > 0.02);
    }

    #[test]
    fn clamps_outside_range() {
        let t = three_point();
        assert_eq!(t.query(-5.0001), 0.10);
        assert_eq!(t.query(-90.0), 0.10);
        assert_eq!(t.query(5.0001), -0.06);
        assert_eq!(t.query(90.0), -0.06);
    }

    #[test]
    fn unbracketed_query_falls_back_to_last_sample() {
        // A NaN alpha in the middle leaves (0, 10) without a bracketing interval.
        let t = AeroTable::from_samples([(0.0, 1.0), (f64::NAN, 2.0), (10.0, 4.0)]);
        assert_eq!(t.query(5.0), 4.0);

        // NaN queries fail every comparison and land on the same fallback.
        assert_eq!(three_point().query(f64::NAN), -0.06);
    }

    #[test]
    fn out_of_order_samples_are_not_resorted() {
        let t = AeroTable::from_samples([(0.0, 1.0), (4.0, 2.0), (1.0, 3.0), (10.0, 4.0)]);
        assert_eq!(t.samples()[1], Sample::new(4.0, 2.0));
        // First interval [0, 4) wins even though (1, 3) would also bracket 2.0
        assert_abs_diff_eq!(t.query(2.0), 1.5, epsilon = 1e-15);
        // [4, 1) is empty; 5.0 is bracketed by [1, 10)
        assert_abs_diff_eq!(t.query(5.0), 3.0 + 4.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    fn load_replaces_contents() {
        let mut t = three_point();
        t.load([Sample::new(1.0, 1.0)]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.samples(), &[Sample::new(1.0, 1.0)]);
    }

    #[test]
    fn parses_pairs_until_first_bad_token() {
        let s = parse_samples("-5 0.10\n0   0.02\n5 -0.06\nend 1 2\n");
        assert_eq!(s, vec![Sample::new(-5.0, 0.10), Sample::new(0.0, 0.02), Sample::new(5.0, -0.06)]);

        let s = parse_samples("1 2\n3 oops\n4 5\n");
        assert_eq!(s, vec![Sample::new(1.0, 2.0)]);
    }

    #[test]
    fn drops_unpaired_trailing_value() {
        let s = parse_samples("1 2 3");
        assert_eq!(s, vec![Sample::new(1.0, 2.0)]);
    }

    #[test]
    fn pairs_are_token_based_not_line_based() {
        let s = parse_samples("1\n2 3\t4\n\n");
        assert_eq!(s, vec![Sample::new(1.0, 2.0), Sample::new(3.0, 4.0)]);
    }

    #[test]
    fn non_finite_tokens_stop_the_read() {
        assert!(parse_samples("NaN 1 2 3").is_empty());
        assert_eq!(parse_samples("1 2 inf 3"), vec![Sample::new(1.0, 2.0)]);
    }

    #[test]
    fn non_utf8_trailer_ends_the_read_and_keeps_pairs() {
        let t = AeroTable::from_reader(&b"-5 0.10\n0 0.02\n5 -0.06\n# comment \xe9t\xe9\n"[..]).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.samples()[2], Sample::new(5.0, -0.06));

        // Latin-1 degree sign glued to a value makes that token unreadable
        assert_eq!(parse_sample_bytes(b"1 2\n3\xb0 4\n"), vec![Sample::new(1.0, 2.0)]);
    }

    #[test]
    fn reader_with_no_numbers_gives_empty_table() {
        let t = AeroTable::from_reader("alpha cm\n".as_bytes()).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.query(3.0), 0.0);
    }
}
