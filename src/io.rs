//! Reading point files and printing matrices.
//!
//! # Input format
//!
//! One point per line, coordinates separated by commas:
//!
//! ```text
//! 1.0,2.5,-3
//! 0.25,1e-3,7
//! ```
//!
//! - every line ends with `\n`, `\r\n` or `\r`; a non-empty last line without
//!   a terminator is rejected
//! - the first row fixes the dimension; every later row must match it
//! - tokens may not be empty or contain whitespace (`1.0, 2.0` is rejected)
//! - tokens must parse as finite floats; nothing is coerced to 0
//!
//! [`RowReader`] yields one [`RowRead`] per line so callers see end of input
//! and malformed rows as distinct outcomes. [`read_points`] drives it to a
//! [`PointSet`], failing on the first invalid row.
//!
//! # Output format
//!
//! [`format_matrix`] prints row-major, comma-separated, 4 decimal places,
//! one row per line.

use crate::error::{Error, Result};
use crate::points::PointSet;
use ndarray::{ArrayBase, Data, Ix2};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseIssue {
    /// Last line of input has no line terminator.
    #[error("missing line terminator")]
    MissingTerminator,
    /// Line is not valid UTF-8.
    #[error("invalid UTF-8")]
    Encoding,
    /// Two adjacent commas, a leading/trailing comma, or a blank line.
    #[error("empty coordinate at column {column}")]
    EmptyToken {
        /// Zero-based column.
        column: usize,
    },
    /// A coordinate contains whitespace.
    #[error("whitespace in coordinate at column {column}")]
    Whitespace {
        /// Zero-based column.
        column: usize,
    },
    /// A coordinate is not a number.
    #[error("not a number: {token:?}")]
    NotANumber {
        /// Offending token.
        token: String,
    },
    /// A coordinate is infinite, NaN, or overflows `f64`.
    #[error("coordinate out of range: {token:?}")]
    OutOfRange {
        /// Offending token.
        token: String,
    },
    /// Row length differs from the first row.
    #[error("expected {expected} coordinates, found {found}")]
    WrongDimension {
        /// Dimension fixed by the first row.
        expected: usize,
        /// Coordinates on this row.
        found: usize,
    },
}

/// Outcome of reading one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRead {
    /// A well-formed point.
    Point(Vec<f64>),
    /// Clean end of input.
    EndOfInput,
    /// A malformed row.
    Invalid(ParseIssue),
}

enum LineEnd {
    Terminated,
    Eof,
}

/// Line-oriented point reader.
#[derive(Debug)]
pub struct RowReader<R> {
    inner: R,
    dim: Option<usize>,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> RowReader<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            dim: None,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Dimension fixed by the first accepted row, if any.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// One-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read and validate the next row.
    pub fn next_row(&mut self) -> io::Result<RowRead> {
        let end = self.read_line()?;
        if matches!(end, LineEnd::Eof) && self.buf.is_empty() {
            return Ok(RowRead::EndOfInput);
        }
        self.line += 1;
        if matches!(end, LineEnd::Eof) {
            return Ok(RowRead::Invalid(ParseIssue::MissingTerminator));
        }

        let text = match std::str::from_utf8(&self.buf) {
            Ok(t) => t,
            Err(_) => return Ok(RowRead::Invalid(ParseIssue::Encoding)),
        };

        match parse_row(text, self.dim) {
            Ok(point) => {
                self.dim.get_or_insert(point.len());
                Ok(RowRead::Point(point))
            }
            Err(issue) => Ok(RowRead::Invalid(issue)),
        }
    }

    /// Read bytes up to the next `\n`, `\r\n` or `\r` into `self.buf`.
    fn read_line(&mut self) -> io::Result<LineEnd> {
        self.buf.clear();
        loop {
            let (terminator, used) = {
                let available = self.inner.fill_buf()?;
                if available.is_empty() {
                    return Ok(LineEnd::Eof);
                }
                match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                    Some(pos) => {
                        self.buf.extend_from_slice(&available[..pos]);
                        (Some(available[pos]), pos + 1)
                    }
                    None => {
                        self.buf.extend_from_slice(available);
                        (None, available.len())
                    }
                }
            };
            self.inner.consume(used);

            match terminator {
                Some(b'\r') => {
                    if self.inner.fill_buf()?.first() == Some(&b'\n') {
                        self.inner.consume(1);
                    }
                    return Ok(LineEnd::Terminated);
                }
                Some(_) => return Ok(LineEnd::Terminated),
                None => continue,
            }
        }
    }
}

fn parse_row(text: &str, dim: Option<usize>) -> std::result::Result<Vec<f64>, ParseIssue> {
    let mut point = Vec::with_capacity(dim.unwrap_or(8));

    for (column, token) in text.split(',').enumerate() {
        if token.is_empty() {
            return Err(ParseIssue::EmptyToken { column });
        }
        if token.chars().any(char::is_whitespace) {
            return Err(ParseIssue::Whitespace { column });
        }
        let value: f64 = token.parse().map_err(|_| ParseIssue::NotANumber {
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ParseIssue::OutOfRange {
                token: token.to_string(),
            });
        }
        point.push(value);
    }

    if let Some(expected) = dim {
        if point.len() != expected {
            return Err(ParseIssue::WrongDimension {
                expected,
                found: point.len(),
            });
        }
    }
    Ok(point)
}

/// Read a whole point set, failing on the first malformed row.
///
/// Requires at least two points.
pub fn read_points<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut rows = RowReader::new(reader);
    let mut points = Vec::new();

    loop {
        match rows.next_row()? {
            RowRead::Point(p) => points.push(p),
            RowRead::EndOfInput => break,
            RowRead::Invalid(reason) => {
                return Err(Error::Parse {
                    line: rows.line(),
                    reason,
                })
            }
        }
    }

    PointSet::new(points)
}

/// Read a point set from a file.
pub fn read_points_from_path(path: impl AsRef<Path>) -> Result<PointSet> {
    let file = File::open(path)?;
    read_points(BufReader::new(file))
}

/// Render a matrix row-major, comma-separated, 4 decimals, newline per row.
pub fn format_matrix<S: Data<Elem = f64>>(m: &ArrayBase<S, Ix2>) -> String {
    let mut out = String::with_capacity(m.len() * 8);
    for row in m.rows() {
        for (j, v) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{v:.4}");
        }
        out.push('\n');
    }
    out
}

/// Write [`format_matrix`] output to `w`.
pub fn write_matrix<W: Write, S: Data<Elem = f64>>(w: &mut W, m: &ArrayBase<S, Ix2>) -> io::Result<()> {
    w.write_all(format_matrix(m).as_bytes())
}
