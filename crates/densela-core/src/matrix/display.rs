//! Formatting for [`Matrix`] and the render hook used by the algorithms.
//!
//! `Display` prints a compact nested-list form. [`Matrix::display_with`]
//! produces an aligned table whose padding and precision come from an
//! explicit [`RenderConfig`]. Algorithms never print: they hand
//! intermediate matrices to a [`Render`] implementation supplied by the
//! caller.

use core::fmt;

use super::Matrix;

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matrix([")?;
        for r in 0..self.rows {
            write!(f, "  [")?;
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, ", ")?;
                }
                let v = self.data[r * self.cols + c];
                match f.precision() {
                    Some(p) => write!(f, "{v:.p$}")?,
                    None => write!(f, "{v}")?,
                }
            }
            if r < self.rows - 1 {
                writeln!(f, "],")?;
            } else {
                writeln!(f, "]")?;
            }
        }
        write!(f, "])")
    }
}

// ======================================================================
// Table rendering
// ======================================================================

/// Layout options for table rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Blank columns between cells.
    pub padding: usize,
    /// Digits after the decimal point.
    pub precision: usize,
}

impl RenderConfig {
    /// Config with the default padding of 1 and precision of 3.
    pub fn new() -> Self {
        Self {
            padding: 1,
            precision: 3,
        }
    }

    /// Set the padding between cells.
    #[must_use]
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Set the number of decimals.
    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `Display` adapter returned by [`Matrix::display_with`].
pub struct TableDisplay<'a> {
    matrix: &'a Matrix,
    config: RenderConfig,
}

impl Matrix {
    /// Render as an aligned table.
    ///
    /// ```
    /// # use densela_core::{Matrix, RenderConfig};
    /// let m = Matrix::identity(2);
    /// let table = m.display_with(RenderConfig::new().with_precision(1)).to_string();
    /// assert!(table.starts_with("(2, 2)"));
    /// assert!(table.contains("1.0 0.0"));
    /// ```
    pub fn display_with(&self, config: RenderConfig) -> TableDisplay<'_> {
        TableDisplay {
            matrix: self,
            config,
        }
    }
}

impl fmt::Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix;
        let p = self.config.precision;
        let cells: Vec<String> = m.data.iter().map(|v| format!("{v:.p$}")).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);
        let line_len = (width + self.config.padding) * m.cols;

        let header = format!("({}, {}) ", m.rows, m.cols);
        write!(f, "{header}")?;
        writeln!(f, "{}", "-".repeat(line_len.saturating_sub(header.len())))?;
        for row in cells.chunks(m.cols) {
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, "{}", " ".repeat(self.config.padding))?;
                }
                write!(f, "{cell:>width$}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", "-".repeat(line_len))
    }
}

// ======================================================================
// Render hook
// ======================================================================

/// Receiver for intermediate and final matrices produced by an algorithm.
pub trait Render {
    /// Called with a short label such as `"householder vector"`.
    fn render(&mut self, label: &str, matrix: &Matrix);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRender;

impl Render for NoRender {
    fn render(&mut self, _label: &str, _matrix: &Matrix) {}
}

/// Emits each matrix as a `trace`-level `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRender {
    /// Table layout for the logged matrix.
    pub config: RenderConfig,
}

impl Render for TracingRender {
    fn render(&mut self, label: &str, matrix: &Matrix) {
        tracing::trace!(
            label,
            rows = matrix.rows(),
            cols = matrix.cols(),
            "\n{}",
            matrix.display_with(self.config)
        );
    }
}

impl<F> Render for F
where
    F: FnMut(&str, &Matrix),
{
    fn render(&mut self, label: &str, matrix: &Matrix) {
        self(label, matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_2d() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let s = format!("{m}");
        assert!(s.starts_with("matrix("));
        assert!(s.contains("[1, 2]"));
        assert!(s.contains("[3, 4]"));
    }

    #[test]
    fn test_display_precision() {
        let m = Matrix::from_vec(1, 2, vec![0.5, 1.0 / 3.0]).unwrap();
        let s = format!("{m:.2}");
        assert!(s.contains("[0.50, 0.33]"));
    }

    #[test]
    fn test_table_layout() {
        let m = Matrix::from_vec(2, 2, vec![1.0, -10.5, 3.25, 4.0]).unwrap();
        let table = m.display_with(RenderConfig::new()).to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("(2, 2) "));
        assert_eq!(lines[1], "  1.000 -10.500");
        assert_eq!(lines[2], "  3.250   4.000");
        assert!(lines[3].chars().all(|c| c == '-'));
    }

    #[test]
    fn test_table_padding() {
        let m = Matrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
        let cfg = RenderConfig::default().with_padding(3).with_precision(0);
        let table = m.display_with(cfg).to_string();
        assert!(table.contains("1   2"));
    }

    #[test]
    fn test_closure_render() {
        let mut seen = Vec::new();
        let mut hook = |label: &str, m: &Matrix| seen.push((label.to_owned(), m.shape()));
        hook.render("a", &Matrix::zeros(2, 3));
        NoRender.render("ignored", &Matrix::zeros(1, 1));
        assert_eq!(seen, vec![("a".to_owned(), (2, 3))]);
    }

    #[test]
    fn test_tracing_render_under_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut hook = TracingRender {
                config: RenderConfig::new().with_precision(1),
            };
            hook.render("identity", &Matrix::identity(2));
        });
    }
}
