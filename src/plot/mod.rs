//! Dot plot of the most significant terms of an [`EnrichmentTable`]
//!
//! Every selected term is drawn as one dot:
//!
//! | Channel | Value |
//! | --- | --- |
//! | x | `-log10(adjusted p-value)` |
//! | y | one row per term, the most significant term at the top |
//! | size | number of overlapping genes × [`MARKER_SCALE`] (squared diameter in pt²) |
//! | color | adjusted p-value on a reversed Blues colormap |
use std::path::Path;

use plotters::style::RGBColor;
use tracing::warn;

use crate::enrichment::EnrichmentTable;
use crate::{f64_from_usize, OraError, OraResult, TOP_TERMS};

pub mod colormap;
mod render;

pub use colormap::Blues;

/// Marker area (pt²) per overlapping gene
pub const MARKER_SCALE: f64 = 50.0;

/// A single term, prepared for plotting
#[derive(Debug, Clone, PartialEq)]
pub struct DotPlotRow {
    term: String,
    adjusted_pvalue: f64,
    significance: f64,
    gene_count: usize,
    color: RGBColor,
}

impl DotPlotRow {
    /// The term name, used as y-axis label
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The adjusted p-value as reported
    pub fn adjusted_pvalue(&self) -> f64 {
        self.adjusted_pvalue
    }

    /// `-log10` of the adjusted p-value, the x position of the dot
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Number of overlapping genes
    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    /// Marker area in pt²
    pub fn marker_area(&self) -> f64 {
        f64_from_usize(self.gene_count) * MARKER_SCALE
    }

    /// Marker color (without transparency)
    pub fn color(&self) -> RGBColor {
        self.color
    }
}

/// The dot plot of an enrichment analysis
///
/// The rows are ordered from the least to the most significant term,
/// which places the most significant term at the top of the y-axis.
///
/// # Examples
///
/// ```
/// use go_ora::{DotPlot, Enrichment, EnrichmentTable};
///
/// let table: EnrichmentTable = vec![
///     Enrichment::new("cellular respiration (GO:0045333)", 0.01, "ND1;ATP6"),
///     Enrichment::new("respiratory chain complex (GO:0098803)", 0.0001, "ND1"),
/// ]
/// .into_iter()
/// .collect();
///
/// let plot = DotPlot::from_table(&table);
/// let last = plot.rows().last().unwrap();
/// assert_eq!(last.term(), "respiratory chain complex (GO:0098803)");
/// assert!((last.significance() - 4.0).abs() < 1e-12);
/// assert_eq!(plot.rows()[0].marker_area(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DotPlot {
    rows: Vec<DotPlotRow>,
    pvalue_range: (f64, f64),
    colormap: Blues,
}

impl DotPlot {
    /// Prepares the plot of the [`TOP_TERMS`] most significant terms
    pub fn from_table(table: &EnrichmentTable) -> Self {
        Self::top(table, TOP_TERMS)
    }

    /// Prepares the plot of the `n` most significant terms
    ///
    /// Ties keep the order of the table.
    pub fn top(table: &EnrichmentTable, n: usize) -> Self {
        let mut selected = table.top_by_adjusted_pvalue(n);
        selected.reverse();

        let pvalue_range = selected
            .iter()
            .map(|record| record.adjusted_pvalue())
            .filter(|pvalue| pvalue.is_finite())
            .fold(None, |range: Option<(f64, f64)>, pvalue| match range {
                None => Some((pvalue, pvalue)),
                Some((min, max)) => Some((min.min(pvalue), max.max(pvalue))),
            })
            .unwrap_or((0.0, 1.0));

        let blues = Blues::reversed();
        let rows = selected
            .into_iter()
            .map(|record| {
                let pvalue = record.adjusted_pvalue();
                if pvalue <= 0.0 {
                    warn!(
                        "Adjusted p-value of {} is {}, clamping to {:e}",
                        record.term(),
                        pvalue,
                        f64::MIN_POSITIVE
                    );
                }
                DotPlotRow {
                    term: record.term().to_string(),
                    adjusted_pvalue: pvalue,
                    significance: neg_log10(pvalue),
                    gene_count: record.gene_count(),
                    color: blues.color(colormap::normalize(
                        pvalue,
                        pvalue_range.0,
                        pvalue_range.1,
                    )),
                }
            })
            .collect();

        Self {
            rows,
            pvalue_range,
            colormap: blues,
        }
    }

    /// The rows in plotting order, from bottom to top
    pub fn rows(&self) -> &[DotPlotRow] {
        &self.rows
    }

    /// Number of terms in the plot
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there is nothing to plot
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The smallest and largest adjusted p-value in the plot
    pub fn pvalue_range(&self) -> (f64, f64) {
        self.pvalue_range
    }

    /// The colormap of the markers and the color bar
    pub fn colormap(&self) -> Blues {
        self.colormap
    }

    /// Renders the plot as PNG to `path`
    ///
    /// The figure is 8 × 10 inches at 300 DPI for the data area and the
    /// color bar, widened to the left by the longest term label. The PNG is
    /// cropped to the drawn content plus a 0.1 inch padding, so its width
    /// depends on the labels and its height is at most 3000 pixels.
    ///
    /// # Errors
    ///
    /// - [`OraError::InvalidInput`] if the plot has no rows
    /// - [`OraError::Plot`] if drawing fails, e.g. because no font is available
    /// - [`OraError::Image`] if the PNG cannot be written
    pub fn render<P: AsRef<Path>>(&self, path: P) -> OraResult<()> {
        if self.is_empty() {
            return Err(OraError::InvalidInput(
                "a dot plot needs at least one term".to_string(),
            ));
        }
        render::draw(self, path.as_ref())
    }
}

/// `-log10(pvalue)`, with non-positive values clamped to [`f64::MIN_POSITIVE`]
///
/// # Examples
///
/// ```
/// use go_ora::plot::neg_log10;
///
/// assert!((neg_log10(0.001) - 3.0).abs() < 1e-12);
/// assert!(neg_log10(0.0).is_finite());
/// ```
pub fn neg_log10(pvalue: f64) -> f64 {
    if pvalue <= 0.0 {
        return -f64::MIN_POSITIVE.log10();
    }
    -pvalue.log10()
}
