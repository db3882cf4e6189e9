//! Enrichment records and the result table returned by an [`EnrichmentService`]
//!
//! Each [`Enrichment`] is a single GO term that is over-represented in the
//! submitted gene list. The records are kept exactly as the service reports
//! them, the crate never recomputes any statistic.
//!
//! [`EnrichmentService`]: crate::EnrichmentService
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod export;

/// Delimiter between gene symbols in the `Genes` column
pub const GENE_DELIMITER: char = ';';

/// The column names of the result table, in their native order
pub const COLUMNS: [&str; 10] = [
    "Gene_set",
    "Term",
    "Overlap",
    "P-value",
    "Adjusted P-value",
    "Old P-value",
    "Old Adjusted P-value",
    "Odds Ratio",
    "Combined Score",
    "Genes",
];

/// A gene list of a single term, mostly only a handful of symbols
pub type TermGenes<'a> = SmallVec<[&'a str; 8]>;

/// A single enriched term
///
/// The field names follow the Enrichr export format, with an additional
/// `Gene_set` column naming the library the term belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(rename = "Gene_set", default)]
    gene_set: String,
    #[serde(rename = "Term")]
    term: String,
    #[serde(rename = "Overlap", default)]
    overlap: String,
    #[serde(rename = "P-value")]
    pvalue: f64,
    #[serde(rename = "Adjusted P-value")]
    adjusted_pvalue: f64,
    #[serde(
        rename = "Old P-value",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    old_pvalue: Option<f64>,
    #[serde(
        rename = "Old Adjusted P-value",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    old_adjusted_pvalue: Option<f64>,
    #[serde(rename = "Odds Ratio")]
    odds_ratio: f64,
    #[serde(rename = "Combined Score")]
    combined_score: f64,
    #[serde(rename = "Genes", default)]
    genes: String,
}

impl Enrichment {
    /// Constructs a new `Enrichment` from the values needed for plotting
    ///
    /// All other columns are empty or `1.0` (p-value) / `0.0` (scores) and can
    /// be set with the `with_*` methods. Records are normally created by an
    /// [`EnrichmentService`](crate::EnrichmentService), this is mostly useful for
    /// custom services and tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_ora::Enrichment;
    ///
    /// let term = Enrichment::new("respiratory electron transport chain (GO:0022904)", 1e-4, "ND1;COX4I2")
    ///     .with_gene_set("GO_Biological_Process_2021")
    ///     .with_odds_ratio(1250.0);
    ///
    /// assert_eq!(term.gene_count(), 2);
    /// assert_eq!(term.gene_set(), "GO_Biological_Process_2021");
    /// ```
    pub fn new(term: &str, adjusted_pvalue: f64, genes: &str) -> Self {
        Self {
            gene_set: String::new(),
            term: term.to_string(),
            overlap: String::new(),
            pvalue: 1.0,
            adjusted_pvalue,
            old_pvalue: None,
            old_adjusted_pvalue: None,
            odds_ratio: 0.0,
            combined_score: 0.0,
            genes: genes.to_string(),
        }
    }

    /// Sets the name of the gene-set library
    #[must_use]
    pub fn with_gene_set(mut self, gene_set: &str) -> Self {
        self.gene_set = gene_set.to_string();
        self
    }

    /// Sets the overlap, e.g. `2/17`
    #[must_use]
    pub fn with_overlap(mut self, overlap: &str) -> Self {
        self.overlap = overlap.to_string();
        self
    }

    /// Sets the raw (unadjusted) p-value
    #[must_use]
    pub fn with_pvalue(mut self, pvalue: f64) -> Self {
        self.pvalue = pvalue;
        self
    }

    /// Sets the odds ratio
    #[must_use]
    pub fn with_odds_ratio(mut self, odds_ratio: f64) -> Self {
        self.odds_ratio = odds_ratio;
        self
    }

    /// Sets the combined score
    #[must_use]
    pub fn with_combined_score(mut self, combined_score: f64) -> Self {
        self.combined_score = combined_score;
        self
    }

    pub(crate) fn set_gene_set(&mut self, gene_set: &str) {
        self.gene_set = gene_set.to_string();
    }

    /// The gene-set library of the term, e.g. `GO_Biological_Process_2021`
    pub fn gene_set(&self) -> &str {
        &self.gene_set
    }

    /// The term name, including the GO identifier
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Number of overlapping genes over the size of the term, e.g. `2/17`
    pub fn overlap(&self) -> &str {
        &self.overlap
    }

    /// The raw p-value of the enrichment
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The FDR adjusted p-value
    ///
    /// This is the value used for filtering, ranking and plotting
    pub fn adjusted_pvalue(&self) -> f64 {
        self.adjusted_pvalue
    }

    /// The p-value of the legacy Enrichr algorithm, if reported
    pub fn old_pvalue(&self) -> Option<f64> {
        self.old_pvalue
    }

    /// The adjusted p-value of the legacy Enrichr algorithm, if reported
    pub fn old_adjusted_pvalue(&self) -> Option<f64> {
        self.old_adjusted_pvalue
    }

    /// The odds ratio (effect size) of the enrichment
    pub fn odds_ratio(&self) -> f64 {
        self.odds_ratio
    }

    /// Enrichr's combined score: `ln(p) * z`
    pub fn combined_score(&self) -> f64 {
        self.combined_score
    }

    /// The overlapping genes as the raw, `;`-delimited string
    pub fn genes_raw(&self) -> &str {
        &self.genes
    }

    /// The overlapping gene symbols
    ///
    /// An empty `Genes` column has no symbols. Otherwise every
    /// `;`-delimited segment counts, even an empty one.
    pub fn genes(&self) -> TermGenes<'_> {
        if self.genes.is_empty() {
            return SmallVec::new();
        }
        self.genes.split(GENE_DELIMITER).collect()
    }

    /// The number of overlapping genes
    ///
    /// # Examples
    ///
    /// ```
    /// use go_ora::Enrichment;
    ///
    /// assert_eq!(Enrichment::new("t", 0.01, "A;B;C").gene_count(), 3);
    /// assert_eq!(Enrichment::new("t", 0.01, "").gene_count(), 0);
    /// ```
    pub fn gene_count(&self) -> usize {
        self.genes().len()
    }
}

/// The result table of an enrichment analysis
///
/// Records keep the order in which the service returned them. Term names
/// are not guaranteed to be unique, the same term can appear in several
/// libraries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentTable {
    records: Vec<Enrichment>,
}

impl EnrichmentTable {
    /// Constructs a new table from records
    pub fn new(records: Vec<Enrichment>) -> Self {
        Self { records }
    }

    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record to the end of the table
    pub fn push(&mut self, record: Enrichment) {
        self.records.push(record);
    }

    /// Returns an iterator of all records, in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Enrichment> {
        self.records.iter()
    }

    /// Returns the records as slice
    pub fn records(&self) -> &[Enrichment] {
        &self.records
    }

    /// Consumes the table and returns the records
    pub fn into_records(self) -> Vec<Enrichment> {
        self.records
    }

    /// Removes all records with an adjusted p-value above `cutoff`
    ///
    /// Records with a p-value of `NaN` are removed as well.
    pub fn retain_significant(&mut self, cutoff: f64) {
        self.records.retain(|record| record.adjusted_pvalue <= cutoff);
    }

    /// Returns the `n` records with the smallest adjusted p-value
    ///
    /// The records are sorted ascending by adjusted p-value. Records with
    /// equal p-values keep their relative order from the table and
    /// `NaN` values are sorted last.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_ora::{Enrichment, EnrichmentTable};
    ///
    /// let table: EnrichmentTable = vec![
    ///     Enrichment::new("a", 0.04, "ND1"),
    ///     Enrichment::new("b", 0.001, "ND1"),
    ///     Enrichment::new("c", 0.04, "ATP6"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let terms: Vec<&str> = table
    ///     .top_by_adjusted_pvalue(2)
    ///     .iter()
    ///     .map(|record| record.term())
    ///     .collect();
    /// assert_eq!(terms, vec!["b", "a"]);
    /// ```
    pub fn top_by_adjusted_pvalue(&self, n: usize) -> Vec<&Enrichment> {
        let mut sorted: Vec<&Enrichment> = self.records.iter().collect();
        // `sort_by` is stable, ties keep the table order
        sorted.sort_by(|a, b| ascending_nan_last(a.adjusted_pvalue, b.adjusted_pvalue));
        sorted.truncate(n);
        sorted
    }
}

fn ascending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

impl FromIterator<Enrichment> for EnrichmentTable {
    fn from_iter<T: IntoIterator<Item = Enrichment>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EnrichmentTable {
    type Item = &'a Enrichment;
    type IntoIter = std::slice::Iter<'a, Enrichment>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for EnrichmentTable {
    type Item = Enrichment;
    type IntoIter = std::vec::IntoIter<Enrichment>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
