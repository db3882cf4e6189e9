//! Gene Ontology over-representation analysis (ORA) for small gene lists
//!
//! `go_ora` submits a list of gene symbols to the [Enrichr](https://maayanlab.cloud/Enrichr/)
//! service, checks it against the three Gene Ontology 2021 libraries
//! (biological process, molecular function and cellular component) and
//! turns the returned table into two artifacts:
//!
//! - `resultados_enrichr.csv`: the full result table
//! - `grafico_enriquecimiento_go_dotplot.png`: a dot plot of the 15 most significant terms
//!
//! The statistics are computed by Enrichr, not by this crate.
//!
//! # Examples
//!
//! ```no_run
//! let table = go_ora::run(&["COX4I2", "ND1", "ATP6"], "resultados_gseapy", 0.05).unwrap();
//! for term in table.top_by_adjusted_pvalue(5) {
//!     println!("{}\t{:e}", term.term(), term.adjusted_pvalue());
//! }
//! ```
//!
//! The external call is hidden behind [`EnrichmentService`], so the analysis
//! can run against any other source of enrichment tables:
//!
//! ```
//! use go_ora::{Analysis, EnrichmentRequest, EnrichmentService, EnrichmentTable, OraResult};
//!
//! struct NothingEnriched;
//!
//! impl EnrichmentService for NothingEnriched {
//!     fn enrich(&self, _: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
//!         Ok(EnrichmentTable::default())
//!     }
//! }
//!
//! let dir = std::env::temp_dir().join("go_ora_doc_nothing_enriched");
//! let table = Analysis::new(NothingEnriched)
//!     .output_dir(&dir)
//!     .run(&["COX4I2"])
//!     .unwrap();
//! assert!(table.is_empty());
//! assert!(!dir.join(go_ora::CSV_FILENAME).exists());
//! ```
use thiserror::Error;

pub mod analysis;
pub mod enrichment;
pub mod library;
pub mod plot;
pub mod service;

pub use analysis::{run, Analysis};
pub use enrichment::{Enrichment, EnrichmentTable};
pub use library::{GeneSetLibrary, Organism};
pub use plot::DotPlot;
pub use service::{enrichr::Enrichr, EnrichmentRequest, EnrichmentService};

/// Output directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "resultados_gseapy";
/// Adjusted p-value cutoff used when none is given
pub const DEFAULT_FDR_THRESHOLD: f64 = 0.05;
/// Filename of the full result table inside the output directory
pub const CSV_FILENAME: &str = "resultados_enrichr.csv";
/// Filename of the dot plot inside the output directory
pub const PLOT_FILENAME: &str = "grafico_enriquecimiento_go_dotplot.png";
/// Maximum number of terms shown in the dot plot
pub const TOP_TERMS: usize = 15;

/// Main Error type for this crate
#[derive(Error, Debug)]
pub enum OraError {
    /// The input or a service payload is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The enrichment service answered with a non-success status
    #[error("enrichment service returned {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, or the reason phrase if the body is empty
        message: String,
    },
    /// Transport error while talking to the enrichment service
    #[error("http error")]
    Http(#[from] reqwest::Error),
    /// The service sent JSON that does not match the expected layout
    #[error("unable to decode JSON")]
    Json(#[from] serde_json::Error),
    /// Reading or writing a delimited table failed
    #[error("csv error")]
    Csv(#[from] csv::Error),
    /// Creating the output directory or a file failed
    #[error("io error")]
    Io(#[from] std::io::Error),
    /// Drawing the dot plot failed
    #[error("unable to draw plot: {0}")]
    Plot(String),
    /// Encoding the PNG failed
    #[error("unable to encode image")]
    Image(#[from] image::ImageError),
}

/// Shortcut for `Result<T, OraError>`
pub type OraResult<T> = Result<T, OraError>;

/// Converts a count into `f64` for plot arithmetic
///
/// Counts in this crate are bounded by the number of genes
/// in a single Enrichr term and never exceed `u32::MAX`.
fn f64_from_usize(n: usize) -> f64 {
    let intermediate: u32 = n.try_into().unwrap_or(u32::MAX);
    intermediate.into()
}
