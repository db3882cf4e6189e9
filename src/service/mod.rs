//! The boundary to the external enrichment service
//!
//! The enrichment statistics are never computed locally. An [`EnrichmentService`]
//! receives an [`EnrichmentRequest`] and returns the already filtered
//! [`EnrichmentTable`]. [`Enrichr`] is the production implementation, custom
//! implementations can replace it, e.g. for offline analyses or tests.
//!
//! [`Enrichr`]: enrichr::Enrichr
use crate::enrichment::EnrichmentTable;
use crate::library::{GeneSetLibrary, Organism};
use crate::OraResult;

pub mod enrichr;

/// All information the service needs for an over-representation analysis
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    genes: Vec<String>,
    libraries: Vec<GeneSetLibrary>,
    organism: Organism,
    cutoff: f64,
}

impl EnrichmentRequest {
    /// Constructs a new request
    pub fn new<S: AsRef<str>>(
        genes: &[S],
        libraries: Vec<GeneSetLibrary>,
        organism: Organism,
        cutoff: f64,
    ) -> Self {
        Self {
            genes: genes.iter().map(|gene| gene.as_ref().to_string()).collect(),
            libraries,
            organism,
            cutoff,
        }
    }

    /// Constructs a request against the three GO 2021 libraries for human genes
    ///
    /// # Examples
    ///
    /// ```
    /// use go_ora::{EnrichmentRequest, GeneSetLibrary, Organism};
    ///
    /// let request = EnrichmentRequest::go_2021(&["COX4I2", "ND1", "ATP6"], 0.05);
    /// assert_eq!(request.genes().len(), 3);
    /// assert_eq!(request.libraries(), GeneSetLibrary::go_2021().as_slice());
    /// assert_eq!(request.organism(), Organism::Human);
    /// ```
    pub fn go_2021<S: AsRef<str>>(genes: &[S], cutoff: f64) -> Self {
        Self::new(genes, GeneSetLibrary::go_2021(), Organism::Human, cutoff)
    }

    /// The submitted gene symbols, unmodified
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// The gene-set libraries to test against
    pub fn libraries(&self) -> &[GeneSetLibrary] {
        &self.libraries
    }

    /// The organism of the gene symbols
    pub fn organism(&self) -> Organism {
        self.organism
    }

    /// Maximum adjusted p-value of a returned term
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

/// Trait for services that perform the over-representation analysis
///
/// Implementations must only return terms with an adjusted p-value
/// of at most [`EnrichmentRequest::cutoff`].
/// Every error is returned to the caller as is, the analysis does
/// not retry or recover.
pub trait EnrichmentService {
    /// Runs the enrichment analysis and returns the significant terms
    ///
    /// # Errors
    ///
    /// Implementation specific: invalid gene lists, transport failures
    /// or errors reported by the service
    fn enrich(&self, request: &EnrichmentRequest) -> OraResult<EnrichmentTable>;
}

impl<T: EnrichmentService + ?Sized> EnrichmentService for &T {
    fn enrich(&self, request: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
        (**self).enrich(request)
    }
}

impl<T: EnrichmentService + ?Sized> EnrichmentService for Box<T> {
    fn enrich(&self, request: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
        (**self).enrich(request)
    }
}
