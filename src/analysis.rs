//! The over-representation analysis workflow
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::enrichment::export::write_csv;
use crate::enrichment::EnrichmentTable;
use crate::plot::DotPlot;
use crate::service::enrichr::Enrichr;
use crate::service::{EnrichmentRequest, EnrichmentService};
use crate::{OraResult, CSV_FILENAME, DEFAULT_FDR_THRESHOLD, DEFAULT_OUTPUT_DIR, PLOT_FILENAME};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs a GO over-representation analysis and writes its results
///
/// `Analysis` sends the gene list to an [`EnrichmentService`], checking it
/// against `GO_Biological_Process_2021`, `GO_Molecular_Function_2021` and
/// `GO_Cellular_Component_2021` for human genes. If any term passes the
/// FDR threshold, the full table is saved as CSV and the most significant
/// terms are drawn as dot plot.
///
/// ```mermaid
/// flowchart LR
///     genes[Gene list] --> service[EnrichmentService]
///     service --> table[EnrichmentTable]
///     table -->|empty| done[Return]
///     table -->|not empty| csv[resultados_enrichr.csv]
///     csv --> top[Top 15 terms]
///     top --> png[grafico_enriquecimiento_go_dotplot.png]
///     png --> done
/// ```
///
/// Nothing is retried or recovered, the first failing step aborts the analysis.
///
/// # Examples
///
/// ```
/// use go_ora::{Analysis, EnrichmentRequest, EnrichmentService, EnrichmentTable, OraResult};
///
/// /// Returns the same table for every request
/// struct Fixed(EnrichmentTable);
///
/// impl EnrichmentService for Fixed {
///     fn enrich(&self, _: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let service = Fixed(EnrichmentTable::default());
/// let dir = std::env::temp_dir().join("go_ora_doc_analysis");
/// let analysis = Analysis::new(service).output_dir(&dir).fdr_threshold(0.01);
///
/// assert_eq!(analysis.csv_path(), dir.join("resultados_enrichr.csv"));
/// assert!(analysis.run(&["ND1"]).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Analysis<S> {
    service: S,
    output_dir: PathBuf,
    fdr_threshold: f64,
}

impl<S: EnrichmentService> Analysis<S> {
    /// Constructs a new analysis with the default output directory
    /// and FDR threshold
    pub fn new(service: S) -> Self {
        Self {
            service,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fdr_threshold: DEFAULT_FDR_THRESHOLD,
        }
    }

    /// Sets the directory for the CSV and PNG output
    ///
    /// The directory is created when the analysis runs.
    #[must_use]
    pub fn output_dir<P: AsRef<Path>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    /// Sets the maximum adjusted p-value of reported terms
    #[must_use]
    pub fn fdr_threshold(mut self, fdr_threshold: f64) -> Self {
        self.fdr_threshold = fdr_threshold;
        self
    }

    /// The path of the result table
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(CSV_FILENAME)
    }

    /// The path of the dot plot
    pub fn plot_path(&self) -> PathBuf {
        self.output_dir.join(PLOT_FILENAME)
    }

    /// Runs the analysis for `genes`
    ///
    /// Returns the full result table, or an empty table if no
    /// term is significant. Files are only written for non-empty results.
    ///
    /// # Errors
    ///
    /// - [`OraError::Io`](crate::OraError::Io) if the output directory cannot be created
    /// - any error of the [`EnrichmentService`], unchanged
    /// - errors from writing the CSV or rendering the plot
    pub fn run<G: AsRef<str>>(&self, genes: &[G]) -> OraResult<EnrichmentTable> {
        fs::create_dir_all(&self.output_dir)?;
        info!("Running ORA on {} genes", genes.len());

        let request = EnrichmentRequest::go_2021(genes, self.fdr_threshold);
        let table = self.service.enrich(&request)?;
        if table.is_empty() {
            info!("No significant GO terms found");
            return Ok(table);
        }

        let csv_path = self.csv_path();
        write_csv(&table, &csv_path)?;
        info!("Results saved to {}", csv_path.display());

        let plot_path = self.plot_path();
        DotPlot::from_table(&table).render(&plot_path)?;
        info!("Plot saved to {}", plot_path.display());

        Ok(table)
    }
}

/// Runs the analysis against the public Enrichr service
///
/// This is a shortcut for [`Analysis`] with [`Enrichr`] as service.
///
/// # Errors
///
/// See [`Analysis::run`]
pub fn run<G: AsRef<str>, P: AsRef<Path>>(
    genes: &[G],
    output_dir: P,
    fdr_threshold: f64,
) -> OraResult<EnrichmentTable> {
    Analysis::new(Enrichr::new()?)
        .output_dir(output_dir)
        .fdr_threshold(fdr_threshold)
        .run(genes)
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::*;
    use crate::enrichment::Enrichment;
    use crate::library::{GeneSetLibrary, Organism};
    use crate::OraError;

    /// Records every request and returns a fixed table
    struct Recording {
        table: EnrichmentTable,
        requests: RefCell<Vec<EnrichmentRequest>>,
    }

    impl EnrichmentService for Recording {
        fn enrich(&self, request: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self.table.clone())
        }
    }

    struct Unreachable;

    impl EnrichmentService for Unreachable {
        fn enrich(&self, _: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
            Err(OraError::Service {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        }
    }

    #[test]
    fn defaults() {
        let analysis = Analysis::new(Unreachable);
        assert_eq!(analysis.output_dir, PathBuf::from("resultados_gseapy"));
        assert_eq!(analysis.fdr_threshold, 0.05);
        assert_eq!(
            analysis.plot_path(),
            Path::new("resultados_gseapy").join("grafico_enriquecimiento_go_dotplot.png")
        );
    }

    #[test]
    fn request_uses_go_libraries() {
        let dir = tempfile::tempdir().unwrap();
        let service = Recording {
            table: EnrichmentTable::default(),
            requests: RefCell::new(Vec::new()),
        };
        let analysis = Analysis::new(&service)
            .output_dir(dir.path())
            .fdr_threshold(0.1);
        analysis.run(&["COX4I2", "ND1", "ATP6"]).unwrap();

        let requests = service.requests.borrow();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.genes(), &["COX4I2", "ND1", "ATP6"]);
        assert_eq!(request.libraries(), GeneSetLibrary::go_2021().as_slice());
        assert_eq!(request.organism(), Organism::Human);
        assert_eq!(request.cutoff(), 0.1);
    }

    #[test]
    fn empty_result_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("out");
        let service = Recording {
            table: EnrichmentTable::default(),
            requests: RefCell::new(Vec::new()),
        };
        let table = Analysis::new(service)
            .output_dir(&output)
            .run(&["ND1"])
            .unwrap();

        assert!(table.is_empty());
        assert!(output.is_dir());
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn service_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let res = Analysis::new(Unreachable)
            .output_dir(dir.path())
            .run(&["ND1"]);
        assert!(matches!(res, Err(OraError::Service { status: 503, .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn boxed_service() {
        let dir = tempfile::tempdir().unwrap();
        let service: Box<dyn EnrichmentService> = Box::new(Unreachable);
        let res = Analysis::new(service).output_dir(dir.path()).run(&["ND1"]);
        assert!(res.is_err());
    }

    #[test]
    fn csv_failure_aborts_before_plot() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        fs::create_dir_all(blocked.join(CSV_FILENAME)).unwrap();
        let service = Recording {
            table: vec![Enrichment::new("t", 0.01, "ND1")].into_iter().collect(),
            requests: RefCell::new(Vec::new()),
        };
        let res = Analysis::new(service).output_dir(&blocked).run(&["ND1"]);
        assert!(matches!(res, Err(OraError::Csv(_))));
        assert!(!blocked.join(PLOT_FILENAME).exists());
    }
}
