//! Blocking client for the Enrichr REST API
//!
//! An analysis consists of one upload of the gene list (`addList`) and one
//! download of the result table (`export`) per gene-set library. All calls
//! are blocking and are never retried.
//!
//! ```no_run
//! use go_ora::{EnrichmentRequest, EnrichmentService, Enrichr};
//!
//! let enrichr = Enrichr::new().unwrap();
//! let request = EnrichmentRequest::go_2021(&["COX4I2", "ND1", "ATP6"], 0.05);
//! let table = enrichr.enrich(&request).unwrap();
//! println!("{} significant terms", table.len());
//! ```
use reqwest::blocking::{multipart::Form, Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::enrichment::{Enrichment, EnrichmentTable};
use crate::library::{GeneSetLibrary, Organism};
use crate::service::{EnrichmentRequest, EnrichmentService};
use crate::{OraError, OraResult};

const USER_AGENT: &str = concat!("go-ora/", env!("CARGO_PKG_VERSION"));
const LIST_DESCRIPTION: &str = "go_ora";
const EXPORT_FILENAME: &str = "enrichr";

/// The identifiers Enrichr assigns to an uploaded gene list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserList {
    #[serde(rename = "userListId")]
    user_list_id: u64,
    #[serde(rename = "shortId")]
    short_id: String,
}

impl UserList {
    /// The numeric id used to query results
    pub fn user_list_id(&self) -> u64 {
        self.user_list_id
    }

    /// The short id used in shareable Enrichr links
    pub fn short_id(&self) -> &str {
        &self.short_id
    }
}

/// The Enrichr web service
///
/// The base URL is chosen from the [`Organism`] of each request,
/// unless it is overridden with [`Enrichr::with_base_url`].
#[derive(Debug, Clone)]
pub struct Enrichr {
    client: Client,
    base_url: Option<String>,
}

impl Enrichr {
    /// Constructs a new client
    ///
    /// # Errors
    ///
    /// Returns [`OraError::Http`] if the TLS backend cannot be initialized
    pub fn new() -> OraResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Constructs a new client on top of a configured `reqwest` client,
    /// e.g. with custom proxy or timeout settings
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Sends all requests to `base_url` instead of the public instance
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    fn base_url(&self, organism: Organism) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| organism.base_url())
    }

    /// Uploads the gene list
    ///
    /// # Errors
    ///
    /// - [`OraError::Http`] on transport failures
    /// - [`OraError::Service`] if Enrichr rejects the list
    /// - [`OraError::Json`] if the response cannot be decoded
    pub fn add_list(&self, organism: Organism, genes: &[&str]) -> OraResult<UserList> {
        let url = format!("{}/addList", self.base_url(organism));
        debug!("Uploading {} genes to {}", genes.len(), url);
        let form = Form::new()
            .text("list", genes.join("\n"))
            .text("description", LIST_DESCRIPTION);
        let response = ensure_success(self.client.post(url).multipart(form).send()?)?;
        parse_user_list(&response.text()?)
    }

    /// Downloads the enrichment table of `list` for a single library
    ///
    /// The table is not filtered, it contains every term with at least
    /// one overlapping gene.
    ///
    /// # Errors
    ///
    /// - [`OraError::Http`] on transport failures
    /// - [`OraError::Service`] if Enrichr answers with an error status
    /// - [`OraError::Csv`] if the table cannot be parsed
    pub fn export(
        &self,
        organism: Organism,
        list: &UserList,
        library: &GeneSetLibrary,
    ) -> OraResult<EnrichmentTable> {
        let url = format!("{}/export", self.base_url(organism));
        debug!("Downloading {} results for list {}", library, list.user_list_id);
        let response = self
            .client
            .get(url)
            .query(&[
                ("userListId", list.user_list_id.to_string()),
                ("filename", EXPORT_FILENAME.to_string()),
                ("backgroundType", library.name().to_string()),
            ])
            .send()?;
        let response = ensure_success(response)?;
        parse_export(&response.text()?, library)
    }
}

impl EnrichmentService for Enrichr {
    fn enrich(&self, request: &EnrichmentRequest) -> OraResult<EnrichmentTable> {
        let genes = clean_gene_list(request.genes())?;
        let list = self.add_list(request.organism(), &genes)?;
        debug!(
            "Enrichr list {} ({}) created",
            list.user_list_id, list.short_id
        );

        let mut table = EnrichmentTable::default();
        for library in request.libraries() {
            for record in self.export(request.organism(), &list, library)? {
                table.push(record);
            }
        }
        let total = table.len();
        table.retain_significant(request.cutoff());
        debug!(
            "{} of {} terms pass the cutoff {}",
            table.len(),
            total,
            request.cutoff()
        );
        Ok(table)
    }
}

/// Trims all symbols and drops blank ones
///
/// # Errors
///
/// Returns [`OraError::InvalidInput`] if no symbol remains
fn clean_gene_list(genes: &[String]) -> OraResult<Vec<&str>> {
    let genes: Vec<&str> = genes
        .iter()
        .map(|gene| gene.trim())
        .filter(|gene| !gene.is_empty())
        .collect();
    if genes.is_empty() {
        return Err(OraError::InvalidInput(
            "the gene list must contain at least one gene symbol".to_string(),
        ));
    }
    Ok(genes)
}

fn ensure_success(response: Response) -> OraResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("unknown").to_string(),
        text => text.to_string(),
    };
    Err(OraError::Service {
        status: status.as_u16(),
        message,
    })
}

/// Parses the JSON response of `addList`
fn parse_user_list(body: &str) -> OraResult<UserList> {
    Ok(serde_json::from_str(body)?)
}

/// Parses the tab-separated result table of `export`
///
/// Every record is tagged with the `library` it was requested for.
fn parse_export(body: &str, library: &GeneSetLibrary) -> OraResult<EnrichmentTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let mut table = EnrichmentTable::default();
    for record in reader.deserialize::<Enrichment>() {
        let mut record = record?;
        record.set_gene_set(library.name());
        table.push(record);
    }
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;

    const EXPORT: &str = "Term\tOverlap\tP-value\tAdjusted P-value\tOld P-value\tOld Adjusted P-value\tOdds Ratio\tCombined Score\tGenes
mitochondrial electron transport, cytochrome c to oxygen (GO:0006123)\t1/13\t6.499e-4\t0.0128\t0\t0\t2220.5\t16283.7\tCOX4I2
mitochondrial ATP synthesis coupled electron transport (GO:0042775)\t2/90\t0.0021\t0.0210\t0\t0\t499.2\t3079.4\tCOX4I2;ND1
cellular respiration (GO:0045333)\t1/120\t0.0592\t0.2120\t\t\t17.8\t50.3\tATP6
";

    #[test]
    fn parse_export_table() {
        let table = parse_export(EXPORT, &GeneSetLibrary::GoBiologicalProcess2021).unwrap();
        assert_eq!(table.len(), 3);

        let first = &table.records()[0];
        assert_eq!(first.gene_set(), "GO_Biological_Process_2021");
        assert_eq!(
            first.term(),
            "mitochondrial electron transport, cytochrome c to oxygen (GO:0006123)"
        );
        assert_eq!(first.overlap(), "1/13");
        assert_eq!(first.adjusted_pvalue(), 0.0128);
        assert_eq!(first.old_pvalue(), Some(0.0));
        assert_eq!(first.odds_ratio(), 2220.5);

        let second = &table.records()[1];
        assert_eq!(second.gene_count(), 2);

        let third = &table.records()[2];
        assert_eq!(third.old_pvalue(), None);
        assert_eq!(third.old_adjusted_pvalue(), None);
    }

    #[test]
    fn parse_export_header_only() {
        let header = EXPORT.lines().next().unwrap();
        let table = parse_export(header, &GeneSetLibrary::GoCellularComponent2021).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn parse_export_keeps_quotes() {
        let header = EXPORT.lines().next().unwrap();
        let body = format!(
            "{header}\n\"de novo\" protein folding (GO:0006458)\t1/30\t0.001\t0.01\t0\t0\t12.5\t80.1\tND1\nheme \"a\" biosynthesis (GO:0006784)\t1/6\t0.002\t0.02\t0\t0\t30.2\t90.4\tCOX4I2\n"
        );
        let table = parse_export(&body, &GeneSetLibrary::GoBiologicalProcess2021).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records()[0].term(),
            "\"de novo\" protein folding (GO:0006458)"
        );
        assert_eq!(table.records()[1].term(), "heme \"a\" biosynthesis (GO:0006784)");
        assert_eq!(table.records()[1].genes_raw(), "COX4I2");
    }

    #[test]
    fn parse_export_invalid_number() {
        let body = "Term\tOverlap\tP-value\tAdjusted P-value\tOld P-value\tOld Adjusted P-value\tOdds Ratio\tCombined Score\tGenes
x\t1/2\tnot-a-number\t0.1\t0\t0\t1\t1\tA
";
        let res = parse_export(body, &GeneSetLibrary::GoCellularComponent2021);
        assert!(matches!(res, Err(OraError::Csv(_))));
    }

    #[test]
    fn parse_add_list_response() {
        let list = parse_user_list(r#"{"shortId": "3b1c9a5f", "userListId": 70193840}"#).unwrap();
        assert_eq!(list.user_list_id(), 70_193_840);
        assert_eq!(list.short_id(), "3b1c9a5f");

        assert!(matches!(
            parse_user_list("<html>Bad gateway</html>"),
            Err(OraError::Json(_))
        ));
    }

    #[test]
    fn gene_list_is_cleaned() {
        let genes = vec![" ND1 ".to_string(), String::new(), "ATP6".to_string()];
        assert_eq!(clean_gene_list(&genes).unwrap(), vec!["ND1", "ATP6"]);
    }

    #[test]
    fn empty_gene_list_is_rejected_before_any_request() {
        let enrichr = Enrichr::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let request = EnrichmentRequest::go_2021(&["  ", ""], 0.05);
        assert!(matches!(
            enrichr.enrich(&request),
            Err(OraError::InvalidInput(_))
        ));
    }

    #[test]
    fn base_url_override() {
        let enrichr = Enrichr::new().unwrap();
        assert_eq!(
            enrichr.base_url(Organism::Human),
            "https://maayanlab.cloud/Enrichr"
        );
        let enrichr = enrichr.with_base_url("http://localhost:8080/Enrichr/");
        assert_eq!(
            enrichr.base_url(Organism::Fly),
            "http://localhost:8080/Enrichr"
        );
    }
}
