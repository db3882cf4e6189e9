//! Enrichr gene-set libraries and organisms
use std::fmt::Display;
use std::str::FromStr;

use crate::OraError;

/// A gene-set library hosted by Enrichr
///
/// The three Gene Ontology 2021 snapshots are used by default.
/// Any other library can be referenced by name via [`GeneSetLibrary::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeneSetLibrary {
    /// `GO_Biological_Process_2021`
    GoBiologicalProcess2021,
    /// `GO_Molecular_Function_2021`
    GoMolecularFunction2021,
    /// `GO_Cellular_Component_2021`
    GoCellularComponent2021,
    /// Any other library, by its Enrichr name
    Other(String),
}

impl GeneSetLibrary {
    /// The three GO 2021 libraries: biological process, molecular function
    /// and cellular component, in that order
    pub fn go_2021() -> Vec<GeneSetLibrary> {
        vec![
            GeneSetLibrary::GoBiologicalProcess2021,
            GeneSetLibrary::GoMolecularFunction2021,
            GeneSetLibrary::GoCellularComponent2021,
        ]
    }

    /// The library name as Enrichr expects it in `backgroundType`
    pub fn name(&self) -> &str {
        match self {
            GeneSetLibrary::GoBiologicalProcess2021 => "GO_Biological_Process_2021",
            GeneSetLibrary::GoMolecularFunction2021 => "GO_Molecular_Function_2021",
            GeneSetLibrary::GoCellularComponent2021 => "GO_Cellular_Component_2021",
            GeneSetLibrary::Other(name) => name,
        }
    }
}

impl From<&str> for GeneSetLibrary {
    fn from(name: &str) -> Self {
        match name {
            "GO_Biological_Process_2021" => GeneSetLibrary::GoBiologicalProcess2021,
            "GO_Molecular_Function_2021" => GeneSetLibrary::GoMolecularFunction2021,
            "GO_Cellular_Component_2021" => GeneSetLibrary::GoCellularComponent2021,
            other => GeneSetLibrary::Other(other.to_string()),
        }
    }
}

impl Display for GeneSetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Organisms supported by the Enrichr family of services
///
/// Human and mouse share the main Enrichr instance, the model organisms
/// have their own deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Organism {
    /// Homo sapiens
    #[default]
    Human,
    /// Mus musculus
    Mouse,
    /// Drosophila melanogaster
    Fly,
    /// Saccharomyces cerevisiae
    Yeast,
    /// Caenorhabditis elegans
    Worm,
    /// Danio rerio
    Fish,
}

impl Organism {
    /// Base URL of the Enrichr deployment that serves this organism
    pub fn base_url(&self) -> &'static str {
        match self {
            Organism::Human | Organism::Mouse => "https://maayanlab.cloud/Enrichr",
            Organism::Fly => "https://maayanlab.cloud/FlyEnrichr",
            Organism::Yeast => "https://maayanlab.cloud/YeastEnrichr",
            Organism::Worm => "https://maayanlab.cloud/WormEnrichr",
            Organism::Fish => "https://maayanlab.cloud/FishEnrichr",
        }
    }
}

impl FromStr for Organism {
    type Err = OraError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "hs" | "hsapiens" => Ok(Organism::Human),
            "mouse" | "mm" | "mmusculus" => Ok(Organism::Mouse),
            "fly" | "dm" | "dmelanogaster" => Ok(Organism::Fly),
            "yeast" | "sc" | "scerevisiae" => Ok(Organism::Yeast),
            "worm" | "ce" | "celegans" => Ok(Organism::Worm),
            "fish" | "dr" | "drerio" => Ok(Organism::Fish),
            _ => Err(OraError::InvalidInput(format!("unknown organism: {s}"))),
        }
    }
}

impl Display for Organism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Organism::Human => "Human",
            Organism::Mouse => "Mouse",
            Organism::Fly => "Fly",
            Organism::Yeast => "Yeast",
            Organism::Worm => "Worm",
            Organism::Fish => "Fish",
        };
        write!(f, "{name}")
    }
}
