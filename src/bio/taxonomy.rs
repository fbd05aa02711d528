/// Taxonomy lookup and division assignment for protein records
use crate::{Result, TerpenomeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse taxonomic group used to colour and filter records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    Basidiomycota,
    Ascomycota,
    Bacteria,
    Viridiplantae,
    Other,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Basidiomycota => "Basidiomycota",
            Division::Ascomycota => "Ascomycota",
            Division::Bacteria => "Bacteria",
            Division::Viridiplantae => "Viridiplantae",
            Division::Other => "Other",
        }
    }

    /// Assign a division from lineage names (e.g. a GenBank `taxonomy` annotation).
    /// Checks run in the order of `rules`, matching each rule's division by name.
    pub fn from_lineage_names<S: AsRef<str>>(lineage: &[S], rules: &[DivisionRule]) -> Division {
        rules
            .iter()
            .map(|rule| rule.division)
            .find(|division| {
                lineage
                    .iter()
                    .any(|name| name.as_ref().trim().eq_ignore_ascii_case(division.as_str()))
            })
            .unwrap_or(Division::Other)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Division {
    type Err = TerpenomeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basidiomycota" => Ok(Division::Basidiomycota),
            "ascomycota" => Ok(Division::Ascomycota),
            "bacteria" => Ok(Division::Bacteria),
            "viridiplantae" => Ok(Division::Viridiplantae),
            "other" => Ok(Division::Other),
            _ => Err(TerpenomeError::Parse(format!("Unknown division: {}", s))),
        }
    }
}

/// Lineage membership test: a taxon under `taxon_id` belongs to `division`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionRule {
    pub taxon_id: u32,
    pub division: Division,
}

impl DivisionRule {
    pub fn new(taxon_id: u32, division: Division) -> Self {
        Self { taxon_id, division }
    }
}

/// Rules in priority order; the first rule whose taxon is in the lineage wins
pub fn default_division_rules() -> Vec<DivisionRule> {
    vec![
        DivisionRule::new(5204, Division::Basidiomycota),
        DivisionRule::new(4890, Division::Ascomycota),
        DivisionRule::new(2, Division::Bacteria),
        DivisionRule::new(33090, Division::Viridiplantae),
    ]
}

/// Source of scientific names and ancestor chains
pub trait TaxonomyLookup {
    fn scientific_name(&self, taxon_id: u32) -> Result<String>;

    /// Ancestor chain from the root down to `taxon_id` (inclusive)
    fn lineage(&self, taxon_id: u32) -> Result<Vec<u32>>;
}

impl<T: TaxonomyLookup + ?Sized> TaxonomyLookup for &T {
    fn scientific_name(&self, taxon_id: u32) -> Result<String> {
        (**self).scientific_name(taxon_id)
    }

    fn lineage(&self, taxon_id: u32) -> Result<Vec<u32>> {
        (**self).lineage(taxon_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyInfo {
    pub taxon_id: u32,
    pub scientific_name: String,
    pub rank: String,
    pub parent_id: Option<u32>,
}

#[derive(Debug, Default)]
pub struct TaxonomyDB {
    taxa: HashMap<u32, TaxonomyInfo>,
}

impl TaxonomyDB {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_taxon(&mut self, info: TaxonomyInfo) {
        self.taxa.insert(info.taxon_id, info);
    }

    pub fn get_taxon(&self, taxon_id: u32) -> Option<&TaxonomyInfo> {
        self.taxa.get(&taxon_id)
    }

    pub fn taxa_count(&self) -> usize {
        self.taxa.len()
    }
}

impl TaxonomyLookup for TaxonomyDB {
    fn scientific_name(&self, taxon_id: u32) -> Result<String> {
        self.get_taxon(taxon_id)
            .map(|info| info.scientific_name.clone())
            .ok_or(TerpenomeError::TaxonNotFound(taxon_id))
    }

    fn lineage(&self, taxon_id: u32) -> Result<Vec<u32>> {
        if !self.taxa.contains_key(&taxon_id) {
            return Err(TerpenomeError::TaxonNotFound(taxon_id));
        }

        let mut lineage = Vec::new();
        let mut current_id = Some(taxon_id);

        while let Some(id) = current_id {
            // A malformed dump can contain parent cycles
            if lineage.contains(&id) {
                tracing::warn!("Cycle in taxonomy at node {} while resolving {}", id, taxon_id);
                break;
            }
            lineage.push(id);
            current_id = self.taxa.get(&id).and_then(|t| t.parent_id);
        }

        lineage.reverse();
        Ok(lineage)
    }
}

/// Parse NCBI taxonomy dump files
pub mod ncbi {
    use super::*;
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    pub fn load_names<P: AsRef<Path>>(path: P) -> Result<HashMap<u32, String>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut names = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let parts: Vec<&str> = line.split("\t|\t").collect();

            if parts.len() >= 4 && parts[3].trim_end_matches("\t|") == "scientific name" {
                if let Ok(taxon_id) = parts[0].parse::<u32>() {
                    names.insert(taxon_id, parts[1].to_string());
                }
            }
        }

        Ok(names)
    }

    pub fn load_nodes<P: AsRef<Path>>(path: P) -> Result<HashMap<u32, (u32, String)>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut nodes = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let parts: Vec<&str> = line.split("\t|\t").collect();

            if parts.len() >= 3 {
                if let (Ok(taxon_id), Ok(parent_id)) =
                    (parts[0].parse::<u32>(), parts[1].parse::<u32>())
                {
                    nodes.insert(taxon_id, (parent_id, parts[2].to_string()));
                }
            }
        }

        Ok(nodes)
    }

    /// Build a `TaxonomyDB` from `names.dmp` and `nodes.dmp` in `dir`
    pub fn load_taxdump<P: AsRef<Path>>(dir: P) -> Result<TaxonomyDB> {
        let dir = dir.as_ref();
        let names_path = dir.join("names.dmp");
        let nodes_path = dir.join("nodes.dmp");

        for path in [&names_path, &nodes_path] {
            if !path.exists() {
                return Err(TerpenomeError::Config(format!(
                    "Taxonomy dump file not found: {}",
                    path.display()
                )));
            }
        }

        let db = build_taxonomy_db(&names_path, &nodes_path)?;
        tracing::info!("Loaded {} taxa from {}", db.taxa_count(), dir.display());
        Ok(db)
    }

    pub fn build_taxonomy_db<P: AsRef<Path>>(names_path: P, nodes_path: P) -> Result<TaxonomyDB> {
        let names = load_names(names_path)?;
        let nodes = load_nodes(nodes_path)?;

        let mut db = TaxonomyDB::new();

        for (taxon_id, name) in names {
            if let Some((parent_id, rank)) = nodes.get(&taxon_id) {
                db.add_taxon(TaxonomyInfo {
                    taxon_id,
                    scientific_name: name,
                    rank: rank.clone(),
                    // The root is its own parent in nodes.dmp
                    parent_id: if *parent_id == taxon_id {
                        None
                    } else {
                        Some(*parent_id)
                    },
                });
            }
        }

        Ok(db)
    }
}

/// Organism name and division resolved for one taxonomy id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomicLabels {
    pub organism_name: String,
    pub division: Division,
}

/// Resolves taxonomy ids to labels with an ordered list of division rules
pub struct Annotator<L> {
    lookup: L,
    rules: Vec<DivisionRule>,
}

impl<L: TaxonomyLookup> Annotator<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_rules(lookup, default_division_rules())
    }

    pub fn with_rules(lookup: L, rules: Vec<DivisionRule>) -> Self {
        Self { lookup, rules }
    }

    pub fn rules(&self) -> &[DivisionRule] {
        &self.rules
    }

    pub fn annotate(&self, taxonomy_id: u32) -> Result<TaxonomicLabels> {
        let organism_name = self.lookup.scientific_name(taxonomy_id)?;
        let lineage = self.lookup.lineage(taxonomy_id)?;
        let division = self.division_for_lineage(&lineage);

        tracing::debug!("taxon {} -> {} ({})", taxonomy_id, organism_name, division);
        Ok(TaxonomicLabels {
            organism_name,
            division,
        })
    }

    /// Rule order decides, not the depth at which a rule's taxon appears
    pub fn division_for_lineage(&self, lineage: &[u32]) -> Division {
        self.rules
            .iter()
            .find(|rule| lineage.contains(&rule.taxon_id))
            .map(|rule| rule.division)
            .unwrap_or(Division::Other)
    }
}
