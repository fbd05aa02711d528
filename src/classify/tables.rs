/// Enzyme family tables: family key to exemplar terms, in priority order
use crate::{Result, TerpenomeError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One family entry as written in a table file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEntry {
    pub family: String,
    pub exemplars: Vec<String>,
}

/// Table file layout. Arrays of tables keep the family order explicit.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableFile {
    #[serde(default)]
    terpene: Vec<FamilyEntry>,
    #[serde(default)]
    prenyltransferase: Vec<FamilyEntry>,
}

/// Immutable after construction; shared by reference with the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnzymeTables {
    terpene: IndexMap<String, Vec<String>>,
    prenyltransferase: IndexMap<String, Vec<String>>,
}

fn table(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(family, exemplars)| {
            (
                family.to_string(),
                exemplars.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect()
}

fn into_table(kind: &str, entries: Vec<FamilyEntry>) -> Result<IndexMap<String, Vec<String>>> {
    let mut table = IndexMap::new();
    for entry in entries {
        let family = entry.family.trim().to_string();
        if family.is_empty() {
            return Err(TerpenomeError::Config(format!("Empty {} family name", kind)));
        }
        let exemplars: Vec<String> = entry
            .exemplars
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if exemplars.is_empty() {
            return Err(TerpenomeError::Config(format!(
                "{} family '{}' has no exemplars",
                kind, family
            )));
        }
        if table.insert(family.clone(), exemplars).is_some() {
            return Err(TerpenomeError::Config(format!(
                "Duplicate {} family '{}'",
                kind, family
            )));
        }
    }
    Ok(table)
}

impl EnzymeTables {
    pub fn new(
        terpene: IndexMap<String, Vec<String>>,
        prenyltransferase: IndexMap<String, Vec<String>>,
    ) -> Self {
        Self {
            terpene,
            prenyltransferase,
        }
    }

    /// Load tables from a TOML file with `[[terpene]]` and `[[prenyltransferase]]` entries
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file: TableFile = toml::from_str(&content).map_err(|e| {
            TerpenomeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let tables = Self::new(
            into_table("terpene", file.terpene)?,
            into_table("prenyltransferase", file.prenyltransferase)?,
        );
        tracing::info!(
            "Loaded {} terpene and {} prenyltransferase families from {}",
            tables.terpene.len(),
            tables.prenyltransferase.len(),
            path.display()
        );
        Ok(tables)
    }

    pub fn to_toml(&self) -> Result<String> {
        let entries = |table: &IndexMap<String, Vec<String>>| {
            table
                .iter()
                .map(|(family, exemplars)| FamilyEntry {
                    family: family.clone(),
                    exemplars: exemplars.clone(),
                })
                .collect()
        };
        let file = TableFile {
            terpene: entries(&self.terpene),
            prenyltransferase: entries(&self.prenyltransferase),
        };
        toml::to_string_pretty(&file).map_err(|e| TerpenomeError::Serialization(e.to_string()))
    }

    pub fn terpene(&self) -> &IndexMap<String, Vec<String>> {
        &self.terpene
    }

    pub fn prenyltransferase(&self) -> &IndexMap<String, Vec<String>> {
        &self.prenyltransferase
    }
}

impl Default for EnzymeTables {
    fn default() -> Self {
        let terpene = table(&[
            ("monoterpene", &["monoterpene", "iridoid", "methylisoborneol", "cineole"]),
            (
                "sesquiterpene",
                &[
                    "sesquiterpene",
                    "sesquiterpenoid",
                    "trichodiene",
                    "trichodience",
                    "protoilludene",
                    "aristolochene",
                    "guaiadiene",
                    "germacrene",
                    "farnesene",
                    "viridiflorene",
                    "cuprenene",
                    "muurolene",
                    "longiborneol",
                    "presilphiperfolanol",
                    "eremophilene",
                    "cadinene",
                    "santalene",
                    "isozizaene",
                    "pentalenene",
                    "pristinol",
                    "isoafricanol",
                    "muurolol",
                    "cubebol",
                    "caryolanol",
                    "selinadiene",
                    "linalool",
                    "eudesmol",
                    "amorphene",
                    "corvol ether",
                    "germacradienol",
                    "caryophyllene",
                    "avermitilol",
                ],
            ),
            (
                "diterpene",
                &[
                    "diterpene",
                    "variediene",
                    "fusicoccadiene",
                    "conidiogenone",
                    "araneosene",
                    "kaurene",
                    "phomopsene",
                    "dolastadiene",
                    "aphidicolanol",
                    "paxilline",
                    "BcPAX1",
                    "copalyl diphosphate",
                    "gibberellin",
                    "phyllocladanol",
                    "labdatriene",
                    "cyclooctatenol",
                    "tsukubadiene",
                    "spiroviolene",
                    "pimaradiene",
                    "terpentetriene",
                ],
            ),
            (
                "sesterterpene",
                &[
                    "sesterterpene",
                    "ophiobolin",
                    "preasperterpenoid",
                    "preaspterpenacid",
                    "stellatatriene",
                    "astellifadiene",
                    "quiannulatene",
                    "sesterbrasiliatriene",
                    "sesterfisherol",
                    "preterpestacin",
                    "aspergildiene",
                    "fusoxypene",
                ],
            ),
            ("triterpene", &["triterpene", "macrophomene", "talaropentaene"]),
            ("tetraterpene", &["tetraterpene", "lycopene"]),
        ]);

        let prenyltransferase = table(&[
            (
                "FPP",
                &[
                    "FPP",
                    "farnesyl pyrophosphate",
                    "farnesyl diphosphate",
                    "dimethylallyltranstransferase",
                    "ERG20",
                    "geranyltranstransferase",
                ],
            ),
            (
                "GGPP",
                &[
                    "GGPP",
                    "geranyl geranyl pyrophosphate",
                    "geranyl geranyl diphosphate",
                    "BTS1",
                    "farnesyltranstransferase",
                ],
            ),
            ("diapophytoene", &["diapophytoene"]),
            ("phytoene", &["phytoene"]),
            ("presqualene PP", &["presqualene diphosphate"]),
            ("hydroxysqualene", &["hydroxysqualene"]),
            ("squalene", &["squalene", "ERG9"]),
            (
                "HPP",
                &[
                    "HPP",
                    "hexaprenyl pyrophosphate",
                    "hexaprenyl diphosphate",
                    "COQ1",
                ],
            ),
        ]);

        Self::new(terpene, prenyltransferase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_prenyltransferase_order() {
        let tables = EnzymeTables::default();
        let families: Vec<&str> = tables.prenyltransferase().keys().map(String::as_str).collect();
        assert_eq!(
            families,
            vec![
                "FPP",
                "GGPP",
                "diapophytoene",
                "phytoene",
                "presqualene PP",
                "hydroxysqualene",
                "squalene",
                "HPP"
            ]
        );
        assert_eq!(tables.terpene().len(), 6);
    }

    #[test]
    fn test_table_file_round_trip() {
        let tables = EnzymeTables::default();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(tables.to_toml().unwrap().as_bytes()).unwrap();

        let loaded = EnzymeTables::from_file(file.path()).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn test_table_file_rejects_empty_family() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[terpene]]\nfamily = \"monoterpene\"\nexemplars = []").unwrap();
        assert!(matches!(
            EnzymeTables::from_file(file.path()),
            Err(TerpenomeError::Config(_))
        ));
    }
}
