/// Profile HMM workflows built on MUSCLE and HMMER: build, self-check and scan reports
use crate::bio::fasta::to_fasta_string;
use crate::bio::record::ProteinRecord;
use crate::bio::sequence::{accession_of, Sequence};
use crate::tools::hmmer::{HmmBuild, HmmHit};
use crate::tools::muscle::Muscle;
use crate::{Result, TerpenomeError};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Accession list file: one accession per line, blank lines ignored
pub fn read_accession_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Profile name for an accession list: the file stem
pub fn hmm_name(list_path: &Path) -> Result<String> {
    list_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            TerpenomeError::InvalidInput(format!(
                "Cannot derive an HMM name from {}",
                list_path.display()
            ))
        })
}

/// Accession without domain split markers (`C-`/`N-` prefixes)
pub fn base_accession(accession: &str) -> &str {
    let mut base = accession;
    while let Some(rest) = base.strip_prefix("C-").or_else(|| base.strip_prefix("N-")) {
        base = rest;
    }
    base
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub built: usize,
    pub skipped: usize,
}

pub struct HmmBuilder {
    muscle: Muscle,
    hmmbuild: HmmBuild,
    hmm_dir: PathBuf,
    leave_one_out: bool,
}

impl HmmBuilder {
    pub fn new(muscle: Muscle, hmmbuild: HmmBuild, hmm_dir: PathBuf, leave_one_out: bool) -> Self {
        Self {
            muscle,
            hmmbuild,
            hmm_dir,
            leave_one_out,
        }
    }

    pub fn hmm_path(&self, name: &str) -> PathBuf {
        self.hmm_dir.join(format!("{}.hmm", name))
    }

    /// Build the profile for one accession list, plus leave-one-out profiles if enabled
    pub fn build_from_list(&self, list_path: &Path, sequences: &[Sequence]) -> Result<BuildReport> {
        let name = hmm_name(list_path)?;
        let accessions = read_accession_list(list_path)?;

        let members: Vec<Sequence> = accessions
            .iter()
            .filter_map(|accession| {
                let found = sequences
                    .iter()
                    .find(|seq| seq.id == *accession || seq.accession() == accession.as_str());
                if found.is_none() {
                    tracing::warn!("{}: accession {} not found in sequences", name, accession);
                }
                found.cloned()
            })
            .collect();

        let mut report = BuildReport::default();
        self.build_one(&name, &members, &mut report)?;

        if self.leave_one_out {
            let bases: BTreeSet<&str> = accessions.iter().map(|a| base_accession(a)).collect();
            for base in bases {
                let remaining: Vec<Sequence> = members
                    .iter()
                    .filter(|seq| !seq.accession().ends_with(base))
                    .cloned()
                    .collect();
                self.build_one(&format!("{}_{}", name, base), &remaining, &mut report)?;
            }
        }
        Ok(report)
    }

    fn build_one(
        &self,
        name: &str,
        sequences: &[Sequence],
        report: &mut BuildReport,
    ) -> Result<()> {
        let hmm_file = self.hmm_path(name);
        if hmm_file.exists() {
            tracing::info!("Skipping {}, file already exists at {}", name, hmm_file.display());
            report.skipped += 1;
            return Ok(());
        }
        if sequences.is_empty() {
            tracing::warn!("Skipping {}, no sequences", name);
            report.skipped += 1;
            return Ok(());
        }

        let alignment = self.muscle.align(sequences)?;
        tracing::info!(
            "Writing hmm {} based on {} sequences to {}",
            name,
            sequences.len(),
            hmm_file.display()
        );
        self.hmmbuild
            .build(name, &to_fasta_string(&alignment), &hmm_file)?;
        report.built += 1;
        Ok(())
    }
}

/// In-group accessions of one profile
#[derive(Debug, Clone)]
pub struct HmmGroup {
    pub name: String,
    pub ingroup: BTreeSet<String>,
}

impl HmmGroup {
    /// Read a group from an accession list; every accession must be among `known`
    pub fn from_list(list_path: &Path, known: &BTreeSet<String>) -> Result<Self> {
        let name = hmm_name(list_path)?;
        let mut ingroup = BTreeSet::new();
        for accession in read_accession_list(list_path)? {
            let base = base_accession(&accession).to_string();
            if !known.contains(&base) {
                return Err(TerpenomeError::InvalidInput(format!(
                    "Accession {} in {} is not present in the sequences",
                    base,
                    list_path.display()
                )));
            }
            ingroup.insert(base);
        }
        Ok(Self { name, ingroup })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HmmScore {
    pub hmm_profile: String,
    pub accession: String,
    pub score: f64,
    pub ingroup: bool,
}

/// Best bitscore per (profile, accession) pair
fn best_scores(hits: &[HmmHit]) -> HashMap<(String, String), f64> {
    let mut best: HashMap<(String, String), f64> = HashMap::new();
    for hit in hits {
        let key = (hit.hmm.clone(), accession_of(&hit.query).to_string());
        let entry = best.entry(key).or_insert(f64::NEG_INFINITY);
        *entry = entry.max(hit.bitscore);
    }
    best
}

/// Score every accession against each profile. In-group members are scored against
/// the profile built without them (`<hmm>_<accession>`), others against the full profile.
/// Missing hits score 0.
pub fn score_groups(
    hits: &[HmmHit],
    groups: &[HmmGroup],
    accessions: &BTreeSet<String>,
) -> Vec<HmmScore> {
    let best = best_scores(hits);
    let lookup = |hmm: String, accession: &str| -> f64 {
        best.get(&(hmm, accession.to_string())).copied().unwrap_or(0.0)
    };

    let mut scores = Vec::new();
    for group in groups {
        for accession in &group.ingroup {
            scores.push(HmmScore {
                hmm_profile: group.name.clone(),
                accession: accession.clone(),
                score: lookup(format!("{}_{}", group.name, accession), accession),
                ingroup: true,
            });
        }
        for accession in accessions.difference(&group.ingroup) {
            scores.push(HmmScore {
                hmm_profile: group.name.clone(),
                accession: accession.clone(),
                score: lookup(group.name.clone(), accession),
                ingroup: false,
            });
        }
    }
    scores
}

pub fn write_scores_tsv<W: Write>(writer: W, scores: &[HmmScore]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record(["hmm_profile", "accession", "score", "ingroup"])?;
    for score in scores {
        writer.write_record([
            score.hmm_profile.clone(),
            score.accession.clone(),
            score.score.to_string(),
            score.ingroup.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-profile trusted cutoffs from an antiSMASH `hmmdetails.txt`
/// (tab separated: name, description, cutoff, file)
pub fn load_hmm_details<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, f64>> {
    let content = std::fs::read_to_string(path)?;
    let mut cutoffs = IndexMap::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 3 {
            tracing::warn!("hmmdetails line {} has {} columns, skipping", i + 1, columns.len());
            continue;
        }
        let cutoff = columns[2].trim().parse::<f64>().map_err(|_| {
            TerpenomeError::Parse(format!(
                "hmmdetails line {}: invalid cutoff '{}'",
                i + 1,
                columns[2]
            ))
        })?;
        cutoffs.insert(columns[0].trim().to_string(), cutoff);
    }
    Ok(cutoffs)
}

/// Write scan hits as TSV, optionally with cutoff significance and record metadata
pub fn write_scan_tsv<W: Write>(
    writer: W,
    hits: &[HmmHit],
    cutoffs: Option<&IndexMap<String, f64>>,
    records: Option<&HashMap<String, ProteinRecord>>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

    let mut header = vec!["query_id", "id", "evalue", "bitscore", "bias"];
    if cutoffs.is_some() {
        header.extend(["cutoff_score", "significant"]);
    }
    if records.is_some() {
        header.extend([
            "protein_name",
            "enzyme_types",
            "organism_name",
            "organism_division",
            "reviewed",
        ]);
    }
    writer.write_record(&header)?;

    for hit in hits {
        let query_id = accession_of(&hit.query);
        let mut row = vec![
            query_id.to_string(),
            hit.hmm.clone(),
            hit.evalue.to_string(),
            hit.bitscore.to_string(),
            hit.bias.to_string(),
        ];
        if let Some(cutoffs) = cutoffs {
            match cutoffs.get(&hit.hmm) {
                Some(cutoff) => {
                    row.push(cutoff.to_string());
                    row.push((hit.bitscore >= *cutoff).to_string());
                }
                None => {
                    row.push(String::new());
                    row.push(false.to_string());
                }
            }
        }
        if let Some(records) = records {
            match records.get(query_id) {
                Some(record) => {
                    row.push(record.protein_name().to_string());
                    row.push(
                        record
                            .enzyme_types()
                            .iter()
                            .map(String::as_str)
                            .collect::<Vec<_>>()
                            .join(crate::report::table::LABEL_SEPARATOR),
                    );
                    row.push(record.organism_name().to_string());
                    row.push(
                        record
                            .organism_division()
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    );
                    row.push(record.reviewed().map(|r| r.to_string()).unwrap_or_default());
                }
                None => {
                    tracing::warn!("No record document for hit query {}", query_id);
                    row.extend(std::iter::repeat(String::new()).take(5));
                }
            }
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
