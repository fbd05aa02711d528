use crate::bio::fasta::parse_fasta;
use crate::cli::output::{self, tree_item};
use crate::core::Config;
use crate::tools::hmm::{
    load_hmm_details, score_groups, write_scan_tsv, write_scores_tsv, HmmBuilder, HmmGroup,
};
use crate::tools::hmmer::parse_tblout;
use crate::tools::{ExternalTool, HmmBuild, HmmScan, Muscle};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct HmmArgs {
    #[command(subcommand)]
    pub command: HmmCommands,
}

#[derive(Subcommand)]
pub enum HmmCommands {
    /// Build one profile per accession list, aligned with MUSCLE
    Build(BuildArgs),

    /// Score every sequence against every profile, in-group members leave-one-out
    Check(CheckArgs),

    /// Scan sequences and tabulate hits with cutoffs and record metadata
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Directory of accession lists, one profile per file
    #[arg(value_name = "LIST_DIR")]
    pub lists: PathBuf,

    /// FASTA file holding the listed sequences
    #[arg(value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Directory receiving the .hmm files
    #[arg(value_name = "HMM_DIR")]
    pub hmm_dir: PathBuf,

    /// Also build profiles with each listed accession left out
    #[arg(long)]
    pub leave_one_out: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Pressed HMM database holding the full and leave-one-out profiles
    #[arg(value_name = "HMM_DB")]
    pub hmm_db: PathBuf,

    /// FASTA file with the full-length sequences
    #[arg(value_name = "FASTA")]
    pub fasta: PathBuf,

    /// Glob pattern of accession lists, e.g. 'lists/*.txt'
    #[arg(value_name = "LISTS")]
    pub lists: String,

    /// Scores TSV (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// FASTA file to scan
    #[arg(value_name = "FASTA", required_unless_present = "tblout")]
    pub fasta: Option<PathBuf>,

    /// Pressed HMM database
    #[arg(long, value_name = "FILE", required_unless_present = "tblout")]
    pub hmm_db: Option<PathBuf>,

    /// Annotate an existing hmmscan --tblout file instead of running hmmscan
    #[arg(long, value_name = "FILE", conflicts_with_all = ["fasta", "hmm_db"])]
    pub tblout: Option<PathBuf>,

    /// antiSMASH hmmdetails.txt with per-profile cutoffs
    #[arg(long, value_name = "FILE")]
    pub hmm_details: Option<PathBuf>,

    /// Join record metadata from this document directory
    #[arg(short = 'r', long, value_name = "DIR")]
    pub record_dir: Option<PathBuf>,

    /// Hits TSV (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: HmmArgs, config: &Config) -> Result<()> {
    match args.command {
        HmmCommands::Build(args) => build(args, config),
        HmmCommands::Check(args) => check(args, config),
        HmmCommands::Scan(args) => scan(args, config),
    }
}

fn list_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("No accession lists match '{}'", pattern);
    }
    Ok(files)
}

fn build(args: BuildArgs, config: &Config) -> Result<()> {
    let muscle = Muscle::new(&config.tools.muscle);
    let hmmbuild = HmmBuild::new(&config.tools.hmmbuild);
    muscle.verify_installation()?;
    hmmbuild.verify_installation()?;

    let pattern = Path::new(&glob::Pattern::escape(&args.lists.to_string_lossy())).join("*");
    let lists = list_files(&pattern.to_string_lossy())?;
    let sequences = parse_fasta(&args.fasta)
        .with_context(|| format!("Failed to read {}", args.fasta.display()))?;
    std::fs::create_dir_all(&args.hmm_dir)
        .with_context(|| format!("Failed to create {}", args.hmm_dir.display()))?;

    let builder = HmmBuilder::new(muscle, hmmbuild, args.hmm_dir.clone(), args.leave_one_out);
    let pb = output::progress_bar(lists.len() as u64, "Building profiles");
    let (mut built, mut skipped) = (0, 0);
    for list in &lists {
        let report = builder
            .build_from_list(list, &sequences)
            .with_context(|| format!("Failed to build profiles for {}", list.display()))?;
        built += report.built;
        skipped += report.skipped;
        pb.inc(1);
    }
    pb.finish_and_clear();

    output::success(&format!("Profiles written to {}", args.hmm_dir.display()));
    tree_item(false, "Built", Some(&built.to_string()));
    tree_item(true, "Skipped", Some(&skipped.to_string()));
    Ok(())
}

fn check(args: CheckArgs, config: &Config) -> Result<()> {
    let sequences = parse_fasta(&args.fasta)
        .with_context(|| format!("Failed to read {}", args.fasta.display()))?;
    let accessions: BTreeSet<String> =
        sequences.iter().map(|s| s.accession().to_string()).collect();

    let groups = list_files(&args.lists)?
        .iter()
        .map(|list| HmmGroup::from_list(list, &accessions))
        .collect::<crate::Result<Vec<_>>>()?;

    let hmmscan = HmmScan::new(&config.tools.hmmscan);
    let pb = output::spinner(&format!("Scanning {} sequences", accessions.len()));
    let extra = ["--noali", "--domT", "0"].map(String::from);
    let hits = hmmscan.scan(&args.hmm_db, &args.fasta, &extra);
    pb.finish_and_clear();
    let hits = hits.with_context(|| format!("hmmscan against {} failed", args.hmm_db.display()))?;

    let scores = score_groups(&hits, &groups, &accessions);
    write_scores_tsv(super::open_output(args.output.as_deref())?, &scores)?;
    if let Some(path) = &args.output {
        output::success(&format!(
            "Wrote {} scores for {} profiles to {}",
            scores.len(),
            groups.len(),
            path.display()
        ));
    }
    Ok(())
}

fn scan(args: ScanArgs, config: &Config) -> Result<()> {
    let hits = match (&args.tblout, &args.hmm_db, &args.fasta) {
        (Some(tblout), _, _) => {
            let text = std::fs::read_to_string(tblout)
                .with_context(|| format!("Failed to read {}", tblout.display()))?;
            parse_tblout(&text)?
        }
        (None, Some(hmm_db), Some(fasta)) => {
            let hmmscan = HmmScan::new(&config.tools.hmmscan);
            let pb = output::spinner(&format!("Scanning {}", fasta.display()));
            let hits = hmmscan.scan(hmm_db, fasta, &[]);
            pb.finish_and_clear();
            hits.with_context(|| format!("hmmscan against {} failed", hmm_db.display()))?
        }
        _ => bail!("Give either --tblout or a FASTA file with --hmm-db"),
    };

    let cutoffs = match &args.hmm_details {
        Some(path) => Some(
            load_hmm_details(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let records = match &args.record_dir {
        Some(dir) => Some(super::record_store(config, Some(dir)).load_index()?),
        None => None,
    };

    write_scan_tsv(
        super::open_output(args.output.as_deref())?,
        &hits,
        cutoffs.as_ref(),
        records.as_ref(),
    )?;
    if let Some(path) = &args.output {
        output::success(&format!("Wrote {} hits to {}", hits.len(), path.display()));
    }
    Ok(())
}
