/// Rule-based enzyme classification from protein names
pub mod curation;
pub mod tables;

pub use curation::{apply_curation, default_curation_rules, CurationRule, Matcher};
pub use tables::EnzymeTables;

use crate::bio::record::UNKNOWN_LABEL;
use crate::{Result, TerpenomeError};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Suffixes that may be split by locant text, longest first
const INFIX_SUFFIXES: [&str; 5] = ["triene", "diene", "ene", "en", "ol"];
const INFIX: &str = "(?:-.*-)?";
const SEPARATOR: &str = "[ _-]?";

/// How curation status gates classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewPolicy {
    /// Classify every record regardless of curation status
    #[default]
    MatchAll,
    /// Only records known to be reviewed are matched; the rest get the sentinel
    ReviewedOnly,
}

impl ReviewPolicy {
    pub fn admits(&self, reviewed: Option<bool>) -> bool {
        match self {
            ReviewPolicy::MatchAll => true,
            ReviewPolicy::ReviewedOnly => reviewed == Some(true),
        }
    }
}

impl fmt::Display for ReviewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewPolicy::MatchAll => f.write_str("match-all"),
            ReviewPolicy::ReviewedOnly => f.write_str("reviewed-only"),
        }
    }
}

impl std::str::FromStr for ReviewPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "match-all" => Ok(ReviewPolicy::MatchAll),
            "reviewed-only" => Ok(ReviewPolicy::ReviewedOnly),
            _ => Err(format!(
                "Unknown review policy '{}' (expected match-all or reviewed-only)",
                s
            )),
        }
    }
}

/// Regex text for one exemplar term.
///
/// Whitespace runs accept a space, underscore, hyphen or nothing. A trailing
/// `triene`/`diene`/`ene`/`en`/`ol` may be preceded by locant text such as
/// `-1(15),8-`, so `dolastadiene` matches `dolasta-1(15),8-diene`.
pub fn exemplar_pattern(term: &str) -> String {
    let term = term.trim();
    let suffix_len = INFIX_SUFFIXES
        .iter()
        .find(|suffix| {
            term.len() > suffix.len()
                && term.is_char_boundary(term.len() - suffix.len())
                && term[term.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
        })
        .map(|suffix| suffix.len());

    match suffix_len {
        Some(len) => {
            let (stem, suffix) = term.split_at(term.len() - len);
            format!(
                "{}{}{}",
                escape_with_separators(stem),
                INFIX,
                regex::escape(suffix)
            )
        }
        None => escape_with_separators(term),
    }
}

fn escape_with_separators(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() * 2);
    let mut in_whitespace = false;
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                pattern.push_str(SEPARATOR);
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    pattern
}

/// All exemplars of a family compiled into one case-insensitive alternation
#[derive(Debug)]
struct CompiledFamily {
    label: String,
    pattern: Regex,
}

impl CompiledFamily {
    fn compile(family: &str, exemplars: &[String]) -> Result<Self> {
        let alternation = exemplars
            .iter()
            .map(|term| exemplar_pattern(term))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!("(?:{})", alternation))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                TerpenomeError::Config(format!("Invalid exemplars for family '{}': {}", family, e))
            })?;

        Ok(Self {
            label: format!("{} synthase", family),
            pattern,
        })
    }
}

/// Assigns enzyme labels to protein names using immutable family tables
#[derive(Debug)]
pub struct Classifier {
    terpene: Vec<CompiledFamily>,
    prenyltransferase: Vec<CompiledFamily>,
    policy: ReviewPolicy,
}

impl Classifier {
    pub fn new(tables: &EnzymeTables, policy: ReviewPolicy) -> Result<Self> {
        let compile = |table: &indexmap::IndexMap<String, Vec<String>>| {
            table
                .iter()
                .map(|(family, exemplars)| CompiledFamily::compile(family, exemplars))
                .collect::<Result<Vec<_>>>()
        };

        Ok(Self {
            terpene: compile(tables.terpene())?,
            prenyltransferase: compile(tables.prenyltransferase())?,
            policy,
        })
    }

    pub fn policy(&self) -> ReviewPolicy {
        self.policy
    }

    /// Enzyme labels for a protein name. Never empty: unmatched names get `{"unknown"}`.
    pub fn classify(&self, protein_name: &str, reviewed: Option<bool>) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();

        if self.policy.admits(reviewed) {
            for family in &self.terpene {
                if family.pattern.is_match(protein_name) {
                    labels.insert(family.label.clone());
                }
            }
            if let Some(label) = self.prenyltransferase_label(protein_name) {
                labels.insert(label.to_string());
            }
        }

        if labels.is_empty() {
            labels.insert(UNKNOWN_LABEL.to_string());
        }
        labels
    }

    /// First family in table order wins
    fn prenyltransferase_label(&self, protein_name: &str) -> Option<&str> {
        for family in &self.prenyltransferase {
            if family.pattern.is_match(protein_name) {
                return Some(&family.label);
            }
        }
        None
    }
}
