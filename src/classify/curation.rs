/// Manual corrections applied after rule-based classification
use super::ReviewPolicy;
use crate::bio::record::ProteinRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matcher {
    /// Case-insensitive substring of the protein name
    Contains,
    /// Exact protein name
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationRule {
    pub matcher: Matcher,
    pub pattern: String,
    pub enzyme_types: Vec<String>,
}

impl CurationRule {
    pub fn new(matcher: Matcher, pattern: &str, enzyme_types: &[&str]) -> Self {
        Self {
            matcher,
            pattern: pattern.to_string(),
            enzyme_types: enzyme_types.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Spaces, underscores and hyphens are interchangeable on both sides
    pub fn matches(&self, protein_name: &str) -> bool {
        let name = normalize_separators(protein_name);
        let pattern = normalize_separators(&self.pattern);
        match self.matcher {
            Matcher::Contains => name.to_lowercase().contains(&pattern.to_lowercase()),
            Matcher::Equals => name == pattern,
        }
    }
}

/// Collapse every run of whitespace, '_' and '-' into one space
fn normalize_separators(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut in_separator = false;
    for c in text.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            if !in_separator {
                normalized.push(' ');
                in_separator = true;
            }
        } else {
            normalized.push(c);
            in_separator = false;
        }
    }
    normalized
}

pub fn default_curation_rules() -> Vec<CurationRule> {
    vec![
        CurationRule::new(
            Matcher::Contains,
            "farnesyl_diphosphate_cyclizing",
            &["sesquiterpene synthase"],
        ),
        CurationRule::new(
            Matcher::Equals,
            "Aristolochene_synthase_in_complex_with_12,13_Difluorofarnesyl_diphosphate",
            &["sesquiterpene synthase"],
        ),
        CurationRule::new(
            Matcher::Contains,
            "gibberellin_cluster-ggpp-synthase",
            &["GGPP synthase"],
        ),
        CurationRule::new(
            Matcher::Equals,
            "Geranylgeranyl_pyrophosphate_synthetase,_putative_[includes:_dimethylallyltranstransferase_(Ec_2.5.1.1)_geranyltranstransferase_(Ec_2.5.1.10)_farnesyltranstransferas_(Ec_2.5.1.29)]",
            &["GGPP synthase"],
        ),
        CurationRule::new(
            Matcher::Equals,
            "Geranylgeranyl_pyrophosphate_synthase_(Fusicoccadiene_synthase)",
            &["GGPP synthase"],
        ),
    ]
}

/// Replace the labels of `record` with those of the first matching rule.
/// Records the review policy excludes keep their labels.
/// Returns whether a rule applied.
pub fn apply_curation(
    rules: &[CurationRule],
    policy: ReviewPolicy,
    record: &mut ProteinRecord,
) -> bool {
    if !policy.admits(record.reviewed()) {
        return false;
    }
    let Some(rule) = rules.iter().find(|rule| rule.matches(record.protein_name())) else {
        return false;
    };
    tracing::debug!(
        "Curation override for {}: {:?}",
        record.accession(),
        rule.enzyme_types
    );
    record.set_enzyme_types(rule.enzyme_types.iter().cloned());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::record::{SourceDatabase, UNKNOWN_LABEL};
    use crate::classify::{Classifier, EnzymeTables};

    #[test]
    fn test_contains_is_case_insensitive() {
        let rule = CurationRule::new(
            Matcher::Contains,
            "gibberellin_cluster-ggpp-synthase",
            &["GGPP synthase"],
        );
        assert!(rule.matches("Gibberellin_cluster-GGPP-synthase"));
        assert!(rule.matches("putative gibberellin cluster GGPP synthase"));
        assert!(!rule.matches("gibberellin GGPP synthase"));
    }

    #[test]
    fn test_equals_ignores_separator_style_only() {
        let rule = CurationRule::new(
            Matcher::Equals,
            "Geranylgeranyl_pyrophosphate_synthase_(Fusicoccadiene_synthase)",
            &["GGPP synthase"],
        );
        assert!(rule.matches("Geranylgeranyl_pyrophosphate_synthase_(Fusicoccadiene_synthase)"));
        assert!(rule.matches("Geranylgeranyl pyrophosphate synthase (Fusicoccadiene synthase)"));
        assert!(rule.matches("Geranylgeranyl  pyrophosphate synthase\t(Fusicoccadiene synthase)"));
        assert!(!rule.matches("geranylgeranyl pyrophosphate synthase (fusicoccadiene synthase)"));
        assert!(!rule.matches("Geranylgeranyl pyrophosphate synthase"));
    }

    #[test]
    fn test_spaced_header_is_curated() {
        let classifier = Classifier::new(&EnzymeTables::default(), ReviewPolicy::MatchAll).unwrap();
        let mut record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A1|reviewed|Geranylgeranyl pyrophosphate synthase (Fusicoccadiene synthase)|taxID:5062",
        )
        .unwrap();
        record.classify(&classifier);
        assert!(record.enzyme_types().len() > 1);

        assert!(apply_curation(&default_curation_rules(), ReviewPolicy::MatchAll, &mut record));
        assert_eq!(record.enzyme_types().iter().collect::<Vec<_>>(), vec!["GGPP synthase"]);
    }

    #[test]
    fn test_curation_respects_reviewed_only() {
        let classifier =
            Classifier::new(&EnzymeTables::default(), ReviewPolicy::ReviewedOnly).unwrap();
        let mut record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A3|unreviewed|Gibberellin_cluster-GGPP-synthase|taxID:5062",
        )
        .unwrap();
        record.classify(&classifier);
        assert!(!apply_curation(
            &default_curation_rules(),
            classifier.policy(),
            &mut record
        ));
        assert_eq!(record.enzyme_types().iter().collect::<Vec<_>>(), vec![UNKNOWN_LABEL]);

        let mut reviewed = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A4|reviewed|Gibberellin_cluster-GGPP-synthase|taxID:5062",
        )
        .unwrap();
        reviewed.classify(&classifier);
        assert!(apply_curation(&default_curation_rules(), classifier.policy(), &mut reviewed));
        assert_eq!(reviewed.enzyme_types().iter().collect::<Vec<_>>(), vec!["GGPP synthase"]);
    }

    #[test]
    fn test_apply_curation_replaces_labels() {
        let mut record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A1|reviewed|Geranylgeranyl_pyrophosphate_synthase_(Fusicoccadiene_synthase)|taxID:5062",
        )
        .unwrap();
        record.set_enzyme_types(["diterpene synthase", "GGPP synthase"]);

        assert!(apply_curation(&default_curation_rules(), ReviewPolicy::MatchAll, &mut record));
        assert_eq!(record.enzyme_types().iter().collect::<Vec<_>>(), vec!["GGPP synthase"]);
    }

    #[test]
    fn test_apply_curation_no_match() {
        let mut record = ProteinRecord::from_header(
            SourceDatabase::Interpro,
            "A0A1|reviewed|Kaurene_synthase|taxID:5062",
        )
        .unwrap();
        assert!(!apply_curation(&default_curation_rules(), ReviewPolicy::MatchAll, &mut record));
        assert!(!record.is_classified());
    }
}
