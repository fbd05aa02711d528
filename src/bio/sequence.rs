use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Accession part of a sequence id: the second field of UniProtKB ids
/// (`sp|ACC|ENTRY`), otherwise everything before the first '|'
pub fn accession_of(id: &str) -> &str {
    let mut fields = id.split('|');
    match (fields.next(), fields.next()) {
        (Some("sp" | "tr"), Some(accession)) if !accession.is_empty() => accession,
        (Some(first), _) => first,
        (None, _) => id,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
    /// Header text exactly as read, kept while `id` and `description` still agree with it
    #[serde(skip)]
    raw_header: Option<String>,
}

// The raw header is a parsing artifact and takes no part in identity
impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.description == other.description
            && self.sequence == other.sequence
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.description.hash(state);
        self.sequence.hash(state);
    }
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
            raw_header: None,
        }
    }

    /// Remember the header line as it appeared in the input, without the leading '>'
    pub fn with_raw_header(mut self, raw_header: String) -> Self {
        self.raw_header = Some(raw_header);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The full header line without the leading '>'.
    /// The text as read is returned unless `id` or `description` changed since.
    pub fn header_line(&self) -> String {
        if let Some(raw) = self.raw_header.as_deref().filter(|raw| self.matches_raw(raw)) {
            return raw.to_string();
        }
        match &self.description {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }

    fn matches_raw(&self, raw: &str) -> bool {
        match raw.strip_prefix(self.id.as_str()) {
            Some(rest) => {
                (rest.is_empty() && self.description.is_none())
                    || (rest.starts_with([' ', '\t'])
                        && self.description.as_deref().map(str::trim) == Some(rest.trim()))
            }
            None => false,
        }
    }

    pub fn header(&self) -> String {
        format!(">{}", self.header_line())
    }

    pub fn accession(&self) -> &str {
        accession_of(&self.id)
    }

    pub fn sequence_str(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line_keeps_description() {
        let seq = Sequence::new("XP_001.1".to_string(), b"MKV".to_vec())
            .with_description("terpene synthase [Aspergillus niger]".to_string());
        assert_eq!(seq.header_line(), "XP_001.1 terpene synthase [Aspergillus niger]");
        assert_eq!(seq.header(), ">XP_001.1 terpene synthase [Aspergillus niger]");
    }

    #[test]
    fn test_header_line_prefers_raw_text() {
        let seq = Sequence::new("XP_001.1".to_string(), b"MKV".to_vec())
            .with_description("terpene  synthase\t[Aspergillus niger]".to_string())
            .with_raw_header("XP_001.1\tterpene  synthase\t[Aspergillus niger]".to_string());
        assert_eq!(seq.header_line(), "XP_001.1\tterpene  synthase\t[Aspergillus niger]");
    }

    #[test]
    fn test_header_line_after_edit_ignores_raw_text() {
        let mut seq = Sequence::new("sp|P1|TPS_ASPNG".to_string(), b"MKV".to_vec())
            .with_description("Terpene synthase".to_string())
            .with_raw_header("sp|P1|TPS_ASPNG  Terpene synthase".to_string());
        seq.id = "P1".to_string();
        seq.description = None;
        assert_eq!(seq.header_line(), "P1");

        let copy = Sequence::new("sp|P1|TPS_ASPNG".to_string(), b"MKV".to_vec());
        assert_ne!(seq, copy);
    }

    #[test]
    fn test_accession_from_pipe_id() {
        let seq = Sequence::new("A0A2T4|reviewed|Kaurene_synthase|taxID:5062".to_string(), vec![]);
        assert_eq!(seq.accession(), "A0A2T4");

        let plain = Sequence::new("XP_001.1".to_string(), vec![]);
        assert_eq!(plain.accession(), "XP_001.1");

        let swissprot = Sequence::new("sp|Q9UR08|ERG20_SCHPO".to_string(), vec![]);
        assert_eq!(swissprot.accession(), "Q9UR08");
    }
}
