/// Operations on (aligned) FASTA sequence sets: header simplification,
/// column cutting, reordering and deduplication
use crate::bio::sequence::Sequence;
use crate::{Result, TerpenomeError};
use std::collections::HashSet;

const ACCESSION_DELIMITERS: [char; 6] = ['_', ',', '(', ')', '|', ' '];

/// Leading accession of a sequence id
pub fn simplify_accession(id: &str) -> &str {
    id.split(ACCESSION_DELIMITERS).next().unwrap_or(id)
}

/// Replace every header with its bare accession
pub fn simplify_headers(sequences: &mut [Sequence]) {
    for seq in sequences.iter_mut() {
        seq.id = simplify_accession(&seq.id).to_string();
        seq.description = None;
    }
}

/// Alignment column range, stored 0-based half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parse 1-based inclusive regions such as `1:8,10:12,21`
pub fn parse_regions(spec: &str) -> Result<Vec<Region>> {
    let parse_column = |token: &str| -> Result<usize> {
        let column = token
            .trim()
            .parse::<usize>()
            .map_err(|_| {
                TerpenomeError::InvalidInput(format!("Invalid alignment column '{}'", token))
            })?;
        if column == 0 {
            return Err(TerpenomeError::InvalidInput(
                "Alignment columns start at 1".to_string(),
            ));
        }
        Ok(column)
    };

    let mut regions = Vec::new();
    for field in spec.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let region = match field.split_once(':') {
            Some((start, stop)) => {
                let start = parse_column(start)?;
                let stop = parse_column(stop)?;
                if stop < start {
                    return Err(TerpenomeError::InvalidInput(format!(
                        "Region '{}' ends before it starts",
                        field
                    )));
                }
                Region { start: start - 1, end: stop }
            }
            None => {
                let column = parse_column(field)?;
                Region { start: column - 1, end: column }
            }
        };
        regions.push(region);
    }

    if regions.is_empty() {
        return Err(TerpenomeError::InvalidInput("No alignment regions given".to_string()));
    }
    Ok(regions)
}

/// Concatenate the given column regions of every sequence
pub fn cut_regions(sequences: &[Sequence], regions: &[Region]) -> Result<Vec<Sequence>> {
    let Some(width) = regions.iter().map(|r| r.end).max() else {
        return Ok(sequences.to_vec());
    };

    sequences
        .iter()
        .map(|seq| {
            if seq.len() < width {
                return Err(TerpenomeError::InvalidInput(format!(
                    "Sequence '{}' has {} columns, region extends to column {}",
                    seq.id,
                    seq.len(),
                    width
                )));
            }
            let mut cut = Vec::with_capacity(regions.iter().map(Region::len).sum());
            for region in regions {
                cut.extend_from_slice(&seq.sequence[region.start..region.end]);
            }
            let mut trimmed = seq.clone();
            trimmed.sequence = cut;
            Ok(trimmed)
        })
        .collect()
}

/// Move sequences whose id is listed to the top, keeping relative order in both groups
pub fn reorder(sequences: Vec<Sequence>, first: &HashSet<String>) -> Vec<Sequence> {
    let (mut top, rest): (Vec<_>, Vec<_>) = sequences
        .into_iter()
        .partition(|seq| first.contains(&seq.id));
    top.extend(rest);
    top
}

/// Drop sequences listed in `drop_ids` and repeats of an already kept sequence.
/// Returns the kept sequences and the number removed.
pub fn deduplicate(sequences: Vec<Sequence>, drop_ids: &HashSet<String>) -> (Vec<Sequence>, usize) {
    let total = sequences.len();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let kept: Vec<Sequence> = sequences
        .into_iter()
        .filter(|seq| {
            if drop_ids.contains(&seq.id) {
                tracing::debug!("Dropping {} (close tree neighbour)", seq.id);
                return false;
            }
            seen.insert(seq.sequence.clone())
        })
        .collect();
    let removed = total - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seq(id: &str, residues: &str) -> Sequence {
        Sequence::new(id.to_string(), residues.as_bytes().to_vec())
    }

    #[test]
    fn test_simplify_accession() {
        assert_eq!(simplify_accession("A0A2T4|reviewed|Kaurene"), "A0A2T4");
        assert_eq!(simplify_accession("Q9UR08_SCHPO"), "Q9UR08");
        assert_eq!(simplify_accession("P1(fragment)"), "P1");
        assert_eq!(simplify_accession("plain"), "plain");
    }

    #[test]
    fn test_parse_regions() {
        let regions = parse_regions("1:8,10:12,21").unwrap();
        assert_eq!(
            regions,
            vec![
                Region { start: 0, end: 8 },
                Region { start: 9, end: 12 },
                Region { start: 20, end: 21 },
            ]
        );
        assert!(parse_regions("0:4").is_err());
        assert!(parse_regions("5:2").is_err());
        assert!(parse_regions("a:b").is_err());
        assert!(parse_regions("").is_err());
    }

    #[test]
    fn test_cut_regions() {
        let sequences = vec![seq("a", "ABCDEFGHIJ"), seq("b", "KLMNOPQRST")];
        let regions = parse_regions("1:3,5,9:10").unwrap();
        let cut = cut_regions(&sequences, &regions).unwrap();
        assert_eq!(cut[0].sequence_str(), "ABCEIJ");
        assert_eq!(cut[1].sequence_str(), "KLMOST");

        let too_long = parse_regions("1:11").unwrap();
        assert!(cut_regions(&sequences, &too_long).is_err());
    }

    #[test]
    fn test_reorder() {
        let sequences = vec![seq("a", "A"), seq("b", "B"), seq("c", "C"), seq("d", "D")];
        let first: HashSet<String> = ["c", "a"].iter().map(|s| s.to_string()).collect();
        let ids: Vec<String> = reorder(sequences, &first).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_deduplicate() {
        let sequences = vec![seq("a", "MKV"), seq("b", "MKV"), seq("c", "MKL"), seq("d", "MKA")];
        let drop: HashSet<String> = ["d".to_string()].into_iter().collect();
        let (kept, removed) = deduplicate(sequences, &drop);
        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(removed, 2);
    }
}
