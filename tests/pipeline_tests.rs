mod common;

use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use tempfile::TempDir;
use terpenome::bio::fasta::parse_fasta_from_bytes;
use terpenome::bio::field::RecordField;
use terpenome::bio::taxonomy::ncbi;
use terpenome::classify::{apply_curation, default_curation_rules};
use terpenome::report::selection::{filter_sequences, SelectionCriteria};
use terpenome::report::summary::{count_values, ValueCount};
use terpenome::report::table::write_table;
use terpenome::storage::RecordStore;
use terpenome::{
    Annotator, Classifier, Division, EnzymeTables, ProteinRecord, ReviewPolicy, SourceDatabase,
    TerpenomeError,
};

/// Header parsing, classification, curation, annotation and storage, as `extract` runs them
fn extract_into(store: &RecordStore, taxdump: &std::path::Path) -> Vec<ProteinRecord> {
    let classifier = Classifier::new(&EnzymeTables::default(), ReviewPolicy::MatchAll).unwrap();
    let db = ncbi::load_taxdump(taxdump).unwrap();
    let annotator = Annotator::new(&db);
    let curation = default_curation_rules();

    let sequences = parse_fasta_from_bytes(common::INTERPRO_FASTA.as_bytes()).unwrap();
    let mut records = Vec::new();
    for sequence in &sequences {
        let mut record =
            ProteinRecord::from_header(SourceDatabase::Interpro, &sequence.header_line()).unwrap();
        record.classify(&classifier);
        apply_curation(&curation, classifier.policy(), &mut record);
        record.annotate(&annotator).unwrap();
        store.write(&record).unwrap();
        records.push(record);
    }
    records
}

#[test]
fn test_extract_pipeline_end_to_end() {
    let taxdump = TempDir::new().unwrap();
    common::write_taxdump(taxdump.path());
    let records_dir = TempDir::new().unwrap();
    let store = RecordStore::create(records_dir.path()).unwrap();

    let written = extract_into(&store, taxdump.path());
    assert_eq!(written.len(), 4);

    let germacrene = store.read("A0A2T4AB12").unwrap();
    assert_eq!(germacrene.reviewed(), Some(true));
    assert_eq!(germacrene.organism_name(), "Aspergillus oryzae");
    assert_eq!(germacrene.organism_division(), Some(Division::Ascomycota));
    assert_eq!(
        germacrene.enzyme_types().iter().cloned().collect::<Vec<_>>(),
        vec!["sesquiterpene synthase"]
    );

    let ggpp = store.read("A0A0B7FQ23").unwrap();
    assert_eq!(ggpp.organism_division(), Some(Division::Basidiomycota));
    assert!(ggpp.enzyme_types().contains("GGPP synthase"));

    let hypothetical = store.read("Q9UVY5").unwrap();
    assert_eq!(hypothetical.organism_division(), Some(Division::Bacteria));
    assert_eq!(hypothetical.enzyme_types().len(), 1);
    assert!(hypothetical.enzyme_types().contains("unknown"));

    let plant = store.read("B0XYZ1").unwrap();
    assert_eq!(plant.organism_division(), Some(Division::Viridiplantae));
    assert!(plant.enzyme_types().contains("diterpene synthase"));
}

#[test]
fn test_reprocessing_overwrites_identically() {
    let taxdump = TempDir::new().unwrap();
    common::write_taxdump(taxdump.path());
    let records_dir = TempDir::new().unwrap();
    let store = RecordStore::create(records_dir.path()).unwrap();

    extract_into(&store, taxdump.path());
    let first = std::fs::read_to_string(store.path_for("A0A2T4AB12").unwrap()).unwrap();
    extract_into(&store, taxdump.path());
    let second = std::fs::read_to_string(store.path_for("A0A2T4AB12").unwrap()).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.load_all().unwrap().len(), 4);
}

#[test]
fn test_record_round_trip_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let store = RecordStore::create(dir.path()).unwrap();

    let mut record = ProteinRecord::from_header(
        SourceDatabase::Uniprot,
        "sp|Q4WR16|TPS_ASPFU Pentalenene synthase OS=Aspergillus fumigatus OX=5085 GN=tps1",
    )
    .unwrap();
    record.set_enzyme_types(["sesquiterpene synthase"]);
    record.set_organism("Aspergillus fumigatus".to_string(), Some(Division::Ascomycota));
    store.write(&record).unwrap();

    let restored = store.read("Q4WR16").unwrap();
    assert_eq!(restored, record);
    for field in RecordField::ALL {
        assert_eq!(field.values(&restored), field.values(&record), "field {}", field);
    }
}

#[test]
fn test_unknown_taxon_is_reported() {
    let taxdump = TempDir::new().unwrap();
    common::write_taxdump(taxdump.path());
    let db = ncbi::load_taxdump(taxdump.path()).unwrap();
    let annotator = Annotator::new(&db);

    let mut record = ProteinRecord::from_header(
        SourceDatabase::Interpro,
        "X1|reviewed|Kaurene synthase|taxID:999999",
    )
    .unwrap();
    let err = record.annotate(&annotator).unwrap_err();
    assert!(matches!(err, TerpenomeError::TaxonNotFound(999999)));
    assert_eq!(record.organism_division(), None);
    assert_eq!(record.organism_name(), "");
}

#[test]
fn test_missing_taxdump_is_a_config_error() {
    let empty = TempDir::new().unwrap();
    assert!(matches!(
        ncbi::load_taxdump(empty.path()),
        Err(TerpenomeError::Config(_))
    ));
}

#[test]
fn test_selection_summary_and_table_over_stored_records() {
    let taxdump = TempDir::new().unwrap();
    common::write_taxdump(taxdump.path());
    let records_dir = TempDir::new().unwrap();
    let store = RecordStore::create(records_dir.path()).unwrap();
    extract_into(&store, taxdump.path());
    let records = store.load_all().unwrap();

    let criteria = SelectionCriteria::new([
        ("organism_division", vec!["Ascomycota".to_string(), "Basidiomycota".to_string()]),
        ("reviewed", vec!["true".to_string()]),
    ])
    .unwrap();
    let selected = criteria.select(&records);
    assert_eq!(selected, BTreeSet::from(["A0A2T4AB12".to_string()]));

    let sequences = parse_fasta_from_bytes(common::INTERPRO_FASTA.as_bytes()).unwrap();
    let kept = filter_sequences(sequences, &selected);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].accession(), "A0A2T4AB12");

    let divisions = count_values(&records, RecordField::OrganismDivision);
    assert_eq!(divisions.len(), 4);
    assert!(divisions.iter().all(|entry| entry.count == 1));
    assert_eq!(
        divisions[0],
        ValueCount {
            value: "Ascomycota".to_string(),
            count: 1
        }
    );

    let mut buffer = Vec::new();
    let rows = write_table(&mut buffer, &records, b'\t').unwrap();
    assert_eq!(rows, 4);
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "accession\tsource_database\tprotein_name\tenzyme_types\torganism_name\torganism_division\treviewed"
    );
    assert!(lines[1].starts_with(
        "A0A0B7FQ23\tinterpro\tGeranylgeranyl pyrophosphate synthase\tGGPP synthase\t\
         Agaricus\tBasidiomycota\tfalse"
    ));
}
