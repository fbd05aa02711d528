#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Minimal NCBI taxonomy dump: two fungal phyla, a bacterium and a plant
pub fn write_taxdump(dir: &Path) {
    let nodes = [
        (1, 1, "no rank"),
        (2759, 1, "superkingdom"),
        (4751, 2759, "kingdom"),
        (5204, 4751, "phylum"),
        (4890, 4751, "phylum"),
        (5338, 5204, "genus"),
        (5052, 4890, "genus"),
        (5062, 5052, "species"),
        (2, 1, "superkingdom"),
        (1883, 2, "genus"),
        (33090, 2759, "kingdom"),
        (3702, 33090, "species"),
    ];
    let names = [
        (1, "root"),
        (2759, "Eukaryota"),
        (4751, "Fungi"),
        (5204, "Basidiomycota"),
        (4890, "Ascomycota"),
        (5338, "Agaricus"),
        (5052, "Aspergillus"),
        (5062, "Aspergillus oryzae"),
        (2, "Bacteria"),
        (1883, "Streptomyces"),
        (33090, "Viridiplantae"),
        (3702, "Arabidopsis thaliana"),
    ];

    let nodes_text: String = nodes
        .iter()
        .map(|(id, parent, rank)| format!("{}\t|\t{}\t|\t{}\t|\t\t|\n", id, parent, rank))
        .collect();
    let names_text: String = names
        .iter()
        .flat_map(|(id, name)| {
            [
                format!("{}\t|\t{}\t|\t\t|\tscientific name\t|\n", id, name),
                format!("{}\t|\t{} (synonym)\t|\t\t|\tsynonym\t|\n", id, name),
            ]
        })
        .collect();

    fs::write(dir.join("nodes.dmp"), nodes_text).unwrap();
    fs::write(dir.join("names.dmp"), names_text).unwrap();
}

pub const INTERPRO_FASTA: &str = "\
>A0A2T4AB12|reviewed|Germacrene A synthase|taxID:5062
MSTLPYEPSLLR
>A0A0B7FQ23|unreviewed|Geranylgeranyl pyrophosphate synthase|taxID:5338
MDYLSSKTLIEVAARLPLRNEEE
>Q9UVY5|reviewed|Hypothetical protein|taxID:1883
MKVLAAGIVGLLLAS
>B0XYZ1|reviewed|Dolasta-1(15),8-diene synthase|taxID:3702
MAPQLSEEYHRLVAENG
";
