pub mod alignment;
pub mod fasta;
pub mod field;
pub mod newick;
pub mod record;
pub mod sequence;
pub mod taxonomy;

pub use field::RecordField;
pub use record::{ProteinRecord, SourceDatabase};
pub use sequence::Sequence;
