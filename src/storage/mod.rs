pub mod metadata;
pub mod record_store;

pub use metadata::{apply_metadata, read_metadata, MetadataPatch, PatchSummary};
pub use record_store::RecordStore;
