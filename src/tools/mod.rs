/// Wrappers around external bioinformatics programs
pub mod fasttree;
pub mod hmm;
pub mod hmmer;
pub mod muscle;
pub mod runner;
pub mod traits;

pub use fasttree::FastTree;
pub use hmmer::{HmmBuild, HmmHit, HmmScan};
pub use muscle::Muscle;
pub use runner::{execute, find_error, RunResult};
pub use traits::ExternalTool;
