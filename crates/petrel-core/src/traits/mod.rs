//! Trait seams between the workspace crates.

mod embedder;
mod evidence_store;
mod generator;
mod policy;

pub use embedder::IEmbedder;
pub use evidence_store::IEvidenceStore;
pub use generator::IGenerator;
pub use policy::IPolicy;
