pub mod completion;
pub mod config;
pub mod embeddings;
pub mod logging;
pub mod memory;
pub mod openai;
pub mod paths;
pub mod reflect;

// Re-export commonly used types
pub use config::Config;
pub use memory::{AlignmentScorer, ClusterEngine, ClusterLabeler, Record, RecordStore};
pub use reflect::Reflector;
