//! Configuration management for Svar.

mod settings;

pub use settings::{
    ChunkingSettings, EmbeddingSettings, MetadataSettings, QaSettings, Settings,
};
