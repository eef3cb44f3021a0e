// Service exports
pub mod corpus;
pub mod embedding;
pub mod postgres;

pub use corpus::{ProfileCorpus, InMemoryCorpus, CorpusError, CorpusSeed};
pub use embedding::{EmbeddingProvider, EmbeddingCapability, EmbeddingError};
pub use postgres::{PostgresCorpus, CorpusTables};
