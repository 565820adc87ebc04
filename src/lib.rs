//! docchat application library
//!
//! Declares the chunk store schema through modules and applies it to MongoDB.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::COMPLETION_MESSAGE;
pub use modules::chunks::models::ChunkDocument;
