//! Guideline context retrieval for the VHT triage pipeline
//!
//! Given canonical symptoms and patient demographics, returns the top-K most
//! relevant clinical guideline snippets from a backing index. Retrieval is
//! never fatal: an uninitialized index, an internal fault, or a timeout all
//! degrade to an empty context with a logged warning, and downstream stages
//! cannot tell "no relevant guideline" apart from "index down".

pub mod index;
pub mod retriever;

pub use index::*;
pub use retriever::*;
