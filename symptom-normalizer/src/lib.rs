//! Symptom normalization for the VHT triage pipeline
//!
//! Maps raw free-text symptom phrases, in English or Luganda, to a canonical
//! symptom vocabulary and flags emergency keywords. Pure functions of an
//! immutable vocabulary table and their input; locale-specific vocabularies
//! are swapped in as data, not code.

pub mod normalizer;
pub mod vocabulary;

pub use normalizer::*;
pub use vocabulary::*;
