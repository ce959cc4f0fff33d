//! Safety validation for triage judgments
//!
//! An independent second pass that re-checks a judgment for internal
//! consistency and threshold compliance before anything acts on it. It can
//! downgrade the working score and veto the emergency flag, but it never
//! crashes a case: every internal failure collapses to a conservative
//! `validated = false` outcome with the original score preserved.

pub mod validator;

pub use validator::*;
