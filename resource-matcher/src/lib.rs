//! Hospital resource matching for emergency referrals
//!
//! Selects the best available receiving facility with a distance-plus-load
//! cost function and estimates transport time. Capacity claims go through
//! the directory's atomic slot claim so two concurrent referrals can never
//! both take a hospital's last slot.

pub mod directory;
pub mod geo;
pub mod matcher;

pub use directory::*;
pub use geo::*;
pub use matcher::*;
