pub mod models;
mod validation;

pub use models::*;
pub use validation::{validate_phase, validate_roster};
