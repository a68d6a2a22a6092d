pub mod progression;
pub mod server;

pub use progression::ProgressionService;
