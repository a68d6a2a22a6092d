pub mod settings;

pub use settings::{AppConfig, ByePolicy, ScheduleSettings, ScoringSettings, StoreSettings};
