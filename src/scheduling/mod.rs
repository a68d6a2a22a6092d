mod round_robin;

pub use round_robin::{FixtureScheduler, MAX_TIMES_MET};
