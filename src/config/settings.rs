#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringSettings {
    pub win_points: u32,
    pub draw_points: u32,
    pub loss_points: u32,
    /// Goals credited to the side that showed up in a walkover
    pub walkover_goals: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            loss_points: 0,
            walkover_goals: 3,
        }
    }
}

/// What the scheduler does with an odd roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByePolicy {
    Reject,
    InsertBye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub bye_policy: ByePolicy,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            bye_policy: ByePolicy::InsertBye,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub database_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tournament_progression.db".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub schedule: ScheduleSettings,
    pub store: StoreSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scoring: ScoringSettings::default(),
            schedule: ScheduleSettings::default(),
            store: StoreSettings::default(),
        }
    }
}
