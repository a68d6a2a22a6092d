use log::debug;

use crate::config::settings::{ByePolicy, ScheduleSettings};
use crate::domain::{self, Fixture, Round, RoundKind, Team, TeamId};
use crate::errors::{EngineError, EngineResult};

/// Pairings of one round of a single cycle, before round numbers are assigned
struct CycleRound<'a> {
    pairs: Vec<(&'a TeamId, &'a TeamId)>,
    bye: Option<&'a TeamId>,
}

/// Upper bound on how many times a pair can meet in one schedule
pub const MAX_TIMES_MET: u32 = 16;

/// Builds group-stage schedules with the circle method
pub struct FixtureScheduler {
    settings: ScheduleSettings,
}

impl FixtureScheduler {
    pub fn new(settings: ScheduleSettings) -> Self {
        Self { settings }
    }

    /// Every pair of `teams` meets exactly `times_met` times.
    ///
    /// Odd cycles repeat the first one with home and away swapped. The output
    /// depends only on the team order and `times_met`.
    pub fn generate_round_robin(&self, teams: &[Team], times_met: u32) -> EngineResult<Vec<Round>> {
        domain::validate_roster(teams.iter().map(|t| &t.id))?;
        if times_met == 0 || times_met > MAX_TIMES_MET {
            return Err(EngineError::invalid_roster(format!(
                "times met must be between 1 and {}, got {}",
                MAX_TIMES_MET, times_met
            )));
        }

        let slots = self.build_slots(teams)?;
        let cycle = circle_rounds(&slots);
        let per_cycle = u32::try_from(cycle.len())
            .map_err(|_| EngineError::invalid_roster(format!("too many teams ({})", teams.len())))?;
        let total = per_cycle
            .checked_mul(times_met)
            .ok_or_else(|| EngineError::invalid_roster("schedule has more rounds than can be numbered"))?;

        debug!(
            "Scheduling {} teams: {} rounds per cycle, {} cycles",
            teams.len(),
            per_cycle,
            times_met
        );

        let mut rounds = Vec::with_capacity(total as usize);
        for repeat in 0..times_met {
            let swapped = repeat % 2 == 1;
            for (idx, cycle_round) in cycle.iter().enumerate() {
                let number = repeat * per_cycle + idx as u32 + 1;
                rounds.push(build_round(cycle_round, number, swapped));
            }
        }

        Ok(rounds)
    }

    fn build_slots<'a>(&self, teams: &'a [Team]) -> EngineResult<Vec<Option<&'a TeamId>>> {
        let mut slots: Vec<Option<&TeamId>> = teams.iter().map(|t| Some(&t.id)).collect();

        if slots.len() % 2 == 1 {
            match self.settings.bye_policy {
                ByePolicy::InsertBye => slots.push(None),
                ByePolicy::Reject => {
                    return Err(EngineError::invalid_roster(format!(
                        "odd number of teams ({}) and byes are disabled",
                        teams.len()
                    )));
                }
            }
        }

        Ok(slots)
    }
}

/// One full cycle over an even number of slots; `None` marks the bye.
///
/// Slot 0 stays put while the others rotate one step per round. The home
/// side of pairing `i` in round `r` flips with the parity of `r + i`.
fn circle_rounds<'a>(slots: &[Option<&'a TeamId>]) -> Vec<CycleRound<'a>> {
    let m = slots.len();
    let rotating = m - 1;

    (0..rotating)
        .map(|r| {
            let positions: Vec<usize> = (0..m)
                .map(|i| if i == 0 { 0 } else { 1 + (i - 1 + r) % rotating })
                .collect();

            let mut pairs = Vec::with_capacity(m / 2);
            let mut bye = None;

            for i in 0..m / 2 {
                let first = slots[positions[i]];
                let second = slots[positions[m - 1 - i]];

                match (first, second) {
                    (Some(a), Some(b)) => {
                        if (r + i) % 2 == 0 {
                            pairs.push((a, b));
                        } else {
                            pairs.push((b, a));
                        }
                    }
                    (Some(team), None) | (None, Some(team)) => bye = Some(team),
                    (None, None) => {}
                }
            }

            CycleRound { pairs, bye }
        })
        .collect()
}

fn build_round(cycle_round: &CycleRound<'_>, number: u32, swapped: bool) -> Round {
    let fixtures = cycle_round
        .pairs
        .iter()
        .map(|&(home, away)| {
            let (home, away) = if swapped { (away, home) } else { (home, away) };
            Fixture::new(home.clone(), away.clone(), number)
        })
        .collect();

    Round {
        number,
        kind: RoundKind::GroupStage,
        fixtures,
        bye: cycle_round.bye.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn teams(ids: &[&str]) -> Vec<Team> {
        ids.iter().map(|id| Team::new(*id, format!("Team {}", id))).collect()
    }

    fn scheduler() -> FixtureScheduler {
        FixtureScheduler::new(ScheduleSettings::default())
    }

    fn pair_counts(rounds: &[Round]) -> HashMap<(TeamId, TeamId), u32> {
        let mut counts = HashMap::new();
        for fixture in rounds.iter().flat_map(|r| &r.fixtures) {
            let key = if fixture.home < fixture.away {
                (fixture.home.clone(), fixture.away.clone())
            } else {
                (fixture.away.clone(), fixture.home.clone())
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    fn assert_no_team_twice(rounds: &[Round]) {
        for round in rounds {
            let mut seen = HashSet::new();
            for team in round.teams().chain(round.bye.iter()) {
                assert!(seen.insert(team.clone()), "{} twice in round {}", team, round.number);
            }
        }
    }

    #[test]
    fn test_four_teams_single_cycle() {
        let rounds = scheduler().generate_round_robin(&teams(&["A", "B", "C", "D"]), 1).unwrap();

        assert_eq!(rounds.len(), 3);
        assert!(rounds.iter().all(|r| r.fixtures.len() == 2 && r.bye.is_none()));

        let counts = pair_counts(&rounds);
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&c| c == 1));
        assert_no_team_twice(&rounds);

        let numbers: Vec<u32> = rounds.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_each_pair_meets_times_met_times() {
        for n in 2..=9 {
            let ids: Vec<String> = (0..n).map(|i| format!("T{:02}", i)).collect();
            let roster: Vec<Team> = ids.iter().map(|id| Team::new(id.as_str(), id.as_str())).collect();

            for times_met in 1..=3 {
                let rounds = scheduler().generate_round_robin(&roster, times_met).unwrap();
                let expected_rounds = if n % 2 == 0 { (n - 1) * times_met as usize } else { n * times_met as usize };

                assert_eq!(rounds.len(), expected_rounds, "n={} times_met={}", n, times_met);
                let counts = pair_counts(&rounds);
                assert_eq!(counts.len(), n * (n - 1) / 2);
                assert!(counts.values().all(|&c| c == times_met));
                assert_no_team_twice(&rounds);
            }
        }
    }

    #[test]
    fn test_odd_roster_gets_one_bye_per_team_per_cycle() {
        let rounds = scheduler().generate_round_robin(&teams(&["A", "B", "C", "D", "E"]), 1).unwrap();

        assert_eq!(rounds.len(), 5);
        let byes: HashSet<TeamId> = rounds.iter().filter_map(|r| r.bye.clone()).collect();
        assert_eq!(byes.len(), 5);
        assert!(rounds.iter().all(|r| r.fixtures.len() == 2));
    }

    #[test]
    fn test_odd_roster_rejected_without_bye_policy() {
        let scheduler = FixtureScheduler::new(ScheduleSettings {
            bye_policy: ByePolicy::Reject,
        });

        let result = scheduler.generate_round_robin(&teams(&["A", "B", "C"]), 1);
        assert!(matches!(result, Err(EngineError::InvalidRoster { .. })));
    }

    #[test]
    fn test_repeat_cycle_swaps_venues() {
        let rounds = scheduler().generate_round_robin(&teams(&["A", "B", "C", "D"]), 3).unwrap();

        for r in 0..3 {
            let first = &rounds[r];
            let second = &rounds[r + 3];
            let third = &rounds[r + 6];
            for (idx, fixture) in first.fixtures.iter().enumerate() {
                assert_eq!(second.fixtures[idx].home, fixture.away);
                assert_eq!(second.fixtures[idx].away, fixture.home);
                assert_eq!(third.fixtures[idx].home, fixture.home);
            }
        }
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let roster = teams(&["Lions", "Tigers", "Bears", "Wolves", "Eagles", "Sharks"]);
        let first = scheduler().generate_round_robin(&roster, 2).unwrap();
        let second = scheduler().generate_round_robin(&roster, 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            scheduler().generate_round_robin(&teams(&["A"]), 1),
            Err(EngineError::InvalidRoster { .. })
        ));
        assert!(matches!(
            scheduler().generate_round_robin(&teams(&["A", "B"]), 0),
            Err(EngineError::InvalidRoster { .. })
        ));
        assert!(matches!(
            scheduler().generate_round_robin(&teams(&["A", "B", "A"]), 1),
            Err(EngineError::InvalidRoster { .. })
        ));
    }

    #[test]
    fn test_times_met_is_bounded() {
        let roster = teams(&["A", "B", "C", "D"]);
        for times_met in [MAX_TIMES_MET + 1, u32::MAX / 2, u32::MAX] {
            assert!(matches!(
                scheduler().generate_round_robin(&roster, times_met),
                Err(EngineError::InvalidRoster { .. })
            ));
        }

        let rounds = scheduler().generate_round_robin(&roster, MAX_TIMES_MET).unwrap();
        assert_eq!(rounds.len(), 3 * MAX_TIMES_MET as usize);
        assert_eq!(rounds.last().unwrap().number, 3 * MAX_TIMES_MET);
    }
}
