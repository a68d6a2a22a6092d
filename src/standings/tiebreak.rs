use std::cmp::Ordering;

use crate::domain::{StandingRow, TeamId};

use super::table::Meeting;

/// Points, then goal difference, then goals for; better rows sort first
pub fn compare_totals(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Orders rows by the full cascade.
///
/// Totals first with team id as the fallback, then every cluster of exactly
/// two rows level on totals is settled by their mutual meetings. Larger
/// clusters keep the id order.
pub fn rank_rows(rows: &mut [StandingRow], meetings: &[Meeting]) {
    rows.sort_by(|a, b| compare_totals(a, b).then_with(|| a.team.cmp(&b.team)));

    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && compare_totals(&rows[start], &rows[end]) == Ordering::Equal {
            end += 1;
        }

        if end - start == 2
            && head_to_head(&rows[start].team, &rows[start + 1].team, meetings) == Ordering::Greater
        {
            rows.swap(start, start + 1);
        }

        start = end;
    }

    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
}

/// `Less` when `a` did better than `b` across their meetings
fn head_to_head(a: &TeamId, b: &TeamId, meetings: &[Meeting]) -> Ordering {
    let mut a_points = 0u32;
    let mut b_points = 0u32;
    let mut a_goal_diff = 0i64;

    for meeting in meetings {
        if &meeting.home == a && &meeting.away == b {
            a_points += meeting.home_points;
            b_points += meeting.away_points;
            a_goal_diff += meeting.score.home as i64 - meeting.score.away as i64;
        } else if &meeting.home == b && &meeting.away == a {
            a_points += meeting.away_points;
            b_points += meeting.home_points;
            a_goal_diff += meeting.score.away as i64 - meeting.score.home as i64;
        }
    }

    b_points.cmp(&a_points).then_with(|| 0.cmp(&a_goal_diff))
}
