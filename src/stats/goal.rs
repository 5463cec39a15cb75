use serde::Serialize;

use super::{percent, Sourced};
use crate::models::DataSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalShare {
    pub name: String,
    pub users: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalAchievement {
    pub goal: String,
    pub achieved: u64,
    pub in_progress: u64,
    pub not_achieved: u64,
}

impl GoalAchievement {
    pub fn total(&self) -> u64 {
        self.achieved + self.in_progress + self.not_achieved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAchieved {
    pub month: String,
    pub achieved: u64,
}

/// Raw series behind the goal screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalInput {
    pub source: DataSource,
    pub distribution: Vec<GoalShare>,
    pub achievement: Vec<GoalAchievement>,
    pub monthly: Vec<MonthlyAchieved>,
}

impl GoalInput {
    /// Illustrative figures shown until the backend exposes goal statistics.
    pub fn placeholder() -> Self {
        let share = |name: &str, users, color| GoalShare {
            name: name.to_string(),
            users,
            color,
        };
        let row = |goal: &str, achieved, in_progress, not_achieved| GoalAchievement {
            goal: goal.to_string(),
            achieved,
            in_progress,
            not_achieved,
        };
        let month = |month: &str, achieved| MonthlyAchieved {
            month: month.to_string(),
            achieved,
        };

        Self {
            source: DataSource::Placeholder,
            distribution: vec![
                share("체중 감량", 458, "#ef4444"),
                share("체중 증가", 187, "#3b82f6"),
                share("체중 유지", 225, "#10b981"),
            ],
            achievement: vec![
                row("체중 감량", 234, 187, 37),
                row("체중 증가", 98, 76, 13),
                row("체중 유지", 156, 58, 11),
            ],
            monthly: vec![
                month("6월", 45),
                month("7월", 58),
                month("8월", 67),
                month("9월", 72),
                month("10월", 85),
                month("11월", 161),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalShareView {
    #[serde(flatten)]
    pub share: GoalShare,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalAchievementView {
    #[serde(flatten)]
    pub row: GoalAchievement,
    pub achievement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub total_users: u64,
    pub total_achieved: u64,
    pub total_in_progress: u64,
    /// Achieved over all users with a goal, percent.
    pub achievement_rate: f64,
    pub top_goal: Option<String>,
    pub top_goal_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalStatsView {
    pub summary: Sourced<GoalSummary>,
    pub distribution: Vec<GoalShareView>,
    pub achievement: Vec<GoalAchievementView>,
    pub monthly: Vec<MonthlyAchieved>,
}

pub fn transform(input: GoalInput) -> GoalStatsView {
    let total_users: u64 = input.distribution.iter().map(|g| g.users).sum();
    let total_achieved: u64 = input.achievement.iter().map(|a| a.achieved).sum();
    let total_in_progress: u64 = input.achievement.iter().map(|a| a.in_progress).sum();

    // First goal wins ties.
    let top = input
        .distribution
        .iter()
        .fold(None::<&GoalShare>, |best, g| match best {
            Some(b) if b.users >= g.users => Some(b),
            _ => Some(g),
        });
    let top_goal = top.map(|g| g.name.clone());
    let top_goal_percent = top
        .map(|g| percent(g.users as f64, total_users as f64))
        .unwrap_or(0.0);

    let summary = GoalSummary {
        total_users,
        total_achieved,
        total_in_progress,
        achievement_rate: percent(total_achieved as f64, total_users as f64),
        top_goal,
        top_goal_percent,
    };

    let distribution = input
        .distribution
        .into_iter()
        .map(|share| GoalShareView {
            percent: percent(share.users as f64, total_users as f64),
            share,
        })
        .collect();

    let achievement = input
        .achievement
        .into_iter()
        .map(|row| GoalAchievementView {
            achievement_rate: percent(row.achieved as f64, row.total() as f64),
            row,
        })
        .collect();

    GoalStatsView {
        summary: Sourced {
            source: input.source,
            value: summary,
        },
        distribution,
        achievement,
        monthly: input.monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_aggregates() {
        let view = transform(GoalInput::placeholder());
        let summary = &view.summary.value;
        assert!(view.summary.is_placeholder());
        assert_eq!(summary.total_users, 870);
        assert_eq!(summary.total_achieved, 488);
        assert_eq!(summary.total_in_progress, 321);
        assert_eq!(summary.achievement_rate, 56.1);
        assert_eq!(summary.top_goal.as_deref(), Some("체중 감량"));
        assert_eq!(summary.top_goal_percent, 52.6);
        assert_eq!(view.distribution[1].percent, 21.5);
        assert_eq!(view.achievement[0].achievement_rate, 51.1);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let view = transform(GoalInput {
            source: DataSource::Api,
            distribution: vec![],
            achievement: vec![],
            monthly: vec![],
        });
        assert_eq!(view.summary.value.achievement_rate, 0.0);
        assert_eq!(view.summary.value.top_goal, None);
        assert!(!view.summary.is_placeholder());
    }
}
