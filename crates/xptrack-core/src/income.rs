//! Income projection derived from XP volume.
//!
//! Converts the daily goal into a monetary framing against the fixed
//! monthly income target. The conversion ratio and the quiz-bonus blend
//! are product-tunable constants (see `EconomyConfig`/`CourseConfig`);
//! they are presented to users as-is, not derived from market data.

use serde::{Deserialize, Serialize};

use crate::goal::DailyGoal;
use crate::storage::{CourseConfig, EconomyConfig};

/// Derived monetary metrics. Computed fresh per invocation, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeProjection {
    /// One year of goal XP, clamped to the target ceiling.
    pub projected_xp: u64,
    /// XP equivalent of the monthly income target.
    pub xp_required_for_target: u64,
    /// Days until the target at the blended daily rate.
    pub days_to_target_income: u64,
    /// Share of the target the yearly projection covers, 0..=100.
    pub completion_percentage: u8,
}

/// Computes [`IncomeProjection`]s. Pure over the goal value.
pub struct IncomeProjector {
    economy: EconomyConfig,
    course: CourseConfig,
}

impl IncomeProjector {
    pub fn new(economy: EconomyConfig, course: CourseConfig) -> Self {
        Self { economy, course }
    }

    /// Project the income equivalent of a daily goal.
    ///
    /// Total and deterministic: `goal >= 1` keeps the blended daily rate
    /// positive, so no division here can produce NaN or infinity.
    pub fn project(&self, goal: DailyGoal) -> IncomeProjection {
        let xp_required_for_target = self.economy.xp_required_for_target();
        let daily_xp_with_bonus = self.daily_xp_with_bonus(goal);

        let days_to_target_income =
            (xp_required_for_target as f64 / daily_xp_with_bonus).ceil() as u64;
        let projected_xp = (goal.value() as u64 * 365).min(xp_required_for_target);
        let completion_percentage =
            ((projected_xp as f64 / xp_required_for_target as f64) * 100.0).round() as u8;

        IncomeProjection {
            projected_xp,
            xp_required_for_target,
            days_to_target_income,
            completion_percentage,
        }
    }

    /// Blended daily XP estimate: raw goal XP plus the quiz bonus earned
    /// along the way plus the monthly subsection quiz amortized per day.
    fn daily_xp_with_bonus(&self, goal: DailyGoal) -> f64 {
        let goal_xp = goal.value() as f64;
        goal_xp
            + (goal_xp / self.course.xp_per_video_with_quiz as f64)
                * self.course.quiz_xp_per_video as f64
            + self.course.subsection_quiz_xp as f64 / 30.0
    }
}
