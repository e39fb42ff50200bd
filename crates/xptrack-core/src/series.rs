//! Historical and projected XP time series.
//!
//! The generator is a pure function over (goal, window): it allocates a
//! fresh series per invocation and keeps no state. Historical points are
//! fixed at zero XP: the product treats every account as starting from
//! an XP reset, regardless of any activity recorded elsewhere in the app.
//! The projection extrapolates forward from that zero baseline at the
//! daily goal rate.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};
use crate::goal::DailyGoal;
use crate::storage::CourseConfig;

/// Longest forward projection, in days.
pub const PROJECTION_CAP_DAYS: i64 = 365;

/// Which side of "today" a point belongs to. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Historical,
    Projected,
}

/// One day of the combined series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// Cumulative XP at this day. Zero for every historical point.
    pub xp: u64,
    /// The daily goal the series was generated against.
    pub goal: u32,
    pub kind: PointKind,
    /// How many videos (with quizzes) this much XP corresponds to.
    /// Display-only; the chart does not use it.
    pub videos_completed: u32,
    /// Total XP available in the course catalog.
    pub total_course_xp: u64,
}

/// Ordered series: a contiguous historical run followed by a contiguous
/// projected run, dates strictly increasing across both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub historical: Vec<SeriesPoint>,
    pub projected: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.historical.len() + self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.historical.is_empty() && self.projected.is_empty()
    }

    /// Historical points first, then projected.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.historical.iter().chain(self.projected.iter())
    }

    pub fn last_historical(&self) -> Option<&SeriesPoint> {
        self.historical.last()
    }
}

/// The discrete period selector exposed by the UI.
///
/// Window lengths outside this set never reach the generator from the
/// UI, so a bad selector value cannot corrupt the last good render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Week,
    Month,
    Quarter,
}

impl TimeWindow {
    pub fn days(&self) -> i64 {
        match self {
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Quarter => 90,
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(TimeWindow::Week),
            30 => Some(TimeWindow::Month),
            90 => Some(TimeWindow::Quarter),
            _ => None,
        }
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "7" | "week" => Ok(TimeWindow::Week),
            "30" | "month" => Ok(TimeWindow::Month),
            "90" | "quarter" => Ok(TimeWindow::Quarter),
            other => Err(format!("unknown time window '{other}' (use 7, 30 or 90)")),
        }
    }
}

/// Builds the historical + projected series for a goal and window.
pub struct SeriesGenerator {
    course: CourseConfig,
}

impl SeriesGenerator {
    pub fn new(course: CourseConfig) -> Self {
        Self { course }
    }

    /// Generate a series whose historical run ends today.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidWindow` for non-positive windows.
    pub fn generate(&self, goal: DailyGoal, window_days: i64) -> Result<Series, SeriesError> {
        self.generate_from(Utc::now().date_naive(), goal, window_days)
    }

    /// Generate with an explicit anchor date (deterministic for tests).
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidWindow` for non-positive windows.
    pub fn generate_from(
        &self,
        today: NaiveDate,
        goal: DailyGoal,
        window_days: i64,
    ) -> Result<Series, SeriesError> {
        if window_days <= 0 {
            return Err(SeriesError::InvalidWindow { days: window_days });
        }

        let total_course_xp = self.course.total_course_xp();

        // One point per day ending today, XP fixed at zero (account-reset
        // convention, not a simulation of real history).
        let historical = (0..window_days)
            .rev()
            .map(|i| self.point(today - Duration::days(i), 0, goal, PointKind::Historical, total_course_xp))
            .collect();

        let projection_days = (window_days * 2).min(PROJECTION_CAP_DAYS);
        let mut cumulative_xp: u64 = 0;
        let projected = (1..=projection_days)
            .map(|i| {
                cumulative_xp += goal.value() as u64;
                self.point(
                    today + Duration::days(i),
                    cumulative_xp,
                    goal,
                    PointKind::Projected,
                    total_course_xp,
                )
            })
            .collect();

        Ok(Series {
            historical,
            projected,
        })
    }

    fn point(
        &self,
        date: NaiveDate,
        xp: u64,
        goal: DailyGoal,
        kind: PointKind,
        total_course_xp: u64,
    ) -> SeriesPoint {
        SeriesPoint {
            date,
            xp,
            goal: goal.value(),
            kind,
            videos_completed: (xp / self.course.xp_per_video_with_quiz as u64) as u32,
            total_course_xp,
        }
    }
}
