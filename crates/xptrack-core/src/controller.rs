//! Projection orchestration.
//!
//! The controller reacts to user actions (goal change, preset pick,
//! window change, a change signal from another view) by re-running the
//! generator, the renderer and the income projector synchronously, with
//! no batching. Each refresh returns the summary numbers the host
//! display shows next to the chart.

use serde::Serialize;

use crate::chart::{ChartRenderer, DrawSurface};
use crate::error::Result;
use crate::events::ChangeSignal;
use crate::goal::GoalStore;
use crate::income::{IncomeProjection, IncomeProjector};
use crate::series::{SeriesGenerator, TimeWindow};
use crate::storage::Config;

/// Derived numbers pushed to the surrounding display after a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSummary {
    pub goal_xp_per_day: u32,
    pub window_days: i64,
    pub historical_days: usize,
    pub projected_days: usize,
    /// Cumulative XP at the end of the projection.
    pub projected_total_xp: u64,
    pub income: IncomeProjection,
}

/// Drives the series → chart / income pipeline over a [`GoalStore`].
pub struct ProjectionController<S: DrawSurface> {
    store: GoalStore,
    generator: SeriesGenerator,
    projector: IncomeProjector,
    renderer: ChartRenderer,
    surface: S,
    window: TimeWindow,
    last_seen_marker: i64,
}

impl<S: DrawSurface> ProjectionController<S> {
    pub fn new(store: GoalStore, config: &Config, window: TimeWindow, surface: S) -> Self {
        Self {
            store,
            generator: SeriesGenerator::new(config.course.clone()),
            projector: IncomeProjector::new(config.economy.clone(), config.course.clone()),
            renderer: ChartRenderer::new(config.chart.clone()),
            surface,
            window,
            last_seen_marker: 0,
        }
    }

    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Re-run the whole pipeline against the current store state.
    ///
    /// # Errors
    /// Returns an error if the store read or series generation fails.
    pub fn refresh(&mut self) -> Result<ProjectionSummary> {
        let goal = self.store.get()?;
        let series = self.generator.generate(goal, self.window.days())?;
        self.renderer.render(&series, &mut self.surface);
        let income = self.projector.project(goal);

        if let Some(signal) = self.store.signal()? {
            self.last_seen_marker = self.last_seen_marker.max(signal.marker);
        }

        Ok(ProjectionSummary {
            goal_xp_per_day: goal.value(),
            window_days: self.window.days(),
            historical_days: series.historical.len(),
            projected_days: series.projected.len(),
            projected_total_xp: series.projected.last().map(|p| p.xp).unwrap_or(0),
            income,
        })
    }

    /// Custom goal entry. A rejected value leaves the store and the last
    /// good render untouched.
    ///
    /// # Errors
    /// Returns `GoalError` for invalid values, or a pipeline error.
    pub fn on_goal_change(&mut self, value: i64) -> Result<ProjectionSummary> {
        self.store.set(value)?;
        self.refresh()
    }

    /// Preset pick from the goal dialog.
    ///
    /// # Errors
    /// Returns `GoalError::UnknownPreset` for ids not in the table.
    pub fn select_preset(&mut self, id: &str) -> Result<ProjectionSummary> {
        self.store.select_preset(id)?;
        self.refresh()
    }

    /// Period selector change.
    ///
    /// # Errors
    /// Returns an error if the refresh fails.
    pub fn on_window_change(&mut self, window: TimeWindow) -> Result<ProjectionSummary> {
        self.window = window;
        self.refresh()
    }

    /// React to a change signal observed from another view of the same
    /// persisted state. The view's own writes are ignored, as are
    /// markers at or below the last one already rendered.
    ///
    /// # Errors
    /// Returns an error if the refresh fails.
    pub fn on_cross_view_change(&mut self, signal: &ChangeSignal) -> Result<Option<ProjectionSummary>> {
        if signal.origin == self.store.origin() || signal.marker <= self.last_seen_marker {
            return Ok(None);
        }
        self.last_seen_marker = signal.marker;
        self.refresh().map(Some)
    }

    /// Poll the persisted signal and refresh if another view wrote.
    ///
    /// # Errors
    /// Returns an error if the store read or the refresh fails.
    pub fn poll_cross_view(&mut self) -> Result<Option<ProjectionSummary>> {
        match self.store.signal()? {
            Some(signal) => self.on_cross_view_change(&signal),
            None => Ok(None),
        }
    }
}
