//! # XPTrack Core Library
//!
//! Core business logic for the XPTrack goal projection and progress
//! visualization engine. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with the host
//! GUI being a thin layer that replays the engine's drawing commands.
//!
//! ## Architecture
//!
//! - **Goal Store**: the single persisted daily-XP goal, validated and
//!   published to other views through a monotonic change signal
//! - **Series Generator**: historical window (fixed at zero XP by
//!   product convention) plus the forward projection at the goal rate
//! - **Income Projector**: monetary framing of XP volume against the
//!   fixed monthly income target
//! - **Chart Renderer**: axis scaling, gridlines, dual-unit Y labels,
//!   dashed projection line and interval annotations, issued as drawing
//!   commands against an abstract surface
//! - **Storage**: SQLite-backed goal persistence and TOML-based
//!   configuration of the product-tunable constants
//!
//! ## Key Components
//!
//! - [`GoalStore`]: validated, persisted daily goal with change signals
//! - [`SeriesGenerator`]: pure series construction per (goal, window)
//! - [`IncomeProjector`]: derived income metrics
//! - [`ChartRenderer`]: drawing-command chart pipeline
//! - [`ProjectionController`]: synchronous orchestration of the above

pub mod chart;
pub mod controller;
pub mod error;
pub mod events;
pub mod goal;
pub mod income;
pub mod series;
pub mod storage;

pub use chart::{
    AsciiSurface, ChartRenderer, DrawCommand, DrawSurface, RecordingSurface, Stroke,
};
pub use controller::{ProjectionController, ProjectionSummary};
pub use error::{ConfigError, CoreError, DatabaseError, GoalError, Result, SeriesError};
pub use events::{ChangeSignal, Event};
pub use goal::{DailyGoal, GoalPreset, GoalStore, GOAL_PRESETS};
pub use income::{IncomeProjection, IncomeProjector};
pub use series::{PointKind, Series, SeriesGenerator, SeriesPoint, TimeWindow};
pub use storage::{data_dir, Config, Database};
