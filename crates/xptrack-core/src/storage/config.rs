//! TOML-based application configuration.
//!
//! Holds the product-tunable constants of the projection engine:
//! - Default daily goal
//! - Chart surface layout and theme
//! - Economy constants (target monthly income, XP-to-income ratio)
//! - Course catalog totals (feed per-point video counts and the quiz
//!   bonus blend)
//!
//! The economy and course numbers are product decisions, not derived
//! truths; changing them here changes tested behavior.
//!
//! Configuration is stored at `~/.config/xptrack/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Goal defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_xp")]
    pub default_daily_xp: u32,
}

/// Chart surface layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// Left/right/bottom padding around the plot area, in surface units.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Top padding; reserved for the host's title/header area.
    #[serde(default = "default_top_padding")]
    pub top_padding: f64,
    #[serde(default = "default_label_text_size")]
    pub label_text_size: f64,
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Chart colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_grid")]
    pub grid: String,
    #[serde(default = "default_grid_label")]
    pub grid_label: String,
    #[serde(default = "default_income_label")]
    pub income_label: String,
    #[serde(default = "default_baseline")]
    pub baseline: String,
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(default = "default_annotation_bg")]
    pub annotation_bg: String,
    #[serde(default = "default_annotation_text")]
    pub annotation_text: String,
    #[serde(default = "default_date_label")]
    pub date_label: String,
}

/// Income projection constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default = "default_target_monthly_income")]
    pub target_monthly_income: f64,
    #[serde(default = "default_xp_to_income_ratio")]
    pub xp_to_income_ratio: f64,
}

impl EconomyConfig {
    /// XP that must be earned to reach the monthly income target.
    pub fn xp_required_for_target(&self) -> u64 {
        (self.target_monthly_income / self.xp_to_income_ratio).round() as u64
    }
}

/// Course-wide catalog totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default = "default_video_count")]
    pub video_count: u32,
    /// XP awarded for one video together with its quiz.
    #[serde(default = "default_xp_per_video_with_quiz")]
    pub xp_per_video_with_quiz: u32,
    /// The quiz-bonus share of a video's XP.
    #[serde(default = "default_quiz_xp_per_video")]
    pub quiz_xp_per_video: u32,
    #[serde(default = "default_subsection_count")]
    pub subsection_count: u32,
    #[serde(default = "default_subsection_quiz_xp")]
    pub subsection_quiz_xp: u32,
}

impl CourseConfig {
    /// Total XP available across the whole course.
    pub fn total_course_xp(&self) -> u64 {
        self.video_count as u64 * self.xp_per_video_with_quiz as u64
            + self.subsection_count as u64 * self.subsection_quiz_xp as u64
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/xptrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub course: CourseConfig,
}

// Default functions
fn default_daily_xp() -> u32 {
    100
}
fn default_chart_width() -> u32 {
    800
}
fn default_chart_height() -> u32 {
    400
}
fn default_padding() -> f64 {
    48.0
}
fn default_top_padding() -> f64 {
    32.0
}
fn default_label_text_size() -> f64 {
    12.0
}
fn default_background() -> String {
    "#0f172a".into()
}
fn default_grid() -> String {
    "#1e293b".into()
}
fn default_grid_label() -> String {
    "#64748b".into()
}
fn default_income_label() -> String {
    "#22c55e".into()
}
fn default_baseline() -> String {
    "#475569".into()
}
fn default_projection() -> String {
    "#3b82f6".into()
}
fn default_annotation_bg() -> String {
    "#1e293b".into()
}
fn default_annotation_text() -> String {
    "#e2e8f0".into()
}
fn default_date_label() -> String {
    "#64748b".into()
}
fn default_target_monthly_income() -> f64 {
    10_000.0
}
fn default_xp_to_income_ratio() -> f64 {
    0.1
}
fn default_video_count() -> u32 {
    40
}
fn default_xp_per_video_with_quiz() -> u32 {
    150
}
fn default_quiz_xp_per_video() -> u32 {
    50
}
fn default_subsection_count() -> u32 {
    12
}
fn default_subsection_quiz_xp() -> u32 {
    300
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            default_daily_xp: default_daily_xp(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            padding: default_padding(),
            top_padding: default_top_padding(),
            label_text_size: default_label_text_size(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            grid: default_grid(),
            grid_label: default_grid_label(),
            income_label: default_income_label(),
            baseline: default_baseline(),
            projection: default_projection(),
            annotation_bg: default_annotation_bg(),
            annotation_text: default_annotation_text(),
            date_label: default_date_label(),
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            target_monthly_income: default_target_monthly_income(),
            xp_to_income_ratio: default_xp_to_income_ratio(),
        }
    }
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            video_count: default_video_count(),
            xp_per_video_with_quiz: default_xp_per_video_with_quiz(),
            quiz_xp_per_video: default_quiz_xp_per_video(),
            subsection_count: default_subsection_count(),
            subsection_quiz_xp: default_subsection_quiz_xp(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(String::new()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/xptrack"),
                message: e.to_string(),
            })?
            .join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reject configurations the engine cannot run on.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.economy.xp_to_income_ratio <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "economy.xp_to_income_ratio".into(),
                message: "must be positive".into(),
            });
        }
        if self.course.xp_per_video_with_quiz == 0 {
            return Err(ConfigError::InvalidValue {
                key: "course.xp_per_video_with_quiz".into(),
                message: "must be positive".into(),
            });
        }
        if !(1..=1000).contains(&self.goal.default_daily_xp) {
            return Err(ConfigError::InvalidValue {
                key: "goal.default_daily_xp".into(),
                message: "must be in 1..=1000".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist. Returns error if the key is
    /// unknown or the new configuration fails validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.goal.default_daily_xp, 100);
        assert_eq!(parsed.chart.width, 800);
        assert_eq!(parsed.economy.xp_to_income_ratio, 0.1);
    }

    #[test]
    fn xp_required_for_target_from_defaults() {
        let economy = EconomyConfig::default();
        assert_eq!(economy.xp_required_for_target(), 100_000);
    }

    #[test]
    fn total_course_xp_from_defaults() {
        let course = CourseConfig::default();
        // 40 videos * 150 XP + 12 subsections * 300 XP
        assert_eq!(course.total_course_xp(), 9_600);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("goal.default_daily_xp").as_deref(), Some("100"));
        assert_eq!(cfg.get("chart.theme.projection").as_deref(), Some("#3b82f6"));
        assert!(cfg.get("chart.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "goal.default_daily_xp", "200").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "goal.default_daily_xp").unwrap(),
            &serde_json::Value::Number(200.into())
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_string() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "chart.theme.projection", "#FF5733").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "chart.theme.projection").unwrap(),
            &serde_json::Value::String("#FF5733".to_string())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "chart.nonexistent", "1");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_nonpositive_ratio() {
        let mut cfg = Config::default();
        cfg.economy.xp_to_income_ratio = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_default_goal() {
        let mut cfg = Config::default();
        cfg.goal.default_daily_xp = 0;
        assert!(cfg.validate().is_err());
        cfg.goal.default_daily_xp = 1001;
        assert!(cfg.validate().is_err());
    }
}
