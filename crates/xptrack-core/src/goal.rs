//! Daily XP goal: validated value, fixed preset table, persisted store.
//!
//! The goal is the single scalar driving the whole projection pipeline.
//! Exactly one live value exists at a time; no history of past goals is
//! kept. Every successful write bumps a monotonic change marker so other
//! open views of the same database notice the change.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GoalError, Result};
use crate::events::{ChangeSignal, Event};
use crate::storage::Database;

/// Lowest accepted daily goal, XP/day.
pub const MIN_DAILY_GOAL: i64 = 1;
/// Highest accepted daily goal, XP/day.
pub const MAX_DAILY_GOAL: i64 = 1000;
/// Goal written on first access when nothing is persisted yet.
pub const DEFAULT_DAILY_GOAL: u32 = 100;

const KEY_DAILY_GOAL: &str = "goal.daily_xp";
const KEY_CHANGED_AT: &str = "goal.changed_at";
const KEY_ORIGIN: &str = "goal.origin";

/// A validated daily XP goal in `[1, 1000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyGoal(u32);

impl DailyGoal {
    /// Validate a raw value into a goal.
    ///
    /// # Errors
    /// Returns `GoalError::OutOfRange` outside `[1, 1000]`.
    pub fn new(value: i64) -> Result<Self, GoalError> {
        if (MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(GoalError::OutOfRange { value })
        }
    }

    /// Parse free-form user input. Strictly whole numbers; "250.0" and
    /// "2e2" are rejected the same as "abc".
    ///
    /// # Errors
    /// Returns `GoalError::NotAnInteger` for non-integer input, or
    /// `GoalError::OutOfRange` for integers outside `[1, 1000]`.
    pub fn parse(raw: &str) -> Result<Self, GoalError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| GoalError::NotAnInteger {
                input: raw.to_string(),
            })?;
        Self::new(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self(DEFAULT_DAILY_GOAL)
    }
}

impl std::fmt::Display for DailyGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} XP/day", self.0)
    }
}

/// One row of the fixed preset table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GoalPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub xp_per_day: u32,
}

/// The fixed preset table shown by the goal picker.
pub const GOAL_PRESETS: [GoalPreset; 5] = [
    GoalPreset {
        id: "basic",
        label: "Basic",
        xp_per_day: 50,
    },
    GoalPreset {
        id: "casual",
        label: "Casual",
        xp_per_day: 100,
    },
    GoalPreset {
        id: "regular",
        label: "Regular",
        xp_per_day: 200,
    },
    GoalPreset {
        id: "serious",
        label: "Serious",
        xp_per_day: 350,
    },
    GoalPreset {
        id: "insane",
        label: "Insane",
        xp_per_day: 500,
    },
];

impl GoalPreset {
    /// Look up a preset by id, case-insensitively.
    pub fn find(id: &str) -> Option<&'static GoalPreset> {
        GOAL_PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }
}

type Subscriber = Box<dyn Fn(&Event)>;

/// Persisted store owning the daily goal value.
///
/// Writers publish a monotonic change marker next to the value; other
/// live views poll [`GoalStore::signal`] (or subscribe in-process) so two
/// views of the goal never silently diverge. Last write wins.
pub struct GoalStore {
    db: Database,
    origin: String,
    subscribers: Vec<Subscriber>,
}

impl GoalStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            origin: format!("view-{}", Uuid::new_v4()),
            subscribers: Vec::new(),
        }
    }

    /// Identity of this view, attached to every signal it writes.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Current goal, defaulting to 100 on first access.
    ///
    /// The default is written back so other views of the same database
    /// agree on the value. An unparsable stored value is treated the same
    /// as a missing one (last-write-wins store; there is nothing better
    /// to recover to).
    ///
    /// # Errors
    /// Returns an error if the database read or write-back fails.
    pub fn get(&self) -> Result<DailyGoal> {
        let stored = self
            .db
            .kv_get(KEY_DAILY_GOAL)?
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|v| DailyGoal::new(v).ok());

        match stored {
            Some(goal) => Ok(goal),
            None => {
                let goal = DailyGoal::default();
                self.db.kv_set(KEY_DAILY_GOAL, &goal.value().to_string())?;
                self.notify(&Event::GoalDefaulted {
                    value: goal.value(),
                    at: Utc::now(),
                });
                Ok(goal)
            }
        }
    }

    /// Set the goal to a validated value, persist it, and publish the
    /// change. Rejection leaves the stored value untouched.
    ///
    /// # Errors
    /// Returns `GoalError::OutOfRange` (via `CoreError::Goal`) for values
    /// outside `[1, 1000]`, or a database error if persisting fails.
    pub fn set(&self, value: i64) -> Result<DailyGoal> {
        let goal = DailyGoal::new(value)?;
        let previous = self.get()?;

        self.db.kv_set(KEY_DAILY_GOAL, &goal.value().to_string())?;
        let marker = self.bump_marker()?;

        self.notify(&Event::GoalChanged {
            value: goal.value(),
            previous: previous.value(),
            marker,
            origin: self.origin.clone(),
            at: Utc::now(),
        });
        Ok(goal)
    }

    /// Free-form input path. Parses a strict integer and delegates to
    /// [`GoalStore::set`]; custom input gets no looser validation than
    /// presets do.
    ///
    /// # Errors
    /// Same as [`GoalStore::set`], plus `GoalError::NotAnInteger`.
    pub fn set_from_input(&self, raw: &str) -> Result<DailyGoal> {
        let goal = DailyGoal::parse(raw)?;
        self.set(goal.value() as i64)
    }

    /// Select a preset by id and delegate to [`GoalStore::set`].
    ///
    /// # Errors
    /// Returns `GoalError::UnknownPreset` for ids not in the table.
    pub fn select_preset(&self, id: &str) -> Result<DailyGoal> {
        let preset = GoalPreset::find(id).ok_or_else(|| GoalError::UnknownPreset {
            id: id.to_string(),
        })?;
        self.set(preset.xp_per_day as i64)
    }

    /// The persisted cross-view change signal, if any write has happened.
    ///
    /// # Errors
    /// Returns an error if the database read fails.
    pub fn signal(&self) -> Result<Option<ChangeSignal>> {
        let marker = match self.db.kv_get(KEY_CHANGED_AT)? {
            Some(raw) => match raw.parse::<i64>() {
                Ok(m) => m,
                Err(_) => return Ok(None),
            },
            None => return Ok(None),
        };
        let origin = self.db.kv_get(KEY_ORIGIN)?.unwrap_or_default();
        Ok(Some(ChangeSignal { marker, origin }))
    }

    /// Register an in-process observer for goal events.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    // Monotonic even if the wall clock steps backwards between writes.
    fn bump_marker(&self) -> Result<i64> {
        let last = self
            .db
            .kv_get(KEY_CHANGED_AT)?
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(0);
        let marker = Utc::now().timestamp_millis().max(last + 1);
        self.db.kv_set(KEY_CHANGED_AT, &marker.to_string())?;
        self.db.kv_set(KEY_ORIGIN, &self.origin)?;
        Ok(marker)
    }

    fn notify(&self, event: &Event) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::error::CoreError;

    fn store() -> GoalStore {
        GoalStore::new(Database::open_memory().unwrap())
    }

    #[test]
    fn get_defaults_to_100_on_first_access() {
        let store = store();
        assert_eq!(store.get().unwrap().value(), 100);
    }

    #[test]
    fn set_accepts_range_bounds() {
        let store = store();
        assert_eq!(store.set(1).unwrap().value(), 1);
        assert_eq!(store.set(1000).unwrap().value(), 1000);
    }

    #[test]
    fn set_rejects_out_of_range_without_state_change() {
        let store = store();
        store.set(250).unwrap();
        for bad in [0, -5, 1001, i64::MAX] {
            let err = store.set(bad).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Goal(GoalError::OutOfRange { .. })
            ));
        }
        assert_eq!(store.get().unwrap().value(), 250);
    }

    #[test]
    fn set_from_input_rejects_non_integers() {
        let store = store();
        for bad in ["12.5", "abc", "1e3", ""] {
            let err = store.set_from_input(bad).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Goal(GoalError::NotAnInteger { .. })
            ));
        }
        assert_eq!(store.get().unwrap().value(), 100);
    }

    #[test]
    fn preset_table_matches_product_tiers() {
        let tiers: Vec<(&str, u32)> = GOAL_PRESETS.iter().map(|p| (p.id, p.xp_per_day)).collect();
        assert_eq!(
            tiers,
            vec![
                ("basic", 50),
                ("casual", 100),
                ("regular", 200),
                ("serious", 350),
                ("insane", 500),
            ]
        );
    }

    #[test]
    fn select_preset_sets_exact_value() {
        let store = store();
        assert_eq!(store.select_preset("insane").unwrap().value(), 500);
        assert_eq!(store.get().unwrap().value(), 500);
        // Case-insensitive lookup, same as the UI picker.
        assert_eq!(store.select_preset("Casual").unwrap().value(), 100);
    }

    #[test]
    fn select_preset_rejects_unknown_id() {
        let store = store();
        let err = store.select_preset("legendary").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Goal(GoalError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn marker_is_monotonic_across_writes() {
        let store = store();
        store.set(100).unwrap();
        let first = store.signal().unwrap().unwrap().marker;
        store.set(200).unwrap();
        let second = store.signal().unwrap().unwrap().marker;
        assert!(second > first);
    }

    #[test]
    fn signal_carries_writer_origin() {
        let store = store();
        store.set(300).unwrap();
        let signal = store.signal().unwrap().unwrap();
        assert_eq!(signal.origin, store.origin());
    }

    #[test]
    fn subscribers_observe_changes() {
        let mut store = store();
        let seen: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |event| {
            if let Event::GoalChanged { value, .. } = event {
                sink.borrow_mut().push(*value);
            }
        }));
        store.set(150).unwrap();
        store.select_preset("serious").unwrap();
        assert_eq!(*seen.borrow(), vec![150, 350]);
    }

    #[test]
    fn corrupt_stored_value_resets_to_default() {
        let db = Database::open_memory().unwrap();
        db.kv_set("goal.daily_xp", "not-a-number").unwrap();
        let store = GoalStore::new(db);
        assert_eq!(store.get().unwrap().value(), 100);
    }

    proptest! {
        #[test]
        fn every_valid_goal_round_trips(value in 1i64..=1000) {
            let store = store();
            store.set(value).unwrap();
            prop_assert_eq!(store.get().unwrap().value() as i64, value);
        }

        #[test]
        fn every_invalid_goal_is_rejected(value in prop_oneof![
            i64::MIN..=0,
            1001i64..=i64::MAX,
        ]) {
            let store = store();
            store.set(777).unwrap();
            prop_assert!(store.set(value).is_err());
            prop_assert_eq!(store.get().unwrap().value(), 777);
        }
    }
}
