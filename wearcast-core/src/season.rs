//! Season and day/night rules.
//!
//! The prompt builder, the renderer and the weather view all read these, so
//! the month table and the night window live only here.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season for a zero-based month index (0 = January).
    pub fn from_month0(month0: u32) -> Self {
        match month0 {
            2..=4 => Season::Spring,
            5..=7 => Season::Summer,
            8..=10 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self::from_month0(date.month0())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Night is before 06:00 or from 18:00 on.
    pub fn from_hour(hour: u32) -> Self {
        if (6..18).contains(&hour) { DayPhase::Day } else { DayPhase::Night }
    }

    pub fn of<T: Timelike>(time: &T) -> Self {
        Self::from_hour(time.hour())
    }

    pub fn is_night(&self) -> bool {
        matches!(self, DayPhase::Night)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPhase::Day => "Day",
            DayPhase::Night => "Night",
        }
    }
}

impl std::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
