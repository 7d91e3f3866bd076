//! Deadline classification for a loan's remaining days.

use serde::{Deserialize, Serialize};

/// Loans with more days left than this are comfortably on track.
pub const DUE_SOON_THRESHOLD_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// More than 30 days until the end date.
    OnTrack,
    /// End date within the next 30 days.
    DueSoon,
    /// End date is today or already passed.
    Overdue,
}

impl DeadlineStatus {
    pub fn from_days_remaining(days: i64) -> Self {
        if days > DUE_SOON_THRESHOLD_DAYS {
            DeadlineStatus::OnTrack
        } else if days > 0 {
            DeadlineStatus::DueSoon
        } else {
            DeadlineStatus::Overdue
        }
    }

    /// Badge colour used by the presentation layer.
    pub fn colour(self) -> &'static str {
        match self {
            DeadlineStatus::OnTrack => "green",
            DeadlineStatus::DueSoon => "yellow",
            DeadlineStatus::Overdue => "red",
        }
    }
}

/// Badge text: "N days left" while time remains, otherwise "Overdue".
pub fn deadline_label(days: i64) -> String {
    if days > 0 {
        format!("{days} days left")
    } else {
        "Overdue".to_string()
    }
}
