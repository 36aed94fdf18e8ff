//! Mood tracking: the label scale, history series and the tracker that
//! ties submission, caching and charting together.

pub mod error;
pub mod history;
pub mod notify;
pub mod scale;
pub mod tracker;

pub use history::DaySeries;
pub use notify::{NotificationKind, Notifier};
pub use scale::MoodScale;
pub use tracker::{MoodTracker, TrackerConfig};
