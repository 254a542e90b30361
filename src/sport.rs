//! Sport kinds reported by activity trackers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of sport an activity was recorded as.
///
/// The named variants are the sports the dashboard assigns fixed chart
/// colors. `Other` keeps the tracker's original string intact so activities
/// with unrecognized sports still group, filter and export correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sport {
    /// Outdoor cycling.
    Ride,
    /// Running.
    Run,
    /// Walking.
    Walk,
    /// Hiking.
    Hike,
    /// Indoor/trainer cycling.
    VirtualRide,
    /// Any sport string the dashboard has no fixed styling for.
    Other(String),
}

impl Sport {
    /// The sport name as stored in the database and shown in the UI.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ride => "Ride",
            Self::Run => "Run",
            Self::Walk => "Walk",
            Self::Hike => "Hike",
            Self::VirtualRide => "VirtualRide",
            Self::Other(name) => name,
        }
    }

    /// The fill color for this sport's series in the stacked bar chart.
    pub fn chart_color(&self) -> &'static str {
        match self {
            Self::Ride => "rgba(54, 162, 235, 0.7)",
            Self::Run => "rgba(255, 99, 132, 0.7)",
            Self::Walk => "rgba(75, 192, 192, 0.7)",
            Self::Hike => "rgba(255, 159, 64, 0.7)",
            Self::VirtualRide => "rgba(153, 102, 255, 0.7)",
            Self::Other(_) => "rgba(100, 100, 100, 0.5)",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Sport {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Ride" => Self::Ride,
            "Run" => Self::Run,
            "Walk" => Self::Walk,
            "Hike" => Self::Hike,
            "VirtualRide" => Self::VirtualRide,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Sport {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Sport> for String {
    fn from(sport: Sport) -> Self {
        sport.as_str().to_owned()
    }
}
