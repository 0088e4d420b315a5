//! Utilization status banding shown on cards and in the legend.

use serde::{Deserialize, Serialize};

/// Urgency band for a utilization percentage. Thresholds are tuned for the
/// wall-TV view: 90 / 70 / 40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    Critical,
    Warning,
    Ok,
    Ample,
}

impl UtilizationStatus {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 90.0 {
            Self::Critical
        } else if pct >= 70.0 {
            Self::Warning
        } else if pct >= 40.0 {
            Self::Ok
        } else {
            Self::Ample
        }
    }

    /// Banner text on the card status strip.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "POTENCIALMENTE AGOTADO",
            Self::Warning => "MODERADO",
            Self::Ok => "DISPONIBLE",
            Self::Ample => "MUY DISPONIBLE",
        }
    }

    /// Accent color for bars and percentages.
    pub fn color(self) -> &'static str {
        match self {
            Self::Critical => "#ea4335",
            Self::Warning => "#f9ab00",
            Self::Ok => "#34a853",
            Self::Ample => "#0b8043",
        }
    }

    /// CSS class carried by the summary card.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Critical => "urgent",
            Self::Warning => "warning",
            Self::Ok => "ok",
            Self::Ample => "available",
        }
    }
}
