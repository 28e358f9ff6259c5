//! Threshold-based classification of margins, match rates and projections,
//! plus quality and status labels.
//!
//! Every function maps each boundary value to exactly one bucket.

use colored::{Color, ColoredString, Colorize};

/// Three-level traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
    /// Missing or non-numeric input
    Unknown,
}

impl Level {
    pub fn color(&self) -> Color {
        match self {
            Level::Low => Color::Red,
            Level::Medium => Color::Yellow,
            Level::High => Color::Green,
            Level::Unknown => Color::BrightBlack,
        }
    }

    /// Paint `text` in this level's color
    pub fn paint(&self, text: &str) -> ColoredString {
        text.color(self.color())
    }
}

/// Margin thresholds `(low, high)` per quality tier: below `low` is Low,
/// up to and including `high` is Medium, above is High.
pub fn margin_thresholds(qualite: &str) -> Option<(f64, f64)> {
    match Quality::parse(qualite)? {
        Quality::Pmv => Some((50.0, 60.0)),
        Quality::Pmq => Some((40.0, 50.0)),
        Quality::Oem => Some((25.0, 32.0)),
        Quality::Oe => Some((20.0, 25.0)),
    }
}

/// Classify a margin percentage for a quality tier
pub fn margin_level(value: Option<f64>, qualite: Option<&str>) -> Level {
    let (Some(value), Some(qualite)) = (value.filter(|v| !v.is_nan()), qualite) else {
        return Level::Unknown;
    };
    let Some((low, high)) = margin_thresholds(qualite) else {
        return Level::Unknown;
    };

    if value < low {
        Level::Low
    } else if value <= high {
        Level::Medium
    } else {
        Level::High
    }
}

/// Classify a reference match percentage: <65 Low, <80 Medium, else High
pub fn match_level(value: Option<f64>) -> Level {
    match value.filter(|v| !v.is_nan()) {
        None => Level::Unknown,
        Some(v) if v < 65.0 => Level::Low,
        Some(v) if v < 80.0 => Level::Medium,
        Some(_) => Level::High,
    }
}

/// Confidence of a sales projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionScore {
    Good,
    Fair,
    Poor,
}

impl ProjectionScore {
    /// `>= 0.7` good, `>= 0.4` fair, otherwise poor
    pub fn for_score(score: f64) -> Self {
        if score >= 0.7 {
            ProjectionScore::Good
        } else if score >= 0.4 {
            ProjectionScore::Fair
        } else {
            ProjectionScore::Poor
        }
    }

    pub fn level(&self) -> Level {
        match self {
            ProjectionScore::Good => Level::High,
            ProjectionScore::Fair => Level::Medium,
            ProjectionScore::Poor => Level::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectionScore::Good => "reliable",
            ProjectionScore::Fair => "moderate",
            ProjectionScore::Poor => "uncertain",
        }
    }
}

/// Product quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Oe,
    Oem,
    Pmq,
    Pmv,
}

impl Quality {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OE" => Some(Quality::Oe),
            "OEM" => Some(Quality::Oem),
            "PMQ" => Some(Quality::Pmq),
            "PMV" => Some(Quality::Pmv),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Oe => "OE",
            Quality::Oem => "OEM",
            Quality::Pmq => "PMQ",
            Quality::Pmv => "PMV",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Quality::Oe => Color::Blue,
            Quality::Oem => Color::Green,
            Quality::Pmq => Color::Yellow,
            Quality::Pmv => Color::Magenta,
        }
    }
}

/// Colored quality badge; unknown tiers are shown as-is, dimmed
pub fn quality_badge(qualite: Option<&str>) -> ColoredString {
    match qualite {
        Some(q) => match Quality::parse(q) {
            Some(quality) => quality.label().color(quality.color()).bold(),
            None => q.dimmed(),
        },
        None => "?".dimmed(),
    }
}

/// Human label of a product status code
pub fn status_label(statut: Option<i64>) -> String {
    match statut {
        Some(0) => "RAS".to_string(),
        Some(1) => "Purchase forbidden".to_string(),
        Some(2) => "Sale forbidden".to_string(),
        Some(8) => "Purchase/sale forbidden".to_string(),
        Some(code) => format!("Code {}", code),
        None => "-".to_string(),
    }
}

pub fn status_color(statut: Option<i64>) -> Color {
    match statut {
        Some(0) => Color::Green,
        Some(1) => Color::Yellow,
        Some(2) => Color::BrightRed,
        Some(8) => Color::Magenta,
        _ => Color::BrightBlack,
    }
}
