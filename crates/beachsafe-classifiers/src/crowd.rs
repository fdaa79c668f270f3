//! Rule-based crowd level estimate.
//!
//! A static profile table plus four multiplicative factors (season, peak
//! hours, weekend, popularity tier), thresholded into Low/Medium/High.

use beachsafe_core::CrowdLevel;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use std::fmt;

/// Popularity tier of a beach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityTier {
    VeryPopular,
    Popular,
    Relaxed,
    Average,
}

impl PopularityTier {
    /// Base crowd score before adjustments
    pub fn base_score(&self) -> f64 {
        match self {
            Self::VeryPopular => 0.9,
            Self::Popular => 0.7,
            Self::Relaxed | Self::Average => 0.5,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryPopular => "Very Popular",
            Self::Popular => "Popular",
            Self::Relaxed => "Relaxed",
            Self::Average => "Average",
        }
    }
}

/// Crowd profile of one beach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrowdProfile {
    pub tier: PopularityTier,
    /// Share of the normal crowd that visits during the monsoon
    pub monsoon_factor: f64,
    /// Busiest hours, inclusive on both ends
    pub peak_hours: (u32, u32),
    pub notes: &'static [&'static str],
}

const DEFAULT_PROFILE: CrowdProfile = CrowdProfile {
    tier: PopularityTier::Average,
    monsoon_factor: 0.3,
    peak_hours: (11, 16),
    notes: &[],
};

const PROFILES: &[(&str, CrowdProfile)] = &[
    (
        "Baga",
        CrowdProfile {
            tier: PopularityTier::VeryPopular,
            monsoon_factor: 0.15,
            peak_hours: (11, 18),
            notes: &[
                "Goa's most crowded beach in peak season",
                "Monsoon sees very few visitors (beach shacks closed)",
                "Weekends 50% busier than weekdays",
            ],
        },
    ),
    (
        "Calangute",
        CrowdProfile {
            tier: PopularityTier::VeryPopular,
            monsoon_factor: 0.2,
            peak_hours: (10, 17),
            notes: &[
                "Large beach but still crowded in season",
                "Monsoon sees some domestic tourists",
                "Water sports unavailable in monsoon",
            ],
        },
    ),
    (
        "Anjuna",
        CrowdProfile {
            tier: PopularityTier::Popular,
            monsoon_factor: 0.25,
            peak_hours: (12, 16),
            notes: &[
                "Flea market adds to crowds on Wednesdays",
                "Monsoon sees backpacker crowd",
                "Cliff areas dangerous in monsoon",
            ],
        },
    ),
    (
        "Palolem",
        CrowdProfile {
            tier: PopularityTier::VeryPopular,
            monsoon_factor: 0.3,
            peak_hours: (12, 16),
            notes: &[
                "Southern beaches retain some monsoon tourism",
                "Narrow beach feels crowded easily",
                "Many hotels remain open in monsoon",
            ],
        },
    ),
    (
        "Agonda",
        CrowdProfile {
            tier: PopularityTier::Relaxed,
            monsoon_factor: 0.4,
            peak_hours: (11, 15),
            notes: &[
                "Quietest of the southern beaches",
                "Monsoon sees 60% fewer visitors",
                "Best for solitude seekers",
            ],
        },
    ),
];

const ALTERNATIVES: &[(&str, &[&str])] = &[
    ("Baga", &["Sinquerim", "Candolim"]),
    ("Calangute", &["Betalbatim", "Sinquerim"]),
    ("Anjuna", &["Vagator", "Ashwem"]),
    ("Palolem", &["Agonda", "Patnem"]),
];

const DEFAULT_ALTERNATIVES: &[&str] = &["Colva", "Bogmalo"];

/// Crowd profile for a beach; unknown beaches get the average profile
pub fn profile_for(beach: &str) -> &'static CrowdProfile {
    PROFILES
        .iter()
        .find(|(name, _)| *name == beach)
        .map(|(_, profile)| profile)
        .unwrap_or(&DEFAULT_PROFILE)
}

/// Quieter nearby beaches
pub fn alternatives_for(beach: &str) -> &'static [&'static str] {
    ALTERNATIVES
        .iter()
        .find(|(name, _)| *name == beach)
        .map(|(_, alts)| *alts)
        .unwrap_or(DEFAULT_ALTERNATIVES)
}

/// Tourist season in Goa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// June to September
    Monsoon,
    /// November to February
    Peak,
    /// March, April, October
    Shoulder,
    /// May
    PreMonsoon,
}

impl Season {
    /// Season of a calendar month (1-12)
    pub fn of_month(month: u32) -> Self {
        match month {
            6..=9 => Self::Monsoon,
            11 | 12 | 1 | 2 => Self::Peak,
            3 | 4 | 10 => Self::Shoulder,
            _ => Self::PreMonsoon,
        }
    }

    /// Multiplier applied to the base score
    pub fn factor(&self, profile: &CrowdProfile) -> f64 {
        match self {
            Self::Monsoon => profile.monsoon_factor,
            Self::Peak => 1.0,
            Self::Shoulder => 0.6,
            Self::PreMonsoon => 0.4,
        }
    }

    /// Short description
    pub fn note(&self) -> &'static str {
        match self {
            Self::Monsoon => "Monsoon (Jun-Sep): Minimal crowds",
            Self::Peak => "Peak Season (Nov-Feb): Maximum crowds",
            Self::Shoulder => "Shoulder Season: Moderate crowds",
            Self::PreMonsoon => "Pre-Monsoon: Declining crowds",
        }
    }
}

/// Result of the crowd heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct CrowdEstimate {
    pub beach: String,
    pub level: CrowdLevel,
    /// Final score; > 0.7 is High, > 0.4 is Medium
    pub score: f64,
    pub season: Season,
    pub is_weekend: bool,
    pub in_peak_hours: bool,
    pub hour: u32,
    pub profile: CrowdProfile,
}

/// Estimate the crowd level at `beach` for the given local time
pub fn estimate_crowd(beach: &str, now: NaiveDateTime) -> CrowdEstimate {
    let profile = *profile_for(beach);
    let season = Season::of_month(now.month());
    let hour = now.hour();
    let is_weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);

    let (start, end) = profile.peak_hours;
    let in_peak_hours = (start..=end).contains(&hour);

    let time_factor = if in_peak_hours { 1.3 } else { 0.7 };
    let weekend_factor = if is_weekend { 1.5 } else { 1.0 };
    let score = profile.tier.base_score() * season.factor(&profile) * time_factor * weekend_factor;

    let level = if score > 0.7 {
        CrowdLevel::High
    } else if score > 0.4 {
        CrowdLevel::Medium
    } else {
        CrowdLevel::Low
    };

    CrowdEstimate {
        beach: beach.to_string(),
        level,
        score,
        season,
        is_weekend,
        in_peak_hours,
        hour,
        profile,
    }
}

/// Estimate the crowd level for the current local time
pub fn estimate_crowd_now(beach: &str) -> CrowdEstimate {
    estimate_crowd(beach, chrono::Local::now().naive_local())
}

/// Plain-text crowd analysis for display
impl fmt::Display for CrowdEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.profile.peak_hours;

        writeln!(f, "{} Crowd Analysis", self.beach)?;
        writeln!(
            f,
            "{} | {} | Current time: {}:00",
            self.season.note(),
            if self.is_weekend { "Weekend" } else { "Weekday" },
            self.hour
        )?;
        writeln!(f)?;
        writeln!(f, "Beach Profile:")?;
        writeln!(f, "- Category: {}", self.profile.tier.name())?;
        writeln!(f, "- Typical crowd hours: {start}:00-{end}:00")?;
        writeln!(
            f,
            "- Monsoon visitor rate: {}% of normal",
            (self.profile.monsoon_factor * 100.0).round() as u32
        )?;

        if !self.profile.notes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Key Observations:")?;
            for note in self.profile.notes {
                writeln!(f, "- {note}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        match self.level {
            CrowdLevel::High | CrowdLevel::Medium => writeln!(
                f,
                "- Best visiting hours: {}:00-{start}:00",
                start.saturating_sub(1)
            )?,
            CrowdLevel::Low => writeln!(f, "- Best visiting hours: Anytime")?,
        }
        writeln!(
            f,
            "- Nearby alternatives: {}",
            alternatives_for(&self.beach).join(", ")
        )
    }
}
