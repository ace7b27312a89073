//! Rating bands on the 100-point scale.

use std::fmt;

/// Score range a review falls into. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatingBand {
    VeryPoor,
    Poor,
    Average,
    Good,
    VeryGood,
    Excellent,
    Perfect,
}

impl RatingBand {
    pub const ALL: [RatingBand; 7] = [
        Self::VeryPoor,
        Self::Poor,
        Self::Average,
        Self::Good,
        Self::VeryGood,
        Self::Excellent,
        Self::Perfect,
    ];

    /// Band for a review score. Scores under 60 are `VeryPoor`, 95 and up
    /// are `Perfect`.
    pub fn from_points(points: u32) -> Self {
        match points {
            ..60 => Self::VeryPoor,
            60..70 => Self::Poor,
            70..80 => Self::Average,
            80..85 => Self::Good,
            85..90 => Self::VeryGood,
            90..95 => Self::Excellent,
            _ => Self::Perfect,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryPoor => "50-59 (Very Poor)",
            Self::Poor => "60-69 (Poor)",
            Self::Average => "70-79 (Average)",
            Self::Good => "80-84 (Good)",
            Self::VeryGood => "85-89 (Very Good)",
            Self::Excellent => "90-94 (Excellent)",
            Self::Perfect => "95-100 (Perfect)",
        }
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
