//! Domain constant tables for the ENCLOSE rules.
//!
//! Thresholds and depth-band heuristics come from coaching experience with
//! deep equalization plateaus. They live here as data, not inline logic, so
//! the coaching lore stays reviewable in one place.

/// Depth-band equalization plateau heuristic.
///
/// When `eqFailureDepth` falls inside a band, the band's diagnosis replaces
/// the generic one and its causes/recommendations/drills/flags are appended.
pub struct EqPlateauBand {
    pub min_depth_m: f64,
    pub max_depth_m: f64,
    pub diagnosis: &'static str,
    pub root_causes: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub training_drills: &'static [&'static str],
    pub safety_flags: &'static [&'static str],
}

/// Ordered plateau bands; first matching band wins.
pub const EQ_PLATEAU_BANDS: &[EqPlateauBand] = &[
    EqPlateauBand {
        min_depth_m: 55.0,
        max_depth_m: 62.0,
        diagnosis: "58m plateau - classic mouthfill timing issue",
        root_causes: &[
            "Mouthfill taken too late or too small",
            "Soft palate misrouting air",
        ],
        recommendations: &[
            "Take the mouthfill earlier (30-40m)",
            "Practice soft palate control",
        ],
        training_drills: &[],
        safety_flags: &[],
    },
    EqPlateauBand {
        min_depth_m: 68.0,
        max_depth_m: 85.0,
        diagnosis: "70-82m plateau - pocket management failure",
        root_causes: &[
            "Glottis micro-leaks",
            "Insufficient cheek recoil",
            "Narcosis interference",
        ],
        recommendations: &[
            "Strengthen glottic control",
            "Improve cheek counter-pressure",
        ],
        training_drills: &["Glottis lock holds", "Cheek resistance training"],
        safety_flags: &[],
    },
    EqPlateauBand {
        min_depth_m: 85.0,
        max_depth_m: 102.0,
        diagnosis: "88-98m plateau - technique breakdown under pressure",
        root_causes: &[
            "Equalization stride collapse",
            "Neck extension",
            "Tongue retraction compensation",
        ],
        recommendations: &[
            "Keep a neutral neck",
            "Use smaller, more frequent equalization doses",
        ],
        training_drills: &[],
        safety_flags: &["Check for tongue-soft-palate lock compensation"],
    },
];

/// Find the plateau band covering an equalization failure depth, if any.
pub fn plateau_band_for(depth_m: f64) -> Option<&'static EqPlateauBand> {
    EQ_PLATEAU_BANDS
        .iter()
        .find(|b| depth_m >= b.min_depth_m && depth_m <= b.max_depth_m)
}

/// Substrings that mark an O2 symptom as serious (blackout territory).
/// Matching is literal and case-sensitive, matching what callers send.
pub const SERIOUS_O2_MARKERS: &[&str] = &["blackout", "LMC", "visual"];

/// Narcosis deeper than this gets a medical-evaluation safety flag.
pub const NARCOSIS_MEDICAL_DEPTH_M: f64 = 40.0;

/// Contractions before this fraction of dive time trigger the CO2 check.
pub const EARLY_CONTRACTION_RATIO: f64 = 0.33;

/// Contractions before this fraction escalate the CO2 check to high priority.
pub const HIGH_CONTRACTION_RATIO: f64 = 0.2;

/// Contractions before this fraction add a medical safety flag.
pub const VERY_EARLY_CONTRACTION_RATIO: f64 = 0.15;

/// Leg burn shallower than this fraction of reached depth triggers the check.
pub const EARLY_LEG_BURN_RATIO: f64 = 0.5;
