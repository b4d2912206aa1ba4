//! Data types for ENCLOSE diagnostics.

use serde::{Deserialize, Serialize};

/// Freediving discipline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Discipline {
    #[default]
    #[serde(rename = "CWT")]
    Cwt,
    #[serde(rename = "CNF")]
    Cnf,
    #[serde(rename = "FIM")]
    Fim,
    Static,
    Dynamic,
}

/// How equalization failed during the descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EqFailureType {
    CantEqualize,
    Painful,
    AirRanOut,
    SwallowedMouthfill,
}

/// Type of barotrauma reported after the dive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqueezeType {
    Ear,
    Sinus,
    Lung,
    Throat,
}

impl SqueezeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ear => "ear",
            Self::Sinus => "sinus",
            Self::Lung => "lung",
            Self::Throat => "throat",
        }
    }
}

/// Head posture on descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NeckPosition {
    Extended,
    Neutral,
    Tucked,
}

/// Overall descent quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescentStyle {
    Tense,
    Relaxed,
    Rushed,
}

/// One completed dive's observed parameters and reported symptoms.
///
/// Optional fields mean "not observed / not reported", not "false". The
/// engine does no validation; callers own input sanitization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivePerformanceData {
    /// Planned depth in meters
    pub target_depth_m: f64,
    /// Actual depth reached in meters
    pub reached_depth_m: f64,
    /// Total dive duration in seconds
    pub dive_time_seconds: f64,
    /// Discipline performed
    pub discipline: Discipline,

    /// Depth (m) at which equalization failed
    #[serde(default)]
    pub eq_failure_depth: Option<f64>,
    /// Equalization failure mode
    #[serde(default)]
    pub eq_failure_type: Option<EqFailureType>,
    /// Seconds into the dive when diaphragm contractions began
    #[serde(default)]
    pub contractions_start_time: Option<f64>,
    /// Depth (m) at which leg fatigue/burn was felt
    #[serde(default)]
    pub leg_burn_depth: Option<f64>,
    /// Depth (m) at which narcosis symptoms appeared
    #[serde(default)]
    pub narcosis_depth: Option<f64>,
    /// Free-text narcosis symptom tags
    #[serde(default)]
    pub narcosis_symptoms: Option<Vec<String>>,
    /// Free-text O2 symptom tags (may include blackout/LMC/visual markers)
    #[serde(default)]
    pub o2_symptoms: Option<Vec<String>>,
    /// Type of squeeze reported
    #[serde(default)]
    pub squeeze_type: Option<SqueezeType>,
    /// Free-text equipment problem tags
    #[serde(default)]
    pub equipment_issues: Option<Vec<String>>,

    // Technique observations, part of the input contract but unused by the
    // current diagnostic rules.
    #[serde(default)]
    pub mouthfill_depth: Option<f64>,
    #[serde(default)]
    pub mouthfill_size: Option<f64>,
    #[serde(default)]
    pub mouthfill_lost: Option<bool>,

    /// Descent posture
    #[serde(default)]
    pub neck_position: Option<NeckPosition>,
    /// Descent quality
    #[serde(default)]
    pub descent_style: Option<DescentStyle>,
}

/// ENCLOSE diagnostic category letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    /// Equalization
    E,
    /// Narcosis
    N,
    /// CO2 tolerance
    C,
    /// Leg fatigue
    L,
    /// O2 tolerance
    O,
    /// Squeeze
    S,
    /// Equipment
    E2,
}

/// Urgency ranking for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Fixed sort rank: critical sorts first, low sorts last.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// One diagnostic finding, independent of other findings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncloseAssessment {
    pub category: Category,
    pub priority: Priority,
    pub diagnosis: String,
    pub root_causes: Vec<String>,
    pub recommendations: Vec<String>,
    pub training_drills: Vec<String>,
    pub next_steps: Vec<String>,
    pub safety_flags: Vec<String>,
}

/// Response payload from the diagnose endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseResponse {
    /// Tool identifier
    pub tool: &'static str,
    /// Tool version
    pub tool_version: &'static str,
    /// Assessments sorted by priority (critical first)
    pub assessments: Vec<EncloseAssessment>,
    /// Number of assessments produced
    pub assessment_count: usize,
    /// SHA256 hash of input
    pub input_hash: String,
}
