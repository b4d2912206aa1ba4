//! ENCLOSE rule-based diagnostic logic.
//!
//! Maps one dive's observed symptoms (equalization failures, narcosis, early
//! contractions, leg fatigue, O2 symptoms, squeezes, equipment issues) to
//! categorized root-cause assessments. Pure function, no I/O, safe to call
//! from any number of concurrent handlers.

use super::models::{
    Category, DivePerformanceData, EncloseAssessment, EqFailureType, NeckPosition, Priority,
    SqueezeType,
};
use super::tables::{
    plateau_band_for, EARLY_CONTRACTION_RATIO, EARLY_LEG_BURN_RATIO, HIGH_CONTRACTION_RATIO,
    NARCOSIS_MEDICAL_DEPTH_M, SERIOUS_O2_MARKERS, VERY_EARLY_CONTRACTION_RATIO,
};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Run the seven ENCLOSE category checks (E, N, C, L, O, S, E2) and return
/// the triggered assessments sorted by priority, critical first.
///
/// An empty result means no problems were detected, not an error. Categories
/// whose symptoms were not reported contribute nothing.
pub fn diagnose(data: &DivePerformanceData) -> Vec<EncloseAssessment> {
    let mut assessments = Vec::new();

    if let Some(a) = check_equalization(data) {
        assessments.push(a);
    }
    if let Some(a) = check_narcosis(data) {
        assessments.push(a);
    }
    if let Some(a) = check_co2_tolerance(data) {
        assessments.push(a);
    }
    if let Some(a) = check_leg_fatigue(data) {
        assessments.push(a);
    }
    if let Some(a) = check_o2_tolerance(data) {
        assessments.push(a);
    }
    if let Some(a) = check_squeeze(data) {
        assessments.push(a);
    }
    if let Some(a) = check_equipment(data) {
        assessments.push(a);
    }

    // Stable sort keeps category evaluation order among equal priorities.
    assessments.sort_by_key(|a| a.priority.rank());
    assessments
}

/// E - Equalization failures, with depth-band plateau heuristics.
fn check_equalization(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    if data.eq_failure_depth.is_none() && data.eq_failure_type.is_none() {
        return None;
    }

    let mut priority = Priority::High;
    let mut diagnosis = "Equalization failure".to_string();
    let mut root_causes = Vec::new();
    let mut recommendations = Vec::new();
    let mut training_drills = Vec::new();
    let mut safety_flags = Vec::new();

    match data.eq_failure_type {
        Some(EqFailureType::CantEqualize) => {
            diagnosis = "Unable to equalize - technique or anatomy issue".to_string();
            root_causes = owned(&["Poor Frenzel technique", "Soft palate or glottis tension"]);
            recommendations = owned(&[
                "Review equalization technique with an instructor",
                "Practice soft palate control",
            ]);
            training_drills = owned(&[
                "100+ daily dry equalization repetitions",
                "Tongue-out equalization test",
            ]);
        }
        Some(EqFailureType::SwallowedMouthfill) => {
            priority = Priority::Critical;
            diagnosis = "Mouthfill management failure".to_string();
            root_causes = owned(&["Poor glottis control", "Inadequate mouthfill technique"]);
            recommendations = owned(&["Master the glottis lock before progressing deeper"]);
            training_drills = owned(&[
                "Glottis isolation exercises",
                "Negative pressure dive progression",
            ]);
            safety_flags.push("Do not attempt mouthfill until technique is solid".to_string());
        }
        Some(EqFailureType::AirRanOut) => {
            diagnosis = "Insufficient air volume for equalization".to_string();
            root_causes = owned(&[
                "Mouthfill taken too small or too shallow",
                "Inefficient equalization wasting air",
            ]);
            recommendations = owned(&["Increase mouthfill volume", "Take the mouthfill deeper"]);
        }
        Some(EqFailureType::Painful) | None => {}
    }

    // Plateau override replaces the diagnosis but appends everything else.
    if let Some(depth) = data.eq_failure_depth {
        if let Some(band) = plateau_band_for(depth) {
            diagnosis = band.diagnosis.to_string();
            root_causes.extend(owned(band.root_causes));
            recommendations.extend(owned(band.recommendations));
            training_drills.extend(owned(band.training_drills));
            safety_flags.extend(owned(band.safety_flags));
        }
    }

    if data.neck_position == Some(NeckPosition::Extended) {
        root_causes.push("Neck extension kinking the Eustachian tubes".to_string());
        recommendations.push("Keep a neutral or tucked neck position on descent".to_string());
    }

    Some(EncloseAssessment {
        category: Category::E,
        priority,
        diagnosis,
        root_causes,
        recommendations,
        training_drills,
        next_steps: owned(&[
            "Fix technique before depth progression",
            "Test in a controlled environment",
        ]),
        safety_flags,
    })
}

/// N - Narcosis symptoms.
fn check_narcosis(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let has_symptoms = data
        .narcosis_symptoms
        .as_ref()
        .is_some_and(|s| !s.is_empty());
    if data.narcosis_depth.is_none() && !has_symptoms {
        return None;
    }

    let depth_text = match data.narcosis_depth {
        Some(d) => format!("{d}m"),
        None => "unknown depth".to_string(),
    };

    let mut safety_flags = Vec::new();
    if data.narcosis_depth.is_some_and(|d| d > NARCOSIS_MEDICAL_DEPTH_M) {
        safety_flags.push("Significant narcosis - medical evaluation recommended".to_string());
    }

    Some(EncloseAssessment {
        category: Category::N,
        priority: Priority::Medium,
        diagnosis: format!("Narcosis symptoms at {depth_text}"),
        root_causes: owned(&[
            "Depth beyond current adaptation",
            "Fatigue or elevated CO2",
        ]),
        recommendations: owned(&[
            "Progress in slow 2-3m increments at this depth band",
            "Dive rested and relaxed",
            "Take longer surface intervals",
        ]),
        training_drills: owned(&["Mental rehearsal", "Visualization practice"]),
        next_steps: Vec::new(),
        safety_flags,
    })
}

/// C - CO2 tolerance, triggered by contractions before the final third.
fn check_co2_tolerance(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let start = data.contractions_start_time?;
    let dive_time = data.dive_time_seconds;
    let contraction_percent = start / dive_time;
    if !(contraction_percent < EARLY_CONTRACTION_RATIO) {
        return None;
    }

    let priority = if contraction_percent < HIGH_CONTRACTION_RATIO {
        Priority::High
    } else {
        Priority::Medium
    };

    let mut safety_flags = Vec::new();
    if contraction_percent < VERY_EARLY_CONTRACTION_RATIO {
        safety_flags.push("Very early contractions - check for medical issues".to_string());
    }

    Some(EncloseAssessment {
        category: Category::C,
        priority,
        diagnosis: format!(
            "Contractions began at {}% of dive time",
            (contraction_percent * 100.0).round()
        ),
        root_causes: owned(&[
            "Poor CO2 tolerance",
            "Inadequate warm-up",
            "Mental tension",
            "Inefficient technique",
        ]),
        recommendations: owned(&[
            "Improve pre-dive relaxation",
            "Extend the warm-up routine",
            "Add mental preparation",
        ]),
        training_drills: owned(&[
            "Dry CO2 tables (max 1-2x per week)",
            "Urge-to-breathe static hangs",
            "Visualization practice",
        ]),
        next_steps: owned(&["Reduce target depth until CO2 tolerance improves"]),
        safety_flags,
    })
}

/// L - Leg fatigue in the first half of the descent by depth.
fn check_leg_fatigue(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let burn_depth = data.leg_burn_depth?;
    if !(burn_depth < data.reached_depth_m * EARLY_LEG_BURN_RATIO) {
        return None;
    }

    Some(EncloseAssessment {
        category: Category::L,
        priority: Priority::Medium,
        diagnosis: format!("Early leg fatigue at {burn_depth}m"),
        root_causes: owned(&[
            "Poor finning technique",
            "Inadequate leg conditioning",
            "Inappropriate fins",
            "Rushed descent",
        ]),
        recommendations: owned(&[
            "Improve finning efficiency",
            "Slow the descent",
            "Consider softer fins",
        ]),
        training_drills: owned(&[
            "Dynamic apnea sprints",
            "Anterior tibialis strengthening",
            "Finning technique practice",
        ]),
        next_steps: Vec::new(),
        safety_flags: Vec::new(),
    })
}

/// O - O2 tolerance and recovery symptoms.
fn check_o2_tolerance(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let symptoms = data.o2_symptoms.as_ref().filter(|s| !s.is_empty())?;

    let has_serious = symptoms
        .iter()
        .any(|s| SERIOUS_O2_MARKERS.iter().any(|m| s.contains(m)));

    let (priority, safety_flag) = if has_serious {
        (Priority::Critical, "Immediate depth reduction required")
    } else {
        (Priority::High, "Monitor for progression of symptoms")
    };

    Some(EncloseAssessment {
        category: Category::O,
        priority,
        diagnosis: format!("O2-related symptoms: {}", symptoms.join(", ")),
        root_causes: owned(&[
            "Diving beyond current O2 tolerance",
            "Inefficient technique raising O2 cost",
            "Inadequate surface intervals",
        ]),
        recommendations: owned(&[
            "Reduce target depth by 5-10m",
            "Take longer surface intervals",
            "Work on technique efficiency",
        ]),
        training_drills: owned(&[
            "Dry O2 tables (max 1-2x per week, never same week as CO2 tables)",
            "Hook breathing practice",
        ]),
        next_steps: Vec::new(),
        safety_flags: vec![safety_flag.to_string()],
    })
}

/// S - Squeeze barotrauma. Always critical.
fn check_squeeze(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let squeeze = data.squeeze_type?;

    // Guard makes the fallback unreachable; kept for safety.
    let type_name = data
        .squeeze_type
        .map(|t| t.as_str())
        .unwrap_or("unknown");

    let mut recommendations = Vec::new();
    if squeeze == SqueezeType::Lung {
        recommendations.push("Rest 1-2 weeks, then restart at half depth".to_string());
    } else {
        recommendations.push("Stop diving immediately".to_string());
    }
    recommendations.push("Review technique with an instructor".to_string());
    recommendations.push("Seek medical evaluation if blood is present".to_string());

    Some(EncloseAssessment {
        category: Category::S,
        priority: Priority::Critical,
        diagnosis: format!("{type_name} squeeze reported"),
        root_causes: owned(&[
            "Forced equalization under pressure",
            "Tense descent",
            "Diving beyond current flexibility limits",
        ]),
        recommendations,
        training_drills: owned(&[
            "Flexibility work (negative pressure dives, MDR warm-ups)",
            "Relaxation training",
            "Land-based technique refinement",
        ]),
        next_steps: Vec::new(),
        safety_flags: owned(&["STOP DIVING - squeeze indicates injury risk"]),
    })
}

/// E2 - Equipment issues.
fn check_equipment(data: &DivePerformanceData) -> Option<EncloseAssessment> {
    let issues = data.equipment_issues.as_ref().filter(|s| !s.is_empty())?;

    Some(EncloseAssessment {
        category: Category::E2,
        priority: Priority::Medium,
        diagnosis: format!("Equipment issues: {}", issues.join(", ")),
        root_causes: owned(&["Equipment malfunction or poor fit"]),
        recommendations: owned(&["Address equipment issues before the next dive"]),
        training_drills: Vec::new(),
        next_steps: Vec::new(),
        safety_flags: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_dive() -> DivePerformanceData {
        DivePerformanceData {
            target_depth_m: 80.0,
            reached_depth_m: 75.0,
            dive_time_seconds: 150.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_dive_produces_no_assessments() {
        let result = diagnose(&clean_dive());
        assert!(result.is_empty());
    }

    #[test]
    fn test_categories_are_unique_and_sorted() {
        let data = DivePerformanceData {
            eq_failure_depth: Some(30.0),
            narcosis_depth: Some(45.0),
            contractions_start_time: Some(20.0),
            leg_burn_depth: Some(20.0),
            o2_symptoms: Some(vec!["blackout".to_string()]),
            squeeze_type: Some(SqueezeType::Ear),
            equipment_issues: Some(vec!["mask flooding".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 7);

        for i in 0..result.len() {
            for j in (i + 1)..result.len() {
                assert_ne!(result[i].category, result[j].category);
            }
        }
        for pair in result.windows(2) {
            assert!(pair[0].priority.rank() <= pair[1].priority.rank());
        }
    }

    #[test]
    fn test_equal_priority_keeps_evaluation_order() {
        // N, L, and E2 are all medium; they must come out in ENCLOSE order.
        let data = DivePerformanceData {
            narcosis_depth: Some(35.0),
            leg_burn_depth: Some(20.0),
            equipment_issues: Some(vec!["fin strap broke".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        let categories: Vec<Category> = result.iter().map(|a| a.category).collect();
        assert_eq!(categories, vec![Category::N, Category::L, Category::E2]);
    }

    #[test]
    fn test_squeeze_is_always_critical_with_stop_flag() {
        for squeeze in [
            SqueezeType::Ear,
            SqueezeType::Sinus,
            SqueezeType::Lung,
            SqueezeType::Throat,
        ] {
            let data = DivePerformanceData {
                squeeze_type: Some(squeeze),
                ..clean_dive()
            };

            let result = diagnose(&data);
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].category, Category::S);
            assert_eq!(result[0].priority, Priority::Critical);
            assert!(result[0]
                .safety_flags
                .iter()
                .any(|f| f.contains("STOP DIVING")));
        }
    }

    #[test]
    fn test_lung_squeeze_gets_rest_recommendation() {
        let data = DivePerformanceData {
            squeeze_type: Some(SqueezeType::Lung),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert!(result[0].recommendations[0].contains("Rest 1-2 weeks"));
    }

    #[test]
    fn test_ear_squeeze_gets_stop_recommendation() {
        let data = DivePerformanceData {
            squeeze_type: Some(SqueezeType::Ear),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].recommendations[0], "Stop diving immediately");
    }

    #[test]
    fn test_swallowed_mouthfill_escalates_to_critical() {
        let data = DivePerformanceData {
            eq_failure_type: Some(EqFailureType::SwallowedMouthfill),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::E);
        assert_eq!(result[0].priority, Priority::Critical);
        assert_eq!(result[0].diagnosis, "Mouthfill management failure");
        assert!(!result[0].safety_flags.is_empty());
    }

    #[test]
    fn test_very_early_contractions_high_priority_with_flag() {
        let data = DivePerformanceData {
            contractions_start_time: Some(15.0), // 10% of 150s
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::C);
        assert_eq!(result[0].priority, Priority::High);
        assert!(result[0]
            .safety_flags
            .iter()
            .any(|f| f.contains("Very early contractions")));
    }

    #[test]
    fn test_moderate_contractions_medium_priority_no_flag() {
        let data = DivePerformanceData {
            contractions_start_time: Some(37.5), // 25% of 150s
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].priority, Priority::Medium);
        assert!(result[0].safety_flags.is_empty());
    }

    #[test]
    fn test_late_contractions_do_not_trigger() {
        let data = DivePerformanceData {
            contractions_start_time: Some(60.0), // 40% of 150s
            ..clean_dive()
        };

        assert!(diagnose(&data).is_empty());
    }

    #[test]
    fn test_leg_burn_in_second_half_does_not_trigger() {
        let data = DivePerformanceData {
            leg_burn_depth: Some(45.0), // 60% of 75m
            ..clean_dive()
        };

        assert!(diagnose(&data).is_empty());
    }

    #[test]
    fn test_leg_burn_in_first_half_triggers_medium() {
        let data = DivePerformanceData {
            leg_burn_depth: Some(25.0),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::L);
        assert_eq!(result[0].priority, Priority::Medium);
        assert!(result[0].safety_flags.is_empty());
    }

    #[test]
    fn test_mild_o2_symptoms_are_high_priority() {
        let data = DivePerformanceData {
            o2_symptoms: Some(vec!["mild fatigue".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::O);
        assert_eq!(result[0].priority, Priority::High);
        assert_eq!(
            result[0].safety_flags,
            vec!["Monitor for progression of symptoms".to_string()]
        );
    }

    #[test]
    fn test_blackout_symptom_is_critical() {
        let data = DivePerformanceData {
            o2_symptoms: Some(vec!["blackout".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].priority, Priority::Critical);
        assert_eq!(
            result[0].safety_flags,
            vec!["Immediate depth reduction required".to_string()]
        );
    }

    #[test]
    fn test_lmc_marker_inside_longer_symptom_is_critical() {
        let data = DivePerformanceData {
            o2_symptoms: Some(vec!["slight LMC at surface".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].priority, Priority::Critical);
    }

    #[test]
    fn test_o2_diagnosis_lists_symptoms_verbatim() {
        let data = DivePerformanceData {
            o2_symptoms: Some(vec!["dizziness".to_string(), "tingling".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].diagnosis, "O2-related symptoms: dizziness, tingling");
    }

    #[test]
    fn test_narcosis_deeper_than_40m_gets_medical_flag() {
        let data = DivePerformanceData {
            narcosis_depth: Some(45.0),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].category, Category::N);
        assert_eq!(result[0].priority, Priority::Medium);
        assert!(result[0].safety_flags[0].contains("medical evaluation"));
    }

    #[test]
    fn test_narcosis_symptoms_without_depth_use_unknown_depth() {
        let data = DivePerformanceData {
            narcosis_symptoms: Some(vec!["tunnel vision".to_string()]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert!(result[0].diagnosis.contains("unknown depth"));
        assert!(result[0].safety_flags.is_empty());
    }

    #[test]
    fn test_eq_failure_at_58m_uses_plateau_diagnosis() {
        let data = DivePerformanceData {
            eq_failure_depth: Some(58.0),
            eq_failure_type: Some(EqFailureType::CantEqualize),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].diagnosis,
            "58m plateau - classic mouthfill timing issue"
        );
        assert_eq!(result[0].priority, Priority::High);
        // Base causes stay, plateau causes are appended.
        assert!(result[0]
            .root_causes
            .iter()
            .any(|c| c.contains("Frenzel")));
        assert!(result[0]
            .root_causes
            .iter()
            .any(|c| c.contains("Mouthfill taken too late")));
    }

    #[test]
    fn test_eq_failure_at_90m_appends_safety_flag() {
        let data = DivePerformanceData {
            eq_failure_depth: Some(90.0),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(
            result[0].diagnosis,
            "88-98m plateau - technique breakdown under pressure"
        );
        assert!(result[0]
            .safety_flags
            .iter()
            .any(|f| f.contains("tongue-soft-palate lock")));
    }

    #[test]
    fn test_eq_failure_outside_bands_keeps_base_diagnosis() {
        let data = DivePerformanceData {
            eq_failure_depth: Some(30.0),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result[0].diagnosis, "Equalization failure");
    }

    #[test]
    fn test_extended_neck_appends_cause_and_recommendation() {
        let data = DivePerformanceData {
            eq_failure_depth: Some(30.0),
            neck_position: Some(NeckPosition::Extended),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert!(result[0]
            .root_causes
            .iter()
            .any(|c| c.contains("Eustachian")));
        assert!(result[0]
            .recommendations
            .iter()
            .any(|r| r.contains("neutral or tucked")));
    }

    #[test]
    fn test_eq_next_steps_always_present() {
        let data = DivePerformanceData {
            eq_failure_type: Some(EqFailureType::AirRanOut),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(
            result[0].next_steps,
            vec![
                "Fix technique before depth progression".to_string(),
                "Test in a controlled environment".to_string(),
            ]
        );
    }

    #[test]
    fn test_equipment_issues_trigger_medium() {
        let data = DivePerformanceData {
            equipment_issues: Some(vec![
                "mask flooding".to_string(),
                "lanyard drag".to_string(),
            ]),
            ..clean_dive()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::E2);
        assert_eq!(result[0].priority, Priority::Medium);
        assert_eq!(
            result[0].diagnosis,
            "Equipment issues: mask flooding, lanyard drag"
        );
        assert!(result[0].training_drills.is_empty());
        assert!(result[0].safety_flags.is_empty());
    }

    #[test]
    fn test_empty_symptom_lists_do_not_trigger() {
        let data = DivePerformanceData {
            narcosis_symptoms: Some(vec![]),
            o2_symptoms: Some(vec![]),
            equipment_issues: Some(vec![]),
            ..clean_dive()
        };

        assert!(diagnose(&data).is_empty());
    }

    #[test]
    fn test_plateau_eq_plus_ear_squeeze_sorts_squeeze_first() {
        let data = DivePerformanceData {
            target_depth_m: 80.0,
            reached_depth_m: 75.0,
            dive_time_seconds: 150.0,
            eq_failure_depth: Some(58.0),
            eq_failure_type: Some(EqFailureType::CantEqualize),
            squeeze_type: Some(SqueezeType::Ear),
            ..Default::default()
        };

        let result = diagnose(&data);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, Category::S);
        assert_eq!(result[0].priority, Priority::Critical);
        assert!(!result[0].safety_flags.is_empty());
        assert_eq!(result[1].category, Category::E);
        assert_eq!(result[1].priority, Priority::High);
        assert_eq!(
            result[1].diagnosis,
            "58m plateau - classic mouthfill timing issue"
        );
    }
}
