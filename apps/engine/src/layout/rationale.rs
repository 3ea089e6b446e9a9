//! Design rationale scorer.
//!
//! Rule-only generation carries fixed baseline principle scores — they do not
//! vary with the produced structure. The overall score is a fixed weighted
//! sum of the six principles, and the grade is a strict threshold function of
//! the overall score.

use crate::models::lsp::{DesignRationale, QualityGrade, RationaleScores};
use crate::models::session::LayoutMode;

/// Baseline per-principle scores for rule-only generation.
const PROXIMITY_BASELINE: f64 = 0.85;
const SIMILARITY_BASELINE: f64 = 0.92;
const HIERARCHY_BASELINE: f64 = 0.88;
const ALIGNMENT_BASELINE: f64 = 0.90;
const WHITESPACE_BASELINE: f64 = 0.83;
const CONTRAST_BASELINE: f64 = 0.95;

/// Principle weights for the overall score. Sum to 1.0.
const PROXIMITY_WEIGHT: f64 = 0.15;
const SIMILARITY_WEIGHT: f64 = 0.15;
const HIERARCHY_WEIGHT: f64 = 0.25;
const ALIGNMENT_WEIGHT: f64 = 0.20;
const WHITESPACE_WEIGHT: f64 = 0.15;
const CONTRAST_WEIGHT: f64 = 0.10;

/// Note recorded for non-rule-only modes. The AI path is disabled; the modes
/// are accepted as inert tags.
const AI_MODE_NOTE: &str = "AI mode disabled per requirements";

/// Computes the design rationale for a generated layout.
pub fn score_design(mode: LayoutMode) -> DesignRationale {
    let overall = PROXIMITY_BASELINE * PROXIMITY_WEIGHT
        + SIMILARITY_BASELINE * SIMILARITY_WEIGHT
        + HIERARCHY_BASELINE * HIERARCHY_WEIGHT
        + ALIGNMENT_BASELINE * ALIGNMENT_WEIGHT
        + WHITESPACE_BASELINE * WHITESPACE_WEIGHT
        + CONTRAST_BASELINE * CONTRAST_WEIGHT;

    let scores = RationaleScores {
        proximity_score: PROXIMITY_BASELINE,
        similarity_score: SIMILARITY_BASELINE,
        hierarchy_score: HIERARCHY_BASELINE,
        alignment_score: ALIGNMENT_BASELINE,
        whitespace_score: WHITESPACE_BASELINE,
        contrast_score: CONTRAST_BASELINE,
        overall_quality_score: round_2(overall),
    };

    let ai_contributions = match mode {
        LayoutMode::RuleOnly => vec![],
        LayoutMode::AiAssist | LayoutMode::AiFull => vec![AI_MODE_NOTE.to_string()],
    };

    DesignRationale {
        principles_applied: vec![
            "proximity".to_string(),
            "similarity".to_string(),
            "hierarchy".to_string(),
            "alignment".to_string(),
            "whitespace".to_string(),
            "contrast".to_string(),
        ],
        scores,
        quality_grade: grade_for(overall),
        ai_contributions,
        warnings: vec![],
    }
}

/// Strict threshold grading of the overall score.
pub fn grade_for(overall: f64) -> QualityGrade {
    if overall >= 0.90 {
        QualityGrade::Excellent
    } else if overall >= 0.75 {
        QualityGrade::Good
    } else if overall >= 0.60 {
        QualityGrade::Acceptable
    } else {
        QualityGrade::NeedsImprovement
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
