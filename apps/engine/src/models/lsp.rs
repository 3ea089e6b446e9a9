//! Layout Specification Package (LSP) — the engine's renderer-agnostic
//! output.
//!
//! An LSP is a tree of structure units (pages or slides) holding positioned,
//! styled elements, plus a design rationale with per-principle scores. Every
//! element references CIP content by id; the LSP never owns content text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::session::LayoutMode;

/// Current LSP schema version.
pub const LSP_SCHEMA_VERSION: &str = "1.1";

/// Upper bound on elements per structure unit.
pub const MAX_UNIT_ELEMENTS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Document & element kinds
// ────────────────────────────────────────────────────────────────────────────

/// Target artifact family for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Word,
    Powerpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Text,
    Image,
    Table,
    Shape,
    Chart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Section,
    Page,
    Slide,
}

/// Structural templates. `title_slide` through `standard_content` apply to
/// slides; `single_column` is the paged-document template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    TitleSlide,
    ImageWithCaption,
    TwoColumnImageText,
    BulletList,
    TextHeavy,
    StandardContent,
    SingleColumn,
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry & styling
// ────────────────────────────────────────────────────────────────────────────

/// Absolute element position. All lengths in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub z_index: u32,
}

/// Grid-based positioning on the 12-column layout grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub column_start: u8,
    pub column_span: u8,
    pub row_start: u32,
    #[serde(default = "default_row_span")]
    pub row_span: u32,
}

fn default_row_span() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    Medium,
    Semibold,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Font styling for a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(default = "default_family")]
    pub family: String,
    pub size_pt: u32,
    pub weight: FontWeight,
    #[serde(default = "default_font_style")]
    pub style: FontStyle,
}

fn default_family() -> String {
    "Arial".to_string()
}

fn default_font_style() -> FontStyle {
    FontStyle::Normal
}

/// Spacing around an element, in inches; `line_height` is a multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    #[serde(default)]
    pub margin_left: f64,
    #[serde(default)]
    pub margin_right: f64,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    1.2
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
            line_height: default_line_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Element styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    /// Hex color, e.g. `#333333`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub alignment: Alignment,
    #[serde(default)]
    pub spacing: Spacing,
}

// ────────────────────────────────────────────────────────────────────────────
// Gestalt tags
// ────────────────────────────────────────────────────────────────────────────

/// Records which design principle justifies an element's visual treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestaltTags {
    /// 1 (most important) through 5 (least important).
    pub hierarchy_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_family: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Structure tree
// ────────────────────────────────────────────────────────────────────────────

/// A single positioned element within a structure unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
    #[serde(default = "LayoutElement::new_id")]
    pub element_id: String,
    /// Pointer back into the CIP (block or image id) — never content itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridPosition>,
    pub styling: Styling,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gestalt_rules: Option<GestaltTags>,
}

impl LayoutElement {
    pub fn new_id() -> String {
        format!("elem-{}", short_hex())
    }
}

/// One page or slide within the LSP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureUnit {
    #[serde(default = "StructureUnit::new_id")]
    pub unit_id: String,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub template: Template,
    pub elements: Vec<LayoutElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StructureUnit {
    pub fn new_id() -> String {
        format!("unit-{}", short_hex())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Design rationale
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
}

/// Per-principle design scores plus the weighted overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleScores {
    pub proximity_score: f64,
    pub similarity_score: f64,
    pub hierarchy_score: f64,
    pub alignment_score: f64,
    pub whitespace_score: f64,
    pub contrast_score: f64,
    /// Weighted sum of the six principle scores, rounded to 2 decimals.
    pub overall_quality_score: f64,
}

/// Design rationale attached to every generated LSP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRationale {
    pub principles_applied: Vec<String>,
    pub scores: RationaleScores,
    pub quality_grade: QualityGrade,
    pub ai_contributions: Vec<String>,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Package
// ────────────────────────────────────────────────────────────────────────────

/// Document-level metadata stamped into the LSP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LspMetadata {
    pub title: String,
    pub theme: String,
    pub mode: LayoutMode,
    pub created_at: DateTime<Utc>,
}

/// Instructions for the downstream renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterOverrides {
    pub text_overflow_policy: String,
}

impl Default for FormatterOverrides {
    fn default() -> Self {
        FormatterOverrides {
            text_overflow_policy: "shrink_font_to_min_10pt".to_string(),
        }
    }
}

/// Complete Layout Specification Package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpecificationPackage {
    pub schema_version: String,
    pub proposal_id: String,
    pub session_id: String,
    pub document_type: DocumentType,
    pub metadata: LspMetadata,
    pub structure: Vec<StructureUnit>,
    pub design_rationale: DesignRationale,
    pub warnings: Vec<String>,
    pub formatter_overrides: FormatterOverrides,
}

fn short_hex() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..8].to_string()
}
