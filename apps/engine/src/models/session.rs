//! Data models for intake sessions.
//!
//! The `Session` aggregate owns the submitted content blocks, image assets,
//! design intent, and constraints, together with its lifecycle status and the
//! downstream proposal reference. All enums here persist as their canonical
//! snake_case string tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Lifecycle status
// ────────────────────────────────────────────────────────────────────────────

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Draft,
    Normalizing,
    Ready,
    LayoutQueued,
    LayoutProcessing,
    LayoutComplete,
    Failed,
}

impl SessionStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::LayoutComplete | SessionStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Normalizing => "normalizing",
            SessionStatus::Ready => "ready",
            SessionStatus::LayoutQueued => "layout_queued",
            SessionStatus::LayoutProcessing => "layout_processing",
            SessionStatus::LayoutComplete => "layout_complete",
            SessionStatus::Failed => "failed",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content blocks
// ────────────────────────────────────────────────────────────────────────────

/// Content block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlockType {
    Heading,
    Paragraph,
    List,
    Quote,
    Table,
    Callout,
}

/// Semantic role detected for a block during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedRole {
    Introduction,
    Action,
    Supporting,
}

/// Metrics computed for a block during normalization. Both fields are `None`
/// until the session has been normalized, then always populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_reading_seconds: Option<u32>,
}

/// A single submitted content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentBlock {
    #[serde(default = "ContentBlock::new_id")]
    pub block_id: String,
    #[serde(rename = "type")]
    pub kind: ContentBlockType,
    /// Nesting level, 0–6.
    #[serde(default)]
    pub level: u8,
    /// Position in document order. Unique per submission.
    pub sequence: u32,
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub detected_role: Option<DetectedRole>,
    #[serde(default)]
    pub metrics: BlockMetrics,
}

impl ContentBlock {
    pub fn new_id() -> String {
        format!("block-{}", short_hex())
    }
}

fn default_language() -> String {
    "en".to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Image assets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpg,
    Jpeg,
    Svg,
}

/// A submitted image asset. Dimensions are bounded at intake (1–4096 px).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageAsset {
    #[serde(default = "ImageAsset::new_id")]
    pub image_id: String,
    pub uri: String,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default = "default_content_role")]
    pub content_role: String,
    #[serde(default)]
    pub dominant_palette: Vec<String>,
}

impl ImageAsset {
    pub fn new_id() -> String {
        format!("img-{}", short_hex())
    }
}

fn default_content_role() -> String {
    "illustration".to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Design intent & constraints
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Report,
    Presentation,
    Proposal,
    Playbook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Executive,
    Technical,
    Customer,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneSetting {
    Formal,
    Conversational,
    Persuasive,
    Educational,
}

/// Declared design intent. `purpose` drives document-type resolution:
/// presentation → slide deck, everything else → paged document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignIntent {
    pub purpose: Purpose,
    pub audience: Audience,
    #[serde(default = "default_tone")]
    pub tone: ToneSetting,
    #[serde(default = "default_goals")]
    pub goals: Vec<String>,
    #[serde(default)]
    pub primary_actions: Vec<String>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
}

fn default_tone() -> ToneSetting {
    ToneSetting::Formal
}

fn default_goals() -> Vec<String> {
    vec!["clarity".to_string()]
}

/// Visual density preference. Maps to a numeric multiplier applied to every
/// spacing computation (see `layout::gestalt::density_factor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualDensity {
    Tight,
    Balanced,
    Airy,
}

impl Default for VisualDensity {
    fn default() -> Self {
        VisualDensity::Balanced
    }
}

/// Design constraints and free-form style preference maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    #[serde(default)]
    pub visual_density: VisualDensity,
    #[serde(default)]
    pub color_policy: Map<String, Value>,
    #[serde(default)]
    pub brand_guidelines: Map<String, Value>,
    #[serde(default)]
    pub document_preferences: Map<String, Value>,
    #[serde(default)]
    pub presentation_preferences: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout mode
// ────────────────────────────────────────────────────────────────────────────

/// Generation mode requested at submit time. `ai_assist` / `ai_full` are
/// accepted but inert: generation stays rule-based and the rationale records
/// a placeholder note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    RuleOnly,
    AiAssist,
    AiFull,
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::RuleOnly
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session aggregate & requests
// ────────────────────────────────────────────────────────────────────────────

/// Intake session with full metadata. Exclusively owned by the intake
/// subsystem; `session_id` is the external key everything else joins on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub content_blocks: Vec<ContentBlock>,
    pub images: Vec<ImageAsset>,
    pub design_intent: DesignIntent,
    pub constraints: Constraints,
    #[serde(default)]
    pub proposal_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Session {
    pub fn new_id() -> String {
        format!("sess-{}", Uuid::new_v4().simple())
    }
}

/// Request to create a new intake session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub content_blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    pub design_intent: DesignIntent,
    #[serde(default)]
    pub constraints: Constraints,
}

/// Request to submit a session for layout generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitSessionRequest {
    #[serde(default)]
    pub layout_mode: LayoutMode,
}

fn short_hex() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..8].to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
