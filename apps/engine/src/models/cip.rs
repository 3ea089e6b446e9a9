//! Content-Intent Package (CIP) — the immutable, versioned snapshot handed to
//! layout generation.
//!
//! A CIP is assembled exactly once per submission from the owning session and
//! never mutated afterwards; rebuilding from the same session state yields an
//! identical package. Decoding from loose JSON rejects unknown and missing
//! required fields at the boundary.

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::session::{Constraints, ContentBlock, DesignIntent, ImageAsset, Session};

/// Current CIP schema version.
pub const CIP_SCHEMA_VERSION: &str = "1.1";

/// Content payload of a CIP: ordered blocks plus image assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipContent {
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
}

/// The Content-Intent Package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentIntentPackage {
    pub schema_version: String,
    pub session_id: String,
    pub content: CipContent,
    pub design_intent: DesignIntent,
    pub constraints: Constraints,
}

impl ContentIntentPackage {
    /// Builds the snapshot from a session. Blocks are carried in their stored
    /// order; the engine relies on `sequence` for document order.
    pub fn from_session(session: &Session) -> Self {
        ContentIntentPackage {
            schema_version: CIP_SCHEMA_VERSION.to_string(),
            session_id: session.session_id.clone(),
            content: CipContent {
                blocks: session.content_blocks.clone(),
                images: session.images.clone(),
            },
            design_intent: session.design_intent.clone(),
            constraints: session.constraints.clone(),
        }
    }

    /// Decodes a CIP from loose JSON, rejecting unknown or missing required
    /// fields with a validation error.
    pub fn decode(value: serde_json::Value) -> Result<Self, EngineError> {
        serde_json::from_value(value)
            .map_err(|e| EngineError::Validation(format!("Invalid CIP: {e}")))
    }
}
