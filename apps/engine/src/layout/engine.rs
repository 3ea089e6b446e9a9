//! Layout engine — orchestrates CIP validation, structure composition,
//! rationale scoring, and LSP assembly.
//!
//! Generation is synchronous, deterministic, and total after validation:
//! every error is raised before any LSP is produced.

use chrono::Utc;
use tracing::info;

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::layout::composer::{compose_pages, compose_slides, extract_title};
use crate::layout::rationale::score_design;
use crate::models::cip::ContentIntentPackage;
use crate::models::lsp::{
    DocumentType, FormatterOverrides, LayoutSpecificationPackage, LspMetadata, LSP_SCHEMA_VERSION,
};
use crate::models::session::{DesignIntent, LayoutMode, Purpose};

/// Rule-based layout generation engine.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    theme: String,
}

impl LayoutEngine {
    pub fn new(config: &EngineConfig) -> Self {
        LayoutEngine {
            theme: config.theme.clone(),
        }
    }

    /// Resolves the target document type from the declared intent:
    /// presentation purpose → slide deck, everything else → paged document.
    pub fn resolve_document_type(intent: &DesignIntent) -> DocumentType {
        if intent.purpose == Purpose::Presentation {
            DocumentType::Powerpoint
        } else {
            DocumentType::Word
        }
    }

    /// Generates the Layout Specification Package for a validated CIP.
    pub fn generate(
        &self,
        cip: &ContentIntentPackage,
        document_type: DocumentType,
        mode: LayoutMode,
    ) -> Result<LayoutSpecificationPackage, EngineError> {
        validate_cip(cip)?;

        let proposal_id = proposal_id_for(&cip.session_id);
        let blocks = &cip.content.blocks;
        let images = &cip.content.images;

        let structure = match document_type {
            DocumentType::Powerpoint => compose_slides(blocks, images, &cip.constraints)?,
            DocumentType::Word => compose_pages(blocks, &cip.constraints)?,
        };

        let design_rationale = score_design(mode);

        info!(
            "Generated layout {proposal_id} for session {} ({} units)",
            cip.session_id,
            structure.len()
        );

        Ok(LayoutSpecificationPackage {
            schema_version: LSP_SCHEMA_VERSION.to_string(),
            proposal_id,
            session_id: cip.session_id.clone(),
            document_type,
            metadata: LspMetadata {
                title: extract_title(blocks),
                theme: self.theme.clone(),
                mode,
                created_at: Utc::now(),
            },
            structure,
            design_rationale,
            warnings: vec![],
            formatter_overrides: FormatterOverrides::default(),
        })
    }
}

/// Derives the proposal id from the session id infix
/// (`sess-<hex>` → `lsp-<hex>`).
pub fn proposal_id_for(session_id: &str) -> String {
    let infix = session_id.split('-').nth(1).unwrap_or(session_id);
    format!("lsp-{infix}")
}

fn validate_cip(cip: &ContentIntentPackage) -> Result<(), EngineError> {
    if cip.schema_version.is_empty() {
        return Err(EngineError::Validation(
            "Invalid CIP: missing schema_version".to_string(),
        ));
    }
    if cip.session_id.is_empty() {
        return Err(EngineError::Validation(
            "Invalid CIP: missing session_id".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
