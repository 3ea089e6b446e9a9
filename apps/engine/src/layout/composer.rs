//! Layout composer — turns grouped content blocks into positioned, styled
//! structure units.
//!
//! Slides and pages share the per-block styling rules (hierarchy-derived font
//! size, color, and weight; density-scaled spacing) but differ in base
//! offsets and column width.

use crate::errors::EngineError;
use crate::layout::gestalt;
use crate::layout::grouping::group_for_slides;
use crate::layout::templates::select_slide_template;
use crate::models::lsp::{
    Alignment, ElementType, FontSpec, FontStyle, FontWeight, GestaltTags, LayoutElement, Position,
    Spacing, StructureUnit, Styling, Template, UnitKind, MAX_UNIT_ELEMENTS,
};
use crate::models::session::{Constraints, ContentBlock, ContentBlockType, ImageAsset};

/// Fallback document title when no top-level heading exists.
pub const FALLBACK_TITLE: &str = "Untitled Document";

/// Title length bounds, in characters.
const DOCUMENT_TITLE_MAX_CHARS: usize = 100;
const UNIT_TITLE_MAX_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Structure generation
// ────────────────────────────────────────────────────────────────────────────

/// Builds the slide structure for a presentation document.
pub fn compose_slides(
    content_blocks: &[ContentBlock],
    images: &[ImageAsset],
    constraints: &Constraints,
) -> Result<Vec<StructureUnit>, EngineError> {
    let density = gestalt::density_factor(constraints.visual_density);
    let groups = group_for_slides(content_blocks);

    let mut slides = Vec::with_capacity(groups.len());
    for (idx, group) in groups.iter().enumerate() {
        let is_title_slide = idx == 0;
        let template = select_slide_template(group, images, is_title_slide);
        let elements = slide_elements(group, density, is_title_slide);
        check_element_bound(&elements)?;

        let title = group
            .first()
            .map(|block| truncate_chars(&block.text, UNIT_TITLE_MAX_CHARS))
            .unwrap_or_else(|| format!("Slide {}", idx + 1));

        slides.push(StructureUnit {
            unit_id: StructureUnit::new_id(),
            kind: UnitKind::Slide,
            title: Some(title),
            template,
            elements,
            notes: None,
        });
    }

    Ok(slides)
}

/// Builds the page structure for a paged (Word-like) document: a single
/// unit holding every block.
pub fn compose_pages(
    content_blocks: &[ContentBlock],
    constraints: &Constraints,
) -> Result<Vec<StructureUnit>, EngineError> {
    let density = gestalt::density_factor(constraints.visual_density);
    let elements = page_elements(content_blocks, density);
    check_element_bound(&elements)?;

    Ok(vec![StructureUnit {
        unit_id: StructureUnit::new_id(),
        kind: UnitKind::Page,
        title: Some("Document".to_string()),
        template: Template::SingleColumn,
        elements,
        notes: None,
    }])
}

fn check_element_bound(elements: &[LayoutElement]) -> Result<(), EngineError> {
    if elements.len() > MAX_UNIT_ELEMENTS {
        return Err(EngineError::Validation(format!(
            "Structure unit holds {} elements (max {MAX_UNIT_ELEMENTS})",
            elements.len()
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Element creation
// ────────────────────────────────────────────────────────────────────────────

fn slide_elements(
    content_group: &[&ContentBlock],
    density_factor: f64,
    is_title: bool,
) -> Vec<LayoutElement> {
    let mut elements = Vec::with_capacity(content_group.len());
    let mut y_offset = if is_title { 1.0 } else { 0.5 };

    for (idx, block) in content_group.iter().enumerate() {
        let level = hierarchy_level(block, idx, is_title);
        let alignment = if is_title && idx == 0 {
            Alignment::Center
        } else {
            Alignment::Left
        };

        elements.push(text_element(
            block,
            level,
            Position {
                x: 0.75,
                y: y_offset,
                width: 8.5,
                height: 1.0,
                z_index: 0,
            },
            alignment,
            density_factor,
        ));
        y_offset += 0.8 * density_factor;
    }

    elements
}

fn page_elements(content_blocks: &[ContentBlock], density_factor: f64) -> Vec<LayoutElement> {
    let mut elements = Vec::with_capacity(content_blocks.len());
    let mut y_offset = 1.0;

    for (idx, block) in content_blocks.iter().enumerate() {
        let level = hierarchy_level(block, idx, false);
        elements.push(text_element(
            block,
            level,
            Position {
                x: 1.0,
                y: y_offset,
                width: 6.5,
                height: 0.5,
                z_index: 0,
            },
            Alignment::Left,
            density_factor,
        ));
        y_offset += 0.6 * density_factor;
    }

    elements
}

fn text_element(
    block: &ContentBlock,
    hierarchy_level: u8,
    position: Position,
    alignment: Alignment,
    density_factor: f64,
) -> LayoutElement {
    let weight = if hierarchy_level <= 2 {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    };

    LayoutElement {
        element_id: LayoutElement::new_id(),
        content_ref: Some(block.block_id.clone()),
        role: None,
        kind: ElementType::Text,
        position,
        grid: None,
        styling: Styling {
            font: Some(FontSpec {
                family: "Arial".to_string(),
                size_pt: gestalt::hierarchy_size(hierarchy_level),
                weight,
                style: FontStyle::Normal,
            }),
            color: Some(gestalt::text_color(hierarchy_level).to_string()),
            background: None,
            alignment,
            spacing: Spacing {
                margin_top: 0.3 * density_factor,
                margin_bottom: 0.2 * density_factor,
                margin_left: 0.0,
                margin_right: 0.0,
                line_height: 1.35,
            },
        },
        gestalt_rules: Some(GestaltTags {
            hierarchy_level,
            proximity_group: None,
            similarity_family: Some(similarity_family(hierarchy_level)),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hierarchy & title resolution
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the visual hierarchy level for a block.
///
/// The opening heading of the title unit is level 1; other headings map to
/// min(nesting level + 1, 3); quotes and callouts sit at level 3; everything
/// else is body (level 4).
pub fn hierarchy_level(block: &ContentBlock, index: usize, is_title_unit: bool) -> u8 {
    match block.kind {
        ContentBlockType::Heading => {
            if is_title_unit && index == 0 {
                1
            } else {
                (block.level + 1).min(3)
            }
        }
        ContentBlockType::Quote | ContentBlockType::Callout => 3,
        _ => 4,
    }
}

/// Similarity family tag for an element: headings group by level, everything
/// else shares the body family.
pub fn similarity_family(hierarchy_level: u8) -> String {
    if hierarchy_level <= 3 {
        format!("heading-{hierarchy_level}")
    } else {
        "body-paragraph".to_string()
    }
}

/// Extracts the document title: the first heading at level ≤ 1 anywhere in
/// the content, truncated to 100 characters.
pub fn extract_title(content_blocks: &[ContentBlock]) -> String {
    content_blocks
        .iter()
        .find(|b| b.kind == ContentBlockType::Heading && b.level <= 1)
        .map(|b| truncate_chars(&b.text, DOCUMENT_TITLE_MAX_CHARS))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
