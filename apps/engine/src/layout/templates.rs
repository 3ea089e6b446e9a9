//! Template selector — picks a structural template for a slide group from
//! its content mix. First match wins, top to bottom.

use crate::models::lsp::Template;
use crate::models::session::{ContentBlock, ContentBlockType, ImageAsset};

/// Selects the template for one slide group.
///
/// Priority order: title slide (first group) → image templates (by text
/// volume) → bullet list → text heavy → standard content.
pub fn select_slide_template(
    content_group: &[&ContentBlock],
    images: &[ImageAsset],
    is_title: bool,
) -> Template {
    if is_title {
        return Template::TitleSlide;
    }

    let has_image = !images.is_empty();
    let text_count = content_group
        .iter()
        .filter(|b| matches!(b.kind, ContentBlockType::Paragraph | ContentBlockType::List))
        .count();

    if has_image && text_count <= 2 {
        Template::ImageWithCaption
    } else if has_image && text_count > 2 {
        Template::TwoColumnImageText
    } else if content_group
        .iter()
        .any(|b| b.kind == ContentBlockType::List)
    {
        Template::BulletList
    } else if text_count > 5 {
        Template::TextHeavy
    } else {
        Template::StandardContent
    }
}
