//! Content grouper — partitions an ordered block sequence into the logical
//! units that become slides.
//!
//! Paged documents bypass grouping entirely (all blocks form a single page);
//! see `composer::compose_pages`.

use crate::models::session::{ContentBlock, ContentBlockType};

/// Maximum number of blocks per slide group.
pub const MAX_BLOCKS_PER_GROUP: usize = 5;

/// Groups content blocks into logical slides.
///
/// A new group starts when the block is a heading at nesting level ≤ 1 and
/// the current group is non-empty, or when the current group already holds
/// `MAX_BLOCKS_PER_GROUP` blocks. Empty input yields exactly one empty group
/// so that at least one structure unit always exists.
pub fn group_for_slides(content_blocks: &[ContentBlock]) -> Vec<Vec<&ContentBlock>> {
    let mut groups: Vec<Vec<&ContentBlock>> = Vec::new();
    let mut current: Vec<&ContentBlock> = Vec::new();

    for block in content_blocks {
        let is_section_heading = block.kind == ContentBlockType::Heading && block.level <= 1;
        if (is_section_heading && !current.is_empty()) || current.len() >= MAX_BLOCKS_PER_GROUP {
            groups.push(std::mem::take(&mut current));
        }
        current.push(block);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    if groups.is_empty() {
        groups.push(Vec::new());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::BlockMetrics;

    fn make_block(kind: ContentBlockType, level: u8, sequence: u32) -> ContentBlock {
        ContentBlock {
            block_id: format!("block-{sequence}"),
            kind,
            level,
            sequence,
            text: "content".to_string(),
            language: "en".to_string(),
            detected_role: None,
            metrics: BlockMetrics::default(),
        }
    }

    fn heading(sequence: u32) -> ContentBlock {
        make_block(ContentBlockType::Heading, 1, sequence)
    }

    fn paragraph(sequence: u32) -> ContentBlock {
        make_block(ContentBlockType::Paragraph, 0, sequence)
    }

    #[test]
    fn test_empty_input_yields_one_empty_group() {
        let groups = group_for_slides(&[]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty());
    }

    #[test]
    fn test_heading_and_cap_rules_together() {
        // H1 P P P P H1 P — the first group fills to the 5-block cap and the
        // second H1 starts the second group.
        let blocks = vec![
            heading(0),
            paragraph(1),
            paragraph(2),
            paragraph(3),
            paragraph(4),
            heading(5),
            paragraph(6),
        ];
        let groups = group_for_slides(&blocks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[1][0].kind, ContentBlockType::Heading);
        assert_eq!(groups[1][0].sequence, 5);
    }

    #[test]
    fn test_cap_alone_splits_group() {
        let blocks: Vec<ContentBlock> = (0..6).map(paragraph).collect();
        let groups = group_for_slides(&blocks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_deep_heading_does_not_split() {
        // A level-2 heading stays inside the running group.
        let blocks = vec![
            heading(0),
            paragraph(1),
            make_block(ContentBlockType::Heading, 2, 2),
            paragraph(3),
        ];
        let groups = group_for_slides(&blocks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_leading_heading_does_not_open_empty_group() {
        let blocks = vec![heading(0), paragraph(1)];
        let groups = group_for_slides(&blocks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_every_block_lands_in_exactly_one_group() {
        let blocks: Vec<ContentBlock> = (0..13)
            .map(|i| if i % 4 == 0 { heading(i) } else { paragraph(i) })
            .collect();
        let groups = group_for_slides(&blocks);
        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, 13);
    }
}
