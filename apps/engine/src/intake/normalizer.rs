//! Content normalizer — enriches submitted blocks with computed metrics and
//! a detected semantic role.
//!
//! Enrichment is pure and all-or-nothing: the caller receives either a fully
//! enriched copy of every block or an error, never a partially enriched mix.

use crate::errors::EngineError;
use crate::models::session::{ContentBlock, ContentBlockType, DetectedRole};

/// Reading speed assumed for the reading-time estimate.
pub const WORDS_PER_MINUTE: u32 = 200;

/// Enriches every block with word count, estimated reading seconds, and a
/// detected role (when none was supplied).
///
/// Fails as a whole when the blocks violate the sequence total-order
/// invariant (duplicate `sequence` values).
pub fn enrich_blocks(blocks: &[ContentBlock]) -> Result<Vec<ContentBlock>, EngineError> {
    validate_sequence_order(blocks)?;

    Ok(blocks
        .iter()
        .map(|block| {
            let mut enriched = block.clone();
            let words = word_count(&block.text);
            enriched.metrics.word_count = Some(words);
            enriched.metrics.estimated_reading_seconds = Some(reading_seconds(words));
            if enriched.detected_role.is_none() {
                enriched.detected_role = Some(detect_role(block));
            }
            enriched
        })
        .collect())
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Estimated reading time in seconds at 200 words per minute, rounded to the
/// nearest second.
pub fn reading_seconds(word_count: u32) -> u32 {
    (word_count as f64 / WORDS_PER_MINUTE as f64 * 60.0).round() as u32
}

/// Role detection: the opening heading (sequence 0) introduces the document,
/// callouts call for action, everything else supports.
fn detect_role(block: &ContentBlock) -> DetectedRole {
    if block.kind == ContentBlockType::Heading && block.sequence == 0 {
        DetectedRole::Introduction
    } else if block.kind == ContentBlockType::Callout {
        DetectedRole::Action
    } else {
        DetectedRole::Supporting
    }
}

fn validate_sequence_order(blocks: &[ContentBlock]) -> Result<(), EngineError> {
    let mut seen = std::collections::HashSet::with_capacity(blocks.len());
    for block in blocks {
        if !seen.insert(block.sequence) {
            return Err(EngineError::Validation(format!(
                "Duplicate sequence value {} in block {}",
                block.sequence, block.block_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::BlockMetrics;

    fn make_block(kind: ContentBlockType, sequence: u32, text: &str) -> ContentBlock {
        ContentBlock {
            block_id: format!("block-{sequence}"),
            kind,
            level: 0,
            sequence,
            text: text.to_string(),
            language: "en".to_string(),
            detected_role: None,
            metrics: BlockMetrics::default(),
        }
    }

    #[test]
    fn test_word_count_whitespace_tokens() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  spaced   out\ttokens\nhere  "), 4);
    }

    #[test]
    fn test_reading_seconds_at_200_wpm() {
        assert_eq!(reading_seconds(200), 60);
        assert_eq!(reading_seconds(50), 15);
        assert_eq!(reading_seconds(0), 0);
        // 100/200 * 60 = 30
        assert_eq!(reading_seconds(100), 30);
        // 1/200 * 60 = 0.3 → rounds to 0
        assert_eq!(reading_seconds(1), 0);
        // 5/200 * 60 = 1.5 → rounds to 2
        assert_eq!(reading_seconds(5), 2);
    }

    #[test]
    fn test_every_block_enriched() {
        let blocks = vec![
            make_block(ContentBlockType::Heading, 0, "Quarterly Review"),
            make_block(ContentBlockType::Paragraph, 1, "Revenue grew in every region."),
            make_block(ContentBlockType::Callout, 2, "Approve the budget by Friday."),
        ];
        let enriched = enrich_blocks(&blocks).unwrap();
        assert_eq!(enriched.len(), 3);
        for block in &enriched {
            assert!(block.detected_role.is_some());
            assert_eq!(
                block.metrics.word_count,
                Some(word_count(&block.text)),
                "word_count must equal the whitespace token count"
            );
            assert!(block.metrics.estimated_reading_seconds.is_some());
        }
    }

    #[test]
    fn test_role_detection_rules() {
        let blocks = vec![
            make_block(ContentBlockType::Heading, 0, "Intro"),
            make_block(ContentBlockType::Heading, 1, "Later heading"),
            make_block(ContentBlockType::Callout, 2, "Do the thing"),
            make_block(ContentBlockType::Paragraph, 3, "Body"),
        ];
        let enriched = enrich_blocks(&blocks).unwrap();
        assert_eq!(enriched[0].detected_role, Some(DetectedRole::Introduction));
        assert_eq!(enriched[1].detected_role, Some(DetectedRole::Supporting));
        assert_eq!(enriched[2].detected_role, Some(DetectedRole::Action));
        assert_eq!(enriched[3].detected_role, Some(DetectedRole::Supporting));
    }

    #[test]
    fn test_sequence_zero_non_heading_is_supporting() {
        let blocks = vec![make_block(ContentBlockType::Paragraph, 0, "Opening text")];
        let enriched = enrich_blocks(&blocks).unwrap();
        assert_eq!(enriched[0].detected_role, Some(DetectedRole::Supporting));
    }

    #[test]
    fn test_preset_role_is_preserved() {
        let mut block = make_block(ContentBlockType::Paragraph, 0, "Act now");
        block.detected_role = Some(DetectedRole::Action);
        let enriched = enrich_blocks(&[block]).unwrap();
        assert_eq!(enriched[0].detected_role, Some(DetectedRole::Action));
    }

    #[test]
    fn test_duplicate_sequence_fails_whole_batch() {
        let blocks = vec![
            make_block(ContentBlockType::Heading, 0, "A"),
            make_block(ContentBlockType::Paragraph, 0, "B"),
        ];
        let err = enrich_blocks(&blocks).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_input_blocks_are_untouched() {
        let blocks = vec![make_block(ContentBlockType::Paragraph, 0, "unchanged")];
        let _ = enrich_blocks(&blocks).unwrap();
        assert!(blocks[0].metrics.word_count.is_none());
        assert!(blocks[0].detected_role.is_none());
    }

    #[test]
    fn test_empty_input_is_fine() {
        assert!(enrich_blocks(&[]).unwrap().is_empty());
    }
}
