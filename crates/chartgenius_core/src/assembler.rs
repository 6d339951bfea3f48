//! crates/chartgenius_core/src/assembler.rs
//!
//! Derives a document's title, excerpt, chart count and direction from its
//! block sequence. No I/O happens here.

use chrono::Utc;
use uuid::Uuid;

use crate::direction::detect_direction;
use crate::domain::{ContentBlock, Direction, SavedDocument};

pub const UNTITLED_TITLE: &str = "Untitled Report";
pub const DEFAULT_TITLE: &str = "Analysis Report";
pub const NO_PREVIEW_EXCERPT: &str = "No content preview available.";

const EXCERPT_CHARS: usize = 150;

/// Title and excerpt derived from the first text block.
fn title_and_excerpt(blocks: &[ContentBlock]) -> (String, String) {
    let Some(content) = blocks.iter().find_map(ContentBlock::text) else {
        return (UNTITLED_TITLE.to_string(), NO_PREVIEW_EXCERPT.to_string());
    };

    let title = content
        .split('\n')
        .find(|line| {
            let len = line.chars().count();
            len > 5 && len < 100
        })
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let excerpt = format!("{}...", content.chars().take(EXCERPT_CHARS).collect::<String>());
    (title, excerpt)
}

pub fn count_charts(blocks: &[ContentBlock]) -> usize {
    blocks.iter().filter(|b| b.is_chart()).count()
}

/// Chart count and direction, the parts of a document a guest result needs.
pub fn summarize_blocks(original_text: &str, blocks: &[ContentBlock]) -> (usize, Direction) {
    (count_charts(blocks), detect_direction(original_text))
}

/// Builds a new document owned by `user_id`. Only `id` and `created_at`
/// differ between two calls with the same arguments.
pub fn assemble(user_id: Uuid, original_text: &str, blocks: Vec<ContentBlock>) -> SavedDocument {
    let (title, excerpt) = title_and_excerpt(&blocks);
    let (chart_count, direction) = summarize_blocks(original_text, &blocks);

    SavedDocument {
        id: Uuid::new_v4(),
        user_id,
        title,
        excerpt,
        created_at: Utc::now(),
        blocks,
        original_text: original_text.to_string(),
        chart_count,
        direction,
    }
}
