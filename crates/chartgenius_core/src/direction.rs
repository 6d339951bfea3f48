//! crates/chartgenius_core/src/direction.rs

use crate::domain::Direction;

/// Classifies text as right-to-left when it contains any Arabic-script character.
pub fn detect_direction(text: &str) -> Direction {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}
