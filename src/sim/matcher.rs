//! Typed-input matching
//!
//! Input and words are compared after trimming and Unicode upper-casing. When
//! several live words match, the one furthest down the screen (closest to the
//! miss boundary) is chosen; equal positions go to the most recently spawned.

use super::state::FallingObject;

/// Trimmed, upper-cased input, or `None` when nothing is typed
pub fn normalize(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Index of the most urgent object whose word equals the normalized `key`
pub fn most_urgent(objects: &[FallingObject], key: &str) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    // Walk newest-first so a strict comparison keeps the newest on ties
    for (index, obj) in objects.iter().enumerate().rev() {
        if obj.word.trim().to_uppercase() != key {
            continue;
        }
        if best.is_none_or(|(_, y)| obj.pos.y > y) {
            best = Some((index, obj.pos.y));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn obj(id: u32, word: &str, y: f32) -> FallingObject {
        FallingObject {
            id,
            word: word.to_string(),
            pos: Vec2::new(0.0, y),
            speed: 1.0,
            base_speed: Some(1.0),
        }
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   \t"), None);
        assert_eq!(normalize(" hack "), Some("HACK".to_string()));
    }

    #[test]
    fn lowest_match_wins() {
        let objects = vec![obj(1, "HACK", 100.0), obj(2, "HACK", 300.0), obj(3, "CODE", 500.0)];
        assert_eq!(most_urgent(&objects, "HACK"), Some(1));
    }

    #[test]
    fn ties_go_to_newest() {
        let objects = vec![obj(1, "HACK", 200.0), obj(2, "HACK", 200.0)];
        assert_eq!(most_urgent(&objects, "HACK"), Some(1));
    }

    #[test]
    fn partial_input_does_not_match() {
        let objects = vec![obj(1, "HACK", 100.0)];
        assert_eq!(most_urgent(&objects, "HAC"), None);
    }
}
