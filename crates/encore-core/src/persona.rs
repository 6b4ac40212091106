//! Persona assignment for chat display identities.
//!
//! Each child session gets a display persona (letter, label, color) the
//! first time it is seen; assignments are first-seen order and must stay
//! stable across transcript rebuilds within one replay, so the map is held
//! by the replay state rather than recomputed per build.

use std::collections::HashMap;

/// Terracotta for the orchestrator persona.
pub const BOSS_COLOR: &str = "#C2705A";

/// Rotating palette for child personas.
pub const CHILD_COLORS: [&str; 6] = [
    "#5B9E8F", // celadon
    "#C49555", // amber
    "#8A7ABF", // wisteria
    "#5B9E78", // bamboo
    "#C47B8A", // peach blossom
    "#6B8EB5", // pale ultramarine
];

/// Wisteria for the backstage persona.
pub const BACKSTAGE_COLOR: &str = "#8A7ABF";

/// Sentinel color index for the orchestrator persona.
pub const BOSS_COLOR_IDX: i32 = -1;

/// Sentinel color index for the backstage persona.
pub const BACKSTAGE_COLOR_IDX: i32 = -2;

/// Letter label for the child at first-seen position `index`.
///
/// Positions 0-25 map to `A`-`Z`; beyond that the label falls back to the
/// one-based position in decimal.
#[must_use]
pub fn assign_child_letter(index: usize) -> String {
    if index < 26 {
        // In range: 'A' + index stays within 'A'..='Z'.
        #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
        let letter = (b'A' + index as u8) as char;
        letter.to_string()
    } else {
        index.saturating_add(1).to_string()
    }
}

/// Hex color for a persona color index.
///
/// `-2` is the backstage persona, any other negative index is the
/// orchestrator, and non-negative indexes cycle through [`CHILD_COLORS`].
#[must_use]
pub fn persona_color(color_idx: i32) -> &'static str {
    if color_idx == BACKSTAGE_COLOR_IDX {
        return BACKSTAGE_COLOR;
    }
    if color_idx < 0 {
        return BOSS_COLOR;
    }
    // Modulo by the fixed non-empty palette length.
    #[allow(clippy::arithmetic_side_effects)]
    let slot = usize::try_from(color_idx).unwrap_or(0) % CHILD_COLORS.len();
    CHILD_COLORS[slot]
}

/// A display identity assigned to one child session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Short avatar letter (or decimal fallback).
    pub letter: String,
    /// Full display label.
    pub label: String,
    /// Palette index, cycled by [`persona_color`].
    pub color_idx: i32,
}

/// First-seen-order persona assignments for one replay.
#[derive(Debug, Default)]
pub struct PersonaMap {
    assigned: HashMap<String, Persona>,
    next_index: usize,
}

impl PersonaMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the persona for `child_session_id`, assigning the next free
    /// one if this child has not been seen before.
    pub fn get_or_assign(&mut self, child_session_id: &str) -> Persona {
        if let Some(persona) = self.assigned.get(child_session_id) {
            return persona.clone();
        }
        let letter = assign_child_letter(self.next_index);
        let persona = Persona {
            label: format!("Agent {letter}"),
            color_idx: i32::try_from(self.next_index).unwrap_or(i32::MAX),
            letter,
        };
        self.next_index = self.next_index.saturating_add(1);
        self.assigned
            .insert(child_session_id.to_string(), persona.clone());
        persona
    }

    /// Number of assigned personas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether no persona has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_cover_the_alphabet_then_fall_back() {
        assert_eq!(assign_child_letter(0), "A");
        assert_eq!(assign_child_letter(25), "Z");
        assert_eq!(assign_child_letter(26), "27");
        assert_eq!(assign_child_letter(100), "101");
    }

    #[test]
    fn color_lookup_honors_sentinels_and_cycles() {
        assert_eq!(persona_color(-2), BACKSTAGE_COLOR);
        assert_eq!(persona_color(-1), BOSS_COLOR);
        assert_eq!(persona_color(-7), BOSS_COLOR);
        assert_eq!(persona_color(0), CHILD_COLORS[0]);
        assert_eq!(persona_color(6), persona_color(0));
        assert_eq!(persona_color(8), persona_color(2));
    }

    #[test]
    fn personas_assigned_in_first_seen_order() {
        let mut map = PersonaMap::new();
        let a = map.get_or_assign("sess-x");
        let b = map.get_or_assign("sess-y");
        let a_again = map.get_or_assign("sess-x");

        assert_eq!(a.letter, "A");
        assert_eq!(a.label, "Agent A");
        assert_eq!(a.color_idx, 0);
        assert_eq!(b.letter, "B");
        assert_eq!(b.color_idx, 1);
        assert_eq!(a, a_again);
        assert_eq!(map.len(), 2);
    }
}
