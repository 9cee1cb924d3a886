//! Input box helpers: character counter and its warning levels.

pub const CAUTION_THRESHOLD: usize = 12000;
pub const DANGER_THRESHOLD: usize = 15000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Caution,
    Danger,
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn counter_level(count: usize) -> CounterLevel {
    if count > DANGER_THRESHOLD {
        CounterLevel::Danger
    } else if count > CAUTION_THRESHOLD {
        CounterLevel::Caution
    } else {
        CounterLevel::Normal
    }
}

/// Non-empty once surrounding whitespace is ignored.
pub fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}
