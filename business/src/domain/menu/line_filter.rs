//! Heuristics that keep dish names out of raw OCR lines.
//!
//! False positives and negatives are accepted: a dish called "Mains Street
//! Burger" is dropped, an unpriced footer such as "Thank you for visiting"
//! survives.

/// Upper bound on dishes sent to the illustration stage.
pub const MAX_MENU_ITEMS: usize = 5;

/// Lines handed downstream when text detection finds nothing.
pub const PLACEHOLDER_MENU: [&str; 3] = [
    "MENU",
    "Spaghetti Carbonara - $14.50",
    "Tiramisu - $7.00",
];

const MIN_DISH_CHARS: usize = 4;
const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];
const SECTION_HEADER_PREFIXES: [&str; 4] = ["starters", "mains", "desserts", "drinks"];
const MENU_HEADER: &str = "menu";

/// Returns the trimmed lines that look like dish names, in source order,
/// keeping at most [`MAX_MENU_ITEMS`].
pub fn filter_dish_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| is_dish_line(line))
        .take(MAX_MENU_ITEMS)
        .map(str::to_string)
        .collect()
}

/// Applies the rejection rules to a single line.
pub fn is_dish_line(line: &str) -> bool {
    let clean = line.trim();

    if clean.chars().count() < MIN_DISH_CHARS {
        return false;
    }
    if clean.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if clean.contains(CURRENCY_SYMBOLS) {
        return false;
    }

    !is_section_header(clean)
}

fn is_section_header(clean: &str) -> bool {
    let lower = clean.to_lowercase();
    lower == MENU_HEADER
        || SECTION_HEADER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}
