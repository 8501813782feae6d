//! Word wrapping for help text

/// Column width of wrapped descriptions
pub const LINE_WIDTH: usize = 70;

/// Re-flow `text` into lines of at most `width` characters.
///
/// Whitespace is collapsed. A single word longer than `width` gets a line
/// of its own.
pub fn word_wrap(text: &str, width: usize) -> String {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };

    let mut wrapped = first.to_string();
    let mut used = first.chars().count();
    for word in words {
        let len = word.chars().count();
        if used + 1 + len > width {
            wrapped.push('\n');
            used = len;
        } else {
            wrapped.push(' ');
            used += 1 + len;
        }
        wrapped.push_str(word);
    }
    wrapped
}
