//! Greedy word wrapping over measured text widths.
//!
//! Explicit newlines are hard breaks; within a paragraph, words are
//! packed greedily against the measured line width. A single word
//! wider than the container is emitted on its own line rather than
//! split; overflow policy belongs to the caller.

use platen_fonts::FontHandle;

pub fn wrap_text(text: &str, font: &FontHandle, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    if max_width_pt <= 0.0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if font.measure(&candidate, size_pt) > max_width_pt && !current.is_empty() {
                lines.push(current);
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Width of the widest wrapped line.
pub fn max_line_width(lines: &[String], font: &FontHandle, size_pt: f32) -> f32 {
    lines
        .iter()
        .map(|line| font.measure(line, size_pt))
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platen_fonts::BuiltinFamily;

    fn builtin() -> FontHandle {
        FontHandle::Builtin(BuiltinFamily::SansSerif)
    }

    #[test]
    fn hard_breaks_are_respected() {
        let lines = wrap_text("one\ntwo three", &builtin(), 12.0, 10_000.0);
        assert_eq!(lines, ["one", "two three"]);
    }

    #[test]
    fn long_paragraphs_wrap_at_measured_width() {
        // Builtin metrics: 0.6em per char; at 10pt, 6pt per char.
        // 60pt holds 10 characters.
        let lines = wrap_text("aaaa bbbb cccc", &builtin(), 10.0, 60.0);
        assert_eq!(lines, ["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn oversized_single_word_stays_whole() {
        let lines = wrap_text("unbreakable", &builtin(), 10.0, 12.0);
        assert_eq!(lines, ["unbreakable"]);
    }

    #[test]
    fn blank_paragraphs_become_empty_lines() {
        let lines = wrap_text("a\n\nb", &builtin(), 10.0, 1_000.0);
        assert_eq!(lines, ["a", "", "b"]);
    }
}
