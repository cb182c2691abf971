use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LayoutConfig;

use super::TextBlock;

/// One or more consecutive author-inserted wrap points (`" / "`) inside a label.
static BREAK_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\s+/)+\s+").unwrap());

/// A break hint, optionally preceded by the hyphen of a split compound word.
static COLLAPSE_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?(?:\s+/)+\s+").unwrap());

/// Character budget for one label line using a fixed-pitch width heuristic.
pub fn max_chars_per_line(box_width: f32, font_size: f32, config: &LayoutConfig) -> usize {
    let char_width = font_size * config.char_width_factor;
    let raw = if char_width > 0.0 {
        ((box_width - config.label_padding) / char_width).floor()
    } else {
        0.0
    };
    let fitted = if raw.is_finite() && raw > 0.0 {
        raw as usize
    } else {
        0
    };
    fitted.max(config.min_chars_per_line.max(1))
}

/// Label text with every break hint removed.
pub fn strip_break_hints(label: &str) -> String {
    let padded = format!(" {} ", label.trim());
    COLLAPSE_HINT_RE.replace_all(&padded, "").trim().to_string()
}

/// Wraps a label into at most `config.max_label_lines` lines for a box of `box_width`.
///
/// Short labels collapse to one line with their break hints dropped. Longer labels break at
/// the hints first, then at spaces and hyphens; a single overlong word is split before a known
/// compound suffix or hard-sliced.
pub fn wrap_label(label: &str, box_width: f32, font_size: f32, config: &LayoutConfig) -> Vec<String> {
    let label = label.trim();
    if label.is_empty() {
        return Vec::new();
    }
    let max_chars = max_chars_per_line(box_width, font_size, config);
    let max_lines = config.max_label_lines.max(1);

    let collapsed = strip_break_hints(label);
    if collapsed.is_empty() {
        return Vec::new();
    }
    if char_len(&collapsed) <= max_chars {
        return vec![collapsed];
    }

    // Padding lets leading/trailing hints split off an empty part that is then dropped.
    let padded = format!(" {label} ");
    let parts: Vec<&str> = BREAK_HINT_RE
        .split(&padded)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut lines = if parts.len() >= 2 {
        wrap_hinted(&parts, max_chars, max_lines)
    } else {
        wrap_auto(&collapsed, max_chars, max_lines)
    };

    if lines.len() == 1 && char_len(&lines[0]) > max_chars && !lines[0].contains(' ') {
        lines = split_unbreakable(&lines[0], max_chars, max_lines, &config.compound_suffixes);
    }
    lines
}

pub fn measure_wrapped(lines: Vec<String>, font_size: f32, config: &LayoutConfig) -> TextBlock {
    let max_len = lines.iter().map(|line| char_len(line)).max().unwrap_or(0);
    let width = max_len as f32 * font_size * config.char_width_factor;
    let height = lines.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

fn wrap_hinted(parts: &[&str], max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let last = parts.len() - 1;
    for (idx, part) in parts.iter().enumerate() {
        let mut part_lines = if char_len(part) > max_chars {
            greedy_words(part, max_chars)
        } else {
            vec![part.to_string()]
        };
        if idx != last {
            if let Some(tail) = part_lines.last_mut() {
                append_hyphen(tail);
            }
        }
        for line in part_lines {
            if lines.len() >= max_lines {
                return lines;
            }
            lines.push(line);
        }
    }
    lines
}

fn greedy_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Token<'a> {
    text: &'a str,
    /// Joined to the previous token without a space (the tail of a hyphenated word).
    glued: bool,
}

fn hyphen_tokens(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        for (idx, piece) in word.split_inclusive('-').enumerate() {
            tokens.push(Token {
                text: piece,
                glued: idx > 0,
            });
        }
    }
    tokens
}

fn wrap_auto(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for token in hyphen_tokens(text) {
        let sep = usize::from(!current.is_empty() && !token.glued);
        if !current.is_empty() && char_len(&current) + sep + char_len(token.text) > max_chars {
            lines.push(std::mem::take(&mut current));
            if lines.len() >= max_lines {
                return lines;
            }
            current.push_str(token.text);
            continue;
        }
        if sep == 1 {
            current.push(' ');
        }
        current.push_str(token.text);
    }
    if !current.is_empty() && lines.len() < max_lines {
        lines.push(current);
    }
    lines
}

fn split_unbreakable(
    word: &str,
    max_chars: usize,
    max_lines: usize,
    suffixes: &[String],
) -> Vec<String> {
    let word_len = char_len(word);
    for suffix in suffixes {
        let suffix_len = char_len(suffix);
        if suffix_len == 0 || suffix_len >= word_len {
            continue;
        }
        let stem_len = word_len - suffix_len;
        let split_at = word
            .char_indices()
            .nth(stem_len)
            .map(|(idx, _)| idx)
            .unwrap_or(word.len());
        let (stem, tail) = word.split_at(split_at);
        if tail.to_lowercase() == suffix.to_lowercase() {
            return vec![stem.to_string(), tail.to_string()];
        }
    }

    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .take(max_lines)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn append_hyphen(line: &mut String) {
    if !line.ends_with('-') {
        line.push('-');
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(label: &str, width: f32, font_size: f32) -> Vec<String> {
        wrap_label(label, width, font_size, &LayoutConfig::default())
    }

    #[test]
    fn max_chars_uses_fixed_pitch_heuristic() {
        let config = LayoutConfig::default();
        // (150 - 12) / (12 * 0.58) = 19.8
        assert_eq!(max_chars_per_line(150.0, 12.0, &config), 19);
        assert_eq!(max_chars_per_line(50.0, 12.0, &config), 8);
        assert_eq!(max_chars_per_line(0.0, 12.0, &config), 8);
        assert_eq!(max_chars_per_line(100.0, 0.0, &config), 8);
    }

    #[test]
    fn short_label_drops_break_hints() {
        assert_eq!(wrap("Lade- / station", 150.0, 12.0), vec!["Ladestation"]);
        assert_eq!(wrap("MES / ERP", 150.0, 12.0), vec!["MESERP"]);
    }

    #[test]
    fn narrow_box_breaks_at_hint() {
        assert_eq!(wrap("Lade- / station", 50.0, 12.0), vec!["Lade-", "station"]);
    }

    #[test]
    fn hinted_parts_get_trailing_hyphen() {
        assert_eq!(
            wrap("Fertigungs / steuerung", 50.0, 12.0),
            vec!["Fertigungs-", "steuerung"]
        );
    }

    #[test]
    fn overlong_hinted_part_is_word_wrapped() {
        // max_chars = 8
        let lines = wrap("Qualitaet und Pruefung / Labor", 50.0, 12.0);
        assert_eq!(lines, vec!["Qualitaet", "und", "Pruefung-"]);
    }

    #[test]
    fn empty_hint_parts_are_ignored() {
        let lines = wrap(" / Montage / / Linie / ", 50.0, 12.0);
        assert_eq!(lines, vec!["Montage-", "Linie"]);
    }

    #[test]
    fn auto_wrap_breaks_on_spaces() {
        // max_chars = 9
        let lines = wrap("Enterprise Resource Planning", 80.0, 12.0);
        assert_eq!(lines, vec!["Enterprise", "Resource", "Planning"]);
    }

    #[test]
    fn auto_wrap_breaks_after_hyphen() {
        // max_chars = 10
        let lines = wrap("Daten-Plattform", 85.0, 12.0);
        assert_eq!(lines, vec!["Daten-", "Plattform"]);
    }

    #[test]
    fn auto_wrap_caps_line_count() {
        let lines = wrap("one two three four five six seven eight", 50.0, 12.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "one two");
    }

    #[test]
    fn unbreakable_word_splits_before_compound_suffix() {
        assert_eq!(
            wrap("Schweissstation", 50.0, 12.0),
            vec!["Schweiss", "station"]
        );
        assert_eq!(wrap("LAGERSYSTEM", 50.0, 12.0), vec!["LAGER", "SYSTEM"]);
    }

    #[test]
    fn unbreakable_word_without_suffix_is_hard_sliced() {
        let lines = wrap("ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFG", 50.0, 12.0);
        assert_eq!(lines, vec!["ABCDEFGH", "IJKLMNOP", "QRSTUVWX"]);
    }

    #[test]
    fn empty_and_blank_labels_produce_no_lines() {
        assert!(wrap("", 100.0, 12.0).is_empty());
        assert!(wrap("   ", 100.0, 12.0).is_empty());
        assert!(wrap(" / ", 100.0, 12.0).is_empty());
    }

    #[test]
    fn measure_wrapped_scales_with_line_count() {
        let config = LayoutConfig::default();
        let block = measure_wrapped(vec!["abcd".to_string(), "ab".to_string()], 10.0, &config);
        assert!((block.width - 4.0 * 10.0 * 0.58).abs() < 1e-4);
        assert!((block.height - 2.0 * 10.0 * 1.2).abs() < 1e-4);
    }
}
