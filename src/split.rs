//! Sentence segmentation by punctuation boundaries.
//!
//! The subtitle aligner matches backend output against the segmentation
//! produced here, so splitting must be deterministic: the same text always
//! yields the same fragments.

/// Characters that terminate a sentence-like fragment.
///
/// Covers Latin and CJK full-width sentence punctuation. Newlines are
/// handled separately (they always split, with no digit guard).
const SPLIT_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '。', '，', '、', '！', '？', '；', '：', '…',
];

/// Remove bracket characters from text before splitting.
///
/// Brackets are presentation artifacts (stage directions, annotations),
/// not sentence content. Each is replaced by a space so adjacent words do
/// not fuse.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '[' | ']' | '(' | ')' | '{' | '}' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split text into trimmed, punctuation-bounded fragments.
///
/// A split character between two ASCII digits does not split, so decimal
/// numbers like `1.5` or `2,5` stay intact. Empty fragments are dropped.
pub fn split_by_punctuation(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut fragments = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            push_fragment(&mut fragments, &mut current);
            continue;
        }
        if SPLIT_CHARS.contains(&c) {
            let prev_is_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if prev_is_digit && next_is_digit {
                current.push(c);
            } else {
                push_fragment(&mut fragments, &mut current);
            }
        } else {
            current.push(c);
        }
    }
    push_fragment(&mut fragments, &mut current);

    fragments
}

fn push_fragment(fragments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_latin_punctuation() {
        assert_eq!(split_by_punctuation("A. B, C!"), vec!["A", "B", "C"]);
    }

    #[test]
    fn splits_on_full_width_punctuation() {
        let text = "静夜思是唐代诗人李白创作的一首五言古诗。这首诗描绘了诗人...";
        let fragments = split_by_punctuation(text);
        assert_eq!(
            fragments,
            vec!["静夜思是唐代诗人李白创作的一首五言古诗", "这首诗描绘了诗人"]
        );
    }

    #[test]
    fn splits_on_newline() {
        assert_eq!(
            split_by_punctuation("first line\nsecond line"),
            vec!["first line", "second line"]
        );
    }

    #[test]
    fn keeps_decimal_numbers_intact() {
        assert_eq!(
            split_by_punctuation("气温在13.5℃左右, 不低于2,5度"),
            vec!["气温在13.5℃左右", "不低于2,5度"]
        );
    }

    #[test]
    fn digit_guard_needs_digits_on_both_sides() {
        // "1. " splits: the dot is followed by a space, not a digit.
        assert_eq!(split_by_punctuation("1. point one"), vec!["1", "point one"]);
    }

    #[test]
    fn drops_empty_fragments() {
        assert_eq!(split_by_punctuation("...  !!  "), Vec::<String>::new());
        assert_eq!(split_by_punctuation("a..b"), vec!["a", "b"]);
    }

    #[test]
    fn empty_input_yields_empty_vec() {
        assert_eq!(split_by_punctuation(""), Vec::<String>::new());
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "What is the meaning of life? This question has puzzled thinkers, for centuries.";
        assert_eq!(split_by_punctuation(text), split_by_punctuation(text));
    }

    #[test]
    fn normalize_strips_brackets() {
        assert_eq!(normalize("[Opening scene] Alex (age 8) plays."), "Opening scene  Alex  age 8  plays.");
        assert_eq!(normalize("{a}[b](c)"), "a  b  c");
    }

    #[test]
    fn normalize_then_split_drops_bracket_noise() {
        let fragments = split_by_punctuation(&normalize("[End scene.]"));
        assert_eq!(fragments, vec!["End scene"]);
    }
}
