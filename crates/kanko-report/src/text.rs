//! Text normalization for captions and reviews, plus the line-wrapping used
//! by the place report's rendered output.

use regex::Regex;

/// Caption normalization: collapses whitespace, strips bracketed asides and
/// decorative symbols, and squeezes repeated prolonged-sound marks and
/// ellipses.
pub struct CaptionCleaner {
    whitespace: Regex,
    square_brackets: Regex,
    parens: Regex,
    symbols: Regex,
    long_vowel_runs: Regex,
    ellipsis_runs: Regex,
}

impl CaptionCleaner {
    /// # Errors
    ///
    /// Returns [`regex::Error`] if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            square_brackets: Regex::new(r"\[.*?\]")?,
            parens: Regex::new(r"\(.*?\)")?,
            symbols: Regex::new(r"[♪★☆※]+")?,
            long_vowel_runs: Regex::new(r"ー{2,}")?,
            ellipsis_runs: Regex::new(r"…{2,}")?,
        })
    }

    #[must_use]
    pub fn clean(&self, caption: &str) -> String {
        let text = self.whitespace.replace_all(caption, " ");
        let text = self.square_brackets.replace_all(&text, "");
        let text = self.parens.replace_all(&text, "");
        let text = self.symbols.replace_all(&text, "");
        let text = self.long_vowel_runs.replace_all(&text, "ー");
        let text = self.ellipsis_runs.replace_all(&text, "…");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_owned()
    }
}

/// Collapse runs of whitespace in a review to single spaces.
#[must_use]
pub fn clean_review_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap each line of `text` to at most `width` characters, preserving blank
/// lines as paragraph breaks. Words longer than `width` (common in unspaced
/// Japanese prose) are split at the width boundary.
#[must_use]
pub fn wrap_preserve_newlines(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                fill(line, width)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedy word wrap of a single line to `width` characters.
fn fill(line: &str, width: usize) -> String {
    let mut wrapped: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        for piece in split_long_word(word, width) {
            let piece_len = piece.chars().count();
            if current_len == 0 {
                current.push_str(&piece);
                current_len = piece_len;
            } else if current_len + 1 + piece_len <= width {
                current.push(' ');
                current.push_str(&piece);
                current_len += 1 + piece_len;
            } else {
                wrapped.push(std::mem::take(&mut current));
                current.push_str(&piece);
                current_len = piece_len;
            }
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped.join("\n")
}

/// Split a word into chunks of at most `width` characters.
fn split_long_word(word: &str, width: usize) -> Vec<String> {
    if width == 0 || word.chars().count() <= width {
        return vec![word.to_owned()];
    }
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> CaptionCleaner {
        CaptionCleaner::new().expect("patterns should compile")
    }

    #[test]
    fn clean_collapses_whitespace_and_trims() {
        assert_eq!(cleaner().clean("  こんにちは\n\t世界  "), "こんにちは 世界");
    }

    #[test]
    fn clean_strips_bracketed_asides() {
        assert_eq!(cleaner().clean("音楽 [Music] 続き (拍手) 終わり"), "音楽 続き 終わり");
    }

    #[test]
    fn clean_strips_decorative_symbols() {
        assert_eq!(cleaner().clean("川越♪★☆※散歩"), "川越散歩");
    }

    #[test]
    fn clean_squeezes_repeated_marks() {
        assert_eq!(cleaner().clean("いいねーーーー…………よし"), "いいねー…よし");
    }

    #[test]
    fn review_text_whitespace_is_collapsed() {
        assert_eq!(clean_review_text("とても\n\n良い   所"), "とても 良い 所");
    }

    #[test]
    fn wrap_preserves_blank_lines_as_paragraph_breaks() {
        let text = "one two three\n\nfour five";
        assert_eq!(wrap_preserve_newlines(text, 9), "one two\nthree\n\nfour five");
    }

    #[test]
    fn wrap_splits_unspaced_runs_at_the_width_boundary() {
        let text = "あいうえおかきくけこ";
        assert_eq!(wrap_preserve_newlines(text, 4), "あいうえ\nおかきく\nけこ");
    }

    #[test]
    fn wrap_leaves_short_lines_untouched() {
        assert_eq!(wrap_preserve_newlines("短い行", 100), "短い行");
    }
}
