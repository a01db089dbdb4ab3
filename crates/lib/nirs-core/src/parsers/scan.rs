//! Line-oriented scanning passes shared by the class and function parsers.

const COMMENT_MARKER: char = '%';

#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

/// Comment text with markers and surrounding whitespace removed.
#[must_use]
pub fn comment_text(line: &str) -> &str {
    line.trim().trim_start_matches(COMMENT_MARKER).trim()
}

/// First contiguous run of comment lines.
///
/// Lines before the first comment are skipped; the run ends at the first
/// non-comment line after it.
pub fn comment_run<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut collected: Vec<&str> = Vec::new();
    for line in lines {
        if is_comment(line) {
            collected.push(comment_text(line));
        } else if !collected.is_empty() {
            break;
        }
    }
    collected.join("\n")
}

/// Comment lines starting exactly at the first line given; any other line ends it.
pub fn leading_comment_block<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .take_while(|line| is_comment(line))
        .map(comment_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First comment line within `lines[skip..take]`, used for one-line summaries.
#[must_use]
pub fn first_comment_line(text: &str, skip: usize, take: usize) -> Option<String> {
    text.split('\n')
        .take(take)
        .skip(skip)
        .find(|line| is_comment(line))
        .map(|line| comment_text(line).to_string())
}

/// Zero-based line index containing the byte offset.
#[must_use]
pub fn line_index_at(text: &str, offset: usize) -> usize {
    text.as_bytes()
        .iter()
        .take(offset)
        .filter(|byte| **byte == b'\n')
        .count()
}

/// Collapses whitespace and `...` continuations into single spaces.
#[must_use]
pub fn squash_whitespace(value: &str) -> String {
    value
        .replace("...", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
