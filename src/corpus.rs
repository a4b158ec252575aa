use thiserror::Error;

/// The sixteen lines of the Korean national anthem, the default battle text.
pub const ANTHEM_LINES: &[&str] = &[
    "동해 물과 백두산이 마르고 닳도록",
    "하느님이 보우하사 우리나라 만세",
    "무궁화 삼천리 화려 강산",
    "대한 사람 대한으로 길이 보전하세",
    "남산 위에 저 소나무 철갑을 두른 듯",
    "바람 서리 불변함은 우리 기상일세",
    "무궁화 삼천리 화려 강산",
    "대한 사람 대한으로 길이 보전하세",
    "가을 하늘 공활한데 높고 구름 없이",
    "밝은 달은 우리 가슴 일편단심일세",
    "무궁화 삼천리 화려 강산",
    "대한 사람 대한으로 길이 보전하세",
    "이 기상과 이 마음으로 충성을 다하여",
    "괴로우나 즐거우나 나라 사랑하세",
    "무궁화 삼천리 화려 강산",
    "대한 사람 대한으로 길이 보전하세",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorpusError {
    #[error("corpus contains no typable characters")]
    Empty,
}

/// Line/column position of a single stream character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharMeta {
    pub line: usize,
    pub column: usize,
}

/// Position info returned by [`CharStream::line_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePos {
    pub line: usize,
    pub column: usize,
    pub line_len: usize,
}

/// A corpus flattened into one indexable character sequence.
///
/// Line breaks are not part of the stream; every stream index maps back to
/// its `(line, column)` through a parallel metadata array. Building is pure
/// and total — an empty stream is representable, and it is the caller's job
/// to guard anything that divides by the character count.
#[derive(Debug, Clone)]
pub struct CharStream {
    lines: Vec<String>,
    chars: Vec<char>,
    meta: Vec<CharMeta>,
}

impl CharStream {
    pub fn build<S: AsRef<str>>(lines: &[S]) -> Self {
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_owned()).collect();
        let mut chars = Vec::new();
        let mut meta = Vec::new();

        for (line_idx, line) in lines.iter().enumerate() {
            for (column, ch) in line.chars().enumerate() {
                chars.push(ch);
                meta.push(CharMeta {
                    line: line_idx,
                    column,
                });
            }
        }

        Self { lines, chars, meta }
    }

    pub fn total_chars(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The character at `index`, or `None` past the end of the stream.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub fn line_of(&self, index: usize) -> Option<LinePos> {
        let meta = self.meta.get(index)?;
        Some(LinePos {
            line: meta.line,
            column: meta.column,
            line_len: self.lines[meta.line].chars().count(),
        })
    }

    pub fn line(&self, line_idx: usize) -> Option<&str> {
        self.lines.get(line_idx).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_flattens_lines() {
        let stream = CharStream::build(&["AB", "CD"]);

        assert_eq!(stream.total_chars(), 4);
        assert_eq!(stream.char_at(0), Some('A'));
        assert_eq!(stream.char_at(3), Some('D'));
        assert_eq!(stream.char_at(4), None);
    }

    #[test]
    fn test_total_chars_matches_line_length_sum() {
        let lines = ["hello", "", "world!", "x"];
        let stream = CharStream::build(&lines);

        let expected: usize = lines.iter().map(|l| l.chars().count()).sum();
        assert_eq!(stream.total_chars(), expected);
    }

    #[test]
    fn test_metadata_has_one_entry_per_char() {
        let stream = CharStream::build(ANTHEM_LINES);

        for index in 0..stream.total_chars() {
            assert!(stream.line_of(index).is_some());
        }
        assert!(stream.line_of(stream.total_chars()).is_none());
    }

    #[test]
    fn test_line_of_crosses_line_boundary() {
        let stream = CharStream::build(&["AB", "CD"]);

        let b = stream.line_of(1).unwrap();
        assert_eq!((b.line, b.column, b.line_len), (0, 1, 2));

        let c = stream.line_of(2).unwrap();
        assert_eq!((c.line, c.column, c.line_len), (1, 0, 2));
    }

    #[test]
    fn test_empty_lines_are_skipped_in_stream() {
        let stream = CharStream::build(&["", "AB", ""]);

        assert_eq!(stream.total_chars(), 2);
        assert_eq!(stream.line_of(0).unwrap().line, 1);
        assert_eq!(stream.line_count(), 3);
    }

    #[test]
    fn test_empty_corpus_is_representable() {
        let stream = CharStream::build::<&str>(&[]);

        assert!(stream.is_empty());
        assert_eq!(stream.total_chars(), 0);
        assert_eq!(stream.char_at(0), None);
    }

    #[test]
    fn test_multibyte_chars_count_as_one() {
        let stream = CharStream::build(&["동해"]);

        assert_eq!(stream.total_chars(), 2);
        assert_eq!(stream.char_at(0), Some('동'));
        assert_eq!(stream.line_of(1).unwrap().column, 1);
    }
}
