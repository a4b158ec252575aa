use crate::corpus::CharStream;

/// Result of feeding one character through the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The character was absorbed without being matched (composing input,
    /// line breaks, spurious whitespace, or input past the end of the text).
    Ignored,
    /// The character matched; `index` is the stream position it cleared.
    Correct { index: usize },
    /// The character did not match the expected one.
    Wrong { typed: char, expected: char },
}

/// Code-point ranges of partially composed syllabic input.
///
/// Korean input methods emit Jamo while a syllable is still being assembled;
/// those characters are an intermediate editor state, not something the
/// player typed at the text, and must never be matched against the target.
const COMPOSING_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x11FF), // Hangul Jamo
    (0x3130, 0x318F), // Hangul Compatibility Jamo
    (0xA960, 0xA97F), // Hangul Jamo Extended-A
    (0xD7B0, 0xD7FF), // Hangul Jamo Extended-B
];

pub fn is_composing(c: char) -> bool {
    let cp = c as u32;
    COMPOSING_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Validates keystrokes against the expected character of a [`CharStream`].
///
/// Holds the single source of truth for typing progress: `current_index`
/// only moves forward, and only on a correct match.
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    current_index: usize,
}

impl InputProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Runs one character through the validation state machine.
    pub fn process(&mut self, c: char, stream: &CharStream) -> InputOutcome {
        if c == '\r' || c == '\n' {
            return InputOutcome::Ignored;
        }

        if is_composing(c) {
            return InputOutcome::Ignored;
        }

        let Some(expected) = stream.char_at(self.current_index) else {
            return InputOutcome::Ignored;
        };

        // Composition commits can emit a stray space event; absorb it
        // unless the text actually expects whitespace here.
        if c.is_whitespace() && !expected.is_whitespace() {
            return InputOutcome::Ignored;
        }

        if c == expected {
            let index = self.current_index;
            self.current_index += 1;
            InputOutcome::Correct { index }
        } else {
            InputOutcome::Wrong { typed: c, expected }
        }
    }
}
