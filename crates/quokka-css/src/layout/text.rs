//! Text processing for inline layout.
//!
//! [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
//!
//! Raw character data goes through white-space collapsing and
//! `text-transform` before it is measured. Every processed character
//! remembers the source character it came from so that selections, which
//! the host expresses in source offsets, can be mapped onto runs.

use crate::style::{ComputedStyle, TextTransform, WhiteSpace};

use super::font::FontMetrics;

/// Tab stops are every 8 columns.
///
/// [§ 16.6.1](https://www.w3.org/TR/CSS2/text.html#white-space-model):
/// "All tabs (U+0009) are rendered as a horizontal shift that lines up the
/// start edge of the next glyph with the next tab stop. Tab stops occur at
/// points that are multiples of 8 times the width of a space (U+0020)
/// rendered in the block's font from the block's starting content edge."
const TAB_SIZE: usize = 8;

/// White-space state carried from one text box to the next within an
/// inline formatting context.
#[derive(Debug, Clone, Copy)]
pub struct CollapseState {
    /// The last emitted character was a collapsible space, or nothing was
    /// emitted yet on this line.
    pub after_space: bool,
    /// Column of the next character, for tab stops.
    pub column: usize,
    /// Inside a word, for `text-transform: capitalize`.
    pub in_word: bool,
}

impl Default for CollapseState {
    fn default() -> Self {
        Self {
            after_space: true,
            column: 0,
            in_word: false,
        }
    }
}

impl CollapseState {
    /// An atomic inline sits between two text boxes: spaces on either side
    /// no longer collapse into one another.
    pub fn break_collapse(&mut self) {
        self.after_space = false;
        self.in_word = false;
    }
}

/// Processed text with its mapping back to source characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedText {
    /// Text to measure and draw.
    pub text: String,
    /// `source[i]` is the source character index of processed char `i`.
    pub source: Vec<usize>,
}

impl ProcessedText {
    fn push(&mut self, c: char, source: usize) {
        self.text.push(c);
        self.source.push(source);
    }

    fn trim_trailing_space(&mut self) {
        while self.text.ends_with(' ') {
            let _ = self.text.pop();
            let _ = self.source.pop();
        }
    }
}

/// One piece of a processed text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPiece {
    /// Characters on the current line.
    Text(ProcessedText),
    /// A preserved newline: a forced line break.
    Break,
}

/// Apply `white-space` collapsing and `text-transform` to one text box.
///
/// [§ 16.6.1](https://www.w3.org/TR/CSS2/text.html#white-space-model)
///
/// - `normal`, `nowrap`: "every tab (U+0009) is converted to a space
///   (U+0020)", line feeds are treated as spaces, and "any space (U+0020)
///   following another space (U+0020), even a space before the inline, if
///   that space also has 'white-space' set to 'normal', 'nowrap' or
///   'pre-line', is removed."
/// - `pre-line`: spaces collapse, but "each line feed character is
///   rendered as a forced line break" and spaces around it are removed.
/// - `pre`, `pre-wrap`: all white space is preserved; tabs advance to the
///   next tab stop.
#[must_use]
pub fn process(
    text: &str,
    white_space: WhiteSpace,
    transform: TextTransform,
    state: &mut CollapseState,
) -> Vec<TextPiece> {
    let mut pieces = Vec::new();
    let mut current = ProcessedText::default();

    for (index, c) in text.chars().enumerate() {
        let is_space = matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}');

        if c == '\n' && white_space.preserves_newlines() {
            if white_space.collapses_spaces() {
                current.trim_trailing_space();
            }
            pieces.push(TextPiece::Text(std::mem::take(&mut current)));
            pieces.push(TextPiece::Break);
            state.after_space = true;
            state.column = 0;
            state.in_word = false;
            continue;
        }

        if white_space.collapses_spaces() {
            if is_space {
                if !state.after_space {
                    current.push(' ', index);
                    state.after_space = true;
                }
                state.in_word = false;
                continue;
            }
        } else {
            match c {
                '\r' => continue,
                '\t' => {
                    let advance = TAB_SIZE - state.column % TAB_SIZE;
                    for _ in 0..advance {
                        current.push(' ', index);
                    }
                    state.column += advance;
                    state.after_space = false;
                    state.in_word = false;
                    continue;
                }
                ' ' | '\u{c}' => {
                    current.push(' ', index);
                    state.column += 1;
                    state.after_space = false;
                    state.in_word = false;
                    continue;
                }
                _ => {}
            }
        }

        push_transformed(&mut current, c, index, transform, state);
        state.after_space = false;
        state.column += 1;
    }

    if !current.text.is_empty() || pieces.is_empty() {
        pieces.push(TextPiece::Text(current));
    }
    pieces.retain(|p| !matches!(p, TextPiece::Text(t) if t.text.is_empty()));
    pieces
}

/// [§ 16.5 Capitalization](https://www.w3.org/TR/CSS2/text.html#caps-prop)
///
/// "capitalize: Puts the first character of each word in uppercase; other
/// characters are unaffected."
fn push_transformed(
    out: &mut ProcessedText,
    c: char,
    source: usize,
    transform: TextTransform,
    state: &mut CollapseState,
) {
    match transform {
        TextTransform::None => out.push(c, source),
        TextTransform::Uppercase => c.to_uppercase().for_each(|u| out.push(u, source)),
        TextTransform::Lowercase => c.to_lowercase().for_each(|l| out.push(l, source)),
        TextTransform::Capitalize => {
            if !state.in_word && c.is_alphabetic() {
                c.to_uppercase().for_each(|u| out.push(u, source));
            } else {
                out.push(c, source);
            }
        }
    }
    state.in_word = true;
}

/// Advance width of `text` in the style's font including `letter-spacing`
/// and `word-spacing`.
///
/// [§ 16.4 Spacing](https://www.w3.org/TR/CSS2/text.html#spacing-props)
///
/// "This property specifies spacing behavior between text characters."
/// Word spacing is added to every space (U+0020).
#[must_use]
pub fn measure(metrics: &dyn FontMetrics, text: &str, style: &ComputedStyle) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let chars = text.chars().count();
    let spaces = text.chars().filter(|&c| c == ' ').count();
    metrics.text_width(text, &style.font)
        + style.letter_spacing * chars as f32
        + style.word_spacing * spaces as f32
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// Vertical metrics of an inline box: the font's content area and the
/// half-leading adjusted extent above and below the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineMetrics {
    /// Font ascent.
    pub ascent: f32,
    /// Font descent.
    pub descent: f32,
    /// Used `line-height`.
    pub line_height: f32,
    /// x-height, for `vertical-align: middle`.
    pub x_height: f32,
    /// Font size, for `sub` and `super`.
    pub font_size: f32,
}

impl InlineMetrics {
    /// Metrics for a box with `style`.
    #[must_use]
    pub fn of(metrics: &dyn FontMetrics, style: &ComputedStyle) -> Self {
        let font = &style.font;
        Self {
            ascent: metrics.ascent(font),
            descent: metrics.descent(font),
            line_height: style
                .line_height
                .resolve(font.size, metrics.normal_line_height(font)),
            x_height: metrics.x_height(font),
            font_size: font.size,
        }
    }

    /// "the leading L to add, where L = 'line-height' - AD, ... Half the
    /// leading is added above A and the other half below D". Returns the
    /// distance from the baseline to the top of the inline box.
    #[must_use]
    pub fn half_leading_ascent(&self) -> f32 {
        let leading = self.line_height - (self.ascent + self.descent);
        self.ascent + leading / 2.0
    }

    /// Distance from the baseline to the bottom of the inline box.
    #[must_use]
    pub fn half_leading_descent(&self) -> f32 {
        self.line_height - self.half_leading_ascent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(pieces: &[TextPiece]) -> Vec<String> {
        pieces
            .iter()
            .map(|p| match p {
                TextPiece::Text(t) => t.text.clone(),
                TextPiece::Break => "\n".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_normal_collapses_runs() {
        let mut state = CollapseState::default();
        let pieces = process(
            "  hello \t\n world ",
            WhiteSpace::Normal,
            TextTransform::None,
            &mut state,
        );
        assert_eq!(texts(&pieces), vec!["hello world "]);
        assert!(state.after_space);
    }

    #[test]
    fn test_collapse_state_spans_text_boxes() {
        let mut state = CollapseState::default();
        let _ = process("a ", WhiteSpace::Normal, TextTransform::None, &mut state);
        let pieces = process(" b", WhiteSpace::Normal, TextTransform::None, &mut state);
        assert_eq!(texts(&pieces), vec!["b"]);
    }

    #[test]
    fn test_pre_expands_tabs_and_breaks_lines() {
        let mut state = CollapseState::default();
        let pieces = process("ab\tc\nd", WhiteSpace::Pre, TextTransform::None, &mut state);
        assert_eq!(texts(&pieces), vec!["ab      c", "\n", "d"]);
    }

    #[test]
    fn test_pre_line_removes_spaces_around_newline() {
        let mut state = CollapseState::default();
        let pieces = process("a  \n  b", WhiteSpace::PreLine, TextTransform::None, &mut state);
        assert_eq!(texts(&pieces), vec!["a", "\n", "b"]);
    }

    #[test]
    fn test_capitalize_keeps_source_map() {
        let mut state = CollapseState::default();
        let pieces = process(
            "hello  world",
            WhiteSpace::Normal,
            TextTransform::Capitalize,
            &mut state,
        );
        let TextPiece::Text(processed) = &pieces[0] else {
            panic!("expected text");
        };
        assert_eq!(processed.text, "Hello World");
        assert_eq!(processed.source[6], 7);
    }
}
