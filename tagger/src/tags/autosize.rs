//! Width of the pending-text field.

use unicode_width::UnicodeWidthStr;

use super::TagInput;

/// Measures rendered text width in the host's layout units.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> u16;
}

/// Measures terminal cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWidthMeasure;

impl TextMeasure for UnicodeWidthMeasure {
    fn text_width(&self, text: &str) -> u16 {
        u16::try_from(text.width()).unwrap_or(u16::MAX)
    }
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> u16,
{
    fn text_width(&self, text: &str) -> u16 {
        self(text)
    }
}

impl TagInput {
    /// Width the pending-text field should take so the typed text fits.
    ///
    /// The text is measured with two extra `m` characters of slack and the
    /// result is clamped to `[input_min_width, max]`, where `max` is the
    /// configured `input_max_width` or else `container_width`.
    pub fn input_width(&self, measure: &dyn TextMeasure, container_width: Option<u16>) -> u16 {
        let sample: String = std::iter::repeat_n('m', 2)
            .chain(self.pending.value().chars().map(|c| {
                if c.is_whitespace() { ' ' } else { c }
            }))
            .collect();
        let natural = measure.text_width(&sample);
        let max = self
            .config
            .input_max_width
            .or(container_width)
            .unwrap_or(u16::MAX);
        natural.min(max).max(self.config.input_min_width)
    }
}
