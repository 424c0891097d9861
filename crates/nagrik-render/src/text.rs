use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
    /// Line box height; `None` uses the measurer's factor.
    pub line_height: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
            line_height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free estimate: display columns times font size times a width factor.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        // Wide (CJK) characters take two columns.
        let max_cols = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        let line_height = style
            .line_height
            .unwrap_or(font_size * line_height_factor);
        TextMetrics {
            width: max_cols as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * line_height,
            line_count: lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_columns_and_font_size() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let ascii = m.measure("abcd", &style);
        assert!((ascii.width - 24.0).abs() < 1e-9);
        assert!((ascii.height - 12.0).abs() < 1e-9);

        let wide = m.measure("日本", &style);
        assert!((wide.width - ascii.width).abs() < 1e-9);
    }

    #[test]
    fn explicit_line_height_wins() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 14.0,
            line_height: Some(20.0),
            ..Default::default()
        };
        let metrics = m.measure("one\ntwo", &style);
        assert_eq!(metrics.line_count, 2);
        assert!((metrics.height - 40.0).abs() < 1e-9);
    }
}
