//! Figure style configuration.
//!
//! Styling is explicit: the engine holds a base [`Style`] and clones it
//! into every figure it draws, so one figure cannot leak styling into the
//! next. There is no ambient global style state anywhere in the pipeline.

use crate::units::PT_PER_INCH;

/// Font family selector for figure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    /// Inherit the surrounding document's roman face.
    #[default]
    Serif,
    Sans,
    Mono,
}

/// Visual parameters for one figure.
///
/// Lengths are in points except `line_width` and `axes_line_width` which
/// are also points (they scale stroke widths, not layout). `figure_dpi`
/// governs rasterization of embedded images only.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Text size in points.
    pub font_size: f64,
    pub font_family: FontFamily,
    /// Stroke width for axes frames and legend frames, points.
    pub axes_line_width: f64,
    /// Default stroke width for plotted series, points.
    pub line_width: f64,
    /// Gap between legend entries, relative to the font size.
    pub legend_label_spacing: f64,
    /// Resolution for rasterized figure content.
    pub figure_dpi: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            font_size: 10.0,
            font_family: FontFamily::Serif,
            axes_line_width: 0.6,
            line_width: 1.0,
            legend_label_spacing: 0.3,
            figure_dpi: 300.0,
        }
    }
}

impl Style {
    /// Style matched to a document: figure text at the document font size,
    /// everything else at the defaults.
    pub fn document(font_size_pt: f64) -> Self {
        Style {
            font_size: font_size_pt,
            ..Style::default()
        }
    }

    /// Font size converted to inches, for layout math.
    pub fn font_size_in(&self) -> f64 {
        self.font_size / PT_PER_INCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_style_keeps_defaults() {
        let style = Style::document(11.0);
        assert_eq!(style.font_size, 11.0);
        assert_eq!(style.axes_line_width, Style::default().axes_line_width);
        assert_eq!(style.font_family, FontFamily::Serif);
    }

    #[test]
    fn font_size_in_inches() {
        let style = Style::document(72.27);
        assert!((style.font_size_in() - 1.0).abs() < 1e-12);
    }
}
