//! Serialize a figure to pgf macros.
//!
//! The output is a single `pgfpicture` environment meant to be `\input`
//! into a document, matching the conventions of other pgf-producing
//! tools: explicit bounding box first, lengths in inches, one drawing
//! command per line. The bounding box is cropped tight to the drawn
//! content with zero padding, and every coordinate is shifted so the
//! crop's corner is the origin; unused canvas never reaches the
//! document.

use std::fmt::Write;

use glam::DVec2;

use crate::figure::{Axes, Bounds, Color, Figure, Mark, family_selector};
use crate::style::Style;

use super::crop_bounds;

/// Serialize the whole figure. The result still carries font family
/// selectors and bare image references; [`super::patch`] strips and
/// rewrites those before the artifact is embeddable.
pub fn serialize(figure: &Figure) -> String {
    let mut out = String::new();
    let crop = crop_bounds(figure);

    out.push_str("\\begingroup\n\\makeatletter\n\\begin{pgfpicture}\n");
    let _ = writeln!(
        out,
        "\\pgfpathrectangle{{\\pgfpointorigin}}{{\\pgfqpoint{{{:.6}in}}{{{:.6}in}}}}",
        crop.width(),
        crop.height()
    );
    out.push_str("\\pgfusepath{use as bounding box}\n");

    for axes in figure.axes() {
        emit_axes(axes, &figure.style, crop.min, &mut out);
    }

    out.push_str("\\end{pgfpicture}\n\\makeatother\n\\endgroup\n");
    out
}

fn emit_axes(axes: &Axes, style: &Style, origin: DVec2, out: &mut String) {
    let mut tr = axes.transform();
    tr.rect = Bounds::new(tr.rect.min - origin, tr.rect.max - origin);
    let rect = tr.rect;

    emit_frame(rect, style, out);
    for mark in axes.marks() {
        mark.emit_pgf(&tr, style, out);
    }
    if let Some(legend) = axes.legend_config() {
        emit_legend(axes.legend_entries(), rect, legend.frame_line_width, style, out);
    }
}

fn emit_frame(rect: Bounds, style: &Style, out: &mut String) {
    set_stroke(Color::BLACK, style.axes_line_width, out);
    let _ = writeln!(
        out,
        "\\pgfpathrectangle{{\\pgfqpoint{{{:.6}in}}{{{:.6}in}}}}{{\\pgfqpoint{{{:.6}in}}{{{:.6}in}}}}",
        rect.min.x,
        rect.min.y,
        rect.width(),
        rect.height()
    );
    out.push_str("\\pgfusepath{stroke}\n");
}

fn emit_legend(
    entries: Vec<(&str, Color)>,
    rect: Bounds,
    frame_width: f64,
    style: &Style,
    out: &mut String,
) {
    if entries.is_empty() {
        return;
    }

    let row = (1.0 + style.legend_label_spacing) * style.font_size_in();
    let sample = 2.0 * style.font_size_in();
    let pad = 0.5 * style.font_size_in();
    let box_w = sample + 3.0 * pad + longest_label(&entries) * 0.6 * style.font_size_in();
    let box_h = entries.len() as f64 * row + 2.0 * pad;
    let x0 = rect.max.x - box_w - pad;
    let y0 = rect.max.y - box_h - pad;

    set_stroke(Color::BLACK, frame_width, out);
    let _ = writeln!(
        out,
        "\\pgfpathrectangle{{\\pgfqpoint{{{x0:.6}in}}{{{y0:.6}in}}}}{{\\pgfqpoint{{{box_w:.6}in}}{{{box_h:.6}in}}}}"
    );
    out.push_str("\\pgfusepath{stroke}\n");

    let family = family_selector(style.font_family);
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = y0 + box_h - pad - (i as f64 + 0.7) * row;
        set_stroke(*color, style.line_width, out);
        let _ = writeln!(
            out,
            "\\pgfpathmoveto{{\\pgfqpoint{{{:.6}in}}{{{y:.6}in}}}}",
            x0 + pad
        );
        let _ = writeln!(
            out,
            "\\pgfpathlineto{{\\pgfqpoint{{{:.6}in}}{{{y:.6}in}}}}",
            x0 + pad + sample
        );
        out.push_str("\\pgfusepath{stroke}\n");
        let _ = writeln!(
            out,
            "\\pgftext[x={:.6}in,y={y:.6}in,left,base]{{{family}\\fontsize{{{:.2}}}{{{:.2}}}\\selectfont {}}}",
            x0 + 2.0 * pad + sample,
            style.font_size,
            style.font_size * 1.2,
            crate::figure::escape_tex(label),
        );
    }
}

fn set_stroke(color: Color, width_pt: f64, out: &mut String) {
    let (r, g, b) = color.rgb();
    let _ = writeln!(out, "\\pgfsetlinewidth{{{width_pt:.6}pt}}");
    let _ = writeln!(
        out,
        "\\definecolor{{currentstroke}}{{rgb}}{{{r:.6},{g:.6},{b:.6}}}"
    );
    let _ = writeln!(out, "\\pgfsetstrokecolor{{currentstroke}}");
}

fn longest_label(entries: &[(&str, Color)]) -> f64 {
    entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0) as f64
}
