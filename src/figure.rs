//! The figure scene graph.
//!
//! A [`Figure`] is what a drawing routine receives: a sized canvas in
//! inches (y-up, origin at the bottom-left) holding zero or more [`Axes`].
//! Marks are stored in data coordinates and mapped through the axes'
//! ranges only at emission time, so ranges may be set before or after
//! plotting.

use std::fmt::Write;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::style::{FontFamily, Style};

/// RGB color packed as 0xRRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const RED: Color = Color(0xC82828);
    pub const BLUE: Color = Color(0x2850C8);
    pub const GREEN: Color = Color(0x1E7832);
    pub const GRAY: Color = Color(0x808080);

    /// Unpack into unit-range components.
    pub fn rgb(self) -> (f64, f64, f64) {
        let r = ((self.0 >> 16) & 0xFF) as f64 / 255.0;
        let g = ((self.0 >> 8) & 0xFF) as f64 / 255.0;
        let b = (self.0 & 0xFF) as f64 / 255.0;
        (r, g, b)
    }
}

/// Axis-aligned bounding box in figure inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Bounds { min, max }
    }

    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Bounds {
            min: dvec2(x, y),
            max: dvec2(x + w, y + h),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// Maps data coordinates into figure inches for one axes rectangle.
#[derive(Debug, Clone, Copy)]
pub struct AxesTransform {
    pub rect: Bounds,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl AxesTransform {
    pub fn map(&self, p: DVec2) -> DVec2 {
        let span_x = self.x_range.1 - self.x_range.0;
        let span_y = self.y_range.1 - self.y_range.0;
        // Degenerate ranges pin to the low edge instead of dividing by zero
        let fx = if span_x == 0.0 {
            0.0
        } else {
            (p.x - self.x_range.0) / span_x
        };
        let fy = if span_y == 0.0 {
            0.0
        } else {
            (p.y - self.y_range.0) / span_y
        };
        dvec2(
            self.rect.min.x + fx * self.rect.width(),
            self.rect.min.y + fy * self.rect.height(),
        )
    }
}

/// Common behavior for every mark on an axes.
#[enum_dispatch]
pub trait Mark {
    /// Extent of the mark in figure inches, after mapping.
    fn extent(&self, tr: &AxesTransform) -> Bounds;

    /// Emit pgf drawing commands for this mark.
    fn emit_pgf(&self, tr: &AxesTransform, style: &Style, out: &mut String);
}

/// A polyline through data points.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub points: Vec<DVec2>,
    pub color: Color,
    /// Stroke width in points; `None` takes the style default.
    pub width: Option<f64>,
    pub label: Option<String>,
}

impl Mark for LineSeries {
    fn extent(&self, tr: &AxesTransform) -> Bounds {
        let mut bounds = Bounds::new(tr.rect.min, tr.rect.min);
        for (i, p) in self.points.iter().enumerate() {
            let mapped = tr.map(*p);
            if i == 0 {
                bounds = Bounds::new(mapped, mapped);
            } else {
                bounds.include(mapped);
            }
        }
        bounds
    }

    fn emit_pgf(&self, tr: &AxesTransform, style: &Style, out: &mut String) {
        if self.points.len() < 2 {
            return;
        }
        let width = self.width.unwrap_or(style.line_width);
        let (r, g, b) = self.color.rgb();
        let _ = writeln!(out, "\\pgfsetlinewidth{{{width:.6}pt}}");
        let _ = writeln!(
            out,
            "\\definecolor{{currentstroke}}{{rgb}}{{{r:.6},{g:.6},{b:.6}}}"
        );
        let _ = writeln!(out, "\\pgfsetstrokecolor{{currentstroke}}");
        for (i, p) in self.points.iter().enumerate() {
            let m = tr.map(*p);
            let op = if i == 0 {
                "\\pgfpathmoveto"
            } else {
                "\\pgfpathlineto"
            };
            let _ = writeln!(
                out,
                "{op}{{\\pgfqpoint{{{:.6}in}}{{{:.6}in}}}}",
                m.x, m.y
            );
        }
        let _ = writeln!(out, "\\pgfusepath{{stroke}}");
    }
}

/// A run of text anchored at a data point.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub anchor: DVec2,
    pub text: String,
    pub color: Color,
    /// Size in points; `None` takes the style font size.
    pub size: Option<f64>,
}

impl Mark for TextSpan {
    fn extent(&self, tr: &AxesTransform) -> Bounds {
        let p = tr.map(self.anchor);
        Bounds::new(p, p)
    }

    fn emit_pgf(&self, tr: &AxesTransform, style: &Style, out: &mut String) {
        let p = tr.map(self.anchor);
        let size = self.size.unwrap_or(style.font_size);
        let (r, g, b) = self.color.rgb();
        let family = family_selector(style.font_family);
        let _ = writeln!(
            out,
            "\\definecolor{{currenttext}}{{rgb}}{{{r:.6},{g:.6},{b:.6}}}"
        );
        let _ = writeln!(
            out,
            "\\pgftext[x={:.6}in,y={:.6}in,left,base]{{\\color{{currenttext}}{family}\\fontsize{{{size:.2}}}{{{:.2}}}\\selectfont {}}}",
            p.x,
            p.y,
            size * 1.2,
            escape_tex(&self.text),
        );
    }
}

/// An external raster image placed on the axes, referenced by file name.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Bottom-left corner, data coordinates.
    pub anchor: DVec2,
    /// Display size in inches.
    pub size: DVec2,
    /// File name as written into the output, relative to the artifact.
    pub file: String,
}

impl Mark for RasterImage {
    fn extent(&self, tr: &AxesTransform) -> Bounds {
        let p = tr.map(self.anchor);
        Bounds::new(p, p + self.size)
    }

    fn emit_pgf(&self, tr: &AxesTransform, _style: &Style, out: &mut String) {
        let p = tr.map(self.anchor);
        let _ = writeln!(
            out,
            "\\pgftext[x={:.6}in,y={:.6}in,left,bottom]{{\\pgfimage[width={:.6}in,height={:.6}in]{{{}}}}}",
            p.x, p.y, self.size.x, self.size.y, self.file,
        );
    }
}

#[enum_dispatch(Mark)]
#[derive(Debug, Clone)]
pub enum MarkKind {
    LineSeries,
    TextSpan,
    RasterImage,
}

/// Legend configuration for one axes. Entries come from labeled series.
#[derive(Debug, Clone)]
pub struct Legend {
    /// Frame stroke width in points. The engine aligns this with the axes
    /// frame width before serialization.
    pub frame_line_width: f64,
}

/// One plotting region inside a figure.
#[derive(Debug, Clone)]
pub struct Axes {
    rect: Bounds,
    x_range: (f64, f64),
    y_range: (f64, f64),
    marks: Vec<MarkKind>,
    legend: Option<Legend>,
}

impl Axes {
    fn new(rect: Bounds) -> Self {
        Axes {
            rect,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            marks: Vec::new(),
            legend: None,
        }
    }

    pub fn rect(&self) -> Bounds {
        self.rect
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.x_range = (lo, hi);
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.y_range = (lo, hi);
    }

    pub fn transform(&self) -> AxesTransform {
        AxesTransform {
            rect: self.rect,
            x_range: self.x_range,
            y_range: self.y_range,
        }
    }

    /// Plot a line series through `(x, y)` data pairs.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> &mut Self {
        self.plot_styled(xs, ys, Color::BLACK, None)
    }

    pub fn plot_styled(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        color: Color,
        label: Option<&str>,
    ) -> &mut Self {
        let points = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| dvec2(x, y))
            .collect();
        self.marks.push(MarkKind::LineSeries(LineSeries {
            points,
            color,
            width: None,
            label: label.map(str::to_string),
        }));
        self
    }

    /// Place text at a data point.
    pub fn text(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        self.marks.push(MarkKind::TextSpan(TextSpan {
            anchor: dvec2(x, y),
            text: text.to_string(),
            color: Color::BLACK,
            size: None,
        }));
        self
    }

    /// Place an external image, anchored at a data point, sized in inches.
    pub fn image(&mut self, x: f64, y: f64, width: f64, height: f64, file: &str) -> &mut Self {
        self.marks.push(MarkKind::RasterImage(RasterImage {
            anchor: dvec2(x, y),
            size: dvec2(width, height),
            file: file.to_string(),
        }));
        self
    }

    /// Request a legend built from the labeled series on this axes.
    pub fn legend(&mut self) -> &mut Self {
        self.legend = Some(Legend {
            frame_line_width: 1.0,
        });
        self
    }

    pub fn marks(&self) -> &[MarkKind] {
        &self.marks
    }

    pub fn legend_config(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn legend_config_mut(&mut self) -> Option<&mut Legend> {
        self.legend.as_mut()
    }

    /// Labels of the series that carry one, in plot order.
    pub fn legend_entries(&self) -> Vec<(&str, Color)> {
        self.marks
            .iter()
            .filter_map(|m| match m {
                MarkKind::LineSeries(s) => {
                    s.label.as_deref().map(|label| (label, s.color))
                }
                _ => None,
            })
            .collect()
    }
}

/// A complete figure: a canvas in inches plus its axes.
#[derive(Debug, Clone)]
pub struct Figure {
    size: DVec2,
    pub style: Style,
    axes: Vec<Axes>,
}

impl Figure {
    pub fn new(width: f64, height: f64, style: Style) -> Self {
        Figure {
            size: dvec2(width, height),
            style,
            axes: Vec::new(),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Add an axes covering the given rectangle, in figure inches.
    pub fn add_axes(&mut self, rect: Bounds) -> &mut Axes {
        let idx = self.axes.len();
        self.axes.push(Axes::new(rect));
        &mut self.axes[idx]
    }

    /// Add an axes filling the figure minus a margin scaled to the font
    /// size, the common case for a single-plot figure.
    pub fn full_axes(&mut self) -> &mut Axes {
        let margin = 3.0 * self.style.font_size_in();
        let rect = Bounds::from_xywh(
            margin,
            margin,
            (self.size.x - 2.0 * margin).max(0.0),
            (self.size.y - 2.0 * margin).max(0.0),
        );
        self.add_axes(rect)
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    /// Union of everything drawn so far, in figure inches. `None` for a
    /// figure with no axes. Axes frames count even when empty.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for axes in &self.axes {
            let tr = axes.transform();
            let mut b = axes.rect();
            for mark in &axes.marks {
                b = b.union(&mark.extent(&tr));
            }
            bounds = Some(match bounds {
                Some(prev) => prev.union(&b),
                None => b,
            });
        }
        bounds
    }
}

pub(crate) fn family_selector(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Serif => "\\rmfamily",
        FontFamily::Sans => "\\sffamily",
        FontFamily::Mono => "\\ttfamily",
    }
}

pub(crate) fn escape_tex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_ranges_to_rect() {
        let mut fig = Figure::new(4.0, 2.0, Style::default());
        let axes = fig.add_axes(Bounds::from_xywh(1.0, 0.5, 2.0, 1.0));
        axes.set_xlim(0.0, 10.0);
        axes.set_ylim(-1.0, 1.0);
        let tr = axes.transform();
        assert_eq!(tr.map(dvec2(0.0, -1.0)), dvec2(1.0, 0.5));
        assert_eq!(tr.map(dvec2(10.0, 1.0)), dvec2(3.0, 1.5));
        assert_eq!(tr.map(dvec2(5.0, 0.0)), dvec2(2.0, 1.0));
    }

    #[test]
    fn degenerate_range_does_not_divide_by_zero() {
        let mut fig = Figure::new(1.0, 1.0, Style::default());
        let axes = fig.add_axes(Bounds::from_xywh(0.0, 0.0, 1.0, 1.0));
        axes.set_xlim(3.0, 3.0);
        let p = axes.transform().map(dvec2(3.0, 0.5));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn content_bounds_cover_marks_outside_the_axes() {
        let mut fig = Figure::new(2.0, 2.0, Style::default());
        let axes = fig.add_axes(Bounds::from_xywh(0.5, 0.5, 1.0, 1.0));
        // y = 2 in data coordinates overshoots the axes rect
        axes.plot(&[0.0, 1.0], &[0.0, 2.0]);
        let bounds = fig.content_bounds().unwrap();
        assert_eq!(bounds.min, dvec2(0.5, 0.5));
        assert_eq!(bounds.max, dvec2(1.5, 2.5));

        assert!(Figure::new(1.0, 1.0, Style::default())
            .content_bounds()
            .is_none());
    }

    #[test]
    fn legend_entries_follow_labels() {
        let mut fig = Figure::new(2.0, 2.0, Style::default());
        let axes = fig.full_axes();
        axes.plot_styled(&[0.0, 1.0], &[0.0, 1.0], Color::RED, Some("up"));
        axes.plot(&[0.0, 1.0], &[1.0, 0.0]);
        axes.plot_styled(&[0.0, 1.0], &[0.5, 0.5], Color::BLUE, Some("flat"));
        let entries = axes.legend_entries();
        assert_eq!(
            entries,
            vec![("up", Color::RED), ("flat", Color::BLUE)]
        );
    }

    #[test]
    fn line_series_emits_stroke_path() {
        let series = LineSeries {
            points: vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0)],
            color: Color::BLACK,
            width: None,
            label: None,
        };
        let tr = AxesTransform {
            rect: Bounds::from_xywh(0.0, 0.0, 2.0, 2.0),
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        };
        let mut out = String::new();
        series.emit_pgf(&tr, &Style::default(), &mut out);
        assert!(out.contains("\\pgfpathmoveto{\\pgfqpoint{0.000000in}{0.000000in}}"));
        assert!(out.contains("\\pgfpathlineto{\\pgfqpoint{2.000000in}{2.000000in}}"));
        assert!(out.contains("\\pgfusepath{stroke}"));
    }

    #[test]
    fn single_point_series_emits_nothing() {
        let series = LineSeries {
            points: vec![dvec2(0.5, 0.5)],
            color: Color::BLACK,
            width: None,
            label: None,
        };
        let tr = AxesTransform {
            rect: Bounds::from_xywh(0.0, 0.0, 1.0, 1.0),
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        };
        let mut out = String::new();
        series.emit_pgf(&tr, &Style::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn tex_escaping() {
        assert_eq!(escape_tex("50%"), "50\\%");
        assert_eq!(escape_tex("a_b"), "a\\_b");
        assert_eq!(escape_tex("x~y"), "x\\textasciitilde{}y");
    }
}
