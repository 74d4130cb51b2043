//! Serialize a figure to a standalone single-page PDF.
//!
//! Used for previewing a figure outside any document. The page is
//! cropped tight to the drawn content with zero padding, like the pgf
//! backend; coordinates map directly since PDF user space is also y-up
//! with 72 units per inch. Text uses the built-in Helvetica face, and
//! raster images are drawn as outline placeholders since a preview does
//! not embed external files.

use std::fs::File;
use std::path::Path;

use glam::DVec2;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::errors::RenderFailure;
use crate::figure::{Bounds, Color, Figure, MarkKind};
use crate::style::Style;

use super::crop_bounds;

const POINTS_PER_INCH: f64 = 72.0;

/// Write the figure as a one-page PDF at `path`.
pub fn write(figure: &Figure, path: &Path) -> Result<(), RenderFailure> {
    let crop = crop_bounds(figure);
    let size = (crop.max - crop.min) * POINTS_PER_INCH;

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = page_content(figure, crop.min);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (size.x as f32).into(),
            (size.y as f32).into(),
        ],
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut file = File::create(path)?;
    doc.save_to(&mut file)?;
    Ok(())
}

fn page_content(figure: &Figure, origin: DVec2) -> Content {
    let mut ops: Vec<Operation> = Vec::new();
    let style = &figure.style;

    for axes in figure.axes() {
        let mut tr = axes.transform();
        tr.rect = Bounds::new(tr.rect.min - origin, tr.rect.max - origin);
        let rect = tr.rect;

        // Axes frame
        set_stroke(&mut ops, Color::BLACK, style.axes_line_width);
        ops.push(Operation::new(
            "re",
            vec![
                pt(rect.min.x),
                pt(rect.min.y),
                pt(rect.width()),
                pt(rect.height()),
            ],
        ));
        ops.push(Operation::new("S", vec![]));

        for mark in axes.marks() {
            match mark {
                MarkKind::LineSeries(series) => {
                    if series.points.len() < 2 {
                        continue;
                    }
                    set_stroke(
                        &mut ops,
                        series.color,
                        series.width.unwrap_or(style.line_width),
                    );
                    for (i, p) in series.points.iter().enumerate() {
                        let m = tr.map(*p);
                        let op = if i == 0 { "m" } else { "l" };
                        ops.push(Operation::new(op, vec![pt(m.x), pt(m.y)]));
                    }
                    ops.push(Operation::new("S", vec![]));
                }
                MarkKind::TextSpan(span) => {
                    let m = tr.map(span.anchor);
                    let (r, g, b) = span.color.rgb();
                    let size = span.size.unwrap_or(style.font_size);
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new(
                        "rg",
                        vec![(r as f32).into(), (g as f32).into(), (b as f32).into()],
                    ));
                    ops.push(Operation::new(
                        "Tf",
                        vec!["F1".into(), (size as f32).into()],
                    ));
                    ops.push(Operation::new("Td", vec![pt(m.x), pt(m.y)]));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::string_literal(span.text.as_str())],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
                MarkKind::RasterImage(image) => {
                    // Placeholder outline where the image would sit
                    let m = tr.map(image.anchor);
                    set_stroke(&mut ops, Color::GRAY, style.axes_line_width);
                    ops.push(Operation::new(
                        "re",
                        vec![pt(m.x), pt(m.y), pt(image.size.x), pt(image.size.y)],
                    ));
                    ops.push(Operation::new("S", vec![]));
                }
            }
        }

        if let Some(legend) = axes.legend_config() {
            emit_legend(&mut ops, axes.legend_entries(), rect, legend.frame_line_width, style);
        }
    }

    Content { operations: ops }
}

fn emit_legend(
    ops: &mut Vec<Operation>,
    entries: Vec<(&str, Color)>,
    rect: Bounds,
    frame_width: f64,
    style: &Style,
) {
    if entries.is_empty() {
        return;
    }
    let row = (1.0 + style.legend_label_spacing) * style.font_size_in();
    let pad = 0.5 * style.font_size_in();
    let sample = 2.0 * style.font_size_in();
    let box_w = sample + 3.0 * pad
        + entries
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0) as f64
            * 0.6
            * style.font_size_in();
    let box_h = entries.len() as f64 * row + 2.0 * pad;
    let x0 = rect.max.x - box_w - pad;
    let y0 = rect.max.y - box_h - pad;

    set_stroke(ops, Color::BLACK, frame_width);
    ops.push(Operation::new(
        "re",
        vec![pt(x0), pt(y0), pt(box_w), pt(box_h)],
    ));
    ops.push(Operation::new("S", vec![]));

    for (i, (label, color)) in entries.iter().enumerate() {
        let y = y0 + box_h - pad - (i as f64 + 0.7) * row;
        set_stroke(ops, *color, style.line_width);
        ops.push(Operation::new("m", vec![pt(x0 + pad), pt(y)]));
        ops.push(Operation::new("l", vec![pt(x0 + pad + sample), pt(y)]));
        ops.push(Operation::new("S", vec![]));

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
        ops.push(Operation::new(
            "Tf",
            vec!["F1".into(), (style.font_size as f32).into()],
        ));
        ops.push(Operation::new(
            "Td",
            vec![pt(x0 + 2.0 * pad + sample), pt(y)],
        ));
        ops.push(Operation::new("Tj", vec![Object::string_literal(*label)]));
        ops.push(Operation::new("ET", vec![]));
    }
}

fn set_stroke(ops: &mut Vec<Operation>, color: Color, width_pt: f64) {
    let (r, g, b) = color.rgb();
    ops.push(Operation::new("w", vec![(width_pt as f32).into()]));
    ops.push(Operation::new(
        "RG",
        vec![(r as f32).into(), (g as f32).into(), (b as f32).into()],
    ));
}

/// Figure inches to PDF user-space points.
fn pt(inches: f64) -> Object {
    ((inches * POINTS_PER_INCH) as f32).into()
}
