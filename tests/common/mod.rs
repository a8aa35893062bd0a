//! Shared helpers: small PDFs built with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text on a generated page.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub text: &'a str,
    pub size: i64,
    pub bold: bool,
}

pub fn heading(text: &str, size: i64) -> Line<'_> {
    Line {
        text,
        size,
        bold: true,
    }
}

pub fn body(text: &str) -> Line<'_> {
    Line {
        text,
        size: 11,
        bold: false,
    }
}

fn page_operations(lines: &[Line<'_>]) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];
    let mut y = 780;
    for line in lines {
        let font = if line.bold { "F2" } else { "F1" };
        ops.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                72.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
        y -= line.size + 8;
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Build a PDF with one page per entry of `pages`, regular lines in
/// Helvetica and bold lines in Helvetica-Bold.
pub fn build_pdf(pages: &[Vec<Line<'_>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => regular_id, "F2" => bold_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a generated PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<Line<'_>>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path
}

/// A two-page travel guide: title, three heading levels, and body text.
pub fn travel_guide() -> Vec<Vec<Line<'static>>> {
    vec![
        vec![
            heading("Travel Guide", 24),
            heading("Welcome", 18),
            body("The coast has mild winters."),
            body("Trains run every hour."),
            heading("Getting There", 14),
            body("Fly into Nice airport."),
        ],
        vec![
            heading("Food", 18),
            body("Try the local socca."),
            body("Markets open early."),
            body("Book dinner ahead."),
        ],
    ]
}

/// A one-page cookbook whose sections talk about cooking.
pub fn cookbook() -> Vec<Vec<Line<'static>>> {
    vec![vec![
        heading("Recipes", 20),
        body("Simmer the stock slowly."),
        heading("Desserts", 20),
        body("Whisk the cream until stiff."),
    ]]
}
