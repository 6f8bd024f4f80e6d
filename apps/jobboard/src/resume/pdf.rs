//! Resume PDF writer: a title line followed by a two-column `Field | Details`
//! table. Rows wrap within their column and continue on a new page (with the
//! header repeated) when they run past the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::resume::metrics::wrap;
use crate::resume::ResumeForm;

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;

const TITLE_SIZE: f32 = 22.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
const CELL_PADDING: f32 = 6.0;

const FIELD_COL_WIDTH: f32 = 110.0;
const DETAIL_COL_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN - FIELD_COL_WIDTH;

const HEADER_FILL: (f32, f32, f32) = (0.16, 0.5, 0.725);

/// Collects drawing operations page by page, tracking the write cursor.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.ops);
        self.pages
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(to_latin1(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn fill_color(&mut self, (r, g, b): (f32, f32, f32)) {
        self.ops
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &str) {
        self.ops
            .push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new(paint, vec![]));
    }

    fn header_row(&mut self) {
        let height = LINE_HEIGHT + 2.0 * CELL_PADDING;
        let top = self.y;
        self.fill_color(HEADER_FILL);
        self.rect(MARGIN, top - height, FIELD_COL_WIDTH + DETAIL_COL_WIDTH, height, "f");
        self.fill_color((1.0, 1.0, 1.0));
        let baseline = top - CELL_PADDING - BODY_SIZE;
        self.text("F2", BODY_SIZE, MARGIN + CELL_PADDING, baseline, "Field");
        self.text(
            "F2",
            BODY_SIZE,
            MARGIN + FIELD_COL_WIDTH + CELL_PADDING,
            baseline,
            "Details",
        );
        self.fill_color((0.0, 0.0, 0.0));
        self.y -= height;
    }

    /// Draws one table row chunk: the label (first chunk only) and up to
    /// `lines.len()` detail lines.
    fn row_chunk(&mut self, label: &str, lines: &[String]) {
        let height = lines.len().max(1) as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING;
        let top = self.y;

        self.rect(MARGIN, top - height, FIELD_COL_WIDTH, height, "S");
        self.rect(MARGIN + FIELD_COL_WIDTH, top - height, DETAIL_COL_WIDTH, height, "S");

        let first_baseline = top - CELL_PADDING - BODY_SIZE;
        if !label.is_empty() {
            self.text("F1", BODY_SIZE, MARGIN + CELL_PADDING, first_baseline, label);
        }
        for (i, line) in lines.iter().enumerate() {
            let y = first_baseline - i as f32 * LINE_HEIGHT;
            self.text(
                "F1",
                BODY_SIZE,
                MARGIN + FIELD_COL_WIDTH + CELL_PADDING,
                y,
                line,
            );
        }
        self.y -= height;
    }
}

/// Renders the resume to PDF bytes.
pub fn render_resume(form: &ResumeForm) -> Result<Vec<u8>, lopdf::Error> {
    let mut writer = PageWriter::new();

    let title_y = writer.y - TITLE_SIZE;
    writer.text(
        "F2",
        TITLE_SIZE,
        MARGIN,
        title_y,
        &format!("Resume of {}", form.name),
    );
    writer.y -= TITLE_SIZE + 2.0 * CELL_PADDING;
    writer.header_row();

    let text_width = DETAIL_COL_WIDTH - 2.0 * CELL_PADDING;
    for (label, value) in form.rows() {
        let lines = wrap(value, BODY_SIZE, text_width);
        let mut rest: &[String] = &lines;
        let mut first = true;

        while !rest.is_empty() {
            let fits = ((writer.remaining() - 2.0 * CELL_PADDING) / LINE_HEIGHT).floor();
            if fits < 1.0 {
                writer.new_page();
                writer.header_row();
                continue;
            }
            let take = (fits as usize).min(rest.len());
            let (chunk, tail) = rest.split_at(take);
            writer.row_chunk(if first { label } else { "" }, chunk);
            rest = tail;
            first = false;
        }
    }

    build_document(writer.finish())
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

/// Standard Type 1 fonts take single-byte text; characters outside Latin-1
/// become `?`.
fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
