//! PDF writer.
//!
//! Lays out one block per record (bold title line, URL line, body text) on A4
//! pages using the standard Helvetica fonts, starting a new page whenever the
//! next line would cross the bottom margin. Text is encoded as Latin-1 for
//! the built-in fonts; anything outside it becomes `?`.

use super::{ensure_parent, Destination, RecordSet, SaveFormat};
use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 10.0 * MM;
const BOTTOM_MARGIN: f32 = 20.0 * MM;

const TITLE_SIZE: f32 = 12.0;
const TEXT_SIZE: f32 = 10.0;
const HEADING_LINE_HEIGHT: f32 = 10.0 * MM;
const BODY_LINE_HEIGHT: f32 = 5.0 * MM;
const RECORD_SPACING: f32 = 10.0 * MM;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722,
    722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722,
    667, 944, 667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556,
    556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500,
    500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722,
    722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722,
    667, 944, 667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611,
    611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

/// Width used for Latin-1 characters above ASCII.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn char_width(self, byte: u8, size: f32) -> f32 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let units = match byte {
            32..=126 => table[(byte - 32) as usize],
            _ => FALLBACK_WIDTH,
        };
        units as f32 * size / 1000.0
    }

    fn text_width(self, bytes: &[u8], size: f32) -> f32 {
        bytes.iter().map(|b| self.char_width(*b, size)).sum()
    }
}

/// Encode text as Latin-1, replacing anything unencodable with `?`.
///
/// Tabs become spaces; other control characters are replaced too.
pub fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x09 => b' ',
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Break Latin-1 text into lines no wider than `max_width`.
///
/// Words longer than a line are split across lines.
fn wrap_line(bytes: &[u8], font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let space = font.char_width(b' ', size);
    let mut lines: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0.0;

    for word in bytes.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let word_width = font.text_width(word, size);
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + space + word_width
        };

        if needed <= max_width {
            if !current.is_empty() {
                current.push(b' ');
                current_width += space;
            }
            current.extend_from_slice(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        for &byte in word {
            let width = font.char_width(byte, size);
            if current_width + width > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            current.push(byte);
            current_width += width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Accumulates page content streams.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height < BOTTOM_MARGIN {
            self.new_page();
        }
    }

    /// Write a wrapped block; each line occupies `line_height`.
    fn block(&mut self, text: &str, font: Font, size: f32, line_height: f32) {
        let max_width = PAGE_WIDTH - 2.0 * MARGIN;

        for paragraph in text.split('\n') {
            let encoded = to_latin1(paragraph.trim_end_matches('\r'));
            for line in wrap_line(&encoded, font, size, max_width) {
                self.ensure_room(line_height);
                let baseline = self.cursor - line_height / 2.0 - size * 0.3;
                self.current.extend(text_operations(&line, font, size, MARGIN, baseline));
                self.cursor -= line_height;
            }
        }
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.current);
        self.pages
    }
}

fn text_operations(line: &[u8], font: Font, size: f32, x: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(line.to_vec(), StringFormat::Hexadecimal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Write `<file_stem>.pdf`, one titled block per record.
pub fn write_pdf(set: &RecordSet, destination: &Destination) -> Result<String> {
    let path = destination.file_for(SaveFormat::Pdf)?;
    ensure_parent(&path)?;

    let mut layout = PageLayout::new();
    for row in 0..set.len() {
        layout.block(
            &format!("Title: {}", set.text(row, "title")),
            Font::Bold,
            TITLE_SIZE,
            HEADING_LINE_HEIGHT,
        );
        layout.block(
            &format!("URL: {}", set.text(row, "url")),
            Font::Regular,
            TEXT_SIZE,
            HEADING_LINE_HEIGHT,
        );
        layout.block(
            &set.text(row, "scraped_text"),
            Font::Regular,
            TEXT_SIZE,
            BODY_LINE_HEIGHT,
        );
        layout.gap(RECORD_SPACING);
    }

    let mut doc = build_document(layout.finish())?;
    doc.save(&path)?;
    Ok(path.display().to_string())
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::from(PAGE_WIDTH),
                Object::from(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::String(b"gleaner".to_vec(), StringFormat::Literal),
        "CreationDate" => Object::String(created.into_bytes(), StringFormat::Literal),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{persist, Record};
    use serde_json::json;

    fn article(title: &str, body: &str) -> Record {
        json!({ "url": "https://example.com/lesson", "title": title, "scraped_text": body })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_latin1_replaces_unencodable() {
        assert_eq!(to_latin1("café"), b"caf\xE9".to_vec());
        assert_eq!(to_latin1("π ≈ 3"), b"? ? 3".to_vec());
        assert_eq!(to_latin1("a\tb"), b"a b".to_vec());
        assert_eq!(to_latin1("emoji 🎓"), b"emoji ?".to_vec());
    }

    #[test]
    fn test_wrap_line_fits_width() {
        let text = to_latin1(&"word ".repeat(100));
        let max_width = 200.0;
        let lines = wrap_line(&text, Font::Regular, TEXT_SIZE, max_width);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Regular.text_width(line, TEXT_SIZE) <= max_width);
        }
        let rejoined: Vec<u8> = lines.join(&b' ');
        assert_eq!(rejoined, text[..text.len() - 1].to_vec());
    }

    #[test]
    fn test_wrap_line_splits_long_words() {
        let text = vec![b'm'; 500];
        let lines = wrap_line(&text, Font::Bold, TITLE_SIZE, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(Vec::len).sum::<usize>(), 500);
    }

    #[test]
    fn test_empty_text_still_takes_a_line() {
        assert_eq!(wrap_line(b"", Font::Regular, TEXT_SIZE, 100.0), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_writes_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(dir.path().join("algebra"), dir.path().join("db"), "articles");
        let records = vec![
            article("Algebra — basics", "Solve for x: 2x + 3 = 7."),
            article("Geometry", "Angles in a triangle sum to 180°."),
        ];

        let outcome = persist(&records, "pdf", &dest);
        assert!(outcome.is_saved(), "{:?}", outcome);

        let doc = Document::load(dest.file_path("pdf")).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    /// Text lines on the first page, with the font and size each is set in.
    fn rendered_lines(path: &std::path::Path) -> Vec<(String, f32, Vec<u8>)> {
        let doc = Document::load(path).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();

        let mut font = (String::new(), 0.0);
        let mut lines = Vec::new();
        for op in &content.operations {
            match op.operator.as_str() {
                "Tf" => {
                    let name = match &op.operands[0] {
                        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                        other => panic!("Unexpected font operand {:?}", other),
                    };
                    font = (name, op.operands[1].as_float().unwrap());
                }
                "Tj" => match &op.operands[0] {
                    Object::String(bytes, _) => lines.push((font.0.clone(), font.1, bytes.clone())),
                    other => panic!("Unexpected text operand {:?}", other),
                },
                _ => {}
            }
        }
        lines
    }

    #[test]
    fn test_record_layout_and_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(dir.path().join("layout"), dir.path().join("db"), "articles");
        let records = vec![article("Algebra — basics", "Solve for x.")];
        assert!(persist(&records, "pdf", &dest).is_saved());

        let lines = rendered_lines(&dest.file_path("pdf"));
        assert_eq!(lines.len(), 3);

        let (font, size, text) = &lines[0];
        assert_eq!((font.as_str(), *size), ("F2", 12.0));
        assert_eq!(text.as_slice(), b"Title: Algebra ? basics");

        let (font, size, text) = &lines[1];
        assert_eq!((font.as_str(), *size), ("F1", 10.0));
        assert_eq!(text.as_slice(), b"URL: https://example.com/lesson");

        let (font, size, text) = &lines[2];
        assert_eq!((font.as_str(), *size), ("F1", 10.0));
        assert_eq!(text.as_slice(), b"Solve for x.");
    }

    #[test]
    fn test_long_content_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(dir.path().join("long"), dir.path().join("db"), "articles");
        let body = "Long educational paragraph about photosynthesis. ".repeat(800);

        assert!(persist(&[article("Photosynthesis", &body)], "document", &dest).is_saved());

        let doc = Document::load(dest.file_path("pdf")).unwrap();
        assert!(doc.get_pages().len() > 1);
    }
}
