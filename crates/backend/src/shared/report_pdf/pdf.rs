//! Minimal PDF 1.4 writer for composed documents.
//!
//! Uses the base-14 Helvetica faces with WinAnsi encoding, so no fonts are
//! embedded. Characters WinAnsi cannot represent are written as `?`.

use std::fmt::Write as _;

use super::layout::{Document, Element, Page};
use super::text::win_ansi;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Serialise `doc` to PDF bytes. Every page gets its own content stream.
pub fn render_pdf(doc: &Document) -> Vec<u8> {
    let mut writer = PdfWriter::default();
    let page_count = doc.pages.len().max(1);

    // 1 catalog, 2 page tree, 3-4 fonts, then page/content pairs
    let page_ids: Vec<usize> = (0..page_count).map(|i| 5 + 2 * i).collect();

    writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
    let kids = page_ids.iter().map(|id| format!("{} 0 R", id)).collect::<Vec<_>>().join(" ");
    writer.object(2, &format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_count));
    writer.object(
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    writer.object(
        4,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let blank = Page {
        number: 1,
        elements: Vec::new(),
    };
    let pages: Vec<&Page> = if doc.pages.is_empty() { vec![&blank] } else { doc.pages.iter().collect() };

    for (page, id) in pages.iter().zip(&page_ids) {
        writer.object(
            *id,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /{} 3 0 R /{} 4 0 R >> >> /Contents {} 0 R >>",
                num(doc.width),
                num(doc.height),
                REGULAR,
                BOLD,
                id + 1
            ),
        );
        let content = page_content(page, doc.height);
        writer.object(
            id + 1,
            &format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        );
    }

    writer.finish()
}

#[derive(Default)]
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn object(&mut self, id: usize, body: &str) {
        if self.buf.is_empty() {
            self.buf.extend_from_slice(b"%PDF-1.4\n");
        }
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for (_, offset) in &self.offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, xref_at
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

fn page_content(page: &Page, height: f32) -> String {
    let mut out = String::new();
    for element in &page.elements {
        // write! into a String cannot fail
        let _ = match element {
            Element::Text {
                x,
                y,
                size,
                bold,
                text,
            } => writeln!(
                out,
                "BT /{} {} Tf {} {} Td ({}) Tj ET",
                if *bold { BOLD } else { REGULAR },
                num(*size),
                num(*x),
                num(height - y),
                encode_text(text)
            ),
            Element::Line { x1, y1, x2, y2 } => writeln!(
                out,
                "0.5 w {} {} m {} {} l S",
                num(*x1),
                num(height - y1),
                num(*x2),
                num(height - y2)
            ),
            Element::Rect {
                x,
                y,
                width,
                height: h,
                fill_gray,
            } => {
                let rect = format!("{} {} {} {} re", num(*x), num(height - y - h), num(*width), num(*h));
                match fill_gray {
                    Some(gray) => writeln!(out, "{} g {} f 0 g", num(*gray), rect),
                    None => writeln!(out, "0.5 w {} S", rect),
                }
            }
        };
    }
    out.truncate(out.trim_end().len());
    out
}

fn num(value: f32) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Escape `text` for a PDF literal string, mapping to WinAnsi bytes.
/// Non-ASCII bytes are written as octal escapes so the stream stays ASCII.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let byte = win_ansi(c).unwrap_or(b'?');
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pages: Vec<Vec<Element>>) -> Document {
        Document {
            width: 595.28,
            height: 841.89,
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, elements)| Page {
                    number: i as u32 + 1,
                    elements,
                })
                .collect(),
        }
    }

    fn text(s: &str) -> Element {
        Element::Text {
            x: 40.0,
            y: 50.0,
            size: 9.0,
            bold: false,
            text: s.to_string(),
        }
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("Página (1) \\"), "P\\341gina \\(1\\) \\\\");
        assert_eq!(encode_text("Más…"), "M\\341s\\205");
        assert_eq!(encode_text("Привет €"), "?????? \\200");
    }

    #[test]
    fn test_num() {
        assert_eq!(num(595.28), "595.28");
        assert_eq!(num(40.0), "40");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_structure_and_xref() {
        let bytes = render_pdf(&doc(vec![vec![text("uno")], vec![text("dos")]]));
        let body = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(body.ends_with("%%EOF\n"));
        assert!(body.contains("/Count 2"));
        assert!(body.contains("/Kids [5 0 R 7 0 R]"));
        assert!(body.contains("BT /F1 9 Tf 40 791.89 Td (uno) Tj ET"));

        let startxref = body.rsplit("startxref\n").next().unwrap();
        let xref_at: usize = startxref.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref\n0 9\n"));

        // every xref entry points at its object header
        let entries = body[xref_at..].lines().skip(3).take(8);
        for (i, entry) in entries.enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_stream_length_matches_content() {
        let bytes = render_pdf(&doc(vec![vec![
            text("hola"),
            Element::Rect {
                x: 40.0,
                y: 40.0,
                width: 100.0,
                height: 20.0,
                fill_gray: Some(0.9),
            },
        ]]));
        let body = String::from_utf8_lossy(&bytes);

        let after = body.split("/Length ").nth(1).unwrap();
        let length: usize = after[..after.find(' ').unwrap()].parse().unwrap();
        let start = after.find("stream\n").unwrap() + "stream\n".len();
        let end = start + after[start..].find("\nendstream").unwrap();
        let content = &after[start..end];
        assert_eq!(content.len(), length);
        assert!(content.contains("0.9 g 40 781.89 100 20 re f 0 g"));
    }

    #[test]
    fn test_empty_document_still_has_a_page() {
        let bytes = render_pdf(&doc(vec![]));
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 1"));
    }
}
