//! Pagination of report sections.
//!
//! The composer moves through three states: the header is written when it is
//! created, sections are appended one after another, and `finish` stamps the
//! `Página N de M` footer on every page once the page count is known.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page; `y` grows downwards. Text `y` is the baseline.

use contracts::shared::report_document::{
    CellAlign, InsightBlock, KeyValueBlock, Section, SectionBlock, TableBlock,
};
use thiserror::Error;

use super::text::{text_width, truncate_lines, wrap};

const EPSILON: f32 = 0.01;
const EMPTY_SECTION: &str = "Sin información para este periodo";

/// A section that cannot be laid out. This is a bug in whoever built it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid section {section:?}: {message}")]
pub struct InvalidSectionError {
    pub section: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Space reserved above the bottom margin for the page footer
    pub footer_height: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub title_size: f32,
    pub heading_size: f32,
    pub cell_padding: f32,
    pub block_gap: f32,
}

impl Default for PageLayout {
    /// A4 portrait
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 40.0,
            footer_height: 24.0,
            font_size: 9.0,
            line_height: 12.0,
            title_size: 18.0,
            heading_size: 12.0,
            cell_padding: 3.0,
            block_gap: 8.0,
        }
    }
}

impl PageLayout {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.margin
    }

    fn bottom(&self) -> f32 {
        self.height - self.margin - self.footer_height
    }

    pub fn content_height(&self) -> f32 {
        self.bottom() - self.top()
    }

    fn lines_height(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.line_height + 2.0 * self.cell_padding
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    pub title: String,
    pub period_label: String,
    pub range_label: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    /// Stroked outline, or filled with `fill_gray` (0 black, 1 white)
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_gray: Option<f32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based
    pub number: u32,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out `sections` in the given order under `header`.
pub fn compose(
    header: &DocumentHeader,
    sections: &[Section],
    layout: &PageLayout,
) -> Result<Document, InvalidSectionError> {
    let mut composer = Composer::new(layout.clone(), header);
    for section in sections {
        composer.section(section)?;
    }
    Ok(composer.finish())
}

pub struct Composer {
    layout: PageLayout,
    pages: Vec<Page>,
    current: Vec<Element>,
    cursor: f32,
}

impl Composer {
    pub fn new(layout: PageLayout, header: &DocumentHeader) -> Self {
        let cursor = layout.top();
        let mut composer = Self {
            layout,
            pages: Vec::new(),
            current: Vec::new(),
            cursor,
        };
        composer.header(header);
        composer
    }

    fn header(&mut self, header: &DocumentHeader) {
        let l = self.layout.clone();
        let title_advance = l.title_size * 1.5;

        self.text(l.margin, self.cursor + l.title_size, l.title_size, true, &header.title);
        self.cursor += title_advance;
        for line in [
            format!("Periodo: {}", header.period_label),
            format!("Rango: {}", header.range_label),
            format!("Generado: {}", header.generated_at),
        ] {
            self.text(l.margin, self.cursor + l.font_size, l.font_size, false, &line);
            self.cursor += l.line_height;
        }
        self.current.push(Element::Line {
            x1: l.margin,
            y1: self.cursor,
            x2: l.width - l.margin,
            y2: self.cursor,
        });
        self.cursor += l.block_gap;
    }

    /// Append one section. Nothing is written when the section is invalid.
    pub fn section(&mut self, section: &Section) -> Result<(), InvalidSectionError> {
        for block in &section.blocks {
            if let SectionBlock::Table(table) = block {
                self.validate_table(&section.title, table)?;
            }
        }

        self.heading(&section.title);
        if section.blocks.is_empty() {
            self.paragraph(EMPTY_SECTION, false);
        }
        for block in &section.blocks {
            match block {
                SectionBlock::KeyValue(kv) => self.key_values(kv),
                SectionBlock::Table(table) => self.table(table),
                SectionBlock::Insight(InsightBlock { text }) => self.paragraph(&format!("• {}", text), false),
                SectionBlock::NoData { reason } => {
                    self.paragraph(&format!("Sin datos disponibles: {}", reason), true)
                }
            }
            self.cursor += self.layout.block_gap;
        }
        Ok(())
    }

    /// Close the last page and stamp footers
    pub fn finish(mut self) -> Document {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.push_page();
        }
        let l = &self.layout;
        let total = self.pages.len();
        let rule_y = l.bottom() + l.footer_height * 0.25;
        let baseline = l.bottom() + l.footer_height * 0.75;
        for page in &mut self.pages {
            let label = format!("Página {} de {}", page.number, total);
            let x = (l.width - text_width(&label, l.font_size, false)) / 2.0;
            page.elements.push(Element::Line {
                x1: l.margin,
                y1: rule_y,
                x2: l.width - l.margin,
                y2: rule_y,
            });
            page.elements.push(Element::Text {
                x,
                y: baseline,
                size: l.font_size,
                bold: false,
                text: label,
            });
        }
        Document {
            width: l.width,
            height: l.height,
            pages: self.pages,
        }
    }

    fn validate_table(&self, section: &str, table: &TableBlock) -> Result<(), InvalidSectionError> {
        let fail = |message: String| InvalidSectionError {
            section: section.to_string(),
            message,
        };
        if table.columns.is_empty() {
            return Err(fail("table has no columns".into()));
        }
        if let Some(col) = table.columns.iter().find(|c| !(c.width.is_finite() && c.width > 0.0)) {
            return Err(fail(format!("column {:?} has width {}", col.header, col.width)));
        }
        let total: f32 = table.columns.iter().map(|c| c.width).sum();
        if total > self.layout.content_width() + 0.5 {
            return Err(fail(format!(
                "columns need {:.1}pt, page has {:.1}pt",
                total,
                self.layout.content_width()
            )));
        }
        if let Some((i, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != table.columns.len()) {
            return Err(fail(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                table.columns.len()
            )));
        }
        Ok(())
    }

    fn remaining(&self) -> f32 {
        self.layout.bottom() - self.cursor
    }

    fn page_is_fresh(&self) -> bool {
        self.cursor <= self.layout.top() + EPSILON
    }

    fn push_page(&mut self) {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page {
            number,
            elements: std::mem::take(&mut self.current),
        });
        self.cursor = self.layout.top();
    }

    /// Start a new page unless `height` fits in what is left of this one
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() + EPSILON && !self.page_is_fresh() {
            self.push_page();
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        if text.is_empty() {
            return;
        }
        self.current.push(Element::Text {
            x,
            y,
            size,
            bold,
            text: text.to_string(),
        });
    }

    fn heading(&mut self, title: &str) {
        let l = self.layout.clone();
        let height = l.heading_size + 2.0 * l.cell_padding;
        // keep the heading with at least one body line
        self.ensure(height + l.block_gap + l.line_height);
        self.current.push(Element::Rect {
            x: l.margin,
            y: self.cursor,
            width: l.content_width(),
            height,
            fill_gray: None,
        });
        self.text(
            l.margin + l.cell_padding.max(2.0),
            self.cursor + l.cell_padding + l.heading_size * 0.85,
            l.heading_size,
            true,
            title,
        );
        self.cursor += height + l.block_gap;
    }

    fn paragraph(&mut self, text: &str, bold: bool) {
        let l = self.layout.clone();
        for line in wrap(text, l.content_width(), l.font_size, bold) {
            self.ensure(l.line_height);
            self.text(l.margin, self.cursor + l.font_size, l.font_size, bold, &line);
            self.cursor += l.line_height;
        }
    }

    fn key_values(&mut self, block: &KeyValueBlock) {
        let l = self.layout.clone();
        let label_width = l.content_width() * 0.45;
        let value_x = l.margin + label_width;
        let value_width = l.content_width() - label_width;

        for entry in &block.entries {
            let labels = wrap(&entry.label, label_width - l.cell_padding, l.font_size, true);
            let values = wrap(&entry.value, value_width, l.font_size, false);
            let lines = labels.len().max(values.len());
            let height = lines as f32 * l.line_height;

            self.ensure(height);
            for (i, line) in labels.iter().enumerate() {
                let y = self.cursor + l.font_size + i as f32 * l.line_height;
                self.text(l.margin, y, l.font_size, true, line);
            }
            for (i, line) in values.iter().enumerate() {
                let y = self.cursor + l.font_size + i as f32 * l.line_height;
                self.text(value_x, y, l.font_size, false, line);
            }
            self.cursor += height;
        }
    }

    fn wrap_row(&self, table: &TableBlock, cells: &[String], bold: bool) -> Vec<Vec<String>> {
        let l = &self.layout;
        table
            .columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| wrap(cell, col.width - 2.0 * l.cell_padding, l.font_size, bold))
            .collect()
    }

    fn table(&mut self, table: &TableBlock) {
        let l = self.layout.clone();
        let header_cells: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
        let header = self.wrap_row(table, &header_cells, true);
        let header_height = l.lines_height(header.iter().map(Vec::len).max().unwrap_or(1));
        let caption_height = if table.caption.is_some() { l.line_height } else { 0.0 };

        // a row must fit on a page under a repeated header
        let max_row_lines =
            (((l.content_height() - header_height - 2.0 * l.cell_padding) / l.line_height).floor() as usize).max(1);

        let rows: Vec<Vec<Vec<String>>> = table
            .rows
            .iter()
            .map(|r| {
                self.wrap_row(table, r, false)
                    .into_iter()
                    .map(|cell| truncate_lines(cell, max_row_lines))
                    .collect()
            })
            .collect();
        let row_height = |row: &Vec<Vec<String>>| l.lines_height(row.iter().map(Vec::len).max().unwrap_or(1));

        let first_row = rows.first().map(&row_height).unwrap_or(0.0);
        self.ensure(caption_height + header_height + first_row);
        if let Some(caption) = &table.caption {
            self.text(l.margin, self.cursor + l.font_size, l.font_size, true, caption);
            self.cursor += l.line_height;
        }
        self.table_row(table, &header, header_height, true);

        for row in &rows {
            let height = row_height(row);
            if height > self.remaining() + EPSILON {
                self.push_page();
                self.table_row(table, &header, header_height, true);
            }
            self.table_row(table, row, height, false);
        }
    }

    fn table_row(&mut self, table: &TableBlock, cells: &[Vec<String>], height: f32, is_header: bool) {
        let l = self.layout.clone();
        let total_width: f32 = table.columns.iter().map(|c| c.width).sum();
        if is_header {
            self.current.push(Element::Rect {
                x: l.margin,
                y: self.cursor,
                width: total_width,
                height,
                fill_gray: Some(0.9),
            });
        }

        let mut x = l.margin;
        for (col, lines) in table.columns.iter().zip(cells) {
            for (i, line) in lines.iter().enumerate() {
                let line_x = match col.align {
                    CellAlign::Left => x + l.cell_padding,
                    CellAlign::Right => x + col.width - l.cell_padding - text_width(line, l.font_size, is_header),
                };
                let y = self.cursor + l.cell_padding + l.font_size + i as f32 * l.line_height;
                self.text(line_x, y, l.font_size, is_header, line);
            }
            x += col.width;
        }

        self.cursor += height;
        self.current.push(Element::Line {
            x1: l.margin,
            y1: self.cursor,
            x2: l.margin + total_width,
            y2: self.cursor,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::report_document::{KeyValueBlock, TableColumn};

    fn header() -> DocumentHeader {
        DocumentHeader {
            title: "Reporte General".into(),
            period_label: "junio 2025".into(),
            range_label: "01/06/2025 - 30/06/2025".into(),
            generated_at: "30/06/2025 18:00".into(),
        }
    }

    /// Round numbers: the header takes 60pt, a heading 10pt, a table line 10pt.
    /// The usable height is 480pt: header + heading + table header + 40 rows.
    fn forty_row_page() -> PageLayout {
        PageLayout {
            width: 400.0,
            height: 540.0,
            margin: 20.0,
            footer_height: 20.0,
            font_size: 8.0,
            line_height: 10.0,
            title_size: 20.0,
            heading_size: 10.0,
            cell_padding: 0.0,
            block_gap: 0.0,
        }
    }

    fn clients_table(rows: usize) -> Section {
        let table = TableBlock {
            caption: None,
            columns: vec![TableColumn::left("Cliente", 200.0), TableColumn::right("Ingresos", 100.0)],
            rows: (1..=rows)
                .map(|i| vec![format!("Cliente {:02}", i), format!("${}.00", i * 10)])
                .collect(),
        };
        Section::new("Clientes").with_block(SectionBlock::Table(table))
    }

    fn pages_with(doc: &Document, needle: &str) -> Vec<u32> {
        doc.pages
            .iter()
            .filter(|p| p.texts().any(|t| t == needle))
            .map(|p| p.number)
            .collect()
    }

    fn assert_footers(doc: &Document) {
        let total = doc.page_count();
        for page in &doc.pages {
            let footers: Vec<_> = page.texts().filter(|t| t.starts_with("Página")).collect();
            assert_eq!(footers, vec![format!("Página {} de {}", page.number, total)]);
        }
    }

    #[test]
    fn test_fifty_rows_on_forty_row_page() {
        let doc = compose(&header(), &[clients_table(50)], &forty_row_page()).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(pages_with(&doc, "Cliente 40"), vec![1]);
        assert_eq!(pages_with(&doc, "Cliente 41"), vec![2]);
        assert_eq!(pages_with(&doc, "Cliente 50"), vec![2]);
        // header repeated on the continuation page
        assert_eq!(pages_with(&doc, "Cliente"), vec![1, 2]);
        assert_footers(&doc);
    }

    #[test]
    fn test_footer_counts_pages_across_sections() {
        let mut summary = KeyValueBlock::default();
        for i in 0..44 {
            summary.push(format!("Indicador {}", i), "1");
        }
        let sections = vec![
            Section::new("Resumen General").with_block(SectionBlock::KeyValue(summary)),
            clients_table(50),
        ];

        let doc = compose(&header(), &sections, &forty_row_page()).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert_footers(&doc);
    }

    #[test]
    fn test_wrapped_rows_never_split() {
        let mut layout = forty_row_page();
        layout.cell_padding = 1.5;
        let table = TableBlock {
            caption: Some("Deudores".into()),
            columns: vec![TableColumn::left("Detalle", 60.0), TableColumn::right("N", 40.0)],
            rows: (0..60)
                .map(|i| {
                    let words = (0..(i % 4 + 1)).map(|w| format!("r{}-w{}", i, w)).collect::<Vec<_>>();
                    vec![words.join(" "), i.to_string()]
                })
                .collect(),
        };
        let section = Section::new("Clientes").with_block(SectionBlock::Table(table));

        let doc = compose(&header(), &[section], &layout).unwrap();

        assert!(doc.page_count() > 1);
        for i in 0..60 {
            let prefix = format!("r{}-", i);
            let pages: Vec<_> = doc
                .pages
                .iter()
                .filter(|p| p.texts().any(|t| t.starts_with(&prefix)))
                .map(|p| p.number)
                .collect();
            assert_eq!(pages.len(), 1, "row {} landed on pages {:?}", i, pages);
        }
        assert_footers(&doc);
    }

    #[test]
    fn test_key_value_lines_stay_whole() {
        let mut kv = KeyValueBlock::default();
        for i in 0..120 {
            let value = ["a", "b", "c", "d", "e", "f"]
                .iter()
                .map(|w| format!("v{}-{}", i, w))
                .collect::<Vec<_>>()
                .join(" ");
            kv.push(format!("Etiqueta {}", i), value);
        }
        let mut layout = forty_row_page();
        layout.width = 200.0;
        let section = Section::new("Resumen General").with_block(SectionBlock::KeyValue(kv));

        let doc = compose(&header(), &[section], &layout).unwrap();

        assert!(doc.page_count() > 1);
        for i in 0..120 {
            let label_pages = pages_with(&doc, &format!("Etiqueta {}", i));
            let prefix = format!("v{}-", i);
            let value_pages: Vec<_> = doc
                .pages
                .iter()
                .filter(|p| p.texts().any(|t| t.starts_with(&prefix)))
                .map(|p| p.number)
                .collect();
            assert_eq!(label_pages.len(), 1);
            assert_eq!(value_pages, label_pages);
        }
        assert_footers(&doc);
    }

    #[test]
    fn test_rejects_mismatched_row() {
        let table = TableBlock {
            caption: None,
            columns: vec![TableColumn::left("A", 50.0), TableColumn::left("B", 50.0)],
            rows: vec![vec!["solo uno".into()]],
        };
        let section = Section::new("Pedidos").with_block(SectionBlock::Table(table));

        let err = compose(&header(), &[section], &PageLayout::default()).unwrap_err();
        assert_eq!(err.section, "Pedidos");
        assert!(err.message.contains("row 0 has 1 cells, expected 2"));
    }

    #[test]
    fn test_rejects_bad_widths() {
        for columns in [
            vec![],
            vec![TableColumn::left("A", 0.0)],
            vec![TableColumn::left("A", 400.0), TableColumn::left("B", 400.0)],
        ] {
            let table = TableBlock {
                caption: None,
                columns,
                rows: vec![],
            };
            let section = Section::new("Pedidos").with_block(SectionBlock::Table(table));
            assert!(compose(&header(), &[section], &PageLayout::default()).is_err());
        }
    }

    #[test]
    fn test_placeholders_for_missing_and_empty_sections() {
        let sections = vec![
            Section::no_data("Asistencia", "no se pudo consultar"),
            Section::new("Pedidos"),
        ];

        let doc = compose(&header(), &sections, &PageLayout::default()).unwrap();

        let texts: Vec<_> = doc.pages[0].texts().collect();
        assert!(texts.contains(&"Sin datos disponibles: no se pudo consultar"));
        assert!(texts.contains(&EMPTY_SECTION));
        assert_eq!(texts[0], "Reporte General");
    }

    #[test]
    fn test_cells_stay_inside_their_columns() {
        let layout = PageLayout::default();
        let table = TableBlock {
            caption: None,
            columns: vec![TableColumn::left("Cliente", 205.0), TableColumn::right("Ingresos", 310.0)],
            rows: vec![vec!["DISTRIBUIDORA MAYORISTA DEL NORTE SA DE CV".into(), "$1,234.50".into()]],
        };
        let section = Section::new("Clientes").with_block(SectionBlock::Table(table));

        let doc = compose(&header(), &[section], &layout).unwrap();

        let cliente_right = layout.margin + 205.0 - layout.cell_padding;
        let ingresos_right = layout.margin + 515.0 - layout.cell_padding;
        let mut name_lines = 0;
        for element in &doc.pages[0].elements {
            if let Element::Text { x, size, bold, text, .. } = element {
                let right = x + text_width(text, *size, *bold);
                if text.starts_with("DISTRIBUIDORA") || text == "DE CV" {
                    name_lines += 1;
                    assert!(right <= cliente_right + EPSILON, "{:?} ends at {}", text, right);
                }
                if text == "$1,234.50" || text == "Ingresos" {
                    assert!((right - ingresos_right).abs() < EPSILON, "{:?} ends at {}", text, right);
                }
            }
        }
        assert_eq!(name_lines, 2);
    }

    #[test]
    fn test_oversized_row_is_truncated_to_one_page() {
        let table = TableBlock {
            caption: None,
            columns: vec![TableColumn::left("Notas", 60.0)],
            rows: vec![vec!["palabra ".repeat(400)]],
        };
        let section = Section::new("Pedidos").with_block(SectionBlock::Table(table));

        let doc = compose(&header(), &[section], &forty_row_page()).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[1].texts().any(|t| t.ends_with('…')));
    }
}
