//! Test fixtures for generating XLSX files in memory.
//!
//! The builder writes packages the way desktop spreadsheet apps do (shared
//! string table, theme part, numeric cell values) so import can be tested
//! against files wallcal did not write itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{SheetBuilder, StyleBuilder, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(
//!         SheetBuilder::new("Budget")
//!             .cell("A1", "Rent", Some(StyleBuilder::new().bold()))
//!             .cell("B1", 950, None)
//!             .merge("A3:C3"),
//!     )
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Style Builder
// ============================================================================

/// Builder for the small style subset the fixtures need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBuilder {
    pub bold: bool,
    pub font_size: Option<f64>,
    /// `AARRGGBB`
    pub bg_color: Option<String>,
    pub align_horizontal: Option<String>,
}

impl StyleBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn bg_color(mut self, argb: &str) -> Self {
        self.bg_color = Some(argb.to_string());
        self
    }

    #[must_use]
    pub fn align_horizontal(mut self, align: &str) -> Self {
        self.align_horizontal = Some(align.to_string());
        self
    }
}

// ============================================================================
// Cell values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    pub style: Option<StyleBuilder>,
}

// ============================================================================
// Sheet Builder
// ============================================================================

#[derive(Debug, Clone)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    pub merges: Vec<String>,
    /// (min, max, width in characters)
    pub cols: Vec<(u32, u32, f64)>,
    /// (row, height in points)
    pub row_heights: Vec<(u32, f64)>,
    pub tab_selected: bool,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            merges: Vec::new(),
            cols: Vec::new(),
            row_heights: Vec::new(),
            tab_selected: false,
        }
    }

    #[must_use]
    pub fn cell<V: Into<CellValue>>(
        mut self,
        cell_ref: &str,
        value: V,
        style: Option<StyleBuilder>,
    ) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style,
        });
        self
    }

    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }

    #[must_use]
    pub fn col_width(mut self, min: u32, max: u32, chars: f64) -> Self {
        self.cols.push((min, max, chars));
        self
    }

    #[must_use]
    pub fn row_height(mut self, row: u32, points: f64) -> Self {
        self.row_heights.push((row, points));
        self
    }

    /// Mark the sheet's tab as selected, as apps do for the active sheet.
    #[must_use]
    pub fn tab_selected(mut self) -> Self {
        self.tab_selected = true;
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for creating complete XLSX files.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    active_tab: usize,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    #[must_use]
    pub fn active_tab(mut self, idx: usize) -> Self {
        self.active_tab = idx;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Styles: index 0 is the default, then one xf per distinct builder
        let mut styles: Vec<StyleBuilder> = vec![StyleBuilder::new()];
        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let Some(ref style) = cell.style {
                    if !styles.contains(style) {
                        styles.push(style.clone());
                    }
                }
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        let mut put = |name: &str, body: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", generate_content_types(self.sheets.len()));
        put("_rels/.rels", generate_rels());
        put(
            "xl/_rels/workbook.xml.rels",
            generate_workbook_rels(self.sheets.len()),
        );
        put("xl/workbook.xml", generate_workbook(&self.sheets, self.active_tab));
        put("xl/styles.xml", generate_styles(&styles));
        put("xl/sharedStrings.xml", generate_shared_strings(&shared_strings));
        put("xl/theme/theme1.xml", generate_theme());
        for (i, sheet) in self.sheets.iter().enumerate() {
            put(
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                generate_sheet_xml(sheet, &shared_strings, &styles),
            );
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
<Override PartName="/xl/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
"#,
    );
    for i in 1..=sheet_count {
        out.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{i}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n"
        ));
    }
    out.push_str("</Types>");
    out
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

/// Relationship ids are deliberately not in sheet order: the styles,
/// theme and shared strings parts come first, as some writers emit them.
fn generate_workbook_rels(sheet_count: usize) -> String {
    let rel = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    out.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{rel}/styles\" Target=\"styles.xml\"/>\n\
         <Relationship Id=\"rId2\" Type=\"{rel}/theme\" Target=\"theme/theme1.xml\"/>\n\
         <Relationship Id=\"rId3\" Type=\"{rel}/sharedStrings\" Target=\"sharedStrings.xml\"/>\n"
    ));
    for i in 1..=sheet_count {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{rel}/worksheet\" Target=\"worksheets/sheet{i}.xml\"/>\n",
            i + 3
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn generate_workbook(sheets: &[SheetBuilder], active_tab: usize) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr/>
"#,
    );
    out.push_str(&format!(
        "<bookViews><workbookView xWindow=\"0\" yWindow=\"0\" activeTab=\"{active_tab}\"/></bookViews>\n<sheets>\n"
    ));
    for (i, sheet) in sheets.iter().enumerate() {
        out.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
            xml_escape(&sheet.name),
            i + 1,
            i + 4
        ));
    }
    out.push_str("</sheets>\n</workbook>");
    out
}

fn generate_styles(styles: &[StyleBuilder]) -> String {
    let mut fonts = String::new();
    let mut fills = String::from(
        "<fill><patternFill patternType=\"none\"/></fill><fill><patternFill patternType=\"gray125\"/></fill>",
    );
    let mut xfs = String::new();
    for (i, style) in styles.iter().enumerate() {
        let size = style.font_size.unwrap_or(11.0);
        fonts.push_str(&format!(
            "<font>{}<sz val=\"{size}\"/><color theme=\"1\"/><name val=\"Calibri\"/><family val=\"2\"/><scheme val=\"minor\"/></font>",
            if style.bold { "<b/>" } else { "" }
        ));
        let fill_id = match style.bg_color {
            Some(ref argb) => {
                fills.push_str(&format!(
                    "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{argb}\"/><bgColor indexed=\"64\"/></patternFill></fill>"
                ));
                fills.matches("<fill>").count() - 1
            }
            None => 0,
        };
        match style.align_horizontal {
            Some(ref h) => xfs.push_str(&format!(
                "<xf numFmtId=\"0\" fontId=\"{i}\" fillId=\"{fill_id}\" borderId=\"0\" xfId=\"0\" applyAlignment=\"1\"><alignment horizontal=\"{h}\"/></xf>"
            )),
            None => xfs.push_str(&format!(
                "<xf numFmtId=\"0\" fontId=\"{i}\" fillId=\"{fill_id}\" borderId=\"0\" xfId=\"0\"/>"
            )),
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="{}">{fonts}</fonts>
<fills count="{}">{fills}</fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="{}">{xfs}</cellXfs>
<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
<dxfs count="0"/>
</styleSheet>"#,
        styles.len(),
        fills.matches("<fill>").count(),
        styles.len()
    )
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{0}\" uniqueCount=\"{0}\">",
        strings.len()
    );
    for s in strings {
        out.push_str(&format!("<si><t>{}</t></si>", xml_escape(s)));
    }
    out.push_str("</sst>");
    out
}

fn generate_theme() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
<a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1></a:clrScheme></a:themeElements>
</a:theme>"#
        .to_string()
}

fn row_of(cell_ref: &str) -> u32 {
    cell_ref
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap()
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared: &[String], styles: &[StyleBuilder]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
"#,
    );
    out.push_str(if sheet.tab_selected {
        "<sheetViews><sheetView tabSelected=\"1\" workbookViewId=\"0\"/></sheetViews>\n"
    } else {
        "<sheetViews><sheetView workbookViewId=\"0\"/></sheetViews>\n"
    });
    out.push_str("<sheetFormatPr defaultRowHeight=\"15\"/>\n");
    if !sheet.cols.is_empty() {
        out.push_str("<cols>");
        for (min, max, width) in &sheet.cols {
            out.push_str(&format!(
                "<col min=\"{min}\" max=\"{max}\" width=\"{width}\" customWidth=\"1\"/>"
            ));
        }
        out.push_str("</cols>\n");
    }

    let mut rows: Vec<u32> = sheet
        .cells
        .iter()
        .map(|c| row_of(&c.cell_ref))
        .chain(sheet.row_heights.iter().map(|(r, _)| *r))
        .collect();
    rows.sort_unstable();
    rows.dedup();

    out.push_str("<sheetData>");
    for row in rows {
        out.push_str(&format!("<row r=\"{row}\""));
        if let Some((_, ht)) = sheet.row_heights.iter().find(|(r, _)| *r == row) {
            out.push_str(&format!(" ht=\"{ht}\" customHeight=\"1\""));
        }
        out.push('>');
        for cell in sheet.cells.iter().filter(|c| row_of(&c.cell_ref) == row) {
            let s = cell
                .style
                .as_ref()
                .and_then(|st| styles.iter().position(|x| x == st))
                .map(|idx| format!(" s=\"{idx}\""))
                .unwrap_or_default();
            match &cell.value {
                CellValue::String(v) => {
                    let idx = shared.iter().position(|x| x == v).unwrap();
                    out.push_str(&format!(
                        "<c r=\"{}\"{s} t=\"s\"><v>{idx}</v></c>",
                        cell.cell_ref
                    ));
                }
                CellValue::Number(n) => {
                    out.push_str(&format!("<c r=\"{}\"{s}><v>{n}</v></c>", cell.cell_ref));
                }
                CellValue::Boolean(b) => {
                    out.push_str(&format!(
                        "<c r=\"{}\"{s} t=\"b\"><v>{}</v></c>",
                        cell.cell_ref,
                        u8::from(*b)
                    ));
                }
            }
        }
        out.push_str("</row>");
    }
    out.push_str("</sheetData>\n");

    if !sheet.merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">", sheet.merges.len()));
        for m in &sheet.merges {
            out.push_str(&format!("<mergeCell ref=\"{m}\"/>"));
        }
        out.push_str("</mergeCells>\n");
    }
    out.push_str("<pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>\n</worksheet>");
    out
}
