//! Generates `xl/styles.xml` from the styles used in a workbook.
//!
//! Every distinct [`CellStyle`] becomes one `cellXfs` entry. Fonts and fills
//! are de-duplicated; the border list starts with the empty border, which is
//! all the calendar ever uses. When saving into an existing package the same
//! entries are appended to that package's styles part instead, so the style
//! indices its other sheets use keep their meaning.

use std::collections::HashMap;

use quick_xml::events::{BytesEnd, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, WallcalError};
use crate::types::{BorderStyle, CellStyle, Fill, Sheet};

use super::xml_patch::{rewrite_xml, with_attribute, write_raw};

/// Font family written for every font entry.
pub(crate) const FONT_NAME: &str = "Calibri";

/// Number of entries already present in each style list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StyleBase {
    pub fonts: usize,
    pub fills: usize,
    pub borders: usize,
    pub cell_xfs: usize,
}

impl StyleBase {
    /// A styles part written from scratch: only the two reserved fills.
    pub(crate) const FRESH: Self = Self {
        fonts: 0,
        fills: 2,
        borders: 0,
        cell_xfs: 0,
    };
}

/// Serialized list entries, one element per string.
#[derive(Debug, Default)]
pub(crate) struct StyleEntries {
    pub fonts: Vec<String>,
    pub fills: Vec<String>,
    pub borders: Vec<String>,
    pub cell_xfs: Vec<String>,
}

/// Interned styles, indexed by `cellXfs` position.
pub(crate) struct StyleTable {
    xfs: Vec<CellStyle>,
    index: HashMap<CellStyle, u32>,
    base: StyleBase,
}

impl StyleTable {
    /// Collect styles in sheet/row/column order so the output is deterministic.
    pub(crate) fn from_sheets<'a>(sheets: impl IntoIterator<Item = &'a Sheet>, base: StyleBase) -> Self {
        let mut table = Self {
            xfs: Vec::new(),
            index: HashMap::new(),
            base,
        };
        table.intern(CellStyle::default());
        for sheet in sheets {
            for cell in sheet.cells.values() {
                table.intern(cell.style);
            }
        }
        table
    }

    fn intern(&mut self, style: CellStyle) -> u32 {
        if let Some(&id) = self.index.get(&style) {
            return id;
        }
        let id = u32::try_from(self.xfs.len()).unwrap_or(u32::MAX);
        self.xfs.push(style);
        self.index.insert(style, id);
        id
    }

    /// `s` attribute for a cell with this style.
    pub(crate) fn xf_id(&self, style: &CellStyle) -> u32 {
        let local = self.index.get(style).copied().unwrap_or(0);
        u32::try_from(self.base.cell_xfs)
            .unwrap_or(u32::MAX)
            .saturating_add(local)
    }

    pub(crate) fn entries(&self) -> StyleEntries {
        let base = self.base;
        let mut fonts: Vec<(bool, u32)> = Vec::new();
        let mut fills: Vec<Fill> = Vec::new();
        let uses_thin = self.xfs.iter().any(|s| s.border == BorderStyle::Thin);
        let mut entries = StyleEntries::default();

        for (i, style) in self.xfs.iter().enumerate() {
            let font_id = base.fonts + position_or_push(&mut fonts, (style.bold, style.font_size));
            // Fill 0 is the reserved "none" entry in every styles part;
            // the default xf keeps it.
            let fill_id = if i == 0 {
                0
            } else {
                base.fills + position_or_push(&mut fills, style.fill)
            };
            let border_id = base.borders + usize::from(style.border == BorderStyle::Thin);
            entries.cell_xfs.push(xf_xml(font_id, fill_id, border_id, style));
        }

        for (bold, size) in &fonts {
            entries.fonts.push(format!(
                "<font>{}<sz val=\"{size}\"/><color theme=\"1\"/><name val=\"{FONT_NAME}\"/><family val=\"2\"/></font>",
                if *bold { "<b/>" } else { "" }
            ));
        }
        for fill in &fills {
            entries.fills.push(format!(
                "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{}\"/><bgColor indexed=\"64\"/></patternFill></fill>",
                fill.argb()
            ));
        }
        entries
            .borders
            .push("<border><left/><right/><top/><bottom/><diagonal/></border>".to_string());
        if uses_thin {
            entries.borders.push(
                "<border><left style=\"thin\"><color auto=\"1\"/></left><right style=\"thin\"><color auto=\"1\"/></right>\
                 <top style=\"thin\"><color auto=\"1\"/></top><bottom style=\"thin\"><color auto=\"1\"/></bottom><diagonal/></border>"
                    .to_string(),
            );
        }
        entries
    }

    /// A complete styles part holding only this table's entries.
    pub(crate) fn to_xml(&self) -> String {
        let entries = self.entries();
        let mut out = String::with_capacity(2048);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        out.push('\n');

        push_list(&mut out, "fonts", &[], &entries.fonts);
        push_list(
            &mut out,
            "fills",
            &[
                "<fill><patternFill patternType=\"none\"/></fill>",
                "<fill><patternFill patternType=\"gray125\"/></fill>",
            ],
            &entries.fills,
        );
        push_list(&mut out, "borders", &[], &entries.borders);
        out.push_str("<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\n");
        push_list(&mut out, "cellXfs", &[], &entries.cell_xfs);
        out.push_str("<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>\n");
        out.push_str("</styleSheet>");
        out
    }
}

fn xf_xml(font_id: usize, fill_id: usize, border_id: usize, style: &CellStyle) -> String {
    let mut out = format!(
        "<xf numFmtId=\"0\" fontId=\"{font_id}\" fillId=\"{fill_id}\" borderId=\"{border_id}\" xfId=\"0\""
    );
    if font_id > 0 {
        out.push_str(" applyFont=\"1\"");
    }
    if fill_id > 0 {
        out.push_str(" applyFill=\"1\"");
    }
    if border_id > 0 {
        out.push_str(" applyBorder=\"1\"");
    }
    if style.align_h.is_none() && style.align_v.is_none() {
        out.push_str("/>");
        return out;
    }
    out.push_str(" applyAlignment=\"1\"><alignment");
    if let Some(h) = style.align_h {
        out.push_str(&format!(" horizontal=\"{}\"", h.as_xml()));
    }
    if let Some(v) = style.align_v {
        out.push_str(&format!(" vertical=\"{}\"", v.as_xml()));
    }
    out.push_str("/></xf>");
    out
}

fn push_list(out: &mut String, tag: &str, reserved: &[&str], entries: &[String]) {
    out.push_str(&format!("<{tag} count=\"{}\">\n", reserved.len() + entries.len()));
    for entry in reserved {
        out.push_str(entry);
        out.push('\n');
    }
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out.push_str(&format!("</{tag}>\n"));
}

/// The four lists new entries are appended to, with their child element.
const STYLE_LISTS: [(&[u8], &[u8]); 4] = [
    (b"fonts", b"font"),
    (b"fills", b"fill"),
    (b"borders", b"border"),
    (b"cellXfs", b"xf"),
];

fn list_slot(local_name: &[u8]) -> Option<usize> {
    STYLE_LISTS.iter().position(|(list, _)| *list == local_name)
}

/// Count the entries of an existing styles part.
///
/// Fails when one of the lists appended to is missing.
pub(crate) fn count_style_entries(xml: &[u8]) -> Result<StyleBase> {
    let mut counts: [Option<usize>; 4] = [None; 4];
    // (list slot, depth of the list element)
    let mut open: Option<(usize, usize)> = None;
    let mut depth = 0usize;

    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        let (e, is_start) = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(_) => {
                if matches!(open, Some((_, list_depth)) if list_depth == depth) {
                    open = None;
                }
                depth = depth.saturating_sub(1);
                buf.clear();
                continue;
            }
            Event::Eof => break,
            _ => {
                buf.clear();
                continue;
            }
        };
        if is_start {
            depth += 1;
        }
        let child_depth = if is_start { depth - 1 } else { depth };
        match open {
            Some((slot, list_depth)) if child_depth == list_depth => {
                let is_child = STYLE_LISTS
                    .get(slot)
                    .is_some_and(|(_, child)| *child == e.local_name().as_ref());
                if let (true, Some(Some(count))) = (is_child, counts.get_mut(slot)) {
                    *count += 1;
                }
            }
            None => {
                if let Some(slot) = list_slot(e.local_name().as_ref()) {
                    if let Some(count) = counts.get_mut(slot) {
                        count.get_or_insert(0);
                    }
                    if is_start {
                        open = Some((slot, depth));
                    }
                }
            }
            Some(_) => {}
        }
        buf.clear();
    }

    let [fonts, fills, borders, cell_xfs] = counts;
    let missing = |tag: &str| WallcalError::Package(format!("styles part has no <{tag}> list"));
    Ok(StyleBase {
        fonts: fonts.ok_or_else(|| missing("fonts"))?,
        fills: fills.ok_or_else(|| missing("fills"))?,
        borders: borders.ok_or_else(|| missing("borders"))?,
        cell_xfs: cell_xfs.ok_or_else(|| missing("cellXfs"))?,
    })
}

/// Append `entries` to the lists of an existing styles part and fix up
/// their `count` attributes. Everything else passes through untouched.
pub(crate) fn patch_styles_xml(xml: &[u8], base: StyleBase, entries: &StyleEntries) -> Result<Vec<u8>> {
    let added = [
        (&entries.fonts, base.fonts),
        (&entries.fills, base.fills),
        (&entries.borders, base.borders),
        (&entries.cell_xfs, base.cell_xfs),
    ];
    let mut depth = 0usize;
    let mut open: Option<(usize, usize)> = None;

    rewrite_xml(xml, |writer, event| {
        match event {
            Event::Start(e) => {
                depth += 1;
                let slot = if open.is_none() {
                    list_slot(e.local_name().as_ref())
                } else {
                    None
                };
                match slot.and_then(|slot| added.get(slot).map(|a| (slot, a))) {
                    Some((slot, (list, existing))) => {
                        open = Some((slot, depth));
                        let count = (existing + list.len()).to_string();
                        writer.write_event(Event::Start(with_attribute(&e, "count", &count)))?;
                    }
                    None => writer.write_event(Event::Start(e))?,
                }
            }
            Event::End(e) => {
                if let Some((slot, list_depth)) = open {
                    if list_depth == depth {
                        if let Some((list, _)) = added.get(slot) {
                            write_entries(writer, list);
                        }
                        open = None;
                    }
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Empty(e) if open.is_none() => {
                let slot = list_slot(e.local_name().as_ref());
                match slot.and_then(|slot| added.get(slot)) {
                    Some((list, existing)) => {
                        let count = (existing + list.len()).to_string();
                        let start = with_attribute(&e, "count", &count);
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        writer.write_event(Event::Start(start))?;
                        write_entries(writer, list);
                        writer.write_event(Event::End(BytesEnd::new(name)))?;
                    }
                    None => writer.write_event(Event::Empty(e))?,
                }
            }
            other => writer.write_event(other)?,
        }
        Ok(())
    })
}

fn write_entries(writer: &mut Writer<Vec<u8>>, entries: &[String]) {
    for entry in entries {
        write_raw(writer, entry);
    }
}

fn position_or_push<T: PartialEq + Copy>(list: &mut Vec<T>, item: T) -> usize {
    if let Some(pos) = list.iter().position(|x| *x == item) {
        return pos;
    }
    list.push(item);
    list.len() - 1
}
