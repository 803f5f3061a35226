//! Streaming edits of existing package XML.
//!
//! Parts are copied event by event; the handler decides what to pass
//! through, replace or insert. Whitespace and unknown elements survive as
//! they were.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::Result;

/// Run every event of `xml` through `handle`, which writes the output.
pub(crate) fn rewrite_xml<F>(xml: &[u8], mut handle: F) -> Result<Vec<u8>>
where
    F: FnMut(&mut Writer<Vec<u8>>, Event<'_>) -> Result<()>,
{
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 1024));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            event => handle(&mut writer, event)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Copy of `e` with `key` set to `value`, replacing any existing value.
pub(crate) fn with_attribute(e: &BytesStart<'_>, key: &str, value: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() != key.as_bytes() {
            out.push_attribute(attr);
        }
    }
    out.push_attribute((key, value));
    out
}

/// `"x:"` when the element name carries a namespace prefix, else `""`.
pub(crate) fn prefix_of(qualified: &[u8]) -> String {
    match qualified.iter().position(|&b| b == b':') {
        Some(idx) => String::from_utf8_lossy(qualified.get(..=idx).unwrap_or_default()).into_owned(),
        None => String::new(),
    }
}

/// Unescaped value of the attribute whose local name is `key`.
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Insert the markup `extra` returns right before the closing tag of the
/// first `local_name` element. `extra` gets that element's prefix.
pub(crate) fn insert_before_end<F>(xml: &[u8], local_name: &[u8], extra: F) -> Result<Vec<u8>>
where
    F: Fn(&str) -> String,
{
    let mut done = false;
    rewrite_xml(xml, |writer, event| {
        if let Event::End(e) = &event {
            if !done && e.local_name().as_ref() == local_name {
                write_raw(writer, &extra(&prefix_of(e.name().as_ref())));
                done = true;
            }
        }
        writer.write_event(event)?;
        Ok(())
    })
}

/// Whether `needle` occurs anywhere in `haystack`.
pub(crate) fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Raw XML appended to the output as is.
pub(crate) fn write_raw(writer: &mut Writer<Vec<u8>>, xml: &str) {
    writer.get_mut().extend_from_slice(xml.as_bytes());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn untouched_events_round_trip() {
        let xml = br#"<?xml version="1.0"?>
<a xmlns:x="urn:x"><x:b  id="1">t &amp; u</x:b><!-- note --><c/></a>"#;
        let out = rewrite_xml(xml, |w, e| Ok(w.write_event(e)?)).unwrap();
        assert_eq!(out, xml.to_vec());
    }

    #[test]
    fn attribute_value_is_replaced() {
        let xml = br#"<workbookView xWindow="0" activeTab="3"/>"#;
        let out = rewrite_xml(xml, |w, e| match e {
            Event::Empty(e) => Ok(w.write_event(Event::Empty(with_attribute(&e, "activeTab", "1")))?),
            other => Ok(w.write_event(other)?),
        })
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<workbookView xWindow="0" activeTab="1"/>"#
        );
    }

    #[test]
    fn inserts_before_the_prefixed_close_tag() {
        let xml = br#"<x:Types xmlns:x="urn:t"><x:Default Extension="xml"/></x:Types>"#;
        let out = insert_before_end(xml, b"Types", |p| format!("<{p}Override PartName=\"/a\"/>")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<x:Types xmlns:x="urn:t"><x:Default Extension="xml"/><x:Override PartName="/a"/></x:Types>"#
        );
    }

    #[test]
    fn attributes_are_matched_by_local_name() {
        let xml = br#"<sheet name="Q&amp;A" r:id="rId4"/>"#;
        let mut reader = Reader::from_reader(xml.as_slice());
        let Event::Empty(e) = reader.read_event().unwrap() else {
            panic!("expected an empty element");
        };
        assert_eq!(attr_value(&e, b"name").as_deref(), Some("Q&A"));
        assert_eq!(attr_value(&e, b"id").as_deref(), Some("rId4"));
        assert_eq!(attr_value(&e, b"sheetId"), None);
    }

    #[test]
    fn finds_byte_substrings() {
        assert!(contains_bytes(b"<sheetView tabSelected=\"1\"/>", b"tabSelected=\"1\""));
        assert!(!contains_bytes(b"<sheetView/>", b"tabSelected"));
    }

    #[test]
    fn prefixes_are_split_off() {
        assert_eq!(prefix_of(b"x:sheets"), "x:");
        assert_eq!(prefix_of(b"sheets"), "");
    }
}
