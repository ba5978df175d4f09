//! Span-recording manifest parser.
//!
//! Walks the XML event stream once and records, for every item group and
//! every item, the byte range it occupies in the source. Nothing is
//! re-serialized; edits are later applied to the original text.

use std::ops::Range;

use projsync_fs::RelativePath;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::document::{GroupClose, ItemGroup, ManifestEntry, RootElement};
use crate::error::{Error, Result};
use crate::Category;

const ITEM_GROUP: &str = "ItemGroup";

/// Everything the parser extracts from a manifest.
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub root: Option<RootElement>,
    pub namespace: Option<String>,
    pub groups: Vec<ItemGroup>,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Root,
    Group(usize),
    Item(usize),
    Other,
}

pub(crate) fn parse(source: &str) -> Result<Parsed> {
    let mut reader = Reader::from_str(source);
    let mut parsed = Parsed::default();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| Error::Parse {
            position: reader.error_position() as usize,
            message: e.to_string(),
        })?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let frame = parsed.open(source, &e, &stack, start..end, false)?;
                stack.push(frame);
            }
            Event::Empty(e) => {
                parsed.open(source, &e, &stack, start..end, true)?;
            }
            Event::End(_) => match stack.pop() {
                Some(Frame::Item(index)) => {
                    if let Some(span) = parsed.entries[index].span.as_mut() {
                        span.end = end;
                    }
                }
                Some(Frame::Group(index)) => parsed.groups[index].close = GroupClose::EndTag(start),
                Some(Frame::Root) => {
                    if let Some(root) = parsed.root.as_mut() {
                        root.close = Some(start);
                    }
                }
                Some(Frame::Other) => {}
                None => {
                    return Err(Error::Parse {
                        position: start,
                        message: "closing tag without matching opening tag".into(),
                    });
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::Parse {
            position: source.len(),
            message: "unexpected end of document".into(),
        });
    }
    if parsed.root.is_none() {
        return Err(Error::Parse {
            position: 0,
            message: "document has no root element".into(),
        });
    }

    tracing::debug!(
        groups = parsed.groups.len(),
        entries = parsed.entries.len(),
        "parsed manifest"
    );
    Ok(parsed)
}

impl Parsed {
    fn open(
        &mut self,
        source: &str,
        element: &BytesStart<'_>,
        stack: &[Frame],
        span: Range<usize>,
        empty: bool,
    ) -> Result<Frame> {
        let local = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
        let prefix = element
            .name()
            .prefix()
            .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
            .unwrap_or_default();

        match stack.last() {
            None => {
                if self.root.is_some() {
                    return Err(Error::Parse {
                        position: span.start,
                        message: "document has more than one root element".into(),
                    });
                }
                self.namespace = attribute(element, "xmlns", span.start)?;
                self.root = Some(RootElement {
                    prefix,
                    close: None,
                });
                Ok(Frame::Root)
            }
            Some(Frame::Group(group)) => {
                let group = *group;
                let include = attribute(element, "Include", span.start)?;
                let category = Category::from_element(&local);
                let path = include
                    .as_deref()
                    .filter(|_| category.is_file_backed())
                    .and_then(RelativePath::from_include);

                if self.groups[group].child_indent.is_none() {
                    self.groups[group].child_indent = line_indent(source, span.start);
                }

                let index = self.entries.len();
                self.entries.push(ManifestEntry {
                    category,
                    element: local,
                    include,
                    path,
                    group,
                    span: Some(span),
                });
                Ok(if empty { Frame::Other } else { Frame::Item(index) })
            }
            Some(Frame::Item(_)) => Ok(Frame::Other),
            Some(_) if local == ITEM_GROUP => {
                let conditional = attribute(element, "Condition", span.start)?.is_some();
                let index = self.groups.len();
                self.groups.push(ItemGroup {
                    prefix,
                    indent: line_indent(source, span.start).unwrap_or_default(),
                    child_indent: None,
                    close: if empty {
                        GroupClose::SelfClosing
                    } else {
                        GroupClose::EndTag(span.end)
                    },
                    span,
                    top_level: matches!(stack, [Frame::Root]),
                    conditional,
                });
                Ok(Frame::Group(index))
            }
            Some(_) => Ok(Frame::Other),
        }
    }
}

/// Read and unescape an attribute value.
fn attribute(element: &BytesStart<'_>, key: &str, position: usize) -> Result<Option<String>> {
    let parse_error = |message: String| Error::Parse { position, message };

    let Some(attr) = element
        .try_get_attribute(key)
        .map_err(|e| parse_error(e.to_string()))?
    else {
        return Ok(None);
    };

    let value = attr
        .unescape_value()
        .map_err(|e| parse_error(e.to_string()))?;
    Ok(Some(value.into_owned()))
}

/// Indentation before `position` if only whitespace precedes it on its line.
pub(crate) fn line_indent(source: &str, position: usize) -> Option<String> {
    let start = line_start(source, position);
    let prefix = &source[start..position];
    is_blank(prefix).then(|| prefix.to_string())
}

pub(crate) fn line_start(source: &str, position: usize) -> usize {
    source[..position].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}
