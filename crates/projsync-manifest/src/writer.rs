//! Text splicing for manifest edits.
//!
//! Additions and removals become byte-range edits against the original
//! source. Removals take the whole line when the entry sits on a line of its
//! own; additions copy the indentation of their siblings.

use std::ops::Range;

use quick_xml::escape::escape;

use crate::document::{GroupClose, ItemGroup, ManifestDocument};
use crate::parser::{is_blank, line_start};

/// Indentation added per nesting level when none can be copied.
pub(crate) const INDENT_UNIT: &str = "  ";

#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Range to delete for an entry spanning `span`.
pub(crate) fn removal_range(source: &str, span: Range<usize>) -> Range<usize> {
    let start = line_start(source, span.start);
    let end = source[span.end..]
        .find('\n')
        .map(|i| span.end + i + 1)
        .unwrap_or(source.len());

    if is_blank(&source[start..span.start]) && source[span.end..end].trim().is_empty() {
        start..end
    } else {
        span
    }
}

/// Serialize one item element.
pub(crate) fn element_text(prefix: &str, element: &str, include: &str) -> String {
    format!("<{}{} Include=\"{}\" />", prefix, element, escape(include))
}

pub(crate) fn render(doc: &ManifestDocument) -> String {
    let source = doc.source.as_str();
    let newline = doc.newline;

    let mut edits: Vec<Edit> = doc
        .removed
        .iter()
        .map(|range| Edit {
            range: range.clone(),
            text: String::new(),
        })
        .collect();

    for (index, group) in doc.groups.iter().enumerate() {
        let lines: Vec<String> = doc
            .entries
            .iter()
            .filter(|e| e.group == index && e.is_pending())
            .map(|e| {
                format!(
                    "{}{}",
                    child_indent(group),
                    element_text(&group.prefix, &e.element, e.include.as_deref().unwrap_or_default())
                )
            })
            .collect();
        if lines.is_empty() {
            continue;
        }

        edits.push(match group.close {
            GroupClose::EndTag(close) => insert_before_close(source, close, &lines, &group.indent, newline),
            GroupClose::SelfClosing => expand_group(source, group, &lines, newline),
            GroupClose::Synthesized => {
                let mut block = Vec::with_capacity(lines.len() + 2);
                block.push(format!("{}<{}ItemGroup>", group.indent, group.prefix));
                block.extend(lines);
                block.push(format!("{}</{}ItemGroup>", group.indent, group.prefix));
                insert_before_close(source, group.span.start, &block, "", newline)
            }
        });
    }

    apply(source, edits)
}

fn child_indent(group: &ItemGroup) -> String {
    group
        .child_indent
        .clone()
        .unwrap_or_else(|| format!("{}{}", group.indent, INDENT_UNIT))
}

/// Insert `lines` in front of the end tag at `close`.
fn insert_before_close(
    source: &str,
    close: usize,
    lines: &[String],
    close_indent: &str,
    newline: &str,
) -> Edit {
    let start = line_start(source, close);

    if is_blank(&source[start..close]) {
        let text = lines.iter().map(|line| format!("{}{}", line, newline)).collect();
        Edit {
            range: start..start,
            text,
        }
    } else {
        let mut text: String = lines
            .iter()
            .map(|line| format!("{}{}", newline, line))
            .collect();
        text.push_str(newline);
        text.push_str(close_indent);
        Edit {
            range: close..close,
            text,
        }
    }
}

/// Rewrite `<ItemGroup />` as an open/close pair holding `lines`.
fn expand_group(source: &str, group: &ItemGroup, lines: &[String], newline: &str) -> Edit {
    let open = source[group.span.clone()].trim_end_matches("/>").trim_end();

    let mut text = format!("{}>", open);
    for line in lines {
        text.push_str(newline);
        text.push_str(line);
    }
    text.push_str(newline);
    text.push_str(&group.indent);
    text.push_str(&format!("</{}ItemGroup>", group.prefix));

    Edit {
        range: group.span.clone(),
        text,
    }
}

fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        let start = edit.range.start.max(cursor);
        output.push_str(&source[cursor..start]);
        output.push_str(&edit.text);
        cursor = edit.range.end.max(start);
    }
    output.push_str(&source[cursor..]);
    output
}
