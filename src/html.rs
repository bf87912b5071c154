use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

/// Parses a document or fragment. The parsed nodes hang off the returned
/// tree's document node.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack: Vec<NodeId> = vec![dom.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;
    let mut text_start = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        let rest = &html[i..];
        let tag_kind = if rest.starts_with("<!--") {
            Some(TagKind::Comment)
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            Some(TagKind::Declaration)
        } else if rest.starts_with("</") {
            rest.as_bytes()
                .get(2)
                .filter(|b| b.is_ascii_alphabetic())
                .map(|_| TagKind::Close)
        } else {
            rest.as_bytes()
                .get(1)
                .filter(|b| b.is_ascii_alphabetic())
                .map(|_| TagKind::Open)
        };
        let Some(tag_kind) = tag_kind else {
            i += 1;
            continue;
        };

        flush_text(&mut dom, &stack, &html[text_start..i]);

        match tag_kind {
            TagKind::Comment => {
                let end = rest
                    .find("-->")
                    .ok_or_else(|| Error::HtmlParse("unclosed comment".into()))?;
                i += end + 3;
            }
            TagKind::Declaration => {
                let end = rest
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
                i += end + 1;
            }
            TagKind::Close => {
                let end = rest
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse("unclosed end tag".into()))?;
                let name = rest[2..end].trim().to_ascii_lowercase();
                if let Some(pos) = stack
                    .iter()
                    .rposition(|node| dom.has_tag(*node, &name))
                {
                    stack.truncate(pos);
                }
                i += end + 1;
            }
            TagKind::Open => {
                let (name, attrs, self_closing, consumed) = parse_start_tag(rest)?;
                i += consumed;

                if matches!(name.as_str(), "option" | "optgroup") {
                    if let Some(top) = stack.last().copied() {
                        if dom.has_tag(top, "option") {
                            stack.pop();
                        }
                    }
                }

                let parent = stack.last().copied().unwrap_or(dom.root);
                let node = dom.create_element(parent, name.clone(), attrs);

                if is_raw_text_tag(&name) {
                    let close = format!("</{name}");
                    let body_end = find_ascii_case_insensitive(&html[i..], &close)
                        .map(|offset| i + offset)
                        .unwrap_or(html.len());
                    let body = &html[i..body_end];
                    if !body.is_empty() {
                        let text = if name == "textarea" || name == "title" {
                            decode_html_character_references(body)
                        } else {
                            body.to_string()
                        };
                        dom.create_text(node, text);
                    }
                    i = match html[body_end..].find('>') {
                        Some(offset) => body_end + offset + 1,
                        None => html.len(),
                    };
                } else if !self_closing && !is_void_tag(&name) {
                    stack.push(node);
                }
            }
        }
        text_start = i;
    }

    flush_text(&mut dom, &stack, &html[text_start..]);
    dom.initialize_form_control_values()?;
    Ok(dom)
}

enum TagKind {
    Comment,
    Declaration,
    Close,
    Open,
}

fn flush_text(dom: &mut Dom, stack: &[NodeId], raw: &str) {
    if raw.is_empty() {
        return;
    }
    let parent = stack.last().copied().unwrap_or(dom.root);
    dom.create_text(parent, decode_html_character_references(raw));
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

/// Returns `(tag name, attributes, self closing, bytes consumed)`.
fn parse_start_tag(src: &str) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = src.as_bytes();
    let mut i = 1usize;
    let name_start = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/'
    {
        i += 1;
    }
    let name = src[name_start..i].to_ascii_lowercase();
    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(Error::HtmlParse(format!("unclosed start tag: <{name}")));
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let attr_name = src[attr_start..i].to_ascii_lowercase();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(quote @ (b'"' | b'\'')) => {
                    let quote = *quote as char;
                    let value_start = i + 1;
                    let end = src[value_start..].find(quote).ok_or_else(|| {
                        Error::HtmlParse(format!("unclosed attribute value in <{name}>"))
                    })?;
                    value = decode_html_character_references(&src[value_start..value_start + end]);
                    i = value_start + end + 1;
                }
                Some(_) => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_html_character_references(&src[value_start..i]);
                }
                None => {
                    return Err(Error::HtmlParse(format!("unclosed start tag: <{name}")));
                }
            }
        }

        if !attr_name.is_empty() {
            attrs.entry(attr_name).or_insert(value);
        }
    }

    Ok((name, attrs, self_closing, i))
}

pub(crate) fn decode_html_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_numeric(value: &str) -> Option<char> {
        let codepoint =
            if let Some(hex) = value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                value.parse::<u32>().ok()?
            };
        char::from_u32(codepoint)
    }

    fn decode_named(value: &str) -> Option<char> {
        match value {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            "copy" => Some('©'),
            "euro" => Some('€'),
            "hellip" => Some('…'),
            _ => None,
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail.find(';').and_then(|semi| {
            let raw = &tail[..semi];
            let ch = match raw.strip_prefix('#') {
                Some(numeric) => decode_numeric(numeric),
                None => decode_named(raw),
            }?;
            Some((ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
