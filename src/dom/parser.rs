use crate::dom::dom_model::{Document, Element, NodeId, is_raw_text_tag, is_void_tag};
use crate::ui::error::ClientError;

/// Parse an HTML fragment and append it under `parent`.
///
/// Returns the top-level nodes that were created. End tags without a matching
/// open element are ignored; open elements left at the end are closed implicitly.
pub fn parse_fragment(
    doc: &mut Document,
    parent: NodeId,
    html: &str,
) -> Result<Vec<NodeId>, ClientError> {
    let first_new = doc.children(parent).len();
    let mut stack = vec![parent];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            let end = find_subslice(bytes, i + 4, b"-->")
                .ok_or_else(|| ClientError::HtmlParse("unclosed HTML comment".into()))?;
            i = end + 3;
            continue;
        }

        // <!DOCTYPE ...> and friends
        if starts_with_at(bytes, i, b"<!") {
            let end = find_subslice(bytes, i, b">")
                .ok_or_else(|| ClientError::HtmlParse("unclosed markup declaration".into()))?;
            i = end + 1;
            continue;
        }

        if starts_with_at(bytes, i, b"</") {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;

            // Pop up to and including the matching element, if it is open
            if let Some(pos) = stack
                .iter()
                .skip(1)
                .rposition(|id| doc.element(*id).map(|e| e.tag == tag).unwrap_or(false))
            {
                stack.truncate(pos + 1);
            }
            continue;
        }

        if bytes[i] == b'<' && bytes.get(i + 1).map(|b| b.is_ascii_alphabetic()).unwrap_or(false) {
            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            close_implied(doc, &mut stack, &tag);

            let top = *stack
                .last()
                .ok_or_else(|| ClientError::HtmlParse("missing parent element".into()))?;
            let node = doc.append_element(top, Element::new(&tag, attrs));

            if is_raw_text_tag(&tag) {
                let close = find_end_tag_ci(bytes, i, tag.as_bytes())
                    .ok_or_else(|| ClientError::HtmlParse(format!("unclosed <{}>", tag)))?;
                if let Some(body) = html.get(i..close) {
                    if !body.is_empty() {
                        doc.append_text(node, body);
                    }
                }
                let (_, after) = parse_end_tag(html, close)?;
                i = after;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        // Text run (a lone '<' that opens no tag is kept as text)
        let start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }
        if let Some(text) = html.get(start..i) {
            let top = *stack
                .last()
                .ok_or_else(|| ClientError::HtmlParse("missing parent element".into()))?;
            doc.append_text(top, &decode_entities(text));
        }
    }

    let created: Vec<NodeId> = doc.children(parent)[first_new..].to_vec();
    for id in &created {
        doc.initialize_controls(*id);
    }
    Ok(created)
}

/// Elements whose start tag closes an open sibling of the same kind.
fn close_implied(doc: &Document, stack: &mut Vec<NodeId>, tag: &str) {
    if !matches!(tag, "option" | "li" | "p") {
        return;
    }
    if stack.len() < 2 {
        return;
    }
    let top = stack[stack.len() - 1];
    if doc.element(top).map(|e| e.tag == tag).unwrap_or(false) {
        stack.pop();
    }
}

fn parse_start_tag(
    html: &str,
    at: usize,
) -> Result<(String, Vec<(String, String)>, bool, usize), ClientError> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| ClientError::HtmlParse("invalid tag name".into()))?
        .to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(ClientError::HtmlParse(format!("unclosed start tag <{}>", tag)));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' {
            if bytes.get(i + 1) == Some(&b'>') {
                self_closing = true;
                i += 2;
                break;
            }
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        let name = html
            .get(name_start..i)
            .ok_or_else(|| ClientError::HtmlParse("invalid attribute name".into()))?
            .to_ascii_lowercase();
        if name.is_empty() {
            return Err(ClientError::HtmlParse(format!("invalid attribute in <{}>", tag)));
        }

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, &mut i)?
        } else {
            String::new()
        };

        // First occurrence wins, as in browsers
        if !attrs.iter().any(|(k, _)| *k == name) {
            attrs.push((name, value));
        }
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize), ClientError> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| ClientError::HtmlParse("invalid end tag".into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(ClientError::HtmlParse(format!("unclosed end tag </{}>", tag)));
    }
    Ok((tag, i + 1))
}

fn parse_attr_value(html: &str, i: &mut usize) -> Result<String, ClientError> {
    let bytes = html.as_bytes();
    if *i >= bytes.len() {
        return Err(ClientError::HtmlParse("missing attribute value".into()));
    }

    if bytes[*i] == b'"' || bytes[*i] == b'\'' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(ClientError::HtmlParse("unclosed quoted attribute value".into()));
        }
        let raw = html
            .get(start..*i)
            .ok_or_else(|| ClientError::HtmlParse("invalid attribute value".into()))?;
        *i += 1;
        return Ok(decode_entities(raw));
    }

    let start = *i;
    while *i < bytes.len()
        && !bytes[*i].is_ascii_whitespace()
        && bytes[*i] != b'>'
        && !(bytes[*i] == b'/' && bytes.get(*i + 1) == Some(&b'>'))
    {
        *i += 1;
    }
    let raw = html
        .get(start..*i)
        .ok_or_else(|| ClientError::HtmlParse("invalid attribute value".into()))?;
    Ok(decode_entities(raw))
}

/// Decode the character references that show up in hand-written pages.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let name = &rest[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if name.starts_with("#x") || name.starts_with("#X") => {
                    u32::from_str_radix(&name[2..], 16).ok().and_then(char::from_u32)
                }
                _ if name.starts_with('#') => name[1..].parse::<u32>().ok().and_then(char::from_u32),
                _ => None,
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.len() >= at + needle.len() && &bytes[at..at + needle.len()] == needle
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn find_end_tag_ci(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while i + 2 + tag.len() <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + tag.len()].eq_ignore_ascii_case(tag)
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}
