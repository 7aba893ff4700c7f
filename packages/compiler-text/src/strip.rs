/// Elements rich text may carry; anything else after `<` is prose
const KNOWN_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "center", "code", "div", "em", "font", "h1", "h2", "h3", "h4", "h5",
    "h6", "hr", "i", "img", "li", "mark", "ol", "p", "pre", "s", "section", "small", "span", "strong",
    "sub", "sup", "table", "tbody", "td", "th", "thead", "tr", "u", "ul",
];

/// Remove markup from rich text, keeping line breaks.
///
/// `<br>` and closing paragraph/div tags become newlines; every other known
/// tag and every comment is dropped. A `<` that does not open one of those is
/// kept, so `total < 50 and weight > 2kg` survives. Entities are decoded
/// afterwards.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];

        if let Some(body) = candidate.strip_prefix("<!--") {
            rest = match body.find("-->") {
                Some(close) => &body[close + 3..],
                None => "",
            };
            continue;
        }

        match tag_at(candidate) {
            Some((len, name, closing)) => {
                if name == "br" || (closing && matches!(name, "p" | "div" | "li")) {
                    out.push('\n');
                }
                rest = &candidate[len..];
            }
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);

    decode_entities(out.trim_end_matches('\n'))
}

/// Recognize a known tag at the start of `input`, answering its byte length,
/// lowercase name and whether it closes an element
fn tag_at(input: &str) -> Option<(usize, &'static str, bool)> {
    let after = input.strip_prefix('<')?;
    let (closing, after) = match after.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, after),
    };

    let name_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    if name_len == 0 {
        return None;
    }
    let name = after[..name_len].to_ascii_lowercase();
    let name = KNOWN_TAGS.iter().copied().find(|known| *known == name)?;

    let tail = &after[name_len..];
    if !tail.starts_with(|c: char| c == '>' || c == '/' || c.is_whitespace()) {
        return None;
    }
    let close = tail.find('>')?;
    Some((input.len() - tail.len() + close + 1, name, closing))
}

/// Decode the named entities email content commonly carries plus numeric ones
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').filter(|semi| *semi <= 10) {
            Some(semi) => match decode_entity(&candidate[1..semi]) {
                Some(decoded) => {
                    out.push(decoded);
                    rest = &candidate[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
