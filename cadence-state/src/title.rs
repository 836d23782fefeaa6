/// Tidies up a video title for display as a track title.
///
/// Bracketed groups like `(Official Music Video)`, `(Lyric Video)` and `[HD]` are removed,
/// the common HTML entities are decoded and runs of whitespace are collapsed.
pub fn clean_title(raw: &str) -> String {
    let stripped = strip_bracket_groups(&decode_entities(raw));
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_bracket_groups(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find(['(', '[']) {
        let close_char = if rest[open..].starts_with('(') { ')' } else { ']' };
        output.push_str(&rest[..open]);

        // Unclosed groups are kept as-is
        let Some(len) = rest[open + 1..].find(close_char) else {
            output.push_str(&rest[open..]);
            return output;
        };
        let content = &rest[open + 1..open + 1 + len];
        let end = open + 1 + len + 1;
        if !is_noise(content) {
            output.push_str(&rest[open..end]);
        }
        rest = &rest[end..];
    }
    output.push_str(rest);
    output
}

fn is_noise(content: &str) -> bool {
    let content = content.to_lowercase();
    content.starts_with("official ") || content.ends_with("video") || content == "hd"
}

const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

/// Single pass, so `&amp;quot;` decodes to `&quot;` and not `"`.
fn decode_entities(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, decoded)) => {
                output.push(*decoded);
                rest = &rest[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }
    output.push_str(rest);
    output
}
