/// Upper bound, in characters, for a diagnostic message stored in a result.
pub const MAX_MESSAGE_CHARS: usize = 1250;

/// Prepare raw error text or a mismatched response body for storage as a diagnostic message.
/// Literal `\uXXXX` escapes (common in JSON error bodies) are decoded first, then the text is
/// cut down to the first `MAX_MESSAGE_CHARS` characters.
pub fn sanitize_message(raw: &str) -> String {
    let mut decoded = decode_unicode_escapes(raw);
    if let Some((idx, _)) = decoded.char_indices().nth(MAX_MESSAGE_CHARS) {
        decoded.truncate(idx);
    }
    decoded
}

/// Replace every `\uXXXX` escape with the character it encodes.
/// Escapes that are not four hex digits, or that do not name a valid character, are kept as-is.
/// A high/low surrogate escape pair is combined into one character.
pub fn decode_unicode_escapes(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("\\u") {
        decoded.push_str(&rest[..pos]);
        let escape = &rest[pos..];
        match parse_escape(escape) {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &escape[consumed..];
            }
            None => {
                decoded.push_str("\\u");
                rest = &escape[2..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn parse_escape(escape: &str) -> Option<(char, usize)> {
    let unit = hex_unit(escape)?;
    if (0xD800..0xDC00).contains(&unit) {
        let low = hex_unit(&escape[6..]).filter(|low| (0xDC00..0xE000).contains(low))?;
        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined).map(|ch| (ch, 12));
    }
    char::from_u32(unit).map(|ch| (ch, 6))
}

fn hex_unit(escape: &str) -> Option<u32> {
    let digits = escape.strip_prefix("\\u")?.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
