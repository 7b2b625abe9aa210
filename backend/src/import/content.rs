use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes upload bytes as UTF-8, falling back to ISO-8859-1 so that legacy
/// single-byte files keep one character per byte.
pub(super) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Non-blank lines in file order, with trailing whitespace removed.
///
/// Leading whitespace is part of the first column and stays.
pub(super) fn content_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .map(str::trim_end)
        .filter(|line| !line.trim_start().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBFH\xC3\xA9lo\xC3\xAFse";
        assert_eq!(decode_text(bytes), "Héloïse");
    }

    #[test]
    fn latin1_fallback_keeps_one_char_per_byte() {
        let bytes = b"H\xE9lo\xEFse";
        let text = decode_text(bytes);
        assert_eq!(text, "Héloïse");
        assert_eq!(text.chars().count(), bytes.len());
    }

    #[test]
    fn lines_skip_blanks_and_keep_leading_spaces() {
        let text = "0001 A  \r\n\r\n   \n          B\r0003\n";
        assert_eq!(content_lines(text), vec!["0001 A", "          B", "0003"]);
    }
}
