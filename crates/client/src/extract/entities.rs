//! Character reference decoding for text and attribute values.

use std::borrow::Cow;

/// Decode named (`&eacute;`), decimal (`&#233;`) and hex (`&#xE9;`)
/// references. Text without a recognizable reference is returned as is.
pub fn decode(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }
    html_escape::decode_html_entities(input)
}
