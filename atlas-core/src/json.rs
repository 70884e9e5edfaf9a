use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize with four-space indentation, the layout pack authors expect.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Decode a JSON file's bytes, dropping a leading UTF-8 byte order mark.
pub(crate) fn decode_text(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes))
}
