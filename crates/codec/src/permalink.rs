//! Shareable palette links.
//!
//! The hex-palette JSON is compressed with LZ-String's URI-safe encoding and
//! carried in the `palette` query parameter, so links stay interchangeable
//! with the browser version of the tool.

use crate::hex::{export_hex_palette, HexPalette};
use tonegrid_core::{PaletteError, PaletteMatrix};
use tracing::trace;

/// Query parameter holding the compressed palette.
pub const PALETTE_PARAM: &str = "palette";

/// Compresses a hex palette into a URI-safe string.
pub fn encode(palette: &HexPalette) -> Result<String, PaletteError> {
    let json = palette.to_json()?;
    let encoded = lz_str::compress_to_encoded_uri_component(json.as_str());
    trace!(json = json.len(), encoded = encoded.len(), "compressed palette");
    Ok(encoded)
}

/// Decompresses and validates a palette produced by [`encode`].
pub fn decode(component: &str) -> Result<HexPalette, PaletteError> {
    // Query decoders turn a literal '+' into a space.
    let component = component.trim().replace(' ', "+");
    let wide = lz_str::decompress_from_encoded_uri_component(component.as_str())
        .ok_or_else(|| PaletteError::Parse("palette link is not valid LZ-String data".into()))?;
    let json = String::from_utf16(&wide)
        .map_err(|e| PaletteError::Parse(format!("palette link is not valid text: {e}")))?;
    if json.is_empty() {
        return Err(PaletteError::Parse("palette link decodes to nothing".into()));
    }
    HexPalette::from_json(&json)
}

/// Returns `base_url` with its `palette` parameter set to `matrix`.
///
/// Other query parameters and any `#fragment` are kept.
pub fn palette_link(base_url: &str, matrix: &PaletteMatrix) -> Result<String, PaletteError> {
    let encoded = encode(&export_hex_palette(matrix))?;
    let (without_fragment, fragment) = match base_url.split_once('#') {
        Some((url, frag)) => (url, Some(frag)),
        None => (base_url, None),
    };
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let mut params: Vec<String> = query
        .split('&')
        .filter(|p| !p.is_empty() && param_name(p) != PALETTE_PARAM)
        .map(str::to_string)
        .collect();
    params.push(format!("{PALETTE_PARAM}={}", escape_component(&encoded)));

    let mut link = format!("{path}?{}", params.join("&"));
    if let Some(frag) = fragment {
        link.push('#');
        link.push_str(frag);
    }
    Ok(link)
}

/// Extracts and decodes the palette from a link. A string without a
/// `palette` parameter is treated as the bare compressed component.
pub fn palette_from_link(link: &str) -> Result<HexPalette, PaletteError> {
    let link = link.trim();
    let query = link
        .split_once('?')
        .map(|(_, q)| q.split('#').next().unwrap_or(q));
    let value = query.and_then(|q| {
        q.split('&')
            .find(|p| param_name(p) == PALETTE_PARAM)
            .map(|p| p.split_once('=').map_or("", |(_, v)| v))
    });
    match value {
        Some(v) => decode(&unescape_component(v)?),
        None if !link.contains(['?', '/', '=']) => decode(link),
        None => Err(PaletteError::Parse(format!(
            "link has no '{PALETTE_PARAM}' parameter"
        ))),
    }
}

fn param_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(k, _)| k)
}

/// Percent-encodes the two LZ-String output characters that are not safe
/// in a query value.
fn escape_component(s: &str) -> String {
    s.replace('+', "%2B").replace('$', "%24")
}

fn unescape_component(s: &str) -> Result<String, PaletteError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| PaletteError::Parse(format!("bad percent escape in '{s}'")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|e| PaletteError::Parse(e.to_string()))
}
