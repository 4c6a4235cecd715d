//! Design-token JSON: `{ hue: { tone: { "value": hex, "type": "color" } } }`.

use crate::hex::cell_or_black;
use serde_json::{json, Map, Value};
use tonegrid_core::{LchModel, PaletteError, PaletteMatrix};

/// Name given to palettes read from design tokens.
pub const TOKENS_PALETTE_NAME: &str = "Imported Design Token";

/// Converts a matrix to design tokens. Hue and tone order is preserved.
pub fn export_tokens(matrix: &PaletteMatrix) -> Value {
    let mut tokens = Map::new();
    for (hue, row) in matrix.hues().iter().zip(matrix.colors()) {
        let entry = tokens
            .entry(hue.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(tones) = entry {
            for (tone, color) in matrix.tones().iter().zip(row) {
                tones.insert(tone.clone(), json!({ "value": color.hex(), "type": "color" }));
            }
        }
    }
    Value::Object(tokens)
}

fn format_error(msg: impl Into<String>) -> PaletteError {
    PaletteError::ImportFormat(msg.into())
}

/// Reads design tokens into a CIELCH palette.
///
/// Hues are the top-level keys and tones the keys of the first hue; every
/// hue must define every one of those tones. Unreadable color values become
/// black.
pub fn import_tokens(content: &str) -> Result<PaletteMatrix, PaletteError> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| format_error(format!("design tokens are not valid JSON: {e}")))?;
    let hues = root
        .as_object()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| format_error("design tokens must be a non-empty object of hues"))?;

    let tones: Vec<String> = hues
        .values()
        .next()
        .and_then(Value::as_object)
        .ok_or_else(|| format_error("first hue must be an object of tones"))?
        .keys()
        .cloned()
        .collect();
    if tones.is_empty() {
        return Err(format_error("first hue defines no tones"));
    }

    let mode = LchModel::Cielch;
    let mut colors = Vec::with_capacity(hues.len());
    for (hue, entries) in hues {
        let entries = entries
            .as_object()
            .ok_or_else(|| format_error(format!("hue '{hue}' must be an object of tones")))?;
        let row = tones
            .iter()
            .map(|tone| {
                let value = entries
                    .get(tone)
                    .ok_or_else(|| format_error(format!("hue '{hue}' has no tone '{tone}'")))?
                    .get("value")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        format_error(format!("token {hue}.{tone} has no string 'value'"))
                    })?;
                Ok(cell_or_black(mode, Some(value)))
            })
            .collect::<Result<Vec<_>, PaletteError>>()?;
        colors.push(row);
    }

    PaletteMatrix::new(TOKENS_PALETTE_NAME, mode, hues.keys().cloned().collect(), tones, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{parse_hex_palette, HexPalette};

    fn sample() -> PaletteMatrix {
        let hex = HexPalette::from_json(
            r##"{"name":"T","tones":["100","200"],"hues":[
                {"name":"Red","colors":["#ff0000","#800000"]},
                {"name":"Blue","colors":["#0000ff","#000080"]}]}"##,
        )
        .unwrap();
        parse_hex_palette(&hex, LchModel::Oklch).unwrap()
    }

    #[test]
    fn export_nests_hue_then_tone() {
        let tokens = export_tokens(&sample());
        assert_eq!(tokens["Red"]["100"]["value"], "#ff0000");
        assert_eq!(tokens["Blue"]["200"]["type"], "color");
        let keys: Vec<&String> = tokens.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Red", "Blue"]);
    }

    #[test]
    fn export_then_import_reproduces_cells() {
        let m = sample();
        let json = serde_json::to_string(&export_tokens(&m)).unwrap();
        let back = import_tokens(&json).unwrap();
        assert_eq!(back.name(), TOKENS_PALETTE_NAME);
        assert_eq!(back.mode(), LchModel::Cielch);
        assert_eq!(back.hues(), m.hues());
        assert_eq!(back.tones(), m.tones());
        for (a, b) in m.colors().iter().flatten().zip(back.colors().iter().flatten()) {
            assert_eq!(a.hex(), b.hex());
        }
    }

    #[test]
    fn unreadable_value_becomes_black() {
        let m = import_tokens(r#"{"Red":{"100":{"value":"bogus","type":"color"}}}"#).unwrap();
        assert_eq!(m.color(0, 0).unwrap().hex(), "#000000");
    }

    #[test]
    fn malformed_tokens_are_import_errors() {
        for bad in [
            "[1, 2]",
            "{}",
            "{oops",
            r#"{"Red": 5}"#,
            r#"{"Red": {}}"#,
            r##"{"Red":{"100":{"value":"#f00"}},"Blue":{"200":{"value":"#00f"}}}"##,
            r#"{"Red":{"100":{"value":12}}}"#,
        ] {
            assert!(
                matches!(import_tokens(bad), Err(PaletteError::ImportFormat(_))),
                "accepted {bad}"
            );
        }
    }
}
