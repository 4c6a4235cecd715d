//! CSS custom properties: `--<hue>-<tone>: <color>;`.

use crate::hex::cell_or_black;
use regex::Regex;
use std::sync::LazyLock;
use tonegrid_core::{LchModel, PaletteError, PaletteMatrix};
use tracing::debug;

/// Name given to palettes read from CSS variables.
pub const CSS_PALETTE_NAME: &str = "Imported CSS Variables";

/// Hue names stop at the first `-`; the tone is everything up to the `:`.
static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--([^-]+)-([^:]+):\s*([^;]+);").expect("valid regex"));

/// One `--hue-tone: hex;` line per cell, grouped under a comment per hue.
pub fn export_css(matrix: &PaletteMatrix) -> String {
    let mut lines = vec![format!("/* {} color palette */", matrix.name())];
    for (hue, row) in matrix.hues().iter().zip(matrix.colors()) {
        lines.push(String::new());
        lines.push(format!("/* {hue} */"));
        for (tone, color) in matrix.tones().iter().zip(row) {
            lines.push(format!("--{hue}-{tone}: {};", color.hex()));
        }
    }
    lines.join("\n")
}

/// Reads CSS variables into a CIELCH palette.
///
/// Hues appear in first-seen order and tones in the order of the first hue.
/// A hue missing one of those tones gets black there, as do values that are
/// not sRGB colors.
pub fn import_css(content: &str) -> Result<PaletteMatrix, PaletteError> {
    let mut table: Vec<(String, Vec<(String, String)>)> = Vec::new();
    for line in content.lines() {
        if !(line.contains("--") && line.contains(':')) {
            continue;
        }
        let Some(caps) = VAR_RE.captures(line) else {
            debug!(line, "skipping unrecognized CSS variable");
            continue;
        };
        let (hue, tone, value) = (&caps[1], &caps[2], caps[3].trim());
        let idx = match table.iter().position(|(h, _)| h == hue) {
            Some(i) => i,
            None => {
                table.push((hue.to_string(), Vec::new()));
                table.len() - 1
            }
        };
        let cells = &mut table[idx].1;
        match cells.iter_mut().find(|(t, _)| t == tone) {
            Some(cell) => cell.1 = value.to_string(),
            None => cells.push((tone.to_string(), value.to_string())),
        }
    }

    let Some((_, first)) = table.first() else {
        return Err(PaletteError::ImportFormat(
            "no --<hue>-<tone>: <color>; variables found".into(),
        ));
    };
    let tones: Vec<String> = first.iter().map(|(t, _)| t.clone()).collect();

    let mode = LchModel::Cielch;
    let colors = table
        .iter()
        .map(|(_, cells)| {
            tones
                .iter()
                .map(|tone| {
                    let value = cells
                        .iter()
                        .find(|(t, _)| t == tone)
                        .map_or("#000000", |(_, v)| v.as_str());
                    cell_or_black(mode, Some(value))
                })
                .collect()
        })
        .collect();
    let hues = table.iter().map(|(h, _)| h.clone()).collect();
    PaletteMatrix::new(CSS_PALETTE_NAME, mode, hues, tones, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{parse_hex_palette, HexPalette};

    fn one_cell() -> PaletteMatrix {
        let hex = HexPalette::from_json(
            r##"{"name":"T","tones":["100"],"hues":[{"name":"Red","colors":["#ff0000"]}]}"##,
        )
        .unwrap();
        parse_hex_palette(&hex, LchModel::Cielch).unwrap()
    }

    #[test]
    fn exports_one_line_per_cell() {
        let css = export_css(&one_cell());
        assert!(css.contains("--Red-100: #ff0000;"), "{css}");
        assert_eq!(css, "/* T color palette */\n\n/* Red */\n--Red-100: #ff0000;");
    }

    #[test]
    fn imports_exported_text() {
        let css = ":root {\n  --red-100: #ffcccc;\n  --red-200: #ff0000;\n  --blue-100: #ccccff;\n  --blue-200: #0000ff;\n}";
        let m = import_css(css).unwrap();
        assert_eq!(m.name(), CSS_PALETTE_NAME);
        assert_eq!(m.hues(), ["red", "blue"]);
        assert_eq!(m.tones(), ["100", "200"]);
        assert_eq!(m.color(1, 1).unwrap().hex(), "#0000ff");
    }

    #[test]
    fn missing_and_bad_cells_become_black() {
        let css = "--red-100: #f00;\n--red-200: #800;\n--blue-100: notacolor;\n";
        let m = import_css(css).unwrap();
        assert_eq!(m.color(1, 0).unwrap().hex(), "#000000");
        assert_eq!(m.color(1, 1).unwrap().hex(), "#000000");
    }

    #[test]
    fn tone_may_contain_dashes() {
        let m = import_css("--gray-a-100: #eee;").unwrap();
        assert_eq!(m.hues(), ["gray"]);
        assert_eq!(m.tones(), ["a-100"]);
    }

    #[test]
    fn no_variables_is_an_import_error() {
        assert!(matches!(
            import_css("body { color: red; }"),
            Err(PaletteError::ImportFormat(_))
        ));
    }
}
