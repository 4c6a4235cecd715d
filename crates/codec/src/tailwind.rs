//! Tailwind CSS export: v3 channel variables, v3 config snippet, v4 OKLCH
//! variables.

use tonegrid_core::color::srgb_to_oklch_unit;
use tonegrid_core::{ColorValue, PaletteMatrix, Srgb};

fn grouped_lines(
    matrix: &PaletteMatrix,
    header: String,
    line: impl Fn(&str, &str, &ColorValue) -> String,
) -> String {
    let mut lines = vec![header];
    for (hue, row) in matrix.hues().iter().zip(matrix.colors()) {
        lines.push(String::new());
        lines.push(format!("/* {hue} */"));
        for (tone, color) in matrix.tones().iter().zip(row) {
            lines.push(line(hue, tone, color));
        }
    }
    lines.join("\n")
}

/// `--color-<hue>-<tone>: R G B;` with integer channels.
pub fn export_tailwind_v3_vars(matrix: &PaletteMatrix) -> String {
    let header = format!("/* {} Tailwind CSS v3 variables */", matrix.name());
    grouped_lines(matrix, header, |hue, tone, color| {
        let [r, g, b] = color.bytes();
        format!("--color-{hue}-{tone}: {r} {g} {b};")
    })
}

/// A `colors: { hue: { tone: 'hex' } }` block for `tailwind.config.js`.
pub fn export_tailwind_v3_config(matrix: &PaletteMatrix) -> String {
    let mut lines = vec![
        format!("// {} Tailwind CSS v3 config", matrix.name()),
        "colors: {".to_string(),
    ];
    for (hue, row) in matrix.hues().iter().zip(matrix.colors()) {
        lines.push(format!("  {hue}: {{"));
        for (tone, color) in matrix.tones().iter().zip(row) {
            lines.push(format!("    {tone}: '{}',", color.hex()));
        }
        lines.push("  },".to_string());
    }
    lines.push("},".to_string());
    lines.join("\n")
}

/// `--color-<hue>-<tone>: oklch(l c h);` using the CSS OKLCH coordinates of
/// each displayed color (lightness 0..1), whatever the palette's own model.
pub fn export_tailwind_v4(matrix: &PaletteMatrix) -> String {
    let header = format!("/* {} Tailwind CSS v4 variables */", matrix.name());
    grouped_lines(matrix, header, |hue, tone, color| {
        let [r, g, b] = color.bytes();
        let lch = srgb_to_oklch_unit(Srgb::from_bytes(r, g, b));
        format!(
            "--color-{hue}-{tone}: oklch({:.3} {:.3} {:.3});",
            lch.l, lch.c, lch.h
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{parse_hex_palette, HexPalette};
    use tonegrid_core::LchModel;

    fn sample() -> PaletteMatrix {
        let hex = HexPalette::from_json(
            r##"{"name":"Brand","tones":["100","900"],"hues":[
                {"name":"red","colors":["#ff0000","#ffffff"]}]}"##,
        )
        .unwrap();
        parse_hex_palette(&hex, LchModel::Cielch).unwrap()
    }

    #[test]
    fn v3_vars_use_integer_channels() {
        let out = export_tailwind_v3_vars(&sample());
        assert!(out.starts_with("/* Brand Tailwind CSS v3 variables */\n\n/* red */\n"));
        assert!(out.contains("--color-red-100: 255 0 0;"), "{out}");
        assert!(out.contains("--color-red-900: 255 255 255;"), "{out}");
    }

    #[test]
    fn v3_config_is_nested_object() {
        let out = export_tailwind_v3_config(&sample());
        assert_eq!(
            out,
            "// Brand Tailwind CSS v3 config\ncolors: {\n  red: {\n    100: '#ff0000',\n    900: '#ffffff',\n  },\n},"
        );
    }

    #[test]
    fn v4_writes_css_oklch() {
        let out = export_tailwind_v4(&sample());
        assert!(out.contains("--color-red-100: oklch(0.628 0.258 29.23"), "{out}");
        assert!(out.contains("--color-red-900: oklch(1.000 0.000 "), "{out}");
    }
}
