#![deny(unsafe_code)]
//! CLI binary for the tonegrid palette tool.
//!
//! Subcommands:
//! - `color <text>`: parse a CSS color into the active model and describe it
//! - `contrast <background> <foreground>`: WCAG, APCA and Delta E
//! - `export <palette.json> --format <f>`: write CSS, tokens, Tailwind or a link
//! - `import <file>`: read design tokens or CSS variables into a hex palette
//! - `decode <link>`: recover the hex palette from a permalink
//! - `edit <palette.json> <op>`: apply one grid edit and print the result

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tonegrid_codec::{
    export_hex_palette, import_css, import_tokens, parse_hex_palette, Format, HexPalette,
    OldLchPalette,
};
use tonegrid_core::{
    apca_contrast, delta_e_contrast, wcag_contrast, ColorValue, ContrastMetric, Easing, InkMode,
    Lch, LchModel, PaletteError, PaletteMatrix,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tonegrid", about = "Perceptual color palette tool")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Perceptual model palettes are edited in (oklch, cielch).
    #[arg(long, global = true, default_value_t = LchModel::Cielch)]
    mode: LchModel,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse any CSS color and show it in the active model.
    Color {
        /// Hex, named, rgb(), hsl(), oklch() or lch() color.
        text: String,
    },
    /// Compare a foreground color against a background.
    Contrast {
        background: String,
        foreground: String,

        /// Print only this metric, floored to one decimal (wcag, apca, delta-e).
        #[arg(long)]
        metric: Option<ContrastMetric>,
    },
    /// Export a hex-palette file to another format.
    Export {
        palette: PathBuf,

        /// hex, tokens, css, tailwind-v3-vars, tailwind-v3-config, tailwind-v4, link.
        #[arg(short, long, default_value_t = Format::Hex)]
        format: Format,

        /// Page URL the permalink is built on (link format only).
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Import design tokens or CSS variables and print a hex palette.
    Import {
        file: PathBuf,

        /// Source format; inferred from the extension when omitted.
        #[arg(long, value_enum)]
        from: Option<ImportFormat>,
    },
    /// Decode a permalink (or its bare `palette` value) into a hex palette.
    Decode { link: String },
    /// Apply one edit to a hex-palette file.
    Edit {
        palette: PathBuf,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(subcommand)]
        op: EditOp,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ImportFormat {
    Tokens,
    Css,
}

#[derive(Subcommand, Debug, PartialEq)]
enum EditOp {
    /// Append a row copying the last one.
    AddHue,
    /// Append a row with the hue of a color and the last row's lightness and chroma.
    AddHueFrom { color: String },
    /// Append a column copying the last one.
    AddTone,
    RemoveHue { index: usize },
    RemoveTone { index: usize },
    RenameHue { index: usize, name: String },
    RenameTone { index: usize, name: String },
    /// Set one cell from lightness, chroma and hue in the active model.
    Set {
        hue: usize,
        tone: usize,
        l: f64,
        c: f64,
        h: f64,
    },
    /// Spread a row's lightness between its first and last cell.
    Resample {
        hue: usize,

        /// linear, ease-in, ease-out, ease-in-out or cubic-bezier(x1, y1, x2, y2).
        #[arg(long, default_value_t = Easing::Linear)]
        easing: Easing,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Reads a hex-palette file, falling back to the legacy CIELCH-triple shape.
///
/// Files may hold a palette with no hues, as `edit` writes after removing the
/// last one; only link and clipboard input must be non-empty.
fn load_palette(path: &Path, mode: LchModel) -> Result<PaletteMatrix, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    let hex = match serde_json::from_str::<HexPalette>(&text) {
        Ok(hex) => hex,
        Err(err) => match serde_json::from_str::<OldLchPalette>(&text) {
            Ok(old) => {
                info!(path = %path.display(), "converting legacy LCH palette");
                old.to_hex_palette()
            }
            Err(_) => {
                return Err(PaletteError::Parse(format!("{}: {err}", path.display())).into())
            }
        },
    };
    Ok(parse_hex_palette(&hex, mode)?)
}

fn print_palette(matrix: &PaletteMatrix, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", export_hex_palette(matrix).to_json_pretty()?)?;
    Ok(())
}

fn describe(color: &ColorValue) -> String {
    let ranges = color.mode().ranges();
    let [r, g, b] = color.bytes();
    let yes_no = |v: bool| if v { "yes" } else { "no" };
    format!(
        "{hex}\n{mode}  l {l:.lp$}  c {c:.cp$}  h {h:.hp$}\nrgb  {r} {g} {b}\ngamut  sRGB {s}  P3 {p}  Rec.2020 {rec}",
        hex = color.hex(),
        mode = color.mode(),
        l = color.l(),
        c = color.c(),
        h = color.h(),
        lp = ranges.l.precision as usize,
        cp = ranges.c.precision as usize,
        hp = ranges.h.precision as usize,
        s = yes_no(color.within_srgb()),
        p = yes_no(color.within_p3()),
        rec = yes_no(color.within_rec2020()),
    )
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mode = cli.mode;
    match cli.command {
        Command::Color { text } => {
            let color = ColorValue::parse(mode, &text)?;
            let ink = InkMode::Max.ink_for(color.hex())?;
            if cli.json {
                let info = serde_json::json!({ "color": color, "ink": ink });
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            } else {
                writeln!(out, "{}\nink  {ink}", describe(&color))?;
            }
        }
        Command::Contrast {
            background,
            foreground,
            metric: Some(metric),
        } => {
            let value = metric.overlay_label(&background, &foreground)?;
            if cli.json {
                let info = serde_json::json!({ "metric": metric, "value": value });
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            } else {
                writeln!(out, "{value}")?;
            }
        }
        Command::Contrast {
            background,
            foreground,
            metric: None,
        } => {
            let wcag = wcag_contrast(&background, &foreground)?;
            let apca = apca_contrast(&background, &foreground)?;
            let apca_reverse = apca_contrast(&foreground, &background)?;
            let delta_e = delta_e_contrast(&background, &foreground)?;
            let ink = InkMode::Max.ink_for(&background)?;
            if cli.json {
                let info = serde_json::json!({
                    "background": background,
                    "foreground": foreground,
                    "wcag": wcag,
                    "apca": apca,
                    "apca_reverse": apca_reverse,
                    "delta_e": delta_e,
                    "ink": ink,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            } else {
                writeln!(out, "WCAG      {wcag:.2}:1")?;
                writeln!(out, "APCA      Lc {apca:.1} (reversed {apca_reverse:.1})")?;
                writeln!(out, "Delta E   {delta_e:.2}")?;
                writeln!(out, "ink       {ink}")?;
            }
        }
        Command::Export {
            palette,
            format,
            base_url,
        } => {
            let matrix = load_palette(&palette, mode)?;
            let base = match (format, base_url) {
                (Format::Link, None) => {
                    return Err(CliError::Input("--base-url is required for link export".into()))
                }
                (_, url) => url.unwrap_or_default(),
            };
            let text = format.export(&matrix, &base)?;
            debug!(%format, bytes = text.len(), "exported palette");
            if cli.json {
                let info = serde_json::json!({ "format": format.name(), "content": text });
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            } else {
                writeln!(out, "{text}")?;
            }
        }
        Command::Import { file, from } => {
            let from = match from {
                Some(f) => f,
                None => infer_import_format(&file),
            };
            let text = std::fs::read_to_string(&file)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", file.display())))?;
            let matrix = match from {
                ImportFormat::Tokens => import_tokens(&text)?,
                ImportFormat::Css => import_css(&text)?,
            };
            info!(
                hues = matrix.hues().len(),
                tones = matrix.tones().len(),
                "imported palette"
            );
            print_palette(&matrix.with_mode(mode), out)?;
        }
        Command::Decode { link } => {
            let hex = tonegrid_codec::permalink::palette_from_link(&link)?;
            print_palette(&parse_hex_palette(&hex, mode)?, out)?;
        }
        Command::Edit {
            palette,
            output,
            op,
        } => {
            let matrix = load_palette(&palette, mode)?;
            let edited = apply_edit(&matrix, op)?;
            match output {
                Some(path) => {
                    let json = export_hex_palette(&edited).to_json_pretty()?;
                    std::fs::write(&path, json + "\n")
                        .map_err(|e| CliError::Io(format!("cannot write {}: {e}", path.display())))?;
                    info!(path = %path.display(), "wrote palette");
                }
                None => print_palette(&edited, out)?,
            }
        }
    }

    Ok(())
}

fn infer_import_format(path: &Path) -> ImportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Tokens,
        _ => ImportFormat::Css,
    }
}

fn apply_edit(matrix: &PaletteMatrix, op: EditOp) -> Result<PaletteMatrix, CliError> {
    debug!(?op, "applying edit");
    let edited = match op {
        EditOp::AddHue => matrix.add_hue(),
        EditOp::AddHueFrom { color } => matrix.add_hue_from_color(&color)?,
        EditOp::AddTone => matrix.add_tone(),
        EditOp::RemoveHue { index } => matrix.remove_hue(index)?,
        EditOp::RemoveTone { index } => matrix.remove_tone(index)?,
        EditOp::RenameHue { index, name } => matrix.rename_hue(index, name)?,
        EditOp::RenameTone { index, name } => matrix.rename_tone(index, name)?,
        EditOp::Set { hue, tone, l, c, h } => matrix.set_color(Lch::new(l, c, h), hue, tone)?,
        EditOp::Resample { hue, easing } => matrix.resample_lightness(hue, easing)?,
    };
    Ok(edited)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    let mut stdout = io::stdout().lock();
    if let Err(e) = run(cli, &mut stdout) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
