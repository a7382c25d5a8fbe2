//! Command-line front end: parse colours, adjust them as a palette, print them.
//!
//! Arguments are parsed by hand.

use colour_rs::color::{Conversion, Format};
use colour_rs::logging::ColourLogger;
use colour_rs::palette::{DEFAULT_HUE_STEP, DEFAULT_STEP, Palette};
use log::LevelFilter;

const HELP_TEXT: &str = r"colour - parse, adjust and print colours

USAGE:
    colour [OPTIONS] COLOUR...

COLOUR:
    #rgb, #rrggbb (hash optional), rgb(r, g, b), rgba(r, g, b, a),
    hsl(h, s%, l%), hsla(h, s%, l%, a)

OPTIONS:
    -f, --format FMT        Output format: hex, rgb, rgba, hsl, hsla [default: hex]
        --conversion MODEL  standard or legacy [default: standard]
        --lighten [N]       Raise lightness by N [default: 0.1]
        --darken [N]        Lower lightness by N [default: 0.1]
        --saturate [N]      Raise saturation by N [default: 0.1]
        --desaturate [N]    Lower saturation by N [default: 0.1]
        --hue [N]           Shift hue by N degrees [default: 10]
        --inverse           Replace every colour with its inverse
        --extremes          Append white and black
        --strict            Reject colours that match no grammar
        --log-level LEVEL   off, error, warn, info, debug, trace [default: off]
    -h, --help              Show this help

Adjustments run in the order given. A number right after an adjustment flag
is always read as its N, so put all-digit hex colours after `--`.

EXAMPLES:
    colour -f hsl '#ff0000'
    colour --lighten --hue 30 -f rgb ddd 666
";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Adjustment {
    Lighten(f64),
    Darken(f64),
    Saturate(f64),
    Desaturate(f64),
    Hue(f64),
    Inverse,
}

#[derive(Debug, Clone, PartialEq)]
struct Config {
    help: bool,
    format: Format,
    conversion: Conversion,
    adjustments: Vec<Adjustment>,
    extremes: bool,
    strict: bool,
    log_level: LevelFilter,
    colours: Vec<String>,
}

impl Config {
    fn with_defaults() -> Self {
        Self {
            help: false,
            format: Format::Hex,
            conversion: Conversion::Standard,
            adjustments: Vec::new(),
            extremes: false,
            strict: false,
            log_level: LevelFilter::Off,
            colours: Vec::new(),
        }
    }
}

fn main() {
    let cfg = match parse_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if cfg.help {
        print!("{HELP_TEXT}");
        return;
    }

    if cfg.log_level != LevelFilter::Off {
        let _ = ColourLogger::new().level(cfg.log_level).init();
    }

    match run(&cfg) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

fn run(cfg: &Config) -> Result<Vec<String>, String> {
    if cfg.strict {
        for colour in &cfg.colours {
            colour
                .parse::<colour_rs::Colour>()
                .map_err(|err| format!("{err}"))?;
        }
    }

    let mut palette = Palette::from_strings_with(&cfg.colours, cfg.conversion);
    if cfg.extremes {
        palette = palette.with_extremes();
    }

    for adjustment in &cfg.adjustments {
        log::debug!("applying {adjustment:?}");
        match *adjustment {
            Adjustment::Lighten(step) => palette.lighten(step),
            Adjustment::Darken(step) => palette.darken(step),
            Adjustment::Saturate(step) => palette.saturate(step),
            Adjustment::Desaturate(step) => palette.desaturate(step),
            Adjustment::Hue(degrees) => palette.shift_hue(degrees),
            Adjustment::Inverse => palette.invert(),
        };
    }

    Ok(palette.render(cfg.format))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Config, String> {
    let mut iter = args.into_iter().peekable();
    // Drop binary name if present.
    let _ = iter.next();

    let mut cfg = Config::with_defaults();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cfg.help = true,
            "-f" | "--format" => {
                let raw = next_value(&mut iter, "--format")?;
                cfg.format = parse_format(&raw)?;
            }
            "--conversion" => {
                let raw = next_value(&mut iter, "--conversion")?;
                cfg.conversion = Conversion::from_name(&raw).ok_or_else(|| {
                    format!("Invalid --conversion value `{raw}` (expected standard or legacy).")
                })?;
            }
            "--lighten" => {
                let step = optional_number(&mut iter, "--lighten", DEFAULT_STEP)?;
                cfg.adjustments.push(Adjustment::Lighten(step));
            }
            "--darken" => {
                let step = optional_number(&mut iter, "--darken", DEFAULT_STEP)?;
                cfg.adjustments.push(Adjustment::Darken(step));
            }
            "--saturate" => {
                let step = optional_number(&mut iter, "--saturate", DEFAULT_STEP)?;
                cfg.adjustments.push(Adjustment::Saturate(step));
            }
            "--desaturate" => {
                let step = optional_number(&mut iter, "--desaturate", DEFAULT_STEP)?;
                cfg.adjustments.push(Adjustment::Desaturate(step));
            }
            "--hue" => {
                let degrees = optional_number(&mut iter, "--hue", DEFAULT_HUE_STEP)?;
                cfg.adjustments.push(Adjustment::Hue(degrees));
            }
            "--inverse" => cfg.adjustments.push(Adjustment::Inverse),
            "--extremes" => cfg.extremes = true,
            "--strict" => cfg.strict = true,
            "--log-level" => {
                let raw = next_value(&mut iter, "--log-level")?;
                cfg.log_level = raw.parse::<LevelFilter>().map_err(|_| {
                    format!(
                        "Invalid --log-level value `{raw}` (expected off, error, warn, info, debug or trace)."
                    )
                })?;
            }
            "--" => cfg.colours.extend(iter.by_ref()),
            flag if flag.starts_with("--") => {
                return Err(format!(
                    "Unknown flag: {flag}\n\nRun with `--help` to see valid options."
                ));
            }
            _ => cfg.colours.push(arg),
        }
    }

    if !cfg.help && cfg.colours.is_empty() {
        return Err("No colours given.\n\nRun with `--help` for usage.".to_string());
    }

    Ok(cfg)
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next()
        .ok_or_else(|| format!("Missing value for `{flag}`."))
}

/// Consume the next argument if it is a number, else use `default`.
fn optional_number<I>(
    iter: &mut std::iter::Peekable<I>,
    flag: &str,
    default: f64,
) -> Result<f64, String>
where
    I: Iterator<Item = String>,
{
    let Some(raw) = iter.next_if(|next| looks_numeric(next)) else {
        return Ok(default);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid {flag} value `{raw}` (expected a number)."))?;
    if !value.is_finite() {
        return Err(format!("Invalid {flag} value `{raw}` (expected a finite number)."));
    }
    Ok(value)
}

fn looks_numeric(arg: &str) -> bool {
    let digits = arg.strip_prefix('-').unwrap_or(arg);
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
}

fn parse_format(raw: &str) -> Result<Format, String> {
    match raw.to_ascii_lowercase().as_str() {
        "hex" | "rgb" | "rgba" | "hsl" | "hsla" => Ok(Format::from_name(raw)),
        _ => Err(format!(
            "Invalid --format value `{raw}` (expected hex, rgb, rgba, hsl or hsla)."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, String> {
        parse_args(argv.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn help_flag_sets_help() {
        let cfg = parse(&["colour", "--help"]).expect("parse");
        assert!(cfg.help);
    }

    #[test]
    fn colours_are_required() {
        let err = parse(&["colour"]).expect_err("error");
        assert!(err.contains("No colours"));
    }

    #[test]
    fn format_parses_case_insensitively() {
        let cfg = parse(&["colour", "-f", "HSL", "fff"]).expect("parse");
        assert_eq!(cfg.format, Format::Hsl);
        assert_eq!(cfg.colours, ["fff"]);
    }

    #[test]
    fn format_rejects_unknown() {
        let err = parse(&["colour", "--format", "cmyk", "fff"]).expect_err("error");
        assert!(err.contains("Invalid --format"));
    }

    #[test]
    fn adjustments_keep_order_and_defaults() {
        let cfg = parse(&["colour", "--lighten", "--hue", "-30", "--inverse", "ddd"])
            .expect("parse");
        assert_eq!(
            cfg.adjustments,
            [
                Adjustment::Lighten(DEFAULT_STEP),
                Adjustment::Hue(-30.0),
                Adjustment::Inverse,
            ]
        );
        assert_eq!(cfg.colours, ["ddd"]);
    }

    #[test]
    fn numeric_colour_is_not_taken_as_step() {
        // `--darken 0.2 333` consumes the step but leaves the colour.
        let cfg = parse(&["colour", "--darken", "0.2", "333"]).expect("parse");
        assert_eq!(cfg.adjustments, [Adjustment::Darken(0.2)]);
        assert_eq!(cfg.colours, ["333"]);
    }

    #[test]
    fn conversion_parses() {
        let cfg = parse(&["colour", "--conversion", "legacy", "f00"]).expect("parse");
        assert_eq!(cfg.conversion, Conversion::Legacy);
        let err = parse(&["colour", "--conversion", "hsv", "f00"]).expect_err("error");
        assert!(err.contains("Invalid --conversion"));
    }

    #[test]
    fn log_level_parses() {
        let cfg = parse(&["colour", "--log-level", "debug", "f00"]).expect("parse");
        assert_eq!(cfg.log_level, LevelFilter::Debug);
        assert!(parse(&["colour", "--log-level", "loud", "f00"]).is_err());
    }

    #[test]
    fn unknown_flag_rejected() {
        let err = parse(&["colour", "--wat", "f00"]).expect_err("error");
        assert!(err.contains("Unknown flag"));
    }

    #[test]
    fn double_dash_takes_rest_as_colours() {
        let cfg = parse(&["colour", "--", "--lighten"]).expect("parse");
        assert!(cfg.adjustments.is_empty());
        assert_eq!(cfg.colours, ["--lighten"]);
    }

    #[test]
    fn run_renders_palette() {
        let cfg = parse(&["colour", "-f", "rgb", "--inverse", "#000", "rgb(0, 128, 255)"])
            .expect("parse");
        assert_eq!(
            run(&cfg).expect("run"),
            ["rgb(255, 255, 255)", "rgb(255, 127, 0)"]
        );
    }

    #[test]
    fn run_with_extremes() {
        let cfg = parse(&["colour", "--extremes", "abc"]).expect("parse");
        assert_eq!(run(&cfg).expect("run"), ["aabbcc", "ffffff", "000000"]);
    }

    #[test]
    fn strict_mode_reports_bad_colour() {
        let cfg = parse(&["colour", "--strict", "fff", "teal"]).expect("parse");
        let err = run(&cfg).expect_err("error");
        assert_eq!(err, "Unrecognized colour format: teal");
    }

    #[test]
    fn lenient_mode_defaults_bad_colour() {
        let cfg = parse(&["colour", "teal"]).expect("parse");
        assert_eq!(run(&cfg).expect("run"), ["000000"]);
    }
}
