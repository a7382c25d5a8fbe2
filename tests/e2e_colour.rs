//! End-to-end behaviour of the public colour API.
//!
//! Run with: RUST_LOG=debug cargo test --test e2e_colour -- --nocapture

mod common;

use colour_rs::color::{Conversion, UNDEFINED_HUE, hsla_to_rgba, rgba_to_hsla};
use colour_rs::prelude::*;
use common::assertions::{
    assert_approx_eq_logged, assert_eq_logged, assert_err_logged, assert_ok_logged,
    assert_true_logged,
};
use common::{init_test_logging, log_test_context, test_phase};

#[test]
fn e2e_documented_examples() {
    init_test_logging();
    log_test_context("e2e_documented_examples", "Canonical conversions");

    assert_eq_logged(
        "red as hsl",
        Colour::new("#ff0000").stringify(Format::Hsl),
        "hsl(0, 100%, 50%)".to_string(),
    );
    assert_eq_logged("green hue", Colour::new("rgb(0,255,0)").h(), 120.0);
    assert_eq_logged(
        "blue from hsl",
        Colour::new("hsl(240,100%,50%)").stringify(Format::Rgb),
        "rgb(0, 0, 255)".to_string(),
    );
}

#[test]
fn e2e_malformed_inputs_default() {
    init_test_logging();
    log_test_context("e2e_malformed_inputs_default", "Lenient construction");

    let unknown = Colour::new("not-a-color");
    assert_eq_logged("unknown rgba", unknown.rgba(), Rgba::new(0.0, 0.0, 0.0, 1.0));
    assert_eq_logged("unknown hue", unknown.h(), UNDEFINED_HUE);

    let bad_hex = Colour::new("#zz0000");
    assert_eq_logged("bad hex red", bad_hex.r(), 0.0);

    for input in ["", "   ", "#", "rgb()", "hsl(10, 10, 10)", "rgba(1,2,3)", "\u{1F3A8}", "h\u{17f}l(240, 100%, 50%)"] {
        assert_eq_logged(
            input,
            Colour::new(input).stringify(Format::Rgba),
            "rgba(0, 0, 0, 1)".to_string(),
        );
    }
}

#[test]
fn e2e_strict_parse_reports_diagnostics() {
    init_test_logging();
    log_test_context("e2e_strict_parse_reports_diagnostics", "Strict parsing");

    let err = assert_err_logged("named colour", "red".parse::<Colour>());
    assert_eq_logged(
        "error text",
        err.to_string(),
        "Unrecognized colour format: red".to_string(),
    );
    assert_eq_logged(
        "empty",
        assert_err_logged("empty", Colour::try_parse("")),
        ColourParseError::Empty,
    );

    let ok = assert_ok_logged("hsla", Colour::try_parse(" hsla(200, 40%, 60%, 0.3) "));
    assert_eq_logged("hsla alpha", ok.a(), 0.3);
}

#[test]
fn e2e_setting_rgb_channel_resyncs_hsl() {
    init_test_logging();
    log_test_context("e2e_setting_rgb_channel_resyncs_hsl", "Channel independence");

    let mut colour = Colour::new("rgb(40, 80, 120)");
    {
        let _execute = test_phase("execute");
        colour.set_g(200);
    }

    let _verify = test_phase("verify");
    assert_eq_logged("r untouched", colour.r(), 40.0);
    assert_eq_logged("g set", colour.g(), 200.0);
    assert_eq_logged("b untouched", colour.b(), 120.0);
    assert_eq_logged(
        "hsla derived",
        colour.hsla(),
        rgba_to_hsla(colour.rgba(), Conversion::Standard),
    );
}

#[test]
fn e2e_setting_hsl_channel_resyncs_rgb() {
    init_test_logging();

    let mut colour = Colour::new("#3366cc");
    colour.set_h(30).set_s("0.5").set_l(0.4);

    assert_eq_logged("h", colour.h(), 30.0);
    assert_eq_logged("s", colour.s(), 0.5);
    assert_eq_logged("l", colour.l(), 0.4);
    assert_eq_logged(
        "rgba derived",
        colour.rgba(),
        hsla_to_rgba(colour.hsla(), Conversion::Standard),
    );
    assert_eq_logged(
        "rendered",
        colour.stringify(Format::Rgb),
        "rgb(153, 102, 51)".to_string(),
    );
}

#[test]
fn e2e_alpha_is_shared() {
    init_test_logging();

    let mut colour = Colour::new("hsla(10, 50%, 50%, 0.2)");
    assert_eq_logged("rgba alpha", colour.rgba().a, 0.2);

    colour.set_a(".8");
    assert_eq_logged("hsla alpha", colour.hsla().a, 0.8);
    assert_true_logged(
        "hsla string carries alpha",
        colour.stringify(Format::Hsla).ends_with(", 0.8)"),
    );
}

#[test]
fn e2e_inverse_does_not_mutate() {
    init_test_logging();

    let colour = Colour::new("rgba(12, 34, 56, 0.7)");
    let before = colour.clone();
    let inverse = colour.inverse();

    assert_eq_logged("receiver", colour, before.clone());
    assert_eq_logged(
        "inverse",
        inverse.stringify(Format::Rgba),
        "rgba(243, 221, 199, 0.7)".to_string(),
    );
    assert_eq_logged("double inverse", inverse.inverse().rgba(), before.rgba());
}

#[test]
fn e2e_legacy_model_reproduces_old_output() {
    init_test_logging();
    log_test_context("e2e_legacy_model_reproduces_old_output", "x256 scaling");

    let red = Colour::with_conversion("#ff0000", Conversion::Legacy);
    assert_eq_logged(
        "red hsl",
        red.stringify(Format::Hsl),
        "hsl(0, 100%, 100%)".to_string(),
    );

    let blue = Colour::with_conversion("hsl(240,100%,50%)", Conversion::Legacy);
    assert_eq_logged(
        "blue rgb",
        blue.stringify(Format::Rgb),
        "rgb(0, 0, 128)".to_string(),
    );

    let mut shifted = red.clone();
    shifted.set_h(120);
    assert_eq_logged("raw green channel", shifted.g(), 256.0);
    assert_eq_logged("clamped hex", shifted.stringify(Format::Hex), "00ff00".to_string());
}

#[test]
fn e2e_standard_hsl_round_trip() {
    init_test_logging();

    for (h, s, l) in [(15.0, 0.8, 0.4), (100.0, 0.35, 0.55), (275.0, 0.6, 0.3)] {
        let source = Hsla::new(h, s, l, 1.0);
        let back = rgba_to_hsla(hsla_to_rgba(source, Conversion::Standard), Conversion::Standard);
        let context = format!("hsl({h}, {s}, {l})");
        assert_approx_eq_logged(&format!("{context} hue"), back.h, h, 2.0);
        assert_approx_eq_logged(&format!("{context} saturation"), back.s, s, 0.02);
        assert_approx_eq_logged(&format!("{context} lightness"), back.l, l, 0.01);
    }
}

#[test]
fn e2e_palette_workflow() {
    init_test_logging();
    log_test_context("e2e_palette_workflow", "Bulk adjustments then reset");

    let mut palette = Palette::from_strings(["ddd", "fff", "666", "eee"]).with_extremes();
    assert_eq_logged("size with extremes", palette.len(), 6);

    palette.darken(0.2);
    assert_eq_logged(
        "darkened",
        palette.render(Format::Hex),
        ["aaaaaa", "cccccc", "333333", "bbbbbb", "cccccc", "000000"]
            .map(String::from)
            .to_vec(),
    );

    let contrast: Vec<String> = palette
        .inverses()
        .iter()
        .map(|c| c.stringify(Format::Rgb))
        .collect();
    assert_eq_logged("contrast of black", contrast[5].clone(), "rgb(255, 255, 255)".to_string());

    palette.reset();
    assert_eq_logged(
        "reset",
        palette.render(Format::Hex),
        ["dddddd", "ffffff", "666666", "eeeeee"]
            .map(String::from)
            .to_vec(),
    );
}
