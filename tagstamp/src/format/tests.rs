use super::*;
use libtagstamp::TagstampError;

#[test]
fn test_color_choice_resolution() {
    assert!(ColorChoice::Always.resolve(true, false));
    assert!(!ColorChoice::Never.resolve(false, true));
    assert!(ColorChoice::Auto.resolve(false, true));
    assert!(!ColorChoice::Auto.resolve(true, true));
    assert!(!ColorChoice::Auto.resolve(false, false));
}

#[test]
fn test_color_choice_default_is_auto() {
    assert_eq!(ColorChoice::default(), ColorChoice::Auto);
}

#[test]
fn test_plain_formatter_has_no_escapes() {
    let formatter = PlainFormatter;
    assert_eq!(formatter.error_line("boom"), "✗ boom");
    assert_eq!(formatter.warning_line("careful"), "⚠ careful");
}

#[test]
fn test_tty_formatter_colors_marker() {
    let formatter = TtyFormatter;
    let line = formatter.error_line("boom");
    assert!(line.contains('\u{1b}'));
    assert!(line.ends_with(" boom"));
}

#[test]
fn test_create_formatter_never_is_plain() {
    let formatter = create_formatter(ColorChoice::Never);
    assert_eq!(formatter.warning_line("x"), "⚠ x");
}

#[test]
fn test_error_chain_includes_sources() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err = TagstampError::config_with_source(
        "Failed to deserialize configuration",
        Some("/etc/tagstamp.yaml"),
        io,
    );

    assert_eq!(
        error_chain(&err),
        "Configuration error: Failed to deserialize configuration: no such file"
    );
}

#[test]
fn test_error_chain_without_source() {
    let err = TagstampError::not_found("endpoint", "https://gcr.io/v2/x/tags/list");
    assert_eq!(
        error_chain(&err),
        "endpoint not found: https://gcr.io/v2/x/tags/list"
    );
}
