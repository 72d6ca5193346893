use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RasterError::parse("x").to_string().contains("parse error:"));
    assert!(RasterError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn io_names_the_path() {
    let err = RasterError::io("data/cat.ndjson", std::io::Error::other("denied"));
    let msg = err.to_string();
    assert!(msg.contains("data/cat.ndjson"));
    assert!(msg.contains("denied"));
}

#[test]
fn only_parse_errors_are_skippable() {
    assert!(RasterError::parse("bad").is_skippable());
    assert!(!RasterError::validation("bad").is_skippable());
    assert!(!RasterError::io("x", std::io::Error::other("boom")).is_skippable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
