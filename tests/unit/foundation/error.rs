use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TripReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TripReelError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        TripReelError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TripReelError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        TripReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TripReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
