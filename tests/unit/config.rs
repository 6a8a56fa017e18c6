use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg: ReplayConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, ReplayConfig::default());
    assert_eq!(cfg.map.width, 1280);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.output_dir(), PathBuf::from("."));
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg: ReplayConfig =
        serde_json::from_str(r#"{"branding":{"title":"Kyoto"},"map":{"height":480}}"#).unwrap();
    assert_eq!(cfg.branding.title, "Kyoto");
    assert_eq!(cfg.branding.watermark, BrandingConfig::default().watermark);
    assert_eq!((cfg.map.width, cfg.map.height), (1280, 480));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<ReplayConfig>(r#"{"mapp":{}}"#).is_err());
}

#[test]
fn validation_rejects_bad_dimensions() {
    for (w, h) in [(0, 720), (1281, 720), (70_000, 720)] {
        let cfg = ReplayConfig {
            map: MapConfig {
                width: w,
                height: h,
            },
            ..ReplayConfig::default()
        };
        assert!(cfg.validate().is_err(), "{w}x{h}");
    }
}

#[test]
fn from_path_reports_parse_errors() {
    let dir = std::env::temp_dir().join(format!("tripreel-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.json");
    std::fs::write(&good, r#"{"output_dir":"out"}"#).unwrap();
    assert_eq!(
        ReplayConfig::from_path(&good).unwrap().output_dir(),
        PathBuf::from("out")
    );

    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{").unwrap();
    let err = ReplayConfig::from_path(&bad).unwrap_err();
    assert!(err.to_string().starts_with("serialization error"));

    assert!(ReplayConfig::from_path(dir.join("missing.json")).is_err());
    std::fs::remove_dir_all(&dir).ok();
}
