use super::*;

#[test]
fn defaults_match_reference_tool() {
    let s = AnimationSettings::default();
    assert_eq!(s.delay_cs, 5);
    assert_eq!(s.disposal, Disposal::Background);
    assert!(s.looping);
}

#[test]
fn disposal_maps_to_convert_names() {
    assert_eq!(Disposal::Keep.convert_arg(), "None");
    assert_eq!(Disposal::Background.convert_arg(), "Background");
    assert_eq!(Disposal::Previous.convert_arg(), "Previous");
}

#[test]
fn encoder_kind_parses_and_creates() {
    assert_eq!("gif".parse::<EncoderKind>().unwrap(), EncoderKind::Gif);
    assert_eq!("convert".parse::<EncoderKind>().unwrap(), EncoderKind::Convert);
    let err = "ffmpeg".parse::<EncoderKind>().unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
    assert_eq!(EncoderKind::default().create().name(), "gif");
    assert_eq!(EncoderKind::Convert.create().name(), "convert");
}

#[test]
fn settings_round_trip_through_json() {
    let json = r#"{ "delay_cs": 10, "disposal": "previous", "looping": false }"#;
    let s: AnimationSettings = serde_json::from_str(json).unwrap();
    assert_eq!(s.disposal, Disposal::Previous);
    assert!(!s.looping);
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("o.gif");
    ensure_parent_dir(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());
    ensure_parent_dir(Path::new("bare.gif")).unwrap();
}
