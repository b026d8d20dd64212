use super::*;
use crate::encode::Disposal;

#[test]
fn args_follow_imagemagick_order() {
    let frames = vec![PathBuf::from("/w/frame_000.png"), PathBuf::from("/w/frame_001.png")];
    let args = ConvertEncoder::args(&frames, &AnimationSettings::default(), Path::new("out.gif"));
    assert_eq!(
        args,
        vec![
            "-delay",
            "5",
            "-dispose",
            "Background",
            "-loop",
            "0",
            "/w/frame_000.png",
            "/w/frame_001.png",
            "out.gif"
        ]
    );

    let once = AnimationSettings {
        delay_cs: 9,
        disposal: Disposal::Previous,
        looping: false,
    };
    let args = ConvertEncoder::args(&frames[..1], &once, Path::new("o.gif"));
    assert_eq!(
        args,
        vec!["-delay", "9", "-dispose", "Previous", "/w/frame_000.png", "o.gif"]
    );
}

#[test]
fn missing_program_is_reported() {
    let enc = ConvertEncoder {
        program: PathBuf::from("/definitely/not/convert"),
    };
    assert!(!enc.is_available());
    let dir = tempfile::tempdir().unwrap();
    let err = enc
        .encode(
            &[dir.path().join("a.png")],
            &AnimationSettings::default(),
            &dir.path().join("o.gif"),
        )
        .unwrap_err();
    assert!(err.to_string().contains("not found on PATH"), "{err}");
}

#[test]
fn empty_frame_list_is_rejected() {
    let err = ConvertEncoder::default()
        .encode(&[], &AnimationSettings::default(), Path::new("o.gif"))
        .unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
}

#[cfg(unix)]
fn fake_program(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;
    let path = dir.join("fake-convert");
    std::fs::write(
        &path,
        format!("#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then exit 0; fi\n{body}\n"),
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn successful_run_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let program = fake_program(dir.path(), "for last; do :; done\necho gif > \"$last\"");
    let out = dir.path().join("o.gif");
    ConvertEncoder { program }
        .encode(&[dir.path().join("a.png")], &AnimationSettings::default(), &out)
        .unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap().trim(), "gif");
}

#[cfg(unix)]
#[test]
fn failing_run_surfaces_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let program = fake_program(dir.path(), "echo 'unable to open image' >&2\nexit 3");
    let err = ConvertEncoder { program }
        .encode(
            &[dir.path().join("a.png")],
            &AnimationSettings::default(),
            &dir.path().join("o.gif"),
        )
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unable to open image"), "{msg}");
    assert!(msg.contains("exited with status"), "{msg}");
}
