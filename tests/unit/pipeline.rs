use super::*;
use crate::assets::builtin::BuiltinAssetPack;
use crate::blocks::{compile::compile, model::RawBlockDefinitions};
use crate::encode::gif::GifEncoder;
use crate::foundation::error::BlockturnError;
use crate::render::dispatch::{NullObserver, SerialDispatcher};

fn table() -> BlockDefinitionTable {
    compile(
        &BuiltinAssetPack::new(),
        &RawBlockDefinitions::builtin().unwrap(),
    )
    .unwrap()
}

fn opts(dir: &std::path::Path) -> TurntableOpts {
    TurntableOpts {
        frames: 4,
        scale: 12.0,
        out_path: dir.join("out.gif"),
        workdir_parent: Some(dir.to_path_buf()),
        ..TurntableOpts::default()
    }
}

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn defaults_match_reference_tool() {
    let o = TurntableOpts::default();
    assert_eq!(o.block, BlockKey::new(1, 0));
    assert_eq!(o.frames, 60);
    assert_eq!(o.scale, 500.0);
    assert_eq!(o.out_path, PathBuf::from("output.gif"));
    assert_eq!(o.animation, AnimationSettings::default());
}

#[test]
fn small_turntable_leaves_only_the_animation() {
    let dir = tempfile::tempdir().unwrap();
    let summary = render_turntable(
        &opts(dir.path()),
        &table(),
        &SerialDispatcher,
        &NullObserver,
        &GifEncoder::default(),
    )
    .unwrap();
    assert_eq!(summary.frame_count, 4);
    assert_eq!(entries(dir.path()), vec!["out.gif".to_string()]);
}

#[test]
fn unknown_block_fails_before_any_directory_exists() {
    let dir = tempfile::tempdir().unwrap();
    let o = TurntableOpts {
        block: BlockKey::new(999, 0),
        ..opts(dir.path())
    };
    let err = render_turntable(
        &o,
        &table(),
        &SerialDispatcher,
        &NullObserver,
        &GifEncoder::default(),
    )
    .unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn bad_scale_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for scale in [0.0, -3.0, f64::NAN] {
        let o = TurntableOpts {
            scale,
            ..opts(dir.path())
        };
        let err = render_turntable(
            &o,
            &table(),
            &SerialDispatcher,
            &NullObserver,
            &GifEncoder::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BlockturnError::Validation(_)), "{scale}: {err}");
    }
}
