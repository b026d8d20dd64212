use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlockturnError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BlockturnError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        BlockturnError::invalid_extent("x")
            .to_string()
            .contains("invalid extent:")
    );
}

#[test]
fn frame_render_failure_lists_indices() {
    let err = BlockturnError::frame_render(vec![FrameIndex(3), FrameIndex(37)], "boom");
    let msg = err.to_string();
    assert!(msg.contains("frames 3, 37"), "{msg}");
    assert!(msg.contains("boom"));
}

#[test]
fn mux_failure_reports_workdir() {
    let err = BlockturnError::mux("/tmp/blockturn-abc", "convert exited with status 1");
    let msg = err.to_string();
    assert!(msg.contains("/tmp/blockturn-abc"), "{msg}");
    assert!(msg.contains("convert exited"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlockturnError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
