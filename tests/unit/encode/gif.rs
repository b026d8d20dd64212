use super::*;

fn write_frames(dir: &Path, n: usize, size: (u32, u32)) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let path = dir.join(format!("frame_{i:03}.png"));
            let shade = (i * 40) as u8;
            image::RgbaImage::from_pixel(size.0, size.1, image::Rgba([shade, 0, 255 - shade, 255]))
                .save(&path)
                .unwrap();
            path
        })
        .collect()
}

fn decode(path: &Path) -> Vec<(u16, ::gif::DisposalMethod)> {
    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::RGBA);
    let mut dec = opts.read_info(std::fs::File::open(path).unwrap()).unwrap();
    let mut out = Vec::new();
    while let Some(frame) = dec.read_next_frame().unwrap() {
        out.push((frame.delay, frame.dispose));
    }
    out
}

fn has_loop_extension(path: &Path) -> bool {
    let bytes = std::fs::read(path).unwrap();
    bytes.windows(11).any(|w| w == b"NETSCAPE2.0")
}

#[test]
fn writes_every_frame_with_delay_and_disposal() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(dir.path(), 4, (6, 5));
    let out = dir.path().join("nested").join("out.gif");

    GifEncoder::default()
        .encode(&frames, &AnimationSettings::default(), &out)
        .unwrap();

    let decoded = decode(&out);
    assert_eq!(decoded.len(), 4);
    assert!(
        decoded
            .iter()
            .all(|(d, dispose)| *d == 5 && *dispose == ::gif::DisposalMethod::Background)
    );
    assert!(has_loop_extension(&out));
}

#[test]
fn non_looping_omits_netscape_extension() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(dir.path(), 2, (3, 3));
    let out = dir.path().join("once.gif");
    let settings = AnimationSettings {
        delay_cs: 12,
        disposal: Disposal::Keep,
        looping: false,
    };

    GifEncoder::default()
        .encode(&frames, &settings, &out)
        .unwrap();

    assert!(!has_loop_extension(&out));
    let decoded = decode(&out);
    assert_eq!(decoded, vec![(12, ::gif::DisposalMethod::Keep); 2]);
}

#[test]
fn mismatched_frame_sizes_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut frames = write_frames(dir.path(), 1, (4, 4));
    let odd = dir.path().join("odd.png");
    image::RgbaImage::new(5, 4).save(&odd).unwrap();
    frames.push(odd);

    let err = GifEncoder::default()
        .encode(&frames, &AnimationSettings::default(), &dir.path().join("o.gif"))
        .unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
}

#[test]
fn missing_frame_and_empty_list_fail() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("o.gif");
    let enc = GifEncoder::default();

    let err = enc
        .encode(&[], &AnimationSettings::default(), &out)
        .unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");

    let err = enc
        .encode(
            &[dir.path().join("nope.png")],
            &AnimationSettings::default(),
            &out,
        )
        .unwrap_err();
    assert!(err.to_string().contains("read frame"), "{err}");
}

#[test]
fn out_of_range_speed_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(dir.path(), 1, (2, 2));
    let err = GifEncoder { speed: 0 }
        .encode(&frames, &AnimationSettings::default(), &dir.path().join("o.gif"))
        .unwrap_err();
    assert!(matches!(err, BlockturnError::Validation(_)), "{err}");
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn failed_encode_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut frames = write_frames(dir.path(), 3, (4, 4));
    let out = dir.path().join("out.gif");
    GifEncoder::default()
        .encode(&frames, &AnimationSettings::default(), &out)
        .unwrap();
    let before = std::fs::read(&out).unwrap();
    let names_before = dir_names(dir.path());

    std::fs::write(&frames[2], b"not a png").unwrap();
    assert!(
        GifEncoder::default()
            .encode(&frames, &AnimationSettings::default(), &out)
            .is_err()
    );
    assert_eq!(std::fs::read(&out).unwrap(), before);
    assert_eq!(decode(&out).len(), 3);

    let odd = dir.path().join("odd.png");
    image::RgbaImage::new(5, 4).save(&odd).unwrap();
    frames[2] = odd;
    assert!(
        GifEncoder::default()
            .encode(&frames, &AnimationSettings::default(), &out)
            .is_err()
    );
    assert_eq!(std::fs::read(&out).unwrap(), before);

    let mut expected = names_before;
    expected.push("odd.png".to_string());
    expected.sort();
    assert_eq!(dir_names(dir.path()), expected);
}

#[test]
fn failed_encode_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut frames = write_frames(dir.path(), 2, (4, 4));
    frames.push(dir.path().join("missing.png"));
    let out = dir.path().join("fresh.gif");

    GifEncoder::default()
        .encode(&frames, &AnimationSettings::default(), &out)
        .unwrap_err();

    assert!(!out.exists());
    assert_eq!(
        dir_names(dir.path()),
        vec!["frame_000.png".to_string(), "frame_001.png".to_string()]
    );
}
