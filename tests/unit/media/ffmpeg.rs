use super::*;
use crate::foundation::core::Fps;

#[test]
fn begin_rejects_empty_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("out.mp4")));
    for (width, height) in [(0, 4), (4, 0)] {
        let err = sink
            .begin(SinkConfig {
                width,
                height,
                fps: Fps::default(),
            })
            .unwrap_err();
        assert!(matches!(err, GlitchError::Validation(_)), "{err}");
    }
}

#[test]
fn push_before_begin_is_a_stream_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = PixelBuffer::new(2, 2, 3).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(GlitchError::Stream(_))
    ));
    assert!(sink.end().is_err());
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("taken.mp4");
    std::fs::write(&out, b"x").unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: out.clone(),
        overwrite: false,
    });
    let cfg = SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::default(),
    };
    assert!(matches!(sink.begin(cfg), Err(GlitchError::Validation(_))));
    assert_eq!(std::fs::read(&out).unwrap(), b"x");
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("out.png");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a").join("b").is_dir());
    ensure_parent_dir(Path::new("bare.png")).unwrap();
}
