use super::*;

#[test]
fn new_rejects_bad_shapes() {
    assert!(PixelBuffer::new(4, 4, 3).is_ok());
    assert!(PixelBuffer::new(4, 4, 4).is_ok());
    assert!(matches!(
        PixelBuffer::new(4, 4, 2),
        Err(GlitchError::Validation(_))
    ));
    assert!(PixelBuffer::new(0, 4, 3).is_err());
    assert!(PixelBuffer::from_raw(2, 2, 3, vec![0; 11]).is_err());
}

#[test]
fn filled_and_sample_addressing() {
    let mut buf = PixelBuffer::filled(3, 2, &[1, 2, 3]).unwrap();
    assert_eq!(buf.stride(), 9);
    assert_eq!(buf.pixel(2, 1), &[1, 2, 3]);
    buf.set_sample(2, 1, 1, 77);
    assert_eq!(buf.sample(2, 1, 1), 77);
    assert_eq!(buf.data()[9 + 6 + 1], 77);
}

#[test]
fn check_channel_reports_count() {
    let buf = PixelBuffer::new(2, 2, 4).unwrap();
    assert!(buf.check_channel(3).is_ok());
    match buf.check_channel(4) {
        Err(GlitchError::InvalidChannel { channel, channels }) => {
            assert_eq!((channel, channels), (4, 4));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn block_clamped_fits_buffer() {
    let b = BlockSpec::new(9, 1, 5, 0).clamped(10, 4);
    assert_eq!((b.x, b.y, b.width, b.height), (9, 1, 1, 1));

    let b = BlockSpec::new(50, 50, 50, 50).clamped(10, 4);
    assert!(b.x + b.width <= 10);
    assert!(b.y + b.height <= 4);
    assert!(b.width >= 1 && b.height >= 1);
}

#[test]
fn block_overlap_detection() {
    let a = BlockSpec::new(0, 0, 2, 2);
    assert!(a.overlaps(&BlockSpec::new(1, 1, 2, 2)));
    assert!(!a.overlaps(&BlockSpec::new(2, 0, 2, 2)));
}

#[test]
fn channel_sel_includes() {
    assert!(ChannelSel::All.includes(3));
    assert!(ChannelSel::Channel(0).includes(0));
    assert!(!ChannelSel::Channel(0).includes(1));
}

#[test]
fn fps_parses_ffmpeg_ratios() {
    assert_eq!(Fps::parse_ratio("30000/1001"), Some(Fps { num: 30000, den: 1001 }));
    assert_eq!(Fps::parse_ratio("24"), Some(Fps { num: 24, den: 1 }));
    assert_eq!(Fps::parse_ratio("0/0"), None);
    assert_eq!(Fps::parse_ratio("abc"), None);
    assert!((Fps::default().as_f64() - 25.0).abs() < 1e-12);
}
