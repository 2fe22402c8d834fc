use super::*;

fn checker(channels: usize) -> PixelBuffer {
    let mut buf = PixelBuffer::new(6, 4, channels).unwrap();
    for y in 0..4 {
        for x in 0..6 {
            for c in 0..channels {
                buf.set_sample(x, y, c, ((x * 40 + y * 20) as usize + c * 7) as u8);
            }
        }
    }
    buf
}

#[test]
fn png_keeps_samples_and_alpha() {
    let dir = tempfile::tempdir().unwrap();
    for channels in [3, 4] {
        let path = dir.path().join(format!("img{channels}.png"));
        let buf = checker(channels);
        encode_image(&buf, &path).unwrap();
        assert_eq!(decode_image(&path).unwrap(), buf);
    }
}

#[test]
fn jpeg_drops_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("img.jpg");
    encode_image(&checker(4), &path).unwrap();
    let back = decode_image(&path).unwrap();
    assert_eq!(back.channels(), 3);
    assert_eq!((back.width(), back.height()), (6, 4));
}

#[test]
fn unknown_extension_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("img.nope");
    assert!(matches!(
        encode_image(&checker(3), &path),
        Err(GlitchError::Validation(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(decode_image(&dir.path().join("absent.png")).is_err());
}
