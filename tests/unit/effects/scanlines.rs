use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::GlitchError;

#[test]
fn zero_intensity_only_applies_global_dip() {
    let mut buf = PixelBuffer::filled(8, 30, &[200, 200, 200, 90]).unwrap();
    let params = ScanlineParams {
        intensity: 0.0,
        ..ScanlineParams::default()
    };
    scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(5)).unwrap();

    let first = buf.sample(0, 0, 0);
    assert!((160..=200).contains(&first));
    for px in buf.data().chunks_exact(4) {
        assert_eq!(&px[..3], &[first, first, first]);
        assert_eq!(px[3], 90);
    }
}

#[test]
fn bands_are_darker_than_gaps() {
    let mut buf = PixelBuffer::filled(4, 40, &[200, 200, 200]).unwrap();
    let params = ScanlineParams {
        intensity: 1.0,
        band_size: 3,
        band_spacing: 15,
        noisy: false,
    };
    scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(11)).unwrap();
    // Band 1 starts at row 15 or 16, so row 17 is always covered and row 10 never is.
    assert!(buf.sample(0, 17, 0) < buf.sample(0, 10, 0));
    assert_eq!(buf.sample(0, 10, 0), buf.sample(3, 25, 2));
}

#[test]
fn bands_past_the_bottom_are_skipped() {
    let mut buf = PixelBuffer::filled(3, 5, &[120, 60, 30]).unwrap();
    let params = ScanlineParams {
        intensity: 1.0,
        band_size: 10,
        band_spacing: 1,
        noisy: true,
    };
    scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(2)).unwrap();
    let first = buf.pixel(0, 0).to_vec();
    for y in 0..5 {
        for x in 0..3 {
            assert_eq!(buf.pixel(x, y), first.as_slice());
        }
    }
}

#[test]
fn noisy_variant_keeps_shape() {
    let mut buf = PixelBuffer::filled(6, 20, &[3, 5, 7]).unwrap();
    let params = ScanlineParams {
        noisy: true,
        band_size: 0,
        band_spacing: 0,
        ..ScanlineParams::default()
    };
    scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!((buf.width(), buf.height(), buf.channels()), (6, 20, 3));
}

#[test]
fn out_of_range_intensity_is_rejected() {
    let mut buf = PixelBuffer::filled(2, 2, &[1, 2, 3]).unwrap();
    let params = ScanlineParams {
        intensity: 1.5,
        ..ScanlineParams::default()
    };
    assert!(matches!(
        scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(0)),
        Err(GlitchError::Range { .. })
    ));
}

#[test]
fn huge_band_size_only_dims() {
    let mut buf = PixelBuffer::filled(4, 30, &[150, 150, 150]).unwrap();
    let params = ScanlineParams {
        intensity: 1.0,
        band_size: u32::MAX,
        band_spacing: 3,
        noisy: false,
    };
    scanlines(&mut buf, &params, &mut StdRng::seed_from_u64(6)).unwrap();
    let first = buf.sample(0, 0, 0);
    assert!(buf.data().iter().all(|&v| v == first));
}
