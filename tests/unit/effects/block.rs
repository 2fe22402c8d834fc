use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn numbered(w: u32, h: u32, channels: usize) -> PixelBuffer {
    let data = (0..(w as usize * h as usize * channels))
        .map(|i| (i % 251) as u8)
        .collect();
    PixelBuffer::from_raw(w, h, channels, data).unwrap()
}

#[test]
fn in_place_swap_is_an_involution_for_disjoint_blocks() {
    let src = numbered(8, 6, 3);
    let a = BlockSpec::new(0, 0, 3, 2);
    let b = BlockSpec::new(4, 3, 3, 2);
    assert!(!a.overlaps(&b));

    let mut buf = src.clone();
    swap_block_in_place(&mut buf, &a, &b).unwrap();
    assert_ne!(buf, src);
    assert_eq!(buf.pixel(4, 3), src.pixel(0, 0));
    assert_eq!(buf.pixel(0, 0), src.pixel(4, 3));

    swap_block_in_place(&mut buf, &a, &b).unwrap();
    assert_eq!(buf, src);
}

#[test]
fn two_buffer_swap_reads_source_before_writing() {
    let src = numbered(6, 1, 3);
    let mut dst = src.clone();
    let a = BlockSpec::new(0, 0, 3, 1);
    let b = BlockSpec::new(2, 0, 3, 1);
    swap_block(&src, &mut dst, &a, &b).unwrap();

    // Column 2 belongs to both blocks; the dst[b] <- src[a] write lands last.
    assert_eq!(dst.pixel(0, 0), src.pixel(2, 0));
    assert_eq!(dst.pixel(1, 0), src.pixel(3, 0));
    assert_eq!(dst.pixel(2, 0), src.pixel(0, 0));
    assert_eq!(dst.pixel(3, 0), src.pixel(1, 0));
    assert_eq!(dst.pixel(4, 0), src.pixel(2, 0));
    assert_eq!(dst.pixel(5, 0), src.pixel(5, 0));
}

#[test]
fn channel_selected_swap_leaves_other_channels() {
    let src = numbered(4, 4, 4);
    let mut dst = src.clone();
    let sel = ChannelSel::Channel(0);
    let a = BlockSpec::new(0, 0, 2, 2).with_channel(sel);
    let b = BlockSpec::new(2, 2, 2, 2).with_channel(sel);
    swap_block(&src, &mut dst, &a, &b).unwrap();

    assert_eq!(dst.sample(0, 0, 0), src.sample(2, 2, 0));
    assert_eq!(dst.sample(3, 3, 0), src.sample(1, 1, 0));
    for y in 0..4 {
        for x in 0..4 {
            for c in 1..4 {
                assert_eq!(dst.sample(x, y, c), src.sample(x, y, c));
            }
        }
    }
}

#[test]
fn channel_zero_differs_from_all_channels() {
    let src = numbered(4, 2, 3);
    let mut one = src.clone();
    let mut all = src.clone();
    let a = BlockSpec::new(0, 0, 2, 2);
    let b = BlockSpec::new(2, 0, 2, 2);
    swap_block_in_place(
        &mut one,
        &a.with_channel(ChannelSel::Channel(0)),
        &b.with_channel(ChannelSel::Channel(0)),
    )
    .unwrap();
    swap_block_in_place(&mut all, &a, &b).unwrap();
    assert_ne!(one, all);
    assert_eq!(one.sample(0, 0, 1), src.sample(0, 0, 1));
    assert_eq!(all.sample(0, 0, 1), src.sample(2, 0, 1));
}

#[test]
fn swap_validates_arguments() {
    let mut buf = numbered(4, 4, 3);
    let a = BlockSpec::new(0, 0, 2, 2);
    assert!(matches!(
        swap_block_in_place(&mut buf, &a, &BlockSpec::new(2, 2, 1, 2)),
        Err(GlitchError::Validation(_))
    ));
    let sel = ChannelSel::Channel(3);
    assert!(matches!(
        swap_block_in_place(&mut buf, &a.with_channel(sel), &a.with_channel(sel)),
        Err(GlitchError::InvalidChannel { .. })
    ));
    let other = numbered(4, 3, 3);
    assert!(swap_block(&other, &mut buf, &a, &a).is_err());
}

#[test]
fn oversized_blocks_are_clamped() {
    let src = numbered(4, 4, 3);
    let mut buf = src.clone();
    let a = BlockSpec::new(0, 0, 10, 10);
    let b = BlockSpec::new(3, 3, 10, 10);
    swap_block_in_place(&mut buf, &a, &b).unwrap();
    assert_eq!(buf.pixel(0, 0), src.pixel(3, 3));
    assert_eq!(buf.pixel(3, 3), src.pixel(0, 0));
    assert_eq!(buf.pixel(1, 1), src.pixel(1, 1));
}

#[test]
fn random_swaps_fit_inside_the_buffer() {
    let mut rng = StdRng::seed_from_u64(42);
    let size = Size::new(13, 7);
    let swaps = random_block_swaps(size, 3, Size::new(50, 4), 200, true, &mut rng);
    assert_eq!(swaps.len(), 200);
    for s in &swaps {
        for blk in [s.a, s.b] {
            assert!(blk.width >= 1 && blk.width <= 13);
            assert!(blk.height >= 1 && blk.height <= 4);
            assert!(blk.x + blk.width <= 13);
            assert!(blk.y + blk.height <= 7);
            assert!(matches!(blk.channel, ChannelSel::Channel(c) if c < 3));
        }
        assert_eq!(s.a.size(), s.b.size());
    }
}

#[test]
fn move_random_blocks_preserves_shape_and_is_seeded() {
    let src = numbered(16, 9, 4);
    let a = move_random_blocks(&src, Size::new(5, 5), 5, false, &mut StdRng::seed_from_u64(3))
        .unwrap();
    let b = move_random_blocks(&src, Size::new(5, 5), 5, false, &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert!(a.same_shape(&src));
    assert_eq!(a, b);
}

#[test]
fn zero_blocks_returns_copy() {
    let src = numbered(5, 5, 3);
    let out = move_random_blocks(&src, Size::new(2, 2), 0, true, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(out, src);
}

#[test]
fn full_buffer_flip_rotates_half_turn() {
    let src = numbered(3, 2, 3);
    let mut buf = src.clone();
    let mut rng = StdRng::seed_from_u64(9);
    flip_block(&mut buf, Size::new(3, 2), false, &mut rng).unwrap();
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(buf.pixel(x, y), src.pixel(2 - x, 1 - y));
        }
    }
    flip_block(&mut buf, Size::new(3, 2), false, &mut rng).unwrap();
    assert_eq!(buf, src);
}
