use rand::Rng;

use crate::foundation::core::{BlockSpec, ChannelSel, PixelBuffer, Size};
use crate::foundation::error::{GlitchError, GlitchResult};

/// Two equally-sized blocks whose contents are exchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSwap {
    /// First block.
    pub a: BlockSpec,
    /// Second block (same size and channel selector as `a`).
    pub b: BlockSpec,
}

impl BlockSwap {
    /// Build a swap between `(ax, ay)` and `(bx, by)` of a shared `size` and `channel`.
    pub fn new(ax: u32, ay: u32, bx: u32, by: u32, size: Size, channel: ChannelSel) -> Self {
        Self {
            a: BlockSpec::new(ax, ay, size.width, size.height).with_channel(channel),
            b: BlockSpec::new(bx, by, size.width, size.height).with_channel(channel),
        }
    }

    /// Exchange the blocks reading from `src` and writing into `dst` (see [`swap_block`]).
    pub fn apply(&self, src: &PixelBuffer, dst: &mut PixelBuffer) -> GlitchResult<()> {
        swap_block(src, dst, &self.a, &self.b)
    }
}

/// Write `dst[a] <- src[b]` and `dst[b] <- src[a]`.
///
/// Both source rectangles are read in full before either destination is written, so
/// overlapping blocks are well defined. With [`ChannelSel::Channel`] only that channel's
/// samples move. Blocks are clamped to the buffer as a pair.
pub fn swap_block(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    a: &BlockSpec,
    b: &BlockSpec,
) -> GlitchResult<()> {
    if !src.same_shape(dst) {
        return Err(GlitchError::validation(
            "swap_block expects source and destination of identical shape",
        ));
    }
    let (a, b) = clamp_pair(src, a, b)?;
    let from_a = read_block(src, &a);
    let from_b = read_block(src, &b);
    write_block(dst, &a, &from_b);
    write_block(dst, &b, &from_a);
    Ok(())
}

/// Single-buffer [`swap_block`]. Applying it twice with disjoint blocks restores `buffer`.
pub fn swap_block_in_place(
    buffer: &mut PixelBuffer,
    a: &BlockSpec,
    b: &BlockSpec,
) -> GlitchResult<()> {
    let (a, b) = clamp_pair(buffer, a, b)?;
    let from_a = read_block(buffer, &a);
    let from_b = read_block(buffer, &b);
    write_block(buffer, &a, &from_b);
    write_block(buffer, &b, &from_a);
    Ok(())
}

/// Draw the swaps [`move_random_blocks`] performs on a buffer of `size` and `channels`.
///
/// Block extents are uniform in `[1, min(max_block, size)]`; both corners are uniform over
/// positions where the block fits. With `per_channel` each swap targets one random channel.
pub fn random_block_swaps<R: Rng + ?Sized>(
    size: Size,
    channels: usize,
    max_block: Size,
    num_blocks: usize,
    per_channel: bool,
    rng: &mut R,
) -> Vec<BlockSwap> {
    let max_w = max_block.width.clamp(1, size.width.max(1));
    let max_h = max_block.height.clamp(1, size.height.max(1));

    (0..num_blocks)
        .map(|_| {
            let bw = rng.gen_range(1..=max_w);
            let bh = rng.gen_range(1..=max_h);
            let ax = rng.gen_range(0..=size.width.saturating_sub(bw));
            let ay = rng.gen_range(0..=size.height.saturating_sub(bh));
            let bx = rng.gen_range(0..=size.width.saturating_sub(bw));
            let by = rng.gen_range(0..=size.height.saturating_sub(bh));
            let channel = if per_channel {
                ChannelSel::Channel(rng.gen_range(0..channels.max(1)))
            } else {
                ChannelSel::All
            };
            BlockSwap::new(ax, ay, bx, by, Size::new(bw, bh), channel)
        })
        .collect()
}

/// Perform `num_blocks` random block swaps and return the displaced copy.
///
/// Every swap reads from the untouched `buffer`, while later swaps may overwrite pixels an
/// earlier one already moved in the result.
pub fn move_random_blocks<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    max_block: Size,
    num_blocks: usize,
    per_channel: bool,
    rng: &mut R,
) -> GlitchResult<PixelBuffer> {
    let swaps = random_block_swaps(
        buffer.size(),
        buffer.channels(),
        max_block,
        num_blocks,
        per_channel,
        rng,
    );
    let mut out = buffer.clone();
    for swap in &swaps {
        swap.apply(buffer, &mut out)?;
    }
    Ok(out)
}

/// Mirror a random `size` block horizontally and vertically.
///
/// With `per_channel`, each channel flips independently with probability 1/2.
pub fn flip_block<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    size: Size,
    per_channel: bool,
    rng: &mut R,
) -> GlitchResult<()> {
    let bw = size.width.clamp(1, buffer.width());
    let bh = size.height.clamp(1, buffer.height());
    let x = rng.gen_range(0..=buffer.width() - bw);
    let y = rng.gen_range(0..=buffer.height() - bh);

    let block = BlockSpec::new(x, y, bw, bh);
    if per_channel {
        for c in 0..buffer.channels() {
            if rng.gen_bool(0.5) {
                flip_region(buffer, &block.with_channel(ChannelSel::Channel(c)));
            }
        }
    } else {
        flip_region(buffer, &block);
    }
    Ok(())
}

fn flip_region(buffer: &mut PixelBuffer, block: &BlockSpec) {
    let samples = read_block(buffer, block);
    let per_px = selected_count(buffer, block.channel);
    let mut flipped = Vec::with_capacity(samples.len());
    for row in samples.chunks_exact(block.width as usize * per_px).rev() {
        for px in row.chunks_exact(per_px).rev() {
            flipped.extend_from_slice(px);
        }
    }
    write_block(buffer, block, &flipped);
}

fn clamp_pair(
    buffer: &PixelBuffer,
    a: &BlockSpec,
    b: &BlockSpec,
) -> GlitchResult<(BlockSpec, BlockSpec)> {
    if a.size() != b.size() {
        return Err(GlitchError::validation(format!(
            "block sizes differ: {}x{} vs {}x{}",
            a.width, a.height, b.width, b.height
        )));
    }
    if a.channel != b.channel {
        return Err(GlitchError::validation(
            "swapped blocks must use the same channel selector",
        ));
    }
    if let ChannelSel::Channel(c) = a.channel {
        buffer.check_channel(c)?;
    }

    let a = a.clamped(buffer.width(), buffer.height());
    let b = b.clamped(buffer.width(), buffer.height());
    let width = a.width.min(b.width);
    let height = a.height.min(b.height);
    Ok((
        BlockSpec { width, height, ..a },
        BlockSpec { width, height, ..b },
    ))
}

fn selected_count(buffer: &PixelBuffer, channel: ChannelSel) -> usize {
    match channel {
        ChannelSel::All => buffer.channels(),
        ChannelSel::Channel(_) => 1,
    }
}

fn read_block(buffer: &PixelBuffer, block: &BlockSpec) -> Vec<u8> {
    let ch = buffer.channels();
    let data = buffer.data();
    let per_px = selected_count(buffer, block.channel);
    let mut out = Vec::with_capacity(block.width as usize * block.height as usize * per_px);
    for y in block.y..block.y + block.height {
        let row = buffer.index(block.x, y, 0);
        let row = &data[row..row + block.width as usize * ch];
        match block.channel {
            ChannelSel::All => out.extend_from_slice(row),
            ChannelSel::Channel(c) => out.extend(row.iter().skip(c).step_by(ch)),
        }
    }
    out
}

fn write_block(buffer: &mut PixelBuffer, block: &BlockSpec, samples: &[u8]) {
    let ch = buffer.channels();
    let span = block.width as usize * selected_count(buffer, block.channel);
    for (y, src) in (block.y..block.y + block.height).zip(samples.chunks_exact(span)) {
        let start = buffer.index(block.x, y, 0);
        let row = &mut buffer.data_mut()[start..start + block.width as usize * ch];
        match block.channel {
            ChannelSel::All => row.copy_from_slice(src),
            ChannelSel::Channel(c) => {
                for (dst, &v) in row.iter_mut().skip(c).step_by(ch).zip(src) {
                    *dst = v;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/block.rs"]
mod tests;
