//! # Texture — Procedural XOR Test Pattern
//!
//! Synthesizes the classic XOR bit-pattern image and uploads it as a
//! mipmapped 2D texture. The pattern is deterministic, which makes it useful
//! for verifying texture-coordinate correctness — it is not an asset
//! pipeline.
//!
//! The canonical product of the generator is a tightly packed RGB buffer;
//! upload expands it to RGBA (alpha 255) because wgpu has no packed 24-bit
//! format. The full mip chain down to 1×1 is computed on the CPU with a box
//! filter and uploaded level-major, the portable equivalent of asking the
//! driver to generate mipmaps from the base level.

use crate::render::GpuContext;

/// Generate the XOR pattern as tightly packed RGB bytes (`width * height * 3`).
///
/// For pixel (row `i`, col `j`): `x = i ^ j`, `R = x`, `G = x << 1`,
/// `B = x << 2`, each masked to a byte.
pub fn xor_pattern(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for i in 0..height {
        for j in 0..width {
            let x = i ^ j;
            pixels.push((x & 0xff) as u8);
            pixels.push(((x << 1) & 0xff) as u8);
            pixels.push(((x << 2) & 0xff) as u8);
        }
    }
    pixels
}

/// Expand packed RGB to RGBA with opaque alpha.
pub fn expand_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(0xff);
    }
    rgba
}

/// Number of mip levels for a base image of the given size (down to 1×1).
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Box-filter an RGBA image down to half size (dimensions clamp at 1).
///
/// Returns the downsampled pixels and their dimensions.
pub fn downsample_rgba(rgba: &[u8], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    let out_w = (width / 2).max(1);
    let out_h = (height / 2).max(1);
    let mut out = Vec::with_capacity((out_w * out_h * 4) as usize);

    for oy in 0..out_h {
        for ox in 0..out_w {
            // 2x2 neighborhood in the source, clamped at the edges so odd
            // dimensions stay in bounds.
            let x0 = (ox * 2).min(width - 1);
            let y0 = (oy * 2).min(height - 1);
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);

            for c in 0..4usize {
                let sample = |x: u32, y: u32| rgba[((y * width + x) * 4) as usize + c] as u32;
                let sum = sample(x0, y0) + sample(x1, y0) + sample(x0, y1) + sample(x1, y1);
                out.push((sum / 4) as u8);
            }
        }
    }

    (out, out_w, out_h)
}

/// Build the full RGBA mip chain, base level first.
pub fn mip_chain(base: Vec<u8>, width: u32, height: u32) -> Vec<Vec<u8>> {
    let levels = mip_level_count(width, height) as usize;
    let mut chain = Vec::with_capacity(levels);
    let (mut w, mut h) = (width, height);
    chain.push(base);

    while chain.len() < levels {
        let (next, nw, nh) = downsample_rgba(chain.last().unwrap(), w, h);
        chain.push(next);
        (w, h) = (nw, nh);
    }

    chain
}

/// Generate the XOR pattern and upload it as a mipmapped, filterable texture.
pub fn create_xor_texture(gpu: &GpuContext, width: u32, height: u32) -> wgpu::TextureView {
    use wgpu::util::DeviceExt;

    let rgba = expand_rgba(&xor_pattern(width, height));
    let chain = mip_chain(rgba, width, height);
    let levels = chain.len() as u32;
    let data: Vec<u8> = chain.concat();

    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some("xor pattern texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &data,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pixel_is_black() {
        // 0 ^ 0 = 0 in every channel.
        assert_eq!(xor_pattern(1, 1), vec![0, 0, 0]);
    }

    #[test]
    fn pattern_is_deterministic() {
        assert_eq!(xor_pattern(64, 32), xor_pattern(64, 32));
    }

    #[test]
    fn known_pixel_values() {
        let pixels = xor_pattern(4, 4);
        // Row 1, col 2: x = 1 ^ 2 = 3 → (3, 6, 12).
        let at = |i: usize, j: usize| {
            let base = (i * 4 + j) * 3;
            [pixels[base], pixels[base + 1], pixels[base + 2]]
        };
        assert_eq!(at(1, 2), [3, 6, 12]);
        // Row 3, col 3: x = 0.
        assert_eq!(at(3, 3), [0, 0, 0]);
        // Shifts mask to a byte: x = 128 → G = 0, B = 0.
        let pixels = xor_pattern(256, 256);
        let base = (128 * 256) * 3;
        assert_eq!(pixels[base], 128);
        assert_eq!(pixels[base + 1], 0);
        assert_eq!(pixels[base + 2], 0);
    }

    #[test]
    fn rgba_expansion_is_opaque() {
        let rgba = expand_rgba(&xor_pattern(2, 2));
        assert_eq!(rgba.len(), 2 * 2 * 4);
        for px in rgba.chunks_exact(4) {
            assert_eq!(px[3], 0xff);
        }
    }

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(256, 64), 9);
    }

    #[test]
    fn mip_chain_ends_at_one_pixel() {
        let base = expand_rgba(&xor_pattern(256, 256));
        let chain = mip_chain(base, 256, 256);
        assert_eq!(chain.len(), 9);
        assert_eq!(chain.last().unwrap().len(), 4);
        // Each level is a quarter of the previous (square power-of-two case).
        for pair in chain.windows(2) {
            assert_eq!(pair[0].len() / 4, pair[1].len());
        }
    }

    #[test]
    fn downsample_averages_the_quad() {
        // One 2x2 RGBA image with channel values 0, 4, 8, 12 → average 6.
        let src = vec![
            0, 0, 0, 255, //
            4, 4, 4, 255, //
            8, 8, 8, 255, //
            12, 12, 12, 255,
        ];
        let (out, w, h) = downsample_rgba(&src, 2, 2);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, vec![6, 6, 6, 255]);
    }

    #[test]
    fn downsample_clamps_odd_dimensions() {
        let src = expand_rgba(&xor_pattern(3, 3));
        let (out, w, h) = downsample_rgba(&src, 3, 3);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out.len(), 4);
    }
}
