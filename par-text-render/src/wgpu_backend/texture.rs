//! Page atlas textures.
//!
//! Pages are single-channel (`R8Unorm`) with a full mip chain generated on
//! the CPU, since wgpu has no built-in mipmap generation.

use par_text_fonts::PageImage;
use wgpu::*;

/// A page atlas on the GPU, bound with its sampler and ready to draw.
#[derive(Debug)]
pub struct PageTexture {
    pub page_no: u32,
    pub width: u32,
    pub height: u32,
    pub mip_level_count: u32,
    #[allow(dead_code)]
    texture: Texture,
    pub(crate) bind_group: BindGroup,
}

/// Number of levels in a full chain down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Halve an image with a 2×2 box filter. Odd edges reuse the last
/// row or column.
pub fn downsample(pixels: &[u8], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    let out_w = (width / 2).max(1);
    let out_h = (height / 2).max(1);
    let at = |x: u32, y: u32| -> u32 {
        let x = x.min(width - 1);
        let y = y.min(height - 1);
        u32::from(pixels[(y * width + x) as usize])
    };

    let mut out = Vec::with_capacity((out_w * out_h) as usize);
    for y in 0..out_h {
        for x in 0..out_w {
            let (sx, sy) = (x * 2, y * 2);
            let sum = at(sx, sy) + at(sx + 1, sy) + at(sx, sy + 1) + at(sx + 1, sy + 1);
            out.push(((sum + 2) / 4) as u8);
        }
    }
    (out, out_w, out_h)
}

/// Every mip level of `image`, level 0 first.
pub fn mip_chain(image: &PageImage) -> Vec<(Vec<u8>, u32, u32)> {
    let levels = mip_level_count(image.width, image.height);
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push((image.pixels.clone(), image.width, image.height));
    for _ in 1..levels {
        let Some((pixels, w, h)) = chain.last() else {
            break;
        };
        let next = downsample(pixels, *w, *h);
        chain.push(next);
    }
    chain
}

/// Upload a page image with its full mip chain.
pub fn create_page_texture(
    device: &Device,
    queue: &Queue,
    layout: &BindGroupLayout,
    sampler: &Sampler,
    image: PageImage,
) -> PageTexture {
    let mip_level_count = mip_level_count(image.width, image.height);
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("page texture"),
        size: Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
        mip_level_count,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::R8Unorm,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, (pixels, width, height)) in mip_chain(&image).iter().enumerate() {
        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level as u32,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            pixels,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(*width),
                rows_per_image: Some(*height),
            },
            Extent3d {
                width: *width,
                height: *height,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("page bind group"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    });

    log::debug!(
        "Uploaded page {:#x} texture {}x{} with {} mip levels",
        image.page_no,
        image.width,
        image.height,
        mip_level_count
    );

    PageTexture {
        page_no: image.page_no,
        width: image.width,
        height: image.height,
        mip_level_count,
        texture,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_chain_reaches_one_texel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(320, 576), 10);
        assert_eq!(mip_level_count(1024, 1024), 11);
    }

    #[test]
    fn box_filter_averages_quads() {
        let pixels = [0, 255, 255, 255, 10, 10, 20, 20];
        let (out, w, h) = downsample(&pixels, 4, 2);
        assert_eq!((w, h), (2, 1));
        assert_eq!(out, vec![69, 138]);
    }

    #[test]
    fn odd_edges_repeat_last_texel() {
        let pixels = [100, 200, 40];
        let (out, w, h) = downsample(&pixels, 3, 1);
        assert_eq!((w, h), (1, 1));
        // (100 + 200 + 100 + 200) / 4
        assert_eq!(out, vec![150]);
    }

    #[test]
    fn chain_sizes_halve_each_level() {
        let image = PageImage {
            page_no: 0,
            width: 20,
            height: 12,
            pixels: vec![255; 240],
        };
        let chain = mip_chain(&image);
        let sizes: Vec<(u32, u32)> = chain.iter().map(|(_, w, h)| (*w, *h)).collect();
        assert_eq!(sizes, vec![(20, 12), (10, 6), (5, 3), (2, 1), (1, 1)]);
        // solid white stays solid
        assert!(chain.iter().all(|(p, _, _)| p.iter().all(|&v| v == 255)));
    }
}
