use image::GenericImageView;

use crate::errors::{Error, Result};
use crate::resources::texture::{Texture, TextureSampler};

/// Decodes PNG/JPEG bytes into an RGBA8 [`Texture`] labelled with `url`.
pub fn decode_texture(url: &str, bytes: &[u8], sampler: TextureSampler) -> Result<Texture> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::asset_load(url, format!("Failed to decode image: {e}")))?;

    let (width, height) = img.dimensions();
    let rgba = img.into_rgba8();

    let mut texture = Texture::new_rgba8(url, width, height, rgba.into_raw());
    texture.set_sampler(sampler);
    Ok(texture)
}
