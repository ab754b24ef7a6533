// SPDX-License-Identifier: MIT
// Grayscale downscaler built on fast_image_resize (SIMD-accelerated).
// Luma8 in → Luma8 out, written into a freshly allocated image.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8;
use fir::{ResizeOptions, Resizer};
use image::GrayImage;

use crate::plan::ScalePlan;

#[derive(Debug)]
pub enum ResampleError {
    SizeMismatch,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ResampleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ResampleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::SizeMismatch => write!(f, "Source image does not match the plan's input size"),
            ResampleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ResampleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ResampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResampleError::Fir(e) => Some(e),
            ResampleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Resample `src` to `plan.out`. Returns a copy when the plan is a no-op.
pub fn resample_gray(
    resizer: &mut Resizer,
    src: &GrayImage,
    plan: &ScalePlan,
) -> Result<GrayImage, ResampleError> {
    if src.width() != plan.input.w || src.height() != plan.input.h {
        return Err(ResampleError::SizeMismatch);
    }
    if !plan.resizes() {
        return Ok(src.clone());
    }

    let src_view = TypedImageRef::<U8>::from_buffer(plan.input.w, plan.input.h, src.as_raw())?;

    let mut dst = vec![0u8; (plan.out.w as usize) * (plan.out.h as usize)];
    {
        let mut dst_image = TypedImage::<U8>::from_buffer(plan.out.w, plan.out.h, dst.as_mut_slice())?;
        // Area-weighted: strokes thinner than the shrink factor must not vanish.
        let opts = ResizeOptions::new()
            .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Bilinear));
        resizer.resize_typed::<U8>(&src_view, &mut dst_image, &opts)?;
    }

    GrayImage::from_raw(plan.out.w, plan.out.h, dst).ok_or(ResampleError::SizeMismatch)
}
