//! SVG rasterization
//!
//! The decode collaborator turns markup text into an RGBA bitmap. The
//! default implementation parses with `usvg` and renders with `resvg` into
//! a `tiny_skia` pixmap, stretching to the caller's size hint when one is
//! given and otherwise letting the parsed document pick its own size (the
//! parser derives one from the content extent when the markup declares
//! nothing). Rasterization is CPU-bound and runs on the blocking pool.

use crate::error::DecodeError;
use async_trait::async_trait;
use image::RgbaImage;

/// A decoded raster image, RGBA8.
///
/// The pixel buffer is ready for texture upload: `width * height * 4`
/// bytes, row-major.
#[derive(Debug, Clone)]
pub struct Bitmap {
  image: RgbaImage,
}

impl Bitmap {
  /// Wrap an RGBA buffer as a bitmap.
  pub fn from_rgba(image: RgbaImage) -> Self {
    Self { image }
  }

  /// Width in pixels.
  pub fn width(&self) -> u32 {
    self.image.width()
  }

  /// Height in pixels.
  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// `(width, height)` in pixels.
  pub fn dimensions(&self) -> (u32, u32) {
    self.image.dimensions()
  }

  /// Raw RGBA bytes.
  pub fn data(&self) -> &[u8] {
    self.image.as_raw()
  }

  /// Borrow the underlying image buffer.
  pub fn as_rgba(&self) -> &RgbaImage {
    &self.image
  }

  /// Take the underlying image buffer.
  pub fn into_rgba(self) -> RgbaImage {
    self.image
  }
}

/// Trait for rasterizing SVG markup into a [`Bitmap`]
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the load pipeline shares the
/// decoder across a spawned future.
#[async_trait]
pub trait SvgDecoder: Send + Sync {
  /// Rasterize `markup`.
  ///
  /// When `size_hint` is `Some((width, height))` the output bitmap has
  /// exactly those dimensions, stretching the document as needed. When
  /// `None`, the decoder infers the output size from the document itself.
  async fn decode(&self, markup: &str, size_hint: Option<(u32, u32)>)
    -> Result<Bitmap, DecodeError>;
}

// Allow Arc<dyn SvgDecoder> to be used as SvgDecoder
#[async_trait]
impl<T: SvgDecoder + ?Sized> SvgDecoder for std::sync::Arc<T> {
  async fn decode(
    &self,
    markup: &str,
    size_hint: Option<(u32, u32)>,
  ) -> Result<Bitmap, DecodeError> {
    (**self).decode(markup, size_hint).await
  }
}

/// Default decoder backed by `resvg`
///
/// Decode limits guard against pathological dimension requests; a `0`
/// limit disables that check.
#[derive(Debug, Clone, Copy)]
pub struct ResvgDecoder {
  max_pixels: u64,
  max_dimension: u32,
}

impl ResvgDecoder {
  /// Create a decoder with default limits.
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the maximum number of output pixels (width * height). `0` disables the limit.
  pub fn with_max_pixels(mut self, max: u64) -> Self {
    self.max_pixels = max;
    self
  }

  /// Set the maximum output width or height. `0` disables the limit.
  pub fn with_max_dimension(mut self, max: u32) -> Self {
    self.max_dimension = max;
    self
  }

  fn enforce_limits(&self, width: u32, height: u32) -> Result<(), DecodeError> {
    if self.max_dimension > 0 && (width > self.max_dimension || height > self.max_dimension) {
      return Err(DecodeError::TooLarge { width, height });
    }
    if self.max_pixels > 0 {
      let pixels = width as u64 * height as u64;
      if pixels > self.max_pixels {
        return Err(DecodeError::TooLarge { width, height });
      }
    }
    Ok(())
  }

  /// Blocking rasterization; runs on the blocking pool.
  fn rasterize(&self, markup: &str, size_hint: Option<(u32, u32)>) -> Result<Bitmap, DecodeError> {
    use resvg::usvg;

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(markup, &options).map_err(|e| DecodeError::InvalidSvg {
      reason: e.to_string(),
    })?;

    let size = tree.size();
    let source_width = size.width();
    let source_height = size.height();
    if source_width <= 0.0 || source_height <= 0.0 {
      return Err(DecodeError::Canvas {
        width: source_width as u32,
        height: source_height as u32,
      });
    }

    let (render_width, render_height) = match size_hint {
      Some((width, height)) => (width, height),
      None => (
        source_width.max(1.0).round() as u32,
        source_height.max(1.0).round() as u32,
      ),
    };

    self.enforce_limits(render_width, render_height)?;

    let mut pixmap =
      tiny_skia::Pixmap::new(render_width, render_height).ok_or(DecodeError::Canvas {
        width: render_width,
        height: render_height,
      })?;

    let transform = tiny_skia::Transform::from_scale(
      render_width as f32 / source_width,
      render_height as f32 / source_height,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let image = RgbaImage::from_raw(render_width, render_height, pixmap.take()).ok_or_else(|| {
      DecodeError::Rasterize {
        reason: "Failed to create image from pixmap".to_string(),
      }
    })?;

    Ok(Bitmap::from_rgba(image))
  }
}

impl Default for ResvgDecoder {
  fn default() -> Self {
    Self {
      max_pixels: 100_000_000,
      max_dimension: 32768,
    }
  }
}

#[async_trait]
impl SvgDecoder for ResvgDecoder {
  async fn decode(
    &self,
    markup: &str,
    size_hint: Option<(u32, u32)>,
  ) -> Result<Bitmap, DecodeError> {
    let decoder = *self;
    let markup = markup.to_string();
    match tokio::task::spawn_blocking(move || decoder.rasterize(&markup, size_hint)).await {
      Ok(result) => result,
      Err(e) => Err(DecodeError::Rasterize {
        reason: format!("decode task failed: {e}"),
      }),
    }
  }
}
