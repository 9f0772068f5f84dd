//! SVG load resources
//!
//! An [`SvgResource`] binds one SVG source to one load. The input string is
//! classified exactly once at construction; the load itself is a single
//! shared future created on first demand, so concurrent and repeated
//! `load()` calls all observe the same resolution (the same bitmap or the
//! same error). There is no retry and no reset: a failed resource stays
//! failed.
//!
//! The pipeline is strictly ordered inside that one future: obtain markup,
//! probe intrinsic dimensions, rasterize through the decode collaborator,
//! then publish the decoder-reported dimensions. Markup without a
//! resolvable size is not an error; the decoder picks the output size and
//! the stored dimensions simply stay at zero until decoding finishes.

use crate::decode::{Bitmap, ResvgDecoder, SvgDecoder};
use crate::dimensions::{get_size, SvgSize};
use crate::error::{Error, Result};
use crate::fetch::{HttpTextFetcher, TextFetcher};
use crate::source::{decode_data_uri, SvgSource};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::Arc;
use std::sync::OnceLock;

/// The shared load future handed out by [`SvgResource::load`].
///
/// Every clone resolves to the same `Arc<Bitmap>` or the same error.
/// Clones are cheap; identity is observable through [`Shared::ptr_eq`].
pub type LoadFuture = Shared<BoxFuture<'static, Result<Arc<Bitmap>>>>;

/// Options for constructing an [`SvgResource`].
#[derive(Debug, Clone, Copy)]
pub struct SvgResourceOptions {
  /// Kick off the load as part of construction. Defaults to `true`.
  pub auto_load: bool,
}

impl SvgResourceOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_auto_load(mut self, auto_load: bool) -> Self {
    self.auto_load = auto_load;
    self
  }
}

impl Default for SvgResourceOptions {
  fn default() -> Self {
    Self { auto_load: true }
  }
}

/// Observable lifecycle of a resource.
///
/// `Ready` and `Failed` are terminal; a resource never goes back to
/// `Loading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
  /// No load has been started yet.
  Unloaded,
  /// The shared future exists but has not resolved.
  Loading,
  /// The bitmap is available.
  Ready,
  /// The load failed; the error is replayed to every awaiter.
  Failed,
}

/// An SVG source bound to a single shared load.
///
/// The source string is classified at construction into a URL, a data URI,
/// or inline markup. [`load`](SvgResource::load) returns a clone of the one
/// shared future driving the pipeline; dimensions become available once the
/// decode reports them and stay at the zero sentinel until then.
///
/// # Example
///
/// ```rust,ignore
/// use svgtex::SvgResource;
///
/// let resource = SvgResource::new(r#"<svg width="64" height="32"></svg>"#);
/// let bitmap = resource.load().await?;
/// assert_eq!(resource.dimensions(), (64, 32));
/// assert_eq!(bitmap.dimensions(), resource.dimensions());
/// ```
///
/// # Thread Safety
///
/// `SvgResource` is `Send + Sync`; interior state lives in write-once cells
/// and no lock is held across await points.
pub struct SvgResource {
  source: SvgSource,
  fetcher: Arc<dyn TextFetcher>,
  decoder: Arc<dyn SvgDecoder>,
  dimensions: Arc<OnceLock<(u32, u32)>>,
  future: OnceLock<LoadFuture>,
}

impl SvgResource {
  /// Create a resource with default collaborators and options.
  pub fn new(source: impl Into<String>) -> Self {
    Self::with_options(source, SvgResourceOptions::default())
  }

  /// Create a resource with default collaborators.
  pub fn with_options(source: impl Into<String>, options: SvgResourceOptions) -> Self {
    Self::with_options_fetcher_and_decoder(
      source,
      options,
      Arc::new(HttpTextFetcher::new()),
      Arc::new(ResvgDecoder::new()),
    )
  }

  /// Create a resource with a custom fetcher.
  pub fn with_fetcher(source: impl Into<String>, fetcher: Arc<dyn TextFetcher>) -> Self {
    Self::with_options_and_fetcher(source, SvgResourceOptions::default(), fetcher)
  }

  /// Create a resource with a custom fetcher and explicit options.
  pub fn with_options_and_fetcher(
    source: impl Into<String>,
    options: SvgResourceOptions,
    fetcher: Arc<dyn TextFetcher>,
  ) -> Self {
    Self::with_options_fetcher_and_decoder(source, options, fetcher, Arc::new(ResvgDecoder::new()))
  }

  /// Create a resource with explicit options and both collaborators.
  pub fn with_options_fetcher_and_decoder(
    source: impl Into<String>,
    options: SvgResourceOptions,
    fetcher: Arc<dyn TextFetcher>,
    decoder: Arc<dyn SvgDecoder>,
  ) -> Self {
    let input = source.into();
    let resource = Self {
      source: SvgSource::classify(&input),
      fetcher,
      decoder,
      dimensions: Arc::new(OnceLock::new()),
      future: OnceLock::new(),
    };
    log::debug!("classified SVG source as {}", resource.source.kind());
    if options.auto_load {
      resource.spawn_auto_load();
    }
    resource
  }

  /// Probes markup for intrinsic dimensions without constructing a resource.
  ///
  /// See [`crate::dimensions::get_size`].
  pub fn get_size(markup: &str) -> SvgSize {
    get_size(markup)
  }

  /// Start (or join) the load.
  ///
  /// The first call creates the pipeline future; every call returns a clone
  /// of that same shared future. Awaiting it yields the decoded bitmap or
  /// the error that rejected the load.
  pub fn load(&self) -> LoadFuture {
    self.future.get_or_init(|| self.make_load_future()).clone()
  }

  /// The classified source.
  pub fn source(&self) -> &SvgSource {
    &self.source
  }

  /// Where the resource is in its lifecycle.
  pub fn state(&self) -> LoadState {
    match self.future.get() {
      None => LoadState::Unloaded,
      Some(shared) => match shared.peek() {
        None => LoadState::Loading,
        Some(Ok(_)) => LoadState::Ready,
        Some(Err(_)) => LoadState::Failed,
      },
    }
  }

  /// Final width in pixels; `0` until the decode reports it.
  pub fn width(&self) -> u32 {
    self.dimensions.get().map(|(width, _)| *width).unwrap_or(0)
  }

  /// Final height in pixels; `0` until the decode reports it.
  pub fn height(&self) -> u32 {
    self.dimensions.get().map(|(_, height)| *height).unwrap_or(0)
  }

  /// Final `(width, height)`; `(0, 0)` until the decode reports it.
  pub fn dimensions(&self) -> (u32, u32) {
    self.dimensions.get().copied().unwrap_or((0, 0))
  }

  /// Eagerly drive the shared future when a runtime is available.
  /// Without one, the kick-off degrades to lazy on the first `load()`.
  fn spawn_auto_load(&self) {
    match tokio::runtime::Handle::try_current() {
      Ok(handle) => {
        let future = self.load();
        handle.spawn(async move {
          let _ = future.await;
        });
      }
      Err(_) => {
        log::debug!("auto-load deferred: no async runtime on the constructing thread");
      }
    }
  }

  fn make_load_future(&self) -> LoadFuture {
    let source = self.source.clone();
    let fetcher = Arc::clone(&self.fetcher);
    let decoder = Arc::clone(&self.decoder);
    let final_dimensions = Arc::clone(&self.dimensions);

    async move {
      let markup = match source {
        SvgSource::Url(url) => {
          log::debug!("fetching SVG text from {url}");
          fetcher.fetch_text(&url).await.map_err(Error::Fetch)?
        }
        SvgSource::DataUri(uri) => decode_data_uri(&uri).map_err(Error::Decode)?,
        SvgSource::Inline(markup) => markup,
      };
      log::debug!("obtained {} bytes of SVG markup", markup.len());

      let probed = get_size(&markup);
      let size_hint = probed
        .resolved()
        .filter(|&(width, height)| width > 0.0 && height > 0.0)
        .map(|(width, height)| {
          (
            width.max(1.0).round() as u32,
            height.max(1.0).round() as u32,
          )
        });
      match size_hint {
        Some((width, height)) => {
          log::debug!("resolved intrinsic dimensions {width}x{height} from markup")
        }
        None => {
          log::warn!("no intrinsic dimensions resolved from markup; decoder picks the output size")
        }
      }

      let bitmap = decoder
        .decode(&markup, size_hint)
        .await
        .map_err(Error::Decode)?;

      // The decode result is authoritative, whatever the markup claimed.
      let _ = final_dimensions.set(bitmap.dimensions());
      Ok(Arc::new(bitmap))
    }
    .boxed()
    .shared()
  }
}
