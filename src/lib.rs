pub mod decode;
pub mod dimensions;
pub mod error;
pub mod fetch;
pub mod resource;
pub mod source;

pub use error::{DecodeError, Error, FetchError, Result};

pub use decode::{Bitmap, ResvgDecoder, SvgDecoder};
pub use dimensions::{get_size, SvgSize, ViewBox};
pub use fetch::{HttpTextFetcher, TextFetcher};
pub use resource::{LoadFuture, LoadState, SvgResource, SvgResourceOptions};
pub use source::SvgSource;
