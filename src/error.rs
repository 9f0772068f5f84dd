//! Error types for svgtex
//!
//! This module provides error types for the two failure domains of the
//! loader:
//! - Fetch errors (transport-level: network, HTTP status, local file IO)
//! - Decode errors (content-level: data URIs, SVG parsing, rasterization)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations. Every type here is `Clone`: a
//! resource's load future is shared, so the same error instance must be
//! handed to every awaiter. Variants therefore carry stringified reasons
//! rather than source errors that cannot be cloned.

use thiserror::Error;

/// Result type alias for svgtex operations
///
/// This is a convenience type that uses our Error type as the error variant.
///
/// # Examples
///
/// ```
/// use svgtex::Result;
///
/// fn probe(markup: &str) -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for svgtex
///
/// Covers everything that can go wrong while loading an SVG source into a
/// bitmap. Each variant wraps the more specific error for that phase.
///
/// # Examples
///
/// ```
/// use svgtex::Error;
/// use svgtex::error::FetchError;
///
/// fn load() -> Result<(), Error> {
///     Err(Error::Fetch(FetchError::Status {
///         url: "https://example.com/icon.svg".to_string(),
///         status: 404,
///     }))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum Error {
  /// Obtaining the markup text failed
  #[error("Fetch error: {0}")]
  Fetch(#[from] FetchError),

  /// Turning the markup into a bitmap failed
  #[error("Decode error: {0}")]
  Decode(#[from] DecodeError),
}

/// Errors that occur while fetching SVG text
///
/// These errors happen when the source is a URL (network or local path)
/// and the text cannot be obtained.
///
/// # Examples
///
/// ```
/// use svgtex::error::FetchError;
///
/// let error = FetchError::Transport {
///     url: "https://example.com/icon.svg".to_string(),
///     reason: "connection refused".to_string(),
/// };
/// ```
#[derive(Error, Debug, Clone)]
pub enum FetchError {
  /// Network or IO failure talking to the server, including timeouts
  #[error("Network error fetching '{url}': {reason}")]
  Transport { url: String, reason: String },

  /// The server answered with a non-success status
  #[error("HTTP status {status} fetching '{url}'")]
  Status { url: String, status: u16 },

  /// A local file could not be read as UTF-8 text
  #[error("Failed to read '{path}': {reason}")]
  File { path: String, reason: String },
}

/// Errors that occur while decoding a source into a bitmap
///
/// These errors happen when a data URI payload is malformed or when the
/// SVG markup cannot be parsed and rasterized.
#[derive(Error, Debug, Clone)]
pub enum DecodeError {
  /// Malformed data URI (missing payload, bad base64, non-UTF-8 text)
  #[error("Invalid data URI: {reason}")]
  InvalidDataUri { reason: String },

  /// The SVG parser rejected the markup
  #[error("Failed to parse SVG markup: {reason}")]
  InvalidSvg { reason: String },

  /// The requested output exceeds the configured pixel limits
  #[error("Refusing to rasterize {width}x{height}: pixel limits exceeded")]
  TooLarge { width: u32, height: u32 },

  /// Canvas creation failed
  #[error("Failed to create canvas: {width}x{height}")]
  Canvas { width: u32, height: u32 },

  /// Rasterization did not run to completion
  #[error("Rasterization failed: {reason}")]
  Rasterize { reason: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  // FetchError tests
  #[test]
  fn test_fetch_error_transport() {
    let error = FetchError::Transport {
      url: "https://example.com/icon.svg".to_string(),
      reason: "connection refused".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("example.com"));
    assert!(display.contains("connection refused"));
  }

  #[test]
  fn test_fetch_error_status() {
    let error = FetchError::Status {
      url: "https://example.com/icon.svg".to_string(),
      status: 404,
    };
    let display = format!("{}", error);
    assert!(display.contains("example.com"));
    assert!(display.contains("404"));
  }

  #[test]
  fn test_fetch_error_file() {
    let error = FetchError::File {
      path: "/tmp/missing.svg".to_string(),
      reason: "No such file or directory".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("/tmp/missing.svg"));
    assert!(display.contains("No such file"));
  }

  // DecodeError tests
  #[test]
  fn test_decode_error_invalid_data_uri() {
    let error = DecodeError::InvalidDataUri {
      reason: "missing ',' separator".to_string(),
    };
    assert!(format!("{}", error).contains("Invalid data URI"));
  }

  #[test]
  fn test_decode_error_invalid_svg() {
    let error = DecodeError::InvalidSvg {
      reason: "expected '<'".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("parse SVG"));
    assert!(display.contains("expected '<'"));
  }

  #[test]
  fn test_decode_error_too_large() {
    let error = DecodeError::TooLarge {
      width: 100_000,
      height: 100_000,
    };
    let display = format!("{}", error);
    assert!(display.contains("100000"));
    assert!(display.contains("pixel"));
  }

  #[test]
  fn test_decode_error_canvas() {
    let error = DecodeError::Canvas {
      width: 0,
      height: 32,
    };
    assert!(format!("{}", error).contains("0x32"));
  }

  // Conversion tests
  #[test]
  fn test_error_from_fetch_error() {
    let fetch_error = FetchError::Status {
      url: "https://example.com/a.svg".to_string(),
      status: 500,
    };
    let error: Error = fetch_error.into();
    assert!(matches!(error, Error::Fetch(_)));
  }

  #[test]
  fn test_error_from_decode_error() {
    let decode_error = DecodeError::InvalidDataUri {
      reason: "Test".to_string(),
    };
    let error: Error = decode_error.into();
    assert!(matches!(error, Error::Decode(_)));
  }

  #[test]
  fn test_error_display_through_top_level() {
    let error: Error = DecodeError::InvalidSvg {
      reason: "truncated".to_string(),
    }
    .into();
    let display = format!("{}", error);
    assert!(display.contains("Decode error"));
    assert!(display.contains("truncated"));
  }

  // Shared futures hand the same error to every awaiter, so the whole
  // taxonomy must stay cloneable.
  #[test]
  fn test_errors_are_cloneable() {
    let error: Error = FetchError::Transport {
      url: "https://example.com/a.svg".to_string(),
      reason: "timed out".to_string(),
    }
    .into();
    let cloned = error.clone();
    assert_eq!(format!("{}", error), format!("{}", cloned));
  }

  #[test]
  fn test_error_implements_std_error() {
    fn assert_error<E: std::error::Error>() {}
    assert_error::<Error>();
    assert_error::<FetchError>();
    assert_error::<DecodeError>();
  }
}
