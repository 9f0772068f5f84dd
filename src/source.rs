//! Source classification for SVG inputs
//!
//! A resource's input string is classified exactly once, at construction,
//! into one of three closed variants: a data URI carrying the markup, the
//! markup itself, or a location to fetch. Classification is ordered; a data
//! URI whose payload contains `<svg` is still a data URI.

use crate::error::DecodeError;
use base64::Engine;

const DATA_URI_PREFIX: &str = "data:";
const SVG_MIME: &str = "image/svg+xml";

/// The classified form of an SVG input string.
///
/// Closed set, matched exhaustively by the load pipeline; adding a variant
/// is a compile-visible change for every consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SvgSource {
  /// A location to fetch: `http(s)://`, `file://`, or a bare filesystem path.
  Url(String),
  /// A full data URI whose MIME type is `image/svg+xml`.
  DataUri(String),
  /// Raw `<svg>` markup passed in directly.
  Inline(String),
}

impl SvgSource {
  /// Classifies an input string.
  ///
  /// Order matters: the data-URI prefix is checked first (scheme and MIME
  /// type ASCII case-insensitive, extra parameters such as `;charset=utf-8`
  /// or `;base64` tolerated), then the trimmed content is checked for an
  /// `<svg` tag opening anywhere, and everything else is treated as a URL.
  pub fn classify(input: &str) -> SvgSource {
    if is_svg_data_uri(input) {
      SvgSource::DataUri(input.to_string())
    } else if input.trim().contains("<svg") {
      SvgSource::Inline(input.to_string())
    } else {
      SvgSource::Url(input.to_string())
    }
  }

  /// The original input string.
  pub fn as_str(&self) -> &str {
    match self {
      SvgSource::Url(s) | SvgSource::DataUri(s) | SvgSource::Inline(s) => s,
    }
  }

  /// Short label for log lines.
  pub(crate) fn kind(&self) -> &'static str {
    match self {
      SvgSource::Url(_) => "url",
      SvgSource::DataUri(_) => "data-uri",
      SvgSource::Inline(_) => "inline",
    }
  }
}

fn is_svg_data_uri(input: &str) -> bool {
  if input.len() < DATA_URI_PREFIX.len()
    || !input[..DATA_URI_PREFIX.len()].eq_ignore_ascii_case(DATA_URI_PREFIX)
  {
    return false;
  }
  let rest = &input[DATA_URI_PREFIX.len()..];
  let header_end = rest.find(|c| c == ';' || c == ',').unwrap_or(rest.len());
  rest[..header_end].trim().eq_ignore_ascii_case(SVG_MIME)
}

/// Extracts SVG markup text from a data URI following RFC 2397 semantics.
///
/// The payload after the first `,` is base64-decoded when the header
/// declares `base64` (ASCII whitespace tolerated), otherwise
/// percent-decoded; either way the result must be UTF-8 text.
pub fn decode_data_uri(uri: &str) -> Result<String, DecodeError> {
  if uri.len() < DATA_URI_PREFIX.len()
    || !uri[..DATA_URI_PREFIX.len()].eq_ignore_ascii_case(DATA_URI_PREFIX)
  {
    return Err(DecodeError::InvalidDataUri {
      reason: "URI does not start with 'data:'".to_string(),
    });
  }

  let rest = &uri[DATA_URI_PREFIX.len()..];
  let (header, payload) = rest.split_once(',').ok_or_else(|| DecodeError::InvalidDataUri {
    reason: "Missing comma in data URI".to_string(),
  })?;

  let bytes = if declares_base64(header) {
    decode_base64_payload(payload)?
  } else {
    percent_decode(payload)?
  };

  String::from_utf8(bytes).map_err(|_| DecodeError::InvalidDataUri {
    reason: "Payload is not valid UTF-8 text".to_string(),
  })
}

fn declares_base64(header: &str) -> bool {
  header
    .split(';')
    .skip(1)
    .any(|param| param.trim().eq_ignore_ascii_case("base64"))
}

/// Decode base64 payloads, tolerating ASCII whitespace for robustness.
fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, DecodeError> {
  let mut cleaned = Vec::with_capacity(payload.len());
  let mut saw_whitespace = false;

  for byte in payload.bytes() {
    if byte.is_ascii_whitespace() {
      saw_whitespace = true;
      continue;
    }
    cleaned.push(byte);
  }

  let input = if saw_whitespace {
    cleaned.as_slice()
  } else {
    payload.as_bytes()
  };

  base64::engine::general_purpose::STANDARD
    .decode(input)
    .map_err(|e| DecodeError::InvalidDataUri {
      reason: format!("Invalid base64: {e}"),
    })
}

/// Percent-decode a payload without treating '+' specially.
///
/// Plain payloads without escapes pass through byte-identical.
fn percent_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
  let mut out = Vec::with_capacity(input.len());
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    match bytes[i] {
      b'%' => {
        if i + 2 >= bytes.len() {
          return Err(DecodeError::InvalidDataUri {
            reason: "Incomplete percent-escape".to_string(),
          });
        }
        let hi = (bytes[i + 1] as char).to_digit(16);
        let lo = (bytes[i + 2] as char).to_digit(16);
        match (hi, lo) {
          (Some(hi), Some(lo)) => {
            out.push(((hi << 4) | lo) as u8);
            i += 3;
          }
          _ => {
            return Err(DecodeError::InvalidDataUri {
              reason: "Invalid percent-escape".to_string(),
            });
          }
        }
      }
      byte => {
        out.push(byte);
        i += 1;
      }
    }
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classifies_base64_data_uri() {
    let source = SvgSource::classify("data:image/svg+xml;base64,PHN2Zy8+");
    assert!(matches!(source, SvgSource::DataUri(_)));
  }

  #[test]
  fn classifies_plain_data_uri() {
    let source = SvgSource::classify("data:image/svg+xml,<svg/>");
    assert!(matches!(source, SvgSource::DataUri(_)));
  }

  #[test]
  fn classifies_data_uri_case_insensitively() {
    let source = SvgSource::classify("DATA:IMAGE/SVG+XML;base64,PHN2Zy8+");
    assert!(matches!(source, SvgSource::DataUri(_)));
  }

  #[test]
  fn classifies_data_uri_with_charset_parameter() {
    let source = SvgSource::classify("data:image/svg+xml;charset=utf-8;base64,PHN2Zy8+");
    assert!(matches!(source, SvgSource::DataUri(_)));
  }

  #[test]
  fn non_svg_data_uri_is_not_a_data_uri_source() {
    // This loader only understands SVG payloads; anything else falls
    // through to the URL arm and fails at fetch time.
    let source = SvgSource::classify("data:image/png;base64,AAAA");
    assert!(matches!(source, SvgSource::Url(_)));
  }

  #[test]
  fn classifies_inline_markup() {
    assert!(matches!(
      SvgSource::classify("<svg></svg>"),
      SvgSource::Inline(_)
    ));
    assert!(matches!(
      SvgSource::classify("\n  <?xml version=\"1.0\"?><svg width=\"1\"/>"),
      SvgSource::Inline(_)
    ));
  }

  #[test]
  fn classifies_urls_and_paths() {
    assert!(matches!(
      SvgSource::classify("https://example.com/icon.svg"),
      SvgSource::Url(_)
    ));
    assert!(matches!(
      SvgSource::classify("file:///tmp/icon.svg"),
      SvgSource::Url(_)
    ));
    assert!(matches!(
      SvgSource::classify("icons/icon.svg"),
      SvgSource::Url(_)
    ));
  }

  #[test]
  fn decodes_plain_payload_unchanged() {
    let markup = decode_data_uri("data:image/svg+xml,<svg width='1' height='1'></svg>").unwrap();
    assert_eq!(markup, "<svg width='1' height='1'></svg>");
  }

  #[test]
  fn decodes_percent_escapes() {
    let markup = decode_data_uri("data:image/svg+xml,%3Csvg%20width%3D%2264%22%2F%3E").unwrap();
    assert_eq!(markup, "<svg width=\"64\"/>");
  }

  #[test]
  fn decodes_base64_payload() {
    let markup = decode_data_uri("data:image/svg+xml;base64,PHN2Zy8+").unwrap();
    assert_eq!(markup, "<svg/>");
  }

  #[test]
  fn decodes_base64_payload_with_whitespace() {
    let markup = decode_data_uri("data:image/svg+xml;base64,PHN2\nZy8+").unwrap();
    assert_eq!(markup, "<svg/>");
  }

  #[test]
  fn rejects_missing_comma() {
    let err = decode_data_uri("data:image/svg+xml;base64").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidDataUri { .. }));
  }

  #[test]
  fn rejects_invalid_base64() {
    let err = decode_data_uri("data:image/svg+xml;base64,!!!").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidDataUri { .. }));
  }

  #[test]
  fn rejects_incomplete_percent_escape() {
    let err = decode_data_uri("data:image/svg+xml,%3").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidDataUri { .. }));
  }

  #[test]
  fn rejects_non_utf8_payload() {
    // base64 of [0xFF, 0xFE]
    let err = decode_data_uri("data:image/svg+xml;base64,//4=").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidDataUri { .. }));
  }

  #[test]
  fn as_str_returns_original_input() {
    let source = SvgSource::classify("<svg/>");
    assert_eq!(source.as_str(), "<svg/>");
  }
}
