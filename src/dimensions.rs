//! Intrinsic-dimension probing for SVG markup
//!
//! Resolution is a permissive textual scan, not an XML parse: attribute
//! occurrences are matched anywhere in the string, width/height first and
//! the root `viewBox` as a fallback. Probing never fails; markup without a
//! resolvable size yields an empty record and the decoder picks the output
//! size on its own.

/// Intrinsic dimensions probed from SVG markup.
///
/// Either both fields are present or the record is empty. A one-sided
/// record is never produced: a lone `width` or `height` attribute is not
/// enough to size a raster target, so resolution falls through to the
/// `viewBox` and then to the empty record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SvgSize {
  pub width: Option<f32>,
  pub height: Option<f32>,
}

impl SvgSize {
  /// True when both dimensions resolved.
  pub fn is_complete(&self) -> bool {
    self.width.is_some() && self.height.is_some()
  }

  /// Returns `(width, height)` when both dimensions resolved.
  pub fn resolved(&self) -> Option<(f32, f32)> {
    match (self.width, self.height) {
      (Some(width), Some(height)) => Some((width, height)),
      _ => None,
    }
  }
}

/// A parsed `viewBox` rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
  pub min_x: f32,
  pub min_y: f32,
  pub width: f32,
  pub height: f32,
}

/// Probes markup for intrinsic dimensions.
///
/// Scans for `width` and `height` attributes first (either quote style,
/// optional `px` suffix); both must parse for the pair to be used, and they
/// take precedence over any `viewBox`. Otherwise the third and fourth
/// `viewBox` numbers are taken as width/height. Markup yielding neither
/// returns the empty record.
///
/// # Examples
///
/// ```
/// use svgtex::dimensions::get_size;
///
/// let size = get_size(r#"<svg width="64" height="32"></svg>"#);
/// assert_eq!(size.resolved(), Some((64.0, 32.0)));
///
/// let size = get_size(r#"<svg viewBox="0 0 64 32"></svg>"#);
/// assert_eq!(size.resolved(), Some((64.0, 32.0)));
///
/// assert!(!get_size(r#"<svg width="64"></svg>"#).is_complete());
/// ```
pub fn get_size(markup: &str) -> SvgSize {
  let width = scan_length_attribute(markup, "width");
  let height = scan_length_attribute(markup, "height");
  if let (Some(width), Some(height)) = (width, height) {
    return SvgSize {
      width: Some(width),
      height: Some(height),
    };
  }

  if let Some(view_box) = scan_view_box(markup) {
    return SvgSize {
      width: Some(view_box.width),
      height: Some(view_box.height),
    };
  }

  SvgSize::default()
}

/// Parses an SVG length in pixels.
///
/// Accepts a bare number or a number with a `px` suffix (ASCII
/// case-insensitive). Percentages and other CSS units are rejected.
pub fn parse_length_px(value: &str) -> Option<f32> {
  let trimmed = value.trim();
  if trimmed.is_empty() || trimmed.ends_with('%') {
    return None;
  }

  let mut end = 0;
  for (idx, ch) in trimmed.char_indices() {
    if matches!(ch, '0'..='9' | '+' | '-' | '.' | 'e' | 'E') {
      end = idx + ch.len_utf8();
    } else {
      break;
    }
  }

  if end == 0 {
    return None;
  }

  let number = trimmed[..end].parse::<f32>().ok()?;
  if !number.is_finite() {
    return None;
  }

  let unit = trimmed[end..].trim_start();
  if unit.is_empty() || unit.eq_ignore_ascii_case("px") {
    Some(number)
  } else {
    None
  }
}

/// Parses a `viewBox` value: four finite numbers separated by whitespace
/// and/or commas, with positive width and height.
pub fn parse_view_box(value: &str) -> Option<ViewBox> {
  let mut nums = value
    .split(|c: char| c == ',' || c.is_whitespace())
    .filter(|s| !s.is_empty())
    .filter_map(|s| s.parse::<f32>().ok());
  let min_x = nums.next()?;
  let min_y = nums.next()?;
  let width = nums.next()?;
  let height = nums.next()?;
  if !(min_x.is_finite()
    && min_y.is_finite()
    && width.is_finite()
    && height.is_finite()
    && width > 0.0
    && height > 0.0)
  {
    return None;
  }
  Some(ViewBox {
    min_x,
    min_y,
    width,
    height,
  })
}

fn scan_length_attribute(markup: &str, name: &str) -> Option<f32> {
  let mut from = 0;
  while let Some(value) = next_attribute_value(markup, name, &mut from) {
    if let Some(parsed) = parse_length_px(value) {
      return Some(parsed);
    }
  }
  None
}

fn scan_view_box(markup: &str) -> Option<ViewBox> {
  let mut from = 0;
  while let Some(value) = next_attribute_value(markup, "viewBox", &mut from) {
    if let Some(parsed) = parse_view_box(value) {
      return Some(parsed);
    }
  }
  None
}

/// Finds the next `name="value"` occurrence at or after `*from` and returns
/// the raw value, advancing the cursor past it.
///
/// A match needs a whitespace character before the name (so `stroke-width`
/// never matches `width`), optional whitespace around `=`, and a value in
/// single or double quotes. Candidates that fail those checks, or whose
/// quote is never closed, are skipped and the scan continues.
fn next_attribute_value<'a>(markup: &'a str, name: &str, from: &mut usize) -> Option<&'a str> {
  let bytes = markup.as_bytes();
  while let Some(found) = markup[*from..].find(name) {
    let at = *from + found;
    *from = at + name.len();

    if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
      continue;
    }

    let mut i = at + name.len();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
      i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'=' {
      continue;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
      i += 1;
    }
    if i >= bytes.len() || (bytes[i] != b'"' && bytes[i] != b'\'') {
      continue;
    }
    let quote = bytes[i];
    i += 1;

    let Some(len) = bytes[i..].iter().position(|&b| b == quote) else {
      continue;
    };
    *from = i + len + 1;
    return Some(&markup[i..i + len]);
  }
  None
}
