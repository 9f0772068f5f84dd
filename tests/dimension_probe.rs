//! Dimension probing scenarios through the public API.

use svgtex::{get_size, SvgResource, SvgSize};

#[test]
fn reads_attributes_in_any_order() {
  let size = get_size(r#"<svg height="32" width="64"></svg>"#);
  assert_eq!(size.resolved(), Some((64.0, 32.0)));
}

#[test]
fn strips_px_suffixes() {
  let size = get_size("<svg height='32px' width='64px'></svg>");
  assert_eq!(size.resolved(), Some((64.0, 32.0)));
  let size = get_size(r#"<svg width="64px" height="32PX"></svg>"#);
  assert_eq!(size.resolved(), Some((64.0, 32.0)));
}

#[test]
fn falls_back_to_view_box_as_a_pair() {
  // A lone width is not enough; the viewBox supplies both dimensions.
  let size = get_size(r#"<svg width="640" viewBox="0 0 10 20"></svg>"#);
  assert_eq!(size.resolved(), Some((10.0, 20.0)));
}

#[test]
fn view_box_alone_resolves() {
  let size = get_size(r#"<svg viewBox="-8 -8 16.5 16.5"></svg>"#);
  assert_eq!(size.resolved(), Some((16.5, 16.5)));
}

#[test]
fn one_attribute_alone_yields_the_empty_record() {
  // A lone width never produces a one-sided record; the whole record
  // stays empty.
  let size = get_size(r#"<svg width="64"></svg>"#);
  assert!(!size.is_complete());
  assert_eq!(size, SvgSize::default());
  assert_eq!(size.width, None);
  assert_eq!(size.height, None);
  assert_eq!(size.resolved(), None);
}

#[test]
fn unparseable_markup_yields_the_empty_probe() {
  assert_eq!(get_size("<svg></svg>"), SvgSize::default());
  assert_eq!(get_size("not svg at all"), SvgSize::default());
}

#[test]
fn static_probe_matches_the_free_function() {
  let markup = r#"<svg width="12.5" height="7"></svg>"#;
  assert_eq!(SvgResource::get_size(markup), get_size(markup));
  assert_eq!(
    SvgResource::get_size(markup).resolved(),
    Some((12.5, 7.0))
  );
}
