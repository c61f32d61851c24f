//! Trust boundary between raw SVG text and markup that is safe to render
//!
//! The input is parsed as XML and rebuilt from an allowlist of SVG elements and
//! attributes. Anything not on the lists is dropped, along with everything
//! nested inside a dropped element. Attribute values are entity-decoded before
//! they are checked, and written back re-escaped.

use crate::error::{IconError, IconResult};
use lazy_static::lazy_static;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    static ref ALLOWED_ELEMENTS: HashSet<&'static str> = [
        "svg", "g", "defs", "symbol", "use", "title", "desc",
        "path", "circle", "ellipse", "line", "polyline", "polygon", "rect",
        "text", "tspan",
        "linearGradient", "radialGradient", "stop", "clipPath", "mask", "pattern", "marker",
        "filter", "feGaussianBlur", "feOffset", "feBlend", "feFlood", "feComposite",
        "feMerge", "feMergeNode", "feColorMatrix",
    ]
    .into_iter()
    .collect();
    static ref ALLOWED_ATTRIBUTES: HashSet<&'static str> = [
        "xmlns", "xmlns:xlink", "version", "id", "class", "role", "focusable",
        "aria-hidden", "aria-label", "viewBox", "preserveAspectRatio",
        "width", "height", "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "r", "rx", "ry",
        "fx", "fy", "dx", "dy", "d", "points", "transform",
        "fill", "fill-rule", "fill-opacity", "stroke", "stroke-width", "stroke-linecap",
        "stroke-linejoin", "stroke-miterlimit", "stroke-dasharray", "stroke-dashoffset",
        "stroke-opacity", "opacity", "color", "display", "visibility",
        "clip-path", "clip-rule", "mask", "filter",
        "offset", "stop-color", "stop-opacity", "gradientUnits", "gradientTransform",
        "spreadMethod", "clipPathUnits", "maskUnits", "patternUnits", "patternTransform",
        "marker-start", "marker-mid", "marker-end", "markerWidth", "markerHeight",
        "refX", "refY", "orient",
        "font-family", "font-size", "font-weight", "text-anchor", "dominant-baseline",
        "in", "in2", "result", "stdDeviation", "mode", "operator", "type", "values",
        "flood-color", "flood-opacity", "filterUnits",
        "href", "xlink:href",
    ]
    .into_iter()
    .collect();
    static ref URL_REFERENCE: Regex = Regex::new(r#"(?i)url\(\s*['"]?\s*(.?)"#).unwrap();
}

/// SVG markup that has passed through [`sanitize_svg`].
///
/// The only ways to obtain one are sanitization and the empty placeholder.
/// It has no conversion back into `String`.
#[derive(Clone, PartialEq, Eq)]
pub struct TrustedMarkup(Arc<str>);

impl TrustedMarkup {
    /// The empty placeholder rendered for missing or broken icons
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow the markup for writing into rendered output
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TrustedMarkup {
    fn default() -> Self {
        TrustedMarkup(Arc::from(""))
    }
}

impl fmt::Debug for TrustedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustedMarkup({} bytes)", self.0.len())
    }
}

/// Sanitize a fetched document, rejecting anything without an `<svg>` root
pub fn sanitize_svg_document(raw: &str) -> IconResult<TrustedMarkup> {
    let mut cleaner = Cleaner::default();
    let markup = cleaner.run(raw)?;
    if cleaner.removed > 0 {
        log::warn!(
            "Sanitizer removed {} unsafe fragment(s) from SVG",
            cleaner.removed
        );
    }
    Ok(TrustedMarkup(Arc::from(markup)))
}

/// Sanitize inline SVG; input that is not a well-formed SVG renders as nothing
pub fn sanitize_svg(raw: &str) -> TrustedMarkup {
    if raw.trim().is_empty() {
        return TrustedMarkup::empty();
    }
    sanitize_svg_document(raw).unwrap_or_else(|e| {
        log::warn!("Discarding inline SVG: {}", e);
        TrustedMarkup::empty()
    })
}

#[derive(Default)]
struct Cleaner {
    /// Names of the kept elements currently open
    open: Vec<String>,
    /// Nesting depth inside a dropped element
    skip_depth: usize,
    seen_root: bool,
    removed: usize,
}

impl Cleaner {
    fn run(&mut self, raw: &str) -> IconResult<String> {
        let mut reader = Reader::from_str(raw);
        let mut writer = Writer::new(Vec::new());

        loop {
            let event = reader.read_event().map_err(|e| {
                IconError::Malformed(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            let output = match event {
                Event::Start(start) => self.open_element(&start, false)?,
                Event::Empty(empty) => self.open_element(&empty, true)?,
                Event::End(_) => self.close_element(),
                Event::Text(text) if self.in_kept_content() => {
                    let text = text
                        .unescape()
                        .map_err(|e| IconError::Malformed(e.to_string()))?;
                    Some(Event::Text(BytesText::new(&text).into_owned()))
                }
                Event::CData(cdata) if self.in_kept_content() => {
                    let text = String::from_utf8_lossy(&cdata).into_owned();
                    Some(Event::Text(BytesText::new(&text).into_owned()))
                }
                Event::Eof => break,
                _ => None,
            };

            if let Some(output) = output {
                writer
                    .write_event(output)
                    .map_err(|e| IconError::Malformed(e.to_string()))?;
            }
            if self.seen_root && self.open.is_empty() && self.skip_depth == 0 {
                break;
            }
        }

        if !self.seen_root {
            return Err(IconError::Malformed("no <svg> root element".to_string()));
        }
        if !self.open.is_empty() || self.skip_depth > 0 {
            return Err(IconError::Malformed("unexpected end of document".to_string()));
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| IconError::Malformed(e.to_string()))
    }

    fn in_kept_content(&self) -> bool {
        !self.open.is_empty() && self.skip_depth == 0
    }

    fn open_element(
        &mut self,
        element: &BytesStart<'_>,
        empty: bool,
    ) -> IconResult<Option<Event<'static>>> {
        let raw_name = element.name();
        let name = std::str::from_utf8(raw_name.as_ref())
            .map_err(|e| IconError::Malformed(e.to_string()))?;

        if !self.seen_root {
            if !name.eq_ignore_ascii_case("svg") {
                return Err(IconError::Malformed(format!(
                    "root element is <{}>, not <svg>",
                    name
                )));
            }
            self.seen_root = true;
        }

        let name = if self.open.is_empty() { "svg" } else { name };
        if self.skip_depth > 0 || !ALLOWED_ELEMENTS.contains(name) {
            if self.skip_depth == 0 {
                self.removed += 1;
            }
            if !empty {
                self.skip_depth += 1;
            }
            return Ok(None);
        }

        let mut kept = BytesStart::new(name.to_string());
        for attr in element.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(e) => {
                    log::debug!("Stopping at malformed attribute on <{}>: {}", name, e);
                    self.removed += 1;
                    break;
                }
            };
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => {
                    self.removed += 1;
                    continue;
                }
            };
            if ALLOWED_ATTRIBUTES.contains(key.as_str()) && is_safe_value(&key, &value) {
                kept.push_attribute((key.as_str(), value.as_str()));
            } else {
                self.removed += 1;
            }
        }

        if empty {
            Ok(Some(Event::Empty(kept)))
        } else {
            self.open.push(name.to_string());
            Ok(Some(Event::Start(kept)))
        }
    }

    fn close_element(&mut self) -> Option<Event<'static>> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return None;
        }
        self.open.pop().map(|name| Event::End(BytesEnd::new(name)))
    }
}

/// Links may only point inside the document; no value may carry a script or data URL
fn is_safe_value(key: &str, value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    if compact.contains("javascript:") || compact.contains("vbscript:") || compact.contains("data:") {
        return false;
    }
    if key == "href" || key == "xlink:href" {
        return value.trim().starts_with('#');
    }
    URL_REFERENCE
        .captures_iter(value)
        .all(|caps| caps.get(1).is_some_and(|m| m.as_str() == "#"))
}
