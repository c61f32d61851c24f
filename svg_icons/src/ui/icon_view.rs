use super::size::IconSize;
use crate::cache::{IconCache, SharedIcon};
use crate::error::IconResult;
use crate::sanitize::{sanitize_svg, TrustedMarkup};
use crate::utils::escape_attr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Declarative inputs supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconInputs {
    pub name: String,
    /// Inline SVG; when non-empty it is rendered instead of the named icon
    pub svg: String,
    pub size: IconSize,
    pub aria_label: Option<String>,
}

impl IconInputs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn inline(svg: impl Into<String>) -> Self {
        Self {
            svg: svg.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: IconSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }
}

/// Computed output of an [`IconView`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedIcon {
    pub markup: TrustedMarkup,
    pub size_class: Option<String>,
    pub pixel_size: Option<u32>,
    pub role: Option<&'static str>,
    pub aria_label: Option<String>,
    pub aria_hidden: bool,
}

impl RenderedIcon {
    /// Host element markup wrapping the icon
    pub fn to_html(&self) -> String {
        let mut class = String::from("icon");
        if let Some(size_class) = &self.size_class {
            class.push(' ');
            class.push_str(size_class);
        }

        let mut html = format!("<span class=\"{}\"", class);
        if let Some(role) = self.role {
            html.push_str(&format!(" role=\"{}\"", role));
        }
        if let Some(label) = &self.aria_label {
            html.push_str(&format!(" aria-label=\"{}\"", escape_attr(label)));
        }
        if self.aria_hidden {
            html.push_str(" aria-hidden=\"true\"");
        }
        if let Some(px) = self.pixel_size {
            html.push_str(&format!(" style=\"width:{px}px;height:{px}px\""));
        }
        html.push('>');
        html.push_str(self.markup.as_str());
        html.push_str("</span>");
        html
    }
}

/// Where the current markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Inline(String),
    Named(String),
}

/// Renders inline SVG or an icon obtained from an [`IconCache`].
///
/// Every call to [`IconView::set_inputs`] re-derives the output. When the
/// requested name changes, the view detaches from the previous fetch and only
/// the latest name's result is ever shown; fetch failures render as an empty
/// placeholder. The view never fetches or mutates the cache itself.
///
/// Named icons resolve on a Tokio task, so inputs must be set from within a
/// runtime.
pub struct IconView {
    cache: Arc<IconCache>,
    inputs: IconInputs,
    source: Option<Source>,
    generation: Arc<AtomicU64>,
    output: Arc<watch::Sender<RenderedIcon>>,
    listener: Option<JoinHandle<()>>,
}

impl IconView {
    pub fn new(cache: Arc<IconCache>) -> Self {
        let (output, _) = watch::channel(RenderedIcon {
            aria_hidden: true,
            ..RenderedIcon::default()
        });
        Self {
            cache,
            inputs: IconInputs::default(),
            source: None,
            generation: Arc::new(AtomicU64::new(0)),
            output: Arc::new(output),
            listener: None,
        }
    }

    /// Create a view and apply its first inputs
    pub fn with_inputs(cache: Arc<IconCache>, inputs: IconInputs) -> Self {
        let mut view = Self::new(cache);
        view.set_inputs(inputs);
        view
    }

    pub fn inputs(&self) -> &IconInputs {
        &self.inputs
    }

    /// Replace all inputs and re-derive the rendered output
    pub fn set_inputs(&mut self, inputs: IconInputs) {
        let source = if inputs.svg.trim().is_empty() {
            Source::Named(self.cache.normalize(&inputs.name))
        } else {
            Source::Inline(inputs.svg.clone())
        };

        let (role, aria_label, aria_hidden) = accessibility(inputs.aria_label.as_deref());
        let size_class = inputs.size.css_class();
        let pixel_size = inputs.size.pixels();
        self.inputs = inputs;

        let markup = if self.source.as_ref() != Some(&source) {
            let markup = self.switch_source(&source);
            self.source = Some(source);
            Some(markup)
        } else {
            None
        };

        self.output.send_modify(|rendered| {
            rendered.size_class = size_class;
            rendered.pixel_size = pixel_size;
            rendered.role = role;
            rendered.aria_label = aria_label;
            rendered.aria_hidden = aria_hidden;
            if let Some(markup) = markup {
                rendered.markup = markup;
            }
        });
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let inputs = IconInputs {
            name: name.into(),
            ..self.inputs.clone()
        };
        self.set_inputs(inputs);
    }

    /// Snapshot of the current output
    pub fn render(&self) -> RenderedIcon {
        self.output.borrow().clone()
    }

    /// Receiver notified whenever the output changes
    pub fn subscribe(&self) -> watch::Receiver<RenderedIcon> {
        self.output.subscribe()
    }

    /// Wait until the current named icon has been applied (or failed)
    pub async fn settled(&mut self) {
        if let Some(listener) = self.listener.take() {
            if let Err(e) = listener.await {
                log::debug!("Icon listener ended early: {}", e);
            }
        }
    }

    /// Detach from the previous source and return the markup to show now
    fn switch_source(&mut self, source: &Source) -> TrustedMarkup {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(listener) = self.listener.take() {
            // Stop listening only; the fetch itself keeps running in the cache
            listener.abort();
        }

        let name = match source {
            Source::Inline(svg) => return sanitize_svg(svg),
            Source::Named(name) if name.is_empty() => return TrustedMarkup::empty(),
            Source::Named(name) => name.clone(),
        };

        let handle = self.cache.get(&name);
        if let Some(result) = handle.peek() {
            return markup_or_placeholder(&name, result.clone());
        }

        self.listener = Some(tokio::spawn(listen(
            handle,
            name,
            generation,
            Arc::clone(&self.generation),
            Arc::clone(&self.output),
        )));
        TrustedMarkup::empty()
    }
}

impl Drop for IconView {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Apply a fetch result unless a newer source has replaced it
async fn listen(
    handle: SharedIcon,
    name: String,
    generation: u64,
    current: Arc<AtomicU64>,
    output: Arc<watch::Sender<RenderedIcon>>,
) {
    let markup = markup_or_placeholder(&name, handle.await);
    output.send_if_modified(|rendered| {
        if current.load(Ordering::SeqCst) != generation {
            log::debug!("Dropping stale result for icon '{}'", name);
            return false;
        }
        rendered.markup = markup;
        true
    });
}

fn markup_or_placeholder(name: &str, result: IconResult<TrustedMarkup>) -> TrustedMarkup {
    result.unwrap_or_else(|e| {
        log::debug!("Rendering placeholder for icon '{}': {}", name, e);
        TrustedMarkup::empty()
    })
}

/// Role, label and hidden flag for an optional accessible label
fn accessibility(label: Option<&str>) -> (Option<&'static str>, Option<String>, bool) {
    match label.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => (Some("img"), Some(label.to_string()), false),
        None => (None, None, true),
    }
}

#[cfg(test)]
#[path = "icon_view_tests.rs"]
mod tests;
