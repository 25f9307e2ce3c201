//! Off-screen mirror measurement.
//!
//! The host cannot report the box of a character range inside a text control,
//! so a hidden node is styled like the widget, filled with the text before
//! the selection plus a marker wrapping the selection, laid out, and the
//! marker's box read back. The node is attached only for the duration of one
//! measurement; `AttachedMirror` detaches it on every exit path.

use core_events::WidgetId;
use core_geometry::{Rect, TextStyle, WhiteSpace};
use core_host::{MirrorHost, MirrorNode, MirrorStyle, TextHost};
use thiserror::Error;
use tracing::trace;

/// Marker content for a collapsed range so the marker still produces a box.
pub const EMPTY_MARKER_PLACEHOLDER: &str = ".";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeasureError {
    #[error("computed style unavailable for widget {0}")]
    StyleUnavailable(WidgetId),
    #[error("widget {0} is not attached to a renderable tree")]
    Detached(WidgetId),
    #[error("host cannot create off-screen mirrors")]
    MirrorUnavailable,
    #[error("mirror could not be attached next to widget {0}")]
    AttachRefused(WidgetId),
    #[error("mirror produced no layout")]
    NoLayout,
}

/// Mirror inserted into the tree. Detaches on drop.
struct AttachedMirror<'h, H: MirrorHost + ?Sized> {
    host: &'h mut H,
    node: H::Mirror,
}

impl<'h, H: MirrorHost + ?Sized> AttachedMirror<'h, H> {
    fn attach(host: &'h mut H, mut node: H::Mirror, anchor: WidgetId) -> Result<Self, MeasureError> {
        if !host.attach(&mut node, anchor) {
            return Err(MeasureError::AttachRefused(anchor));
        }
        Ok(Self { host, node })
    }

    fn rects(&self) -> Option<(Rect, Rect)> {
        let container = self.host.container_rect(&self.node)?;
        let marker = self.host.marker_rect(&self.node)?;
        Some((container, marker))
    }
}

impl<H: MirrorHost + ?Sized> Drop for AttachedMirror<'_, H> {
    fn drop(&mut self) {
        self.host.detach(&mut self.node);
    }
}

/// Style for a mirror of a widget whose border box is `border_width` wide.
///
/// Layout properties are copied as-is. `white-space: normal` is upgraded to
/// `pre-wrap` so spaces and newlines in the value survive the way a text
/// control renders them; non-wrapping modes stay non-wrapping so single-line
/// inputs are not folded.
pub fn mirror_style(style: &TextStyle, border_width: f64) -> MirrorStyle {
    let white_space = match style.white_space {
        WhiteSpace::Normal => WhiteSpace::PreWrap,
        other => other,
    };
    MirrorStyle {
        text: TextStyle {
            white_space,
            ..style.clone()
        },
        width: style.css_width_for_border_box(border_width),
        hidden: true,
        interactive: false,
    }
}

/// Box of `selected` (as laid out after `before`) in `widget`'s visible
/// coordinates: relative to the widget's border-box origin with its content
/// scroll already taken out.
pub fn measure<H>(host: &mut H, widget: WidgetId, before: &str, selected: &str) -> Result<Rect, MeasureError>
where
    H: TextHost + MirrorHost + ?Sized,
{
    let style = host
        .computed_style(widget)
        .ok_or(MeasureError::StyleUnavailable(widget))?;
    let border_box = host.bounding_rect(widget).ok_or(MeasureError::Detached(widget))?;
    let scroll = host.scroll_offset(widget);

    let mut node = host
        .create_offscreen_mirror()
        .ok_or(MeasureError::MirrorUnavailable)?;
    node.apply_style(&mirror_style(&style, border_box.width));
    let marker = if selected.is_empty() {
        EMPTY_MARKER_PLACEHOLDER
    } else {
        selected
    };
    node.set_content(before, marker);

    let (container, marker_box) = {
        let attached = AttachedMirror::attach(host, node, widget)?;
        attached.rects().ok_or(MeasureError::NoLayout)?
    };

    let local = marker_box
        .relative_to(container.origin())
        .translate(-scroll.x, -scroll.y);
    trace!(
        target: "selection.mirror",
        widget = %widget,
        left = local.left,
        top = local.top,
        width = local.width,
        height = local.height,
        "measured"
    );
    Ok(local)
}
