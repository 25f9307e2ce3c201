//! Caret geometry: from a character range to an overlay anchor.
//!
//! The raw anchor is the horizontal midpoint of the selection box at the top
//! of its first line, in the widget's visible coordinates. The clip policy is
//! checked against the widget's own box `(0, 0, width, height)` before the
//! overlay offsets are subtracted, then the point is translated into the
//! requested coordinate space.

use core_events::WidgetId;
use core_geometry::{Point, Position, Rect};
use core_host::{MirrorHost, SelectionRange, TextHost};
use tracing::debug;

use crate::config::{ClipPolicy, CoordinateSpace, ResolveOptions};
use crate::mirror::measure;

/// Anchor for `[start, end)` in `widget`, or `None` when the selection is not
/// measurable or is clipped away. Endpoints may be given in either order.
pub fn resolve<H>(
    host: &mut H,
    widget: WidgetId,
    start: usize,
    end: usize,
    options: &ResolveOptions,
) -> Option<Position>
where
    H: TextHost + MirrorHost + ?Sized,
{
    resolve_with(host, widget, SelectionRange::new(start, end), options)
}

pub fn resolve_with<H>(
    host: &mut H,
    widget: WidgetId,
    range: SelectionRange,
    options: &ResolveOptions,
) -> Option<Position>
where
    H: TextHost + MirrorHost + ?Sized,
{
    let text = host.text(widget);
    let (before, selected) = core_text::split_selection(&text, range.start, range.end);
    let marker = match measure(host, widget, before, selected) {
        Ok(rect) => rect,
        Err(err) => {
            debug!(target: "selection.resolver", widget = %widget, error = %err, "measure_failed");
            return None;
        }
    };
    let widget_box = host.bounding_rect(widget)?;

    let raw = Point::new(marker.center_x(), marker.top);
    let visible = Rect::new(0.0, 0.0, widget_box.width, widget_box.height);
    let Some(local) = clip(raw, visible, options.clip) else {
        debug!(target: "selection.resolver", widget = %widget, x = raw.x, y = raw.y, "anchor_clipped");
        return None;
    };

    let origin = space_origin(host, widget_box, options.space)?;
    Some(Position::new(
        origin.x + local.x - options.offset_left,
        origin.y + local.y - options.offset_top,
    ))
}

/// Apply `policy` to a point in box-local coordinates.
pub fn clip(point: Point, bounds: Rect, policy: ClipPolicy) -> Option<Point> {
    if bounds.contains(point) {
        return Some(point);
    }
    match policy {
        ClipPolicy::Hide => None,
        ClipPolicy::ClampToEdge { inset } => {
            let y = if point.y < bounds.top {
                bounds.top + inset
            } else if point.y > bounds.bottom() {
                bounds.bottom() - inset
            } else {
                point.y
            };
            let x = point.x.max(bounds.left).min(bounds.right());
            Some(Point::new(x, y))
        }
    }
}

/// Origin of the widget's border box in the target space.
fn space_origin<H>(host: &H, widget_box: Rect, space: CoordinateSpace) -> Option<Point>
where
    H: TextHost + ?Sized,
{
    match space {
        CoordinateSpace::Document => {
            let scroll = host.page_scroll();
            Some(Point::new(widget_box.left + scroll.x, widget_box.top + scroll.y))
        }
        CoordinateSpace::Container(container) => {
            let Some(container_box) = host.bounding_rect(container) else {
                debug!(target: "selection.resolver", container = %container, "container_detached");
                return None;
            };
            Some(Point::new(
                widget_box.left - container_box.left,
                widget_box.top - container_box.top,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOX: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn inside_point_is_untouched() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(clip(p, BOX, ClipPolicy::Hide), Some(p));
        assert_eq!(clip(p, BOX, ClipPolicy::ClampToEdge { inset: 10.0 }), Some(p));
    }

    #[test]
    fn edges_count_as_inside() {
        assert!(clip(Point::new(100.0, 50.0), BOX, ClipPolicy::Hide).is_some());
        assert!(clip(Point::new(0.0, 0.0), BOX, ClipPolicy::Hide).is_some());
    }

    #[test]
    fn hide_drops_outside_points() {
        assert_eq!(clip(Point::new(10.0, -1.0), BOX, ClipPolicy::Hide), None);
        assert_eq!(clip(Point::new(101.0, 10.0), BOX, ClipPolicy::Hide), None);
    }

    #[test]
    fn clamp_pulls_inside_by_inset() {
        let policy = ClipPolicy::ClampToEdge { inset: 10.0 };
        assert_eq!(clip(Point::new(20.0, -30.0), BOX, policy), Some(Point::new(20.0, 10.0)));
        assert_eq!(clip(Point::new(20.0, 90.0), BOX, policy), Some(Point::new(20.0, 40.0)));
        assert_eq!(clip(Point::new(150.0, 20.0), BOX, policy), Some(Point::new(100.0, 20.0)));
        assert_eq!(clip(Point::new(-5.0, 70.0), BOX, policy), Some(Point::new(0.0, 40.0)));
    }

    proptest! {
        #[test]
        fn clamp_result_stays_in_box(x in -500.0f64..500.0, y in -500.0f64..500.0, inset in 0.0f64..25.0) {
            let p = clip(Point::new(x, y), BOX, ClipPolicy::ClampToEdge { inset });
            let p = p.unwrap();
            prop_assert!(BOX.contains(p));
        }
    }
}
