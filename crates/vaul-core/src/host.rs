#![forbid(unsafe_code)]

//! Queries the drawer makes against the host element tree.
//!
//! The gesture engine never touches a DOM directly. Whatever owns the real
//! widget tree implements [`DragEnvironment`] and passes it to each pointer
//! handler. Methods take `&self`: host handles behave like shared references
//! into a tree the host mutates on its own schedule.

use crate::direction::Direction;
use crate::event::{NodeId, PointerId};
use crate::geometry::{Axis, Size};

/// Scroll geometry of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_height: f64,
    pub scroll_width: f64,
    pub client_height: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    /// Whether the content is larger than the viewport along `axis`.
    pub fn overflows(&self, axis: Axis) -> bool {
        match axis {
            Axis::Vertical => self.scroll_height > self.client_height,
            Axis::Horizontal => self.scroll_width > self.client_width,
        }
    }

    /// Whether the container is scrolled to the edge past which further
    /// movement in the closing direction of `direction` would drag the drawer
    /// rather than scroll the content.
    ///
    /// A bottom drawer closes downward, which a scroll container only yields
    /// once scrolled to its top; a top drawer needs the container at its
    /// bottom. `tolerance` absorbs sub-pixel scroll offsets.
    pub fn at_closing_edge(&self, direction: Direction, tolerance: f64) -> bool {
        match direction {
            Direction::Bottom => self.scroll_top <= tolerance,
            Direction::Top => {
                self.scroll_top + self.client_height >= self.scroll_height - tolerance
            }
            Direction::Right => self.scroll_left <= tolerance,
            Direction::Left => {
                self.scroll_left + self.client_width >= self.scroll_width - tolerance
            }
        }
    }
}

/// Host tree queries used while a drag is in flight.
pub trait DragEnvironment {
    /// Whether the document currently has a non-empty text selection.
    fn has_text_selection(&self) -> bool;

    /// Route subsequent events for `pointer` to `target` until release.
    fn capture_pointer(&self, target: NodeId, pointer: PointerId);

    /// Parent of `node`, or `None` at the document root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Scroll geometry for `node` if it is a scroll container
    /// (`overflow: auto | scroll` on some axis), `None` otherwise.
    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics>;

    /// Size of the layout viewport.
    fn viewport(&self) -> Size;
}
