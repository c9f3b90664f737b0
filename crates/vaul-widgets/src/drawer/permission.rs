#![forbid(unsafe_code)]

//! Scroll-versus-drag disambiguation.
//!
//! Drawer content often scrolls. A pointer moving inside a scroll container
//! should scroll that container until it reaches the edge facing the
//! drawer's closing direction; only then does the drawer itself move.
//!
//! The check runs on every move event because scroll offsets change during
//! the very interaction being classified.

use vaul_core::{Direction, DragEnvironment, NodeId};

/// Whether a move targeting `target` may drag the drawer.
///
/// Walks from `target` up through its ancestors, stopping after `boundary`
/// (normally the drawer surface) or at the document root. Any ancestor that
/// overflows along the drawer's axis and is not yet scrolled to its closing
/// edge (within `tolerance` pixels) vetoes the drag. An active text
/// selection also vetoes it: selections can begin after pointer-down via
/// long-press.
pub fn allows_drag(
    env: &dyn DragEnvironment,
    target: NodeId,
    direction: Direction,
    boundary: Option<NodeId>,
    tolerance: f64,
) -> bool {
    if env.has_text_selection() {
        return false;
    }

    let axis = direction.axis();
    let mut node = Some(target);
    while let Some(current) = node {
        if let Some(metrics) = env.scroll_metrics(current)
            && metrics.overflows(axis)
            && !metrics.at_closing_edge(direction, tolerance)
        {
            tracing::trace!(node = current.raw(), "drag blocked by scrollable ancestor");
            return false;
        }
        if Some(current) == boundary {
            break;
        }
        node = env.parent(current);
    }
    true
}
