use log::debug;

use crate::config::LayoutConfig;
use crate::ir::{Connection, Container, Routing, Side};

use super::{ConnectionPath, PathKind};

/// Midpoint of the requested box edge, or the box center for an unrecognized side.
pub fn anchor(container: &Container, side: Side) -> (f32, f32) {
    let (cx, cy) = container.center();
    match side {
        Side::Top => (cx, container.y),
        Side::Bottom => (cx, container.y + container.height),
        Side::Left => (container.x, cy),
        Side::Right => (container.x + container.width, cy),
        Side::Center => (cx, cy),
    }
}

/// Point where the ray from the box center towards `(dx, dy)` leaves the box.
///
/// `t = min(halfW / |dx|, halfH / |dy|)` with division by zero treated as infinity.
pub fn clip_to_edge(container: &Container, dx: f32, dy: f32) -> (f32, f32) {
    let (cx, cy) = container.center();
    let half_w = container.width.abs() / 2.0;
    let half_h = container.height.abs() / 2.0;
    let tx = if dx == 0.0 { f32::INFINITY } else { half_w / dx.abs() };
    let ty = if dy == 0.0 { f32::INFINITY } else { half_h / dy.abs() };
    let t = tx.min(ty);
    if !t.is_finite() {
        return (cx, cy);
    }
    (cx + dx * t, cy + dy * t)
}

/// Whether both ends of a link sit inside the same visual cluster.
pub fn is_internal(connection: &Connection, config: &LayoutConfig) -> bool {
    match connection.routing {
        Routing::Internal => true,
        Routing::Orthogonal => false,
        Routing::Auto => config.internal_cluster_prefixes.iter().any(|prefix| {
            !prefix.is_empty()
                && connection.from_id.starts_with(prefix.as_str())
                && connection.to_id.starts_with(prefix.as_str())
        }),
    }
}

/// Drawable path for a connection, or `None` when an endpoint does not exist.
pub fn route(
    connection: &Connection,
    containers: &[Container],
    config: &LayoutConfig,
) -> Option<ConnectionPath> {
    let from = containers.iter().find(|c| c.id == connection.from_id);
    let to = containers.iter().find(|c| c.id == connection.to_id);
    let (Some(from), Some(to)) = (from, to) else {
        debug!(
            connection = connection.id.as_str(),
            from = connection.from_id.as_str(),
            to = connection.to_id.as_str();
            "Skipping connection with dangling endpoint"
        );
        return None;
    };

    if is_internal(connection, config) {
        Some(internal_path(from, to))
    } else {
        Some(orthogonal_path(from, connection.from_side, to, connection.to_side))
    }
}

/// L-shaped route: vertical run to the midline between both anchors, horizontal run, then
/// vertical into the target anchor.
pub fn orthogonal_path(from: &Container, from_side: Side, to: &Container, to_side: Side) -> ConnectionPath {
    let start = anchor(from, from_side);
    let end = anchor(to, to_side);
    let mid_y = (start.1 + end.1) / 2.0;
    ConnectionPath {
        kind: PathKind::Orthogonal,
        points: vec![start, (start.0, mid_y), (end.0, mid_y), end],
    }
}

/// Straight center-to-center line clipped to both box boundaries.
pub fn internal_path(from: &Container, to: &Container) -> ConnectionPath {
    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    let dx = tx - fx;
    let dy = ty - fy;
    ConnectionPath {
        kind: PathKind::Internal,
        points: vec![clip_to_edge(from, dx, dy), clip_to_edge(to, -dx, -dy)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(id: &str, x: f32, y: f32, w: f32, h: f32) -> Container {
        Container::new(id, x, y, w, h)
    }

    #[test]
    fn anchors_sit_on_edge_midpoints() {
        let c = boxed("a", 10.0, 20.0, 100.0, 50.0);
        assert_eq!(anchor(&c, Side::Top), (60.0, 20.0));
        assert_eq!(anchor(&c, Side::Bottom), (60.0, 70.0));
        assert_eq!(anchor(&c, Side::Left), (10.0, 45.0));
        assert_eq!(anchor(&c, Side::Right), (110.0, 45.0));
        assert_eq!(anchor(&c, Side::Center), (60.0, 45.0));
    }

    #[test]
    fn orthogonal_path_bends_at_anchor_midline() {
        let from = boxed("a", 0.0, 0.0, 100.0, 50.0);
        let to = boxed("b", 0.0, 200.0, 100.0, 50.0);
        let path = orthogonal_path(&from, Side::Bottom, &to, Side::Top);
        assert_eq!(path.kind, PathKind::Orthogonal);
        assert_eq!(path.points.len(), 4);
        assert_eq!(path.points[1].1, 125.0);
        assert_eq!(path.points[2].1, 125.0);
        assert_eq!(path.points[0], (50.0, 50.0));
        assert_eq!(path.points[3], (50.0, 200.0));
    }

    #[test]
    fn internal_path_touches_box_boundaries() {
        let from = boxed("bp-a", 0.0, 0.0, 100.0, 50.0);
        let to = boxed("bp-b", 300.0, 0.0, 100.0, 50.0);
        let path = internal_path(&from, &to);
        assert_eq!(path.kind, PathKind::Internal);
        let expected = [(100.0, 25.0), (300.0, 25.0)];
        for (point, want) in path.points.iter().zip(expected) {
            assert!((point.0 - want.0).abs() < 1e-3, "{point:?} != {want:?}");
            assert!((point.1 - want.1).abs() < 1e-3, "{point:?} != {want:?}");
        }
    }

    #[test]
    fn clip_handles_diagonal_and_degenerate_directions() {
        let c = boxed("c", 0.0, 0.0, 100.0, 50.0);
        // Steeper than the box diagonal: exits through the bottom edge.
        let (x, y) = clip_to_edge(&c, 10.0, 100.0);
        assert!((y - 50.0).abs() < 1e-4);
        assert!((x - 52.5).abs() < 1e-4);
        assert_eq!(clip_to_edge(&c, 0.0, 0.0), (50.0, 25.0));
    }

    #[test]
    fn dangling_endpoint_yields_no_path() {
        let containers = vec![boxed("a", 0.0, 0.0, 10.0, 10.0)];
        let connection = Connection::new("c1", "a", "ghost", Side::Bottom, Side::Top);
        assert!(route(&connection, &containers, &LayoutConfig::default()).is_none());
    }

    #[test]
    fn cluster_prefix_selects_internal_routing() {
        let config = LayoutConfig::default();
        let containers = vec![
            boxed("bp-order", 0.0, 0.0, 80.0, 40.0),
            boxed("bp-invoice", 200.0, 0.0, 80.0, 40.0),
            boxed("sf-system-erp", 0.0, 200.0, 80.0, 40.0),
        ];
        let inner = Connection::new("c1", "bp-order", "bp-invoice", Side::Right, Side::Left);
        let cross = Connection::new("c2", "bp-order", "sf-system-erp", Side::Bottom, Side::Top);
        assert_eq!(route(&inner, &containers, &config).unwrap().kind, PathKind::Internal);
        assert_eq!(route(&cross, &containers, &config).unwrap().kind, PathKind::Orthogonal);

        let mut forced = cross.clone();
        forced.routing = Routing::Internal;
        assert_eq!(route(&forced, &containers, &config).unwrap().kind, PathKind::Internal);
    }
}
