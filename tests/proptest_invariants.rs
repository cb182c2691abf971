//! Property-based invariants for label wrapping, routing geometry, the customer overlay and
//! zoom.
//!
//! 1. A label that fits collapses to exactly one line equal to the hint-stripped text.
//! 2. Wrapping never produces more than three lines.
//! 3. No wrapped line contains a doubled hyphen.
//! 4. Anchors lie on the named edge of the box.
//! 5. Clipped internal endpoints stay inside the owning box.
//! 6. Applying a customer config twice equals applying it once.
//! 7. Zoom never leaves its configured range.

use archtour::config::{LayoutConfig, ZoomConfig};
use archtour::customer::{CustomerConfig, CustomerMapping, apply_customer_config};
use archtour::ir::{Container, Diagram, Side};
use archtour::layout::{anchor, clip_to_edge, max_chars_per_line, strip_break_hints, wrap_label};
use archtour::tour::ZoomController;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-zÄÖÜäöüß]{1,14}",
        "[A-Za-z]{1,8}-[A-Za-z]{1,8}",
        "[A-Za-z]{2,8}(station|system|anlage)",
    ]
}

/// Labels made of words separated by plain spaces or `" / "` break hints.
fn label_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((word_strategy(), prop::bool::ANY), 1..6).prop_map(|words| {
        let mut label = String::new();
        for (idx, (word, hinted)) in words.iter().enumerate() {
            if idx > 0 {
                label.push_str(if *hinted { " / " } else { " " });
            }
            label.push_str(word);
        }
        label
    })
}

fn box_strategy() -> impl Strategy<Value = Container> {
    (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..400.0, 1.0f32..400.0)
        .prop_map(|(x, y, w, h)| Container::new("box", x, y, w, h))
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Top),
        Just(Side::Bottom),
        Just(Side::Left),
        Just(Side::Right),
    ]
}

fn mapped_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "sf-device-[a-z]{1,6}",
        "sf-system-[a-z]{1,6}",
        "bp-[a-z]{1,6}",
        "[a-z]{1,8}",
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Short labels collapse to one line
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fitting_label_is_one_stripped_line(
        label in label_strategy(),
        width in 20.0f32..600.0,
        font_size in 8.0f32..24.0,
    ) {
        let config = LayoutConfig::default();
        let stripped = strip_break_hints(&label);
        let max_chars = max_chars_per_line(width, font_size, &config);
        prop_assume!(stripped.chars().count() <= max_chars);
        prop_assert_eq!(wrap_label(&label, width, font_size, &config), vec![stripped]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Line count bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapping_never_exceeds_three_lines(
        label in label_strategy(),
        width in 0.0f32..400.0,
        font_size in 1.0f32..40.0,
    ) {
        let lines = wrap_label(&label, width, font_size, &LayoutConfig::default());
        prop_assert!(lines.len() <= 3, "{} lines for {:?}", lines.len(), label);
        prop_assert!(!lines.is_empty());
    }

    #[test]
    fn empty_label_wraps_to_nothing(width in 0.0f32..400.0, font_size in 1.0f32..40.0) {
        prop_assert!(wrap_label("", width, font_size, &LayoutConfig::default()).is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. No doubled hyphens
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_line_contains_double_hyphen(
        label in label_strategy(),
        width in 20.0f32..300.0,
        font_size in 8.0f32..24.0,
    ) {
        for line in wrap_label(&label, width, font_size, &LayoutConfig::default()) {
            prop_assert!(!line.contains("--"), "line {:?} from {:?}", line, label);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Anchors on the named edge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn anchor_lies_on_named_edge(container in box_strategy(), side in side_strategy()) {
        let (x, y) = anchor(&container, side);
        let right = container.x + container.width;
        let bottom = container.y + container.height;
        match side {
            Side::Top => prop_assert_eq!(y, container.y),
            Side::Bottom => prop_assert_eq!(y, bottom),
            Side::Left => prop_assert_eq!(x, container.x),
            Side::Right => prop_assert_eq!(x, right),
            Side::Center => unreachable!(),
        }
        prop_assert!(x >= container.x && x <= right);
        prop_assert!(y >= container.y && y <= bottom);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Clipped endpoints inside the box
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clipped_point_stays_inside_box(
        container in box_strategy(),
        dx in -1000.0f32..1000.0,
        dy in -1000.0f32..1000.0,
    ) {
        let (x, y) = clip_to_edge(&container, dx, dy);
        let tolerance = 1e-3 * (1.0 + container.x.abs().max(container.y.abs()) + container.width.max(container.height));
        prop_assert!(x >= container.x - tolerance && x <= container.x + container.width + tolerance);
        prop_assert!(y >= container.y - tolerance && y <= container.y + container.height + tolerance);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Customer overlay idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn customer_overlay_is_idempotent(
        ids in prop::collection::btree_set(mapped_id_strategy(), 1..12),
        mapped_mask in prop::collection::vec(prop::bool::ANY, 12),
    ) {
        let mut diagram = Diagram::new();
        let mut config = CustomerConfig {
            customer_key: "acme".to_string(),
            customer_name: "Acme".to_string(),
            ..CustomerConfig::default()
        };
        for (idx, id) in ids.iter().enumerate() {
            diagram.containers.push(Container::new(id, idx as f32 * 10.0, 0.0, 100.0, 40.0));
            if !mapped_mask[idx] {
                continue;
            }
            let mapping = CustomerMapping::new(id, &format!("Label {idx}"), "key");
            if id.starts_with("sf-device-") {
                config.sf_devices.push(mapping);
            } else if id.starts_with("sf-system-") {
                config.sf_systems.push(mapping);
            } else if id.starts_with("bp-") {
                config.bp_processes.push(mapping);
            }
        }
        let once = apply_customer_config(&diagram, &config);
        let twice = apply_customer_config(&once, &config);
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Zoom clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_stays_in_range(moves in prop::collection::vec(prop::bool::ANY, 0..80)) {
        let config = ZoomConfig::default();
        let mut zoom = ZoomController::new(config.clone());
        for zoom_in in moves {
            let value = if zoom_in { zoom.zoom_in() } else { zoom.zoom_out() };
            prop_assert!(value >= config.min && value <= config.max, "zoom {} out of range", value);
        }
    }
}
