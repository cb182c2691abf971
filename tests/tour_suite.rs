use std::path::{Path, PathBuf};

use archtour::config::Config;
use archtour::customer::apply_customer_config;
use archtour::ir::Diagram;
use archtour::layout::PathKind;
use archtour::loader::{
    load_customers, load_diagram, load_icon_table, load_steps, load_text_catalog, select_customer,
};
use archtour::render::render_svg_with;
use archtour::tour::Panel;
use archtour::{PresentationClass, RenderOptions, snapshot_step, snapshot_steps, step_count};
use float_cmp::assert_approx_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("plant")
        .join(name)
}

fn plant() -> Diagram {
    load_diagram(&fixture("diagram.json5")).expect("fixture diagram should load")
}

fn assert_valid_svg(svg: &str, label: &str) {
    assert!(svg.contains("<svg"), "{label}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{label}: missing </svg tag");
}

#[test]
fn renders_every_step_of_the_fixture() {
    let diagram = plant();
    assert!(diagram.authoring_warnings().is_empty());
    let options = RenderOptions::default();
    let count = step_count(&diagram);
    assert_eq!(count, 3);
    let indices: Vec<usize> = (0..count).collect();
    for snapshot in snapshot_steps(&diagram, &options, &indices) {
        let svg = render_svg_with(
            &snapshot,
            &options.config.theme,
            &options.config.layout,
            &options.config.render,
        );
        assert_valid_svg(&svg, &format!("step {}", snapshot.step_index));
    }
}

#[test]
fn shop_floor_step_resolves_visibility() {
    let diagram = plant();
    let snapshot = snapshot_step(&diagram, &RenderOptions::default(), 1);
    let class = |id: &str| {
        snapshot
            .container(id)
            .map(|c| c.class)
            .or_else(|| snapshot.connection(id).map(|c| c.class))
            .unwrap_or_else(|| panic!("{id} missing from snapshot"))
    };

    assert_eq!(class("sf-device-mill"), PresentationClass::Highlight);
    assert_eq!(class("sf-device-drill"), PresentationClass::Highlight);
    assert_eq!(class("sf-system-mes"), PresentationClass::None);
    assert_eq!(class("erp"), PresentationClass::Hidden);
    assert_eq!(class("mill-mes"), PresentationClass::Highlight);
    assert_eq!(class("drill-mes"), PresentationClass::None);
    assert_eq!(class("mes-erp"), PresentationClass::Hidden);
    assert!(snapshot.connection("ghost").is_none());

    let monitoring = snapshot
        .function_icons
        .iter()
        .find(|icon| icon.id == "fn-monitoring")
        .unwrap();
    assert_eq!(monitoring.class, PresentationClass::Highlight);
    let planning = snapshot
        .function_icons
        .iter()
        .find(|icon| icon.id == "fn-planning")
        .unwrap();
    assert_eq!(planning.class, PresentationClass::Hidden);
    assert_eq!(
        snapshot.panel,
        Panel::Step {
            title: "Shopfloor".to_string(),
            description: "steps.shop-floor.description".to_string(),
        }
    );
}

#[test]
fn overview_is_unstyled_and_shows_diagram_title() {
    let diagram = plant();
    let options = RenderOptions {
        locale: Some("en".to_string()),
        ..RenderOptions::default()
    };
    let snapshot = snapshot_step(&diagram, &options, 0);
    assert!(
        snapshot
            .containers
            .iter()
            .all(|c| c.class == PresentationClass::None)
    );
    assert_eq!(
        snapshot.panel,
        Panel::Overview {
            title: "Connected Manufacturing".to_string(),
            subtitle: "Vom Auftrag bis zur Auslieferung".to_string(),
        }
    );
}

#[test]
fn routes_fixture_connections() {
    let diagram = plant();
    let snapshot = snapshot_step(&diagram, &RenderOptions::default(), 0);

    let mill_mes = snapshot.connection("mill-mes").unwrap();
    assert_eq!(mill_mes.kind, PathKind::Orthogonal);
    assert_eq!(mill_mes.points.len(), 4);
    assert_approx_eq!(f32, mill_mes.points[0][0], 100.0);
    assert_approx_eq!(f32, mill_mes.points[0][1], 130.0);
    assert_approx_eq!(f32, mill_mes.points[1][1], 195.0);
    assert_approx_eq!(f32, mill_mes.points[2][1], 195.0);
    assert_approx_eq!(f32, mill_mes.points[3][0], 110.0);
    assert_approx_eq!(f32, mill_mes.points[3][1], 260.0);

    let internal = snapshot.connection("order-shipping").unwrap();
    assert_eq!(internal.kind, PathKind::Internal);
    assert_approx_eq!(f32, internal.points[0][0], 550.0, epsilon = 1e-3);
    assert_approx_eq!(f32, internal.points[0][1], 100.0, epsilon = 1e-3);
    assert_approx_eq!(f32, internal.points[1][0], 600.0, epsilon = 1e-3);
}

#[test]
fn wraps_fixture_labels() {
    let diagram = plant();
    let snapshot = snapshot_step(&diagram, &RenderOptions::default(), 0);
    let lines = |id: &str| snapshot.container(id).unwrap().label_lines.clone();
    assert_eq!(lines("sf-system-mes"), vec!["Fertigungs-", "steuerung"]);
    assert_eq!(lines("erp"), vec!["Enterprise", "Resource Planning"]);
    assert_eq!(lines("plant-floor"), vec!["Fertigungshalle"]);
    assert!(lines("sf-device-mill").is_empty());
}

#[test]
fn customer_overlay_relabels_and_hides() {
    let diagram = plant();
    let catalog = load_customers(&fixture("customers.json")).unwrap();
    let acme = select_customer(&catalog, Some("acme")).unwrap().clone();
    let options = RenderOptions {
        customer: Some(acme.clone()),
        icons: load_icon_table(&fixture("icons.json")).unwrap(),
        ..RenderOptions::default()
    };
    let snapshot = snapshot_step(&diagram, &options, 1);

    let mill = snapshot.container("sf-device-mill").unwrap();
    assert_eq!(mill.label_lines, vec!["Fräszentrum"]);
    assert_eq!(mill.icon.as_deref(), Some("icons/generic/cnc-mill.svg"));
    assert_eq!(mill.class, PresentationClass::Highlight);

    let drill = snapshot.container("sf-device-drill").unwrap();
    assert!(drill.removed);
    assert_eq!(drill.class, PresentationClass::Hidden);
    assert_eq!(
        snapshot.connection("drill-mes").unwrap().class,
        PresentationClass::Hidden
    );

    let mes = snapshot.container("sf-system-mes").unwrap();
    assert_eq!(mes.icon.as_deref(), Some("/assets/acme/leitstand.svg"));
    assert_eq!(mes.label_lines, vec!["Leitstand"]);

    let order = snapshot.container("bp-order").unwrap();
    assert_eq!(order.icon.as_deref(), Some("icons/generic/order.svg"));
    assert_eq!(order.secondary_icon.as_deref(), Some("icons/brands/sap.svg"));
    assert!(snapshot.container("bp-shipping").unwrap().removed);

    let erp = snapshot.container("erp").unwrap();
    assert!(!erp.removed);
    assert_eq!(erp.url.as_deref(), Some("https://example.com/erp"));

    let once = apply_customer_config(&diagram, &acme);
    let twice = apply_customer_config(&once, &acme);
    assert_eq!(once, twice);
}

#[test]
fn step_file_drives_auto_dim_tour() {
    let mut diagram = plant();
    diagram.steps = load_steps(&fixture("steps.json"), &diagram).unwrap();
    let mut config = Config::default();
    config.tour.auto_dim = true;
    let options = RenderOptions {
        config,
        locale: Some("en".to_string()),
        ..RenderOptions::default()
    };
    let snapshot = snapshot_step(&diagram, &options, 1);
    let class = |id: &str| snapshot.container(id).unwrap().class;

    assert_eq!(class("sf-device-mill"), PresentationClass::Highlight);
    assert_eq!(class("plant-floor"), PresentationClass::None);
    assert_eq!(class("plant"), PresentationClass::None);
    assert_eq!(class("sf-device-drill"), PresentationClass::Dim);
    assert_eq!(class("erp"), PresentationClass::Dim);
    assert_eq!(
        snapshot.connection("mill-mes").unwrap().class,
        PresentationClass::Highlight
    );
    assert_eq!(
        snapshot.connection("mes-erp").unwrap().class,
        PresentationClass::DimConn
    );
    assert_eq!(
        snapshot.panel,
        Panel::Step {
            title: "Machines".to_string(),
            description: "Fräse und Bohrwerk melden an das MES.".to_string(),
        }
    );
}

#[test]
fn text_catalog_supplies_labels_and_step_text() {
    let diagram = plant();
    let texts = load_text_catalog(&fixture("texts.json"), "de").unwrap();
    let options = RenderOptions {
        texts,
        locale: Some("en".to_string()),
        ..RenderOptions::default()
    };
    let snapshot = snapshot_step(&diagram, &options, 2);
    assert_eq!(
        snapshot.container("bp-shipping").unwrap().label_lines,
        vec!["Shipping"]
    );
    assert_eq!(
        snapshot.panel,
        Panel::Step {
            title: "Business processes".to_string(),
            description: "Aufträge fließen vom ERP in den Versand.".to_string(),
        }
    );
}

#[test]
fn snapshot_serializes_camel_case_fields_and_kebab_case_classes() {
    let diagram = plant();
    let snapshot = snapshot_step(&diagram, &RenderOptions::default(), 2);
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["panel"]["kind"], "step");
    assert_eq!(value["stepIndex"], 2);
    let erp = value["containers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "erp")
        .unwrap();
    assert_eq!(erp["class"], "highlight");
    assert!(erp["labelLines"].is_array());
    assert!(erp.get("label_lines").is_none());
    let connection = &value["connections"][0];
    assert!(connection.get("from").is_some());
    assert!(value["functionIcons"][0].get("containerId").is_some());
}
