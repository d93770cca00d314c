// Grid layout engine tests
// Author: Gabriel Demetrios Lafis

use dashboard_config_engine::dashboard::{
    DashboardGrid, GridItem, GridMode, LayoutItem, PageMode, GRID_COLS, MOBILE_BREAKPOINT,
};

fn sample_layout() -> Vec<LayoutItem> {
    vec![
        LayoutItem::new("w1", 6, 0, 6, 4),
        LayoutItem::new("w2", 0, 0, 6, 3),
        LayoutItem::new("w3", 2, 4, 4, 5),
    ]
}

fn reported(i: &str, x: u32, y: u32, w: u32, h: u32) -> GridItem {
    GridItem {
        i: i.to_string(),
        widget_id: String::new(),
        x,
        y,
        w,
        h,
        min_w: None,
        min_h: None,
        is_static: false,
    }
}

#[test]
fn test_modes() {
    let mut view = DashboardGrid::new(sample_layout(), PageMode::View);
    assert_eq!(view.mode(), GridMode::Viewing);
    assert_eq!(view.toggle_edit(), GridMode::Editing);
    assert_eq!(view.toggle_edit(), GridMode::Viewing);

    let mut create = DashboardGrid::new(Vec::new(), PageMode::Create);
    assert_eq!(create.mode(), GridMode::Editing);
    assert_eq!(create.toggle_edit(), GridMode::Editing);
}

#[test]
fn test_desktop_projection_mirrors_layout() {
    let mut grid = DashboardGrid::new(sample_layout(), PageMode::View);
    grid.set_container_width(1280);

    let items = grid.grid_items();
    assert_eq!(items.len(), 3);
    assert_eq!((items[0].x, items[0].y, items[0].w, items[0].h), (6, 0, 6, 4));
    assert!(items.iter().all(|item| item.is_static));

    grid.toggle_edit();
    assert!(grid.grid_items().iter().all(|item| !item.is_static));
}

#[test]
fn test_mobile_projection() {
    let layout = sample_layout();
    let mut grid = DashboardGrid::new(layout.clone(), PageMode::Create);
    grid.set_container_width(MOBILE_BREAKPOINT - 1);

    assert!(grid.is_mobile());
    let items = grid.grid_items();

    // Array order, stacked, full width, static even while editing
    let keys: Vec<&str> = items.iter().map(|item| item.i.as_str()).collect();
    assert_eq!(keys, vec!["w1", "w2", "w3"]);
    assert_eq!(items.iter().map(|item| item.y).collect::<Vec<_>>(), vec![0, 4, 7]);
    assert!(items.iter().all(|item| item.x == 0 && item.w == GRID_COLS && item.is_static));

    // The persisted layout is untouched
    assert_eq!(grid.layout(), layout.as_slice());
}

#[test]
fn test_mobile_projection_saturates_tall_stacks() {
    let layout = vec![
        LayoutItem::new("w1", 0, 0, 6, u32::MAX - 1),
        LayoutItem::new("w2", 6, 0, 6, 4),
        LayoutItem::new("w3", 0, 4, 6, 4),
    ];
    let mut grid = DashboardGrid::new(layout, PageMode::View);
    grid.set_container_width(320);

    let ys: Vec<u32> = grid.grid_items().iter().map(|item| item.y).collect();
    assert_eq!(ys, vec![0, u32::MAX - 1, u32::MAX]);
}

#[test]
fn test_breakpoint_is_exclusive() {
    let mut grid = DashboardGrid::new(sample_layout(), PageMode::View);
    assert!(!grid.is_mobile());

    grid.set_container_width(MOBILE_BREAKPOINT);
    assert!(!grid.is_mobile());
}

#[test]
fn test_layout_change_ignored_when_static() {
    let mut grid = DashboardGrid::new(sample_layout(), PageMode::View);
    assert!(!grid.on_layout_change(&[reported("w1", 0, 10, 6, 4)]));
    assert_eq!(grid.layout()[0].y, 0);

    let mut mobile = DashboardGrid::new(sample_layout(), PageMode::Create);
    mobile.set_container_width(320);
    assert!(!mobile.on_layout_change(&[reported("w1", 0, 10, 6, 4)]));
}

#[test]
fn test_layout_change_applies_matching_items() {
    let mut grid = DashboardGrid::new(sample_layout(), PageMode::Create);

    let mut by_widget_id = reported("grid-key-unknown", 0, 9, 12, 2);
    by_widget_id.widget_id = "w3".to_string();

    let changed = grid.on_layout_change(&[
        reported("w1", 0, 12, 6, 4),
        by_widget_id,
        reported("ghost", 0, 0, 1, 1),
    ]);

    assert!(changed);
    let layout = grid.into_layout();
    assert_eq!(layout.len(), 3);
    assert_eq!((layout[0].x, layout[0].y), (0, 12));
    assert_eq!((layout[2].y, layout[2].w, layout[2].h), (9, 12, 2));
    assert_eq!(layout[1], LayoutItem::new("w2", 0, 0, 6, 3));
}

#[test]
fn test_layout_change_without_movement() {
    let mut grid = DashboardGrid::new(sample_layout(), PageMode::Create);
    assert!(!grid.on_layout_change(&[reported("w2", 0, 0, 6, 3)]));
}

#[test]
fn test_grid_item_wire_shape() {
    let grid = DashboardGrid::new(sample_layout(), PageMode::View);
    let value = serde_json::to_value(&grid.grid_items()[0]).unwrap();

    assert_eq!(value["static"], serde_json::json!(true));
    assert_eq!(value["widgetId"], serde_json::json!("w1"));
    assert!(value.get("minW").is_none());
}
