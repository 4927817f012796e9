use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gridtable::config::GridConfig;
use gridtable::table::{
    CellCache, CellContent, ColumnDefinition, GridRow, GridTable, PointerEvent, SelectionMode,
    build_row, column_window, dispatch_row_click, render_models, row_index_at, VisibleSpan,
};

#[derive(Clone)]
struct Pod {
    name: String,
    status: String,
    /// Counts cell computations so cache hits are observable.
    computed: Arc<AtomicUsize>,
}

impl Pod {
    fn new(name: &str, status: &str) -> Self {
        Self {
            name: name.to_string(),
            status: status.to_string(),
            computed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl GridRow for Pod {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn cell(&self, column_key: &str) -> CellContent {
        self.computed.fetch_add(1, Ordering::SeqCst);
        match column_key {
            "name" => CellContent::text(&self.name),
            "status" => CellContent::text(&self.status),
            _ => CellContent::default(),
        }
    }
}

fn pod_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("name", "Name"),
        ColumnDefinition::new("status", "Status"),
        ColumnDefinition::new("age", "Age"),
        ColumnDefinition::new("node", "Node"),
    ]
}

fn pod_table(rows: Vec<Pod>) -> GridTable<Pod> {
    let config = GridConfig::default()
        .with_row_height(28.0)
        .with_overscan(0.0);
    let table = GridTable::new(config, pod_columns());
    for column in pod_columns() {
        table.set_width(&column.key, 100.0);
    }
    table.set_rows(rows);
    table
}

#[test]
fn test_row_realizes_only_windowed_cells() {
    let cols = pod_columns();
    let widths = cols.iter().map(|c| (c.key.clone(), 100.0)).collect();
    let models = render_models(&cols, &widths, 100.0);
    // Only [0, 150) is visible, no sticky columns.
    let window = column_window(&models, VisibleSpan::new(0.0, 150.0), 0.0, 0, 0, true);

    let pod = Pod::new("pod-1", "Running");
    let mut cache = CellCache::new();
    let row = build_row(&pod, 0, false, false, &models, &window, &mut cache);

    let keys: Vec<&str> = row.cells.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["name", "status"]);
    assert_eq!(row.cells[0].start, 0.0);
    assert_eq!(row.cells[1].start, 100.0);
    assert_eq!(row.cells[1].width, 100.0);
}

#[test]
fn test_row_carries_selection_and_focus_markers() {
    let cols = pod_columns();
    let widths = cols.iter().map(|c| (c.key.clone(), 100.0)).collect();
    let models = render_models(&cols, &widths, 100.0);
    let window = column_window(&models, VisibleSpan::new(0.0, 400.0), 0.0, 0, 0, true);

    let pod = Pod::new("pod-1", "Running");
    let mut cache = CellCache::new();
    let row = build_row(&pod, 3, true, true, &models, &window, &mut cache);
    assert!(row.selected);
    assert!(row.focused);
    assert_eq!(row.index, 3);
    assert_eq!(row.key, "pod-1");
}

#[test]
fn test_cell_cache_avoids_recomputation() {
    let cols = pod_columns();
    let widths = cols.iter().map(|c| (c.key.clone(), 100.0)).collect();
    let models = render_models(&cols, &widths, 100.0);
    let window = column_window(&models, VisibleSpan::new(0.0, 400.0), 0.0, 0, 0, true);

    let pod = Pod::new("pod-1", "Running");
    let mut cache = CellCache::new();
    build_row(&pod, 0, false, false, &models, &window, &mut cache);
    let first_pass = pod.computed.load(Ordering::SeqCst);
    assert_eq!(first_pass, 4);

    build_row(&pod, 0, false, false, &models, &window, &mut cache);
    assert_eq!(pod.computed.load(Ordering::SeqCst), first_pass);

    cache.invalidate_row("pod-1");
    build_row(&pod, 0, false, false, &models, &window, &mut cache);
    assert_eq!(pod.computed.load(Ordering::SeqCst), first_pass * 2);
}

#[test]
fn test_build_rows_covers_visible_range_only() {
    let rows: Vec<Pod> = (0..100)
        .map(|i| Pod::new(&format!("pod-{i}"), "Running"))
        .collect();
    let table = pod_table(rows);
    table.set_viewport(400.0, 280.0);
    table.set_scroll(280.0, 0.0);

    let mut cache = CellCache::new();
    let built = table.build_rows(&mut cache);
    // 280px viewport at 28px rows: ten visible plus one of slack,
    // starting at the tenth row.
    assert_eq!(built.first().map(|r| r.index), Some(10));
    assert_eq!(built.len(), 11);
}

#[test]
fn test_build_rows_marks_cursor_and_selection() {
    let rows: Vec<Pod> = (0..5)
        .map(|i| Pod::new(&format!("pod-{i}"), "Running"))
        .collect();
    let table = pod_table(rows);
    table.set_viewport(400.0, 280.0);
    table.set_selection_mode(SelectionMode::Multi);
    table.set_cursor(1);
    table.select_at(2);

    let mut cache = CellCache::new();
    let built = table.build_rows(&mut cache);
    assert!(built[1].focused);
    assert!(!built[1].selected);
    assert!(built[2].selected);
    assert!(!built[2].focused);
}

#[test]
fn test_row_click_consumes_event_before_callback() {
    let table = pod_table(vec![Pod::new("pod-0", "Running"), Pod::new("pod-1", "Failed")]);
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_callback = Arc::clone(&seen);

    let mut event = PointerEvent::at(10.0, 40.0);
    let result = dispatch_row_click(&table, 1, &mut event, &move |pod, index, event| {
        assert_eq!(pod.name, "pod-1");
        assert_eq!(index, 1);
        assert!(event.propagation_stopped());
        seen_in_callback.fetch_add(1, Ordering::SeqCst);
    });

    assert!(result.is_handled());
    assert!(event.propagation_stopped());
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_row_click_out_of_range_is_ignored() {
    let table = pod_table(vec![Pod::new("pod-0", "Running")]);
    let mut event = PointerEvent::at(0.0, 0.0);
    let result = dispatch_row_click(&table, 5, &mut event, &|_, _, _| {
        panic!("callback must not run for a missing row");
    });
    assert!(!result.is_handled());
    assert!(!event.propagation_stopped());
}

#[test]
fn test_row_index_at_accounts_for_scroll() {
    let rows: Vec<Pod> = (0..50)
        .map(|i| Pod::new(&format!("pod-{i}"), "Running"))
        .collect();
    let table = pod_table(rows);
    table.set_viewport(400.0, 280.0);
    table.set_scroll(56.0, 0.0);

    assert_eq!(row_index_at(&table, 0.0), Some(2));
    assert_eq!(row_index_at(&table, 27.9), Some(2));
    assert_eq!(row_index_at(&table, 28.0), Some(3));
    assert_eq!(row_index_at(&table, -1.0), None);
}
