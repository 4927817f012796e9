use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gridtable::config::GridConfig;
use gridtable::table::{
    AutoGrowReconciler, CellContent, ColumnDefinition, ColumnMeasurer, GridRow, GridTable,
    WidthAllocator, WidthMap,
};

#[derive(Clone)]
struct Item {
    name: String,
}

impl GridRow for Item {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn cell(&self, _column_key: &str) -> CellContent {
        CellContent::text(&self.name)
    }
}

/// Returns canned natural widths per column key.
struct FixedMeasurer {
    widths: HashMap<String, f64>,
}

impl ColumnMeasurer for FixedMeasurer {
    fn measure(&self, column: &ColumnDefinition) -> Option<f64> {
        self.widths.get(&column.key).copied()
    }
}

/// Scales every width so the map sums exactly to the container width,
/// recording each invocation.
#[derive(Default)]
struct ProportionalAllocator {
    calls: Mutex<Vec<f64>>,
}

impl WidthAllocator for ProportionalAllocator {
    fn allocate(&self, widths: &WidthMap, container_width: f64) -> WidthMap {
        self.calls.lock().unwrap().push(container_width);
        let total = widths.total();
        if total <= 0.0 {
            return widths.clone();
        }
        widths
            .iter()
            .map(|(key, width)| (key.to_string(), width / total * container_width))
            .collect()
    }
}

fn kind_table() -> GridTable<Item> {
    let config = GridConfig::default().with_overscan(0.0);
    let table = GridTable::new(
        config,
        vec![
            ColumnDefinition::new("kind", "Kind"),
            ColumnDefinition::new("name", "Name"),
            ColumnDefinition::new("status", "Status"),
        ],
    );
    let mut widths = WidthMap::new();
    widths.set("kind", 100.0);
    widths.set("name", 300.0);
    widths.set("status", 200.0);
    table.set_widths(widths);
    table.set_rows(vec![Item {
        name: "deployment".into(),
    }]);
    table.set_viewport(600.0, 300.0);
    table.set_container_width(600.0);
    table
}

fn measurer(entries: &[(&str, f64)]) -> Arc<FixedMeasurer> {
    Arc::new(FixedMeasurer {
        widths: entries
            .iter()
            .map(|(key, width)| (key.to_string(), *width))
            .collect(),
    })
}

#[test]
fn test_growth_updates_widths_and_refits_container() {
    let table = kind_table();
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 150.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    );

    assert!(reconciler.reconcile(&table));
    assert_eq!(allocator.calls.lock().unwrap().as_slice(), &[600.0]);

    let widths = table.widths();
    let total = widths.total();
    assert!(
        (total - 600.0).abs() < 1e-6,
        "widths must fill the container exactly, got {total}"
    );
    // The grown column keeps its share of the refit.
    assert!(widths.get("kind").unwrap() > 100.0);
}

#[test]
fn test_growth_below_half_a_pixel_is_ignored() {
    let table = kind_table();
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 100.4)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    );

    assert!(!reconciler.reconcile(&table));
    assert!(allocator.calls.lock().unwrap().is_empty());
    assert_eq!(table.widths().get("kind"), Some(100.0));
}

#[test]
fn test_shrunk_measurement_never_narrows_a_column() {
    let table = kind_table();
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 60.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    );

    assert!(!reconciler.reconcile(&table));
    assert_eq!(table.widths().get("kind"), Some(100.0));
}

#[test]
fn test_no_rows_is_a_noop() {
    let table = kind_table();
    table.set_rows(Vec::new());
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 500.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    );

    assert!(!reconciler.reconcile(&table));
}

#[test]
fn test_unready_container_is_a_noop() {
    let table = kind_table();
    table.set_container_width(0.0);
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 500.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    );

    assert!(!reconciler.reconcile(&table));
}

#[test]
fn test_no_designated_column_is_a_noop() {
    let table = kind_table();
    let allocator = Arc::new(ProportionalAllocator::default());
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 500.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |_key| false,
    );

    assert!(!reconciler.reconcile(&table));
}

#[test]
fn test_natural_width_is_reported() {
    let table = kind_table();
    let allocator = Arc::new(ProportionalAllocator::default());
    let reported: Arc<Mutex<Vec<(String, f64)>>> = Arc::new(Mutex::new(Vec::new()));
    let reported_in_callback = Arc::clone(&reported);
    let reconciler = AutoGrowReconciler::new(
        measurer(&[("kind", 150.0)]),
        Arc::clone(&allocator) as Arc<dyn WidthAllocator>,
        |key| key == "kind",
    )
    .with_natural_width_callback(move |key, width| {
        reported_in_callback
            .lock()
            .unwrap()
            .push((key.to_string(), width));
    });

    reconciler.reconcile(&table);
    assert_eq!(
        reported.lock().unwrap().as_slice(),
        &[("kind".to_string(), 150.0)]
    );
}
