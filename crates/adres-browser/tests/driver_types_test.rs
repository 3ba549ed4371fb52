//! Tests for the driver value types that do not need a browser.

use adres_browser::{CellKind, CellSnapshot, Focus, FrameRef, RowSnapshot, TableSnapshot, WindowHandle};

#[test]
fn test_focus_switching_is_by_value() {
    let top = Focus::top(WindowHandle::new("W1"));
    let framed = top.in_frame(FrameRef::new(1));

    assert!(top.is_top());
    assert_eq!(framed.frame(), Some(FrameRef::new(1)));
    assert_eq!(framed.window(), top.window());
    assert_eq!(framed.to_top(), top);
    assert_eq!(framed.to_string(), "W1#frame1");
}

#[test]
fn test_table_snapshot_deserialize() {
    let json = r#"[
        {"rows": [
            {"cells": [{"kind": "td", "text": "NOMBRES"}, {"kind": "td", "text": "ANA MARIA"}]}
        ]},
        {"rows": [
            {"cells": [{"kind": "th", "text": "ESTADO"}, {"kind": "th", "text": "ENTIDAD"}]},
            {"cells": [{"kind": "td", "text": "ACTIVO"}, {"kind": "td", "text": "EPS X"}]}
        ]}
    ]"#;
    let tables: Vec<TableSnapshot> = serde_json::from_str(json).unwrap();

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].rows[0].cells[1], CellSnapshot::data("ANA MARIA"));
    assert_eq!(tables[1].rows[0].cells[0].kind, CellKind::Header);
}

#[test]
fn test_row_data_cells_skip_headers() {
    let row = RowSnapshot::new(vec![
        CellSnapshot::header("TIPO"),
        CellSnapshot::data("CC"),
    ]);
    let data: Vec<&str> = row.data_cells().map(|c| c.text.as_str()).collect();
    assert_eq!(data, vec!["CC"]);
}

#[test]
fn test_unknown_cell_kind_rejected() {
    let json = r#"{"kind": "caption", "text": "x"}"#;
    assert!(serde_json::from_str::<CellSnapshot>(json).is_err());
}
