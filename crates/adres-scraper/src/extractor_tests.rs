use super::*;
use adres_browser::CellSnapshot;

fn td_row(cells: &[&str]) -> RowSnapshot {
    RowSnapshot::new(cells.iter().map(|t| CellSnapshot::data(*t)).collect())
}

fn th_row(cells: &[&str]) -> RowSnapshot {
    RowSnapshot::new(cells.iter().map(|t| CellSnapshot::header(*t)).collect())
}

fn basic_info() -> TableSnapshot {
    TableSnapshot::new(vec![
        th_row(&["COLUMNAS", "DATOS"]),
        td_row(&["TIPO DE IDENTIFICACIÓN", "CC"]),
        td_row(&["NÚMERO DE IDENTIFICACION", "1234567"]),
        td_row(&["NOMBRES", "ANA MARIA"]),
        td_row(&["APELLIDOS", "PEREZ GOMEZ"]),
        td_row(&["FECHA DE NACIMIENTO", "**/**/**"]),
        td_row(&["DEPARTAMENTO", "ANTIOQUIA"]),
        td_row(&["MUNICIPIO", "MEDELLIN"]),
    ])
}

fn affiliation() -> TableSnapshot {
    TableSnapshot::new(vec![
        th_row(&[
            "ESTADO",
            "ENTIDAD",
            "REGIMEN",
            "FECHA DE AFILIACIÓN EFECTIVA",
            "FECHA DE FINALIZACIÓN DE AFILIACIÓN",
            "TIPO DE AFILIADO",
        ]),
        td_row(&[
            "ACTIVO",
            "EPS SURA",
            "CONTRIBUTIVO",
            "01/02/2015",
            "31/12/2999",
            "COTIZANTE",
        ]),
    ])
}

#[test]
fn test_clean_text_trims_and_collapses_breaks() {
    assert_eq!(clean_text("  NOMBRES\n"), "NOMBRES");
    assert_eq!(clean_text("EPS\nSURA"), "EPS SURA");
    assert_eq!(clean_text("EPS\r\n\nSURA"), "EPS SURA");
    assert_eq!(clean_text("   "), "");
    assert_eq!(clean_text("A  B"), "A  B");
}

#[test]
fn test_full_result_yields_all_fields() {
    let extraction = TableExtractor::new().extract(&[basic_info(), affiliation()]);

    assert!(extraction.anomalies.is_empty());
    assert_eq!(extraction.record.len(), CanonicalField::ALL.len());
    assert_eq!(extraction.record.get(CanonicalField::Names), Some("ANA MARIA"));
    assert_eq!(extraction.record.get(CanonicalField::Province), Some("ANTIOQUIA"));
    assert_eq!(extraction.record.get(CanonicalField::Entity), Some("EPS SURA"));
    assert_eq!(
        extraction.record.get(CanonicalField::EndDateMembership),
        Some("31/12/2999")
    );
}

#[test]
fn test_uncleaned_label_maps_after_cleaning() {
    let table = TableSnapshot::new(vec![td_row(&["  NOMBRES\n", " ANA \n"])]);
    let extraction = TableExtractor::new().extract(&[table]);

    assert_eq!(extraction.record.get(CanonicalField::Names), Some("ANA"));
}

#[test]
fn test_vertical_row_with_three_cells_is_skipped() {
    let table = TableSnapshot::new(vec![
        td_row(&["NOMBRES", "ANA", "EXTRA"]),
        td_row(&["APELLIDOS", "PEREZ"]),
    ]);
    let extraction = TableExtractor::new().extract(&[table]);

    assert!(!extraction.record.contains(CanonicalField::Names));
    assert_eq!(extraction.record.get(CanonicalField::LastNames), Some("PEREZ"));
    assert_eq!(
        extraction.anomalies,
        vec![ExtractionAnomaly::MalformedRow { row: 0, cells: 3 }]
    );
}

#[test]
fn test_vertical_header_row_is_ignored() {
    let table = TableSnapshot::new(vec![th_row(&["COLUMNAS", "DATOS"])]);
    let extraction = TableExtractor::new().extract(&[table]);

    assert!(extraction.record.is_empty());
    assert!(extraction.anomalies.is_empty());
}

#[test]
fn test_unknown_labels_are_ignored() {
    let table = TableSnapshot::new(vec![
        td_row(&["Departamento", "ANTIOQUIA"]),
        td_row(&["CAMPO NUEVO", "X"]),
    ]);
    let extraction = TableExtractor::new().extract(&[table]);

    assert!(extraction.record.is_empty());
    assert!(extraction.anomalies.is_empty());
}

#[test]
fn test_empty_value_is_kept() {
    let table = TableSnapshot::new(vec![td_row(&["MUNICIPIO", "  "])]);
    let extraction = TableExtractor::new().extract(&[table]);

    assert_eq!(extraction.record.get(CanonicalField::Municipality), Some(""));
}

#[test]
fn test_horizontal_pairs_positionally_and_drops_surplus() {
    let horizontal = TableSnapshot::new(vec![
        th_row(&["ESTADO", "ENTIDAD", "REGIMEN"]),
        td_row(&["ACTIVO", "EPS X"]),
    ]);
    let extraction = TableExtractor::new().extract(&[TableSnapshot::default(), horizontal]);

    assert_eq!(extraction.record.get(CanonicalField::Status), Some("ACTIVO"));
    assert_eq!(extraction.record.get(CanonicalField::Entity), Some("EPS X"));
    assert!(!extraction.record.contains(CanonicalField::Regime));
    assert_eq!(
        extraction.anomalies,
        vec![ExtractionAnomaly::LengthMismatch { headers: 3, values: 2 }]
    );
}

#[test]
fn test_horizontal_header_row_may_use_td() {
    let horizontal = TableSnapshot::new(vec![
        td_row(&["ESTADO", "REGIMEN"]),
        td_row(&["RETIRADO", "SUBSIDIADO"]),
    ]);
    let extraction = TableExtractor::new().extract(&[TableSnapshot::default(), horizontal]);

    assert_eq!(extraction.record.get(CanonicalField::Status), Some("RETIRADO"));
    assert_eq!(extraction.record.get(CanonicalField::Regime), Some("SUBSIDIADO"));
}

#[test]
fn test_horizontal_without_value_row() {
    let horizontal = TableSnapshot::new(vec![th_row(&["ESTADO"])]);
    let extraction = TableExtractor::new().extract(&[basic_info(), horizontal]);

    assert!(!extraction.record.contains(CanonicalField::Status));
    assert_eq!(extraction.anomalies, vec![ExtractionAnomaly::MissingValueRow]);
    assert_eq!(extraction.record.len(), 7);
}

#[test]
fn test_single_table_is_partial_record() {
    let extraction = TableExtractor::new().extract(&[basic_info()]);

    assert_eq!(extraction.record.len(), 7);
    assert!(!extraction.record.contains(CanonicalField::Status));
}

#[test]
fn test_horizontal_overwrites_vertical() {
    let vertical = TableSnapshot::new(vec![td_row(&["ESTADO", "VIEJO"])]);
    let horizontal = TableSnapshot::new(vec![th_row(&["ESTADO"]), td_row(&["ACTIVO"])]);
    let extraction = TableExtractor::new().extract(&[vertical, horizontal]);

    assert_eq!(extraction.record.get(CanonicalField::Status), Some("ACTIVO"));
    assert_eq!(
        extraction.anomalies,
        vec![ExtractionAnomaly::Overwritten { field: CanonicalField::Status }]
    );
}

#[test]
fn test_extra_tables_are_ignored() {
    let third = TableSnapshot::new(vec![td_row(&["NOMBRES", "OTRO"])]);
    let extraction = TableExtractor::new().extract(&[basic_info(), affiliation(), third]);

    assert_eq!(extraction.record.get(CanonicalField::Names), Some("ANA MARIA"));
    assert!(extraction.anomalies.is_empty());
}

#[test]
fn test_no_tables_is_empty_record() {
    let extraction = TableExtractor::new().extract(&[]);
    assert!(extraction.record.is_empty());
}
