use std::fs;
use std::path::Path;

use chesstocsv::{ScoreTable, TableExporter};
use tempfile::tempdir;

// Integration tests for the score-table pipeline: JSON score table in,
// two-column CSV (fen, normalized side-to-move-relative score) out.

const FEN_WHITE: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const FEN_BLACK: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

fn read_rows(path: &Path) -> Vec<(String, f64)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("output CSV should exist");
    reader
        .records()
        .map(|record| {
            let record = record.expect("valid CSV record");
            assert_eq!(record.len(), 2, "rows have exactly two columns");
            let score = record[1].parse().expect("score column parses as f64");
            (record[0].to_string(), score)
        })
        .collect()
}

#[test]
fn normalizes_and_flips_scores_for_black_to_move() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("scores.json");
    let output_path = dir.path().join("scores.csv");

    fs::write(
        &table_path,
        format!(r#"{{"{}": 2500, "{}": -1000}}"#, FEN_BLACK, FEN_WHITE),
    )
    .unwrap();

    let table = ScoreTable::load(&table_path).expect("table loads");
    assert_eq!(table.len(), 2);

    let written = TableExporter::new()
        .export(&table, &output_path)
        .expect("export succeeds");
    assert_eq!(written, 2, "row count equals table entry count");

    let rows = read_rows(&output_path);
    assert_eq!(rows.len(), 2);

    for (fen, score) in &rows {
        match fen.as_str() {
            // normalize(2500) = 0.5, negated because Black is to move
            f if f == FEN_BLACK => assert!((score - (-0.5)).abs() < 1e-12),
            // normalize(-1000) = -0.2, unchanged for White to move
            f if f == FEN_WHITE => assert!((score - (-0.2)).abs() < 1e-12),
            other => panic!("unexpected fen in output: {}", other),
        }
    }
}

#[test]
fn repeated_exports_are_byte_identical() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("scores.json");

    fs::write(
        &table_path,
        format!(
            r#"{{"{}": 123, "{}": -4567, "8/8/8/8/8/8/8/K6k w - - 0 1": 9999}}"#,
            FEN_BLACK, FEN_WHITE
        ),
    )
    .unwrap();

    let table = ScoreTable::load(&table_path).unwrap();
    let exporter = TableExporter::new();

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    exporter.export(&table, &first).unwrap();
    exporter.export(&table, &second).unwrap();

    assert_eq!(
        fs::read(&first).unwrap(),
        fs::read(&second).unwrap(),
        "identical input must produce byte-identical output"
    );
}

#[test]
fn saturated_scores_write_as_plus_minus_one() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("scores.json");
    let output_path = dir.path().join("scores.csv");

    fs::write(
        &table_path,
        format!(r#"{{"{}": 10000, "{}": -8000}}"#, FEN_WHITE, FEN_BLACK),
    )
    .unwrap();

    let table = ScoreTable::load(&table_path).unwrap();
    TableExporter::new().export(&table, &output_path).unwrap();

    for (fen, score) in read_rows(&output_path) {
        if fen == FEN_WHITE {
            assert_eq!(score, 1.0);
        } else {
            // -8000 saturates to -1, then flips for Black to move
            assert_eq!(score, 1.0);
        }
    }
}

#[test]
fn fails_on_a_fen_without_a_side_to_move_field() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("scores.json");
    let output_path = dir.path().join("scores.csv");

    fs::write(&table_path, r#"{"not-a-fen": 100}"#).unwrap();

    let table = ScoreTable::load(&table_path).unwrap();
    assert!(
        TableExporter::new().export(&table, &output_path).is_err(),
        "a malformed identifier should abort the export"
    );
}

#[test]
fn fails_on_an_unreadable_table() {
    let dir = tempdir().unwrap();

    assert!(ScoreTable::load(dir.path().join("missing.json")).is_err());

    let garbled = dir.path().join("garbled.json");
    fs::write(&garbled, "not json at all").unwrap();
    assert!(ScoreTable::load(&garbled).is_err());
}

#[test]
fn empty_table_produces_an_empty_file() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("scores.json");
    let output_path = dir.path().join("scores.csv");

    fs::write(&table_path, "{}").unwrap();

    let table = ScoreTable::load(&table_path).unwrap();
    assert!(table.is_empty());

    let written = TableExporter::new().export(&table, &output_path).unwrap();
    assert_eq!(written, 0);
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "");
}
