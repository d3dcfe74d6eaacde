//! Loading grid configuration from YAML files on disk.
//!
//! Run: cargo test --test config_files

#![allow(clippy::unwrap_used)]

use std::io::Write;

use gridwork::config::GridConfig;
use gridwork::geometry::{ModelRect, Viewport};
use gridwork::grid::{Alignment, Axis, GridGenerator};
use gridwork::pane::Pane;
use gridwork::Error;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_drives_generator() {
    let file = write_config(
        "min_cell_px: 20\n\
         max_cell_px: 50\n\
         integer_x: true\n\
         alignment_x: one_based\n",
    );
    let config = GridConfig::load(file.path()).unwrap();
    assert_eq!(config.alignment_x, Alignment::OneBased);
    assert!(config.auto_step);

    let pane = Pane::new(Viewport::new(0, 0, 500, 100), ModelRect::new(0.0, 0.0, 97.0, 1.0));
    let mut grid = GridGenerator::from_config(&config);
    grid.generate_grid(&pane, Axis::X);

    assert_eq!(grid.step(Axis::X), 5.0);
    let first = grid.begin(Axis::X).next().unwrap();
    assert_eq!(grid.display_value(Axis::X, first), 0.0);
}

#[test]
fn saved_config_loads_back() {
    let config = GridConfig {
        min_cell_px: 12.0,
        max_cell_px: 80.0,
        alignment_y: Alignment::MinusOneBased,
        auto_step: false,
        ..GridConfig::default()
    };
    let file = write_config(&config.to_yaml().unwrap());
    assert_eq!(GridConfig::load(file.path()).unwrap(), config);
}

#[test]
fn unknown_key_is_a_parse_error() {
    let file = write_config("min_cell_px: 20\ncell_colour: red\n");
    let err = GridConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }), "{err}");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(matches!(GridConfig::load(&path), Err(Error::Io(_))));
    assert_eq!(GridConfig::load_or_default(&path), GridConfig::default());
}
