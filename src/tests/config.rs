use super::{Config, DEFAULT_PAGE_WIDTH};
use crate::app_state::AppState;
use crate::drag::DragGesture;
use crate::geometry::UniformStrip;
use crate::marker::DEFAULT_OVERLAP_TOLERANCE;
use crate::proposal::{Proposal, ProposalStore};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_missing_file_gives_defaults() {
    let config = Config::load_from(std::path::Path::new("/nonexistent/splitreview.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "page_width = 10").unwrap();
    let config = Config::load_from(file.path());
    assert_eq!(config.page_width, 10);
    assert!((config.overlap_tolerance - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.boilerplate_tokens, vec!["doc".to_string()]);
}

#[test]
fn test_full_file_overrides_everything() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "overlap_tolerance = 2.5\npage_width = 4\nboilerplate_tokens = [\"scan\", \"copy\"]"
    )
    .unwrap();
    let config = Config::load_from(file.path());
    assert!((config.overlap_tolerance - 2.5).abs() < f64::EPSILON);
    assert_eq!(config.page_width, 4);
    assert_eq!(
        config.boilerplate_tokens,
        vec!["scan".to_string(), "copy".to_string()]
    );
}

#[test]
fn test_zero_page_width_falls_back_to_default() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "page_width = 0").unwrap();
    let config = Config::load_from(file.path());
    assert_eq!(config.page_width, DEFAULT_PAGE_WIDTH);
    assert!((config.overlap_tolerance - DEFAULT_OVERLAP_TOLERANCE).abs() < f64::EPSILON);
}

#[test]
fn test_tolerance_reaching_the_pitch_falls_back_to_default() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "overlap_tolerance = 3.0\npage_width = 2").unwrap();
    let config = Config::load_from(file.path());
    assert_eq!(config.page_width, 2);
    assert!((config.overlap_tolerance - DEFAULT_OVERLAP_TOLERANCE).abs() < f64::EPSILON);

    let negative = Config {
        overlap_tolerance: -1.0,
        ..Config::default()
    };
    let tolerance = negative.sanitized().overlap_tolerance;
    assert!((tolerance - DEFAULT_OVERLAP_TOLERANCE).abs() < f64::EPSILON);
}

#[test]
fn test_sanitized_config_keeps_adjacent_splits_apart() {
    let config = Config {
        page_width: 0,
        ..Config::default()
    }
    .sanitized();
    let mut app = AppState::new(config.overlap_tolerance);
    app.load_geometry(5, &UniformStrip::new(5, f64::from(config.page_width)))
        .unwrap();
    app.receive_proposals(ProposalStore::new(vec![Proposal {
        start_page: 3,
        end_page: 5,
        name: String::new(),
    }]));

    let pitch = UniformStrip::new(5, f64::from(config.page_width)).pitch();
    app.begin_drag(1).unwrap();
    assert!(app.end_drag(DragGesture::new(1, pitch)).is_applied());
    let pages: Vec<(usize, usize)> = app
        .sections()
        .iter()
        .map(|s| (s.start_page, s.end_page))
        .collect();
    assert_eq!(pages, vec![(1, 1), (2, 5)]);
}
