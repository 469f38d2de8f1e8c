mod helpers;

use std::ops::ControlFlow;

use helpers::{approx_eq, write_dip, write_spectrum};
use rusty_valley::config::Settings;
use rusty_valley::store::log_store::LOG_COLUMNS;
use rusty_valley::{
    BatchError, LogProgress, LogStore, Progress, RawFilterForm, SessionError, SessionState,
};

fn form(window: &str, order: &str) -> RawFilterForm {
    RawFilterForm {
        window: window.into(),
        order: order.into(),
        ..Default::default()
    }
}

#[test]
fn batch_over_mixed_delimiters_tracks_the_shift() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        write_dip(dir.path(), "t0.txt", ";", 1540.0),
        write_dip(dir.path(), "t1.txt", ",", 1545.0),
        write_dip(dir.path(), "t2.txt", "\t", 1550.0),
        write_dip(dir.path(), "t3.txt", " ", 1555.0),
    ];

    let mut session = SessionState::new();
    session.load_files(&files).unwrap();
    let (params, warnings) = session.filter_parameters(&form("11", "3")).unwrap();
    assert!(warnings.is_empty());

    let outcome = session.run_batch(&params, "heating", &mut LogProgress).unwrap();
    assert_eq!(outcome.records.len(), 4);

    let centres = [1540.0, 1545.0, 1550.0, 1555.0];
    for (point, centre) in outcome.series.iter().zip(centres) {
        assert!(approx_eq(point.wavelength, centre, 1.0), "{point:?}");
        assert!(point.intensity < -20.0);
    }
    let names: Vec<&str> = outcome.records.iter().map(|r| r.source_file.as_str()).collect();
    assert_eq!(names, ["t0.txt", "t1.txt", "t2.txt", "t3.txt"]);
}

#[test]
fn log_grows_across_runs_in_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_dip(dir.path(), "a.txt", ";", 1548.0);
    let b = write_dip(dir.path(), "b.txt", ";", 1552.0);

    for log_name in ["vales.csv", "vales.xlsx"] {
        let log_path = dir.path().join(log_name);
        let mut session = SessionState::new();
        session.set_log_path(&log_path).unwrap();

        session.load_files(&[&a, &b]).unwrap();
        let (params, _) = session.filter_parameters(&form("9", "2")).unwrap();
        let first = session.run_batch(&params, "S", &mut LogProgress).unwrap();
        session.append_batch_log(&first).unwrap();

        session.load_files(&[&b]).unwrap();
        let second = session.run_batch(&params, "S", &mut LogProgress).unwrap();
        session.append_batch_log(&second).unwrap();

        let table = LogStore::new(&log_path).unwrap().read().unwrap();
        assert_eq!(table.headers, LOG_COLUMNS);
        assert_eq!(table.len(), 3, "{log_name}");
        let sources: Vec<_> = table
            .column_cells("arquivo_origem")
            .unwrap()
            .map(|c| c.to_field())
            .collect();
        assert_eq!(sources, ["a.txt", "b.txt", "b.txt"]);
    }
}

#[test]
fn out_of_range_spectrum_is_skipped_without_a_gap() {
    let dir = tempfile::tempdir().unwrap();
    let xs_far = helpers::linspace(1700.0, 1800.0, 201);
    let ys_far = vec![-10.0; xs_far.len()];
    let files = [
        write_dip(dir.path(), "a.txt", ";", 1545.0),
        write_spectrum(dir.path(), "far.txt", ";", &xs_far, &ys_far),
        write_dip(dir.path(), "c.txt", ";", 1555.0),
    ];

    let mut session = SessionState::new();
    session.load_files(&files).unwrap();
    let mut raw = form("7", "2");
    raw.range_start = Some("1530".into());
    raw.range_end = Some("1570".into());
    let (params, _) = session.filter_parameters(&raw).unwrap();

    let outcome = session.run_batch(&params, "S", &mut LogProgress).unwrap();
    let idx: Vec<usize> = outcome.series.iter().map(|p| p.index).collect();
    assert_eq!(idx, [0, 1]);
    assert_eq!(outcome.records[1].source_file, "c.txt");
}

#[test]
fn batch_cancel_leaves_log_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        write_dip(dir.path(), "a.txt", ";", 1545.0),
        write_dip(dir.path(), "b.txt", ";", 1550.0),
    ];
    let mut session = SessionState::new();
    session.load_files(&files).unwrap();
    session.set_log_path(dir.path().join("log.csv")).unwrap();
    let (params, _) = session.filter_parameters(&form("5", "2")).unwrap();

    let mut stop = |_: Progress| -> ControlFlow<()> { ControlFlow::Break(()) };
    let err = session.run_batch(&params, "S", &mut stop).unwrap_err();
    assert!(matches!(err, SessionError::Batch(BatchError::Cancelled { after: 1 })));
    assert!(!dir.path().join("log.csv").exists());
}

#[test]
fn even_window_and_large_order_are_corrected() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dip(dir.path(), "a.txt", ";", 1550.0);
    let mut session = SessionState::new();
    session.load_files(&[&file]).unwrap();

    let (params, warnings) = session.filter_parameters(&form("10", "15")).unwrap();
    assert_eq!((params.window(), params.order()), (11, 9));
    assert_eq!(warnings.len(), 2);
    assert_eq!((params.range_start(), params.range_end()), (1500.0, 1600.0));
}

#[test]
fn settings_feed_the_form() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dip(dir.path(), "a.txt", ";", 1550.0);
    let mut session = SessionState::new();
    session.load_files(&[&file]).unwrap();

    let settings = Settings {
        range_start: Some(1540.0),
        range_end: Some(1560.0),
        normalize: true,
        ..Settings::default()
    };
    let (params, _) = session.filter_parameters(&settings.to_form()).unwrap();
    assert_eq!((params.window(), params.order()), (21, 3));
    assert!(params.normalize_peak());

    let run = session.run_single(&params).unwrap();
    let peak = run
        .processed
        .trace
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(peak, 0.0);
    assert!(approx_eq(run.processed.valley.unwrap().wavelength, 1550.0, 1.0));
}
