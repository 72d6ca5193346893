use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::is_blank;
use std::io::{Cursor, Read};

const GOOD: &str = r#"{"word":"cat","drawing":[[[10,60,120],[20,90,40]]]}"#;
const EMPTY_DRAWING: &str = r#"{"word":"cat","drawing":[]}"#;

fn source(class: &str) -> Source {
    Source {
        class: class.to_string(),
        path: PathBuf::from(format!("{class}.ndjson")),
    }
}

fn ten_lines_with_two_bad() -> String {
    let mut lines = vec![GOOD.to_string(); 10];
    lines[4] = "{\"drawing\": [[[1,2],[3,4]]".to_string();
    lines[7] = r#"{"word":"cat","countrycode":"DE"}"#.to_string();
    lines.join("\n")
}

#[test]
fn render_batch_isolates_bad_records() {
    let pipeline = Pipeline::default();
    let text = ten_lines_with_two_bad();
    let outcomes = render_batch(&pipeline, text.lines()).collect::<Vec<_>>();
    assert_eq!(outcomes.len(), 10);

    let skipped = outcomes
        .iter()
        .filter_map(|o| o.as_ref().err().map(|s| s.line))
        .collect::<Vec<_>>();
    assert_eq!(skipped, vec![4, 7]);
    for o in outcomes.iter().flatten() {
        assert_eq!(o.image.dimensions(), (64, 64));
        assert!(!is_blank(&o.image));
    }
}

#[test]
fn render_batch_is_lazy() {
    let pipeline = Pipeline::default();
    let mut it = render_batch(&pipeline, std::iter::repeat(GOOD));
    assert!(it.next().unwrap().is_ok());
    assert_eq!(it.next().unwrap().unwrap().line, 1);
}

#[test]
fn malformed_lines_are_skipped_without_interruption() {
    let pipeline = Pipeline::default();
    let mut sink = InMemorySink::new();
    let report = convert_lines(
        &pipeline,
        &source("cat"),
        Cursor::new(ten_lines_with_two_bad()),
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap();

    assert_eq!(report.attempted, 10);
    assert_eq!(report.rendered, 8);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.status(), SourceStatus::Converted);
    assert_eq!(sink.images().len(), 8);
    assert_eq!(sink.class(), Some("cat"));
    assert!(sink.is_finished());
}

#[test]
fn dense_indices_have_no_gaps() {
    let mut sink = InMemorySink::new();
    convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(ten_lines_with_two_bad()),
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap();
    assert_eq!(sink.indices(), (0..8).collect::<Vec<_>>());
}

#[test]
fn source_line_indices_leave_gaps() {
    let cfg = BatchConfig {
        index_mode: IndexMode::SourceLine,
        ..BatchConfig::default()
    };
    let mut sink = InMemorySink::new();
    convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(ten_lines_with_two_bad()),
        &mut sink,
        &cfg,
    )
    .unwrap();
    assert_eq!(sink.indices(), vec![0, 1, 2, 3, 5, 6, 8, 9]);
}

#[test]
fn cap_limits_records_read() {
    let cfg = BatchConfig {
        max_per_class: Some(6),
        ..BatchConfig::default()
    };
    let mut sink = InMemorySink::new();
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(ten_lines_with_two_bad()),
        &mut sink,
        &cfg,
    )
    .unwrap();
    assert_eq!(report.attempted, 6);
    assert_eq!(report.rendered, 5);
    assert_eq!(report.skipped, 1);

    let uncapped = BatchConfig {
        max_per_class: None,
        ..BatchConfig::default()
    };
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(ten_lines_with_two_bad()),
        &mut InMemorySink::new(),
        &uncapped,
    )
    .unwrap();
    assert_eq!(report.attempted, 10);
}

#[test]
fn degenerate_drawings_still_produce_blank_images() {
    let text = [EMPTY_DRAWING, GOOD].join("\n");
    let mut sink = InMemorySink::new();
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(text),
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap();
    assert_eq!(report.rendered, 2);
    assert!(is_blank(&sink.images()[0].1));
    assert!(!is_blank(&sink.images()[1].1));
}

#[test]
fn all_bad_or_no_records_is_reported_empty() {
    let mut sink = InMemorySink::new();
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new("garbage\n{}\n"),
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap();
    assert_eq!(report.status(), SourceStatus::Empty);
    assert_eq!((report.attempted, report.skipped), (2, 2));

    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(""),
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap();
    assert_eq!(report.status(), SourceStatus::Empty);
    assert_eq!(report.attempted, 0);
}

struct FailingReader {
    served: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.served.read(buf)? {
            0 => Err(std::io::Error::other("disk gone")),
            n => Ok(n),
        }
    }
}

#[test]
fn read_failure_is_fatal_and_distinct_from_skips() {
    let reader = std::io::BufReader::new(FailingReader {
        served: Cursor::new(format!("{GOOD}\nnot json\n").into_bytes()),
    });
    let mut sink = InMemorySink::new();
    let err = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        reader,
        &mut sink,
        &BatchConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RasterError::Io { .. }), "{err}");
    assert!(err.to_string().contains("cat.ndjson"));
    assert!(!err.is_skippable());
    assert!(!sink.is_finished());
}

#[test]
fn missing_source_file_is_an_io_error() {
    let src = Source {
        class: "ghost".to_string(),
        path: PathBuf::from("target").join("does-not-exist.ndjson"),
    };
    let err = convert_source(
        &Pipeline::default(),
        &src,
        &mut InMemorySink::new(),
        &BatchConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RasterError::Io { .. }));
}

#[test]
fn pipeline_honors_custom_stroke_field() {
    let cfg = BatchConfig {
        stroke_field: "strokes".to_string(),
        ..BatchConfig::default()
    };
    let pipeline = Pipeline::new(RasterConfig::default(), &cfg).unwrap();
    assert_eq!(pipeline.parser().stroke_field(), "strokes");
    assert!(pipeline.render_line(GOOD).is_err());
    assert!(
        pipeline
            .render_line(r#"{"strokes":[[[0,9],[0,9]]]}"#)
            .is_ok()
    );
}

#[test]
fn non_utf8_record_is_skipped_not_fatal() {
    let mut bytes = Vec::new();
    for i in 0..10 {
        if i == 4 {
            bytes.extend_from_slice(b"{\"drawing\":\xff\xfe}");
        } else {
            bytes.extend_from_slice(GOOD.as_bytes());
        }
        bytes.push(b'\n');
    }

    let cfg = BatchConfig {
        index_mode: IndexMode::SourceLine,
        ..BatchConfig::default()
    };
    let mut sink = InMemorySink::new();
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(bytes),
        &mut sink,
        &cfg,
    )
    .unwrap();

    assert_eq!((report.attempted, report.rendered, report.skipped), (10, 9, 1));
    assert_eq!(sink.indices(), vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
    assert!(sink.is_finished());
}

#[test]
fn render_bytes_reports_bad_encoding_as_parse_error() {
    let pipeline = Pipeline::default();
    let err = pipeline.render_bytes(b"\xc3\x28").unwrap_err();
    assert!(err.is_skippable(), "{err}");
    assert!(pipeline.render_bytes(GOOD.as_bytes()).is_ok());
}

#[test]
fn crlf_line_endings_are_accepted() {
    let text = format!("{GOOD}\r\n{GOOD}\r\n");
    let report = convert_lines(
        &Pipeline::default(),
        &source("cat"),
        Cursor::new(text),
        &mut InMemorySink::new(),
        &BatchConfig::default(),
    )
    .unwrap();
    assert_eq!(report.rendered, 2);
}
