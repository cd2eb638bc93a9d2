use chrono::TimeZone as _;

use super::*;

fn at() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
}

#[test]
fn header_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let log = ActivityLog::new(dir.path().join("logs").join("activity.csv"));

    log.append_at(at(), "cards", 12).unwrap();
    log.append_at(at(), "cards", 3).unwrap();

    let text = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(
        text,
        "timestamp,image_count,source\n\
         2024-03-09 14:05:07,12,cards\n\
         2024-03-09 14:05:07,3,cards\n"
    );
}

#[test]
fn sources_with_delimiters_are_quoted() {
    assert_eq!(csv_field("plain"), "plain");
    assert_eq!(csv_field("a,b"), "\"a,b\"");
    assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
}

#[test]
fn append_uses_the_current_time() {
    let dir = tempfile::tempdir().unwrap();
    let log = ActivityLog::new(dir.path().join("a.csv"));
    log.append("src", 1).unwrap();

    let text = std::fs::read_to_string(log.path()).unwrap();
    let line = text.lines().nth(1).unwrap();
    assert!(line.ends_with(",1,src"), "{line}");
    assert_eq!(line.len(), "YYYY-MM-DD HH:MM:SS,1,src".len());
}
