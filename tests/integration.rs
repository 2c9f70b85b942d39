//! Integration tests for the archive pipeline with real files.

use chatfold::core::month::build_month_files;
use chatfold::core::topics::{TOPIC_START_MARKER, split_topics};
use chatfold::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

fn layout_with_days(days: &[(&str, &str)]) -> (TempDir, OutputLayout) {
    let dir = tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    fs::create_dir_all(layout.day_dir()).unwrap();
    for (day, content) in days {
        fs::write(layout.day_file(day), content).unwrap();
    }
    (dir, layout)
}

// =========================================================================
// Month build then topic preview
// =========================================================================

#[test]
fn test_two_days_two_topics() {
    let (_dir, layout) = layout_with_days(&[
        ("2026-01-10", "1000\t[1970-01-01 00:16:40] user: first day\n"),
        ("2026-01-11", "90000\t[1970-01-02 01:00:00] user: second day\n"),
    ]);

    let months = build_month_files(&layout).unwrap();
    assert_eq!(months.get("2026-01"), Some(&2));

    let previews = TopicSegmenter::default().build_topic_previews(&layout).unwrap();
    assert_eq!(previews.get("2026-01"), Some(&2));

    let preview = fs::read_to_string(layout.preview_file("2026-01")).unwrap();
    let lines: Vec<&str> = preview.lines().collect();
    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with(TOPIC_START_MARKER))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0], 0);
    assert_eq!(lines[markers[1] + 1], "[1970-01-02 01:00:00] user: second day ^msg-000002");
}

#[test]
fn test_same_day_lines_make_one_topic() {
    let day: String = (0..20)
        .map(|i| {
            let ts = 1_767_000_000 + i * 600;
            format!("{ts}\t[2025-12-29 09:{:02}:00] user: line {i}\n", i * 2)
        })
        .collect();
    let (_dir, layout) = layout_with_days(&[("2025-12-29", day.as_str())]);

    build_month_files(&layout).unwrap();
    let previews = TopicSegmenter::default().build_topic_previews(&layout).unwrap();
    assert_eq!(previews.get("2025-12"), Some(&1));
}

// =========================================================================
// Full pipeline through the Archive orchestrator
// =========================================================================

#[test]
fn test_archive_run_then_split() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("conversations.json");
    fs::write(
        &input,
        r#"[
            {"title": "Morning", "messages": [
                {"author": {"role": "user"}, "content": {"parts": ["Plan", "the day"]}, "create_time": 1767945600},
                {"author": {"role": "assistant"}, "content": "Sure", "create_time": 1767945660000}
            ]},
            {"title": "Evening", "messages": [
                {"role": "user", "content": "换个话题, dinner?", "metadata": {"timestamp_": 1767949260}}
            ]}
        ]"#,
    )
    .unwrap();

    let archive = Archive::new(dir.path().join("vault"), ArchiveConfig::default());
    let stats = archive.run(&input).unwrap();
    assert_eq!(stats.conversations, 2);
    assert_eq!(stats.messages, 3);
    assert_eq!(stats.previews.get("2026-01"), Some(&2));

    let month = fs::read_to_string(archive.layout().month_file("2026-01")).unwrap();
    assert_eq!(
        month,
        "[2026-01-09 08:00:00] user: Plan the day ^msg-000001\n\
         [2026-01-09 08:01:00] assistant: Sure ^msg-000002\n\
         [2026-01-09 09:01:00] user: 换个话题, dinner? ^msg-000003\n"
    );

    let summary = archive
        .split_topics(Some("2026-01"), Some(archive.layout().preview_file("2026-01").as_path()))
        .unwrap();
    assert_eq!(summary.topics, 2);

    let topic_dir = archive.layout().topic_dir("2026-01");
    let second = fs::read_to_string(topic_dir.join("2026-01-09_Topic-002.md")).unwrap();
    assert!(second.starts_with("---\ntitle: 2026-01-09 Topic-002\ndate: 2026-01-09\n---\n\n"));
    assert!(second.ends_with("dinner? ^msg-000003\n"));
}

#[test]
fn test_rerun_appends_day_records_but_not_months() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("conversations.json");
    fs::write(
        &input,
        r#"[{"title": "t", "messages": [{"role": "user", "content": "once", "create_time": 1000}]}]"#,
    )
    .unwrap();

    let archive = Archive::new(dir.path().join("vault"), ArchiveConfig::default());
    archive.run(&input).unwrap();
    archive.run(&input).unwrap();

    let day = fs::read_to_string(archive.layout().day_file("1970-01-01")).unwrap();
    assert_eq!(day.lines().count(), 2);

    let month = fs::read_to_string(archive.layout().month_file("1970-01")).unwrap();
    assert_eq!(
        month,
        "[1970-01-01 00:16:40] user: once ^msg-000001\n[1970-01-01 00:16:40] user: once ^msg-000002\n"
    );
}

#[test]
fn test_split_index_lists_existing_topics() {
    let dir = tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    fs::create_dir_all(layout.topic_dir("2026-01")).unwrap();
    fs::write(layout.topic_dir("2026-01").join("older.md"), "kept").unwrap();

    let annotated = dir.path().join("a.topics.md");
    fs::write(&annotated, "[TOPIC_START] 2026-01-10 Topic-001\nbody\n").unwrap();

    let summary = split_topics(&layout, "2026-01", &annotated).unwrap();
    let index = fs::read_to_string(summary.index).unwrap();
    assert_eq!(
        index,
        "event_anchor,obsidian_path\n\
         2026-01-10_Topic-001,by_topic/2026-01/2026-01-10_Topic-001.md\n\
         older,by_topic/2026-01/older.md\n"
    );
}

#[test]
fn test_unknown_timestamps_bucket() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("conversations.json");
    fs::write(
        &input,
        r#"[{"title": "t", "messages": [{"content": "no time"}, {"content": "   "}]}]"#,
    )
    .unwrap();

    let archive = Archive::new(dir.path(), ArchiveConfig::default());
    let stats = archive.run(&input).unwrap();
    assert_eq!(stats.messages, 1);

    let month = fs::read_to_string(archive.layout().month_file("unknown")).unwrap();
    assert_eq!(month, "[] assistant: no time ^msg-000001\n");

    let preview = fs::read_to_string(archive.layout().preview_file("unknown")).unwrap();
    assert!(preview.starts_with("[TOPIC_START] unknown Topic-001\n"));
}
