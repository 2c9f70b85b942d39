//! Integration tests for the incremental array reader and the
//! conversation stream.

use chatfold::config::StreamingConfig;
use chatfold::parser::ArchiveParser;
use chatfold::streaming::{JsonArrayStream, StreamingError};
use std::io::Write;
use tempfile::NamedTempFile;

/// Helper to create an archive of `count` flat conversations
fn create_archive_file(count: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    let mut conversations = Vec::with_capacity(count);
    for i in 0..count {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        let timestamp = 1705314600 + (i as i64 * 60);
        conversations.push(format!(
            r#"  {{"title": "Conversation {}", "messages": [{{"role": "{}", "content": "Message number {} ünïcödé 你好", "create_time": {}}}]}}"#,
            i, role, i, timestamp
        ));
    }

    let json = format!("[\n{}\n]\n", conversations.join(",\n"));
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_array_stream_basic() {
    let file = create_archive_file(100);
    let stream = JsonArrayStream::open(file.path(), StreamingConfig::default()).unwrap();

    let values: Vec<_> = stream.map(Result::unwrap).collect();
    assert_eq!(values.len(), 100);
    assert_eq!(values[0]["title"], "Conversation 0");
    assert_eq!(values[99]["title"], "Conversation 99");
}

#[test]
fn test_array_stream_progress_reporting() {
    let file = create_archive_file(200);
    let config = StreamingConfig::new().with_chunk_size(512);
    let mut stream = JsonArrayStream::open(file.path(), config).unwrap();

    let mut last_progress = 0.0;
    while let Some(value) = stream.next() {
        value.unwrap();
        if let Some(progress) = stream.progress() {
            assert!(progress >= last_progress);
            last_progress = progress;
        }
    }

    assert!(last_progress > 90.0);
    assert_eq!(stream.values_yielded(), 200);
    assert!(stream.bytes_processed() <= stream.total_bytes().unwrap());
}

#[test]
fn test_chunk_size_does_not_change_result() {
    let file = create_archive_file(25);
    let reference: Vec<_> = JsonArrayStream::open(file.path(), StreamingConfig::default())
        .unwrap()
        .map(Result::unwrap)
        .collect();

    for chunk in [1, 2, 3, 7, 64, 4096] {
        let config = StreamingConfig::new().with_chunk_size(chunk);
        let values: Vec<_> = JsonArrayStream::open(file.path(), config)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(values, reference, "chunk size {chunk}");
    }
}

#[test]
fn test_object_document_is_not_an_array() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"  {"conversations": []}"#).unwrap();

    let mut stream = JsonArrayStream::open(file.path(), StreamingConfig::default()).unwrap();
    assert!(matches!(stream.next(), Some(Err(StreamingError::NotAnArray('{')))));
    assert!(stream.next().is_none());
}

#[test]
fn test_conversation_stream_large_file() {
    let file = create_archive_file(5_000);
    let parser = ArchiveParser::with_config(StreamingConfig::new().with_chunk_size(16 * 1024));

    let mut stream = parser.stream(file.path()).unwrap();
    let count = stream.by_ref().filter_map(Result::ok).count();
    assert_eq!(count, 5_000);
    assert!(!stream.is_fallback());
}

#[test]
fn test_conversation_stream_skips_empty_conversations() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"title": "empty", "messages": [{"content": "  "}]},
            {"title": "no mapping", "mapping": {}},
            42,
            "text",
            {"title": "kept", "messages": [{"content": "yes"}]}
        ]"#,
    )
    .unwrap();

    let titles: Vec<_> = ArchiveParser::new()
        .stream(file.path())
        .unwrap()
        .map(|c| c.unwrap().title)
        .collect();
    assert_eq!(titles, ["kept"]);
}

#[test]
fn test_stray_token_after_delivery_is_fatal() {
    // A stray token after the second element breaks the reader only after
    // two conversations were delivered.
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[{"title": "A", "messages": [{"content": "a"}]}, {"title": "B", "messages": [{"content": "b"}]} oops]"#,
    )
    .unwrap();

    let results: Vec<_> = ArchiveParser::new().stream(file.path()).unwrap().collect();
    // The bulk parse rejects the document too, so the error is fatal.
    assert!(results.iter().take(2).all(Result::is_ok));
    assert!(results.last().unwrap().as_ref().unwrap_err().is_parse());
}

#[test]
fn test_nested_arrays_are_flattened() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[[{"title": "inner", "messages": [{"content": "x"}]}], {"conversations": [{"title": "wrapped", "messages": [{"content": "y"}]}]}]"#,
    )
    .unwrap();

    let titles: Vec<_> = ArchiveParser::new()
        .stream(file.path())
        .unwrap()
        .map(|c| c.unwrap().title)
        .collect();
    assert_eq!(titles, ["inner", "wrapped"]);
}
