//! Unit tests for the source loader.

use camino::Utf8PathBuf;
use hashindent_syntax::{SourceLoadError, load_sources};
use std::fs;
use tempfile::TempDir;

fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn root_path(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
}

fn write(root: &Utf8PathBuf, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn targets(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_empty_directory() {
    let temp = create_temp_dir();
    let root = root_path(&temp);

    let sources = load_sources(&root, &targets(&["."]), &[]).unwrap();
    assert!(sources.is_empty());
}

#[test]
fn test_missing_target_yields_nothing() {
    let temp = create_temp_dir();
    let root = root_path(&temp);

    let sources = load_sources(&root, &targets(&["nope/**/*.rb"]), &[]).unwrap();
    assert!(sources.is_empty());
}

#[test]
fn test_directory_scans_ruby_files_recursively() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "app/models/user.rb", b"a = {}\n");
    write(&root, "lib/tasks/x.rb", b"b = {}\n");
    write(&root, "README.md", b"# not ruby\n");

    let sources = load_sources(&root, &targets(&["."]), &[]).unwrap();
    let paths: Vec<_> = sources.iter().map(|s| s.display_path.as_str()).collect();
    assert_eq!(paths, vec!["app/models/user.rb", "lib/tasks/x.rb"]);
    assert!(sources.iter().all(|s| s.source.is_ok()));
}

#[test]
fn test_sorted_and_deduplicated() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "zebra.rb", b"");
    write(&root, "alpha.rb", b"");
    write(&root, "middle.rb", b"");

    let sources = load_sources(&root, &targets(&["zebra.rb", "*.rb", "alpha.rb"]), &[]).unwrap();
    let paths: Vec<_> = sources.iter().map(|s| s.display_path.as_str()).collect();
    assert_eq!(paths, vec!["alpha.rb", "middle.rb", "zebra.rb"]);
}

#[test]
fn test_explicit_file_with_other_extension() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "Gemfile", b"gem 'rails', require: false\n");

    let sources = load_sources(&root, &targets(&["Gemfile"]), &[]).unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].display_path, "Gemfile");
}

#[test]
fn test_exclude_patterns() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "app/a.rb", b"");
    write(&root, "vendor/bundle/b.rb", b"");

    let sources =
        load_sources(&root, &targets(&["**/*.rb"]), &targets(&["vendor/**"])).unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].display_path, "app/a.rb");
}

#[test]
fn test_invalid_exclude_pattern_is_an_error() {
    let temp = create_temp_dir();
    let root = root_path(&temp);

    let err = load_sources(&root, &targets(&["."]), &targets(&["[unclosed"])).unwrap_err();
    assert!(err.to_string().contains("invalid exclude pattern"));
}

#[test]
fn test_invalid_utf8_collected_without_failing() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "good.rb", b"a = { b: 1 }\n");
    write(&root, "bad.rb", &[0x61, 0x20, 0xff, 0xfe, 0x0a]);

    let sources = load_sources(&root, &targets(&["."]), &[]).unwrap();
    assert_eq!(sources.len(), 2);

    let good = sources.iter().find(|s| s.display_path == "good.rb").unwrap();
    let bad = sources.iter().find(|s| s.display_path == "bad.rb").unwrap();
    assert!(good.source.is_ok());
    assert!(matches!(bad.source, Err(SourceLoadError::Utf8 { .. })));
}

#[test]
fn test_loaded_text_is_preserved() {
    let temp = create_temp_dir();
    let root = root_path(&temp);
    write(&root, "crlf.rb", b"a = {\r\n  b: 1\r\n}\r\n");

    let sources = load_sources(&root, &targets(&["crlf.rb"]), &[]).unwrap();
    let source = sources[0].source.as_ref().unwrap();
    assert_eq!(source.text(), "a = {\r\n  b: 1\r\n}\r\n");
    assert_eq!(source.line_text(2), Some("  b: 1"));
}
