//! Exit paths of the `bibfilter` binary in non-interactive mode.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const LIBRARY: &str = "\
@article{turing1950,
  author = {Alan Turing},
  year = 1950
}

@book{knuth1968,
  author = \"Donald Knuth\",
  year = {1968}
}
";

fn bib_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn bibfilter(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bibfilter"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn batch_prints_only_matching_entries() {
    let file = bib_file(LIBRARY);
    let path = file.path().to_str().unwrap();
    let output = bibfilter(&[path, "--no-interactive", "-p", "knuth"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "@book{knuth1968,\n    author = {Donald Knuth},\n    year = {1968}\n}\n"
    );
}

#[test]
fn batch_honors_case_and_writer_flags() {
    let file = bib_file(LIBRARY);
    let path = file.path().to_str().unwrap();

    let output = bibfilter(&[path, "--no-interactive", "-p", "KNUTH", "--case-sensitive"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let output = bibfilter(&[
        path,
        "--no-interactive",
        "-p",
        "19",
        "--sort-entries",
        "--indent",
        "2",
    ]);
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("@book{knuth1968,\n  author"));
    assert_eq!(text.matches('@').count(), 2);
}

#[test]
fn invalid_pattern_exits_with_error() {
    let file = bib_file(LIBRARY);
    let output = bibfilter(&[file.path().to_str().unwrap(), "--no-interactive", "-p", "("]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("invalid pattern"));
}

#[test]
fn missing_file_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bib");
    let output = bibfilter(&[path.to_str().unwrap(), "--no-interactive"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("cannot read"));
}

#[test]
fn malformed_file_exits_with_position() {
    let file = bib_file("@misc{k,\n  title = {open\n");
    let output = bibfilter(&[file.path().to_str().unwrap(), "--no-interactive"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("line 2, column 12"));
}
