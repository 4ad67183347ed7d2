use std::fs;
use std::process::Command;

#[test]
fn test_translate_js_to_python_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.js");
    fs::write(&input, "// Say hello\nconsole.log(\"Hello, world!\")\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rosetta"))
        .args(["--from", "js", "--to", "python"])
        .arg(&input)
        .output()
        .expect("binary should run");

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("# Say hello"));
    assert!(stdout.contains("print(\"Hello, world!\")"));
}

#[test]
fn test_translate_py_to_tcl_with_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("loop.py");
    let out_path = dir.path().join("loop.tcl");
    fs::write(&input, "for i in [1, 2, 3]:\n    print(i)\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rosetta"))
        .args(["--from", "py", "--to", "tcl", "-o"])
        .arg(&out_path)
        .arg(&input)
        .output()
        .expect("binary should run");

    assert!(output.status.success(), "{:?}", output);
    let translated = fs::read_to_string(&out_path).unwrap();
    assert!(translated.contains("foreach i [list 1 2 3] {"));
    assert!(translated.contains("puts $i"));
}

#[test]
fn test_parse_error_exits_nonzero_with_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.py");
    fs::write(&input, "x = (1 + 2\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rosetta"))
        .args(["--from", "py", "--to", "python"])
        .arg(&input)
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_target_tag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("x.py");
    fs::write(&input, "x = 1\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rosetta"))
        .args(["--from", "py", "--to", "cobol"])
        .arg(&input)
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unsupported --to"));
}
