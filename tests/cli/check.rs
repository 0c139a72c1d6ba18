use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr_of, stdout_of};

const UNCOVERED_LINE_2: &str = r#"{
  "expressions": {
    "covered_count": 4,
    "uncovered_count": 1,
    "uncovered_locs": [
      {
        "start": {"line": 2, "column": 11, "offset": 19},
        "end": {"line": 2, "column": 13, "offset": 22}
      }
    ]
  }
}"#;

const UNCOVERED_LINE_3: &str = r#"{
  "expressions": {
    "covered_count": 4,
    "uncovered_count": 1,
    "uncovered_locs": [
      {
        "start": {"line": 3, "column": 11, "offset": 50},
        "end": {"line": 3, "column": 13, "offset": 53}
      }
    ]
  }
}"#;

#[cfg(unix)]
#[test]
fn test_unsuppressed_line_arcanist() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "// @flow\nconst x = bad;\n")?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_2)?;
    test.install_fake_flow()?;

    let output = test
        .check_command()
        .args(["--format", "arcanist", "src/a.js"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(
        stdout_of(&output).trim_end(),
        @"src/a.js:::The expression from 2:11-13 is not covered by flow! If it's unavoidable, put '// flow-uncovered-line' at the end of the line or '// flow-next-uncovered-line' on the line above:::19"
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_suppressed_line_passes() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.js",
        "// @flow\nconst x = bad; // flow-uncovered-line\n",
    )?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_2)?;
    test.install_fake_flow()?;

    let output = test.check_command().arg("src/a.js").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "\u{2713} Checked 1 file - no problems found\n"
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_stale_pragma_console() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.js",
        "// @flow\nconst ok = 1; // flow-uncovered-line\nconst x = bad; // flow-uncovered-line\n",
    )?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_3)?;
    test.install_fake_flow()?;

    let output = test.check_command().arg("src/a.js").output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("error: The expression in line 2 is covered by flow!"));
    assert!(stdout.contains("stale-line"));
    assert!(stdout.contains("--> src/a.js:2:1"));
    assert!(stdout.contains("1 problem in 1 file"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_directory_argument() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "// @flow\nconst x = bad;\n")?;
    test.write_file("src/b.js", "const plain = 1;\n")?;
    test.write_file("src/styles.css", "body {}\n")?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_2)?;
    test.install_fake_flow()?;

    let output = test
        .check_command()
        .args(["--format", "json", "src"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
    let warnings = value.as_array().expect("array of warnings");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["path"], "src/a.js");
    assert_eq!(warnings[0]["kind"], "uncovered-line");
    assert_eq!(warnings[0]["annotationLevel"], "failure");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_opted_out_file_never_runs_flow() -> Result<()> {
    // No coverage file: running flow for it would fail the whole run.
    let test = CliTest::with_file(
        "src/a.js",
        "// @flow\n/* flow-uncovered-file */\nconst x = bad;\n",
    )?;
    test.install_fake_flow()?;

    let output = test.check_command().arg("src/a.js").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "\u{2713} Checked 0 files - no problems found\n"
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unmatched_end_pragma_aborts() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.js",
        "// @flow\nconst x = bad;\n/* end flow-uncovered-block */\n",
    )?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_2)?;
    test.install_fake_flow()?;

    let output = test.check_command().arg("src/a.js").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("src/a.js:3: unmatched end ignore pragma"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_flow_failure_aborts() -> Result<()> {
    // Flow-checked file without canned coverage: the fake flow exits non-zero.
    let test = CliTest::with_file("src/a.js", "// @flow\nconst x = bad;\n")?;
    test.install_fake_flow()?;

    let output = test.check_command().arg("src/a.js").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("flow coverage failed for src/a.js"));

    Ok(())
}

#[cfg(unix)]
const UNCOVERED_A_JS: &str = "src/a.js:::The expression from 2:11-13 is not covered by flow! \
If it's unavoidable, put '// flow-uncovered-line' at the end of the line or \
'// flow-next-uncovered-line' on the line above:::19\n";

/// Repository with `src/a.js` modified after the initial commit.
#[cfg(unix)]
fn changed_repository() -> Result<CliTest> {
    let test = CliTest::with_file("src/a.js", "// @flow\nconst x = 1;\n")?;
    test.write_file("src/b.js", "// @flow\nconst y = 1;\n")?;
    test.install_fake_flow()?;
    test.git_commit_all()?;

    test.write_file("src/a.js", "// @flow\nconst x = bad;\n")?;
    test.write_coverage("src/a.js", UNCOVERED_LINE_2)?;
    Ok(test)
}

#[cfg(unix)]
#[test]
fn test_changed_files_since_base_ref() -> Result<()> {
    let test = changed_repository()?;

    let output = test
        .check_command()
        .args(["--format", "arcanist", "--base-ref", "HEAD"])
        .output()?;

    assert_eq!(output.status.code(), Some(1), "{}", stderr_of(&output));
    assert_eq!(stdout_of(&output), UNCOVERED_A_JS);

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_changed_files_from_subdirectory() -> Result<()> {
    let test = changed_repository()?;
    let flow_bin = test.root().join("bin/flow");

    let output = test
        .command_in("src")
        .arg("check")
        .arg("--flow-bin")
        .arg(&flow_bin)
        .args(["--format", "arcanist", "--base-ref", "HEAD"])
        .output()?;

    // Paths are shown relative to the directory flowcov runs in.
    assert_eq!(output.status.code(), Some(1), "{}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        UNCOVERED_A_JS.strip_prefix("src/").unwrap_or(UNCOVERED_A_JS)
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unchanged_repository_has_no_files() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "// @flow\nconst x = bad;\n")?;
    test.install_fake_flow()?;
    test.git_commit_all()?;

    let output = test.check_command().args(["--base-ref", "HEAD"]).output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "No files to check\n");

    Ok(())
}

#[test]
fn test_no_paths_and_no_base_ref() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("No paths given and no base ref configured"));

    Ok(())
}

#[test]
fn test_ignored_files_are_skipped() -> Result<()> {
    let test = CliTest::with_file("vendor/lib.js", "// @flow\nconst x = bad;\n")?;
    test.write_file(".flowcovrc.json", r#"{ "ignores": ["vendor/**"] }"#)?;

    let output = test.check_command().arg("vendor").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "No files to check\n");

    Ok(())
}
