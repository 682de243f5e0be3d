use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

// port 9 (discard) is closed on test hosts, so no request ever succeeds
const UNREACHABLE: &str = "http://127.0.0.1:9";

const VALID_FORM: &str = "card=4111 1111 1111 1111\nexpiry=12/99\ncvv=123\namount=100.50\n";

#[test]
fn test_deferred_without_installments_is_reported_inline() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--base-url", UNREACHABLE])
        .write_stdin(format!("{VALID_FORM}deferred=yes\nsubmit\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cuotas: required when deferred"))
        .stdout(predicate::str::contains("submitted").not());

    Ok(())
}

#[test]
fn test_every_invalid_field_is_listed() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--base-url", UNREACHABLE])
        .write_stdin("card=4111\nexpiry=13/30\ncvv=12\namount=abc\nsubmit\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cardNumber: must be exactly 16 digits"))
        .stdout(predicate::str::contains(
            "expiryDate: expiry date month must be between 01 and 12",
        ))
        .stdout(predicate::str::contains("cvv: must be exactly 3 digits"))
        .stdout(predicate::str::contains("amount: must be a valid number"));

    Ok(())
}

#[test]
fn test_bad_lines_are_reported_and_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--base-url", UNREACHABLE])
        .write_stdin("colour=blue\ndeferred=maybe\ndeferred=yes\nsubmit\n");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Error reading command: line 1: unknown field 'colour'",
        ))
        .stderr(predicate::str::contains("Error reading command: line 2"))
        .stdout(predicate::str::contains("cuotas: required when deferred"));

    Ok(())
}

#[test]
fn test_unreachable_processor_shows_error_notification() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--base-url", UNREACHABLE])
        .write_stdin(format!("{VALID_FORM}submit\n"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[ERROR] Error:"));

    Ok(())
}

#[test]
fn test_settings_file_is_honoured() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::with_suffix(".toml")?;
    writeln!(file, "[gateway]\nbase_url = \"not a url\"")?;

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("--config").arg(file.path()).write_stdin("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid gateway URL"));

    Ok(())
}

#[test]
fn test_missing_settings_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--config", "does/not/exist.toml"]).write_stdin("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}
