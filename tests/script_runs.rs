//! Integration tests running command scripts from files

use hashledger::script::{CommandError, Interpreter};
use hashledger::{ErrorKind, TOTAL_SUPPLY};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::TempDir;

/// Writes `contents` to a script file and runs it with a fresh interpreter.
fn run_script_file(
    contents: &str,
) -> Result<(Interpreter, hashledger::script::ScriptReport), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("ledger.script");
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    drop(file);

    let mut interpreter = Interpreter::new();
    let report = interpreter.run_script(BufReader::new(File::open(&path)?))?;
    Ok((interpreter, report))
}

fn header() -> String {
    "\
# sample ledger script
access-type admin
create-ledger test description \"a test ledger\" seed \"abc\"
create-account alice
create-account bob
"
    .to_string()
}

#[test]
fn test_full_block_script() -> Result<(), Box<dyn std::error::Error>> {
    let mut script = header();
    script.push_str("process-transaction 1 amount 100 fee 10 note \"hello alice\" payer master receiver alice\n");
    for id in 2..=10 {
        writeln!(
            script,
            "process-transaction {} amount 1 fee 10 note 'filler' payer master receiver bob",
            id
        )?;
    }
    script.push_str("get-account-balance alice\n");
    script.push_str("get-account-balance master\n");
    script.push_str("get-block 1\n");
    script.push_str("validate\n");

    let (interpreter, report) = run_script_file(&script)?;
    assert!(!report.has_errors(), "{:?}", report.errors().collect::<Vec<_>>());

    let output = report.output_lines();
    assert_eq!(output[0], "# sample ledger script");
    assert!(output.contains(&"100"));
    let master = (TOTAL_SUPPLY - 100 - 9).to_string();
    assert!(output.contains(&master.as_str()));
    assert!(output.contains(&"Block Number: 1"));
    assert!(output.contains(&"Previous Hash: abc"));
    assert!(output.contains(&"blockchain is valid"));

    assert_eq!(interpreter.ledger().unwrap().open_block_number(), 2);
    Ok(())
}

#[test]
fn test_failures_are_annotated_and_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut script = header();
    script.push_str("process-transaction 1 amount 100 fee 5 note x payer master receiver alice\n");
    script.push_str("get-block 1\n");
    script.push_str("frobnicate\n");
    script.push_str("create-account carol\n");

    let (interpreter, report) = run_script_file(&script)?;
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 3);

    assert_eq!(errors[0].line, 6);
    match &errors[0].source {
        CommandError::Ledger(err) => {
            assert!(matches!(err.kind, ErrorKind::FeeTooLow { .. }))
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(errors[0].to_string().starts_with("line 6: process-transaction 1"));

    assert_eq!(errors[1].line, 7);
    assert!(matches!(errors[2].source, CommandError::UnknownCommand(_)));

    // The line after the failures still ran.
    let ledger = interpreter.ledger().unwrap();
    assert!(ledger.clone().create_account("carol").is_err());
    Ok(())
}

#[test]
fn test_set_commands_only_touch_copies() -> Result<(), Box<dyn std::error::Error>> {
    let mut script = header();
    for id in 1..=10 {
        writeln!(
            script,
            "process-transaction {} amount 5 fee 10 note n payer master receiver alice",
            id
        )?;
    }
    script.push_str("set-block-hash 1 deadbeef\n");
    script.push_str("set-transaction-amount 3 1000000\n");
    script.push_str("validate\n");
    script.push_str("get-transaction 3\n");

    let (_interpreter, report) = run_script_file(&script)?;
    assert!(!report.has_errors());
    let output = report.output_lines();
    assert!(output.contains(&"blockchain is valid"));
    assert!(output.contains(&"Amount: 5"));
    Ok(())
}

#[test]
fn test_admin_script_creates_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let (interpreter, report) =
        run_script_file("access-type admin\ncreate-ledger t description d seed abc\ncreate-account alice\n")?;
    assert!(!report.has_errors(), "{:?}", report.errors().collect::<Vec<_>>());
    assert_eq!(interpreter.ledger().unwrap().name(), "t");
    Ok(())
}

#[test]
fn test_user_script_cannot_create_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let (interpreter, report) =
        run_script_file("access-type user\ncreate-ledger t description d seed abc\ncreate-account alice\n")?;
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line, 2);
    assert!(matches!(errors[0].source, CommandError::AdminRequired));
    assert!(matches!(errors[1].source, CommandError::NoLedger));
    assert!(interpreter.ledger().is_none());
    Ok(())
}
