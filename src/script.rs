//! Line-oriented command interpreter driving a [`Ledger`].
//!
//! Each script line is tokenized (quotes group words), dispatched to one
//! ledger operation, and turned into output lines. Failures are collected
//! with their line number and execution continues with the next line.
//!
//! Scripts start without an access type. `access-type admin` must run
//! before `create-ledger`; every other command is open to both modes.

use crate::blockchain::Ledger;
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionId};
use std::io::BufRead;
use tracing::debug;

const ACCESS_TYPE_USAGE: &str = "access-type <admin | user>";
const CREATE_LEDGER_USAGE: &str = "create-ledger <name> description <description> seed <seed>";
const PROCESS_TRANSACTION_USAGE: &str = "process-transaction <transaction-id> amount <amount> fee <fee> note <note> payer <account-address> receiver <account-address>";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("command should follow form: {0}")]
    Usage(&'static str),
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("no ledger has been created")]
    NoLedger,
    #[error("admin access required (run access-type admin first)")]
    AdminRequired,
    #[error("transaction {0} does not exist")]
    TransactionNotFound(TransactionId),
    #[error("invalid command: {0:?}")]
    UnknownCommand(String),
    #[error("could not parse line: {0}")]
    Parse(String),
}

/// A failed script line, annotated with where it came from.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {command}: {source}")]
pub struct ScriptError {
    pub line: usize,
    pub command: String,
    pub source: CommandError,
}

#[derive(Debug)]
pub enum LineOutcome {
    Output { line: usize, lines: Vec<String> },
    Failed(ScriptError),
}

#[derive(Debug, Default)]
pub struct ScriptReport {
    pub outcomes: Vec<LineOutcome>,
}

impl ScriptReport {
    pub fn errors(&self) -> impl Iterator<Item = &ScriptError> {
        self.outcomes.iter().filter_map(|o| match o {
            LineOutcome::Failed(e) => Some(e),
            LineOutcome::Output { .. } => None,
        })
    }

    /// All output lines in script order, failures excluded.
    pub fn output_lines(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .flat_map(|o| match o {
                LineOutcome::Output { lines, .. } => lines.as_slice(),
                LineOutcome::Failed(_) => &[][..],
            })
            .map(String::as_str)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Who is running the script. Only admins may create ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Admin,
    User,
}

impl AccessType {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "admin" => Some(AccessType::Admin),
            "user" => Some(AccessType::User),
            _ => None,
        }
    }
}

/// Holds the current ledger, if one has been created, and the access type
/// selected by the script.
#[derive(Debug, Default)]
pub struct Interpreter {
    ledger: Option<Ledger>,
    access: Option<AccessType>,
}

impl Interpreter {
    /// A fresh interpreter with no ledger and no access type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing ledger instead of waiting for `create-ledger`.
    /// The access type is still unset.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Interpreter {
            ledger: Some(ledger),
            access: None,
        }
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        self.ledger.as_ref()
    }

    pub fn access(&self) -> Option<AccessType> {
        self.access
    }

    fn ledger_ref(&self) -> Result<&Ledger, CommandError> {
        self.ledger.as_ref().ok_or(CommandError::NoLedger)
    }

    fn ledger_mut(&mut self) -> Result<&mut Ledger, CommandError> {
        self.ledger.as_mut().ok_or(CommandError::NoLedger)
    }

    /// Runs every line of `reader`, continuing past failures.
    pub fn run_script<R: BufRead>(&mut self, reader: R) -> std::io::Result<ScriptReport> {
        let mut report = ScriptReport::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let outcome = match self.execute(&line) {
                Ok(lines) => LineOutcome::Output {
                    line: number,
                    lines,
                },
                Err(source) => LineOutcome::Failed(ScriptError {
                    line: number,
                    command: line.trim().to_string(),
                    source,
                }),
            };
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Executes a single line and returns what it printed.
    pub fn execute(&mut self, line: &str) -> Result<Vec<String>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        if trimmed.starts_with('#') {
            return Ok(vec![trimmed.to_string()]);
        }

        let tokens = shell_words::split(trimmed).map_err(|e| CommandError::Parse(e.to_string()))?;
        let Some((command, args)) = tokens.split_first() else {
            return Ok(Vec::new());
        };
        debug!("Executing {} with {} argument(s)", command, args.len());

        match command.as_str() {
            "access-type" => {
                let [mode] = args else {
                    return Err(CommandError::Usage(ACCESS_TYPE_USAGE));
                };
                let access = AccessType::parse(mode).ok_or(CommandError::Usage(ACCESS_TYPE_USAGE))?;
                debug!("Access type set to {:?}", access);
                self.access = Some(access);
                Ok(Vec::new())
            }
            "create-ledger" => self.create_ledger(args),
            "create-account" => {
                let [address] = args else {
                    return Err(CommandError::Usage("create-account <account-address>"));
                };
                self.ledger_mut()?.create_account(address)?;
                Ok(Vec::new())
            }
            "get-account-balance" => {
                let [address] = args else {
                    return Err(CommandError::Usage("get-account-balance <account-address>"));
                };
                let balance = self.ledger_ref()?.get_account_balance(address)?;
                Ok(vec![balance.to_string()])
            }
            "get-account-balances" => {
                if !args.is_empty() {
                    return Err(CommandError::Usage("get-account-balances"));
                }
                let balances = self.ledger_ref()?.get_account_balances()?;
                Ok(balances
                    .iter()
                    .map(|(address, balance)| format!("{}: {}", address, balance))
                    .collect())
            }
            "process-transaction" => self.process_transaction(args),
            "get-block" => {
                let [number] = args else {
                    return Err(CommandError::Usage("get-block <block-number>"));
                };
                let block = self.ledger_ref()?.get_block(parse_number(number)?)?;
                Ok(block.to_string().lines().map(str::to_string).collect())
            }
            "set-block-hash" => {
                let [number, hash] = args else {
                    return Err(CommandError::Usage("set-block-hash <block-number> <hash>"));
                };
                // Only the returned copy changes; the chain is untouched.
                let mut block = self.ledger_ref()?.get_block(parse_number(number)?)?;
                block.hash = hash.clone();
                Ok(vec![format!("copy of block {} now has hash {}", block.number, block.hash)])
            }
            "get-transaction" => {
                let [id] = args else {
                    return Err(CommandError::Usage("get-transaction <transaction-id>"));
                };
                let tx = self.find_transaction(parse_number(id)?)?;
                Ok(tx.to_string().lines().map(str::to_string).collect())
            }
            "set-transaction-amount" => {
                let [id, amount] = args else {
                    return Err(CommandError::Usage(
                        "set-transaction-amount <transaction-id> <amount>",
                    ));
                };
                let amount = parse_number(amount)?;
                let copy = self.find_transaction(parse_number(id)?)?.with_amount(amount);
                Ok(vec![format!(
                    "copy of transaction {} now has amount {}",
                    copy.id(),
                    copy.amount()
                )])
            }
            "validate" => {
                if !args.is_empty() {
                    return Err(CommandError::Usage("validate"));
                }
                self.ledger_ref()?.validate()?;
                Ok(vec!["blockchain is valid".to_string()])
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    fn create_ledger(&mut self, args: &[String]) -> Result<Vec<String>, CommandError> {
        if self.access != Some(AccessType::Admin) {
            return Err(CommandError::AdminRequired);
        }
        match args {
            [name, kw_desc, description, kw_seed, seed]
                if kw_desc == "description" && kw_seed == "seed" =>
            {
                self.ledger = Some(Ledger::new(name.clone(), description.clone(), seed.clone()));
                Ok(Vec::new())
            }
            _ => Err(CommandError::Usage(CREATE_LEDGER_USAGE)),
        }
    }

    fn process_transaction(&mut self, args: &[String]) -> Result<Vec<String>, CommandError> {
        let [id, kw_amount, amount, kw_fee, fee, kw_note, note, kw_payer, payer, kw_receiver, receiver] =
            args
        else {
            return Err(CommandError::Usage(PROCESS_TRANSACTION_USAGE));
        };
        let keywords = [kw_amount, kw_fee, kw_note, kw_payer, kw_receiver];
        let expected = ["amount", "fee", "note", "payer", "receiver"];
        if keywords.iter().zip(expected).any(|(kw, want)| kw.as_str() != want) {
            return Err(CommandError::Usage(PROCESS_TRANSACTION_USAGE));
        }

        let tx = Transaction::new(
            parse_number(id)?,
            parse_number(amount)?,
            parse_number(fee)?,
            note.clone(),
            payer.clone(),
            receiver.clone(),
        );
        self.ledger_mut()?.process_transaction(tx)?;
        Ok(Vec::new())
    }

    fn find_transaction(&self, id: TransactionId) -> Result<Transaction, CommandError> {
        self.ledger_ref()?
            .get_transaction(id)
            .ok_or(CommandError::TransactionNotFound(id))
    }
}

fn parse_number(token: &str) -> Result<u64, CommandError> {
    token
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidNumber(token.to_string()))
}
