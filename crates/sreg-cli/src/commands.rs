//! # Registry Subcommands
//!
//! Each mutating subcommand loads the ledger, applies one operation as the
//! identity given by `--from`, and writes the ledger back only if the
//! operation succeeded. Query subcommands never write.
//!
//! ```bash
//! sreg deploy --owner 0x01..01
//! sreg fund --account 0xa1..a1 --amount 2eth
//! sreg pay-fee --from 0xa1..a1
//! sreg register --from 0xa1..a1 --name Ada --age 19
//! sreg authorize --from 0x01..01 --student 0xa1..a1
//! sreg list
//! ```

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;
use sreg_core::{Address, Wei};
use sreg_state::{Ledger, Student};

use crate::config::CliConfig;
use crate::store::{load_ledger, save_ledger, update_ledger};

#[derive(Subcommand, Debug, Clone)]
pub enum RegistryCommand {
    /// Deploy a new registry with an empty roster.
    Deploy {
        /// Owner identity.
        #[arg(long)]
        owner: Address,
    },

    /// Credit an external account (test funding).
    Fund {
        #[arg(long)]
        account: Address,
        /// Amount, e.g. "2eth" or "1000wei".
        #[arg(long)]
        amount: Wei,
    },

    /// Make an external account refuse (or accept again) incoming payouts.
    RejectValue {
        #[arg(long)]
        account: Address,
        /// Accept payouts again instead.
        #[arg(long)]
        accept: bool,
    },

    /// Pay the registration fee from the caller's balance. Owner and
    /// fee-amount rejections are reported before insufficient funds.
    PayFee {
        #[arg(long)]
        from: Address,
        /// Attached value. Defaults to the configured fee.
        #[arg(long)]
        value: Option<Wei>,
    },

    /// Register a name and age after paying.
    Register {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u8,
    },

    /// Authorize a registered student (owner only).
    Authorize {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        student: Address,
    },

    /// Delete a student record and compact the roster (owner only).
    Remove {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        student: Address,
    },

    /// Send custody funds to a recipient (owner only).
    Transfer {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: Wei,
    },

    /// Send the whole custody balance to the owner (owner only).
    Withdraw {
        #[arg(long)]
        from: Address,
    },

    /// Hand ownership to another identity (owner only).
    ModifyOwner {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        new_owner: Address,
    },

    /// Show the authorized student at a 1-based position.
    Student {
        #[arg(long)]
        index: u64,
    },

    /// Show the record for an identity (zero view if none).
    Lookup {
        #[arg(long)]
        address: Address,
    },

    /// List authorized students in authorization order.
    List,

    /// Show the current owner.
    Owner,

    /// Show the custody balance, or an external account's balance.
    Balance {
        #[arg(long)]
        account: Option<Address>,
    },

    /// Show the event log.
    Events,
}

/// Execute a registry subcommand against the state file at `state_path`.
pub fn run_registry(command: &RegistryCommand, config: &CliConfig, state_path: &Path) -> Result<u8> {
    match command {
        RegistryCommand::Deploy { owner } => cmd_deploy(state_path, config, *owner),

        RegistryCommand::Fund { account, amount } => {
            update_ledger(state_path, |l| l.fund(account, *amount))?;
            println!("OK: funded {account} with {amount}");
            Ok(0)
        }

        RegistryCommand::RejectValue { account, accept } => {
            update_ledger(state_path, |l| {
                l.set_rejects_value(account, !accept);
                Ok(())
            })?;
            let mode = if *accept { "accepts" } else { "rejects" };
            println!("OK: {account} now {mode} payouts");
            Ok(0)
        }

        RegistryCommand::PayFee { from, value } => {
            let paid = update_ledger(state_path, |l| {
                let value = value.unwrap_or(l.registry().fee());
                l.pay_fee(from, value).map(|()| value)
            })?;
            println!("OK: {from} paid {paid}");
            Ok(0)
        }

        RegistryCommand::Register { from, name, age } => {
            update_ledger(state_path, |l| l.register(from, name, *age))?;
            println!("OK: {from} registered as {name:?}, age {age}");
            Ok(0)
        }

        RegistryCommand::Authorize { from, student } => {
            let seq = update_ledger(state_path, |l| {
                l.authorize_student_registration(from, student)
            })?;
            println!("OK: {student} authorized at position {seq}");
            Ok(0)
        }

        RegistryCommand::Remove { from, student } => {
            update_ledger(state_path, |l| l.remove_student(from, student))?;
            println!("OK: {student} removed");
            Ok(0)
        }

        RegistryCommand::Transfer { from, to, amount } => {
            update_ledger(state_path, |l| l.transfer(from, to, *amount))?;
            println!("OK: transferred {amount} to {to}");
            Ok(0)
        }

        RegistryCommand::Withdraw { from } => {
            let amount = update_ledger(state_path, |l| l.withdraw(from))?;
            if amount.is_zero() {
                println!("OK: custody is empty, nothing withdrawn");
            } else {
                println!("OK: withdrew {amount} to {from}");
            }
            Ok(0)
        }

        RegistryCommand::ModifyOwner { from, new_owner } => {
            update_ledger(state_path, |l| l.modify_owner(from, *new_owner))?;
            println!("OK: ownership transferred from {from} to {new_owner}");
            Ok(0)
        }

        RegistryCommand::Student { index } => {
            let ledger = load_ledger(state_path)?;
            let student = ledger.registry().get_student(*index)?;
            print_student(&student);
            Ok(0)
        }

        RegistryCommand::Lookup { address } => {
            let ledger = load_ledger(state_path)?;
            print_student(&ledger.registry().get_student_from_mapping(address));
            Ok(0)
        }

        RegistryCommand::List => cmd_list(&load_ledger(state_path)?),

        RegistryCommand::Owner => {
            println!("{}", load_ledger(state_path)?.registry().get_owner());
            Ok(0)
        }

        RegistryCommand::Balance { account } => {
            let ledger = load_ledger(state_path)?;
            match account {
                Some(account) => println!("{account}: {}", ledger.balance_of(account)),
                None => println!("custody: {}", ledger.registry().custody_balance()),
            }
            Ok(0)
        }

        RegistryCommand::Events => {
            let ledger = load_ledger(state_path)?;
            let events = ledger.registry().events();
            if events.is_empty() {
                println!("No events.");
            }
            for (i, event) in events.iter().enumerate() {
                println!("  [{i}] {event}");
            }
            Ok(0)
        }
    }
}

fn cmd_deploy(state_path: &Path, config: &CliConfig, owner: Address) -> Result<u8> {
    if state_path.exists() {
        bail!("registry already deployed at {}", state_path.display());
    }
    let registry_config = config.registry_config()?;
    let ledger = Ledger::deploy(owner, registry_config.clone())?;
    save_ledger(state_path, ledger)?;
    println!(
        "OK: deployed registry owned by {owner} (fee {}, minimum age {})",
        registry_config.fee, registry_config.min_age
    );
    Ok(0)
}

fn cmd_list(ledger: &Ledger) -> Result<u8> {
    let students = ledger.registry().get_all_students();
    if students.is_empty() {
        println!("No authorized students.");
        return Ok(0);
    }
    println!("Students ({}):", students.len());
    for s in &students {
        println!("  [{}] {} {:?}, age {}", s.sequence_id, s.identity, s.name, s.age);
    }
    Ok(0)
}

fn print_student(s: &Student) {
    println!("Student: {}", s.identity);
    println!("  Name: {:?}", s.name);
    println!("  Sequence: {}", s.sequence_id);
    println!("  Age: {}", s.age);
    println!("  Paid: {}", s.has_paid);
    println!("  Authorized: {}", s.is_authorized);
}
