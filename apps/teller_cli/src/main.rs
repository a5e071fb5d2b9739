use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use ledger_client::{load_profile, HttpLedgerClient, LedgerGateway, ProfileOverrides};
use sha2::{Digest, Sha256};
use shared::{domain::NewAccount, error::LedgerError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "teller", version, about = "Banking chaincode operations from the shell")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    gateway_url: Option<String>,
    #[arg(long)]
    org: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long, value_delimiter = ',')]
    peers: Option<Vec<String>>,
    #[arg(long)]
    chaincode: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Balance {
        username: String,
    },
    Deposit {
        username: String,
        amount: String,
    },
    Withdraw {
        username: String,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
    CreateAccount(CreateAccountArgs),
    Account {
        user_id: String,
        /// Identity used to read the record.
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
    /// Transfer booked under a sender, receiver and reference number.
    TransferRecord {
        sender: String,
        receiver: String,
        reference: String,
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
    TransferByKey {
        state_key: String,
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
    Accounts {
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
    Transfers {
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
    Transactions {
        #[arg(long = "as", default_value = "admin")]
        requestor: String,
    },
}

#[derive(ClapArgs, Debug)]
struct CreateAccountArgs {
    /// Identity submitting the transaction.
    #[arg(long = "as", default_value = "admin")]
    requestor: String,
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    name: String,
    /// Hashed before submission; only the digest reaches the ledger.
    #[arg(long)]
    aadhaar: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Hashed before submission.
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "customer")]
    role: String,
    #[arg(long, default_value = "0")]
    balance: String,
}

impl CreateAccountArgs {
    fn into_new_account(self) -> (String, NewAccount) {
        let account = NewAccount {
            user_id: self.user_id,
            name: self.name,
            aadhaar_hash: sha256_hex(self.aadhaar.trim()),
            email: self.email,
            password_hash: sha256_hex(&self.password),
            phone_number: self.phone,
            role: self.role,
            opening_balance: self.balance,
        };
        (self.requestor, account)
    }
}

impl Cli {
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            gateway_url: self.gateway_url.clone(),
            org: self.org.clone(),
            channel: self.channel.clone(),
            peers: self.peers.clone(),
            chaincode: self.chaincode.clone(),
        }
    }
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Renders a failure for the terminal, naming the ledger error kind when there is one.
fn describe_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LedgerError>() {
        Some(ledger) => format!("{}: {}", ledger.kind().label(), ledger.message()),
        None => format!("{err:#}"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let profile = load_profile(cli.config.as_deref(), &cli.overrides())
        .context("failed to load network profile")?;
    let client = HttpLedgerClient::from_profile(&profile)?;
    let gateway = LedgerGateway::from_profile(client, &profile);

    match cli.command {
        Command::Balance { username } => {
            let payload = gateway.query_balance(&username).await?;
            println!("Balance for {}: {payload}", username.trim());
        }
        Command::Deposit { username, amount } => {
            let payload = gateway.deposit(&username, &amount).await?;
            println!("Deposit result: {payload}");
        }
        Command::Withdraw { username, amount } => {
            let payload = gateway.withdraw(&username, &amount).await?;
            println!("Withdrawal result: {payload}");
        }
        Command::Transfer { from, to, amount } => {
            let payload = gateway.transfer(&from, &to, &amount).await?;
            println!("Transfer result: {payload}");
        }
        Command::CreateAccount(args) => {
            let (requestor, account) = args.into_new_account();
            let payload = gateway.create_account(&requestor, &account).await?;
            if payload.is_empty() {
                println!("created account {}", account.user_id.trim());
            } else {
                println!("created account {}: {payload}", account.user_id.trim());
            }
        }
        Command::Account { user_id, requestor } => {
            let account = gateway.get_account(&requestor, &user_id).await?;
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
        Command::TransferRecord {
            sender,
            receiver,
            reference,
            requestor,
        } => {
            let record = gateway
                .get_transfer(&requestor, &sender, &receiver, &reference)
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::TransferByKey {
            state_key,
            requestor,
        } => {
            let record = gateway
                .get_transfer_by_state_key(&requestor, &state_key)
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Accounts { requestor } => {
            let accounts = gateway.list_accounts(&requestor).await?;
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
        Command::Transfers { requestor } => {
            let transfers = gateway.list_transfers(&requestor).await?;
            println!("{}", serde_json::to_string_pretty(&transfers)?);
        }
        Command::Transactions { requestor } => {
            let transactions = gateway.list_transactions(&requestor).await?;
            println!("{}", serde_json::to_string_pretty(&transactions)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("teller command failed: {err:?}");
            eprintln!("error: {}", describe_failure(&err));
            ExitCode::FAILURE
        }
    }
}
