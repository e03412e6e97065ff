//! Sui Wallet CLI
//!
//! Command-line front end over the wallet core.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;

use sui_wallet_core::utils::{enable_debug, Network};
use sui_wallet_core::wallet::{format_base_units, format_sui, to_base_units};
use sui_wallet_core::{AppContext, CoinConfig, FeeLevel, TransferRequest};

const ENV_DEBUG: &str = "SUI_WALLET_DEBUG";
const ENV_PRIVATE_KEY: &str = "SUI_WALLET_PRIVATE_KEY";

#[derive(Parser)]
#[command(name = "sui-wallet")]
#[command(version)]
#[command(about = "Lightweight Sui wallet", long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON coin configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Network preset, overriding the configuration
    #[arg(long, global = true)]
    network: Option<NetworkArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet (12-word mnemonic)
    Generate,

    /// Restore a wallet from a mnemonic (read from stdin when omitted)
    ImportMnemonic {
        words: Vec<String>,
    },

    /// Import a private key: suiprivkey1..., comma-separated bytes, or hex
    ImportKey {
        key: String,
    },

    /// Check an address without contacting the network
    ValidateAddress {
        address: String,
    },

    /// Convert a decimal SUI amount to MIST
    ToBaseUnits {
        amount: String,
    },

    /// Query the SUI balance of an address
    Balance {
        address: String,
    },

    /// Send SUI; the key is read from SUI_WALLET_PRIVATE_KEY unless given
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Decimal SUI amount
        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "medium")]
        fee: FeeArg,

        #[arg(long)]
        key: Option<String>,
    },

    /// Request test SUI from the network faucet
    Faucet {
        address: String,
    },

    /// Show the current epoch
    Epoch,

    /// Show the status of a transaction
    Status {
        digest: String,
    },

    /// Show gas budgets and the reference gas price
    GasPrice,

    /// Show the maximum fee for a fee level
    EstimateFee {
        #[arg(long, default_value = "medium")]
        fee: FeeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Testnet => Network::Testnet,
            NetworkArg::Devnet => Network::Devnet,
            NetworkArg::Localnet => Network::Localnet,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FeeArg {
    Low,
    Medium,
    High,
}

impl From<FeeArg> for FeeLevel {
    fn from(arg: FeeArg) -> Self {
        match arg {
            FeeArg::Low => FeeLevel::Low,
            FeeArg::Medium => FeeLevel::Medium,
            FeeArg::High => FeeLevel::High,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose || std::env::var(ENV_DEBUG).map(|v| v == "1").unwrap_or(false) {
        enable_debug();
    }

    let config = CoinConfig::load_with(cli.config.as_deref(), cli.network.map(Network::from))
        .context("Failed to load configuration")?;

    let ctx = AppContext::new(config);
    let adapter = ctx.adapter();
    let json = cli.json;

    match cli.command {
        Commands::Generate => {
            let wallet = adapter.generate_wallet().await?;
            if json {
                print_json(&wallet)?;
            } else {
                println!("Address:     {}", wallet.address);
                println!("Private key: {}", wallet.private_key);
                if let Some(mnemonic) = wallet.mnemonic.as_deref() {
                    println!("Mnemonic:    {}", mnemonic);
                }
            }
        }
        Commands::ImportMnemonic { words } => {
            let phrase = if words.is_empty() {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                words.join(" ")
            };
            let wallet = adapter.import_from_mnemonic(&phrase).await?;
            if json {
                print_json(&wallet)?;
            } else {
                println!("Address:     {}", wallet.address);
                println!("Private key: {}", wallet.private_key);
            }
        }
        Commands::ImportKey { key } => {
            let normalized = adapter_normalize(&ctx, &key)?;
            if json {
                print_json(&serde_json::json!({
                    "address": normalized.0,
                    "derivation": normalized.1,
                }))?;
            } else {
                println!("Address:    {}", normalized.0);
                println!("Derivation: {}", normalized.1);
            }
        }
        Commands::ValidateAddress { address } => {
            let valid = adapter.is_valid_address(&address);
            let explorer = valid.then(|| explorer_address(adapter.config(), &address)).flatten();
            if json {
                print_json(&serde_json::json!({ "address": address, "valid": valid, "explorer": explorer }))?;
            } else {
                println!("{}", if valid { "valid" } else { "invalid" });
                if let Some(url) = explorer {
                    println!("Explorer: {}", url);
                }
            }
        }
        Commands::ToBaseUnits { amount } => {
            let mist = to_base_units(&amount)?;
            if json {
                print_json(&serde_json::json!({ "amount": amount, "mist": mist.to_string() }))?;
            } else {
                println!("{}", mist);
            }
        }
        Commands::Balance { address } => {
            let raw = adapter.get_balance(&address).await;
            let display = format_base_units(&raw, adapter.config().decimals);
            let explorer = explorer_address(adapter.config(), &address);
            if json {
                print_json(&serde_json::json!({
                    "address": address,
                    "mist": raw,
                    "sui": display,
                    "explorer": explorer,
                }))?;
            } else {
                println!("{} {}", display, adapter.config().symbol);
                if let Some(url) = explorer {
                    println!("Explorer: {}", url);
                }
            }
        }
        Commands::Send { to, amount, fee, key } => {
            let key = match key {
                Some(key) => key,
                None => std::env::var(ENV_PRIVATE_KEY)
                    .with_context(|| format!("Pass --key or set {}", ENV_PRIVATE_KEY))?,
            };
            let request = TransferRequest {
                recipient: to,
                amount,
                fee_level: fee.into(),
            };
            let result = adapter.send_transaction(&key, &request).await?;
            if json {
                print_json(&result)?;
            } else {
                println!("Transaction: {}", result.hash);
                if let Ok(network) = adapter.config().network() {
                    println!("Explorer:    {}", network.explorer_tx_url(&result.hash));
                }
            }
        }
        Commands::Faucet { address } => {
            let outcome = adapter.request_faucet(&address).await?;
            if json {
                print_json(&outcome)?;
            } else {
                println!("{}", outcome.message);
            }
        }
        Commands::Epoch => {
            let epoch = adapter.get_epoch().await;
            if json {
                print_json(&serde_json::json!({ "epoch": epoch }))?;
            } else {
                println!("{}", epoch);
            }
        }
        Commands::Status { digest } => {
            let status = adapter.get_transaction_status(&digest).await?;
            if json {
                print_json(&status)?;
            } else {
                println!("{:?} ({} confirmations)", status.status, status.confirmations);
                if let Some(error) = status.error {
                    println!("Error: {}", error);
                }
            }
        }
        Commands::GasPrice => {
            let gas = adapter.get_gas_price().await?;
            if json {
                print_json(&gas)?;
            } else {
                println!("low:    {} SUI", gas.low);
                println!("medium: {} SUI", gas.medium);
                println!("high:   {} SUI", gas.high);
                if let Some(price) = gas.reference_gas_price {
                    println!("reference gas price: {} MIST", price);
                }
            }
        }
        Commands::EstimateFee { fee } => {
            let level: FeeLevel = fee.into();
            let estimate = adapter.estimate_fee(level).await?;
            if json {
                print_json(&serde_json::json!({
                    "feeLevel": level,
                    "fee": estimate,
                    "mist": level.gas_budget().to_string(),
                }))?;
            } else {
                println!("{} SUI (budget {} MIST = {} SUI)", estimate, level.gas_budget(), format_sui(level.gas_budget()));
            }
        }
    }

    Ok(())
}

/// Address and derivation path for a private key, without touching the network
fn adapter_normalize(ctx: &AppContext, key: &str) -> Result<(String, String)> {
    let normalizer = sui_wallet_core::wallet::KeyNormalizer::new(ctx.config().key_derivation);
    let normalized = normalizer.normalize(key)?;
    Ok((normalized.keypair.address().to_hex(), normalized.path.to_string()))
}

/// Explorer page for an address on the configured network
fn explorer_address(config: &CoinConfig, address: &str) -> Option<String> {
    config.network().ok().map(|network| network.explorer_address_url(address))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
