//! DeFi agent plugins CLI
//!
//! Runs individual plugin tools from the command line, the same way the agent
//! calls them.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use defi_agent_plugins::config::{self, rpc};
use defi_agent_plugins::{
    Config, DynTool, Error, EvmWalletClient, MorphoPlugin, MorphoService, ProviderWalletClient,
    Result, SecureWallet, ZeroExClient, ZeroExPlugin, ZeroExService, PRIVATE_KEY_ENV,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "defi-plugins")]
#[command(about = "0x swap and Morpho Blue lending tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network name or chain id (ethereum, base, arbitrum, base-sepolia)
    #[arg(short, long, global = true, default_value = "base")]
    network: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a 0x price for selling a token
    Price {
        #[arg(long)]
        sell_token: String,
        #[arg(long)]
        buy_token: String,
        /// Amount in base units
        #[arg(long)]
        sell_amount: String,
        #[arg(long)]
        slippage_bps: Option<i64>,
        /// Taker to price for when no PRIVATE_KEY is set
        #[arg(long)]
        taker: Option<Address>,
    },

    /// Swap tokens through 0x (requires PRIVATE_KEY)
    Swap {
        #[arg(long)]
        sell_token: String,
        #[arg(long)]
        buy_token: String,
        /// Amount in base units
        #[arg(long)]
        sell_amount: String,
        #[arg(long)]
        slippage_bps: Option<i64>,
    },

    /// Show totals, last update and fee of a Morpho market
    MarketInfo {
        #[arg(long)]
        market_id: String,
    },

    /// Show the tokens, oracle, IRM and LLTV of a Morpho market
    MarketParams {
        #[arg(long)]
        market_id: String,
    },

    /// Show a user's position in a Morpho market
    Position {
        #[arg(long)]
        market_id: String,
        /// Defaults to the PRIVATE_KEY address
        #[arg(long)]
        user: Option<Address>,
    },

    /// Supply loan tokens to a Morpho market (requires PRIVATE_KEY)
    Supply {
        #[arg(long)]
        market_id: String,
        /// Amount in base units, 0 to supply by shares
        #[arg(long)]
        assets: String,
        #[arg(long)]
        shares: Option<String>,
        #[arg(long)]
        on_behalf: Option<String>,
    },

    /// Supply collateral to a Morpho market (requires PRIVATE_KEY)
    SupplyCollateral {
        #[arg(long)]
        market_id: String,
        /// Amount in base units
        #[arg(long)]
        assets: String,
        #[arg(long)]
        on_behalf: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Price {
            sell_token,
            buy_token,
            sell_amount,
            slippage_bps,
            taker,
        } => {
            let wallet = connect(&cli.network, taker).await?;
            let args = json!({
                "chain_id": wallet.chain_id(),
                "sell_token": sell_token,
                "buy_token": buy_token,
                "sell_amount": sell_amount,
                "slippage_bps": slippage_bps,
            });
            zero_ex_plugin(&config, wallet)?
                .get_price_tool()
                .call_json(args)
                .await?
        }
        Commands::Swap {
            sell_token,
            buy_token,
            sell_amount,
            slippage_bps,
        } => {
            let wallet = connect(&cli.network, None).await?;
            let args = json!({
                "chain_id": wallet.chain_id(),
                "sell_token": sell_token,
                "buy_token": buy_token,
                "sell_amount": sell_amount,
                "slippage_bps": slippage_bps,
            });
            zero_ex_plugin(&config, wallet)?
                .swap_tool()
                .call_json(args)
                .await?
        }
        Commands::MarketInfo { market_id } => {
            run_morpho(&config, &cli.network, "morpho_get_market_info", json!({
                "market_id": market_id,
            }))
            .await?
        }
        Commands::MarketParams { market_id } => {
            run_morpho(&config, &cli.network, "morpho_get_market_params", json!({
                "market_id": market_id,
            }))
            .await?
        }
        Commands::Position { market_id, user } => {
            let wallet = connect(&cli.network, user).await?;
            let user = user.unwrap_or_else(|| wallet.address());
            let plugin = morpho_plugin(&config, wallet)?;
            call(&plugin.tools(), "morpho_get_position", json!({
                "market_id": market_id,
                "user": user.to_string(),
            }))
            .await?
        }
        Commands::Supply {
            market_id,
            assets,
            shares,
            on_behalf,
        } => {
            run_morpho(&config, &cli.network, "morpho_supply", json!({
                "market_id": market_id,
                "assets": assets,
                "shares": shares,
                "on_behalf": on_behalf,
            }))
            .await?
        }
        Commands::SupplyCollateral {
            market_id,
            assets,
            on_behalf,
        } => {
            run_morpho(&config, &cli.network, "morpho_supply_collateral", json!({
                "market_id": market_id,
                "assets": assets,
                "on_behalf": on_behalf,
            }))
            .await?
        }
        Commands::Config => serde_json::to_value(&config)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Connect to the network's RPC, signing with PRIVATE_KEY when it is set
async fn connect(network: &str, read_as: Option<Address>) -> Result<Arc<ProviderWalletClient>> {
    let chain_id = rpc::chain_id_from_name(network)
        .ok_or_else(|| Error::Config(format!("Unknown network: {}", network)))?;
    let rpc_config = rpc::RpcConfig::from_env();
    let rpc_url = rpc_config
        .get(chain_id)
        .ok_or_else(|| Error::Config(format!("No RPC URL for chain {}", chain_id)))?;

    let signer = match std::env::var(PRIVATE_KEY_ENV) {
        Ok(_) => {
            let wallet = SecureWallet::from_env(PRIVATE_KEY_ENV)?;
            tracing::info!(address = %wallet.address(), "Loaded wallet from {}", PRIVATE_KEY_ENV);
            Some(Arc::new(wallet))
        }
        Err(_) => {
            tracing::warn!("No {} set - read-only mode", PRIVATE_KEY_ENV);
            None
        }
    };

    let mut client = ProviderWalletClient::connect(rpc_url, signer).await?;
    if let Some(address) = read_as {
        client = client.with_address(address);
    }
    if client.chain_id() != chain_id {
        tracing::warn!(
            expected = chain_id,
            actual = client.chain_id(),
            "RPC serves a different chain than requested"
        );
    }
    Ok(Arc::new(client))
}

fn zero_ex_plugin(config: &Config, wallet: Arc<ProviderWalletClient>) -> Result<ZeroExPlugin> {
    let api_key = config::api_key_from_env()?;
    let client = ZeroExClient::with_base_url(&api_key, &config.zero_ex.base_url)?;
    let service = ZeroExService::new(client, config.referrer_config()?);
    Ok(ZeroExPlugin::new(service, wallet))
}

fn morpho_plugin(config: &Config, wallet: Arc<ProviderWalletClient>) -> Result<MorphoPlugin> {
    let plugin = MorphoPlugin::new(MorphoService::new(config.morpho_deployments()), wallet.clone());
    if !plugin.supports_chain(wallet.chain_id()) {
        return Err(Error::UnsupportedChain(wallet.chain_id()));
    }
    Ok(plugin)
}

async fn run_morpho(
    config: &Config,
    network: &str,
    tool: &str,
    args: Value,
) -> Result<Value> {
    let wallet = connect(network, None).await?;
    let plugin = morpho_plugin(config, wallet)?;
    call(&plugin.tools(), tool, args).await
}

async fn call(tools: &[Box<dyn DynTool>], name: &str, args: Value) -> Result<Value> {
    let tool = defi_agent_plugins::tools::find(tools, name)
        .ok_or_else(|| Error::Config(format!("Unknown tool: {}", name)))?;
    tracing::debug!(tool = name, %args, "Calling tool");
    tool.call_json(args).await
}
