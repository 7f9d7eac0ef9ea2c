use clap::{Parser, Subcommand};

/// Token balance and holder-ranking service for a single ERC20 token.
///
/// Node, token and explorer settings come from the environment (or `.env`):
/// POLYGON_RPC_URL, TOKEN_ADDRESS, POLYGONSCAN_API_KEY, POLYGONSCAN_BASE.
#[derive(Parser)]
#[command(name = "token-ranker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Print one address's token balance
    Balance {
        /// Holder address
        address: String,
    },

    /// Print balances for several addresses, failures included
    Batch {
        /// Holder addresses
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Rank addresses by balance, highest first
    Top {
        /// Candidate holder addresses
        #[arg(required = true)]
        addresses: Vec<String>,

        /// How many entries to keep
        #[arg(
            long,
            short = 'n',
            default_value = "10",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        n: u64,

        /// Attach each holder's last transfer date (needs POLYGONSCAN_API_KEY)
        #[arg(long)]
        with_transactions: bool,
    },

    /// Print token symbol, name, decimals and total supply
    TokenInfo,
}
