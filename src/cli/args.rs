//! CLI argument definitions using clap
//!
//! Commands:
//! - listings serve --config <path> [--port <port>]
//! - listings search --config <path> [criteria flags]
//! - listings explain --config <path> [criteria flags] [--json]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::SearchCriteria;
use crate::planner::{SearchOptions, SortDirection};

/// Listings - search and manage real estate listings
#[derive(Parser, Debug)]
#[command(name = "listings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./listings.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single search against the seeded store and print the results
    Search {
        /// Path to configuration file
        #[arg(long, default_value = "./listings.json")]
        config: PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the plan a search would execute
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./listings.json")]
        config: PathBuf,

        #[command(flatten)]
        search: SearchArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Search criteria and ordering flags
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Exact city match
    #[arg(long)]
    pub city: Option<String>,

    /// Minimum list price
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum list price
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum bedroom count
    #[arg(long)]
    pub min_bedrooms: Option<u32>,

    /// Exact property type match
    #[arg(long)]
    pub property_type: Option<String>,

    /// Field to sort by
    #[arg(long, default_value = "listingDate")]
    pub sort_by: String,

    /// Sort direction (asc or desc)
    #[arg(long, default_value = "desc")]
    pub direction: SortDirection,

    /// Result cap (defaults to the configured limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            city: self.city.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            property_type: self.property_type.clone(),
        }
    }

    pub fn options(&self, default_limit: usize) -> SearchOptions {
        SearchOptions::default()
            .sorted_by(&self.sort_by, self.direction)
            .with_limit(self.limit.unwrap_or(default_limit))
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
