//! # CLI
//!
//! This module defines the command-line interface of `spectral` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring arguments are `name=value`).
use clap::{Args, Parser, Subcommand};
use spectral_core::observer::Verbosity;
use spectral_core::server::DEFAULT_SERVICE_OPERATION;

#[derive(Parser)]
#[command(name = "spectral", version, about = "Dynamic CLI for Spectrum REST services")]
pub struct Cli {
    #[command(flatten)]
    pub target: Target,

    /// Report more (-v: request summaries, -vv: everything found while parsing)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report nothing but the command output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, _) => Verbosity::Debug,
        }
    }
}

/// Which server to talk to.
///
/// Either a name from `.spectrum_servers.json` or an explicit URL and credentials.
#[derive(Args)]
pub struct Target {
    /// A server registered in `.spectrum_servers.json` (home directory or working directory)
    #[arg(short, long, global = true, conflicts_with = "url")]
    pub server: Option<String>,

    /// The server URL (e.g. http://localhost:8080/)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// User name sent with --url
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Password sent with --url
    #[arg(long, global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Call an operation of a service
    ///
    /// Arguments are matched against the operation's URL parameters (by local name, `.` replaced
    /// with `_`), then against the attributes and elements of its request type.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// spectral --server local call Geocode --arg Data_AddressLine1='1 Global View' --arg Data_City=Troy
    /// ```
    Call {
        /// The service name as listed by `spectral list services`
        service: String,
        /// The operation name
        #[arg(short, long, default_value = DEFAULT_SERVICE_OPERATION)]
        operation: String,
        /// An argument as `name=value` (repeatable)
        #[arg(short, long = "arg", value_parser = parse_argument)]
        args: Vec<(String, String)>,
        /// Print transport failures as the response instead of failing
        #[arg(long)]
        return_errors: bool,
    },

    /// Run a query against the Spatial feature service
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// spectral --server local query 'SELECT * FROM "/Samples/NamedTables/WorldTable"' --page-length 50
    /// ```
    Query {
        /// The query text
        query: String,
        /// Features per request; 0 fetches everything in one merged collection
        #[arg(short, long, default_value_t = 0)]
        page_length: usize,
        /// Merge every page into one collection, even with a page length
        #[arg(long)]
        merged: bool,
    },

    /// List services, servers or tables
    List {
        #[command(subcommand)]
        sub: ListCommands,
    },

    /// Describe a service, an operation, an object type or a table in detail
    Describe {
        #[command(subcommand)]
        sub: DescribeCommands,
    },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// List all REST services deployed on the server
    Services,
    /// List the servers registered in `.spectrum_servers.json`
    Servers,
    /// List the tables of the Spatial feature service
    Tables,
}

#[derive(Subcommand)]
pub enum DescribeCommands {
    /// Describe a service (list its operations)
    Service { service: String },
    /// Describe an operation (parameters and request body)
    Operation { service: String, operation: String },
    /// Describe an object type of a service's grammars
    Type {
        service: String,
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
    /// Describe the columns of a feature service table
    Table {
        /// Named table path (e.g. /Samples/NamedTables/WorldTable)
        table: String,
    },
}

fn parse_argument(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid argument '{s}'. Expected 'name=value'"))?;

    if name.trim().is_empty() {
        return Err("Argument names cannot be empty".to_string());
    }

    Ok((name.trim().to_string(), value.to_string()))
}
