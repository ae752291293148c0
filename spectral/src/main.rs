//! # Spectral CLI Entry Point
//!
//! The main executable for the Spectral tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the log subscriber.
//! 2. **Connection**: Resolves the target server from the registry or from `--url`.
//! 3. **Execution**: Delegates discovery, calls and queries to `spectral_core`.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.

mod cli;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands, DescribeCommands, ListCommands, Target};
use formatter::{
    FormattedString, GenericError, NameList, ServiceDescription, ServiceList, TableDescription,
};
use spectral_core::client::{Arguments, Connection, ConnectionOptions};
use spectral_core::observer::{TracingObserver, Verbosity};
use spectral_core::query::FeatureQuery;
use spectral_core::registry::ServerRegistry;
use spectral_core::server::Server;
use spectral_core::transport::{Credentials, ReqwestTransport};
use std::fmt::Display;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    let verbosity = args.verbosity();
    setup_logging(verbosity);

    match args.command {
        Commands::Call {
            service,
            operation,
            args: call_args,
            return_errors,
        } => {
            let options = ConnectionOptions {
                return_errors_as_values: return_errors,
            };
            let server = resolve_server(&args.target, verbosity).with_options(options);
            run_call(&server, &service, &operation, call_args).await;
        }
        Commands::Query {
            query,
            page_length,
            merged,
        } => {
            let mut query = FeatureQuery::new(query).page_length(page_length);
            if merged {
                query = query.merged();
            }
            run_query(&resolve_server(&args.target, verbosity), query).await;
        }
        Commands::List { sub } => match sub {
            ListCommands::Services => {
                list_services(&resolve_server(&args.target, verbosity)).await
            }
            ListCommands::Servers => list_servers(),
            ListCommands::Tables => list_tables(&resolve_server(&args.target, verbosity)).await,
        },
        Commands::Describe { sub } => {
            let server = resolve_server(&args.target, verbosity);
            match sub {
                DescribeCommands::Service { service } => {
                    let connection = connect_or_exit(&server, &service).await;
                    println!(
                        "{}",
                        FormattedString::from(ServiceDescription(&service, &connection))
                    );
                }
                DescribeCommands::Operation { service, operation } => {
                    let connection = connect_or_exit(&server, &service).await;
                    match connection.operation(&operation) {
                        Some(operation) => println!("{}", FormattedString::from(operation)),
                        None => exit_with(GenericError("Operation not found", operation)),
                    }
                }
                DescribeCommands::Type { service, type_name } => {
                    let connection = connect_or_exit(&server, &service).await;
                    match connection.catalog().object_type(&type_name) {
                        Some(object_type) => println!("{}", FormattedString::from(object_type)),
                        None => exit_with(GenericError("Type not found", type_name)),
                    }
                }
                DescribeCommands::Table { table } => describe_table(&server, &table).await,
            }
        }
    }
}

fn setup_logging(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Warnings => "warn",
        Verbosity::Info => "info",
        Verbosity::Debug => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with<T: Display>(err: GenericError<T>) -> ! {
    eprintln!("{}", FormattedString::from(err));
    process::exit(1);
}

fn resolve_server(target: &Target, verbosity: Verbosity) -> Server<ReqwestTransport> {
    let observer = TracingObserver::shared(verbosity);

    if let Some(url) = &target.url {
        let (Some(user), Some(password)) = (&target.user, &target.password) else {
            exit_with(GenericError(
                "Missing credentials",
                "--url requires --user and --password",
            ));
        };
        return Server::connect(url, Credentials::new(user, password)).with_observer(observer);
    }

    let registry = match ServerRegistry::load() {
        Ok(registry) => registry,
        Err(err) => exit_with(GenericError("Failed to load the server registry", err)),
    };

    let name = match (&target.server, registry.names().next()) {
        (Some(name), _) => name.clone(),
        // A single registered server needs no --server
        (None, Some(only)) if registry.names().count() == 1 => only.to_string(),
        (None, _) => exit_with(GenericError(
            "No server selected",
            "pass --server <name> or --url <url>",
        )),
    };

    match registry.server(&name) {
        Ok(server) => server.with_observer(observer),
        Err(err) => exit_with(GenericError("Unknown server", err)),
    }
}

async fn connect_or_exit(
    server: &Server<ReqwestTransport>,
    service: &str,
) -> Connection<ReqwestTransport> {
    match server.service(service).await {
        Ok(connection) => connection,
        Err(err) => exit_with(GenericError("Connection Error", err)),
    }
}

async fn list_services(server: &Server<ReqwestTransport>) {
    match server.list_services().await {
        Ok(services) => println!("{}", FormattedString::from(ServiceList(services))),
        Err(err) => exit_with(GenericError("Failed to list services", err)),
    }
}

fn list_servers() {
    match ServerRegistry::load() {
        Ok(registry) => {
            let names = registry.names().map(str::to_string).collect();
            println!("{}", FormattedString::from(NameList("Servers", names)));
        }
        Err(err) => exit_with(GenericError("Failed to load the server registry", err)),
    }
}

async fn list_tables(server: &Server<ReqwestTransport>) {
    match server.feature_service().list_tables().await {
        Ok(tables) => println!("{}", FormattedString::from(NameList("Tables", tables))),
        Err(err) => exit_with(GenericError("Failed to list tables", err)),
    }
}

async fn describe_table(server: &Server<ReqwestTransport>, table: &str) {
    match server.feature_service().describe_table(table).await {
        Ok(columns) => println!(
            "{}",
            FormattedString::from(TableDescription(table, columns))
        ),
        Err(err) => exit_with(GenericError("Failed to describe table", err)),
    }
}

async fn run_call(
    server: &Server<ReqwestTransport>,
    service: &str,
    operation: &str,
    args: Vec<(String, String)>,
) {
    let connection = connect_or_exit(server, service).await;
    let args: Arguments = args.into_iter().collect();

    match connection.call(operation, &args).await {
        Ok(response) => println!("{}", FormattedString::from(response)),
        Err(err) => exit_with(GenericError("Call Failed", err)),
    }
}

async fn run_query(server: &Server<ReqwestTransport>, query: FeatureQuery) {
    let mut pages = server.feature_service().stream(query);

    while let Some(page) = pages.next_page().await {
        match page {
            Ok(page) => println!("{}", FormattedString::from(page)),
            Err(err) => exit_with(GenericError("Query Failed", err)),
        }
    }
}
