//! MCP server for Neo4j graph databases.
//!
//! Run with `neo4j-mcp` after setting `NEO4J_URI`, `NEO4J_USERNAME`,
//! `NEO4J_PASSWORD` and optionally `NEO4J_DATABASE`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod client;
mod convert;
mod error;
mod server;
mod store;
mod tools;

use client::GraphClient;
use server::McpServer;
use store::{Neo4jConfig, Neo4jStore};

/// MCP server for Neo4j graph databases.
///
/// Exposes Cypher execution and schema introspection as MCP tools for
/// AI agents. Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "neo4j-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Bolt URI of the Neo4j server.
    #[arg(long, env = "NEO4J_URI", default_value = "bolt://localhost:7687")]
    uri: String,

    /// Username for authentication.
    #[arg(long, env = "NEO4J_USERNAME", default_value = "neo4j")]
    username: String,

    /// Password for authentication.
    #[arg(long, env = "NEO4J_PASSWORD", default_value = "password")]
    password: String,

    /// Database name sessions are scoped to.
    #[arg(long, env = "NEO4J_DATABASE", default_value = "neo4j")]
    database: String,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Set up logging. Stdout carries the protocol, so logs go to stderr.
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("neo4j_mcp=debug".parse().unwrap()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = Neo4jConfig {
        uri: args.uri,
        username: args.username,
        password: args.password,
        database: args.database,
    };

    // Establish the connection before accepting any call; failure here
    // is the only fatal condition.
    let store = match Neo4jStore::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to connect to Neo4j at '{}': {}", config.uri, e);
            std::process::exit(1);
        }
    };

    let client = GraphClient::new(store);
    if let Err(e) = client.verify_connectivity().await {
        eprintln!("Error: Neo4j connectivity check failed: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Connected to Neo4j");

    let mut server = McpServer::new(client);

    // Serve until the client disconnects or a termination signal lands.
    let status = tokio::select! {
        result = server.run() => match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: Server error: {}", e);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            0
        }
    };

    // Release graph resources before exiting, orderly or not.
    if let Err(e) = server.client().close().await {
        eprintln!("Error: Failed to close graph store: {}", e);
        std::process::exit(1);
    }

    std::process::exit(status);
}
