//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "Todo list HTTP service backed by SQLite")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "TODO_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// SQLite database URL; the file is created if it does not exist.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Upper bound on pooled database connections; at least one.
    #[arg(
        long,
        env = "TODO_MAX_CONNECTIONS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections: u32,

    /// Front-end origin allowed to call the API. Repeat or comma-separate.
    #[arg(
        long = "cors-origin",
        env = "TODO_CORS_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "http://127.0.0.1:3000"]
    )]
    pub cors_origins: Vec<String>,

    /// Insert sample todos when the table is empty.
    #[arg(long, env = "TODO_SEED")]
    pub seed: bool,
}
