//! CLI argument definitions for the Tooldeck binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tooldeck demo CLI over the in-memory backend
#[derive(Parser, Debug)]
#[command(name = "tooldeck")]
#[command(about = "Tooldeck: client-side sync layer for per-user tool documents")]
#[command(version)]
pub struct Cli {
    /// Data file backing the in-memory backend
    #[arg(short = 'D', long, default_value = "tooldeck.json", env = "TOOLDECK_DATA")]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign an identity in, provisioning tool defaults on first sight
    Signin(SigninArgs),
    /// Show the stored profile of a user
    Profile(UserArgs),
    /// Add an entry to a tool
    Add(EntryArgs),
    /// List the entries of a tool
    List(ToolArgs),
    /// Replace an entry by id
    Update(EntryArgs),
    /// Delete an entry by id
    Delete(DeleteArgs),
}

/// Arguments for the signin command
#[derive(clap::Args, Debug)]
pub struct SigninArgs {
    /// The user id to sign in
    pub uid: String,

    /// Display name to report with the identity
    #[arg(long)]
    pub name: Option<String>,

    /// Email to report with the identity
    #[arg(long)]
    pub email: Option<String>,

    /// Company to report with the identity
    #[arg(long)]
    pub company: Option<String>,
}

/// Arguments for commands addressing a user
#[derive(clap::Args, Debug)]
pub struct UserArgs {
    /// The user id
    pub uid: String,
}

/// Arguments for commands addressing a tool
#[derive(clap::Args, Debug)]
pub struct ToolArgs {
    /// The user id
    pub uid: String,

    /// The tool name (e.g. expenseTracker)
    pub tool: String,
}

/// Arguments for commands carrying an entry payload
#[derive(clap::Args, Debug)]
pub struct EntryArgs {
    /// The user id
    pub uid: String,

    /// The tool name (e.g. expenseTracker)
    pub tool: String,

    /// The entry as a JSON object
    pub entry: String,
}

/// Arguments for the delete command
#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// The user id
    pub uid: String,

    /// The tool name (e.g. expenseTracker)
    pub tool: String,

    /// The id of the entry to delete
    pub id: String,
}
