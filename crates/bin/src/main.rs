use std::sync::Arc;

use clap::Parser;
use tooldeck::{
    AuthBroadcaster, AuthState, Entry, Identity, ToolKind, ToolStore, backend::InMemory,
};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tooldeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let backend = match InMemory::load_from_file(&cli.data) {
        Ok(backend) => {
            tracing::info!(path = %cli.data.display(), "loaded data file");
            backend
        }
        Err(e) => {
            tracing::warn!("no usable data file ({e}), starting empty");
            InMemory::new()
        }
    };
    let store = ToolStore::new(Arc::new(backend.clone()));

    match cli.command {
        Commands::Signin(args) => {
            let mut identity = Identity::new(&args.uid);
            identity.display_name = args.name;
            identity.email = args.email;
            identity.company = args.company;

            let broadcaster = AuthBroadcaster::new(store.clone());
            let _watch = broadcaster.subscribe(|state| match state {
                AuthState::Unknown => {}
                AuthState::SignedOut => println!("signed out"),
                AuthState::SignedIn(identity) => println!("signed in as {}", identity.uid),
            });
            broadcaster.apply(Some(identity)).await;
            store.touch_last_login(&args.uid).await?;
        }
        Commands::Profile(args) => match store.get_profile(&args.uid).await? {
            Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            None => println!("no profile for {}", args.uid),
        },
        Commands::Add(args) => {
            let tool: ToolKind = args.tool.parse()?;
            let entry: Entry = serde_json::from_str(&args.entry)?;
            let stored = store.add_entry(&args.uid, tool, entry).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::List(args) => {
            let tool: ToolKind = args.tool.parse()?;
            let entries = store.get_entries(&args.uid, tool).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Update(args) => {
            let tool: ToolKind = args.tool.parse()?;
            let entry: Entry = serde_json::from_str(&args.entry)?;
            if store.update_entry(&args.uid, tool, entry).await? {
                println!("entry replaced");
            } else {
                println!("no entry with that id");
            }
        }
        Commands::Delete(args) => {
            let tool: ToolKind = args.tool.parse()?;
            let entries = store.get_entries(&args.uid, tool).await?;
            match entries.iter().find(|e| e.id() == Some(args.id.as_str())) {
                Some(entry) => {
                    store.delete_entry(&args.uid, tool, entry).await?;
                    println!("entry {} deleted", args.id);
                }
                None => println!("no entry with id {}", args.id),
            }
        }
    }

    backend.save_to_file(&cli.data)?;
    Ok(())
}
