use super::args::{Cli, Commands};
use super::handlers;
use anyhow::Result;
use replay_runtime::LocalSource;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { project } => {
            let source = LocalSource::resolve(cli.claude_dir.as_deref())?;
            match project {
                Some(project) => handlers::list::handle_sessions(&source, &project, cli.format),
                None => handlers::list::handle_projects(&source, cli.format),
            }
        }

        Commands::Show { query, full } => {
            let source = LocalSource::resolve(cli.claude_dir.as_deref())?;
            handlers::show::handle(&source, &query, full, cli.format)
        }

        Commands::Scan { path } => handlers::scan::handle(&path, cli.format),

        Commands::Diff { old, new } => handlers::diff::handle(&old, &new, cli.format),
    }
}
