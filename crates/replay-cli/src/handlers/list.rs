use crate::format::{format_bytes, format_time, render_table};
use crate::types::OutputFormat;
use anyhow::Result;
use replay_runtime::SessionSource;

pub fn handle_projects(source: &dyn SessionSource, format: OutputFormat) -> Result<()> {
    let projects = source.list_projects()?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.path.clone(),
                p.sessions.to_string(),
                format_time(p.last_used),
            ]
        })
        .collect();

    print!(
        "{}",
        render_table(&["NAME", "PATH", "SESSIONS", "LAST USED"], &rows)
    );
    Ok(())
}

pub fn handle_sessions(
    source: &dyn SessionSource,
    project: &str,
    format: OutputFormat,
) -> Result<()> {
    let sessions = source.list_sessions(project)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found in {}.", project);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| {
            vec![
                s.scan.slug.clone().unwrap_or_else(|| "-".to_string()),
                s.short_id().to_string(),
                s.scan.model.clone().unwrap_or_else(|| "-".to_string()),
                s.scan.turn_count.to_string(),
                format_time(s.scan.last_timestamp),
                format_bytes(s.file_size),
            ]
        })
        .collect();

    print!(
        "{}",
        render_table(&["SLUG", "ID", "MODEL", "TURNS", "DATE", "SIZE"], &rows)
    );
    Ok(())
}
