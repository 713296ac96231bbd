use crate::types::OutputFormat;
use anyhow::{Context, Result};
use replay_engine::{DiffLine, DiffStat, diff_lines, diff_stat};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct DiffReport<'a> {
    stat: DiffStat,
    lines: Vec<DiffLine<'a>>,
}

pub fn handle(old_path: &Path, new_path: &Path, format: OutputFormat) -> Result<()> {
    let old = read(old_path)?;
    let new = read(new_path)?;

    let lines = diff_lines(&old, &new);
    let stat = diff_stat(&lines);

    if format == OutputFormat::Json {
        let report = DiffReport { stat, lines };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for line in &lines {
        println!("{}{}", line.prefix(), line.text);
    }
    println!("+{} -{}", stat.added, stat.removed);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
