use crate::format::{format_bytes, format_time};
use crate::types::OutputFormat;
use anyhow::Result;
use std::path::Path;

pub fn handle(path: &Path, format: OutputFormat) -> Result<()> {
    let info = replay_runtime::session_info(path)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let scan = &info.scan;
    println!("id:     {}", info.id);
    println!("slug:   {}", scan.slug.as_deref().unwrap_or("-"));
    println!("model:  {}", scan.model.as_deref().unwrap_or("-"));
    println!("first:  {}", format_time(scan.first_timestamp));
    println!("last:   {}", format_time(scan.last_timestamp));
    println!("turns:  {}", scan.turn_count);
    println!("size:   {}", format_bytes(info.file_size));
    Ok(())
}
