//! List converted media in the cache.

use std::path::PathBuf;

use chrono::Local;
use slidershow_media_cache::list_entries;

pub fn run(cache_dir: PathBuf) -> anyhow::Result<()> {
    println!("Cache: {}", cache_dir.display());
    println!("{}", "=".repeat(50));

    if !cache_dir.is_dir() {
        println!("Cache directory does not exist.");
        return Ok(());
    }

    let entries = list_entries(&cache_dir)
        .map_err(|e| anyhow::anyhow!("Failed to read cache directory: {e}"))?;
    if entries.is_empty() {
        println!("No converted media.");
        return Ok(());
    }

    let mut total_bytes = 0;
    for entry in &entries {
        let modified = entry
            .modified
            .map(|m| m.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} -> {} ({}, {})",
            entry.original_name,
            entry.suffix,
            format_size(entry.size_bytes),
            modified
        );
        total_bytes += entry.size_bytes;
    }

    println!();
    println!("{} entries, {}", entries.len(), format_size(total_bytes));
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB)
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "0.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
