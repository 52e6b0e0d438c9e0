//! Check external conversion tools.

use slidershow_common::config::{config_file_path, AppConfig};
use slidershow_media_cache::{FfmpegTranscoder, ToolStatus};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Slidershow System Check");
    println!("{}", "=".repeat(50));

    println!("Config: {}", config_file_path().display());
    println!(
        "  Conversion: {}",
        if config.convert.enable { "enabled" } else { "disabled" }
    );
    println!("  Cache directory: {}", config.convert.cache_dir.display());
    println!();

    let tools = FfmpegTranscoder::default().check_tools();
    print_tool_report(&tools);

    println!();
    if tools.iter().all(|t| t.available) {
        println!("All conversion tools are available.");
    } else {
        println!("Some conversion tools are missing. Pages still build; affected media is embedded unconverted.");
    }

    Ok(())
}

fn print_tool_report(tools: &[ToolStatus]) {
    println!("Conversion Tools:");
    println!("{}", "-".repeat(60));

    for tool in tools {
        let status = if tool.available { "[OK]" } else { "[MISSING]" };
        println!("  {} {}: {}", status, tool.name, tool.description);

        if let Some(ref fix) = tool.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
