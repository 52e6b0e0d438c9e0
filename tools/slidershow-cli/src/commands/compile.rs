//! Compile one row of directives.

use slidershow_timeline::compile_row;

pub fn run(start: Option<&str>, directives: Vec<String>) -> anyhow::Result<()> {
    let cells: Vec<Option<String>> = directives.into_iter().map(Some).collect();
    let timeline =
        compile_row(start, &cells).map_err(|e| anyhow::anyhow!("Failed to compile: {e}"))?;

    for event in &timeline.events {
        tracing::debug!(moment = %event.moment, tags = ?event.tags(), "Event");
    }
    println!("{}", timeline.points());
    Ok(())
}
