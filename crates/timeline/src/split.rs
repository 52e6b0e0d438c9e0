//! Cell splitting into atomic directives.

use crate::time::normalize;

/// Flatten a row's `start` and command cells into atomic directives.
///
/// - A `start` other than `"0"` prepends `"0"` and `"→<start>"`, seeking
///   the media at the timeline's zero moment.
/// - `|` separates independent groups inside one cell.
/// - A fragment with `[` is a point literal and stays whole; anything else
///   is split on `,`.
/// - Surrounding whitespace is trimmed and empty entries dropped.
pub fn split_directives(start: Option<&str>, commands: &[Option<String>]) -> Vec<String> {
    let mut directives = Vec::new();

    if let Some(start) = start.map(str::trim).filter(|s| !s.is_empty() && *s != "0") {
        directives.push("0".to_string());
        directives.push(format!("→{}", normalize(start)));
    }

    for fragment in commands
        .iter()
        .flatten()
        .flat_map(|cell| cell.split('|'))
        .filter(|fragment| !fragment.trim().is_empty())
    {
        if fragment.contains('[') {
            directives.push(fragment.trim().to_string());
        } else {
            directives.extend(
                fragment
                    .split(',')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string),
            );
        }
    }

    directives
}
