//! Output formatting utilities for the CLI

use crate::OutputFormat;
use propbox_formats::Prop;
use serde::Serialize;

/// Chunk contents as printed by `show` and `inspect`
#[derive(Debug, Serialize)]
pub struct ChunkReport<'a> {
    /// Batch hash of the props
    pub hash: u32,
    /// Props in stored order
    pub props: &'a [Prop],
}

/// Print `value` as JSON. Returns false for text output so the caller can
/// render its own layout.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<bool> {
    match render_structured(value, format)? {
        Some(rendered) => {
            println!("{rendered}");
            Ok(true)
        }
        None => Ok(false),
    }
}

/// JSON rendering of `value`, or `None` for text output
pub fn render_structured<T: Serialize>(
    value: &T,
    format: OutputFormat,
) -> anyhow::Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => None,
    })
}

/// Render a chunk report in the requested format
pub fn print_chunk(report: &ChunkReport<'_>, format: OutputFormat) -> anyhow::Result<()> {
    if print_structured(report, format)? {
        return Ok(());
    }

    println!("Hash:  {:08x}", report.hash);
    println!("Props: {}", report.props.len());
    for prop in report.props {
        println!("{}", format_prop(prop));
    }
    Ok(())
}

/// One-line summary of a prop
pub fn format_prop(prop: &Prop) -> String {
    let mut line = format!(
        "  #{:<8} {:<24} ({:.2}, {:.2}, {:.2}) by {} at {}",
        prop.id, prop.name, prop.x, prop.y, prop.z, prop.user_id, prop.date
    );
    if !prop.action.is_empty() {
        line.push_str(&format!(" [{}]", prop.action));
    }
    line
}
