use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// A response that knows how to lay itself out as rows.
pub trait Tabular {
    fn headers(&self) -> Vec<&'static str>;
    fn rows(&self) -> Vec<Vec<String>>;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(value)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Tabular>(value: &T) -> String {
    let rows = value.rows();
    if rows.is_empty() {
        return String::from("(no rows)");
    }
    table::render_table(&value.headers(), &rows, table::terminal_width())
}
