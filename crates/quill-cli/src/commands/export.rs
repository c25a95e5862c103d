use std::io::Write;

use anyhow::Context;
use chrono::SecondsFormat;
use quill_core::LogEntry;

use crate::cli::root_commands::{ExportArgs, ExportKind};
use crate::commands::shared::filter::export_filter;
use crate::context::AppContext;

const CSV_HEADER: [&str; 5] = ["Timestamp", "Username", "Action", "Entity", "Diff"];

/// Handle `quill export`. Writes to stdout regardless of `--format`.
pub async fn handle(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let filter = export_filter(&args.filters, ctx.config.general.export_limit)?;
    let entries = ctx.service.get_entries(&filter).await?;
    tracing::debug!(count = entries.len(), kind = ?args.kind, "exporting audit log");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.kind {
        ExportKind::Csv => write_csv(&entries, &mut out),
        ExportKind::Text => write_text(&entries, &mut out),
    }
}

/// One CSV record per entry. The multi-line entry text is folded onto a single
/// line so every record stays on one row.
pub fn write_csv<W: Write>(entries: &[LogEntry], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let diff = entry.entry.replace('\n', " ");
        csv.write_record([
            timestamp.as_str(),
            entry.username.as_deref().unwrap_or_default(),
            entry.action.as_str(),
            entry.entity.as_str(),
            diff.as_str(),
        ])?;
    }
    csv.flush().context("failed to write csv export")?;
    Ok(())
}

/// Entry texts as stored, one after another.
pub fn write_text<W: Write>(entries: &[LogEntry], mut writer: W) -> anyhow::Result<()> {
    for entry in entries {
        writeln!(writer, "{}", entry.entry).context("failed to write text export")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::root_commands::FilterArgs;
    use crate::commands::shared::test_support::seeded_context;

    async fn exported(filters: FilterArgs) -> Vec<LogEntry> {
        let ctx = seeded_context().await;
        let filter = export_filter(&filters, 999_999_999).expect("filter should build");
        let entries = ctx.service.get_entries(&filter).await.expect("entries should load");
        ctx.close().await;
        entries
    }

    #[tokio::test]
    async fn csv_has_header_and_one_row_per_entry() {
        let entries = exported(FilterArgs::default()).await;
        let mut buffer = Vec::new();
        write_csv(&entries, &mut buffer).expect("csv export should work");

        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Timestamp,Username,Action,Entity,Diff");
        assert!(lines[1].contains(",,deleted,vogon,"));
        assert!(lines[2].contains(",dent,modified,heartofgold,"));
    }

    #[tokio::test]
    async fn csv_folds_multiline_entries() {
        let entries = exported(FilterArgs {
            action: Some("modified".into()),
            ..FilterArgs::default()
        })
        .await;
        let mut buffer = Vec::new();
        write_csv(&entries, &mut buffer).expect("csv export should work");

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let records: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("csv should parse");
        assert_eq!(records.len(), 1);
        let diff = &records[0][4];
        assert!(!diff.contains('\n'));
        assert!(diff.contains("[MODIFIED]"));
        assert!(diff.contains("'description' changed: 'ship' -> 'improbable"));
    }

    #[tokio::test]
    async fn text_export_prints_entries_verbatim() {
        let entries = exported(FilterArgs {
            entity: Some("vogon".into()),
            ..FilterArgs::default()
        })
        .await;
        let mut buffer = Vec::new();
        write_text(&entries, &mut buffer).expect("text export should work");

        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, format!("{}\n", entries[0].entry));
        assert!(text.contains("[DELETED] 'null' deleted"));
    }

    #[test]
    fn empty_export_still_writes_header() {
        let mut buffer = Vec::new();
        write_csv(&[], &mut buffer).expect("csv export should work");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "Timestamp,Username,Action,Entity,Diff\n"
        );
    }
}
