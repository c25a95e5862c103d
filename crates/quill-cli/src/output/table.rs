const MIN_COLUMN: usize = 6;
const SEPARATOR: &str = "  ";

/// Terminal width from `COLUMNS`, if the shell exports it.
#[must_use]
pub fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
}

/// Render an aligned plain-text table. Cells wider than their column are cut
/// with an ellipsis; numeric cells are right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(MIN_COLUMN)
        })
        .collect();

    fit_widths(&mut widths, headers, max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad_cell(&truncate_text(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let text = truncate_text(value, *width);
                pad_cell(&text, *width, looks_numeric(&text))
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }
    lines.join("\n")
}

/// Shrink the widest columns one character at a time until the table fits.
fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();

    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit())
}

fn pad_cell(value: &str, width: usize, right_align: bool) -> String {
    let pad = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{pad}{value}")
    } else {
        format!("{value}{pad}")
    }
}
