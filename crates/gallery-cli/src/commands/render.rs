use colored::Colorize;
use gallery_core::record::{Page, Record};

const TITLE_WIDTH: usize = 40;
const TEXT_WIDTH: usize = 24;

/// Prints the selection counter and the page as a table, marking selected rows.
pub fn print_page(page: &Page, visible_selection: &[Record], selected_count: usize) {
    println!(
        "{}",
        format!("Selected Artworks: {}", selected_count).bold()
    );

    println!(
        "Page {} ({} records, {} in catalog)",
        page.index + 1,
        page.len(),
        page.total
    );

    if page.is_empty() {
        println!("{}", "No artworks on this page.".dimmed());
        return;
    }

    println!(
        "    {:>8}  {:<title$}  {:<text$}  {:<text$}  {:<text$}  {:>5}  {:>5}",
        "ID",
        "Title",
        "Origin",
        "Artist",
        "Inscriptions",
        "Start",
        "End",
        title = TITLE_WIDTH,
        text = TEXT_WIDTH,
    );

    for record in &page.records {
        let selected = visible_selection.iter().any(|r| r.id == record.id);
        let marker = if selected {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        println!("{} {}", marker, format_row(record));
    }
}

/// Prints a flat list of records.
pub fn print_records(records: &[Record]) {
    for record in records {
        println!("  {:>8}  {}", record.id.to_string().cyan(), record.display_title());
    }
}

fn format_row(record: &Record) -> String {
    format!(
        "{:>8}  {:<title$}  {:<text$}  {:<text$}  {:<text$}  {:>5}  {:>5}",
        record.id,
        truncate(record.display_title(), TITLE_WIDTH),
        truncate(optional(&record.place_of_origin), TEXT_WIDTH),
        truncate(first_line(optional(&record.artist_display)), TEXT_WIDTH),
        truncate(optional(&record.inscriptions), TEXT_WIDTH),
        year(record.date_start),
        year(record.date_end),
        title = TITLE_WIDTH,
        text = TEXT_WIDTH,
    )
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn first_line(value: &str) -> &str {
    value.lines().next().unwrap_or(value)
}

fn year(value: Option<i32>) -> String {
    value.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Shortens `value` to at most `width` characters, ending with an ellipsis.
fn truncate(value: &str, width: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let kept: String = flat.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Ids of `records`, for log lines.
pub fn id_list(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
