//! Interactive browsing session.
//!
//! Keeps one `CatalogUseCase` alive across commands so the selection built on
//! one page is still there after moving to another.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use gallery_application::{BulkSelectError, CatalogUseCase};
use gallery_core::record::{Page, RecordId};
use gallery_core::view::PageLoad;

use super::{page_index, render, select, show_page};

const COMMANDS: &[&str] = &[
    "next", "prev", "page", "check", "uncheck", "toggle", "select", "clear", "count", "list",
    "show", "reload", "help", "quit",
];

/// One line typed into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    /// One-based page number
    Goto(u64),
    Check(Vec<RecordId>),
    Uncheck(Vec<RecordId>),
    Toggle(RecordId),
    SelectFirst(usize),
    Clear,
    Count,
    List,
    Show,
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err("Empty command".to_string());
    };
    let args: Vec<&str> = words.collect();

    let command = match name {
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "page" | "go" => BrowseCommand::Goto(single_number(name, &args)?),
        "check" | "c" => BrowseCommand::Check(record_ids(name, &args)?),
        "uncheck" | "u" => BrowseCommand::Uncheck(record_ids(name, &args)?),
        "toggle" | "t" => BrowseCommand::Toggle(RecordId(single_number(name, &args)?)),
        "select" => BrowseCommand::SelectFirst(single_number(name, &args)? as usize),
        "clear" => BrowseCommand::Clear,
        "count" => BrowseCommand::Count,
        "list" | "ls" => BrowseCommand::List,
        "show" => BrowseCommand::Show,
        "reload" => BrowseCommand::Reload,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => {
            return Err(format!(
                "Unknown command '{}'. Type 'help' for the list of commands.",
                other
            ));
        }
    };

    Ok(command)
}

fn single_number(name: &str, args: &[&str]) -> Result<u64, String> {
    match args {
        [value] => value
            .parse()
            .map_err(|_| format!("'{}' expects a number, got '{}'", name, value)),
        _ => Err(format!("'{}' expects exactly one number", name)),
    }
}

fn record_ids(name: &str, args: &[&str]) -> Result<Vec<RecordId>, String> {
    if args.is_empty() {
        return Err(format!("'{}' expects one or more artwork ids", name));
    }
    args.iter()
        .flat_map(|arg| arg.split(','))
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map(RecordId)
                .map_err(|_| format!("'{}' is not an artwork id", id))
        })
        .collect()
}

/// Checked set the page reports after checking (or unchecking) `ids`.
///
/// Starts from the rows of `page` that are currently selected. Ids that are
/// not on the page are left out.
fn checked_after(page: &Page, selected: &[RecordId], ids: &[RecordId], check: bool) -> Vec<RecordId> {
    page.ids()
        .filter(|id| {
            if ids.contains(id) {
                check
            } else {
                selected.contains(id)
            }
        })
        .collect()
}

/// rustyline helper completing and highlighting session commands.
#[derive(Clone)]
struct BrowseHelper;

impl Helper for BrowseHelper {}

impl Completer for BrowseHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for BrowseHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or("");
        if COMMANDS.contains(&first) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for BrowseHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for BrowseHelper {}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  next | prev            Move one page forward or back");
    println!("  page <n>               Go to page n (starting at 1)");
    println!("  check <id>...          Check rows of the displayed page");
    println!("  uncheck <id>...        Uncheck rows of the displayed page");
    println!("  toggle <id>            Flip one row of the displayed page");
    println!("  select <n>             Select the first n artworks of the catalog");
    println!("  clear                  Drop the whole selection");
    println!("  count                  Show how many artworks are selected");
    println!("  list                   List every selected artwork");
    println!("  show | reload          Redisplay or refetch the displayed page");
    println!("  quit                   Leave the session");
}

async fn navigate(catalog: &CatalogUseCase, index: usize) {
    match catalog.navigate(index).await {
        Ok(PageLoad::Applied(_)) => show_page(catalog).await,
        Ok(PageLoad::Superseded { index }) => {
            tracing::debug!("Navigation to page {} was superseded", index + 1);
        }
        Err(e) => {
            let shown = catalog.current_page().await;
            println!("{}", format!("⚠️  {}", e).yellow());
            println!("   Still showing page {}", shown.index + 1);
        }
    }
}

async fn update_rows(catalog: &CatalogUseCase, ids: &[RecordId], check: bool) {
    let page = catalog.current_page().await;
    let missing: Vec<RecordId> = ids.iter().copied().filter(|id| !page.contains(*id)).collect();
    if !missing.is_empty() {
        let missing: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
        println!(
            "{}",
            format!("Not on page {}: {}", page.index + 1, missing.join(", ")).bright_black()
        );
    }

    let selected: Vec<RecordId> = catalog
        .visible_selection()
        .await
        .iter()
        .map(|record| record.id)
        .collect();
    let delta = catalog
        .update_page_selection(&checked_after(&page, &selected, ids, check))
        .await;

    if !delta.is_empty() {
        println!(
            "✅ {} checked, {} unchecked",
            delta.added.len(),
            delta.removed.len()
        );
    }
    show_page(catalog).await;
}

/// Runs one command. Returns `false` when the session should end.
async fn execute(catalog: &CatalogUseCase, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Next => {
            let current = catalog.current_page().await.index;
            let last = catalog.page_count().await.unwrap_or(0).saturating_sub(1);
            if current < last {
                navigate(catalog, current + 1).await;
            } else {
                println!("{}", "Already on the last page.".bright_black());
            }
        }
        BrowseCommand::Prev => {
            let current = catalog.current_page().await.index;
            match current.checked_sub(1) {
                Some(index) => navigate(catalog, index).await,
                None => println!("{}", "Already on the first page.".bright_black()),
            }
        }
        BrowseCommand::Goto(number) => match catalog.page_count().await {
            Some(count) if number == 0 || number as usize > count => {
                println!("{}", format!("❌ Page must be between 1 and {}", count).red());
            }
            None if number == 0 => println!("{}", "❌ Pages start at 1".red()),
            _ => navigate(catalog, page_index(number)).await,
        },
        BrowseCommand::Check(ids) => update_rows(catalog, &ids, true).await,
        BrowseCommand::Uncheck(ids) => update_rows(catalog, &ids, false).await,
        BrowseCommand::Toggle(id) => match catalog.toggle(id).await {
            Ok(_) => show_page(catalog).await,
            Err(e) => println!("{}", format!("❌ {}", e).red()),
        },
        BrowseCommand::SelectFirst(count) => {
            let result = catalog.submit_bulk_selection(count).await;
            select::report(&result);
            if !matches!(result, Err(BulkSelectError::InvalidTarget { .. })) {
                show_page(catalog).await;
            }
        }
        BrowseCommand::Clear => {
            let cleared = catalog.clear_selection().await;
            println!("✅ Cleared {} selected artworks", cleared);
        }
        BrowseCommand::Count => {
            println!(
                "{}",
                format!("Selected Artworks: {}", catalog.selected_count().await).bold()
            );
        }
        BrowseCommand::List => {
            let selected = catalog.selected_records().await;
            if selected.is_empty() {
                println!("{}", "No artworks selected.".dimmed());
            } else {
                render::print_records(&selected);
            }
        }
        BrowseCommand::Show => show_page(catalog).await,
        BrowseCommand::Reload => match catalog.refresh().await {
            Ok(PageLoad::Applied(_)) => show_page(catalog).await,
            Ok(PageLoad::Superseded { .. }) => {}
            Err(e) => println!("{}", format!("⚠️  {}", e).yellow()),
        },
        BrowseCommand::Help => print_help(),
        BrowseCommand::Quit => return false,
    }
    true
}

/// Runs the interactive session, starting on page `start` (one-based).
pub async fn run(catalog: &CatalogUseCase, start: u64) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(BrowseHelper));

    println!("{}", "=== Gallery ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for the list of commands, or 'quit' to exit.".bright_black()
    );
    println!();

    navigate(catalog, page_index(start)).await;

    loop {
        match rl.readline("gallery> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_command(trimmed) {
                    Ok(command) => {
                        if !execute(catalog, command).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Err(message) => println!("{}", message.bright_black()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!(
        "Session ended with {} artworks selected",
        catalog.selected_count().await
    );
    Ok(())
}
