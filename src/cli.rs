//! Command line interface and shell input parsing

use clap::{Args, Parser, Subcommand};

use crate::dispatch::CatalogEvent;
use crate::models::{HistoryFilter, ProfileSection, StatusFilter, Theme};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "library-web",
    version,
    about = "Library catalog and patron profile client",
    long_about = "Search the library catalog, check out books and browse a patron profile from the terminal.\n\nExamples:\n  library-web search gatsby --filter available\n  library-web checkout 9780743273565 1001\n  library-web profile --card-id 1001 --section loans\n  library-web shell\n\nThe backend URL comes from config/default.toml, LIBRARY_WEB__API__BASE_URL or LIBRARY_API_URL."
)]
pub struct CliArgs {
    #[arg(
        long = "api-url",
        value_name = "URL",
        global = true,
        help_heading = "Backend",
        help = "Override the backend base URL."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "json",
        global = true,
        help_heading = "Output",
        help = "Print view-models as JSON instead of text."
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one search and print the results page
    Search(SearchArgs),
    /// Check a book out to a library card
    Checkout {
        #[arg(value_name = "ISBN")]
        isbn: String,
        #[arg(value_name = "CARD_ID")]
        card_id: String,
    },
    /// Show the patron dashboard
    Profile(ProfileArgs),
    /// Interactive catalog session
    Shell,
    /// Set the saved colour theme
    Theme {
        #[arg(value_name = "THEME", value_parser = parse_theme)]
        theme: Theme,
    },
    /// Forget the remembered library card
    Logout,
    /// Probe the backend health endpoint
    Health,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", default_value = "", help = "Title or author text.")]
    pub query: String,

    #[arg(
        short = 'f',
        long = "filter",
        value_name = "STATUS",
        default_value = "all",
        value_parser = parse_status,
        help = "all, available or checked-out."
    )]
    pub filter: StatusFilter,

    #[arg(short = 'p', long = "page", value_name = "N", default_value_t = 1)]
    pub page: u32,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(
        long = "card-id",
        value_name = "CARD_ID",
        help = "Card to show when none is remembered; it is remembered afterwards."
    )]
    pub card_id: Option<String>,

    #[arg(
        short = 's',
        long = "section",
        value_name = "SECTION",
        default_value = "personal",
        value_parser = parse_section,
        help = "personal, loans, fines, history or settings."
    )]
    pub section: ProfileSection,

    #[arg(
        long = "history-filter",
        value_name = "FILTER",
        default_value = "all",
        value_parser = parse_history_filter,
        help = "all, last-month, last-year or favorites."
    )]
    pub history_filter: HistoryFilter,
}

fn parse_status(s: &str) -> Result<StatusFilter, String> {
    s.parse()
}

fn parse_section(s: &str) -> Result<ProfileSection, String> {
    s.parse()
}

fn parse_history_filter(s: &str) -> Result<HistoryFilter, String> {
    s.parse()
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse()
}

/// One line typed into the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Event(CatalogEvent),
    Quit,
    Help,
    Invalid(String),
}

pub const SHELL_HELP: &str = "\
Type text to search as you type, or one of:
  :enter               search now
  :filter <STATUS>     all | available | checked-out
  :page <N>            jump to page N
  :next / :prev        next or previous page
  :details <ISBN>      show book details
  :close               close the details
  :checkout <ISBN> <CARD_ID>
  :retry               repeat the last search
  :clear               clear the search box
  :quit                leave the shell";

/// Parse one shell line. Plain text replaces the search box content.
pub fn parse_shell_line(line: &str) -> ShellCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return ShellCommand::Event(CatalogEvent::Input(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let event = match (name, args.as_slice()) {
        ("quit" | "q" | "exit", []) => return ShellCommand::Quit,
        ("help" | "h", []) => return ShellCommand::Help,
        ("enter", []) => CatalogEvent::Submit,
        ("filter", [status]) => match status.parse() {
            Ok(filter) => CatalogEvent::FilterClicked(filter),
            Err(e) => return ShellCommand::Invalid(e),
        },
        ("page", [n]) => match n.parse() {
            Ok(page) => CatalogEvent::PageClicked(page),
            Err(_) => return ShellCommand::Invalid(format!("Invalid page number: {}", n)),
        },
        ("next", []) => CatalogEvent::NextClicked,
        ("prev", []) => CatalogEvent::PreviousClicked,
        ("details", [isbn]) => CatalogEvent::DetailsClicked(isbn.to_string()),
        ("close", []) => CatalogEvent::CloseDetails,
        ("checkout", [isbn, card]) => CatalogEvent::CheckoutClicked {
            isbn: isbn.to_string(),
            card_input: card.to_string(),
        },
        ("retry", []) => CatalogEvent::RetryClicked,
        ("clear", []) => CatalogEvent::ClearClicked,
        _ => return ShellCommand::Invalid(format!("Unknown command: {}", line)),
    };
    ShellCommand::Event(event)
}
