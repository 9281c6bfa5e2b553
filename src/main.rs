//! Library Web - terminal front-end for the catalog and the patron dashboard

use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_web::{
    cli::{parse_shell_line, CliArgs, Command, ProfileArgs, SearchArgs, ShellCommand, SHELL_HELP},
    config::{AppConfig, LoggingConfig},
    dispatch::ProfileAction,
    models::{StatusFilter, Theme},
    services::{
        catalog::CatalogController,
        profile::{self, ProfileLoad},
    },
    view::{self, text},
    Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
        config.validate()?;
    }

    init_tracing(&config.logging);
    tracing::debug!("Using backend {}", config.api.base_url);

    let services = Services::new(config)?;

    match args.command {
        Command::Search(search) => run_search(&services, search, args.json).await,
        Command::Checkout { isbn, card_id } => {
            run_checkout(&services, &isbn, &card_id, args.json).await
        }
        Command::Profile(profile) => run_profile(&services, profile, args.json).await,
        Command::Shell => run_shell(&services, args.json).await,
        Command::Theme { theme } => run_theme(&services, theme),
        Command::Logout => run_logout(&services),
        Command::Health => run_health(&services, args.json).await,
    }
}

/// Logs go to stderr so stdout only carries rendered views
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_web={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_catalog(catalog: &CatalogController, json: bool) -> anyhow::Result<()> {
    let rendered = catalog.render();
    if json {
        print_json(&rendered)
    } else {
        print!("{}", text::catalog(&rendered));
        Ok(())
    }
}

async fn run_search(services: &Services, args: SearchArgs, json: bool) -> anyhow::Result<()> {
    let mut catalog = services.catalog();
    catalog.set_search(&args.query, args.filter, args.page);
    catalog.initialize().await;

    // Past the last page: the results were clamped, fetch the page we landed on
    if catalog.state().page < args.page && catalog.ui().error_panel.is_none() {
        catalog.perform_search().await;
    }
    print_catalog(&catalog, json)
}

async fn run_checkout(
    services: &Services,
    isbn: &str,
    card_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    // The backend search matches ISBNs, so this loads the book being checked out
    let mut catalog = services.catalog();
    catalog.set_search(isbn, StatusFilter::All, 1);
    catalog.perform_search().await;
    catalog.checkout(isbn, card_id).await;

    let failed = catalog
        .ui()
        .notification
        .as_ref()
        .map_or(true, |n| n.is_error());
    if json {
        print_json(&catalog.ui().notification)?;
    } else if let Some(notification) = &catalog.ui().notification {
        println!("{}", text::notification_line(notification));
    }
    if failed {
        anyhow::bail!("checkout of {} was not completed", isbn);
    }
    Ok(())
}

async fn run_profile(services: &Services, args: ProfileArgs, json: bool) -> anyhow::Result<()> {
    let mut dashboard = match services.profile(args.card_id.as_deref()).await? {
        ProfileLoad::Ready(dashboard) => dashboard,
        ProfileLoad::Redirect(redirect) => {
            if json {
                return print_json(&redirect);
            }
            println!("No library card on file. Redirecting to {}", redirect.target);
            println!("Run `library-web profile --card-id <CARD_ID>` to sign in.");
            return Ok(());
        }
    };

    dashboard.apply(ProfileAction::ShowSection(args.section));
    dashboard.apply(ProfileAction::FilterHistory(args.history_filter));

    let rendered = dashboard.render();
    if json {
        print_json(&rendered)
    } else {
        print!("{}", text::profile(&rendered));
        Ok(())
    }
}

async fn run_shell(services: &Services, json: bool) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(32);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        eprintln!("{}", SHELL_HELP);
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            };
            match parse_shell_line(&line) {
                ShellCommand::Event(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                ShellCommand::Quit => break,
                ShellCommand::Help => eprintln!("{}", SHELL_HELP),
                ShellCommand::Invalid(message) => eprintln!("{}", message),
            }
        }
    });

    let mut session = services.catalog_session();
    session.start().await;
    let catalog = session
        .run(rx, |rendered| {
            if json {
                match serde_json::to_string(rendered) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::error!("Failed to encode view: {}", e),
                }
            } else {
                println!("{}", text::catalog(rendered));
            }
        })
        .await;

    reader.await?;
    tracing::info!(
        "Shell closed on page {} of {}",
        catalog.state().page,
        catalog.state().total_pages()
    );
    Ok(())
}

fn run_theme(services: &Services, theme: Theme) -> anyhow::Result<()> {
    profile::save_theme(services.storage.as_ref(), theme)?;
    println!(
        "{}",
        text::notification_line(&view::Notification::success(format!(
            "Theme changed to {} mode",
            theme
        )))
    );
    Ok(())
}

fn run_logout(services: &Services) -> anyhow::Result<()> {
    profile::forget_card(services.storage.as_ref())?;
    println!(
        "{}",
        text::notification_line(&view::Notification::success("Logged out successfully"))
    );
    Ok(())
}

async fn run_health(services: &Services, json: bool) -> anyhow::Result<()> {
    let health = services.api.health().await?;
    if json {
        print_json(&health)?;
    } else {
        println!(
            "{} (database: {})",
            health.status,
            health.database.as_deref().unwrap_or("unknown")
        );
    }
    if !health.is_healthy() {
        anyhow::bail!(
            "backend is not healthy: {}",
            health.message.as_deref().unwrap_or(&health.status)
        );
    }
    Ok(())
}
