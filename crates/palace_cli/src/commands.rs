use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use palace_engine::{
    ensure_output_dir, title_from_markdown, ApiClient, CancellationToken, ContentFormat,
    CrawlOptions, CrawlOrchestrator, MarkdownDocument, MarkdownWriter, NewNote,
    NoopProgressSink, PageCapture, PollPolicy, ProgressSink, SearchQuery,
};
use palace_logging::{palace_info, palace_warn, LogDestination};

use crate::cli::{Cli, Command, CrawlArgs, NoteCommand};
use crate::config::{ConfigError, PalaceConfig};
use crate::progress::TerminalProgress;

pub async fn run(cli: Cli) -> Result<()> {
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    palace_logging::initialize(destination, cli.log_level());

    let mut config = PalaceConfig::load(cli.config.as_deref())?;
    if let Some(base) = &cli.api_base {
        config.api_base_url = base.clone();
    }
    let client = ApiClient::new(config.api_settings())
        .map_err(|err| ConfigError::Invalid(format!("api_base_url: {err}")))?;

    match cli.command {
        Command::Crawl(args) => crawl(client, &config, &args).await,
        Command::Scrape { url, save, out } => {
            let out = match (save, out) {
                (_, Some(dir)) => Some(dir),
                (true, None) => Some(config.output_dir.clone()),
                (false, None) => None,
            };
            scrape(&client, &url, out).await
        }
        Command::Note(note) => notes(&client, note).await,
        Command::Capture {
            text,
            page_url,
            title,
            kind,
        } => {
            let capture = PageCapture {
                raw_text: text,
                html: None,
                page_url,
                page_title: title,
                selection_type: kind.into(),
            };
            let response = client.capture(&capture).await.context("capture failed")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Search {
            q,
            topic,
            domain,
            limit,
        } => {
            let query = SearchQuery {
                q,
                topic,
                domain,
                limit,
            };
            let results = client.search(&query).await.context("search failed")?;
            if results.items.is_empty() {
                println!("No documents found.");
            }
            for hit in &results.items {
                println!("{}  {}", hit.doc_id().unwrap_or("-"), hit.display_title());
                let snippet = hit.snippet();
                if !snippet.is_empty() {
                    println!("    {snippet}");
                }
            }
            Ok(())
        }
        Command::Doc { id } => {
            let doc = client
                .document(&id)
                .await
                .with_context(|| format!("could not load document {id}"))?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        Command::Health => {
            let status = client.health().await.context("health check failed")?;
            println!("{status}");
            Ok(())
        }
    }
}

pub(crate) fn crawl_options(args: &CrawlArgs, config: &PalaceConfig) -> CrawlOptions {
    let format = if args.html {
        ContentFormat::Html
    } else {
        ContentFormat::Markdown
    };
    CrawlOptions {
        max_depth: args.max_depth.unwrap_or(config.default_max_depth),
        limit: args.limit.unwrap_or(config.default_limit),
        formats: vec![format],
    }
}

pub(crate) fn crawl_policy(args: &CrawlArgs, config: &PalaceConfig) -> PollPolicy {
    let mut policy = config.poll_policy();
    if let Some(secs) = args.interval_secs {
        policy.interval = Duration::from_secs(secs);
    }
    if let Some(max_attempts) = args.max_attempts {
        policy.max_attempts = max_attempts;
    }
    policy
}

async fn crawl(client: ApiClient, config: &PalaceConfig, args: &CrawlArgs) -> Result<()> {
    let options = crawl_options(args, config);
    let orchestrator = CrawlOrchestrator::new(client).with_policy(crawl_policy(args, config));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            palace_warn!("Interrupted, cancelling crawl");
            on_interrupt.cancel();
        }
    });

    let sink: Box<dyn ProgressSink> = if args.quiet {
        Box::new(NoopProgressSink)
    } else {
        Box::new(TerminalProgress::new())
    };

    let summary = orchestrator
        .run(&args.url, &options, sink.as_ref(), &cancel)
        .await?;
    println!(
        "Crawl {} finished: {}/{} pages crawled, {} saved.",
        summary.job_id, summary.pages_completed, summary.total, summary.inserted_count
    );
    Ok(())
}

async fn scrape(client: &ApiClient, url: &str, out: Option<PathBuf>) -> Result<()> {
    let result = client
        .scrape(url)
        .await
        .with_context(|| format!("could not scrape {url}"))?;

    match out {
        Some(dir) => {
            ensure_output_dir(&dir)?;
            let fetched_utc = chrono::Utc::now().to_rfc3339();
            let doc = MarkdownDocument {
                url,
                title: title_from_markdown(&result.markdown),
                fetched_utc: &fetched_utc,
                body: &result.markdown,
            };
            let path = MarkdownWriter::new(dir).write_document(&doc)?;
            println!("Saved {}", path.display());
        }
        None => println!("{}", result.markdown),
    }

    if let Some(note_id) = &result.note_id {
        palace_info!("Backend stored the page as note {}", note_id);
        eprintln!("Stored as note {note_id}");
    }
    Ok(())
}

async fn notes(client: &ApiClient, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add { text, source } => {
            let mut note = NewNote::new(text)
                .with_metadata("ui", "cli")
                .with_metadata("saved_at", chrono::Utc::now().to_rfc3339());
            if let Some(source) = source {
                note = note.with_source(source);
            }
            let id = client.create_note(&note).await.context("could not save note")?;
            println!("{id}");
        }
        NoteCommand::List { skip, limit } => {
            let page = client
                .list_notes(skip, limit)
                .await
                .context("could not list notes")?;
            if page.items.is_empty() {
                println!("No notes.");
            }
            for note in &page.items {
                let source = note.source_url.as_deref().unwrap_or("");
                let first_line = note.text.lines().next().unwrap_or("");
                println!("{}  {}  {}", note.id, first_line, source);
            }
        }
        NoteCommand::Delete { id } => {
            client
                .delete_note(&id)
                .await
                .with_context(|| format!("could not delete note {id}"))?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}
