use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use palace_engine::SelectionKind;

#[derive(Parser, Debug)]
#[command(
    name = "palace",
    version,
    about = "Crawl, scrape and search your Mind Palace from the terminal"
)]
pub struct Cli {
    /// RON config file. Defaults to ./palace.ron when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base url, overriding the config file.
    #[arg(long, global = true, env = "PALACE_API_BASE", value_name = "URL")]
    pub api_base: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// -v for info, -vv for debug.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl a site and save the pages into the note store
    Crawl(CrawlArgs),

    /// Scrape a single page to markdown
    Scrape {
        url: String,

        /// Write the markdown into the configured output directory.
        #[arg(long)]
        save: bool,

        /// Write the markdown into this directory instead.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Send text from a page to the mind palace
    Capture {
        text: String,

        #[arg(long, value_name = "URL")]
        page_url: String,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, value_enum, default_value_t = CaptureKind::Selection)]
        kind: CaptureKind,
    },

    /// Semantic search over captured documents
    Search {
        #[arg(long, default_value = "")]
        q: String,

        #[arg(long, default_value = "")]
        topic: String,

        #[arg(long, default_value = "")]
        domain: String,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Show one mind palace document as JSON
    Doc { id: String },

    /// Check that the backend is up
    Health,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CrawlArgs {
    pub url: String,

    #[arg(long)]
    pub max_depth: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    /// Ask for html instead of markdown.
    #[arg(long)]
    pub html: bool,

    #[arg(long, value_name = "SECS")]
    pub interval_secs: Option<u64>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// No progress bar.
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    /// Save a note
    Add {
        text: String,

        #[arg(long, value_name = "URL")]
        source: Option<String>,
    },
    /// List saved notes
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = palace_engine::DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Delete a note by id
    Delete { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Selection,
    FullPage,
}

impl From<CaptureKind> for SelectionKind {
    fn from(kind: CaptureKind) -> Self {
        match kind {
            CaptureKind::Selection => SelectionKind::Selection,
            CaptureKind::FullPage => SelectionKind::FullPage,
        }
    }
}
