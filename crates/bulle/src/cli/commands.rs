//! CLI command definitions.

use bulle::PromptDialect;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bulle - comic-script generation with tolerant parsing of model answers
#[derive(Parser, Debug)]
#[command(name = "bulle")]
#[command(about = "Comic-script generation with tolerant parsing of model answers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file replacing the layered lookup
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a saved model answer and print it as JSON
    Parse {
        /// Kind of answer
        kind: ParseKind,

        /// File holding the answer, `-` for stdin
        file: PathBuf,

        /// Image prompt dialect, detected when unset
        #[arg(long)]
        dialect: Option<PromptDialect>,

        /// Reject storyboard panels under a `PAGE 0` marker
        #[arg(long)]
        strict_pages: bool,
    },

    /// Generate the outline of a new comic
    Outline(StoryArgs),

    /// Generate the outline, then detail, storyboard and prompts per chapter
    Generate {
        #[command(flatten)]
        story: StoryArgs,

        /// Chapters to run after the outline, all when empty
        #[arg(long, value_delimiter = ',')]
        chapters: Vec<u32>,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind, the configured one when unset
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Kind of model answer to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseKind {
    /// Global title and chapters
    Outline,
    /// Page/panel framing
    Storyboard,
    /// Image prompts
    Prompts,
}

/// Creative brief of a comic
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Idea or keywords
    #[arg(long)]
    pub keywords: String,

    /// Genre
    #[arg(long)]
    pub genre: String,

    /// Target visual style
    #[arg(long)]
    pub style: String,

    /// Tone
    #[arg(long)]
    pub tone: String,

    /// Characters, settings and other details
    #[arg(long)]
    pub details: Option<String>,
}

impl From<StoryArgs> for bulle::StoryRequest {
    fn from(args: StoryArgs) -> Self {
        let mut story = Self::new(args.keywords, args.genre, args.style, args.tone);
        story.details = args.details;
        story
    }
}
