//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - review: multi-practitioner code review of a source file
//! - generate: generate code in one practitioner's style
//! - plan: feature planning with team coordination
//! - improve/consensus/design: the demo workflows

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Roundtable - a multi-practitioner code review harness
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reach the tool server over HTTP at this base URL
    #[arg(long, global = true, value_name = "URL")]
    pub http: Option<String>,

    /// Launch the tool server with this command line
    #[arg(long, global = true, value_name = "CMD")]
    pub server: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a source file from every practitioner's perspective
    Review {
        /// Source file to review
        file: PathBuf,

        /// Language of the source file
        #[arg(short, long, default_value = "javascript")]
        language: String,
    },

    /// Generate code following one practitioner's style
    Generate {
        /// Requirements for the generated code
        requirements: String,

        /// Practitioner style identifier (e.g. kent-beck)
        #[arg(short, long, default_value = "uncle-bob")]
        practitioner: String,

        /// Kind of code to generate (e.g. function, UserService)
        #[arg(short = 't', long, default_value = "function")]
        code_type: String,

        /// Target language
        #[arg(short, long, default_value = "typescript")]
        language: String,
    },

    /// Plan feature development with team coordination
    Plan {
        /// Feature description
        description: String,

        /// Number of practitioners to assign
        #[arg(short, long, default_value_t = 3)]
        team_size: usize,
    },

    /// Improve a source file round by round until a target score
    Improve {
        /// Source file to improve
        file: PathBuf,

        /// Language of the source file
        #[arg(short, long, default_value = "javascript")]
        language: String,

        /// Stop once the review average reaches this score
        #[arg(short = 's', long, default_value_t = 80.0)]
        target_score: f64,
    },

    /// Build design consensus across all practitioners
    Consensus {
        /// Design question to put to the roster
        question: String,
    },

    /// Run the five-phase collaborative design session
    Design {
        /// Project requirements
        requirements: String,
    },

    /// List the tools the remote server exposes
    Tools,

    /// Probe connectivity to the tool server
    Ping,
}
