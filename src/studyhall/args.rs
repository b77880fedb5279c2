use clap::{Parser, Subcommand};

/// Returns the version string, including git hash and commit date for
/// non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "study", bin_name = "study", version = get_version())]
#[command(about = "Command-line learning module authoring and study tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Act as this user (defaults to the configured default_user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new module
    #[command(alias = "n")]
    Create {
        /// Title of the module (opens the editor if not provided)
        #[arg(required = false)]
        title: Option<String>,

        /// Description of the module
        #[arg(required = false)]
        description: Option<String>,

        /// Tags for the module
        #[arg(short, long)]
        tag: Vec<String>,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,
    },

    /// List modules
    #[command(alias = "ls")]
    List {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Show deleted modules
        #[arg(long)]
        deleted: bool,

        /// Show only published modules
        #[arg(long)]
        published: bool,

        /// Show all modules, including deleted ones
        #[arg(long)]
        all: bool,
    },

    /// View one or more modules with their steps
    #[command(alias = "v")]
    View {
        /// Indexes of the modules (e.g. 1 p1 d1) or a title search
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Update a module's fields
    #[command(alias = "e")]
    Update {
        /// Index of the module (e.g. 1, p1)
        index: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Replace the tag list
        #[arg(short, long)]
        tag: Vec<String>,

        /// Add a collaborator
        #[arg(long)]
        add_collaborator: Vec<String>,

        /// Remove a collaborator
        #[arg(long)]
        remove_collaborator: Vec<String>,
    },

    /// Soft-delete one or more modules
    #[command(alias = "rm")]
    Delete {
        /// Indexes of the modules (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Restore soft-deleted modules
    Restore {
        /// Indexes of the modules (e.g. d1 d2)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Publish one or more modules to students
    #[command(alias = "p")]
    Publish {
        /// Indexes of the modules (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Unpublish one or more modules
    #[command(alias = "u")]
    Unpublish {
        /// Indexes of the modules (e.g. p1 p2)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Permanently delete modules, their steps and progress
    Purge {
        /// Indexes of the modules (e.g. d1 d2)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage the steps of a module
    #[command(subcommand)]
    Step(StepCommands),

    /// Mark a step complete for the current user
    Complete {
        /// Index of the module (e.g. p1)
        index: String,

        /// 1-based position of the step
        position: usize,

        /// Quiz score as correct/total (e.g. 3/4)
        #[arg(short, long)]
        score: Option<String>,
    },

    /// Show the current user's progress through a module
    Progress {
        /// Index of the module (e.g. p1)
        index: String,
    },

    /// Manage the current user's learning journal
    #[command(subcommand)]
    Journal(JournalCommands),

    /// Import Markdown flashcard decks as steps of a module
    Import {
        /// Index of the target module (e.g. 1)
        index: String,

        /// Deck files or directories to import
        #[arg(required = true, num_args = 1..)]
        paths: Vec<std::path::PathBuf>,
    },

    /// Export modules and their steps to a tar.gz archive
    Export {
        /// Indexes of the modules (defaults to all active modules)
        #[arg(num_args = 0..)]
        indexes: Vec<String>,
    },

    /// Check and repair store inconsistencies
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. default_user)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Initialize the store
    Init,
}

#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Add a video step
    Video {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// Video URL
        url: String,

        /// Video length in minutes
        #[arg(long)]
        duration: Option<u32>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Add a quiz step
    Quiz {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// Question spec: "prompt|choice|choice[|choice...]|N" where N is the
        /// 1-based correct choice. Repeat for more questions.
        #[arg(short, long, required = true)]
        question: Vec<String>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Add a flashcards step
    Cards {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// Card spec: "front|back". Repeat for more cards.
        #[arg(short, long, required = true)]
        card: Vec<String>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Add a free-response step
    Free {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// The question students answer in prose
        prompt: String,

        /// A sample answer shown after submission
        #[arg(long)]
        sample: Option<String>,

        /// Maximum answer length in characters
        #[arg(long)]
        max_length: Option<u32>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Add a poll step
    Poll {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// The poll question
        prompt: String,

        /// A poll option label. Repeat for more options (at least two).
        #[arg(short, long, required = true)]
        option: Vec<String>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Add a resource step
    Resource {
        /// Index of the module
        index: String,

        /// Title of the step
        title: String,

        /// External link
        #[arg(long)]
        link: Option<String>,

        /// Path or URL of a PDF
        #[arg(long)]
        pdf: Option<String>,

        #[command(flatten)]
        common: StepCommonArgs,
    },

    /// Edit a step's title or flags
    Edit {
        /// Index of the module
        index: String,

        /// 1-based position of the step
        position: usize,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Mark the step optional
        #[arg(long, conflicts_with = "required")]
        optional: bool,

        /// Mark the step required
        #[arg(long)]
        required: bool,

        /// Estimated minutes to complete
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Remove a step, closing the position gap
    #[command(alias = "rm")]
    Remove {
        /// Index of the module
        index: String,

        /// 1-based position of the step
        position: usize,
    },

    /// Move a step to a new position
    Move {
        /// Index of the module
        index: String,

        /// Current 1-based position
        from: usize,

        /// Target 1-based position
        to: usize,
    },

    /// Vote on a poll step
    Vote {
        /// Index of the module
        index: String,

        /// 1-based position of the poll step
        position: usize,

        /// 1-based number of the chosen option
        option: usize,
    },
}

#[derive(clap::Args, Debug)]
pub struct StepCommonArgs {
    /// Mark the step optional (excluded from completion percent)
    #[arg(long)]
    pub optional: bool,

    /// Estimated minutes to complete
    #[arg(long)]
    pub minutes: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommands {
    /// Add a journal entry (opens the editor without a body)
    Add {
        /// Entry text
        #[arg(required = false)]
        body: Option<String>,

        /// Link the entry to a module (makes it read-only)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// List the current user's entries, newest first
    #[command(alias = "ls")]
    List,

    /// Edit a free-form entry (1-based, newest first)
    Edit {
        /// Entry number from `study journal list`
        number: usize,

        /// New text (opens the editor if not provided)
        #[arg(required = false)]
        body: Option<String>,
    },

    /// Remove an entry (1-based, newest first)
    #[command(alias = "rm")]
    Remove {
        /// Entry number from `study journal list`
        number: usize,
    },
}
