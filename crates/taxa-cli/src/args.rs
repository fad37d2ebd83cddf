use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "taxa")]
#[command(about = "Category taxonomy manager with slug paths and ancestor caches")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.taxa)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a category
    Create {
        /// Display name (slug is derived unless --slug is given)
        name: String,

        /// Explicit slug (fails on collision instead of suffixing)
        #[arg(long)]
        slug: Option<String>,

        /// Parent category (id or slug)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Update a category's name, slug, parent, or image reference
    Update {
        /// Category to update (id or slug)
        reference: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New slug (must be free; descendants' breadcrumbs are rewritten)
        #[arg(long)]
        slug: Option<String>,

        /// Move under this category (id or slug)
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Detach and make the category a root
        #[arg(long)]
        root: bool,

        /// Set the image reference
        #[arg(long, conflicts_with = "no_image")]
        image: Option<String>,

        /// Clear the image reference
        #[arg(long)]
        no_image: bool,
    },

    /// Delete a category (fails while it has children)
    Delete {
        /// Category to delete (id or slug)
        reference: String,
    },

    /// Show one category
    Show {
        /// Category to show (id or slug)
        reference: String,

        /// Emit the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a full slug path (e.g. apparel/t-shirts/graphic-tees)
    Resolve {
        /// Slash-separated slug path, leaf last
        path: String,

        /// Emit the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all categories
    List {
        /// Emit raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the category hierarchy
    Tree,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Create a commented default config file
    Init,

    /// Print the config file path
    Path,

    /// List all keys and values
    List,

    /// Get a value by dot-notation key
    Get {
        /// Key (e.g. tree.max_depth)
        key: String,
    },

    /// Set a value by dot-notation key
    Set {
        /// Key (e.g. tree.max_depth)
        key: String,

        /// New value
        value: String,
    },
}
