use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Event journal to replay at startup and append to afterwards
    #[arg(short, long, global = true)]
    pub journal: Option<PathBuf>,

    /// Treat the user as having the premium entitlement
    #[arg(long, global = true)]
    pub premium: bool,

    /// Base URL of the remote recipe service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save a new recipe
    Add {
        #[arg(short, long)]
        name: String,
        /// One ingredient per line
        #[arg(short, long)]
        ingredients: String,
        #[arg(long)]
        instructions: String,
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Save a catalog or remote recipe by id
    Save { id: String },
    /// Show one recipe
    Show { id: String },
    /// List saved recipes
    List,
    /// Check an ingredient on or off for a saved recipe
    Toggle { recipe_id: String, ingredient: String },
    /// Recipes that use anything in the pantry
    Suggest {
        items: Vec<String>,
        /// Order by number of matched ingredients
        #[arg(long)]
        ranked: bool,
    },
    /// What each recipe is missing given the pantry
    Report { items: Vec<String> },
    /// Search the bundled catalog by name or ingredient
    Search { query: Option<String> },
    /// Search the remote recipe service
    Fetch { query: Option<String> },
    /// Build the grocery list from saved recipes (premium)
    Grocery {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Schedule a cooking session into an .ics calendar (premium)
    Schedule {
        id: String,
        /// RFC 3339 start time, e.g. 2026-03-14T18:30:00Z
        #[arg(long)]
        at: String,
        #[arg(long)]
        ics: PathBuf,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
