use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "embedbase", about = "Dataset-scoped semantic search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add one document to a dataset
    Add {
        dataset: String,
        /// Document text
        data: String,
        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
        /// Explicit id (generated when omitted; re-using an id replaces the document)
        #[arg(long)]
        id: Option<String>,
    },
    /// Add many documents from a JSON array of {data, metadata?, id?}
    BatchAdd {
        dataset: String,
        json: String,
    },
    /// Semantic search within a dataset
    Search {
        dataset: String,
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Remove every document in a dataset
    Clear {
        dataset: String,
    },
    /// Show the dimension and document count for a dataset
    Info {
        dataset: String,
    },
}
