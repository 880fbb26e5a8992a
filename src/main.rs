use clap::Parser;
use embedbase::cli::commands::{Cli, Commands};
use embedbase::config::Config;
use embedbase::domain::entities::document::{Document, Metadata};
use embedbase::telemetry::init_tracing;
use embedbase::Embedbase;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let eb = match Embedbase::from_config(&config) {
        Ok(eb) => eb,
        Err(e) => {
            eprintln!("Error initializing embedbase: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(eb, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(eb: Embedbase, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Add {
            dataset,
            data,
            metadata,
            id,
        } => {
            let metadata = parse_metadata(metadata.as_deref())?;
            let mut document = Document::new(data).with_metadata(metadata);
            document.id = id;
            let outcome = eb.dataset(&dataset)?.add_document(document).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::BatchAdd { dataset, json } => {
            let documents: Vec<Document> = serde_json::from_str(&json)?;
            let outcomes = eb.dataset(&dataset)?.batch_add(documents).await;
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        Commands::Search {
            dataset,
            query,
            top_k,
        } => {
            let results = eb.dataset(&dataset)?.search(&query, top_k).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Clear { dataset } => {
            eb.dataset(&dataset)?.clear()?;
            println!("Cleared dataset {dataset}");
        }
        Commands::Info { dataset } => {
            let count = eb.dataset(&dataset)?.count()?;
            let info = serde_json::json!({
                "dataset": dataset,
                "dimensions": eb.dimensions(),
                "documents": count,
                "default_top_k": eb.settings().default_top_k,
                "id_strategy": eb.settings().id_strategy,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}

fn parse_metadata(raw: Option<&str>) -> Result<Metadata, String> {
    match raw {
        None => Ok(Metadata::new()),
        Some(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err("metadata must be a JSON object".to_string()),
            Err(e) => Err(format!("Invalid metadata JSON: {e}")),
        },
    }
}
