// file: src/main.rs
// description: commandline entry point for searching and expanding Aleph entities
// reference: application bootstrap and orchestration

use aleph_client::utils::logging::{format_heading, format_info, format_success};
use aleph_client::{
    AlephClient, Config, EntityQuery, ExpansionGroup, Filters, JsonExporter, NormalizedEntity,
    SearchResponse, Validator,
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "aleph")]
#[command(version)]
#[command(about = "Search the Aleph OCCRP entity graph", long_about = None)]
struct Cli {
    /// Configuration file; falls back to config/default.toml when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Print results as JSON instead of a listing
    #[arg(long)]
    json: bool,

    /// Also write results to a JSON file in this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-text entity search
    Search {
        query: String,

        /// Restrict to a schema; repeat for several
        #[arg(short, long = "schema", value_name = "SCHEMA")]
        schemas: Vec<String>,

        /// Property filter as key=value; repeatable
        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Entities connected to one or more entities, grouped by property
    Expand {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<u32>,

        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Entities similar to the given one
    Similar {
        id: String,

        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    Filters::parse_pair(raw).map_err(|e| e.to_string())
}

struct Output {
    json: bool,
    pretty: bool,
    exporter: Option<JsonExporter>,
}

impl Output {
    /// Exports and prints JSON as requested; true when a listing should follow.
    fn emit<T: Serialize>(&self, operation: &str, item_count: usize, payload: &T) -> Result<bool> {
        if let Some(exporter) = &self.exporter {
            let path = exporter.export(operation, item_count, payload, self.pretty)?;
            println!("{}", format_success(&format!("Saved {}", path.display())));
        }

        if self.json {
            let rendered = if self.pretty {
                serde_json::to_string_pretty(payload)?
            } else {
                serde_json::to_string(payload)?
            };
            println!("{}", rendered);
        }

        Ok(!self.json)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    aleph_client::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(Some(path.as_path())).context("Failed to load configuration")?
        }
        None => Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::fallback()
        }),
    };

    let client = AlephClient::from_config(&config).context("Failed to create Aleph client")?;

    let exporter = match cli.export {
        Some(dir) => Some(JsonExporter::new(dir).context("Failed to prepare export directory")?),
        None => None,
    };
    let output = Output {
        json: cli.json,
        pretty: cli.pretty,
        exporter,
    };

    match cli.command {
        Commands::Search {
            query,
            schemas,
            filters,
            limit,
            offset,
        } => {
            let query = EntityQuery::new(query)
                .schema(schemas)
                .filters(filters.into_iter().collect())
                .limit(limit.unwrap_or(config.query.search_limit))
                .offset(offset);
            cmd_search(&client, &output, &query).await?;
        }
        Commands::Expand {
            ids,
            limit,
            filters,
        } => {
            let limit = limit.unwrap_or(config.query.expand_limit);
            let filters: Filters = filters.into_iter().collect();
            cmd_expand(&client, &output, &config, ids, limit, &filters).await?;
        }
        Commands::Similar { id, filters } => {
            let filters: Filters = filters.into_iter().collect();
            cmd_similar(&client, &output, &id, &filters).await?;
        }
    }

    Ok(())
}

async fn cmd_search(client: &AlephClient, output: &Output, query: &EntityQuery) -> Result<()> {
    info!("Searching for: {:?}", query.text);

    let response: SearchResponse = client
        .search_entities(query)
        .await
        .context("Entity search failed")?;

    if !output.emit("search", response.results.len(), &response)? {
        return Ok(());
    }

    if response.results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query.text);
        return Ok(());
    }

    let total = response
        .total()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "\n{}\n",
        format_heading(&format!(
            "Showing {} of {} result(s) for \"{}\"",
            response.results.len(),
            total,
            query.text
        ))
    );

    for (idx, entity) in response.entities().enumerate() {
        let normalized = entity.normalize();
        println!(
            "{:>3}. {}",
            idx as u64 + response.offset().unwrap_or(query.offset as u64) + 1,
            Validator::truncate_text(&normalized.format_line(), 120)
        );
    }

    if response.has_more() {
        println!(
            "\n{}",
            format_info(&format!(
                "More results available, use --offset {}",
                query.offset + query.limit
            ))
        );
    }

    Ok(())
}

/// Expansion of one requested id, listed in the order ids were given.
#[derive(Debug, Serialize)]
struct ExpandedEntity {
    id: String,
    groups: Vec<ExpansionGroup>,
}

/// Restores argument order after concurrent lookups and counts failures.
/// Repeated ids keep one entry per occurrence.
fn collect_in_order(
    mut results: Vec<(usize, String, aleph_client::Result<Vec<ExpansionGroup>>)>,
) -> (Vec<ExpandedEntity>, usize) {
    results.sort_by_key(|(position, _, _)| *position);

    let mut expanded = Vec::with_capacity(results.len());
    let mut failed = 0;

    for (_, id, result) in results {
        match result {
            Ok(groups) => expanded.push(ExpandedEntity { id, groups }),
            Err(e) => {
                error!("Failed to expand {}: {}", id, e);
                failed += 1;
            }
        }
    }

    (expanded, failed)
}

async fn cmd_expand(
    client: &AlephClient,
    output: &Output,
    config: &Config,
    ids: Vec<String>,
    limit: u32,
    filters: &Filters,
) -> Result<()> {
    let requested = ids.len();
    info!("Expanding {} entit(ies), limit {} per property", requested, limit);

    let results = stream::iter(ids.into_iter().enumerate().map(|(position, id)| {
        let client = client.clone();
        let filters = filters.clone();
        async move {
            let result = client.expand_entity(&id, limit, &filters).await;
            (position, id, result)
        }
    }))
    .buffer_unordered(config.query.concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let (expanded, failed) = collect_in_order(results);

    let group_count = expanded.iter().map(|e| e.groups.len()).sum();
    if output.emit("expand", group_count, &expanded)? {
        for ExpandedEntity { id, groups } in &expanded {
            println!("\n{}", format_heading(id));
            if groups.is_empty() {
                println!("  (no connected entities)");
            }
            for group in groups {
                println!("  {} ({})", group.property_name(), group.entities.len());
                for entity in &group.entities {
                    println!("    - {}", entity.format_line());
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} expansion(s) failed", failed, requested);
    }

    Ok(())
}

async fn cmd_similar(
    client: &AlephClient,
    output: &Output,
    id: &str,
    filters: &Filters,
) -> Result<()> {
    info!("Fetching entities similar to {}", id);

    let similar: Vec<NormalizedEntity> = client
        .similar_entities(id, filters)
        .await
        .context("Similarity lookup failed")?;

    if !output.emit("similar", similar.len(), &similar)? {
        return Ok(());
    }

    if similar.is_empty() {
        println!("\nNo similar entities found for {}\n", id);
        return Ok(());
    }

    println!(
        "\n{}\n",
        format_heading(&format!("{} entit(ies) similar to {}", similar.len(), id))
    );
    for entity in &similar {
        println!("  - {}", entity.format_line());
    }

    Ok(())
}
