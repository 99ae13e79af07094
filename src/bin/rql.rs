//! rql: compile list-endpoint query strings to SQL
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a query string
//! rql "SELECT * FROM groups" --allow group_id,name --alias g \
//!     --params "filters[group_id:gt]=77&sort=-name"
//!
//! # Run it and print one page
//! rql "SELECT * FROM groups" --allow group_id,name --alias g \
//!     --params "page[number]=2" --database-url postgres://localhost/app
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use rql::engine::RowMap;
use rql::parser::{KeyKind, classify_key};
use rql::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rql")]
#[command(version)]
#[command(about = "Compile query-string filters, sorting and pagination to SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    rql 'SELECT * FROM groups' --allow name,category --alias g --params 'sort=-name'
    rql 'SELECT * FROM groups' --allow group_id --alias g --params 'filters[group_id:gt]=77' --strict
    rql explain 'filters[group_id:gt]=77&fields=name&q=ops'")]
struct Cli {
    /// The base SELECT statement to paginate
    query: Option<String>,

    /// Raw query string (filters, fields, q, sort, page)
    #[arg(short, long, default_value = "")]
    params: String,

    /// Columns allowed in filters, search and sort
    #[arg(short, long, value_delimiter = ',')]
    allow: Vec<String>,

    /// Alias of the wrapped query
    #[arg(long, default_value = "")]
    alias: String,

    /// Sort list used when the query string has no `sort`
    #[arg(long, default_value = "")]
    default_sort: String,

    /// Trusted predicate ANDed ahead of compiled filters
    #[arg(long)]
    pre_filter: Option<String>,

    /// Reject the request on any malformed or disallowed filter
    #[arg(long)]
    strict: bool,

    /// Upper bound for page[size]
    #[arg(long)]
    max_page_size: Option<i64>,

    /// Append clauses to the base query instead of wrapping it
    #[arg(long)]
    inline: bool,

    /// Compiler configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Database connection URL
    #[arg(long, env = "RQL_DATABASE_URL")]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a query string and show how each key is read
    Explain {
        /// The raw query string
        params: String,
    },
    /// Show the filter operator table
    Operators,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Some(Commands::Explain { params }) => explain(params),
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => match &cli.query {
            Some(query) => run(query, &cli).await,
            None => {
                println!("{}", "rql: query strings to SQL".cyan().bold());
                println!();
                println!("Usage: rql <QUERY> --params <QUERY_STRING> --allow <FIELDS>");
                println!();
                println!("Try: rql --help");
                Ok(())
            }
        },
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rql=debug" } else { "rql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CompilerConfig::discover()?,
    };
    if cli.strict {
        config.filter_policy = FilterPolicy::Strict;
    }
    if let Some(max) = cli.max_page_size {
        config.max_page_size = Some(max);
    }
    if cli.inline {
        config.shell = Shell::Inline;
    }
    config.validate()?;
    Ok(config)
}

async fn run(query: &str, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let compiler = Compiler::new(config);

    let mut builder = PaginationRequest::builder()
        .base_query(query)
        .query_string(cli.params.as_str())
        .allow(cli.allow.iter().map(String::as_str))
        .default_sort(cli.default_sort.as_str())
        .alias(cli.alias.as_str());
    if let Some(pre) = &cli.pre_filter {
        builder = builder.pre_filter(pre.as_str());
    }
    let request = builder.build()?;
    let stmt = compiler.compile(&request)?;

    let Some(url) = &cli.database_url else {
        print_statement(&stmt, &cli.format)?;
        return Ok(());
    };

    if cli.verbose {
        eprintln!("{} {}", "Connecting to:".dimmed(), url);
    }
    let db = RqlDB::connect(url).await?;
    let page = db.paginate(&stmt).await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Table => {
            print_table(&page.rows);
            println!(
                "page {} of {} ({} rows total, {} per page)",
                page.meta.page.to_string().cyan(),
                page.meta.pages().to_string().cyan(),
                page.meta.total.to_string().cyan(),
                page.meta.size
            );
        }
    }
    Ok(())
}

fn print_statement(stmt: &CompiledStatement, format: &OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(stmt)?);
        return Ok(());
    }

    println!("{}", "SQL:".green().bold());
    println!("  {}", stmt.sql.white());
    println!("{}", "Count SQL:".green().bold());
    println!("  {}", stmt.count_sql.white());

    if !stmt.args.is_empty() {
        println!("{}", "Bindings:".cyan());
        for (i, arg) in stmt.args.iter().enumerate() {
            println!(
                "  ${} = {} {}",
                i + 1,
                arg.to_string().yellow(),
                format!("({})", arg.kind()).dimmed()
            );
        }
    }
    println!(
        "{} page={} limit={} offset={}",
        "Page:".cyan(),
        stmt.page,
        stmt.limit,
        stmt.offset
    );
    Ok(())
}

fn print_table(rows: &[RowMap]) {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    let mut columns: Vec<&String> = rows[0].keys().collect();
    columns.sort();

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            rows.iter()
                .filter_map(|row| row.get(*c))
                .map(|v| val_to_string(v).len())
                .fold(c.len(), usize::max)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:width$}", c, width = w))
        .collect();
    println!("{}", header.join(" │ ").white().bold());

    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let val = row.get(*c).map(val_to_string).unwrap_or_default();
                format!("{:width$}", val, width = w)
            })
            .collect();
        println!("{}", cells.join(" │ "));
    }
    println!();
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn explain(raw: &str) -> Result<()> {
    let params = QueryParams::parse(raw)?;

    println!("{}", "Query String Explanation".cyan().bold());
    println!();
    println!("{} {}", "Input:".dimmed(), raw.yellow());
    println!();

    for (key, values) in params.iter() {
        let first = values.first().map(String::as_str).unwrap_or_default();
        let reading = match classify_key(key) {
            KeyKind::Filter(filter) => match Operator::from_symbol(filter.op) {
                Some(op) => format!(
                    "filter {} {} {} ({})",
                    filter.field,
                    op.sql(),
                    Value::infer(first),
                    Value::infer(first).kind()
                ),
                None => format!(
                    "filter {} = {} (unknown operator '{}')",
                    filter.field,
                    Value::infer(first),
                    filter.op
                ),
            },
            KeyKind::Malformed => "malformed filter, ignored".to_string(),
            KeyKind::Other => match key {
                "q" => "search term".to_string(),
                "fields" => "search fields".to_string(),
                "sort" => "sort list".to_string(),
                "page[number]" => "page number".to_string(),
                "page[size]" => "page size".to_string(),
                _ => "not recognized".to_string(),
            },
        };
        println!("  {} = {}  {}", key.white(), first.yellow(), reading.dimmed());
        if values.len() > 1 {
            println!("    {}", format!("{} more value(s) ignored", values.len() - 1).dimmed());
        }
    }
    Ok(())
}

fn show_operators() {
    println!("{}", "Filter Operators".cyan().bold());
    println!();
    println!(
        "{:8} {:8} {}",
        "Symbol".white().bold(),
        "SQL".white().bold(),
        "Example".white().bold()
    );
    println!("{}", "─".repeat(48).dimmed());
    for op in Operator::ALL {
        println!(
            "{:8} {:8} {}",
            op.symbol().cyan().bold(),
            op.sql().yellow(),
            format!("filters[field:{}]=value", op.symbol()).dimmed()
        );
    }
    println!();
    println!("{}", "Unknown operators compile as '=' unless --strict is set.".dimmed());
}
