use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skyvault_paging::{
    Cursor, Dialect, IdentityKind, KeysetColumns, KeysetPlan, PageRequest, PagingConfig, Postgres,
    QueryBuilder, SortBy, Sqlite, check_sql_identifier,
};
use tracing::debug;

use crate::render;

#[derive(Parser, Debug)]
#[command(
    name = "paging-explain",
    version,
    about = "Show the keyset query issued for a paging request",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Paging limits as TOML (default-limit, max-limit, max-cursor-len)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the SQL and bound parameters for a request query string
    Sql(SqlArgs),
    /// Decode a cursor token
    Cursor(CursorArgs),
}

#[derive(clap::Args, Debug)]
struct SqlArgs {
    /// Request query string, e.g. "limit=20&direction=forward&sort-by=name"
    query: String,

    #[arg(long)]
    table: String,

    #[arg(long, value_enum, default_value_t = DialectArg::Postgres)]
    dialect: DialectArg,

    /// Comma-separated SELECT list; all columns when omitted
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Key prefix for endpoints paging two collections (e.g. "file-")
    #[arg(long, default_value = "")]
    prefix: String,

    #[arg(long, default_value = "id")]
    id_column: String,

    #[arg(long, default_value = "name")]
    name_column: String,

    #[arg(long, default_value = "updated_at")]
    updated_column: String,

    #[arg(long, value_enum, default_value_t = IdentityArg::Integer)]
    identity: IdentityArg,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct CursorArgs {
    /// Cursor token as sent by the client
    cursor: String,

    #[arg(long, default_value = "name")]
    sort_by: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DialectArg {
    Postgres,
    Sqlite,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IdentityArg {
    Integer,
    Uuid,
    Text,
}

impl From<IdentityArg> for IdentityKind {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::Integer => Self::Integer,
            IdentityArg::Uuid => Self::Uuid,
            IdentityArg::Text => Self::Text,
        }
    }
}

/// Execute a parsed command and return what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.cmd {
        Cmd::Sql(args) => explain_sql(args, &config),
        Cmd::Cursor(args) => explain_cursor(args, &config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<PagingConfig> {
    let Some(path) = path else {
        return Ok(*PagingConfig::global());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = PagingConfig::from_toml_str(&text)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    debug!(?config, "loaded paging config");
    Ok(config)
}

fn explain_sql(args: &SqlArgs, config: &PagingConfig) -> Result<String> {
    check_sql_identifier(&args.table, "table")?;
    for field in &args.fields {
        check_sql_identifier(field, "field")?;
    }
    let columns = KeysetColumns::try_new(&args.id_column, &args.name_column, &args.updated_column)?
        .with_identity_kind(args.identity.into());

    let options = PageRequest::from_query_with_prefix(&args.query, &args.prefix)?.validate_with(config);
    let plan = KeysetPlan::prepare(&options, &columns)?;
    debug!(?plan, "prepared keyset plan");

    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let query = match args.dialect {
        DialectArg::Postgres => build(Postgres::default(), &args.table, &fields, &plan),
        DialectArg::Sqlite => build(Sqlite::default(), &args.table, &fields, &plan),
    };

    if args.json {
        Ok(render::plan_json(&options, &plan, &query)?)
    } else {
        Ok(render::plan_text(&options, &plan, &query))
    }
}

fn build<D: Dialect>(
    dialect: D,
    table: &str,
    fields: &[&str],
    plan: &KeysetPlan,
) -> skyvault_paging::QueryResult {
    debug!(dialect = dialect.name(), table, "rendering query");
    let mut query = QueryBuilder::new(dialect, table);
    if !fields.is_empty() {
        query = query.fields(fields);
    }
    plan.apply(query).build()
}

fn explain_cursor(args: &CursorArgs, config: &PagingConfig) -> Result<String> {
    let sort_by = SortBy::from_param(&args.sort_by);
    let cursor = Cursor::decode_with_limit(&args.cursor, sort_by, config.max_cursor_len)
        .with_context(|| format!("cursor is not valid for sort-by '{sort_by}'"))?;
    Ok(render::cursor_json(cursor.as_ref())?)
}
