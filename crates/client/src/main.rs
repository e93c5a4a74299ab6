//! `stockpad` command-line front end.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};

use stockpad_client::{
    AppContext, ClientConfig, ClientEvent, ClientResult, Credentials, OperationStatus, SignUpForm,
};
use stockpad_core::{CategoryId, CustomerDraft, CustomerUuid};

/// Client for the inventory backend
#[derive(Parser, Debug)]
#[command(name = "stockpad")]
#[command(about = "Sign in and manage categories and customers of an inventory backend")]
struct Cli {
    /// Backend base URL (overrides STOCKPAD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the session database (overrides STOCKPAD_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    #[command(name = "signin")]
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOCKPAD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new entity
    #[command(name = "signup")]
    SignUp {
        #[arg(long)]
        entity_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOCKPAD_PASSWORD", hide_env_values = true)]
        password: String,
        /// Extra registration field, as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session (never the token)
    Whoami,
    /// Run the navigation gate for a path
    Navigate { path: String },
    #[command(subcommand)]
    Category(CategoryCommand),
    #[command(subcommand)]
    Customer(CustomerCommand),
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Add { name: String },
    Update { id: CategoryId, name: String },
    Delete { id: CategoryId },
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    List,
    Add(NewCustomerArgs),
    Update {
        uuid: CustomerUuid,
        #[command(flatten)]
        fields: CustomerFieldArgs,
    },
    Delete { uuid: CustomerUuid },
}

#[derive(Args, Debug)]
struct NewCustomerArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone_number: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    company: Option<String>,
}

#[derive(Args, Debug)]
struct CustomerFieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    company: Option<String>,
}

impl From<NewCustomerArgs> for CustomerDraft {
    fn from(args: NewCustomerArgs) -> Self {
        Self {
            entity_id: None,
            name: Some(args.name),
            email: Some(args.email),
            phone_number: Some(args.phone_number),
            address: Some(args.address),
            company: args.company,
        }
    }
}

impl From<CustomerFieldArgs> for CustomerDraft {
    fn from(args: CustomerFieldArgs) -> Self {
        Self {
            entity_id: None,
            name: args.name,
            email: args.email,
            phone_number: args.phone_number,
            address: args.address,
            company: args.company,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    stockpad_observability::init(config.log_format);

    let ctx = AppContext::bootstrap(config).await?;
    let mut events = ctx.events().subscribe();

    let result = dispatch(&ctx, cli.command).await;

    while let Ok(event) = events.try_recv() {
        if let ClientEvent::Notify(notification) = event {
            eprintln!("{}", notification.message);
        }
    }

    result
}

async fn dispatch(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::SignIn { email, password } => {
            let credentials = Credentials { email, password };
            let result = ctx.identity().sign_in(&credentials).await;
            let session = surface(result, ctx.identity().status().await)?;
            emit(&json!({
                "authenticated": session.is_authenticated(),
                "entity": session.entity,
                "individual": session.individual,
            }))
        }
        Command::SignUp {
            entity_name,
            email,
            password,
            fields,
        } => {
            let extra: Map<String, Value> = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let form = SignUpForm {
                entity_name,
                email,
                password,
                extra,
            };
            let result = ctx.identity().sign_up(&form).await;
            emit(&surface(result, ctx.identity().status().await)?)
        }
        Command::Logout => {
            ctx.identity().logout().await?;
            Ok(())
        }
        Command::Whoami => {
            let session = ctx.session().snapshot().await;
            emit(&json!({
                "authenticated": session.is_authenticated(),
                "entity_id": session.entity_id(),
                "entity": session.entity,
                "individual": session.individual,
            }))
        }
        Command::Navigate { path } => emit(&ctx.navigate(&path).await),
        Command::Category(command) => {
            require_dashboard(ctx).await?;
            run_category(ctx, command).await
        }
        Command::Customer(command) => {
            require_dashboard(ctx).await?;
            run_customer(ctx, command).await
        }
    }
}

async fn run_category(ctx: &AppContext, command: CategoryCommand) -> anyhow::Result<()> {
    let client = ctx.categories();
    match command {
        CategoryCommand::List => {
            let result = client.list().await;
            emit(&surface(result, client.status().await)?)
        }
        CategoryCommand::Add { name } => {
            let result = client.add(&name).await;
            emit(&surface(result, client.status().await)?)
        }
        CategoryCommand::Update { id, name } => {
            let result = client.update(id, &name).await;
            emit(&surface(result, client.status().await)?)
        }
        CategoryCommand::Delete { id } => {
            let result = client.delete(id).await;
            emit(&surface(result, client.status().await)?)
        }
    }
}

async fn run_customer(ctx: &AppContext, command: CustomerCommand) -> anyhow::Result<()> {
    let client = ctx.customers();
    match command {
        CustomerCommand::List => {
            let result = client.list().await;
            emit(&surface(result, client.status().await)?)
        }
        CustomerCommand::Add(args) => {
            let result = client.create(args.into()).await;
            surface(result, client.status().await)?;
            emit(&client.customers().await)
        }
        CustomerCommand::Update { uuid, fields } => {
            let result = client.update(&uuid, &fields.into()).await;
            surface(result, client.status().await)?;
            emit(&client.customers().await)
        }
        CustomerCommand::Delete { uuid } => {
            let result = client.delete(&uuid).await;
            surface(result, client.status().await)?;
            emit(&client.customers().await)
        }
    }
}

/// Resource screens live behind the dashboard route.
async fn require_dashboard(ctx: &AppContext) -> anyhow::Result<()> {
    let decision = ctx.navigate("/").await;
    if !decision.is_allowed() {
        bail!("not signed in; run `stockpad signin` first");
    }
    Ok(())
}

/// Attach the module's recorded message to the underlying error.
fn surface<T>(result: ClientResult<T>, status: OperationStatus) -> anyhow::Result<T> {
    result.map_err(|err| {
        let message = status.error.unwrap_or_else(|| err.to_string());
        anyhow!(err).context(message)
    })
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
