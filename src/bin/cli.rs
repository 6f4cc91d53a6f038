//! Survey Runner CLI
//!
//! Command-line interface for the backend API:
//! - Parse, list, inspect and delete surveys
//! - Create tasks and drive their lifecycle
//! - Read and replace the backend configuration

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use survey_runner::api::{Api, CreatedTask, TaskDraft, TaskListParams, TaskStatus};
use survey_runner::client::{ClientError, ClientResult, HttpClient, DEFAULT_API_BASE};

#[derive(Parser)]
#[command(name = "survey-runner-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drive the survey parsing and task automation backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL
    #[arg(long, default_value = DEFAULT_API_BASE, global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Survey operations
    #[command(subcommand)]
    Survey(SurveyCommand),

    /// Task operations
    #[command(subcommand)]
    Task(TaskCommand),

    /// Backend configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum SurveyCommand {
    /// Parse a survey from its URL
    Parse { url: String },
    /// List parsed surveys
    List,
    /// Show one survey
    Get { id: String },
    /// Delete a survey
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Create a task
    Create(CreateArgs),
    /// List tasks
    List(ListArgs),
    /// Show one task
    Get { id: String },
    /// Refresh a task's status from the worker
    Refresh { id: String },
    /// Set a task's status (running, paused, stopped)
    Status { id: String, status: String },
    /// Pause a task
    Pause { id: String },
    /// Resume a paused task
    Resume { id: String },
    /// Stop a task
    Stop { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Survey to fill
    #[arg(long)]
    survey_id: String,
    /// Number of submissions
    #[arg(short, long)]
    count: String,
    /// Route submissions through a proxy
    #[arg(long)]
    use_proxy: bool,
    /// Proxy URL
    #[arg(long)]
    proxy_url: Option<String>,
    /// Let an LLM answer open questions
    #[arg(long)]
    use_llm: bool,
    /// LLM provider (default: aliyun)
    #[arg(long)]
    llm_type: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Sort field (e.g. created_at)
    #[arg(long)]
    sort_field: Option<String>,
    /// Sort order (asc, desc)
    #[arg(long)]
    sort_order: Option<String>,
    /// Extra query parameters in key=value format
    #[arg(short = 'P', long)]
    param: Vec<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the backend configuration
    Get,
    /// Replace the backend configuration (inline JSON or @path/to/file.json)
    Set { config: String },
    /// Generate a default local config file
    Init {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = Api::new(HttpClient::new(&cli.api_url)?);
    let json = cli.format == "json";

    match cli.command {
        Commands::Survey(command) => match command {
            SurveyCommand::Parse { url } => {
                let response = check(api.surveys.parse_survey(&url).await, &cli.api_url);
                print_value(&response.data, json);
            }
            SurveyCommand::List => {
                let response = check(api.surveys.get_all_surveys().await, &cli.api_url);
                if json {
                    print_value(&response.data, true);
                } else {
                    print_surveys(&response.data);
                }
            }
            SurveyCommand::Get { id } => {
                let response = check(api.surveys.get_survey(&id).await, &cli.api_url);
                print_value(&response.data, json);
            }
            SurveyCommand::Delete { id } => {
                check(api.surveys.delete_survey(&id).await, &cli.api_url);
                println!("Deleted survey {}", id);
            }
        },

        Commands::Task(command) => match command {
            TaskCommand::Create(args) => {
                let mut draft = TaskDraft::new(args.survey_id)
                    .count(args.count)
                    .use_proxy(args.use_proxy)
                    .use_llm(args.use_llm);
                if let Some(proxy_url) = args.proxy_url {
                    draft = draft.proxy_url(proxy_url);
                }
                if let Some(llm_type) = args.llm_type {
                    draft = draft.llm_type(llm_type);
                }

                let created = check(api.tasks.create_task(&draft).await, &cli.api_url);
                if json {
                    print_value(&created, true);
                } else {
                    match serde_json::from_value::<CreatedTask>(created.clone()) {
                        Ok(task) => println!("Created task {}", task.task_id),
                        Err(_) => print_value(&created, false),
                    }
                }
            }
            TaskCommand::List(args) => {
                let mut params = TaskListParams::new();
                if let Some(page) = args.page {
                    params = params.page(page);
                }
                if let Some(page_size) = args.page_size {
                    params = params.page_size(page_size);
                }
                if let Some(field) = args.sort_field.as_deref() {
                    params = params.sort_field(field);
                }
                if let Some(order) = args.sort_order.as_deref() {
                    params = params.sort_order(order);
                }
                for pair in &args.param {
                    match pair.split_once('=') {
                        Some((k, v)) => params = params.param(k, v),
                        None => {
                            eprintln!("Invalid parameter {:?}: expected key=value", pair);
                            std::process::exit(2);
                        }
                    }
                }

                let response = check(api.tasks.get_tasks(params).await, &cli.api_url);
                if json {
                    print_value(&response.data, true);
                } else {
                    print_tasks(&response.data);
                }
            }
            TaskCommand::Get { id } => {
                let response = check(api.tasks.get_task(&id).await, &cli.api_url);
                print_value(&response.data, json);
            }
            TaskCommand::Refresh { id } => {
                let response = check(api.tasks.refresh_task(&id).await, &cli.api_url);
                print_value(&response.data, json);
            }
            TaskCommand::Status { id, status } => {
                let status: TaskStatus = match status.parse() {
                    Ok(status) => status,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(2);
                    }
                };
                check(api.tasks.update_task_status(&id, status).await, &cli.api_url);
                println!("Task {} is now {}", id, status);
            }
            TaskCommand::Pause { id } => {
                check(api.tasks.pause_task(&id).await, &cli.api_url);
                println!("Paused task {}", id);
            }
            TaskCommand::Resume { id } => {
                check(api.tasks.resume_task(&id).await, &cli.api_url);
                println!("Resumed task {}", id);
            }
            TaskCommand::Stop { id } => {
                check(api.tasks.stop_task(&id).await, &cli.api_url);
                println!("Stopped task {}", id);
            }
            TaskCommand::Delete { id } => {
                check(api.tasks.delete_task(&id).await, &cli.api_url);
                println!("Deleted task {}", id);
            }
        },

        Commands::Config(command) => match command {
            ConfigCommand::Get => {
                let response = check(api.config.get_config().await, &cli.api_url);
                print_value(&response.data, true);
            }
            ConfigCommand::Set { config } => {
                let text = match config.strip_prefix('@') {
                    Some(path) => std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path))?,
                    None => config,
                };
                let value: Value =
                    serde_json::from_str(&text).context("Configuration must be valid JSON")?;

                let response = check(api.config.update_config(&value).await, &cli.api_url);
                print_value(&response.data, json);
            }
            ConfigCommand::Init { output } => {
                let config = survey_runner::config::generate_default_config();

                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(&path, &config)?;
                        println!("Config written to {:?}", path);
                    }
                    None => {
                        print!("{}", config);
                    }
                }
            }
        },
    }

    Ok(())
}

/// Unwrap an API result, or report the failure and exit
fn check<T>(result: ClientResult<T>, api_url: &str) -> T {
    match result {
        Ok(value) => value,
        Err(ClientError::Transport(e)) => {
            eprintln!("Cannot connect to the backend at {}", api_url);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            match (e.status(), e.message()) {
                (Some(status), Some(message)) => eprintln!("Failed ({}): {}", status, message),
                (Some(status), None) => eprintln!("Failed ({})", status),
                _ => eprintln!("Error: {}", e),
            }
            std::process::exit(1);
        }
    }
}

fn print_value(data: &Value, json: bool) {
    if json || !data.is_object() {
        println!(
            "{}",
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
        );
        return;
    }

    if let Some(object) = data.as_object() {
        let width = object.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in object {
            println!("{:<width$}  {}", key, display(Some(value)), width = width);
        }
    }
}

fn print_surveys(data: &Value) {
    let surveys = match data["data"].as_array() {
        Some(s) => s,
        None => {
            println!("No data");
            return;
        }
    };

    if surveys.is_empty() {
        println!("No surveys parsed yet.");
        println!();
        println!("Parse your first survey with:");
        println!("  survey-runner-cli survey parse <url>");
        return;
    }

    println!("{:<24} {:<40} {}", "ID", "Title", "URL");
    println!("{}", "-".repeat(90));
    for survey in surveys {
        println!(
            "{:<24} {:<40} {}",
            display(survey.get("id")),
            display(survey.get("title")),
            display(survey.get("url"))
        );
    }
}

fn print_tasks(data: &Value) {
    let tasks = match data["items"].as_array() {
        Some(t) => t,
        None => {
            println!("No data");
            return;
        }
    };

    if tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }

    println!(
        "{:<38} {:<24} {:<10} {:>8} {:>6}  {}",
        "ID", "Survey", "Status", "Progress", "Count", "Created"
    );
    println!("{}", "-".repeat(110));
    for task in tasks {
        println!(
            "{:<38} {:<24} {:<10} {:>8} {:>6}  {}",
            display(task.get("id")),
            display(task.get("survey_id")),
            display(task.get("status")),
            display(task.get("progress")),
            display(task.get("count")),
            display(task.get("created_at"))
        );
    }

    println!();
    println!(
        "Page {} of {} ({} tasks)",
        display(data.get("page")),
        display(data.get("pages")),
        display(data.get("total"))
    );
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
