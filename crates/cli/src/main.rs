use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{build_system_prompt, is_exit_command, AssistantAgent, PromptStyle, DEFAULT_DUMP_PATH};
use common::{init_logging, AppConfig, LoggingConfig, McpConfig, TrackerConfig};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use llm::AnthropicClient;
use projects::ActiveProjectsCache;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tools::{active_projects_tools, McpHttpClient, RemoteTool, ToolRegistry};
use tracing::{info, warn, Level};
use tracker::JiraClient;

#[derive(Parser)]
#[command(name = "tcm-assistant")]
#[command(about = "Documentation assistant scoped to active TCM projects")]
#[command(version)]
struct Cli {
    /// System prompt strategy for chat sessions
    #[arg(long, value_enum, default_value_t = PromptStyle::Scalable, global = true)]
    prompt: PromptStyle,

    /// Log at info level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Single message to send (interactive mode when omitted)
        message: Option<String>,
    },
    /// Inspect the active projects allow-list
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Write every issue of the tracker project to a JSON file
    Dump {
        #[arg(short, long, default_value = DEFAULT_DUMP_PATH)]
        output: PathBuf,
    },
    /// List the tools the assistant can call
    Tools,
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// Print every active project
    List,
    /// Check whether a project or client name is active
    Check { query: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level(Level::INFO);
    }
    init_logging(logging)?;

    match cli.command {
        Some(Commands::Chat { message }) => handle_chat(cli.prompt, message).await,
        Some(Commands::Projects { action }) => handle_projects(action).await,
        Some(Commands::Dump { output }) => handle_dump(output).await,
        Some(Commands::Tools) => handle_tools().await,
        None => handle_chat(cli.prompt, None).await,
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn tracker_cache(config: &TrackerConfig) -> Result<Arc<ActiveProjectsCache>> {
    let client = JiraClient::new(config)?;
    Ok(Arc::new(ActiveProjectsCache::new(Arc::new(client))))
}

/// Load the allow-list. Failure is reported and the session goes on with
/// an empty list.
async fn load_projects(cache: &ActiveProjectsCache) {
    println!("Loading active projects from TSG Capacity Management Tool...");
    let progress = spinner("Fetching active projects...");
    let result = cache.load().await;
    progress.finish_and_clear();

    match result {
        Ok(count) => {
            let sample = cache.get_sample_names(5);
            println!(
                "{} Loaded {} active projects/clients",
                style("[✓]").green(),
                count
            );
            if !sample.is_empty() {
                println!("Sample: {}...", sample.join(", "));
            }
        }
        Err(e) => {
            warn!(error = %e, "Could not load active projects");
            println!(
                "{} Could not load active projects: {:#}",
                style("Warning:").yellow().bold(),
                e
            );
            println!("Continuing without active projects filtering...");
        }
    }
}

async fn build_registry(cache: Arc<ActiveProjectsCache>, mcp: &McpConfig) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    let client = Arc::new(McpHttpClient::new(mcp)?);
    let progress = spinner("Discovering CData tools...");
    let discovered = RemoteTool::discover(client).await;
    progress.finish_and_clear();

    match discovered {
        Ok(remote) => {
            info!(count = remote.len(), server = %mcp.server_url, "Registered remote tools");
            registry.register_all(remote);
        }
        Err(e) => {
            warn!(error = %e, "MCP tool discovery failed");
            println!(
                "{} Could not list CData tools: {}",
                style("Warning:").yellow().bold(),
                e
            );
        }
    }

    registry.register_all(active_projects_tools(cache));
    Ok(registry)
}

async fn handle_chat(prompt_style: PromptStyle, message: Option<String>) -> Result<()> {
    let config = AppConfig::from_env().context("Configuration incomplete")?;

    println!("{}", style("=".repeat(60)).dim());
    println!("{}", style("Claude Agent - Active Projects Assistant").cyan().bold());
    println!("{}", style("=".repeat(60)).dim());
    println!("CData MCP Server: {}\n", config.mcp.server_url);

    let cache = tracker_cache(&config.tracker)?;
    load_projects(&cache).await;
    println!();

    let system_prompt = build_system_prompt(prompt_style, &cache);
    let registry = Arc::new(build_registry(Arc::clone(&cache), &config.mcp).await?);
    let backend = AnthropicClient::new(&config.llm)?;
    let mut agent = AssistantAgent::new(backend, registry, system_prompt);

    match message {
        Some(message) => {
            let reply = ask_with_spinner(&mut agent, &message).await?;
            println!("{}", reply);
            Ok(())
        }
        None => run_interactive(&mut agent).await,
    }
}

async fn ask_with_spinner(
    agent: &mut AssistantAgent<AnthropicClient>,
    input: &str,
) -> Result<String> {
    let progress = spinner("Thinking...");
    let reply = agent.ask(input).await;
    progress.finish_and_clear();
    reply
}

async fn run_interactive(agent: &mut AssistantAgent<AnthropicClient>) -> Result<()> {
    println!("{}", style("=".repeat(60)).dim());
    println!("{}", style("Assistant Ready!").green().bold());
    println!("{}", style("=".repeat(60)).dim());
    println!("\nExample queries:");
    println!("  - 'What active projects do we have?'");
    println!("  - 'Tell me about the Thrivent project'");
    println!("  - 'What Confluence pages exist for Medtronic?'");
    println!("  - 'Is Acme Corp an active project?'");
    println!("\nType {} to exit.\n", style("'quit'").yellow().bold());

    loop {
        print!("{} ", style("You:").bright().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            println!("Goodbye!");
            break;
        }

        match ask_with_spinner(agent, input).await {
            Ok(reply) => println!("\n{}\n{}\n", style("Assistant:").green().bold(), reply),
            Err(e) => println!("\n{} {:#}\n", style("Error:").red().bold(), e),
        }
    }

    Ok(())
}

async fn handle_projects(action: ProjectsAction) -> Result<()> {
    let config = TrackerConfig::from_env()?;
    let cache = tracker_cache(&config)?;
    let count = cache.load().await?;

    match action {
        ProjectsAction::List => {
            println!("Active projects from TCM ({}):", count);
            for project in cache.list_all() {
                println!("  {}: {}", style(&project.key).cyan(), project.name);
            }
            let (keys, _) = cache.keys_and_names();
            if keys.len() > 5 {
                println!("\nKeys for filtering: {}...", keys[..5].join(", "));
            } else {
                println!("\nKeys: {}", keys.join(", "));
            }
        }
        ProjectsAction::Check { query } => {
            let check = cache.is_active(query.as_str());
            let label = if check.active {
                style(check.message.as_str()).green()
            } else {
                style(check.message.as_str()).red()
            };
            println!("{}", label);
        }
    }
    Ok(())
}

async fn handle_dump(output: PathBuf) -> Result<()> {
    let config = TrackerConfig::from_env()?;
    let client = JiraClient::new(&config)?;

    let progress = spinner("Fetching every tracker issue...");
    let result = client.dump_all_issues(&output).await;
    progress.finish_and_clear();

    let issues = result?;
    println!(
        "Dumped {} {} issues to {}",
        issues.len(),
        client.project_key(),
        output.display()
    );
    Ok(())
}

async fn handle_tools() -> Result<()> {
    let tracker = TrackerConfig::from_env()?;
    let cache = tracker_cache(&tracker)?;

    let registry = match McpConfig::from_env() {
        Ok(mcp) => build_registry(cache, &mcp).await?,
        Err(e) => {
            println!("{} {}", style("CData tools unavailable:").yellow().bold(), e);
            let mut registry = ToolRegistry::new();
            registry.register_all(active_projects_tools(cache));
            registry
        }
    };

    println!("{} ({}):", style("Registered Tools").bold(), registry.len());
    for spec in registry.definitions() {
        let summary = spec.description.lines().next().unwrap_or_default();
        println!("  {} - {}", style(&spec.name).cyan(), summary);
    }
    Ok(())
}
