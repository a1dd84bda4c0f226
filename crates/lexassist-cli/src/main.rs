mod display;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lexassist_core::{KnowledgeBase, KnowledgeSource, Response};
use lexassist_host::{Assistant, AssistantConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexassist", version, about = "Rule-based legal question assistant")]
struct Cli {
    /// Knowledge base JSON file (defaults to the bundled data)
    #[arg(long, env = "LEXASSIST_KNOWLEDGE", global = true)]
    knowledge: Option<PathBuf>,

    /// Maximum cached answers (unbounded if unset)
    #[arg(long, env = "LEXASSIST_CACHE_CAPACITY", global = true)]
    cache_capacity: Option<usize>,

    /// Skip the simulated processing delay
    #[arg(long, global = true)]
    no_delay: bool,

    /// Print answers as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session on stdin
    Chat,
    /// List topics, coded sections, concepts and guidance notes
    Topics,
    /// Show one coded section
    Section { number: String },
    /// Validate a knowledge base file and print its table sizes
    Validate { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("lexassist v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Ask { question } => {
            let mut assistant = assistant(&cli)?;
            let text = question.join(" ");
            let Some(response) = assistant.submit(&text).await else {
                bail!("question is empty");
            };
            print_response(&response, cli.json)?;
        }
        Command::Chat => chat(&cli).await?,
        Command::Topics => {
            let kb = load_knowledge(cli.knowledge.as_deref())?;
            if cli.json {
                let listing = serde_json::json!({
                    "topics": kb.topics().iter().map(|t| &t.key).collect::<Vec<_>>(),
                    "codedSections": kb.sections().iter().map(|s| &s.number).collect::<Vec<_>>(),
                    "concepts": kb.concepts().iter().map(|c| &c.term).collect::<Vec<_>>(),
                    "guidance": kb.guidance().iter().map(|g| &g.id).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print!("{}", display::render_catalogue(&kb));
            }
        }
        Command::Section { number } => {
            let kb = load_knowledge(cli.knowledge.as_deref())?;
            let section = kb
                .section(number.trim())
                .with_context(|| format!("no section {number} in the knowledge base"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(section)?);
            } else {
                print!("{}", display::render_section(section));
            }
        }
        Command::Validate { path } => {
            let path = path.as_deref().or(cli.knowledge.as_deref());
            let kb = load_knowledge(path)?;
            let summary = kb.summary();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{}: ok",
                    path.map_or("bundled knowledge".into(), |p| p.display().to_string())
                );
                println!("  topics          {}", summary.topics);
                println!("  scenarios       {}", summary.scenarios);
                println!("  coded sections  {}", summary.coded_sections);
                println!("  concepts        {}", summary.concepts);
                println!("  guidance        {}", summary.guidance);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_knowledge(path: Option<&Path>) -> anyhow::Result<Arc<KnowledgeBase>> {
    let kb = match path {
        Some(path) => KnowledgeBase::from_json_file(path)
            .with_context(|| format!("failed to load knowledge base {}", path.display()))?,
        None => KnowledgeBase::bundled().context("bundled knowledge base is invalid")?,
    };
    Ok(Arc::new(kb))
}

fn assistant(cli: &Cli) -> anyhow::Result<Assistant> {
    let kb = load_knowledge(cli.knowledge.as_deref())?;
    let mut config = if cli.no_delay {
        AssistantConfig::instant()
    } else {
        AssistantConfig::default()
    };
    config.cache_capacity = cli.cache_capacity;
    Assistant::new(kb, config).context("invalid cache capacity")
}

fn print_response(response: &Response, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(response)?);
    } else {
        print!("{}", display::render_response(response));
    }
    Ok(())
}

/// Read questions line by line until EOF or `exit`.
///
/// A bare number re-asks that suggested question from the previous answer.
async fn chat(cli: &Cli) -> anyhow::Result<()> {
    let mut assistant = assistant(cli)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut suggestions: Vec<String> = Vec::new();

    if !cli.json {
        println!("Ask a legal question. Type a suggestion number to follow up, or `exit`.");
    }

    loop {
        if !cli.json {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        let question = match line.parse::<usize>() {
            Ok(n) if (1..=suggestions.len()).contains(&n) => suggestions[n - 1].clone(),
            _ => line.to_string(),
        };

        let Some(response) = assistant.submit(&question).await else {
            continue;
        };
        if !cli.json {
            println!("[{}]", chrono::Local::now().format("%H:%M:%S"));
        }
        print_response(&response, cli.json)?;
        suggestions = response.suggested_questions.clone().unwrap_or_default();
    }

    if cli.json {
        println!("{}", serde_json::to_string(assistant.stats())?);
    } else {
        println!();
        print!("{}", display::render_stats(assistant.stats()));
    }
    Ok(())
}
