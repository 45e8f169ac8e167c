use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rippletide::{AgentSpec, AuthMode, ClientConfig, ClientError, PdfSource, RippletideClient};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rippletide", version, about = "Rippletide evaluation API client")]
struct Cli {
    /// Service address [env: RIPPLETIDE_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// API key for authenticated requests [env: RIPPLETIDE_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Session id for anonymous requests [env: RIPPLETIDE_SESSION_ID]
    #[arg(long, global = true)]
    session_id: Option<String>,
    /// Request timeout [env: RIPPLETIDE_TIMEOUT_SECONDS]
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an evaluation agent
    CreateAgent {
        name: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = rippletide::protocol::DEFAULT_NUM_NODES)]
        num_nodes: u32,
        #[arg(long)]
        public_url: Option<String>,
        /// JSON object forwarded as-is
        #[arg(long, value_parser = parse_json_object)]
        advanced_payload: Option<Map<String, Value>>,
        #[arg(long)]
        parent_agent_id: Option<String>,
    },
    /// Upload a PDF to extract questions from (`-` reads stdin)
    UploadPdf { agent_id: String, pdf: PathBuf },
    /// List the test prompts of an agent
    TestPrompts { agent_id: String },
    /// Send a chat message to an agent
    Chat { agent_id: String, message: String },
    /// Evaluate a question against an agent
    Evaluate {
        agent_id: String,
        question: String,
        #[arg(long)]
        expected_answer: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rippletide=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, ClientError> {
    let config = resolve_config(ClientConfig::from_env()?, &cli);
    let client = RippletideClient::new(config)?;

    if let AuthMode::Anonymous { session_id } = client.auth() {
        info!(%session_id, "using anonymous session");
    }

    let response = match cli.command {
        Commands::CreateAgent {
            name,
            seed,
            num_nodes,
            public_url,
            advanced_payload,
            parent_agent_id,
        } => {
            let mut spec = AgentSpec::new(name).with_num_nodes(num_nodes);
            spec.seed = seed;
            spec.public_url = public_url;
            spec.advanced_payload = advanced_payload;
            spec.parent_agent_id = parent_agent_id;
            client.create_agent(spec).await?
        }
        Commands::UploadPdf { agent_id, pdf } => {
            let source = if pdf.as_os_str() == "-" {
                PdfSource::reader(tokio::io::stdin())
            } else {
                PdfSource::Path(pdf)
            };
            client.extract_questions_from_pdf(&agent_id, source).await?
        }
        Commands::TestPrompts { agent_id } => client.get_test_prompts(&agent_id).await?,
        Commands::Chat { agent_id, message } => client.chat(&agent_id, message).await?,
        Commands::Evaluate {
            agent_id,
            question,
            expected_answer,
        } => client.evaluate(&agent_id, question, expected_answer).await?,
    };

    Ok(serde_json::to_string_pretty(&response)?)
}

/// Command-line flags override values read from the environment.
fn resolve_config(mut config: ClientConfig, cli: &Cli) -> ClientConfig {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key = Some(api_key.clone());
    }
    if let Some(session_id) = &cli.session_id {
        config.session_id = Some(session_id.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Some(Duration::from_secs(secs));
    }
    config
}

fn parse_json_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}
