use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pdf_qa_core::{
    BackendKind, GeneratorBackend, GeneratorConfig, LopdfExtractor, PdfExtractor, Session,
    TextGenerator,
};
use std::path::{Path, PathBuf};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-qa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model runner executable, invoked as `<runner> run <model> <prompt>`
    #[arg(long, env = "PDF_QA_RUNNER", default_value = "ollama")]
    runner: String,

    /// Model identifier passed to the runner
    #[arg(long, env = "PDF_QA_MODEL", default_value = "gemma3")]
    model: String,

    /// How the model is reached
    #[arg(long, value_enum, default_value_t = Backend::Command)]
    backend: Backend,

    /// Ollama server base URL, used by the http backend
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Spawn the runner as a child process.
    Command,
    /// Call the Ollama HTTP API.
    Http,
}

impl From<Backend> for BackendKind {
    fn from(value: Backend) -> Self {
        match value {
            Backend::Command => BackendKind::Command,
            Backend::Http => BackendKind::OllamaHttp,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Extract and clean the text of a PDF.
    Extract {
        /// PDF file to read.
        pdf: PathBuf,
    },
    /// Summarize a PDF.
    Summarize {
        /// PDF file to read.
        pdf: PathBuf,
    },
    /// Ask a question about a PDF.
    Ask {
        /// PDF file to read.
        pdf: PathBuf,
        /// Question to answer from the document.
        #[arg(long, short)]
        question: String,
    },
    /// Interactive session: load a PDF, then summarize or ask repeatedly.
    Shell {
        /// PDF file to load on start.
        pdf: Option<PathBuf>,
    },
}

const SHELL_HELP: &str = "commands:
  load <path>      extract and clean a PDF
  text             print the cleaned text
  summary          summarize the loaded PDF
  ask <question>   answer a question about the loaded PDF
  help             show this message
  quit             leave the shell";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = GeneratorConfig {
        runner: cli.runner.clone(),
        model: cli.model.clone(),
        ollama_url: cli.ollama_url.clone(),
    };
    let generator = GeneratorBackend::from_config(cli.backend.into(), &config);
    let mut session = Session::new(LopdfExtractor, generator)?;

    info!(
        version = app_version,
        model = %config.model,
        started_at = %Utc::now().to_rfc3339(),
        "pdf-qa boot"
    );

    let mut stdout = io::stdout();
    match cli.command {
        Command::Extract { pdf } => {
            let text = load(&mut session, &pdf, cli.json)?;
            write_line(&mut stdout, &text).await?;
        }
        Command::Summarize { pdf } => {
            if let Some(error) = load_error(&mut session, &pdf) {
                write_line(&mut stdout, &error).await?;
            } else {
                let summary = session.summary_text().await;
                write_answer(&mut stdout, cli.json, None, &summary).await?;
            }
        }
        Command::Ask { pdf, question } => {
            if let Some(error) = load_error(&mut session, &pdf) {
                write_line(&mut stdout, &error).await?;
            } else {
                let answer = session.answer_text(&question).await;
                write_answer(&mut stdout, cli.json, Some(question.as_str()), &answer).await?;
            }
        }
        Command::Shell { pdf } => {
            if let Some(pdf) = pdf {
                let text = load(&mut session, &pdf, cli.json)?;
                write_line(&mut stdout, &text).await?;
            }
            let stdin = BufReader::new(io::stdin());
            run_shell(&mut session, cli.json, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Loads `pdf` and returns the text to print: the cleaned text, the JSON
/// document, or the error message.
fn load<E, G>(session: &mut Session<E, G>, pdf: &Path, json: bool) -> anyhow::Result<String>
where
    E: PdfExtractor,
    G: TextGenerator + Send + Sync,
{
    match session.process_document(pdf) {
        Ok(document) if json => Ok(serde_json::to_string_pretty(document)?),
        Ok(document) => Ok(document.cleaned_text.clone()),
        Err(error) => {
            warn!(path = %pdf.display(), %error, "unable to load pdf");
            Ok(error.to_string())
        }
    }
}

fn load_error<E, G>(session: &mut Session<E, G>, pdf: &Path) -> Option<String>
where
    E: PdfExtractor,
    G: TextGenerator + Send + Sync,
{
    session.process_document(pdf).err().map(|error| error.to_string())
}

async fn write_line<W>(out: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

async fn write_answer<W>(
    out: &mut W,
    json: bool,
    question: Option<&str>,
    answer: &str,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if json {
        let value = serde_json::json!({
            "question": question,
            "answer": answer,
        });
        write_line(out, &serde_json::to_string_pretty(&value)?).await?;
    } else {
        write_line(out, answer).await?;
    }
    Ok(())
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

async fn run_shell<E, G, R, W>(
    session: &mut Session<E, G>,
    json: bool,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    E: PdfExtractor,
    G: TextGenerator + Send + Sync,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    write_line(out, SHELL_HELP).await?;
    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let (command, argument) = split_command(&line);

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => write_line(out, SHELL_HELP).await?,
            "load" if argument.is_empty() => write_line(out, "usage: load <path>").await?,
            "load" => {
                let text = load(session, Path::new(argument), json)?;
                write_line(out, &text).await?;
            }
            "text" => {
                let text = match session.cleaned_text() {
                    Ok(text) => text.to_string(),
                    Err(error) => error.to_string(),
                };
                write_line(out, &text).await?;
            }
            "summary" => {
                let summary = session.summary_text().await;
                write_answer(out, json, None, &summary).await?;
            }
            "ask" => {
                let answer = session.answer_text(argument).await;
                write_answer(out, json, Some(argument), &answer).await?;
            }
            other => {
                write_line(out, &format!("unknown command: {other} (try `help`)")).await?;
            }
        }
    }

    Ok(())
}
