//! Quill CLI - transcribe a recording and chat about the transcript

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize as _;
use quill_core::{
    api_key_from_env, format_reply, save_transcript, Block, HttpProvider, Segment, Session,
    SessionConfig, SessionStatus, TranscriptSearch,
};
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_env_filter(EnvFilter::builder().parse("warn")?)
            .compact()
            .without_time()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    debug!("Command line arguments: {:?}", cli);

    // Resolve the API key before touching anything else
    let Some(api_key) = cli.api_key.clone().or_else(api_key_from_env) else {
        error!(
            "No API key. Pass {} or set {} / {}.",
            "--api-key".cyan(),
            "QUILL_API_KEY".cyan(),
            "OPENAI_API_KEY".cyan()
        );
        process::exit(1);
    };

    // Validate media file exists
    if !cli.media_file.exists() {
        error!("Media file not found: {}", cli.media_file.display());
        process::exit(1);
    }

    // Build session config
    let mut config = SessionConfig::new()
        .with_base_url(cli.base_url.clone())
        .with_api_key(api_key)
        .with_transcription_model(cli.model.clone())
        .with_chat_model(cli.chat_model.clone())
        .with_max_media_bytes(cli.max_size_mb * 1024 * 1024)
        .with_verbose(cli.verbose);

    if let Some(ref language) = cli.language {
        config = config.with_language(language.clone());
    }

    // Print startup info
    if cli.verbose {
        println!("{}", "Quill - Transcribe and Ask".blue().bold());
        println!("Provider: {}", config.base_url);
        println!("Model: {}", config.transcription_model);
        if let Some(lang) = &config.language {
            println!("Language: {}", lang);
        }
        println!();
    }

    let provider = match HttpProvider::new(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create provider client: {}", e);
            process::exit(1);
        }
    };
    let mut session = Session::new(provider, config);

    if let Err(e) = session.load_media(&cli.media_file) {
        error!("{}", e);
        process::exit(1);
    }

    // Drive the spinner from session status transitions
    let progress = spinner("Preparing media...");
    let progress_hook = progress.clone();
    let model = cli.model.clone();
    session.on_status_change(move |status| match status {
        SessionStatus::Processing => progress_hook.set_message("Preparing media..."),
        SessionStatus::Transcribing => {
            progress_hook.set_message(format!("Transcribing with {}...", model))
        }
        _ => {}
    });

    if let Err(e) = session.transcribe().await {
        progress.finish_and_clear();
        error!("Transcription failed: {}", e);
        process::exit(1);
    }
    progress.finish_and_clear();

    let transcript = session.transcript().unwrap_or_default().to_string();
    println!(
        "{} Transcribed {} ({} words)",
        "Success:".green().bold(),
        session
            .media()
            .map(|media| media.file_name())
            .unwrap_or_default()
            .bold(),
        transcript.split_whitespace().count()
    );
    println!();

    // Prepare output content
    let output_content = match cli.output {
        OutputFormat::Text => transcript.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(&session.report())?,
    };

    // Write output to file or stdout
    if let Some(output_file) = &cli.output_file {
        save_transcript(output_file, &output_content).await?;
        println!(
            "{} Output written to: {}",
            "Success:".green().bold(),
            output_file.display()
        );
        return Ok(());
    }

    println!("{}", output_content);

    if cli.no_chat || cli.output == OutputFormat::Json {
        return Ok(());
    }

    chat_loop(&mut session).await
}

const ABOUT: &str = "🪶 Transcribe a recording with a hosted AI model and chat about the transcript";

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = ABOUT)]
struct Cli {
    /// Path to the audio or video file to transcribe
    #[arg(value_name = "MEDIA_FILE")]
    media_file: PathBuf,

    /// Base URL of the provider API (OpenAI-compatible)
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// API key (falls back to QUILL_API_KEY, then OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Transcription model name
    #[arg(short, long, default_value = "whisper-1")]
    model: String,

    /// Chat model name
    #[arg(long, default_value = "gpt-4o-mini")]
    chat_model: String,

    /// Language hint (e.g., en, es, fr). Auto-detect if not specified
    #[arg(short, long)]
    language: Option<String>,

    /// Maximum media file size in megabytes
    #[arg(long, default_value = "100")]
    max_size_mb: u64,

    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    /// Output file path (writes output and skips the chat loop)
    #[arg(short = 'f', long = "output-file")]
    output_file: Option<PathBuf>,

    /// Skip the interactive chat loop
    #[arg(long)]
    no_chat: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    /// Plain transcript text
    Text,
    /// JSON session report (media, status, transcript, chat)
    Json,
}

/// Interactive chat grounded on the transcript
async fn chat_loop(session: &mut Session<HttpProvider>) -> anyhow::Result<()> {
    let transcript = session.transcript().unwrap_or_default().to_string();
    let mut search: Option<TranscriptSearch> = None;

    println!(
        "{} Ask questions about the transcript. Type {} for commands, {} to leave.",
        "Info:".blue().bold(),
        "/help".cyan(),
        "/quit".cyan()
    );

    loop {
        print!("{} ", "you>".green().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
            match name {
                "quit" | "exit" => break,
                "help" => print_help(),
                "transcript" => match &search {
                    Some(search) => render_search(search),
                    None => println!("\n{}\n", transcript),
                },
                "search" => {
                    let query = rest.trim();
                    if query.is_empty() {
                        println!("{} Usage: /search <query>", "Info:".blue().bold());
                        continue;
                    }
                    let next = TranscriptSearch::new(transcript.clone(), query);
                    if next.is_empty() {
                        println!(
                            "{} No matches for \"{}\"",
                            "Info:".blue().bold(),
                            query.yellow()
                        );
                        search = None;
                    } else {
                        render_search(&next);
                        search = Some(next);
                    }
                }
                "next" | "prev" => match search.as_mut() {
                    Some(search) => {
                        if name == "next" {
                            search.next();
                        } else {
                            search.prev();
                        }
                        render_search(search);
                    }
                    None => println!(
                        "{} No active search. Use {} first.",
                        "Info:".blue().bold(),
                        "/search <query>".cyan()
                    ),
                },
                "save" => {
                    let path = rest.trim();
                    if path.is_empty() {
                        println!("{} Usage: /save <path>", "Info:".blue().bold());
                        continue;
                    }
                    match save_transcript(path, &transcript).await {
                        Ok(()) => println!(
                            "{} Transcript saved to: {}",
                            "Success:".green().bold(),
                            path
                        ),
                        Err(e) => error!("Failed to save transcript: {}", e),
                    }
                }
                "reset" => {
                    session.reset();
                    println!(
                        "{} Session cleared. Run quill again with a new file.",
                        "Info:".blue().bold()
                    );
                    break;
                }
                _ => println!(
                    "{} Unknown command: /{}. Type {} for commands.",
                    "Info:".blue().bold(),
                    name,
                    "/help".cyan()
                ),
            }
            continue;
        }

        // A plain line is a chat turn
        let thinking = spinner("Thinking...");
        let result = session.ask(line).await;
        thinking.finish_and_clear();

        match result {
            Ok(reply) => render_reply(&reply.text),
            Err(e) => error!("{}", e),
        }
    }

    Ok(())
}

fn print_help() {
    println!();
    println!("  {}      find all matches in the transcript", "/search <query>".cyan());
    println!("  {}               jump to the next match", "/next".cyan());
    println!("  {}               jump to the previous match", "/prev".cyan());
    println!("  {}         print the transcript", "/transcript".cyan());
    println!("  {}        save the transcript as plain text", "/save <path>".cyan());
    println!("  {}              clear the session and leave", "/reset".cyan());
    println!("  {}               leave the chat", "/quit".cyan());
    println!();
}

/// Print the transcript with matches highlighted and a match counter
fn render_search(search: &TranscriptSearch) {
    println!();
    for segment in search.segments() {
        match segment {
            Segment::Plain(text) => print!("{}", text),
            Segment::Match { text, active: true } => {
                print!("{}", text.white().on_red().bold())
            }
            Segment::Match {
                text,
                active: false,
            } => print!("{}", text.black().on_yellow()),
        }
    }
    println!();
    if let Some((index, _)) = search.active() {
        println!(
            "{}",
            format!(
                "match {} of {} for \"{}\"",
                index + 1,
                search.len(),
                search.query()
            )
            .dimmed()
        );
    }
    println!();
}

/// Render an assistant reply block by block
fn render_reply(text: &str) {
    println!();
    for block in format_reply(text) {
        match block {
            Block::Heading(text) => println!("{}", text.bold().underline()),
            Block::Bullet(text) => println!("  • {}", text),
            Block::Numbered(number, text) => println!("  {}. {}", number, text),
            Block::Paragraph(text) => println!("{}", text),
        }
    }
    println!();
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message(message.to_string());
    bar
}
