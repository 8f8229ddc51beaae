use anyhow::{Context, Result};
use clap::Parser;
use sheetsage::{
    analyze::{self, feature, group_sum},
    config::AppConfig,
    history::{export, SessionHistory},
    llm::CompletionClient,
    prompt::{self, questions, PromptPolicy},
    schema::{self, Mode},
    table::{load, Cell, Table},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Analyze an uploaded spreadsheet: schema-checked aggregations plus
/// free-form questions answered by the remote AI analyst.
#[derive(Parser, Debug)]
#[command(name = "sheetsage")]
struct Args {
    /// CSV or Excel file to analyze
    file: PathBuf,

    /// Analysis mode: report (compensation CSV) or feature (feature matrix)
    #[arg(long, default_value = "report")]
    mode: Mode,

    /// YAML config file
    #[arg(long, default_value = "sheetsage.yaml")]
    config: PathBuf,

    /// Print the predefined question catalog and exit
    #[arg(long)]
    list_questions: bool,

    /// Print every predefined chart aggregation
    #[arg(long)]
    charts: bool,

    /// Ask a question (repeatable); answers are recorded in the session history
    #[arg(long = "question", value_name = "TEXT")]
    questions: Vec<String>,

    /// Read questions interactively from stdin after the one-shot questions
    #[arg(long)]
    interactive: bool,

    /// Write the per-country feature summaries to a CSV (feature mode)
    #[arg(long, value_name = "PATH")]
    summaries_csv: Option<PathBuf>,

    /// Export the session history as CSV on exit
    #[arg(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,

    /// Export the session history as a Markdown document on exit
    #[arg(long, value_name = "PATH")]
    export_doc: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    if args.list_questions {
        print_question_catalog();
        return Ok(());
    }

    // ─── 2) config ───────────────────────────────────────────────────
    let config = AppConfig::load_or_default(&args.config);

    // ─── 3) load + validate the upload ───────────────────────────────
    let table = load::load_path(&args.file)
        .with_context(|| format!("could not load {}", args.file.display()))?;
    println!("Uploaded data preview:");
    print!("{}", prompt::render_table(&table.head(5)));

    schema::validate(&table, args.mode.required_columns())?;
    info!(mode = args.mode.label(), "file successfully uploaded and validated");

    // ─── 4) chart aggregations ───────────────────────────────────────
    if args.charts {
        match args.mode {
            Mode::Report => print_report_charts(&table)?,
            Mode::Feature => warn!("--charts applies to report mode; skipping"),
        }
    }

    let wants_completions =
        args.mode == Mode::Feature || !args.questions.is_empty() || args.interactive;
    if !wants_completions {
        if args.export_csv.is_some() || args.export_doc.is_some() {
            warn!("no questions asked this session; skipping history export");
        }
        return Ok(());
    }

    // ─── 5) completion client + session history ──────────────────────
    let client = CompletionClient::new(&config.completion)
        .context("cannot reach the analysis service")?;
    let mut history = SessionHistory::new();

    // ─── 6) per-country feature summaries ────────────────────────────
    if args.mode == Mode::Feature {
        match feature::summarize_countries(&client, &table, &config.prompt).await {
            Ok(summaries) => {
                for s in &summaries {
                    println!("\n{}:\n{}", s.country, s.summary);
                }
                if let Some(path) = &args.summaries_csv {
                    let file = std::fs::File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    feature::write_summaries_csv(&summaries, file)?;
                    info!(file = %path.display(), "wrote feature summaries");
                }
            }
            Err(e) => {
                error!("analysis service unavailable: {e}");
                println!("Analysis service unavailable; feature summaries skipped.");
            }
        }
    }

    // ─── 7) questions ────────────────────────────────────────────────
    for question in &args.questions {
        ask(&client, &table, question, &config.prompt, &mut history).await;
    }
    if args.interactive {
        run_session(&client, &table, &config.prompt, &mut history).await?;
    }

    // ─── 8) history export ───────────────────────────────────────────
    if let Some(path) = &args.export_csv {
        export::write_csv_path(&history, path)?;
    }
    if let Some(path) = &args.export_doc {
        export::write_markdown_path(&history, path)?;
    }

    Ok(())
}

/// Ask one question against the table. A successful answer is printed and
/// recorded; a service fault is surfaced and leaves the history untouched.
async fn ask(
    client: &CompletionClient,
    table: &Table,
    question: &str,
    policy: &PromptPolicy,
    history: &mut SessionHistory,
) {
    let user_prompt = prompt::build_prompt(table, question, policy);
    match client.complete(prompt::SYSTEM_PROMPT, &user_prompt).await {
        Ok(answer) => {
            println!("\nQ: {question}");
            println!("A: {answer}");
            history.record(question, answer);
        }
        Err(e) => {
            error!("analysis service unavailable: {e}");
            println!("Analysis service unavailable; please try again later.");
        }
    }
}

fn print_report_charts(table: &Table) -> Result<()> {
    for spec in analyze::REPORT_CHARTS {
        let aggregated = group_sum(table, spec.group_by, spec.value)?;
        let chart = Table::new(
            vec![spec.group_by.to_string(), spec.value.to_string()],
            aggregated
                .into_iter()
                .map(|(key, total)| vec![Cell::Text(key), Cell::Number(total)])
                .collect(),
        );
        println!("\n{}", spec.title);
        print!("{}", prompt::render_table(&chart));
    }
    Ok(())
}

fn print_question_catalog() {
    let mut n = 1;
    for category in questions::CATEGORIES {
        println!("{}", category.name);
        for question in category.questions {
            println!("  {n:>2}. {question}");
            n += 1;
        }
        println!();
    }
    println!("Ask one with `:q N` in an interactive session.");
}

/// Interactive question loop. Blank line or `:quit` ends the session.
async fn run_session(
    client: &CompletionClient,
    table: &Table,
    policy: &PromptPolicy,
    history: &mut SessionHistory,
) -> Result<()> {
    println!(
        "\nEnter a question, `:q N` for a predefined one, `:history`, \
         `:export-csv PATH`, `:export-doc PATH`, or `:quit`."
    );
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" | ":quit" => break,
            ":history" => {
                if history.is_empty() {
                    println!("No questions asked yet.");
                }
                for entry in history.recent() {
                    println!("Q: {}", entry.question);
                    println!("A: {}", entry.answer);
                }
            }
            _ => {
                if let Some(path) = line.strip_prefix(":export-csv ") {
                    if let Err(e) = export::write_csv_path(history, PathBuf::from(path.trim()).as_path()) {
                        error!("export failed: {e}");
                    }
                } else if let Some(path) = line.strip_prefix(":export-doc ") {
                    if let Err(e) =
                        export::write_markdown_path(history, PathBuf::from(path.trim()).as_path())
                    {
                        error!("export failed: {e}");
                    }
                } else if let Some(n) = line.strip_prefix(":q ") {
                    match n.trim().parse::<usize>().ok().and_then(questions::by_number) {
                        Some(question) => ask(client, table, question, policy, history).await,
                        None => println!("No such predefined question; see --list-questions."),
                    }
                } else if line.starts_with(':') {
                    println!("Unknown command `{line}`.");
                } else {
                    ask(client, table, line, policy, history).await;
                }
            }
        }
    }
    Ok(())
}
