use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use lexicon_core::config::Config;
use lexicon_core::core::morph::DictionaryAnalyzer;
use lexicon_core::persistence::{open_analyzer, save_dictionary};
use lexicon_core::{Command, DocumentStats, Record, Reply, Session, SessionHandle, SortKey};
use std::error::Error;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lexicon")]
#[command(about = "Wordform and lexeme frequency tables for PDF documents")]
struct Cli {
    /// Lemma dictionary: TSV source or compiled .bin cache
    #[arg(short, long, global = true)]
    dict: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print token, wordform and lexeme counts
    Stats {
        pdf: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the record table
    Table {
        pdf: PathBuf,
        #[arg(short, long)]
        sort: Option<SortKey>,
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write the record table to CSV and/or TXT
    Export {
        pdf: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        txt: Option<PathBuf>,
        #[arg(short, long)]
        sort: Option<SortKey>,
    },
    /// Compile a TSV lemma dictionary into a binary cache
    CompileDict { source: PathBuf, output: PathBuf },
    /// Interactive shell
    Shell,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if cli.dict.is_some() {
        config.dictionary_path = cli.dict.clone();
    }

    if let Cmd::CompileDict { source, output } = &cli.command {
        let dict = DictionaryAnalyzer::from_tsv_file(source)?;
        save_dictionary(&dict, output)?;
        println!("Compiled {} wordforms into '{}'", dict.len(), output.display());
        return Ok(());
    }

    let analyzer = open_analyzer(config.dictionary_path.as_deref())?;
    let mut session = Session::new(analyzer, config);

    match cli.command {
        Cmd::Stats { pdf, json } => {
            let stats = expect_loaded(session.handle(Command::Load(pdf)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats_line(&stats));
            }
        }
        Cmd::Table { pdf, sort, filter, limit } => {
            expect_loaded(session.handle(Command::Load(pdf)))?;
            if let Some(key) = sort {
                expect_rows(session.handle(Command::Sort(key)))?;
            }
            let rows = expect_rows(session.handle(Command::Filter(filter.unwrap_or_default())))?;
            print_rows(&rows, limit.unwrap_or(usize::MAX));
        }
        Cmd::Export { pdf, csv, txt, sort } => {
            if csv.is_none() && txt.is_none() {
                return Err("nothing to do: pass --csv and/or --txt".into());
            }
            let stats = expect_loaded(session.handle(Command::Load(pdf)))?;
            println!("{}", stats_line(&stats));
            if let Some(key) = sort {
                expect_rows(session.handle(Command::Sort(key)))?;
            }
            for command in [csv.map(Command::ExportCsv), txt.map(Command::ExportTxt)].into_iter().flatten() {
                match session.handle(command) {
                    Reply::Exported(path) => println!("Saved -> {}", path.display()),
                    Reply::Failed(message) => return Err(message.into()),
                    other => return Err(format!("unexpected reply: {other:?}").into()),
                }
            }
        }
        Cmd::Shell => run_shell(SessionHandle::spawn(session))?,
        Cmd::CompileDict { .. } => {}
    }
    Ok(())
}

fn expect_loaded(reply: Reply) -> Result<DocumentStats, Box<dyn Error>> {
    match reply {
        Reply::Loaded { stats, .. } => Ok(stats),
        Reply::Failed(message) => Err(message.into()),
        other => Err(format!("unexpected reply: {other:?}").into()),
    }
}

fn expect_rows(reply: Reply) -> Result<Vec<Record>, Box<dyn Error>> {
    match reply {
        Reply::Rows(rows) => Ok(rows),
        Reply::Failed(message) => Err(message.into()),
        other => Err(format!("unexpected reply: {other:?}").into()),
    }
}

fn stats_line(stats: &DocumentStats) -> String {
    format!(
        "Total words: {}, unique wordforms: {}, unique lexemes: {}",
        stats.total_tokens, stats.wordform_count, stats.lexeme_count
    )
}

fn print_rows(rows: &[Record], limit: usize) {
    println!(
        "{:<24} {:<20} {:>10} {:>10}  {}",
        "Wordform", "Lemma", "Form freq", "Lemma freq", "Morphological info"
    );
    for r in rows.iter().take(limit) {
        println!(
            "{:<24} {:<20} {:>10} {:>10}  {}",
            r.form, r.lemma, r.form_freq, r.lemma_freq, r.morph_info
        );
    }
    if rows.len() > limit {
        println!("... {} more", rows.len() - limit);
    }
}

const SHELL_PAGE: usize = 30;

fn print_banner() -> std::io::Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Lexemes and wordforms".bold());
    println!("---------------------------------------------------------------");
    println!("load <pdf> | sort <lemma|form|form_freq|lemma_freq> | filter [text]");
    println!("annotate <wordform> <text> | export-csv <path> | export-txt <path>");
    println!("show [n] | stats | help | terms | quit\n");
    Ok(())
}

fn run_shell(handle: SessionHandle) -> Result<(), Box<dyn Error>> {
    print_banner()?;
    let mut last_rows: Vec<Record> = Vec::new();

    loop {
        print!("{}", "> ".cyan());
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        let (cmd, rest) = line.split_once(' ').map_or((line, ""), |(c, r)| (c, r.trim()));

        let command = match cmd {
            "" => continue,
            "quit" | "exit" => break,
            "clear" => {
                print_banner()?;
                continue;
            }
            "show" => {
                let n = rest.parse().unwrap_or(SHELL_PAGE);
                print_rows(&last_rows, n);
                continue;
            }
            "load" => Command::Load(PathBuf::from(rest)),
            "sort" => match rest.parse::<SortKey>() {
                Ok(key) => Command::Sort(key),
                Err(e) => {
                    println!("{}", e.to_string().as_str().red());
                    continue;
                }
            },
            "filter" => Command::Filter(rest.to_string()),
            "annotate" => match rest.split_once(' ') {
                Some((form, text)) => Command::Annotate {
                    form: form.to_string(),
                    text: text.trim().to_string(),
                },
                None => Command::Annotate { form: rest.to_string(), text: String::new() },
            },
            "export-csv" => Command::ExportCsv(PathBuf::from(rest)),
            "export-txt" => Command::ExportTxt(PathBuf::from(rest)),
            "stats" => Command::Stats,
            "help" => Command::Help,
            "terms" => Command::Terminology,
            other => {
                println!("{}", format!("unknown command '{other}'").as_str().red());
                continue;
            }
        };

        let reply = handle.request(command);
        // A fresh load shows the full table in the default order.
        let refresh = matches!(reply, Reply::Loaded { .. });
        match reply {
            Reply::Loaded { stats, elapsed } => {
                println!("{}", stats_line(&stats).as_str().green());
                println!("Processed in {:.4} s", elapsed.as_secs_f64());
            }
            Reply::Rows(rows) => {
                print_rows(&rows, SHELL_PAGE);
                last_rows = rows;
            }
            Reply::Exported(path) => println!("{}", format!("Saved -> {}", path.display()).as_str().green()),
            Reply::Text(text) => println!("{text}"),
            Reply::Stats(stats) => println!("{}", stats_line(&stats)),
            Reply::Failed(message) => println!("{}", message.as_str().red()),
        }
        if refresh {
            if let Reply::Rows(rows) = handle.request(Command::Filter(String::new())) {
                print_rows(&rows, SHELL_PAGE);
                last_rows = rows;
            }
        }
    }
    Ok(())
}
