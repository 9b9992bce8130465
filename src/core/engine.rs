use crate::config::Config;
use crate::core::aggregator::aggregate;
use crate::core::extractor::extract_words;
use crate::core::morph::MorphAnalyzer;
use crate::core::store::RecordStore;
use crate::core::types::{DocumentStats, Record, SortKey};
use crate::error::Result;
use crate::export::{export_csv, export_txt};
use crate::resources::{help_text, terminology_text};
use crate::timer::Stopwatch;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info};

/// Requests the presentation layer can make of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(PathBuf),
    Sort(SortKey),
    Filter(String),
    Annotate { form: String, text: String },
    ExportCsv(PathBuf),
    ExportTxt(PathBuf),
    Help,
    Terminology,
    Stats,
}

/// Owned answers. Nothing here borrows from the record store.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Loaded { stats: DocumentStats, elapsed: Duration },
    Rows(Vec<Record>),
    Exported(PathBuf),
    Text(String),
    Stats(DocumentStats),
    Failed(String),
}

/// Sole owner of the record store. Every mutation goes through [`Session::handle`].
pub struct Session {
    store: RecordStore,
    analyzer: Box<dyn MorphAnalyzer + Send>,
    config: Config,
    query: String,
}

impl Session {
    pub fn new(analyzer: Box<dyn MorphAnalyzer + Send>, config: Config) -> Self {
        Self {
            store: RecordStore::new(),
            analyzer,
            config,
            query: String::new(),
        }
    }

    /// Runs one command to completion. Failures come back as
    /// [`Reply::Failed`] rather than errors.
    pub fn handle(&mut self, command: Command) -> Reply {
        match self.dispatch(command) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "command failed");
                Reply::Failed(e.to_string())
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Load(path) => self.load(&path),
            Command::Sort(key) => {
                self.store.sort(key);
                Ok(self.view())
            }
            Command::Filter(query) => {
                self.query = query;
                Ok(self.view())
            }
            Command::Annotate { form, text } => {
                self.store.update_annotation(&form, &text)?;
                Ok(self.view())
            }
            Command::ExportCsv(path) => {
                export_csv(self.store.records(), &path)?;
                Ok(Reply::Exported(path))
            }
            Command::ExportTxt(path) => {
                export_txt(self.store.records(), &path)?;
                Ok(Reply::Exported(path))
            }
            Command::Help => Ok(Reply::Text(help_text(&self.config.help_path))),
            Command::Terminology => Ok(Reply::Text(terminology_text(&self.config.terminology_path))),
            Command::Stats => Ok(Reply::Stats(self.store.stats())),
        }
    }

    /// Extracts and aggregates before touching the store, so a failed load
    /// keeps the previous document.
    fn load(&mut self, path: &Path) -> Result<Reply> {
        let watch = Stopwatch::start("load");
        let words = extract_words(path)?;
        let aggregation = aggregate(&words, &*self.analyzer);
        self.store.replace(aggregation);
        self.store.sort(self.config.default_sort);
        let elapsed = watch.stop();

        let stats = self.store.stats();
        info!(
            path = %path.display(),
            total_tokens = stats.total_tokens,
            wordforms = stats.wordform_count,
            lexemes = stats.lexeme_count,
            "document loaded"
        );
        Ok(Reply::Loaded { stats, elapsed })
    }

    /// Records matching the last filter query, in store order.
    fn view(&self) -> Reply {
        Reply::Rows(self.store.filter(&self.query))
    }

    /// Replaces the store with already-tokenized input. Used where the
    /// words come from somewhere other than a PDF.
    pub fn load_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> DocumentStats {
        self.store.replace(aggregate(tokens, &*self.analyzer));
        self.store.sort(self.config.default_sort);
        self.store.stats()
    }
}

/// A session running on its own thread, reached only through channels.
pub struct SessionHandle {
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    worker: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn spawn(mut session: Session) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<Command>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let worker = thread::spawn(move || {
            for command in command_rx {
                if reply_tx.send(session.handle(command)).is_err() {
                    break;
                }
            }
        });

        Self {
            commands: command_tx,
            replies: reply_rx,
            worker: Some(worker),
        }
    }

    /// Sends a command and waits for its reply.
    pub fn request(&self, command: Command) -> Reply {
        if self.commands.send(command).is_err() {
            return Reply::Failed("session worker has stopped".to_string());
        }
        self.replies
            .recv()
            .unwrap_or_else(|_| Reply::Failed("session worker has stopped".to_string()))
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        // Closing the command channel ends the worker loop.
        let (closed, _) = mpsc::channel();
        self.commands = closed;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morph::DictionaryAnalyzer;

    fn session() -> Session {
        let dict = DictionaryAnalyzer::parse_tsv("кота\tкот\nсобаки\tсобака\n").unwrap();
        let config = Config {
            help_path: PathBuf::from("/no/such/help.txt"),
            ..Config::default()
        };
        Session::new(Box::new(dict), config)
    }

    fn forms(reply: Reply) -> Vec<String> {
        match reply {
            Reply::Rows(rows) => rows.into_iter().map(|r| r.form).collect(),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_tokens_are_sorted_by_lemma_after_load() {
        let mut s = session();
        let stats = s.load_tokens(&["собаки", "кота", "кот", "собака", "кот"]);
        assert_eq!(stats, DocumentStats { total_tokens: 5, wordform_count: 4, lexeme_count: 2 });
        assert_eq!(forms(s.handle(Command::Filter(String::new()))), vec!["кот", "кота", "собака", "собаки"]);
    }

    #[test]
    fn test_sort_keeps_current_filter() {
        let mut s = session();
        s.load_tokens(&["собаки", "кота", "кот", "собака", "кот"]);
        s.handle(Command::Filter("КОТ".into()));
        assert_eq!(forms(s.handle(Command::Sort(SortKey::FormFreq))), vec!["кот", "кота"]);
        assert_eq!(forms(s.handle(Command::Filter(String::new()))).len(), 4);
    }

    #[test]
    fn test_annotate_unknown_form_fails_without_change() {
        let mut s = session();
        s.load_tokens(&["кот"]);
        let reply = s.handle(Command::Annotate { form: "слон".into(), text: "x".into() });
        assert!(matches!(reply, Reply::Failed(ref m) if m.contains("слон")));

        match s.handle(Command::Annotate { form: "кот".into(), text: "сущ.".into() }) {
            Reply::Rows(rows) => assert_eq!(rows[0].morph_info, "сущ."),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_document() {
        let mut s = session();
        s.load_tokens(&["кот", "кота"]);
        let reply = s.handle(Command::Load(PathBuf::from("/no/such/file.pdf")));
        assert!(matches!(reply, Reply::Failed(_)));
        assert_eq!(s.handle(Command::Stats), Reply::Stats(DocumentStats {
            total_tokens: 2,
            wordform_count: 2,
            lexeme_count: 1,
        }));
    }

    #[test]
    fn test_export_before_load_is_reported() {
        let mut s = session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert!(matches!(s.handle(Command::ExportCsv(path.clone())), Reply::Failed(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_help_degrades_to_text() {
        let mut s = session();
        assert_eq!(s.handle(Command::Help), Reply::Text("File help.txt not found.".into()));
    }

    #[test]
    fn test_handle_round_trips_through_worker() {
        let mut s = session();
        s.load_tokens(&["кот", "кота", "кот"]);
        let handle = SessionHandle::spawn(s);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        assert_eq!(handle.request(Command::ExportTxt(path.clone())), Reply::Exported(path.clone()));
        assert!(path.exists());
        assert_eq!(forms(handle.request(Command::Sort(SortKey::Form))), vec!["кот", "кота"]);
        drop(handle);
    }
}
