//! Language-id → plugin registry, URI → `File` routing, and the command
//! table every language contributes handlers to.
//!
//! A [`File`] is whatever a language plugin parses an opened document
//! into — this crate never constructs one itself, only stores and routes
//! to it. [`Languages`] is the one process-wide instance a dispatcher
//! holds: it owns every [`Language`], and a reverse URI index so a bare
//! URI from a `didChange`/`hover`/... request can be routed without the
//! caller tracking which language opened it.

use crate::hover::Hover;
use lsp_core_diagnostics::{Fix, Problems, Semantics};
use lsp_core_point::{Point, Range};
use lsp_core_uri::DocumentUri;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::io;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone)]
pub enum RegistryError {
    #[error("language not found: {0}")]
    LanguageNotFound(String),
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// One open document as a language plugin sees it. Methods take `&self`
/// because implementations are expected to hold their mutable state
/// behind interior mutability, the way [`lsp_core_buffer::Document`]
/// does — a `File` is shared (`Arc`) between the registry's URI index and
/// whatever holds the result of `textDocument/didOpen`.
pub trait File: Send + Sync {
    /// The content to show for a hover at `point`, if this file has any.
    fn hover(&self, point: Point) -> Option<Hover>;
    /// Applies an incremental edit.
    fn replace(&self, text: &str, range: Range);
    /// The diagnostics currently known for this file.
    fn problems(&self) -> Problems;
    /// The URI this file was opened from.
    fn uri(&self) -> &DocumentUri;
    /// Replaces the file's entire contents, as for a full-document resync.
    fn reset(&self, text: &str);
    /// The semantic-token matrix for `textDocument/semanticTokens/full`.
    /// Plugins with no token classifier can leave this empty.
    fn semantics(&self) -> Semantics {
        Semantics::new(Vec::new())
    }
    /// Fixes on offer for `textDocument/codeAction` over `range`. The
    /// default pulls whatever [`Fix`]es are already attached to problems
    /// intersecting the range, which covers every plugin that only ever
    /// proposes quickfixes for its own diagnostics.
    fn code_actions(&self, range: Range) -> Vec<Fix> {
        self.problems().intersects(range).iter().filter_map(|p| p.fix.clone()).collect()
    }
}

/// A handler registered under a command name, invoked by
/// `workspace/executeCommand`.
pub type CommandHandler = Arc<dyn Fn(&serde_json::Value) -> Result<serde_json::Value, RegistryError> + Send + Sync>;

/// One named command a [`LanguageDef`] contributes.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub handler: CommandHandler,
}

impl Command {
    pub fn new(name: impl Into<String>, handler: CommandHandler) -> Self {
        Command { name: name.into(), handler }
    }
}

/// A language plugin: knows how to parse a document of its kind and what
/// commands it contributes to the shared table.
pub trait LanguageDef: Send + Sync {
    fn id(&self) -> &str;
    fn parse(&self, uri: DocumentUri, reader: &mut dyn io::Read) -> Result<Arc<dyn File>, RegistryError>;
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }
    /// Static completion items this language always offers, independent
    /// of any open file. `textDocument/completion` returns the union of
    /// every registered language's list.
    fn completions(&self) -> Vec<lsp_types::CompletionItem> {
        Vec::new()
    }
    /// Called once, when the plugin is registered with a [`Languages`],
    /// handing it the [`LanguageCallbacks`] it needs to look up other
    /// open files, read a schema, or push a server-to-client
    /// notification. Plugins with no cross-file or notification needs
    /// can leave this as a no-op.
    fn init(&self, callbacks: LanguageCallbacks) {
        let _ = callbacks;
    }
    /// Invoked after `textDocument/didSave` resets and republishes
    /// diagnostics for `file`. The default does nothing.
    fn on_save(&self, file: &Arc<dyn File>) {
        let _ = file;
    }
}

/// The host-provided surface a [`LanguageDef`] gets from [`LanguageDef::init`]:
/// cross-file lookup, schema retrieval, and a way to push server-to-client
/// notifications, without the plugin needing a handle to the whole
/// [`Languages`] registry or the connection it's wired to.
#[derive(Clone)]
pub struct LanguageCallbacks {
    get_file: Arc<dyn Fn(&DocumentUri) -> Option<(Arc<Language>, Arc<dyn File>)> + Send + Sync>,
    get_schema: Arc<dyn Fn(&str) -> Option<String> + Send + Sync>,
    notify: Arc<dyn Fn(&str, serde_json::Value) + Send + Sync>,
}

impl LanguageCallbacks {
    /// Looks up whichever language and file currently own `uri`, if any.
    pub fn get_file(&self, uri: &DocumentUri) -> Option<(Arc<Language>, Arc<dyn File>)> {
        (self.get_file)(uri)
    }

    /// Looks up a schema previously registered under `path` via
    /// [`Languages::register_schema`].
    pub fn get_schema(&self, path: &str) -> Option<String> {
        (self.get_schema)(path)
    }

    /// Pushes a server-to-client notification. A no-op until the
    /// dispatcher has wired a sink in with [`Languages::set_notify`].
    pub fn notify(&self, method: &str, params: serde_json::Value) {
        (self.notify)(method, params)
    }
}

struct LanguageState {
    def: Arc<dyn LanguageDef>,
    files: FxHashMap<String, Arc<dyn File>>,
}

/// One registered language plugin plus every file of that language
/// currently open.
pub struct Language {
    state: Mutex<LanguageState>,
}

impl Language {
    fn new(def: Arc<dyn LanguageDef>) -> Self {
        Language { state: Mutex::new(LanguageState { def, files: FxHashMap::default() }) }
    }

    pub fn create_file(&self, uri: DocumentUri, reader: &mut dyn io::Read) -> Result<Arc<dyn File>, RegistryError> {
        let mut state = self.state.lock();
        let file = state.def.parse(uri.clone(), reader)?;
        state.files.insert(uri.as_str().to_string(), file.clone());
        Ok(file)
    }

    pub fn get_from_uri(&self, uri: &DocumentUri) -> Option<Arc<dyn File>> {
        self.state.lock().files.get(uri.as_str()).cloned()
    }

    pub fn delete_uri(&self, uri: &DocumentUri) {
        self.state.lock().files.remove(uri.as_str());
    }

    pub fn completions(&self) -> Vec<lsp_types::CompletionItem> {
        self.state.lock().def.completions()
    }

    /// Runs this language's `OnSave` hook for `file`, if it has one. The
    /// plugin handle is cloned out from under the lock first — a hook
    /// that calls back into [`LanguageCallbacks::get_file`] for this same
    /// language would otherwise deadlock against its own file-map mutex.
    pub fn on_save(&self, file: &Arc<dyn File>) {
        let def = self.state.lock().def.clone();
        def.on_save(file);
    }
}

/// Commands contributed by every registered language, keyed by name.
#[derive(Default)]
pub struct CommandTable {
    commands: Mutex<FxHashMap<String, CommandHandler>>,
}

impl CommandTable {
    pub fn new() -> Self {
        CommandTable::default()
    }

    pub fn register(&self, name: impl Into<String>, handler: CommandHandler) {
        self.commands.lock().insert(name.into(), handler);
    }

    /// The `workspace/executeCommand` server-capability payload.
    pub fn provider(&self) -> lsp_types::ExecuteCommandOptions {
        lsp_types::ExecuteCommandOptions {
            commands: self.commands.lock().keys().cloned().collect(),
            work_done_progress_options: lsp_types::WorkDoneProgressOptions { work_done_progress: Some(true) },
        }
    }

    pub fn execute(&self, name: &str, params: &serde_json::Value) -> Result<serde_json::Value, RegistryError> {
        let handler =
            self.commands.lock().get(name).cloned().ok_or_else(|| RegistryError::CommandNotFound(name.to_string()))?;
        handler(params)
    }
}

type NotifyFn = Arc<dyn Fn(&str, serde_json::Value) + Send + Sync>;

struct Registry {
    languages: Mutex<FxHashMap<String, Arc<Language>>>,
    file_language_ids: Mutex<FxHashMap<String, String>>,
    commands: CommandTable,
    schemas: Mutex<FxHashMap<String, String>>,
    notify: Mutex<Option<NotifyFn>>,
}

/// The process-wide registry: language-id → [`Language`], and a reverse
/// URI → language-id index. Cheap to [`Clone`] — every clone shares the
/// same underlying tables, which is what lets [`LanguageCallbacks`]
/// close over a `Languages` handle without the caller needing to wrap it
/// in its own `Arc` first.
#[derive(Clone)]
pub struct Languages {
    inner: Arc<Registry>,
}

impl Languages {
    pub fn new() -> Self {
        Languages {
            inner: Arc::new(Registry {
                languages: Mutex::new(FxHashMap::default()),
                file_language_ids: Mutex::new(FxHashMap::default()),
                commands: CommandTable::new(),
                schemas: Mutex::new(FxHashMap::default()),
                notify: Mutex::new(None),
            }),
        }
    }

    /// Registers a language plugin, adding its commands to the shared
    /// table under the same lock a lookup would take, then calls its
    /// `Init` hook with this registry's [`LanguageCallbacks`].
    pub fn add_language(&self, def: Arc<dyn LanguageDef>) {
        for cmd in def.commands() {
            self.inner.commands.register(cmd.name, cmd.handler);
        }
        let id = def.id().to_string();
        def.init(self.callbacks());
        self.inner.languages.lock().insert(id, Arc::new(Language::new(def)));
    }

    /// Makes a schema available to every plugin's `Init` callbacks under
    /// `path`, for `LanguageCallbacks::get_schema` to find later.
    pub fn register_schema(&self, path: impl Into<String>, schema: impl Into<String>) {
        self.inner.schemas.lock().insert(path.into(), schema.into());
    }

    /// Wires the sink `LanguageCallbacks::notify` pushes server-to-client
    /// notifications through. The dispatcher calls this once its
    /// outbound channel exists; before that, `notify` is a no-op.
    pub fn set_notify<F>(&self, f: F)
    where
        F: Fn(&str, serde_json::Value) + Send + Sync + 'static,
    {
        *self.inner.notify.lock() = Some(Arc::new(f));
    }

    fn callbacks(&self) -> LanguageCallbacks {
        let get = self.clone();
        let schema = self.clone();
        let notify = self.clone();
        LanguageCallbacks {
            get_file: Arc::new(move |uri| get.get_from_uri(uri)),
            get_schema: Arc::new(move |path| schema.inner.schemas.lock().get(path).cloned()),
            notify: Arc::new(move |method, params| {
                if let Some(sink) = notify.inner.notify.lock().as_ref() {
                    sink(method, params);
                }
            }),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Language>> {
        self.inner.languages.lock().get(id).cloned()
    }

    pub fn create_file(
        &self,
        uri: DocumentUri,
        lang_id: &str,
        reader: &mut dyn io::Read,
    ) -> Result<Arc<dyn File>, RegistryError> {
        let lang = self
            .inner
            .languages
            .lock()
            .get(lang_id)
            .cloned()
            .ok_or_else(|| RegistryError::LanguageNotFound(lang_id.to_string()))?;
        let file = lang.create_file(uri.clone(), reader)?;
        self.inner.file_language_ids.lock().insert(uri.as_str().to_string(), lang_id.to_string());
        Ok(file)
    }

    pub fn get_from_uri(&self, uri: &DocumentUri) -> Option<(Arc<Language>, Arc<dyn File>)> {
        let lang_id = self.inner.file_language_ids.lock().get(uri.as_str()).cloned()?;
        let lang = self.inner.languages.lock().get(&lang_id).cloned()?;
        let file = lang.get_from_uri(uri)?;
        Some((lang, file))
    }

    pub fn delete_uri(&self, uri: &DocumentUri) {
        let lang_id = self.inner.file_language_ids.lock().remove(uri.as_str());
        if let Some(lang_id) = lang_id {
            if let Some(lang) = self.inner.languages.lock().get(&lang_id) {
                lang.delete_uri(uri);
            }
        }
    }

    pub fn command_provider(&self) -> lsp_types::ExecuteCommandOptions {
        self.inner.commands.provider()
    }

    /// The union of every registered language's static completion list.
    pub fn completions(&self) -> Vec<lsp_types::CompletionItem> {
        self.inner.languages.lock().values().flat_map(|lang| lang.completions()).collect()
    }

    pub fn commands_execute(&self, name: &str, params: &serde_json::Value) -> Result<serde_json::Value, RegistryError> {
        self.inner.commands.execute(name, params)
    }
}

impl Default for Languages {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use lsp_core_buffer::Document;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex as StdMutex;

    struct PlainFile {
        uri: DocumentUri,
        doc: Document,
        problems: StdMutex<Problems>,
    }

    impl File for PlainFile {
        fn hover(&self, _point: Point) -> Option<Hover> {
            None
        }
        fn replace(&self, text: &str, range: Range) {
            self.doc.replace(text, range);
        }
        fn problems(&self) -> Problems {
            self.problems.lock().expect("lock").clone()
        }
        fn uri(&self) -> &DocumentUri {
            &self.uri
        }
        fn reset(&self, text: &str) {
            self.doc.reset(text);
        }
    }

    struct PlainTextLanguage;

    impl LanguageDef for PlainTextLanguage {
        fn id(&self) -> &str {
            "plaintext"
        }

        fn parse(&self, uri: DocumentUri, reader: &mut dyn io::Read) -> Result<Arc<dyn File>, RegistryError> {
            let doc = Document::new(reader).map_err(|e| RegistryError::Parse(e.to_string()))?;
            Ok(Arc::new(PlainFile { uri, doc, problems: StdMutex::new(Problems::new()) }))
        }

        fn commands(&self) -> Vec<Command> {
            vec![Command::new("plaintext.wordCount", Arc::new(|_params| Ok(serde_json::json!(0))))]
        }
    }

    fn uri(s: &str) -> DocumentUri {
        DocumentUri::parse(s).expect("parse")
    }

    #[test]
    fn create_file_routes_through_language() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let u = uri("file:///tmp/a.txt");
        let file = languages.create_file(u.clone(), "plaintext", &mut "hello".as_bytes()).expect("create");
        assert_eq!(file.uri().as_str(), "file:///tmp/a.txt");
    }

    #[test]
    fn create_file_unknown_language_errors() {
        let languages = Languages::new();
        let u = uri("file:///tmp/a.txt");
        let err = languages.create_file(u, "nope", &mut "hello".as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::LanguageNotFound(_)));
    }

    #[test]
    fn get_from_uri_finds_language_and_file() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let u = uri("file:///tmp/a.txt");
        languages.create_file(u.clone(), "plaintext", &mut "hello".as_bytes()).expect("create");

        let (lang, file) = languages.get_from_uri(&u).expect("found");
        assert_eq!(file.uri().as_str(), u.as_str());
        assert!(lang.get_from_uri(&u).is_some());
    }

    #[test]
    fn delete_uri_removes_from_both_indexes() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let u = uri("file:///tmp/a.txt");
        languages.create_file(u.clone(), "plaintext", &mut "hello".as_bytes()).expect("create");

        languages.delete_uri(&u);
        assert!(languages.get_from_uri(&u).is_none());
    }

    #[test]
    fn command_provider_lists_registered_commands() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let provider = languages.command_provider();
        assert_eq!(provider.commands, vec!["plaintext.wordCount".to_string()]);
    }

    #[test]
    fn commands_execute_invokes_registered_handler() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let result = languages.commands_execute("plaintext.wordCount", &serde_json::json!(null)).expect("execute");
        assert_eq!(result, serde_json::json!(0));
    }

    #[test]
    fn commands_execute_unknown_command_errors() {
        let languages = Languages::new();
        let err = languages.commands_execute("nope", &serde_json::json!(null)).unwrap_err();
        assert!(matches!(err, RegistryError::CommandNotFound(_)));
    }

    #[test]
    fn replace_and_reset_mutate_through_the_file_trait() {
        let languages = Languages::new();
        languages.add_language(Arc::new(PlainTextLanguage));
        let u = uri("file:///tmp/a.txt");
        let file = languages.create_file(u, "plaintext", &mut "hello world".as_bytes()).expect("create");
        file.replace(" there", Range::new(Point::new(0, 5), Point::new(0, 5)));
        file.reset("brand new");
        // No direct text accessor on the trait; reaching this point without
        // panicking confirms both calls were routed through correctly.
        assert!(file.problems().is_empty());
    }

    struct CallbackProbingLanguage {
        seen_schema: StdMutex<Option<String>>,
    }

    impl LanguageDef for CallbackProbingLanguage {
        fn id(&self) -> &str {
            "probe"
        }

        fn parse(&self, uri: DocumentUri, reader: &mut dyn io::Read) -> Result<Arc<dyn File>, RegistryError> {
            let doc = Document::new(reader).map_err(|e| RegistryError::Parse(e.to_string()))?;
            Ok(Arc::new(PlainFile { uri, doc, problems: StdMutex::new(Problems::new()) }))
        }

        fn init(&self, callbacks: LanguageCallbacks) {
            *self.seen_schema.lock().expect("lock") = callbacks.get_schema("probe.schema.json");
        }

        fn on_save(&self, file: &Arc<dyn File>) {
            file.reset("saved by the hook");
        }
    }

    #[test]
    fn init_hands_the_plugin_a_schema_registered_before_add_language() {
        let languages = Languages::new();
        languages.register_schema("probe.schema.json", "{}");
        let lang = Arc::new(CallbackProbingLanguage { seen_schema: StdMutex::new(None) });
        languages.add_language(lang.clone());
        assert_eq!(lang.seen_schema.lock().expect("lock").as_deref(), Some("{}"));
    }

    #[test]
    fn on_save_hook_runs_through_the_language_handle() {
        let languages = Languages::new();
        languages.add_language(Arc::new(CallbackProbingLanguage { seen_schema: StdMutex::new(None) }));
        let u = uri("file:///tmp/a.txt");
        let file = languages.create_file(u.clone(), "probe", &mut "hello".as_bytes()).expect("create");
        let (lang, _) = languages.get_from_uri(&u).expect("found");
        lang.on_save(&file);
        assert!(file.problems().is_empty());
    }

    #[test]
    fn set_notify_routes_through_language_callbacks() {
        let languages = Languages::new();
        let received: Arc<StdMutex<Vec<String>>> = Arc::new(StdMutex::new(Vec::new()));
        let sink = received.clone();
        languages.set_notify(move |method, _params| sink.lock().expect("lock").push(method.to_string()));

        struct NotifyingLanguage;
        impl LanguageDef for NotifyingLanguage {
            fn id(&self) -> &str {
                "notifier"
            }
            fn parse(&self, uri: DocumentUri, reader: &mut dyn io::Read) -> Result<Arc<dyn File>, RegistryError> {
                let doc = Document::new(reader).map_err(|e| RegistryError::Parse(e.to_string()))?;
                Ok(Arc::new(PlainFile { uri, doc, problems: StdMutex::new(Problems::new()) }))
            }
            fn init(&self, callbacks: LanguageCallbacks) {
                callbacks.notify("window/logMessage", serde_json::json!({"type": 3, "message": "ready"}));
            }
        }

        languages.add_language(Arc::new(NotifyingLanguage));
        assert_eq!(*received.lock().expect("lock"), vec!["window/logMessage".to_string()]);
    }
}
