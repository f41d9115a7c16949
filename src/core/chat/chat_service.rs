use super::models::SessionState;
use super::transcript::Transcript;
use crate::core::ai::{AnswerService, CompletionProvider};
use crate::core::auth::{AuthError, SessionAuthenticator};
use crate::core::drive::{DriveClient, DriveError, DriveService};

/// Seeded into the transcript after a successful connect.
pub const GREETING_TEXT: &str =
    "I'm connected to your Google Drive. How can I help you find information in your documents today?";

/// Appended when a search comes back empty.
pub const NO_RESULTS_TEXT: &str =
    "I couldn't find any relevant documents in your Google Drive for that query.";

/// Appended on any turn failure other than a rejected API key.
pub const GENERIC_ERROR_TEXT: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// Appended when the remote service rejects the configured API key.
pub const API_KEY_ERROR_TEXT: &str =
    "The provided API Key is not valid. Please check your configuration.";

/// Text of the interim message shown while content is fetched and the answer
/// is generated.
pub fn interim_text(count: usize) -> String {
    format!("Found {count} relevant document(s). Analyzing content to generate an answer...")
}

/// Sequences one user turn: search, then concurrent content fetch, then
/// answer synthesis, with the two-phase interim/final message update.
///
/// All remote failures are caught here and rendered as ordinary model
/// messages; nothing below this boundary leaves a rejected operation
/// unhandled. One turn at a time: submissions while a turn is pending are
/// ignored, not queued.
pub struct ChatService<A, C, P>
where
    A: SessionAuthenticator,
    C: DriveClient,
    P: CompletionProvider,
{
    auth: A,
    drive: DriveService<C>,
    answers: AnswerService<P>,
    transcript: Transcript,
    session: SessionState,
}

impl<A, C, P> ChatService<A, C, P>
where
    A: SessionAuthenticator,
    C: DriveClient,
    P: CompletionProvider,
{
    pub fn new(auth: A, drive: DriveService<C>, answers: AnswerService<P>) -> Self {
        Self {
            auth,
            drive,
            answers,
            transcript: Transcript::new(),
            session: SessionState::default(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// One-time client bootstrap. `api_ready` is set on success and never
    /// reverts; on failure the session simply stays not-ready.
    pub async fn initialize(&mut self) -> Result<(), AuthError> {
        self.auth.initialize().await?;
        self.session.api_ready = true;
        Ok(())
    }

    /// Requests Drive access and seeds the greeting on first connect.
    pub async fn connect(&mut self) -> Result<(), AuthError> {
        if !self.session.api_ready {
            return Err(AuthError::NotReady);
        }
        self.auth.connect().await?;
        self.session.connected = true;
        if self.transcript.is_empty() {
            self.transcript.push_model(GREETING_TEXT);
        }
        Ok(())
    }

    /// Runs one full turn for `text`. Returns false when the submission was
    /// ignored (blank input, or another turn still in flight).
    pub async fn submit(&mut self, text: &str) -> bool {
        if self.session.pending {
            tracing::debug!("submission ignored: a turn is already in flight");
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }

        self.transcript.push_user(text);
        self.session.pending = true;
        self.run_turn(text).await;
        self.session.pending = false;
        true
    }

    async fn run_turn(&mut self, question: &str) {
        let files = match self.drive.search(question).await {
            Ok(files) => files,
            Err(err) => {
                tracing::error!(error = %err, "drive search failed");
                self.transcript.push_model(search_failure_text(&err));
                return;
            }
        };

        if files.is_empty() {
            self.transcript.push_model(NO_RESULTS_TEXT);
            return;
        }

        let interim_id = self
            .transcript
            .push_interim(interim_text(files.len()), files.clone());

        let documents = self.drive.fetch_all(files).await;

        match self.answers.synthesize(question, &documents).await {
            Ok(answer) => {
                if let Err(err) = self.transcript.resolve_interim(interim_id, answer) {
                    tracing::warn!(error = %err, "could not finalize interim message");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "answer synthesis failed");
                self.transcript.push_model(GENERIC_ERROR_TEXT);
            }
        }
    }
}

fn search_failure_text(err: &DriveError) -> &'static str {
    match err {
        DriveError::InvalidApiKey => API_KEY_ERROR_TEXT,
        _ => GENERIC_ERROR_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ai::AiConfig;
    use crate::core::chat::models::Role;
    use crate::core::drive::{DriveFile, DriveFileKind, CONTENT_UNAVAILABLE};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct StubAuth {
        fail_connect: bool,
    }

    #[async_trait]
    impl SessionAuthenticator for StubAuth {
        async fn initialize(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn connect(&self) -> Result<(), AuthError> {
            if self.fail_connect {
                Err(AuthError::TokenRequest("denied".to_string()))
            } else {
                Ok(())
            }
        }
    }

    enum SearchScript {
        Results(Vec<DriveFile>),
        InvalidApiKey,
        Failure,
    }

    struct ScriptedDrive {
        script: SearchScript,
        failing_exports: HashSet<String>,
        search_calls: AtomicUsize,
    }

    impl ScriptedDrive {
        fn returning(files: Vec<DriveFile>) -> Self {
            Self {
                script: SearchScript::Results(files),
                failing_exports: HashSet::new(),
                search_calls: AtomicUsize::new(0),
            }
        }

        fn scripted(script: SearchScript) -> Self {
            Self {
                script,
                failing_exports: HashSet::new(),
                search_calls: AtomicUsize::new(0),
            }
        }

        fn with_failing_export(mut self, id: &str) -> Self {
            self.failing_exports.insert(id.to_string());
            self
        }
    }

    #[async_trait]
    impl DriveClient for ScriptedDrive {
        async fn search_files(&self, _query: &str) -> Result<Vec<DriveFile>, DriveError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                SearchScript::Results(files) => Ok(files.clone()),
                SearchScript::InvalidApiKey => Err(DriveError::InvalidApiKey),
                SearchScript::Failure => {
                    Err(DriveError::Search("HTTP 500 from files.list".to_string()))
                }
            }
        }

        async fn export_file(&self, id: &str, kind: DriveFileKind) -> Result<String, DriveError> {
            if self.failing_exports.contains(id) {
                return Err(DriveError::Export("export denied".to_string()));
            }
            Ok(format!("content of {} ({})", id, kind.export_mime_type()))
        }
    }

    struct ScriptedModel {
        answer: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err("model unavailable".to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedModel {
        async fn generate(
            &self,
            prompt: &str,
            _config: &AiConfig,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(err) => Err(err.clone().into()),
            }
        }
    }

    type TestService = ChatService<StubAuth, Arc<ScriptedDrive>, Arc<ScriptedModel>>;

    fn service(
        drive: Arc<ScriptedDrive>,
        model: Arc<ScriptedModel>,
    ) -> TestService {
        ChatService::new(
            StubAuth { fail_connect: false },
            DriveService::new(drive),
            AnswerService::new(model, AiConfig::default()),
        )
    }

    fn budget_files() -> Vec<DriveFile> {
        vec![
            DriveFile::new("f1", "Q1 Budget", DriveFileKind::Document)
                .with_web_view_link("https://drive.example/f1"),
            DriveFile::new("f2", "Forecast", DriveFileKind::Spreadsheet)
                .with_web_view_link("https://drive.example/f2"),
        ]
    }

    #[tokio::test]
    async fn test_connect_requires_initialize_and_seeds_greeting() {
        let drive = Arc::new(ScriptedDrive::returning(vec![]));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = service(drive, model);

        assert!(matches!(chat.connect().await, Err(AuthError::NotReady)));

        chat.initialize().await.unwrap();
        assert!(chat.session().api_ready);

        chat.connect().await.unwrap();
        assert!(chat.session().connected);
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript().messages()[0].text, GREETING_TEXT);
        assert_eq!(chat.transcript().messages()[0].role, Role::Model);
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_session_disconnected() {
        let drive = Arc::new(ScriptedDrive::returning(vec![]));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = ChatService::new(
            StubAuth { fail_connect: true },
            DriveService::new(drive),
            AnswerService::new(model, AiConfig::default()),
        );
        chat.initialize().await.unwrap();

        assert!(chat.connect().await.is_err());
        assert!(!chat.session().connected);
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_zero_results_appends_fixed_message_and_skips_synthesis() {
        let drive = Arc::new(ScriptedDrive::returning(vec![]));
        let model = Arc::new(ScriptedModel::answering("never used"));
        let mut chat = service(drive.clone(), model.clone());

        assert!(chat.submit("anything relevant?").await);

        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].text, NO_RESULTS_TEXT);
        assert!(messages[1].sources.is_empty());
        assert_eq!(model.calls(), 0);
        assert!(!chat.session().pending);
    }

    #[tokio::test]
    async fn test_budget_scenario_interim_replaced_with_answer() {
        let drive = Arc::new(ScriptedDrive::returning(budget_files()));
        let model = Arc::new(ScriptedModel::answering("The Q1 budget is $50,000."));
        let mut chat = service(drive, model.clone());

        chat.submit("budget").await;

        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 2);

        let answer = &messages[1];
        assert_eq!(answer.role, Role::Model);
        assert_eq!(answer.text, "The Q1 budget is $50,000.");
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].name, "Q1 Budget");
        assert_eq!(answer.sources[1].name, "Forecast");
        // Sources still carry no content: the fetched copies only exist for
        // the synthesis call.
        assert!(answer.sources.iter().all(|s| s.content.is_none()));

        // The model saw both documents, exported per kind.
        let prompt = model.last_prompt();
        assert!(prompt.contains("content of f1 (text/plain)"));
        assert!(prompt.contains("content of f2 (text/csv)"));
        assert!(prompt.contains("Question: \"budget\""));
    }

    #[tokio::test]
    async fn test_interim_id_and_sources_survive_finalization() {
        let drive = Arc::new(ScriptedDrive::returning(budget_files()));
        let model = Arc::new(ScriptedModel::answering("done"));
        let mut chat = service(drive, model);

        chat.submit("budget").await;

        let interim = &chat.transcript().messages()[1];
        let expected_id = chat.transcript().messages()[0].id.0 + 1;
        assert_eq!(interim.id.0, expected_id);
        assert_eq!(
            interim.sources.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["f1", "f2"]
        );
    }

    #[tokio::test]
    async fn test_failed_export_still_reaches_synthesis_as_sentinel() {
        let drive =
            Arc::new(ScriptedDrive::returning(budget_files()).with_failing_export("f2"));
        let model = Arc::new(ScriptedModel::answering("partial answer"));
        let mut chat = service(drive, model.clone());

        chat.submit("budget").await;

        assert_eq!(model.calls(), 1);
        let prompt = model.last_prompt();
        assert!(prompt.contains("Document: \"Q1 Budget\""));
        assert!(prompt.contains("Document: \"Forecast\""));
        assert!(prompt.contains(CONTENT_UNAVAILABLE));
        assert_eq!(chat.transcript().messages()[1].text, "partial answer");
    }

    #[tokio::test]
    async fn test_submission_while_pending_is_a_no_op() {
        let drive = Arc::new(ScriptedDrive::returning(vec![]));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = service(drive.clone(), model);

        chat.session.pending = true;
        assert!(!chat.submit("second question").await);

        assert!(chat.transcript().is_empty());
        assert_eq!(drive.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let drive = Arc::new(ScriptedDrive::returning(vec![]));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = service(drive.clone(), model);

        assert!(!chat.submit("   ").await);
        assert!(chat.transcript().is_empty());
        assert_eq!(drive.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_api_key_surfaces_configuration_error_text() {
        let drive = Arc::new(ScriptedDrive::scripted(SearchScript::InvalidApiKey));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = service(drive, model.clone());

        chat.submit("budget").await;

        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, API_KEY_ERROR_TEXT);
        assert_eq!(model.calls(), 0);
        assert!(!chat.session().pending);
    }

    #[tokio::test]
    async fn test_other_search_failures_surface_generic_error_text() {
        let drive = Arc::new(ScriptedDrive::scripted(SearchScript::Failure));
        let model = Arc::new(ScriptedModel::answering("n/a"));
        let mut chat = service(drive, model);

        chat.submit("budget").await;

        assert_eq!(chat.transcript().messages()[1].text, GENERIC_ERROR_TEXT);
        assert!(!chat.session().pending);
    }

    #[tokio::test]
    async fn test_synthesis_failure_appends_new_error_message() {
        let drive = Arc::new(ScriptedDrive::returning(budget_files()));
        let model = Arc::new(ScriptedModel::failing());
        let mut chat = service(drive, model);

        chat.submit("budget").await;

        let messages = chat.transcript().messages();
        // user + interim (left as-is) + error message
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, interim_text(2));
        assert_eq!(messages[1].sources.len(), 2);
        assert_eq!(messages[2].text, GENERIC_ERROR_TEXT);
        assert!(messages[2].sources.is_empty());
        assert!(!chat.session().pending);
    }
}
