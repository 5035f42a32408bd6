/// Ghostpad Completion
///
/// Ghost regions and filtered AI inline completion for a host code editor.
///
/// # Architecture
///
/// The subsystem sits between a host editing widget and a remote
/// chat-completion endpoint:
///
/// 1. **Ghost layer**: selected text is removed and kept as an invisible,
///    position-tracked template that the user retypes to restore
/// 2. **Position layer**: every document edit re-bases stored anchors
/// 3. **Bridge layer**: one completion-provider contract serves the remaining
///    ghost text first and AI suggestions otherwise
/// 4. **AI layer**: request budget, endpoint fetch with cancellation, an
///    ordered anti-repetition filter and a delayed retry on rejection
///
/// # Core Components
///
/// ## GhostRegionStore
/// Sole owner of live regions and their provider handles. See
/// [`GhostRegionStore`] and [`GhostMergeResolver`].
///
/// ## InlineSuggestionBridge
/// Answers completion requests. See [`InlineSuggestionBridge`].
///
/// ## CompletionRequestThrottler
/// At most six requests per ten-second window. See
/// [`CompletionRequestThrottler`].
///
/// ## CompletionFilterPipeline
/// Seven rules in fixed order. See [`CompletionFilterPipeline`] and
/// [`FilterRule`].
///
/// ## EditorSession
/// Per-editor owner of all of the above plus timers. See [`EditorSession`].
///
/// # Threading
///
/// All state lives in the session and is mutated on the host thread. Timers
/// post [`SessionEvent`]s to a channel the host drains; only the endpoint
/// call is asynchronous.
///
/// # Example: Ghost Regions
///
/// ```ignore
/// use ghostpad_completion::*;
///
/// let mut editor = MemoryEditor::new("let x = compute();", "rust");
/// let (mut session, mut events) = EditorSession::with_client(CompletionConfig::default(), None);
///
/// let range = Range::new(Position::new(1, 9), Position::new(1, 18));
/// session.placeholderize(&Selection::new(range, "compute()"), &mut editor)?;
/// assert_eq!(editor.text(), "let x = ;");
///
/// let edit = editor.type_text("compute()");
/// session.on_content_changed(&[edit], &mut editor);
/// assert!(session.store().is_empty());
/// session.process_events(&mut events, &mut editor);
/// ```
///
/// # Example: AI Completion
///
/// ```ignore
/// use ghostpad_completion::*;
/// use tokio_util::sync::CancellationToken;
///
/// let config = ConfigLoader::load_with_hierarchy(std::path::Path::new("."))?;
/// let (mut session, _events) = EditorSession::new(config)?;
/// let completions = session
///     .provide_inline_completions(&editor, editor.cursor(), &CancellationToken::new())
///     .await;
/// ```
pub mod acceptance;
pub mod ai;
pub mod bridge;
pub mod buffer;
pub mod config;
pub mod error;
pub mod filter;
pub mod ghost;
pub mod host;
pub mod language;
pub mod logging;
pub mod position;
pub mod prompt;
pub mod retry;
pub mod scheduler;
pub mod session;
pub mod throttle;
pub mod types;

// Re-export public types and traits
pub use acceptance::{AcceptMode, Acceptance, AcceptanceState, PendingAcceptance, PendingSuggestion};
pub use ai::{AiCompletionService, AiSuggestion, CompletionOutcome};
pub use bridge::{BridgeResponse, InlineSuggestionBridge};
pub use buffer::MemoryEditor;
pub use config::{
    CompletionConfig, ConfigFormat, ConfigLoader, RequestSettings, RetrySettings,
    ThrottleSettings, TimingSettings,
};
pub use error::{CompletionError, CompletionResult};
pub use filter::{CompletionFilterPipeline, FilterRule, Rejection, SuggestionContext};
pub use ghost::{
    AcceptLineOutcome, GhostMatch, GhostMergeResolver, GhostRegion, GhostRegionStore,
    PlaceholderOutcome,
};
pub use host::{DocumentView, EditorHost, ProviderHandle};
pub use language::{CommentSyntax, Language};
pub use position::PositionTracker;
pub use prompt::{PromptBuilder, PromptContext};
pub use retry::{RetrySlot, RetrySuggestion};
pub use scheduler::{event_channel, Debouncer, EventReceiver, EventSender, ScheduledTask, SessionEvent};
pub use session::EditorSession;
pub use throttle::{CompletionRequestThrottler, RequestBudget};
pub use types::*;

// Re-export endpoint settings
pub use ghostpad_providers::{AiSettings, ChatClient, ProxySettings};
