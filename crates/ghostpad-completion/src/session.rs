//! Per-editor completion session
//!
//! [`EditorSession`] owns the ghost-region store, the suggestion bridge, the
//! pending accept target and the timers of one editor instance. The host
//! forwards its events here and drains the session's event channel, passing
//! every [`SessionEvent`] back to [`EditorSession::handle_event`].

use ghostpad_providers::ChatClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::acceptance::{AcceptMode, PendingAcceptance, PendingSuggestion};
use crate::ai::AiCompletionService;
use crate::bridge::InlineSuggestionBridge;
use crate::config::CompletionConfig;
use crate::error::{CompletionError, CompletionResult};
use crate::ghost::{AcceptLineOutcome, GhostMergeResolver, GhostRegionStore, PlaceholderOutcome};
use crate::host::{DocumentView, EditorHost};
use crate::position::PositionTracker;
use crate::scheduler::{event_channel, Debouncer, EventReceiver, EventSender, SessionEvent};
use crate::types::{InlineCompletions, Notice, Position, Selection, TextEdit};

pub struct EditorSession {
    config: CompletionConfig,
    store: GhostRegionStore,
    bridge: InlineSuggestionBridge,
    acceptance: PendingAcceptance,
    queued: Vec<Selection>,
    placeholder_timer: Debouncer,
    refresh_timer: Debouncer,
    events: EventSender,
}

impl EditorSession {
    /// Create a session talking to the configured endpoint
    pub fn new(config: CompletionConfig) -> CompletionResult<(Self, EventReceiver)> {
        let (events, receiver) = event_channel();
        let ai = AiCompletionService::from_config(&config, events.clone())?;
        Ok((Self::assemble(config, ai, events), receiver))
    }

    /// Create a session around any chat client; `None` disables AI completion
    pub fn with_client(
        config: CompletionConfig,
        client: Option<Arc<dyn ChatClient>>,
    ) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel();
        let ai = AiCompletionService::with_client(&config, client, events.clone());
        (Self::assemble(config, ai, events), receiver)
    }

    fn assemble(config: CompletionConfig, ai: AiCompletionService, events: EventSender) -> Self {
        Self {
            placeholder_timer: Debouncer::new(config.timing.placeholder_debounce()),
            refresh_timer: Debouncer::new(config.timing.suggestion_refresh()),
            config,
            store: GhostRegionStore::new(),
            bridge: InlineSuggestionBridge::new(ai),
            acceptance: PendingAcceptance::new(),
            queued: Vec::new(),
            events,
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn store(&self) -> &GhostRegionStore {
        &self.store
    }

    pub fn bridge(&self) -> &InlineSuggestionBridge {
        &self.bridge
    }

    pub fn pending_suggestion(&self) -> Option<&PendingSuggestion> {
        self.acceptance.pending()
    }

    pub fn queued_selections(&self) -> usize {
        self.queued.len()
    }

    /// Track user edits, in host order, before anything queries positions
    pub fn on_content_changed<H: EditorHost + ?Sized>(&mut self, edits: &[TextEdit], host: &mut H) {
        if edits.is_empty() {
            return;
        }
        let had_regions = !self.store.is_empty();
        self.store.track_edits(edits);
        let cleared = self.store.clear_completed(host);
        if had_regions || !cleared.is_empty() {
            self.refresh_timer
                .trigger(&self.events, SessionEvent::RefreshSuggestions);
        }
    }

    /// The document was saved; ghost regions do not survive a save
    pub fn on_saved<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        debug!("Document saved, clearing ghost regions");
        self.reset(host);
    }

    /// The editor switched to another document
    pub fn on_document_replaced<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        debug!("Document replaced, clearing completion state");
        self.reset(host);
    }

    /// Tear the session down, disposing every provider registration it holds
    pub fn close<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        debug!("Closing editor session");
        self.reset(host);
    }

    fn reset<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.store.clear_all(host);
        self.queued.clear();
        self.placeholder_timer.cancel();
        self.refresh_timer.cancel();
        self.acceptance.dismiss();
        self.bridge.ai_mut().clear_retry();
    }

    /// Queue a selection; queued selections are placeholderized together
    /// once the batch window passes without another one
    pub fn queue_placeholder(&mut self, selection: Selection) {
        self.queued.push(selection);
        self.placeholder_timer
            .trigger(&self.events, SessionEvent::FlushPlaceholders);
    }

    /// Placeholderize every queued selection, last in the document first
    pub fn flush_placeholders<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Vec<PlaceholderOutcome> {
        self.placeholder_timer.cancel();
        let mut selections = std::mem::take(&mut self.queued);
        selections.sort_by(|a, b| b.range.start.cmp(&a.range.start));

        let mut outcomes = Vec::new();
        let mut lowest_start: Option<Position> = None;
        for selection in selections {
            if lowest_start.is_some_and(|start| selection.range.end > start) {
                warn!(
                    "Skipping selection {}..{} overlapping a later one",
                    selection.range.start, selection.range.end
                );
                continue;
            }
            lowest_start = Some(selection.range.start);
            match self.placeholderize(&selection, host) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(e) => warn!("Selection not placeholderized: {}", e),
            }
        }
        outcomes
    }

    /// Turn one selection into a ghost region right away
    pub fn placeholderize<H: EditorHost + ?Sized>(
        &mut self,
        selection: &Selection,
        host: &mut H,
    ) -> CompletionResult<Option<PlaceholderOutcome>> {
        validate_position(host, selection.range.start)?;
        validate_position(host, selection.range.end)?;

        let outcome = GhostMergeResolver::placeholderize(&mut self.store, selection, host);
        if outcome.is_some() {
            self.acceptance.dismiss();
            self.refresh_timer
                .trigger(&self.events, SessionEvent::RefreshSuggestions);
        }
        Ok(outcome)
    }

    /// Put every ghost region's text back
    pub fn restore_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let restored = self.store.restore_all(host);
        if restored > 0 {
            self.acceptance.dismiss();
            host.notify(Notice::RegionsRestored(restored));
        }
        restored
    }

    /// Insert the rest of the current line of the ghost region at the cursor
    pub fn accept_current_line<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> AcceptLineOutcome {
        let cursor = host.cursor();
        let outcome = self.store.accept_current_line(cursor, host);
        match &outcome {
            AcceptLineOutcome::NothingToAccept => host.notify(Notice::NothingToAccept),
            AcceptLineOutcome::LineAlreadyComplete { .. } => {
                host.notify(Notice::LineAlreadyComplete)
            }
            AcceptLineOutcome::Accepted { .. } | AcceptLineOutcome::Completed { .. } => {
                self.acceptance.dismiss();
                self.refresh_timer
                    .trigger(&self.events, SessionEvent::RefreshSuggestions);
            }
        }
        outcome
    }

    /// Apply an acceptance command to the pending suggestion
    ///
    /// Returns false when nothing was pending or the pending suggestion no
    /// longer matches the cursor and document version.
    pub fn accept_suggestion<H: EditorHost + ?Sized>(&mut self, mode: AcceptMode, host: &mut H) -> bool {
        let cursor = host.cursor();
        let Some(acceptance) = self.acceptance.accept(mode, cursor, host.version_id()) else {
            return false;
        };
        if acceptance.inserted.is_empty() {
            return false;
        }

        let edit = TextEdit::insert(cursor, acceptance.inserted);
        host.apply_edits(std::slice::from_ref(&edit));
        let end = PositionTracker::end_of_text(cursor, &edit.text);
        host.set_cursor(end);
        self.store.track_edit(&edit);
        self.store.clear_completed(host);

        match mode {
            AcceptMode::FullToLineEnd => {
                host.set_cursor(Position::new(end.line, host.line_end_column(end.line)));
            }
            AcceptMode::NextToken if !acceptance.rest.is_empty() => {
                self.acceptance.offer(PendingSuggestion {
                    text: acceptance.rest,
                    position: end,
                    version: host.version_id(),
                    source: acceptance.source,
                });
            }
            _ => {}
        }
        true
    }

    /// Completion-provider entry point
    pub async fn provide_inline_completions<D: DocumentView + ?Sized>(
        &mut self,
        document: &D,
        position: Position,
        cancel: &CancellationToken,
    ) -> InlineCompletions {
        let response = self
            .bridge
            .provide(&self.store, document, position, cancel)
            .await;

        match response.completions.items.first() {
            Some(item) => {
                if let Some(metadata) = &item.metadata {
                    self.acceptance.offer(PendingSuggestion {
                        text: item.insert_text.clone(),
                        position,
                        version: metadata.version,
                        source: metadata.source.clone(),
                    });
                }
            }
            None => self.acceptance.dismiss(),
        }
        response.completions
    }

    /// Run deferred work posted by a timer
    pub fn handle_event<H: EditorHost + ?Sized>(&mut self, event: SessionEvent, host: &mut H) {
        match event {
            SessionEvent::FlushPlaceholders => {
                let outcomes = self.flush_placeholders(host);
                debug!("Placeholder batch produced {} regions", outcomes.len());
            }
            SessionEvent::RefreshSuggestions => host.trigger_inline_suggest(),
            SessionEvent::RetryReady(suggestion) => {
                let at_cursor = suggestion.position == host.cursor();
                self.bridge.ai_mut().deliver_retry(suggestion);
                if at_cursor {
                    info!("Retry suggestion ready at cursor");
                    host.trigger_inline_suggest();
                }
            }
        }
    }

    /// Handle every event already waiting in `receiver`
    pub fn process_events<H: EditorHost + ?Sized>(
        &mut self,
        receiver: &mut EventReceiver,
        host: &mut H,
    ) -> usize {
        let mut handled = 0;
        while let Ok(event) = receiver.try_recv() {
            self.handle_event(event, host);
            handled += 1;
        }
        handled
    }
}

fn validate_position<D: DocumentView + ?Sized>(document: &D, position: Position) -> CompletionResult<()> {
    let valid = position.line >= 1
        && position.line <= document.line_count()
        && position.column >= 1
        && position.column <= document.line_end_column(position.line);
    if valid {
        Ok(())
    } else {
        Err(CompletionError::InvalidPosition {
            line: position.line,
            column: position.column,
        })
    }
}
