//! Inline suggestion bridge
//!
//! Implements the host's completion-provider contract with a fixed priority:
//! 1. Remaining text of the best ghost region at the cursor
//! 2. The AI path (parked retry, then a fresh filtered request)
//!
//! A region anchored exactly at the cursor always matches in step 1, since
//! nothing has been typed yet and its whole text remains.

use tokio_util::sync::CancellationToken;

use crate::ai::{AiCompletionService, CompletionOutcome};
use crate::ghost::GhostRegionStore;
use crate::host::DocumentView;
use crate::types::{
    InlineCompletionItem, InlineCompletions, Position, Range, SuggestionMetadata, SuggestionSource,
};

/// Items returned to the host plus the AI outcome behind them, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeResponse {
    pub completions: InlineCompletions,
    pub outcome: Option<CompletionOutcome>,
}

pub struct InlineSuggestionBridge {
    ai: AiCompletionService,
}

impl InlineSuggestionBridge {
    pub fn new(ai: AiCompletionService) -> Self {
        Self { ai }
    }

    pub fn ai(&self) -> &AiCompletionService {
        &self.ai
    }

    pub fn ai_mut(&mut self) -> &mut AiCompletionService {
        &mut self.ai
    }

    /// Ghost-region suggestion at `position`, if any
    pub fn ghost_completion<D: DocumentView + ?Sized>(
        store: &GhostRegionStore,
        document: &D,
        position: Position,
    ) -> Option<InlineCompletionItem> {
        let found = store.best_match_at(position, document)?;
        let region = store.get(found.region)?;
        Some(InlineCompletionItem {
            insert_text: found.remaining,
            range: Range::empty(position),
            metadata: Some(SuggestionMetadata {
                source: SuggestionSource::Ghost {
                    region: found.region,
                    provider: region.provider_handle().id(),
                },
                version: document.version_id(),
            }),
        })
    }

    /// Answer one completion-provider request
    pub async fn provide<D: DocumentView + ?Sized>(
        &mut self,
        store: &GhostRegionStore,
        document: &D,
        position: Position,
        cancel: &CancellationToken,
    ) -> BridgeResponse {
        if let Some(item) = Self::ghost_completion(store, document, position) {
            return BridgeResponse {
                completions: InlineCompletions::single(item),
                outcome: None,
            };
        }

        let version = document.version_id();
        let outcome = self.ai.complete(document, position, cancel).await;
        let completions = match outcome.suggestion() {
            Some(suggestion) => InlineCompletions::single(InlineCompletionItem {
                insert_text: suggestion.text.clone(),
                range: Range::empty(position),
                metadata: Some(SuggestionMetadata {
                    source: suggestion.source.clone(),
                    version,
                }),
            }),
            None => InlineCompletions::empty(),
        };
        BridgeResponse {
            completions,
            outcome: Some(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryEditor;
    use crate::config::CompletionConfig;
    use crate::scheduler::event_channel;

    fn bridge() -> InlineSuggestionBridge {
        let (events, _receiver) = event_channel();
        InlineSuggestionBridge::new(AiCompletionService::with_client(
            &CompletionConfig::default(),
            None,
            events,
        ))
    }

    #[tokio::test]
    async fn test_region_anchored_at_cursor_offers_full_text() {
        let mut editor = MemoryEditor::new("let y = ;", "rust");
        let mut store = GhostRegionStore::new();
        let anchor = Position::new(1, 9);
        store.create("value", anchor, &mut editor).unwrap();

        let response = bridge()
            .provide(&store, &editor, anchor, &CancellationToken::new())
            .await;

        assert_eq!(response.completions.items[0].insert_text, "value");
        assert!(response.outcome.is_none());
    }

    #[tokio::test]
    async fn test_no_region_falls_through_to_ai() {
        let editor = MemoryEditor::new("let y = ;", "rust");
        let store = GhostRegionStore::new();

        let response = bridge()
            .provide(&store, &editor, Position::new(1, 9), &CancellationToken::new())
            .await;

        assert!(response.completions.is_empty());
        assert_eq!(response.outcome, Some(CompletionOutcome::Empty));
    }
}
