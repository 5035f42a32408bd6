//! Ownership of live ghost regions
//!
//! Every region and its provider handle is owned by [`GhostRegionStore`];
//! regions are created, merged and removed only through its methods.

use std::collections::BTreeMap;
use tracing::{debug, info};

use super::region::{GhostMatch, GhostRegion};
use crate::host::{DocumentView, EditorHost, ProviderHandle};
use crate::position::{char_len, count_newlines, PositionTracker};
use crate::types::{Position, Range, RegionId, TextEdit};

/// Result of accepting the current line of a ghost region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptLineOutcome {
    /// Rest of the current line inserted, more text remains
    Accepted { region: RegionId, edit: TextEdit },
    /// Rest of the current line inserted and the region is now fully typed
    Completed { region: RegionId, edit: TextEdit },
    /// The current line is already typed; only the line break remains
    LineAlreadyComplete { region: RegionId },
    /// No ghost region is relevant at the position
    NothingToAccept,
}

#[derive(Debug, Default)]
pub struct GhostRegionStore {
    regions: BTreeMap<RegionId, GhostRegion>,
    next_id: u64,
}

impl GhostRegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&GhostRegion> {
        self.regions.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GhostRegion> {
        self.regions.values()
    }

    /// Create a region at `position`; empty or whitespace-only text is ignored
    pub fn create<H: EditorHost + ?Sized>(
        &mut self,
        text: &str,
        position: Position,
        host: &mut H,
    ) -> Option<RegionId> {
        if text.trim().is_empty() {
            debug!("Ignoring ghost region with blank text at {}", position);
            return None;
        }

        self.next_id += 1;
        let id = RegionId(self.next_id);
        let language_id = host.language_id().to_string();
        let provider_handle = ProviderHandle::register(host, &language_id);

        self.regions.insert(
            id,
            GhostRegion {
                id,
                original_text: text.to_string(),
                original_position: position,
                current_position: position,
                provider_handle,
            },
        );
        info!(
            "Created {} at {} ({} chars)",
            id,
            position,
            char_len(text)
        );
        Some(id)
    }

    /// Remove a region and release its handle; missing ids are a no-op
    pub fn remove<H: EditorHost + ?Sized>(&mut self, id: RegionId, host: &mut H) -> Option<String> {
        let mut region = self.regions.remove(&id)?;
        region.provider_handle.release(host);
        debug!("Removed {}", id);
        Some(region.original_text)
    }

    /// Detach a region so it can be merged; the caller releases the handle
    pub(crate) fn take(&mut self, id: RegionId) -> Option<GhostRegion> {
        self.regions.remove(&id)
    }

    /// Keep every region in sync with one document edit
    pub fn track_edit(&mut self, edit: &TextEdit) {
        for region in self.regions.values_mut() {
            region.track_edit(edit);
        }
    }

    pub fn track_edits(&mut self, edits: &[TextEdit]) {
        for edit in edits {
            self.track_edit(edit);
        }
    }

    /// Region whose anchor is exactly at `position`
    pub fn region_anchored_at(&self, position: Position) -> Option<RegionId> {
        self.regions
            .values()
            .find(|r| r.original_position == position)
            .map(|r| r.id)
    }

    /// Best region to suggest at `position`
    ///
    /// A region is relevant when `position` is at or after its anchor and the
    /// text from the anchor to `position` is a strict prefix of its text.
    /// Regions on the cursor's line beat regions anchored on earlier lines;
    /// ties go to the larger typed fraction, then to the closest anchor.
    pub fn best_match_at<D: DocumentView + ?Sized>(
        &self,
        position: Position,
        document: &D,
    ) -> Option<GhostMatch> {
        self.regions
            .values()
            .filter_map(|region| {
                let typed = region.typed_until(document, position)?;
                let remaining = region.remaining_after(&typed)?;
                Some(GhostMatch {
                    region: region.id,
                    anchor: region.original_position,
                    remaining: remaining.to_string(),
                    typed_fraction: region.typed_fraction(&typed),
                    typed,
                    same_line: region.original_position.line == position.line,
                })
            })
            .max_by(|a, b| {
                a.same_line
                    .cmp(&b.same_line)
                    .then(a.typed_fraction.total_cmp(&b.typed_fraction))
                    .then(a.anchor.cmp(&b.anchor))
            })
    }

    /// Remove the region if the text from its anchor to the cursor equals its
    /// text exactly
    pub fn clear_if_complete<H: EditorHost + ?Sized>(&mut self, id: RegionId, host: &mut H) -> bool {
        let cursor = host.cursor();
        let complete = match self.regions.get(&id) {
            Some(region) => region
                .typed_until(host, cursor)
                .is_some_and(|typed| typed == region.original_text),
            None => false,
        };
        if complete {
            info!("{} fully retyped", id);
            self.remove(id, host);
        }
        complete
    }

    /// Check every region for completion; returns the cleared ids
    pub fn clear_completed<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Vec<RegionId> {
        let ids: Vec<RegionId> = self.regions.keys().copied().collect();
        ids.into_iter()
            .filter(|id| self.clear_if_complete(*id, host))
            .collect()
    }

    /// Dispose every handle and empty the store
    pub fn clear_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let count = self.regions.len();
        for (_, mut region) in std::mem::take(&mut self.regions) {
            region.provider_handle.release(host);
        }
        if count > 0 {
            info!("Cleared {} ghost regions", count);
        }
        count
    }

    /// Put every region's text back as one batched edit, then clear
    pub fn restore_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let edits: Vec<TextEdit> = self
            .regions
            .values()
            .map(|r| TextEdit::insert(r.current_position, r.original_text.clone()))
            .collect();
        if !edits.is_empty() {
            host.apply_edits(&edits);
        }
        self.clear_all(host)
    }

    /// Insert the untyped rest of the current output line of the best region
    pub fn accept_current_line<H: EditorHost + ?Sized>(
        &mut self,
        position: Position,
        host: &mut H,
    ) -> AcceptLineOutcome {
        let Some(found) = self.best_match_at(position, host) else {
            return AcceptLineOutcome::NothingToAccept;
        };
        let Some(region) = self.regions.get(&found.region) else {
            return AcceptLineOutcome::NothingToAccept;
        };

        let line_index = count_newlines(&found.typed) as usize;
        let Some(line_text) = region.original_text.split('\n').nth(line_index) else {
            return AcceptLineOutcome::NothingToAccept;
        };
        let typed_on_line = found.typed.rsplit('\n').next().unwrap_or_default();
        let typed_chars = typed_on_line.chars().count();
        if typed_chars >= line_text.chars().count() {
            return AcceptLineOutcome::LineAlreadyComplete {
                region: found.region,
            };
        }

        let rest: String = line_text.chars().skip(typed_chars).collect();
        let completes = format!("{}{}", found.typed, rest) == region.original_text;
        let edit = TextEdit::insert(position, rest);
        host.apply_edits(std::slice::from_ref(&edit));
        host.set_cursor(PositionTracker::end_of_text(position, &edit.text));
        self.track_edit(&edit);

        if completes {
            self.remove(found.region, host);
            AcceptLineOutcome::Completed {
                region: found.region,
                edit,
            }
        } else {
            AcceptLineOutcome::Accepted {
                region: found.region,
                edit,
            }
        }
    }

    /// Ids of regions anchored strictly inside `range`, in document order
    pub(crate) fn anchored_inside(&self, range: Range) -> Vec<RegionId> {
        let mut inside: Vec<&GhostRegion> = self
            .regions
            .values()
            .filter(|r| range.strictly_contains(r.original_position))
            .collect();
        inside.sort_by_key(|r| (r.original_position, r.id));
        inside.into_iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryEditor;

    fn setup(text: &str) -> (GhostRegionStore, MemoryEditor) {
        (GhostRegionStore::new(), MemoryEditor::new(text, "rust"))
    }

    #[test]
    fn test_create_rejects_blank_text() {
        let (mut store, mut editor) = setup("");
        assert!(store.create("", Position::new(1, 1), &mut editor).is_none());
        assert!(store.create(" \n\t", Position::new(1, 1), &mut editor).is_none());
        assert!(store.is_empty());
        assert!(editor.active_providers().is_empty());
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let (mut store, mut editor) = setup("abc");
        let a = store.create("x", Position::new(1, 1), &mut editor).unwrap();
        let b = store.create("y", Position::new(1, 3), &mut editor).unwrap();
        assert!(b > a);
        assert_eq!(editor.active_providers().len(), 2);
    }

    #[test]
    fn test_best_match_returns_remaining_text() {
        let (mut store, mut editor) = setup("let  = 1;");
        store.create("value", Position::new(1, 5), &mut editor);
        editor.set_cursor(Position::new(1, 5));
        editor.type_text("va");

        let found = store.best_match_at(Position::new(1, 7), &editor).unwrap();
        assert_eq!(found.remaining, "lue");
        assert_eq!(found.typed, "va");
        assert!(found.same_line);
    }

    #[test]
    fn test_mistyped_character_hides_match() {
        let (mut store, mut editor) = setup("");
        store.create("value", Position::new(1, 1), &mut editor);
        editor.type_text("vx");
        assert!(store.best_match_at(Position::new(1, 3), &editor).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_position_before_anchor_is_not_relevant() {
        let (mut store, mut editor) = setup("abcdef");
        store.create("zzz", Position::new(1, 4), &mut editor);
        assert!(store.best_match_at(Position::new(1, 2), &editor).is_none());
        assert!(store.best_match_at(Position::new(1, 4), &editor).is_some());
    }

    #[test]
    fn test_same_line_region_wins() {
        let (mut store, mut editor) = setup("\n\n");
        let earlier = store.create("one\ntwo", Position::new(1, 1), &mut editor).unwrap();
        let same = store.create("three", Position::new(2, 1), &mut editor).unwrap();
        editor.set_cursor(Position::new(1, 1));
        editor.type_text("one\n");

        // 2:1 is both the start of the earlier region's second line and the other anchor
        let found = store.best_match_at(Position::new(2, 1), &editor).unwrap();
        assert_eq!(found.region, same);
        assert_ne!(found.region, earlier);
    }

    #[test]
    fn test_typed_fraction_breaks_ties() {
        let (mut store, mut editor) = setup("");
        let long = store.create("abcdefgh", Position::new(1, 1), &mut editor).unwrap();
        let short = store.create("abcd", Position::new(1, 1), &mut editor).unwrap();
        editor.type_text("ab");
        let found = store.best_match_at(Position::new(1, 3), &editor).unwrap();
        assert_eq!(found.region, short);
        assert_ne!(found.region, long);
    }

    #[test]
    fn test_clear_if_complete_requires_exact_text() {
        let (mut store, mut editor) = setup("");
        let id = store.create("ok", Position::new(1, 1), &mut editor).unwrap();
        editor.type_text("o");
        assert!(!store.clear_if_complete(id, &mut editor));
        editor.type_text("k");
        assert!(store.clear_if_complete(id, &mut editor));
        assert!(store.is_empty());
        assert!(editor.active_providers().is_empty());
    }

    #[test]
    fn test_missing_region_is_noop() {
        let (mut store, mut editor) = setup("");
        let id = store.create("ok", Position::new(1, 1), &mut editor).unwrap();
        store.remove(id, &mut editor);
        assert!(store.remove(id, &mut editor).is_none());
        assert!(!store.clear_if_complete(id, &mut editor));
        assert_eq!(editor.disposed_providers().len(), 1);
    }

    #[test]
    fn test_restore_all_batches_inserts() {
        let (mut store, mut editor) = setup("a  c");
        store.create("X", Position::new(1, 2), &mut editor);
        store.create("Y", Position::new(1, 4), &mut editor);
        let version = editor.version_id();

        assert_eq!(store.restore_all(&mut editor), 2);
        assert_eq!(editor.text(), "aX  Yc");
        assert_eq!(editor.version_id(), version + 1);
        assert!(store.is_empty());
        assert_eq!(editor.disposed_providers().len(), 2);
    }

    #[test]
    fn test_clear_all_disposes_each_handle_once() {
        let (mut store, mut editor) = setup("");
        store.create("a", Position::new(1, 1), &mut editor);
        store.create("b", Position::new(1, 1), &mut editor);
        assert_eq!(store.clear_all(&mut editor), 2);
        assert_eq!(store.clear_all(&mut editor), 0);
        assert_eq!(editor.disposed_providers().len(), 2);
    }

    #[test]
    fn test_track_edit_shifts_later_regions_only() {
        let (mut store, mut editor) = setup("0123456789");
        let before = store.create("a", Position::new(1, 2), &mut editor).unwrap();
        let after = store.create("b", Position::new(1, 8), &mut editor).unwrap();
        store.track_edit(&TextEdit::insert(Position::new(1, 5), "xx"));
        assert_eq!(store.get(before).unwrap().anchor(), Position::new(1, 2));
        assert_eq!(store.get(after).unwrap().anchor(), Position::new(1, 10));
        assert_eq!(store.get(after).unwrap().current_position(), Position::new(1, 10));
    }

    #[test]
    fn test_accept_current_line_outcomes() {
        let (mut store, mut editor) = setup("");
        let id = store.create("fn a() {\n}", Position::new(1, 1), &mut editor).unwrap();
        editor.type_text("fn");

        let outcome = store.accept_current_line(Position::new(1, 3), &mut editor);
        assert!(matches!(outcome, AcceptLineOutcome::Accepted { region, .. } if region == id));
        assert_eq!(editor.text(), "fn a() {");
        assert_eq!(editor.cursor(), Position::new(1, 9));

        let again = store.accept_current_line(Position::new(1, 9), &mut editor);
        assert_eq!(again, AcceptLineOutcome::LineAlreadyComplete { region: id });

        editor.type_text("\n");
        let last = store.accept_current_line(Position::new(2, 1), &mut editor);
        assert!(matches!(last, AcceptLineOutcome::Completed { .. }));
        assert_eq!(editor.text(), "fn a() {\n}");
        assert!(store.is_empty());
    }

    #[test]
    fn test_accept_current_line_without_region() {
        let (mut store, mut editor) = setup("abc");
        assert_eq!(
            store.accept_current_line(Position::new(1, 2), &mut editor),
            AcceptLineOutcome::NothingToAccept
        );
    }
}
