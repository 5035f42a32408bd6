//! Turning selections into ghost regions
//!
//! A new selection is fused with every existing region it touches so that a
//! run of adjacent placeholders behaves like one. Adjacency is measured in
//! live document coordinates: a region is a left neighbor when it is anchored
//! at the selection start (or at the end of the previous line when the
//! selection starts a line), and a right neighbor when it is anchored at the
//! selection end (or at the start of the next line when the selection ends a
//! line). Regions anchored strictly inside the selection are absorbed at their
//! offsets.

use tracing::{debug, info, warn};

use super::region::GhostRegion;
use super::store::GhostRegionStore;
use crate::host::EditorHost;
use crate::position::char_len;
use crate::types::{Position, Range, RegionId, Selection, TextEdit};

/// What a placeholderize call did to the document and the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderOutcome {
    /// The region now covering the selection
    pub region: RegionId,
    /// Regions fused into it, in document order
    pub merged_from: Vec<RegionId>,
    /// The deletion applied to the document
    pub edit: TextEdit,
}

struct Neighbor {
    id: RegionId,
    /// Line break between the neighbor and the selection
    joins_line: bool,
    boundary: Position,
}

pub struct GhostMergeResolver;

impl GhostMergeResolver {
    /// Remove the selected text and keep it as a ghost region
    ///
    /// Returns `None` when nothing was done: an empty range, or blank text
    /// with no region to fuse into.
    pub fn placeholderize<H: EditorHost + ?Sized>(
        store: &mut GhostRegionStore,
        selection: &Selection,
        host: &mut H,
    ) -> Option<PlaceholderOutcome> {
        let range = selection.range;
        if range.is_empty() {
            return None;
        }

        let text = host.text_in_range(range);
        if text != selection.text {
            warn!(
                "Selection text at {}..{} is out of date, using document text",
                range.start, range.end
            );
        }

        let left = Self::left_neighbor(store, range, host);
        let right = Self::right_neighbor(store, range, host);
        let inside = store.anchored_inside(range);

        if text.trim().is_empty() && left.is_none() && right.is_none() && inside.is_empty() {
            debug!("Blank selection with no adjacent ghost region ignored");
            return None;
        }

        let mut merged_from = Vec::new();
        let mut merged = String::new();
        let delete_start = left.as_ref().map_or(range.start, |n| n.boundary);
        let delete_end = right.as_ref().map_or(range.end, |n| n.boundary);

        if let Some(neighbor) = &left {
            if let Some(region) = Self::detach(store, neighbor.id, host) {
                merged.push_str(&region.original_text);
                if neighbor.joins_line {
                    merged.push('\n');
                }
                merged_from.push(neighbor.id);
            }
        }

        merged.push_str(&Self::absorb_inside(
            store,
            &text,
            range.start,
            &inside,
            host,
            &mut merged_from,
        ));

        if let Some(neighbor) = &right {
            if let Some(region) = Self::detach(store, neighbor.id, host) {
                if neighbor.joins_line {
                    merged.push('\n');
                }
                merged.push_str(&region.original_text);
                merged_from.push(neighbor.id);
            }
        }

        let edit = TextEdit::delete(Range::new(delete_start, delete_end));
        host.apply_edits(std::slice::from_ref(&edit));
        store.track_edit(&edit);

        let region = store.create(&merged, delete_start, host)?;
        host.set_cursor(delete_start);

        if merged_from.is_empty() {
            debug!("Placeholderized {}..{} as {}", range.start, range.end, region);
        } else {
            info!(
                "Merged {} ghost regions with selection into {}",
                merged_from.len(),
                region
            );
        }

        Some(PlaceholderOutcome {
            region,
            merged_from,
            edit,
        })
    }

    fn left_neighbor<H: EditorHost + ?Sized>(
        store: &GhostRegionStore,
        range: Range,
        host: &H,
    ) -> Option<Neighbor> {
        if let Some(id) = store.region_anchored_at(range.start) {
            return Some(Neighbor {
                id,
                joins_line: false,
                boundary: range.start,
            });
        }
        if range.start.column != 1 || range.start.line <= 1 {
            return None;
        }
        let previous = range.start.line - 1;
        let line_end = Position::new(previous, host.line_end_column(previous));
        store.region_anchored_at(line_end).map(|id| Neighbor {
            id,
            joins_line: true,
            boundary: line_end,
        })
    }

    fn right_neighbor<H: EditorHost + ?Sized>(
        store: &GhostRegionStore,
        range: Range,
        host: &H,
    ) -> Option<Neighbor> {
        if let Some(id) = store.region_anchored_at(range.end) {
            return Some(Neighbor {
                id,
                joins_line: false,
                boundary: range.end,
            });
        }
        let line = range.end.line;
        if range.end.column != host.line_end_column(line) || line >= host.line_count() {
            return None;
        }
        let next_start = Position::new(line + 1, 1);
        store.region_anchored_at(next_start).map(|id| Neighbor {
            id,
            joins_line: true,
            boundary: next_start,
        })
    }

    /// Splice the text of regions anchored inside the selection into it
    fn absorb_inside<H: EditorHost + ?Sized>(
        store: &mut GhostRegionStore,
        text: &str,
        start: Position,
        inside: &[RegionId],
        host: &mut H,
        merged_from: &mut Vec<RegionId>,
    ) -> String {
        if inside.is_empty() {
            return text.to_string();
        }

        let mut pieces = Vec::with_capacity(inside.len());
        for id in inside {
            let Some(region) = Self::detach(store, *id, host) else {
                continue;
            };
            let prefix = host.text_in_range(Range::new(start, region.original_position));
            pieces.push((char_len(&prefix) as usize, region.original_text));
            merged_from.push(*id);
        }

        let mut result = String::with_capacity(text.len());
        let mut chars = text.chars();
        let mut consumed = 0;
        for (offset, region_text) in pieces {
            result.extend(chars.by_ref().take(offset.saturating_sub(consumed)));
            consumed = consumed.max(offset);
            result.push_str(&region_text);
        }
        result.extend(chars);
        result
    }

    fn detach<H: EditorHost + ?Sized>(
        store: &mut GhostRegionStore,
        id: RegionId,
        host: &mut H,
    ) -> Option<GhostRegion> {
        let mut region = store.take(id)?;
        region.provider_handle.release(host);
        Some(region)
    }
}
