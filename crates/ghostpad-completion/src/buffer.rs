//! Rope-backed in-memory host
//!
//! `MemoryEditor` implements [`EditorHost`] over a [`ropey::Rope`] so the
//! completion subsystem can run headless (tests, benchmarks, scripted
//! sessions). It records provider registrations, notices and suggestion
//! triggers for inspection.

use ropey::Rope;
use std::collections::BTreeSet;

use crate::host::{DocumentView, EditorHost};
use crate::types::{Notice, Position, ProviderId, Range, TextEdit};

pub struct MemoryEditor {
    rope: Rope,
    language_id: String,
    version: u64,
    cursor: Position,
    next_provider: u64,
    active_providers: BTreeSet<ProviderId>,
    disposed_providers: Vec<ProviderId>,
    notices: Vec<Notice>,
    suggest_triggers: usize,
}

impl MemoryEditor {
    pub fn new(text: &str, language_id: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            language_id: language_id.to_string(),
            version: 1,
            cursor: Position::new(1, 1),
            next_provider: 1,
            active_providers: BTreeSet::new(),
            disposed_providers: Vec::new(),
            notices: Vec::new(),
            suggest_triggers: 0,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char offset of a position, clamped to the document
    pub fn offset_of(&self, position: Position) -> usize {
        let line_idx = (position.line.max(1) - 1) as usize;
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(line_idx);
        let line_len = self.line_len(line_idx);
        let col = (position.column.max(1) - 1) as usize;
        line_start + col.min(line_len)
    }

    /// Position of a char offset, clamped to the document
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        let col = offset - self.rope.line_to_char(line_idx);
        Position::new(line_idx as u32 + 1, col as u32 + 1)
    }

    /// Insert text at the cursor like a keystroke and return the edit
    pub fn type_text(&mut self, text: &str) -> TextEdit {
        let edit = TextEdit::insert(self.cursor, text);
        self.apply_edits(std::slice::from_ref(&edit));
        edit
    }

    /// Replace a range like a user edit and return the edit
    pub fn replace(&mut self, range: Range, text: &str) -> TextEdit {
        let edit = TextEdit::new(range, text);
        self.apply_edits(std::slice::from_ref(&edit));
        edit
    }

    pub fn replace_document(&mut self, text: &str, language_id: &str) {
        self.rope = Rope::from_str(text);
        self.language_id = language_id.to_string();
        self.version += 1;
        self.cursor = Position::new(1, 1);
    }

    pub fn active_providers(&self) -> &BTreeSet<ProviderId> {
        &self.active_providers
    }

    pub fn disposed_providers(&self) -> &[ProviderId] {
        &self.disposed_providers
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn suggest_triggers(&self) -> usize {
        self.suggest_triggers
    }

    fn line_len(&self, line_idx: usize) -> usize {
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                len - 2
            } else {
                len - 1
            }
        } else {
            len
        }
    }
}

impl DocumentView for MemoryEditor {
    fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }

    fn line_content(&self, line: u32) -> Option<String> {
        if line == 0 || line as usize > self.rope.len_lines() {
            return None;
        }
        let idx = (line - 1) as usize;
        let start = self.rope.line_to_char(idx);
        Some(self.rope.slice(start..start + self.line_len(idx)).to_string())
    }

    fn text_in_range(&self, range: Range) -> String {
        let start = self.offset_of(range.start);
        let end = self.offset_of(range.end);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn version_id(&self) -> u64 {
        self.version
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }
}

impl EditorHost for MemoryEditor {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, position: Position) {
        self.cursor = self.position_of(self.offset_of(position));
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) {
        if edits.is_empty() {
            return;
        }
        let mut resolved: Vec<(usize, usize, &str)> = edits
            .iter()
            .map(|e| (self.offset_of(e.range.start), self.offset_of(e.range.end), e.text.as_str()))
            .collect();
        resolved.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

        let mut cursor = self.offset_of(self.cursor);
        for (start, end, text) in resolved {
            let inserted = text.chars().count();
            self.rope.remove(start..end);
            self.rope.insert(start, text);
            if cursor >= end {
                cursor = cursor + inserted - (end - start);
            } else if cursor > start {
                cursor = start + inserted;
            } else if cursor == start && start == end {
                // typing at the cursor moves it past the inserted text
                cursor = start + inserted;
            }
        }
        self.version += 1;
        self.cursor = self.position_of(cursor);
    }

    fn register_inline_provider(&mut self, _language_id: &str) -> ProviderId {
        let id = ProviderId(self.next_provider);
        self.next_provider += 1;
        self.active_providers.insert(id);
        id
    }

    fn dispose_inline_provider(&mut self, id: ProviderId) {
        self.active_providers.remove(&id);
        self.disposed_providers.push(id);
    }

    fn trigger_inline_suggest(&mut self) {
        self.suggest_triggers += 1;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
