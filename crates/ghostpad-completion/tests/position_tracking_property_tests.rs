/// Property-based tests for ghost-region anchor tracking
///
/// Property: for any sequence of edits that end at or before an anchor, the
/// tracked anchor stays on the same character as an offset-based model of
/// the document. Edits starting after the anchor never move it.
use ghostpad_completion::{
    DocumentView, EditorHost, GhostRegionStore, MemoryEditor, Position, PositionTracker, Range,
    TextEdit,
};
use proptest::prelude::*;

fn document_strategy() -> impl Strategy<Value = String> {
    "[a-z ]{0,8}(\n[a-z ]{0,8}){0,4}"
}

/// Edits are described by fractions so they can be resolved against the
/// live document
fn edits_strategy() -> impl Strategy<Value = Vec<(f64, f64, String)>> {
    prop::collection::vec((0.0f64..1.0, 0.0f64..1.0, "[a-z\n]{0,4}"), 1..8)
}

proptest! {
    #[test]
    fn prop_anchor_follows_edits_before_it(
        text in document_strategy(),
        anchor_fraction in 0.0f64..=1.0,
        edits in edits_strategy(),
    ) {
        let mut editor = MemoryEditor::new(&text, "plaintext");
        let len = text.chars().count();
        let mut anchor_offset = ((len as f64) * anchor_fraction) as usize;
        let anchor = editor.position_of(anchor_offset);

        let mut store = GhostRegionStore::new();
        let id = store.create("ghost", anchor, &mut editor).unwrap();

        for (a, b, inserted) in edits {
            if anchor_offset == 0 {
                break;
            }
            let start = ((anchor_offset as f64) * a) as usize;
            let start = start.min(anchor_offset - 1);
            let end = start + (((anchor_offset - start) as f64) * b) as usize;
            let end = end.clamp(start, anchor_offset);

            let range = Range::new(editor.position_of(start), editor.position_of(end));
            let edit = editor.replace(range, &inserted);
            store.track_edit(&edit);

            anchor_offset = anchor_offset - (end - start) + inserted.chars().count();
            prop_assert_eq!(
                store.get(id).unwrap().anchor(),
                editor.position_of(anchor_offset)
            );
        }
    }

    #[test]
    fn prop_edits_after_anchor_do_not_move_it(
        text in document_strategy(),
        anchor_fraction in 0.0f64..1.0,
        edits in edits_strategy(),
    ) {
        let mut editor = MemoryEditor::new(&text, "plaintext");
        let len = text.chars().count();
        let anchor_offset = ((len as f64) * anchor_fraction) as usize;
        let anchor = editor.position_of(anchor_offset);

        for (a, b, inserted) in edits {
            let total = editor.text().chars().count();
            if total <= anchor_offset {
                break;
            }
            let start = anchor_offset + 1 + (((total - anchor_offset - 1) as f64) * a) as usize;
            let start = start.min(total);
            let end = start + (((total - start) as f64) * b) as usize;

            let edit = TextEdit::new(
                Range::new(editor.position_of(start), editor.position_of(end)),
                inserted.clone(),
            );
            prop_assert_eq!(PositionTracker::adjust(anchor, &edit), anchor);
            editor.apply_edits(std::slice::from_ref(&edit));
        }
    }

    #[test]
    fn prop_typing_at_anchor_keeps_it(
        text in document_strategy(),
        anchor_fraction in 0.0f64..=1.0,
        typed in "[a-z][a-z\n]{0,11}",
    ) {
        let mut editor = MemoryEditor::new(&text, "plaintext");
        let len = text.chars().count();
        let anchor = editor.position_of(((len as f64) * anchor_fraction) as usize);

        let mut store = GhostRegionStore::new();
        let id = store.create(&typed, anchor, &mut editor).unwrap();
        editor.set_cursor(anchor);

        let mut retyped = String::new();
        for ch in typed.chars() {
            retyped.push(ch);
            let edit = editor.type_text(&ch.to_string());
            store.track_edit(&edit);
            prop_assert_eq!(store.get(id).unwrap().anchor(), anchor);
            let end = PositionTracker::end_of_text(anchor, &retyped);
            prop_assert_eq!(editor.text_in_range(Range::new(anchor, end)), retyped.clone());
        }
        prop_assert_eq!(editor.cursor(), PositionTracker::end_of_text(anchor, &typed));
    }
}

#[test]
fn test_insertion_ending_before_anchor_on_same_line() {
    let mut editor = MemoryEditor::new("let x = value;", "rust");
    let mut store = GhostRegionStore::new();
    let id = store.create("foo", Position::new(1, 9), &mut editor).unwrap();

    let edit = editor.replace(Range::empty(Position::new(1, 5)), "mut ");
    store.track_edit(&edit);
    assert_eq!(store.get(id).unwrap().anchor(), Position::new(1, 13));
}

#[test]
fn test_line_join_before_anchor() {
    let mut editor = MemoryEditor::new("ab\ncd ef", "plaintext");
    let mut store = GhostRegionStore::new();
    let id = store.create("foo", Position::new(2, 4), &mut editor).unwrap();

    let edit = editor.replace(Range::new(Position::new(1, 3), Position::new(2, 1)), "");
    store.track_edit(&edit);
    assert_eq!(store.get(id).unwrap().anchor(), Position::new(1, 6));
    assert_eq!(editor.text(), "abcd ef");
}
