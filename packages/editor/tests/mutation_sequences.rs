//! Command chains through the history
//!
//! This tests:
//! - Undo as the exact inverse of every kind of commit
//! - Redo after undo, and redo invalidation
//! - Save points and dirty state across sequences

use mailforge_editor::{Command, History, InsertPosition, NodeFlag};
use mailforge_schema::{Column, ContentBlock, Document, Row, Section};
use std::borrow::Cow;

fn fixture() -> Document {
    Document::new("Sequences")
        .with_section(
            Section::new("s1").with_row(
                Row::new("r1")
                    .with_column(
                        Column::new("c1")
                            .with_block(ContentBlock::heading("h1", "Welcome"))
                            .with_block(ContentBlock::text("t1", "Hello {{name}}")),
                    )
                    .with_column(Column::new("c2").with_block(ContentBlock::button(
                        "b1",
                        "Shop",
                        "https://example.com",
                    ))),
            ),
        )
        .with_section(Section::new("s2").with_row(Row::new("r2").with_column(Column::new("c3"))))
}

fn every_command() -> Vec<Command> {
    vec![
        Command::MoveBlock {
            source_column_id: "c1".to_string(),
            source_index: 1,
            target_column_id: "c3".to_string(),
            target_index: 0,
        },
        Command::MoveColumn {
            source_row_id: "r1".to_string(),
            source_index: 0,
            target_row_id: "r2".to_string(),
            target_index: 1,
        },
        Command::MoveRow {
            source_section_id: "s2".to_string(),
            source_index: 0,
            target_section_id: "s1".to_string(),
            target_index: 0,
        },
        Command::MoveSection {
            source_index: 1,
            target_index: 0,
        },
        Command::InsertBlock {
            column_id: "c3".to_string(),
            block: ContentBlock::divider("d1"),
            position: InsertPosition::End,
        },
        Command::InsertColumn {
            row_id: "r2".to_string(),
            column: Column::new("c4"),
            position: InsertPosition::Index(0),
        },
        Command::ReplaceRowStructure {
            row_id: "r1".to_string(),
            column_ids: vec!["n1".to_string(), "n2".to_string(), "n3".to_string()],
        },
        Command::SetFlag {
            node_id: "s1".to_string(),
            flag: NodeFlag::Hidden,
            value: true,
        },
        Command::DeleteColumn {
            column_id: "c2".to_string(),
        },
        Command::UpdateBlock {
            block: ContentBlock::text("t1", "Bye {{name}}"),
        },
        Command::DuplicateBlock {
            block_id: "h1".to_string(),
            new_id: "h2".to_string(),
        },
    ]
}

#[test]
fn test_undo_inverts_every_command() {
    let original = fixture();

    for command in every_command() {
        let mut history = History::new(original.clone());
        let Cow::Owned(next) = command.apply(history.present()) else {
            panic!("{} should change the fixture", command.name());
        };

        assert!(history.commit(next));
        assert!(history.undo());
        assert_eq!(*history.present(), original, "undo after {}", command.name());
    }
}

#[test]
fn test_chain_then_unwind() {
    let original = fixture();
    let mut history = History::new(original.clone());
    let mut states = vec![original.clone()];

    for command in every_command() {
        if let Cow::Owned(next) = command.apply(history.present()) {
            history.commit(next);
            states.push(history.present().clone());
        }
    }
    assert!(history.undo_levels() >= 5);

    // walk back through every recorded state
    for expected in states.iter().rev().skip(1) {
        assert!(history.undo());
        assert_eq!(history.present(), expected);
    }
    assert!(!history.undo());
    assert_eq!(*history.present(), original);

    // and forward again
    for expected in states.iter().skip(1) {
        assert!(history.redo());
        assert_eq!(history.present(), expected);
    }
    assert!(!history.redo());
}

#[test]
fn test_save_then_edit_is_dirty() {
    let mut history = History::new(fixture());
    let command = Command::DeleteBlock {
        block_id: "b1".to_string(),
    };

    let next = command.apply(history.present()).into_owned();
    history.commit(next);
    assert!(history.save().is_some());
    assert!(!history.is_dirty());

    let next = Command::DeleteSection {
        section_id: "s2".to_string(),
    }
    .apply(history.present())
    .into_owned();
    history.commit(next);
    assert!(history.is_dirty());

    // undoing back to the saved state is clean again
    history.undo();
    assert!(!history.is_dirty());
}

#[test]
fn test_noop_commands_do_not_create_history() {
    let mut history = History::new(fixture());
    let command = Command::MoveBlock {
        source_column_id: "c1".to_string(),
        source_index: 0,
        target_column_id: "c1".to_string(),
        target_index: 1,
    };

    let result = command.apply(history.present());
    assert!(matches!(result, Cow::Borrowed(_)));
    let next = result.into_owned();
    assert!(!history.commit(next));
    assert!(!history.can_undo());
}
