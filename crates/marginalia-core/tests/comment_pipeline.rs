//! Integration tests for the comment pipeline (classification, tree
//! building, store batching, and serialization)

use marginalia_core::lexer::Span;
use marginalia_core::tree::{BlockContent, InlineContent, ParamDirection};
use marginalia_core::{
    CommentKind, CommentParser, DeclId, DelimiterStyle, DocStore, FullComment, ParseNoteKind,
    RawComment, StoreConfig,
};

// ============================================================================
// Classification and briefs
// ============================================================================

#[test]
fn test_delimiter_classification_table() {
    let cases = [
        ("/// Line doc.", CommentKind::JavaDoc),
        ("/** Block doc. */", CommentKind::JavaDoc),
        ("//! Bang line doc.", CommentKind::Qt),
        ("/*! Bang block doc. */", CommentKind::Qt),
        ("// plain remark", CommentKind::BcplSlash),
        ("/* plain block */", CommentKind::OrdinaryC),
        ("//// ------------------------------------", CommentKind::OrdinaryBcpl),
        ("/**/", CommentKind::OrdinaryC),
    ];

    for (text, kind) in cases {
        let raw = RawComment::from_text(text, Span::dummy(), false);
        assert_eq!(raw.kind, kind, "classifying {:?}", text);
    }
}

#[test]
fn test_merged_run_overrides_style() {
    let text = "/// Reads the header.\n/// Skips padding bytes.";
    let raw = RawComment::from_text(text, Span::dummy(), true);

    assert_eq!(raw.kind, CommentKind::Merged);
    assert!(raw.is_documentation());
    assert_eq!(raw.brief, "Reads the header.");
}

#[test]
fn test_explicit_brief_command_wins() {
    let text =
        "/**\n * Some intro text that is not the brief.\n *\n * \\brief Converts between forms. Also caches.\n */";
    let raw = RawComment::from_text(text, Span::dummy(), false);

    assert_eq!(raw.brief, "Converts between forms. Also caches.");
}

#[test]
fn test_explicit_brief_spans_continuation_lines() {
    let text = "/// @brief Maps a remote\n/// value into local form.\n///\n/// Details follow.";
    let raw = RawComment::from_text(text, Span::dummy(), true);

    assert_eq!(raw.brief, "Maps a remote value into local form.");
}

// ============================================================================
// Tree building
// ============================================================================

#[test]
fn test_function_comment_builds_full_tree() {
    let text = "/**\n * Copies \\c len bytes between buffers.\n *\n * \\tparam T Element type.\n * \\param[in] src Source buffer.\n * \\param[out] dst Destination buffer.\n * \\return Number of bytes copied.\n */";
    let raw = RawComment::from_text(text, Span::dummy(), false);
    let (tree, notes) = CommentParser::new().parse(&raw);
    assert!(notes.is_empty());

    let tree = tree.unwrap();
    assert_eq!(tree.blocks.len(), 5);
    assert!(matches!(&tree.blocks[0], BlockContent::Paragraph(_)));
    assert!(matches!(
        &tree.blocks[1],
        BlockContent::TParam(t) if t.param_name() == Some("T")
    ));
    assert!(matches!(
        &tree.blocks[2],
        BlockContent::Param(p) if p.direction == ParamDirection::In && p.param_name() == Some("src")
    ));
    assert!(matches!(
        &tree.blocks[3],
        BlockContent::Param(p) if p.direction == ParamDirection::Out && p.param_name() == Some("dst")
    ));
    assert!(matches!(
        &tree.blocks[4],
        BlockContent::Command(c) if c.name == "return"
    ));
}

#[test]
fn test_html_markup_flows_through() {
    let text = "/// Renders <b class=\"wide\">bold</b> text.";
    let raw = RawComment::from_text(text, Span::dummy(), false);
    let (tree, notes) = CommentParser::new().parse(&raw);
    assert!(notes.is_empty());

    let tree = tree.unwrap();
    let BlockContent::Paragraph(para) = &tree.blocks[0] else {
        panic!("expected paragraph, got {:?}", tree.blocks[0]);
    };
    assert_eq!(para.content.len(), 5);
    assert!(matches!(&para.content[0], InlineContent::Text(t) if t == "Renders"));
    let InlineContent::HtmlStart(tag) = &para.content[1] else {
        panic!("expected start tag, got {:?}", para.content[1]);
    };
    assert_eq!(tag.name, "b");
    assert_eq!(tag.attrs.len(), 1);
    assert_eq!(tag.attrs[0].name, "class");
    assert_eq!(tag.attrs[0].value, "wide");
    assert!(matches!(&para.content[3], InlineContent::HtmlEnd(end) if end.name == "b"));
    assert!(matches!(&para.content[4], InlineContent::Text(t) if t == "text."));
}

#[test]
fn test_solo_tag_lines_are_blocks() {
    let text = "/**\n * <ul>\n * item one\n * </ul>\n */";
    let raw = RawComment::from_text(text, Span::dummy(), false);
    let (tree, notes) = CommentParser::new().parse(&raw);
    assert!(notes.is_empty());

    let tree = tree.unwrap();
    assert_eq!(tree.blocks.len(), 3);
    assert!(matches!(&tree.blocks[0], BlockContent::HtmlStart(tag) if tag.name == "ul"));
    assert!(matches!(&tree.blocks[1], BlockContent::Paragraph(_)));
    assert!(matches!(&tree.blocks[2], BlockContent::HtmlEnd(tag) if tag.name == "ul"));
}

#[test]
fn test_verbatim_region_is_preserved_exactly() {
    let text = "/// \\code\n///   if (a < b) \\swap(a, b);\n///\n///   return a;\n/// \\endcode";
    let raw = RawComment::from_text(text, Span::dummy(), true);
    let (tree, notes) = CommentParser::new().parse(&raw);
    assert!(notes.is_empty());

    let tree = tree.unwrap();
    let BlockContent::Verbatim(block) = &tree.blocks[0] else {
        panic!("expected verbatim block, got {:?}", tree.blocks[0]);
    };
    assert_eq!(block.name, "code");
    assert_eq!(
        block.lines,
        vec!["  if (a < b) \\swap(a, b);", "", "  return a;"]
    );
}

#[test]
fn test_note_lines_locate_the_problem() {
    let text = "/// Intro paragraph.\n///\n/// \\param[inn] x Bad direction.";
    let raw = RawComment::from_text(text, Span::dummy(), true);
    let (tree, notes) = CommentParser::new().parse(&raw);

    assert!(tree.is_some());
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].line, 3);
    let ParseNoteKind::MalformedCommand { command, .. } = &notes[0].kind else {
        panic!("expected malformed command note, got {:?}", notes[0].kind);
    };
    assert_eq!(command, "param");
}

#[test]
fn test_unterminated_verbatim_is_recovered() {
    let text = "/// \\verbatim\n/// raw payload";
    let raw = RawComment::from_text(text, Span::dummy(), true);
    let (tree, notes) = CommentParser::new().parse(&raw);

    let tree = tree.unwrap();
    assert!(matches!(
        &tree.blocks[0],
        BlockContent::Verbatim(block) if block.lines == vec!["raw payload"]
    ));
    assert_eq!(notes.len(), 1);
    assert!(matches!(
        &notes[0].kind,
        ParseNoteKind::UnterminatedVerbatim { opener } if opener == "verbatim"
    ));
}

// ============================================================================
// Store and batch parsing
// ============================================================================

#[test]
fn test_store_pipeline_end_to_end() {
    let mut store = DocStore::new();
    store.attach(
        DeclId(1),
        "/** Parses one frame.\n *\n * \\param[in] buf Raw bytes.\n */",
        Span::dummy(),
        DelimiterStyle::BlockDoc,
        false,
    );
    store.attach(
        DeclId(2),
        "// internal scratch state",
        Span::dummy(),
        DelimiterStyle::LinePlain,
        false,
    );
    store.attach(
        DeclId(3),
        "//! Owner documentation.",
        Span::dummy(),
        DelimiterStyle::LineBang,
        false,
    );

    let failures = store.build_trees();
    assert!(failures.is_empty());
    assert_eq!(store.len(), 3);

    let parsed = store.get(DeclId(1)).unwrap();
    assert_eq!(parsed.brief, "Parses one frame.");
    assert_eq!(parsed.full.as_ref().unwrap().blocks.len(), 2);

    assert!(store.get(DeclId(2)).unwrap().full.is_none());
    assert!(store.get(DeclId(3)).unwrap().full.is_some());
}

#[test]
fn test_store_size_cap_marks_invalid() {
    let config = StoreConfig::new().with_max_comment_len(32);
    let mut store = DocStore::new().with_config(config);

    let long = format!("/// {}", "x".repeat(64));
    let note = store.attach(
        DeclId(9),
        long.as_str(),
        Span::dummy(),
        DelimiterStyle::LineDoc,
        false,
    );

    assert!(matches!(
        note,
        Some(ref n) if matches!(n.kind, ParseNoteKind::OversizedComment { cap: 32, .. })
    ));
    let record = store.get(DeclId(9)).unwrap();
    assert_eq!(record.kind, CommentKind::Invalid);
    assert!(record.brief.is_empty());

    // The invalid record never gets a tree, even after a batch pass.
    let failures = store.build_trees();
    assert!(failures.is_empty());
    assert!(store.get(DeclId(9)).unwrap().full.is_none());
}

#[test]
fn test_store_parallel_batch_matches_sequential() {
    let mut parallel = DocStore::new().with_config(StoreConfig::new().with_parallel_threshold(0));
    let mut sequential = DocStore::new();

    for i in 0..48u64 {
        let text = format!("/// Item {}.\n///\n/// \\return Slot {}.", i, i);
        parallel.attach(
            DeclId(i),
            text.as_str(),
            Span::dummy(),
            DelimiterStyle::LineDoc,
            true,
        );
        sequential.attach(
            DeclId(i),
            text.as_str(),
            Span::dummy(),
            DelimiterStyle::LineDoc,
            true,
        );
    }

    assert!(parallel.build_trees().is_empty());
    assert!(sequential.build_trees().is_empty());

    for i in 0..48u64 {
        let fanned = parallel.get(DeclId(i)).unwrap();
        assert!(fanned.full.is_some());
        assert_eq!(fanned.full, sequential.get(DeclId(i)).unwrap().full);
    }
}

#[test]
fn test_store_reports_notes_with_declaration() {
    let mut store = DocStore::new();
    store.attach(
        DeclId(1),
        "/// Clean.",
        Span::dummy(),
        DelimiterStyle::LineDoc,
        false,
    );
    store.attach(
        DeclId(2),
        "/// \\param[sideways] n Direction is wrong.",
        Span::dummy(),
        DelimiterStyle::LineDoc,
        false,
    );

    let failures = store.build_trees();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, DeclId(2));
    assert!(matches!(
        failures[0].1.kind,
        ParseNoteKind::MalformedCommand { .. }
    ));

    // Recovery still yields a tree for the noisy declaration.
    assert!(store.get(DeclId(2)).unwrap().full.is_some());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_tree_serializes_and_restores() {
    let text = "/**\n * Streams <i>styled</i> output.\n *\n * \\tparam[0.1] S Sink type.\n * \\code\n * sink.write(frame);\n * \\endcode\n */";
    let raw = RawComment::from_text(text, Span::dummy(), false);
    let (tree, _) = CommentParser::new().parse(&raw);
    let tree = tree.unwrap();

    let json = serde_json::to_string(&tree).unwrap();
    let restored: FullComment = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tree);
}

#[test]
fn test_raw_comment_serializes_with_tree() {
    let mut store = DocStore::new();
    store.attach(
        DeclId(4),
        "/// Rewinds the cursor.",
        Span::new(120, 143),
        DelimiterStyle::LineDoc,
        false,
    );
    assert!(store.build_trees().is_empty());

    let record = store.get(DeclId(4)).unwrap();
    assert!(record.full.is_some());

    let json = serde_json::to_string(record).unwrap();
    let restored: RawComment = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, record);
}
