//! Integration tests for the engine pipeline: configuration, JSON documents
//! and file-backed resources.

use std::fs;
use std::path::PathBuf;

use quokka_css::{ApproximateFontMetrics, DisplayCommand, StyledNode};
use quokka_engine::{Engine, EngineConfig, LoadError, load_document};

const EPSILON: f32 = 0.01;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helper: an engine with deterministic text metrics.
fn engine(config: EngineConfig) -> Engine {
    Engine::new(config)
        .expect("default config has no font file")
        .with_metrics(ApproximateFontMetrics)
}

/// Helper: a fresh scratch directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quokka-engine-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

const DOCUMENT: &str = r##"{
    "kind": "block",
    "style": { "display": "block", "background_color": "#ffffff" },
    "children": [
        {
            "kind": "block",
            "style": { "display": "block" },
            "children": [ { "kind": "text", "text": "Hello world" } ]
        }
    ]
}"##;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_render_json_lays_out_and_paints() {
    init_logging();
    let document = engine(EngineConfig::default())
        .render_json(DOCUMENT)
        .expect("valid document");

    assert!((document.fragments.root.dimensions.content.width - 800.0).abs() < EPSILON);
    assert!(matches!(
        document.display_list.commands()[0],
        DisplayCommand::FillRect { .. }
    ));
    assert!(document.display_list.iter().any(
        |c| matches!(c, DisplayCommand::DrawText { text, .. } if text == "Hello world")
    ));
    assert!(document.source_path.is_empty());
}

#[test]
fn test_config_sets_the_viewport() {
    init_logging();
    let config = EngineConfig::from_json(r#"{ "viewport_width": 300, "viewport_height": 200 }"#)
        .expect("valid config");
    let document = engine(config).render_json(DOCUMENT).expect("valid document");

    assert!((document.fragments.root.dimensions.content.width - 300.0).abs() < EPSILON);
    assert!((document.fragments.viewport.height - 200.0).abs() < EPSILON);
}

#[test]
fn test_invariant_checking_accepts_a_valid_layout() {
    init_logging();
    let config = EngineConfig {
        check_invariants: true,
        ..EngineConfig::default()
    };
    assert!(engine(config).render_json(DOCUMENT).is_ok());
}

#[test]
fn test_render_matches_render_json() {
    init_logging();
    let engine = engine(EngineConfig::default());
    let root: StyledNode = serde_json::from_str(DOCUMENT).expect("valid document");
    let direct = engine.render(&root).expect("render");
    let parsed = engine.render_json(DOCUMENT).expect("render_json");
    assert_eq!(direct.display_list, parsed.display_list);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_document_is_json_error() {
    init_logging();
    let err = engine(EngineConfig::default())
        .render_json(r#"{ "kind": "block", "children": "#)
        .unwrap_err();
    assert!(matches!(err, LoadError::Json(_)), "{err}");
}

#[test]
fn test_missing_document_is_io_error() {
    init_logging();
    let err = load_document("/nonexistent/quokka/page.json".as_ref(), None).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
    assert!(err.to_string().contains("page.json"));
}

#[test]
fn test_missing_font_file_is_reported() {
    let config = EngineConfig {
        font_path: Some("/nonexistent/quokka.ttf".into()),
        ..EngineConfig::default()
    };
    assert!(matches!(Engine::new(config), Err(LoadError::Io { .. })));
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn test_load_document_with_config_file() {
    init_logging();
    let dir = scratch_dir("config");
    let page = dir.join("page.json");
    let config = dir.join("config.json");
    fs::write(&page, DOCUMENT).expect("write document");
    fs::write(&config, r#"{ "viewport_width": 640 }"#).expect("write config");

    let document = load_document(&page, Some(&config)).expect("load");
    assert!((document.fragments.viewport.width - 640.0).abs() < EPSILON);
    assert!(document.source_path.ends_with("page.json"));
}

#[test]
fn test_relative_images_resolve_next_to_the_document() {
    init_logging();
    let dir = scratch_dir("images");
    image::RgbaImage::new(4, 2)
        .save(dir.join("dot.png"))
        .expect("write png");
    let page = dir.join("page.json");
    fs::write(
        &page,
        r#"{
            "kind": "block",
            "style": { "display": "block" },
            "children": [
                { "kind": "replaced", "style": { "display": "block" }, "image": "dot.png" }
            ]
        }"#,
    )
    .expect("write document");

    let document = load_document(&page, None).expect("load");
    let img = &document.fragments.root.children[0];
    assert!((img.dimensions.content.width - 4.0).abs() < EPSILON);
    assert!((img.dimensions.content.height - 2.0).abs() < EPSILON);
    assert!(document
        .display_list
        .iter()
        .any(|c| matches!(c, DisplayCommand::DrawImage { .. })));
}
