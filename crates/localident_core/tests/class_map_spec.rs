use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use localident_core::class_map::{build_class_maps, discover_style_modules, Collision, Manifest};
use localident_core::{build_project_class_maps, get_local_ident, LocalIdentConfig, Template};
use localident_core::{HashDigest, IdentifierDeriver, NamingRules};

// Helper to create temp workspace
fn setup_workspace(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("localident_tests");
    path.push(name);
    if path.exists() {
        fs::remove_dir_all(&path).unwrap();
    }
    fs::create_dir_all(&path).unwrap();
    path
}

fn write(root: &Path, relative: &str, contents: &str) {
    let file = root.join(relative);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, contents).unwrap();
}

#[tokio::test]
async fn test_discover_skips_node_modules_and_plain_styles() {
    let root = setup_workspace("discover");
    write(&root, "src/Button/index.module.css", ".primary { }");
    write(&root, "src/Card.module.scss", ".title { }");
    write(&root, "src/legacy.module.sass", ".old\n  color: red");
    write(&root, "src/global.scss", ".body { }");
    write(&root, "node_modules/lib/x.module.css", ".x { }");
    write(&root, ".cache/y.module.css", ".y { }");

    let found = discover_style_modules(&root).await.unwrap();
    let relative: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(
        relative,
        ["src/Button/index.module.css", "src/Card.module.scss", "src/legacy.module.sass"]
    );
}

#[tokio::test]
async fn test_project_class_maps() {
    let root = setup_workspace("project");
    write(&root, "src/Button/index.module.css", ".primary { color: red; }\n.primary:hover { }");
    write(&root, "src/Card.module.scss", ".card { .title { margin: .5em; } }");

    let manifest = build_project_class_maps(&root, &LocalIdentConfig::default())
        .await
        .unwrap();
    assert_eq!(manifest.len(), 2);

    let root_str = root.to_string_lossy();
    let button = manifest.get("src/Button/index.module.css").unwrap();
    assert_eq!(button.len(), 1);
    assert_eq!(
        button["primary"],
        get_local_ident(
            &root.join("src/Button/index.module.css").to_string_lossy(),
            &root_str,
            "primary",
            "[name]_[local]__[hash]",
        )
    );
    assert!(button["primary"].starts_with("Button_primary__"));

    let card = manifest.get("src/Card.module.scss").unwrap();
    assert!(card["card"].starts_with("Card_card__"));
    assert!(card["title"].starts_with("Card_title__"));
    assert!(manifest.collisions().is_empty());

    let json = manifest.to_json().unwrap();
    let back: Manifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, manifest);
}

#[tokio::test]
async fn test_missing_file_reports_path() {
    let root = setup_workspace("missing");
    let deriver = Arc::new(LocalIdentConfig::default().deriver().unwrap());
    let files = vec![PathBuf::from("src/gone.module.css")];

    let err = build_class_maps(&root, &files, deriver, &Template::parse("[local]"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("gone.module.css"));
}

/// Every digest is the same, so only the template keeps names apart.
struct Constant;

impl HashDigest for Constant {
    fn digest(&self, _input: &[u8]) -> String {
        "zzzzz".to_string()
    }
}

#[tokio::test]
async fn test_collisions_are_reported() {
    let root = setup_workspace("collisions");
    write(&root, "a/index.module.css", ".x { }");
    write(&root, "b/a.module.css", ".x { }");

    let deriver = Arc::new(IdentifierDeriver::new(Constant, NamingRules::default()));
    let files = vec![
        PathBuf::from("a/index.module.css"),
        PathBuf::from("b/a.module.css"),
    ];
    let manifest = build_class_maps(&root, &files, deriver, &Template::parse("[name]_[local]__[hash]"))
        .await
        .unwrap();

    assert_eq!(
        manifest.collisions(),
        vec![Collision {
            ident: "a_x__zzzzz".to_string(),
            sources: vec![
                ("a/index.module.css".to_string(), "x".to_string()),
                ("b/a.module.css".to_string(), "x".to_string()),
            ],
        }]
    );
}

#[tokio::test]
async fn test_indented_sass_class_map() {
    let root = setup_workspace("sass");
    write(
        &root,
        "src/legacy.module.sass",
        ".old\n  color: red\n.card\n  .title\n    margin: 0\n  &__body\n    padding: 0\n",
    );

    let manifest = build_project_class_maps(&root, &LocalIdentConfig::default())
        .await
        .unwrap();
    let legacy = manifest.get("src/legacy.module.sass").unwrap();

    let locals: Vec<_> = legacy.keys().map(String::as_str).collect();
    assert_eq!(locals, ["card", "card__body", "old", "title"]);
    assert!(legacy["old"].starts_with("legacy_old__"));
    assert!(legacy["card__body"].starts_with("legacy_card__body__"));
}

#[tokio::test]
async fn test_scss_parent_suffix_class_map() {
    let root = setup_workspace("suffix");
    write(&root, "src/Menu/index.module.scss", ".menu { &__item { } &--open { } }");

    let manifest = build_project_class_maps(&root, &LocalIdentConfig::default())
        .await
        .unwrap();
    let menu = manifest.get("src/Menu/index.module.scss").unwrap();

    let locals: Vec<_> = menu.keys().map(String::as_str).collect();
    assert_eq!(locals, ["menu", "menu--open", "menu__item"]);
    assert!(menu["menu__item"].starts_with("Menu_menu__item__"));
}

#[tokio::test]
async fn test_discover_missing_root_reports_path() {
    let root = setup_workspace("no_root").join("absent");

    let err = discover_style_modules(&root).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent"));
}
