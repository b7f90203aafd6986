use pdf_typeset::*;
use std::path::Path;

#[test]
fn test_builtin_registry() {
    let fonts = FontRegistry::builtin();
    assert!(fonts.contains("Helvetica"));
    assert!(fonts.contains("Times-Roman"));
    assert!(fonts.contains("Courier-BoldOblique"));
    assert!(!fonts.contains("Roboto-Regular"));
    assert_eq!(fonts.names().len(), 12);
}

#[test]
fn test_unregistered_font_is_an_error() {
    let fonts = FontRegistry::builtin();
    match fonts.resolve("Roboto-Regular") {
        Err(TypesetError::FontNotRegistered(name)) => assert_eq!(name, "Roboto-Regular"),
        other => panic!("Expected FontNotRegistered, got {:?}", other.map(|f| &f.name)),
    }
}

#[test]
fn test_alias_resolves_to_target() {
    let fonts = FontRegistry::builtin()
        .with_alias("Roboto-Regular", "Helvetica")
        .unwrap();
    assert_eq!(fonts.resolve("Roboto-Regular").unwrap().name, "Helvetica");
    assert_eq!(
        fonts.face("Roboto-Regular", true, false).unwrap().name,
        "Helvetica-Bold"
    );

    let result = FontRegistry::builtin().with_alias("Serif", "Garamond");
    assert!(matches!(result, Err(TypesetError::FontNotRegistered(_))));
}

#[test]
fn test_builtin_variants() {
    let fonts = FontRegistry::builtin();
    assert_eq!(fonts.face("Times-Roman", false, true).unwrap().name, "Times-Italic");
    assert_eq!(
        fonts.face("Times-Roman", true, true).unwrap().name,
        "Times-BoldItalic"
    );
    assert_eq!(fonts.face("Courier", true, false).unwrap().name, "Courier-Bold");
    assert_eq!(fonts.face("Helvetica", false, false).unwrap().name, "Helvetica");
}

#[test]
fn test_builtin_measurement() {
    let fonts = FontRegistry::builtin();
    let helvetica = fonts.resolve("Helvetica").unwrap();
    assert!(helvetica.is_builtin());
    assert!(helvetica.path().is_none());

    // Helvetica W is 944/1000 em
    let wide = helvetica.measure("WWWWWWWWWW", 12.0);
    assert!((wide - 113.3).abs() < 0.5, "measured {}", wide);
    let narrow = helvetica.measure("illicit little", 12.0);
    assert!(narrow < 14.0 * 12.0 * 0.5, "measured {}", narrow);
    assert!((helvetica.measure(" ", 10.0) - 2.78).abs() < 1e-3);

    let courier = fonts.resolve("Courier").unwrap();
    assert!((courier.measure("abcd", 10.0) - 24.0).abs() < 0.05);
    assert!((courier.measure("a b", 10.0) - 18.0).abs() < 0.05);
}

#[test]
fn test_builtin_glyph_coverage() {
    let fonts = FontRegistry::builtin();
    let helvetica = fonts.resolve("Helvetica").unwrap();
    assert!(helvetica.supports('é'));
    assert!(helvetica.supports('\u{2022}'));
    assert!(helvetica.supports('\u{2014}'));
    assert!(helvetica.supports(' '));
    assert!(!helvetica.supports('\u{4e2d}'));
}

#[test]
fn test_font_dir_records_source_path() {
    let dir = tempfile::tempdir().unwrap();
    let program = printpdf::BuiltinFont::TimesRoman.get_subset_font().bytes;
    std::fs::write(dir.path().join("Serif-400.ttf"), &program).unwrap();

    let fonts = FontRegistry::builtin().with_font_dir(dir.path()).unwrap();
    let serif = fonts.resolve("Serif").unwrap();
    assert!(!serif.is_builtin());
    assert_eq!(serif.path(), Some(dir.path().join("Serif-400.ttf").as_path()));
}

#[test]
fn test_alias_target_is_reported() {
    let fonts = FontRegistry::builtin()
        .with_alias("Roboto-Regular", "Helvetica")
        .unwrap();
    assert_eq!(fonts.alias_target("Roboto-Regular"), Some("Helvetica"));
    assert_eq!(fonts.alias_target("Helvetica"), None);
    assert_eq!(fonts.alias_target("Garamond"), None);
}

#[test]
fn test_font_name_from_file() {
    assert_eq!(
        font_name_from_file(Path::new("fonts/Roboto-700.ttf")).as_deref(),
        Some("Roboto")
    );
    assert_eq!(
        font_name_from_file(Path::new("Lora-Regular.otf")).as_deref(),
        Some("Lora-Regular")
    );
}

#[test]
fn test_invalid_font_bytes_rejected() {
    let result = FontRegistry::builtin().with_font_bytes("Broken", b"not a font".to_vec());
    assert!(matches!(result, Err(TypesetError::Font(_))));
}

#[test]
fn test_font_dir_skips_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Broken-400.ttf"), b"garbage").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not a font").unwrap();

    let fonts = FontRegistry::builtin().with_font_dir(dir.path()).unwrap();
    assert!(!fonts.contains("Broken"));
    assert_eq!(fonts.names().len(), 12);
}

#[test]
fn test_missing_font_dir_is_not_fatal() {
    let fonts = FontRegistry::builtin()
        .with_font_dir("/definitely/not/a/fonts/dir")
        .unwrap();
    assert!(fonts.contains("Helvetica"));
}

#[tokio::test]
async fn test_load_registry_with_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let fonts = FontRegistry::load(
        Some(dir.path().to_path_buf()),
        vec![("Roboto-Regular".to_string(), "Times-Roman".to_string())],
    )
    .await
    .unwrap();
    assert_eq!(fonts.resolve("Roboto-Regular").unwrap().name, "Times-Roman");

    let result = FontRegistry::load(None, vec![("A".to_string(), "B".to_string())]).await;
    assert!(matches!(result, Err(TypesetError::FontNotRegistered(_))));
}
