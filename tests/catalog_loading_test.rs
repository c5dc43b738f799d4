use std::io::Write;

use meladai_registry::prelude::*;

const CATALOG: &str = r#"[
  {
    "value": "melad-default",
    "label": "Melad",
    "icon": "/logicon.png",
    "iconClass": "!text-neutral-900 dark:!text-white",
    "description": "Cohere Command R (Fast)",
    "color": "blue",
    "vision": false,
    "experimental": false,
    "category": "Stable",
    "thinking": false,
    "streaming": true
  },
  {
    "value": "compatible-glhf-mistral",
    "label": "Mixtral 8x22B (GLHF)",
    "icon": "MistralIcon",
    "category": "Compatible"
  },
  {
    "value": "local-vision",
    "label": "Local Vision",
    "icon": "/meta-color.svg",
    "category": "Local",
    "vision": true
  }
]"#;

#[test]
fn loads_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = ModelCatalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(
        catalog.get("compatible-glhf-mistral").unwrap().icon,
        IconRef::Component("MistralIcon".into())
    );
    assert!(catalog.supports_vision("local-vision"));
    assert!(!catalog.supports_vision("melad-default"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelCatalog::from_path(dir.path().join("models.json")).unwrap_err();
    assert!(matches!(err, RegistryError::Io(_)));
}

#[test]
fn malformed_file_is_a_catalog_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let err = ModelCatalog::from_path(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Catalog(_)));
}

#[test]
fn duplicate_rows_are_rejected() {
    let json = r#"[
        {"value": "a", "label": "A", "icon": "/a.svg", "category": "X"},
        {"value": "a", "label": "A again", "icon": "/a.svg", "category": "X"}
    ]"#;
    assert!(matches!(
        ModelCatalog::from_json_str(json),
        Err(RegistryError::DuplicateIdentifier(id)) if id == "a"
    ));
}

#[test]
fn availability_marks_unconfigured_entries() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    let catalog = ModelCatalog::from_path(file.path()).unwrap();

    let registry = RegistryBuilder::with_defaults(StaticCredentials::new()).build();
    let rows = registry.availability(&catalog);

    let state: Vec<(&str, bool)> = rows
        .iter()
        .map(|r| (r.identifier.as_str(), r.available))
        .collect();
    assert_eq!(
        state,
        vec![
            ("melad-default", true),
            ("compatible-glhf-mistral", false),
            ("local-vision", false),
        ]
    );
    assert_eq!(rows[0].provider.as_deref(), Some("cohere"));
}

#[test]
fn descriptors_and_handles_are_independent() {
    let catalog = ModelCatalog::builtin();
    let registry = RegistryBuilder::with_defaults(StaticCredentials::new()).build();

    // Registered without a descriptor.
    assert!(registry.verify_exists("melad-mistral"));
    assert!(catalog.get("melad-mistral").is_none());

    // Described without being registered.
    assert!(catalog.get("requesty-gpt-4o-mini").is_some());
    assert!(!registry.verify_exists("requesty-gpt-4o-mini"));
}
