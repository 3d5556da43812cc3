//! Integration tests for settings files and production pipeline wiring

use rag_chain::config::{Settings, StaticSecrets, OPENAI_API_KEY};
use rag_chain::rag::build_contract_pipeline;
use rag_chain::RagError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_settings_file_overrides() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "collection = \"otro_contrato\"\ntop_k = 5\nrefuse_on_empty_context = true"
    )
    .unwrap();

    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(settings.collection, "otro_contrato");
    assert_eq!(settings.top_k, 5);
    assert!(settings.refuse_on_empty_context);
    assert_eq!(settings.embedding_dimensions, 512);
    assert_eq!(settings.chat_model, "gpt-4o");
}

#[test]
fn test_settings_file_must_parse() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "top_k = \"three\"").unwrap();

    assert!(Settings::load(Some(file.path())).is_err());
}

#[test]
fn test_settings_file_rejects_invalid_values() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "top_k = 0").unwrap();

    assert!(Settings::load(Some(file.path())).is_err());
}

#[test]
fn test_missing_settings_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[tokio::test]
async fn test_production_build_reports_missing_qdrant_settings() {
    let secrets = StaticSecrets::new().with(OPENAI_API_KEY, "sk-test");

    match build_contract_pipeline(&Settings::default(), &secrets).await {
        Err(RagError::MissingEnvironment { missing }) => {
            assert_eq!(missing, vec!["QDRANT_URL".to_string(), "QDRANT_API_KEY".to_string()]);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("pipeline built without Qdrant settings"),
    }
}
