//! Test helpers: build the router against a mock provider and a temp output directory.
//!
//! Run from workspace root: `cargo test -p promptpix-api`.

pub mod fixtures;

use axum_test::TestServer;
use promptpix_api::setup;
use promptpix_core::Config;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

pub const NANO_GPT_PATH: &str = "/v1/images/generations";
pub const CHAT_PATH: &str = "/api/v1/chat/completions";
pub const TEST_API_KEY: &str = "test-key";

/// Test application: server, mock provider and owned output directory.
pub struct TestApp {
    pub server: TestServer,
    pub provider: mockito::ServerGuard,
    pub output_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn output_path(&self) -> &Path {
        self.output_dir.path()
    }

    /// Names of the files currently in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Setup a Nano-GPT backed app. `overrides` replace or blank out default variables.
pub async fn setup_test_app(overrides: &[(&str, &str)]) -> TestApp {
    let provider = mockito::Server::new_async().await;
    let output_dir = tempfile::tempdir().unwrap();

    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "OUTPUT_DIR".to_string(),
        output_dir.path().to_string_lossy().into_owned(),
    );
    vars.insert(
        "NANO_GPT_API_URL".to_string(),
        format!("{}{}", provider.url(), NANO_GPT_PATH),
    );
    vars.insert("NANO_GPT_API_KEY".to_string(), TEST_API_KEY.to_string());
    vars.insert(
        "MULTIMODAL_API_URL".to_string(),
        format!("{}{}", provider.url(), CHAT_PATH),
    );
    vars.insert("MULTIMODAL_API_KEY".to_string(), TEST_API_KEY.to_string());
    vars.insert("PROVIDER_TIMEOUT_SECS".to_string(), "10".to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let (_state, router) = setup::build_app(config).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        provider,
        output_dir,
    }
}
