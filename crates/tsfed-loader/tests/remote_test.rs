//! Downloads against a mock server

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tsfed_loader::{LoaderError, RemoteLoader};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const DECLARATIONS: &str = "declare module \"remote/Button\" {\n    export const label: string;\n}\n";

#[tokio::test]
async fn test_fetch_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/remote/types.d.ts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DECLARATIONS))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let destination = dir.path().join("@types-remote");
    let loader = RemoteLoader::new(&destination)?;

    let mut modules = IndexMap::new();
    modules.insert(
        format!("{}/remote/types.d.ts", server.uri()),
        "remote.d.ts".to_string(),
    );
    let outcomes = loader.fetch_all(&modules).await?;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_ok());
    assert_eq!(outcomes[0].result.as_ref().ok(), Some(&(DECLARATIONS.len() as u64)));
    assert_eq!(std::fs::read_to_string(destination.join("remote.d.ts"))?, DECLARATIONS);
    Ok(())
}

#[tokio::test]
async fn test_failed_download_leaves_no_file() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.d.ts"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let loader = RemoteLoader::new(dir.path())?;

    let mut modules = IndexMap::new();
    modules.insert(format!("{}/missing.d.ts", server.uri()), "missing.d.ts".to_string());
    let outcomes = loader.fetch_all(&modules).await?;

    assert!(matches!(
        outcomes[0].result,
        Err(LoaderError::Http { status: 404, .. })
    ));
    assert!(!dir.path().join("missing.d.ts").exists());
    Ok(())
}

#[tokio::test]
async fn test_one_failure_does_not_stop_the_others() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.d.ts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("export {};\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.d.ts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c.d.ts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("export {};\n"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let loader = RemoteLoader::new(dir.path())?;

    let modules: IndexMap<String, String> = ["a", "b", "c"]
        .iter()
        .map(|name| (format!("{}/{}.d.ts", server.uri(), name), format!("{name}.d.ts")))
        .collect();
    let outcomes = loader.fetch_all(&modules).await?;

    let succeeded: Vec<bool> = outcomes.iter().map(|outcome| outcome.is_ok()).collect();
    assert_eq!(succeeded, vec![true, false, true]);
    assert!(dir.path().join("a.d.ts").exists());
    assert!(!dir.path().join("b.d.ts").exists());
    assert!(dir.path().join("c.d.ts").exists());
    Ok(())
}

#[tokio::test]
async fn test_invalid_entry_fails_before_downloading() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("export {};\n"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let destination = dir.path().join("out");
    let loader = RemoteLoader::new(&destination)?;

    let mut modules = IndexMap::new();
    modules.insert(format!("{}/ok.d.ts", server.uri()), "ok.d.ts".to_string());
    modules.insert(format!("{}/bundle.js", server.uri()), "bundle.d.ts".to_string());
    let result = loader.fetch_all(&modules).await;

    assert!(matches!(result, Err(LoaderError::InvalidExtension { .. })));
    assert!(!destination.exists());
    Ok(())
}
