//! End-to-end tests: sources on disk in, units on disk out.
//!
//! The `#[ignore]`d test at the bottom compiles the output against the
//! runtime crate; it is slow since it invokes cargo check.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use restgen_gen::builder::Builder;
use restgen_gen::config::GeneratorConfig;
use restgen_gen::diagnostics::DiagnosticKind;

const DECLARATIONS: &str = r#"
use restgen::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct NewIssue {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub state: IssueState,
}

#[derive(QueryParams)]
pub struct IssueFilter {
    #[alias("state")]
    pub state: Option<IssueState>,
    pub labels: Option<String>,
}

#[generate_serializer]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    #[alias("open")]
    Open,
    #[alias("closed")]
    Closed,
}

#[derive(Debug)]
pub struct ApiError(pub ClientError);

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        Self(error)
    }
}

#[api_client]
pub trait GithubApi {
    #[get("/users/{login}")]
    fn user(&self, login: &str) -> Task<'_, User>;

    #[get("/repos/{owner}/{repo}/issues")]
    fn issues(&self, owner: &str, repo: &str, filter: &IssueFilter, page: u32)
        -> Task<'_, Vec<Issue>>;

    #[post("/repos/{owner}/{repo}/issues")]
    async fn open_issue(
        &self,
        owner: &str,
        repo: &str,
        #[body] issue: &NewIssue,
        cancel: CancellationToken,
    ) -> Result<Issue, ApiError>;

    #[delete("/repos/{owner}/{repo}/subscription")]
    fn unsubscribe(&self, owner: &str, repo: &str) -> Result<(), ClientError>;

    #[put("/notifications")]
    fn mark_read(&self);
}

include!("generated/GithubApi.client.rs");
include!("generated/IssueState.serializer.rs");
"#;

fn write_project(dir: &Path, lib: &str) {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/lib.rs"), lib).unwrap();
}

fn compile(dir: &Path) -> restgen_gen::GenerationReport {
    Builder::new()
        .src_root(dir.join("src"))
        .file(dir.join("src/lib.rs"))
        .config(GeneratorConfig::default())
        .out_dir(dir.join("src/generated"))
        .cargo_directives(false)
        .compile()
        .unwrap()
}

#[test]
fn writes_one_file_per_declaration() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path(), DECLARATIONS);

    let report = compile(temp_dir.path());

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let generated = temp_dir.path().join("src/generated");
    let client = fs::read_to_string(generated.join("GithubApi.client.rs")).unwrap();
    let serializer = fs::read_to_string(generated.join("IssueState.serializer.rs")).unwrap();

    assert!(client.starts_with(restgen_gen::codegen::HEADER));
    assert!(client.contains("// Source: GithubApi"));
    for method in ["fn user(", "fn issues(", "async fn open_issue(", "fn unsubscribe(", "fn mark_read("] {
        assert!(client.contains(method), "missing {method}");
    }
    assert!(client.contains(".body(&issue)"));
    assert!(client.contains(".cancellation(&cancel)"));
    assert!(client.contains("::restgen::block_on(request.send_unit())"));

    assert!(serializer.contains("(Self::Open, \"open\")"));
    assert!(serializer.contains("impl ::restgen::serde::Serialize for IssueState"));
}

#[test]
fn regeneration_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path(), DECLARATIONS);

    let first = compile(temp_dir.path());
    let before = fs::read_to_string(temp_dir.path().join("src/generated/GithubApi.client.rs")).unwrap();
    let second = compile(temp_dir.path());
    let after = fs::read_to_string(temp_dir.path().join("src/generated/GithubApi.client.rs")).unwrap();

    assert_eq!(before, after);
    assert_eq!(first.units, second.units);
}

#[test]
fn broken_declaration_does_not_affect_siblings() {
    let temp_dir = TempDir::new().unwrap();
    write_project(
        temp_dir.path(),
        r#"
        use restgen::prelude::*;

        #[api_client]
        pub trait Broken {
            #[get("/a/{id}")]
            fn a(&self, #[body] x: u32, #[body] y: u32, id: u32) -> Task<'_>;

            #[get("/b")]
            fn b(&self) -> Task<'_>;
        }

        #[api_client]
        pub trait Healthy {
            #[get("/ok")]
            fn ok(&self) -> Task<'_>;
        }

        #[generate_serializer]
        pub enum Bad {
            Data(u32),
        }
        "#,
    );

    let report = compile(temp_dir.path());

    let hints: Vec<&str> = report.units.iter().map(|u| u.hint.as_str()).collect();
    assert_eq!(hints, vec!["Broken.client", "Healthy.client"]);
    assert!(report.unit("Broken.client").unwrap().code.contains("fn b("));
    assert!(!report.unit("Broken.client").unwrap().code.contains("fn a("));

    let kinds: Vec<&DiagnosticKind> = report.diagnostics.iter().map(|d| &d.kind).collect();
    assert!(kinds.contains(&&DiagnosticKind::DuplicateBody {
        first: "x".into(),
        second: "y".into()
    }));
    assert!(kinds.contains(&&DiagnosticKind::NonUnitVariant {
        variant: "Data".into()
    }));
}

#[test]
fn foreign_markers_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    write_project(
        temp_dir.path(),
        r#"
        use other_crate::api_client;

        #[api_client]
        pub trait NotOurs {
            #[get("/x")]
            fn x(&self);
        }
        "#,
    );

    let report = compile(temp_dir.path());

    assert!(report.units.is_empty());
    assert!(report.diagnostics.is_empty());
}

#[test]
fn json_report_lists_units_and_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    write_project(
        temp_dir.path(),
        r#"
        use restgen::prelude::*;

        #[api_client]
        pub trait Api {
            fn no_verb(&self) -> Task<'_>;
        }
        "#,
    );

    let report = compile(temp_dir.path());
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["units"][0]["hint"], "Api.client");
    assert_eq!(json["units"][0]["kind"], "client");
    assert_eq!(json["diagnostics"][0]["kind"], "missing_verb");
    assert_eq!(json["diagnostics"][0]["member"], "no_verb");
    assert_eq!(json["cancelled"], false);
}

/// Generates clients for `DECLARATIONS` into a scratch crate that depends
/// on the runtime by path and runs `cargo check` on it.
#[test]
#[ignore = "slow: compiles generated code"]
fn generated_code_compiles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = temp_dir.path().join("consumer");
    write_project(&crate_dir, DECLARATIONS);
    compile(&crate_dir);

    let runtime = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let manifest = format!(
        r#"[package]
name = "restgen-consumer"
version = "0.1.0"
edition = "2024"

[dependencies]
restgen = {{ path = "{}" }}
serde = {{ version = "1.0", features = ["derive"] }}

[workspace]
"#,
        runtime.display().to_string().replace('\\', "/")
    );
    fs::write(crate_dir.join("Cargo.toml"), manifest).unwrap();

    let output = Command::new("cargo")
        .arg("check")
        .arg("--quiet")
        .current_dir(&crate_dir)
        .output()
        .expect("Failed to run cargo check");

    assert!(
        output.status.success(),
        "cargo check failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
