use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

struct TestFixture {
    root: PathBuf,
}

impl TestFixture {
    fn new(prefix: &str, deps_json: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(&root).expect("create fixture dir");
        fs::write(root.join("deps.json"), deps_json).expect("write deps fixture");
        Self { root }
    }

    fn run(&self, args: &[&str]) -> std::process::Output {
        let mut cmd = Command::new(pipgraph_bin());
        cmd.arg("--input").arg(self.root.join("deps.json")).args(args);
        cmd.output().expect("run pipgraph")
    }

    fn run_json(&self, args: &[&str]) -> Vec<String> {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "pipgraph {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("parse json list")
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn pipgraph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_pipgraph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "pipgraph.exe"
    } else {
        "pipgraph"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_pipgraph is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("pipgraph-{prefix}-{pid}-{nanos}"))
}

const WORKSPACE_DEPS: &str = r#"[
  {"package": {"key": "app", "package_name": "App"},
   "dependencies": [{"key": "lib"}, {"key": "core"}]},
  {"package": {"key": "lib", "package_name": "Lib"},
   "dependencies": [{"key": "core"}]},
  {"package": {"key": "core", "package_name": "Core"}, "dependencies": []},
  {"package": {"key": "island", "package_name": "Island"}, "dependencies": []}
]"#;

#[test]
fn deps_lists_what_a_package_needs() {
    let fixture = TestFixture::new("deps", WORKSPACE_DEPS);
    assert_eq!(fixture.run_json(&["deps", "app", "--json"]), vec!["core", "lib"]);
    assert_eq!(fixture.run_json(&["deps", "lib", "--json"]), vec!["core"]);
    assert!(fixture.run_json(&["deps", "core", "--json"]).is_empty());
}

#[test]
fn dependents_lists_what_needs_a_package() {
    let fixture = TestFixture::new("dependents", WORKSPACE_DEPS);
    assert_eq!(
        fixture.run_json(&["dependents", "core", "--json"]),
        vec!["app", "lib"]
    );
    assert_eq!(
        fixture.run_json(&["dependents", "lib", "--json"]),
        vec!["app"]
    );
    assert!(fixture.run_json(&["dependents", "app", "--json"]).is_empty());
}

#[test]
fn deps_prints_a_headed_list_without_json() {
    let fixture = TestFixture::new("deps-plain", WORKSPACE_DEPS);
    let output = fixture.run(&["deps", "app"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "dependencies of app:\ncore\nlib\n");
}

#[test]
fn unknown_package_is_an_error() {
    let fixture = TestFixture::new("unknown-package", WORKSPACE_DEPS);
    let output = fixture.run(&["deps", "nonexistent"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown package nonexistent"), "{stderr}");
}

#[test]
fn orphans_reports_only_fully_disconnected_packages() {
    let fixture = TestFixture::new("orphans", WORKSPACE_DEPS);
    assert_eq!(fixture.run_json(&["orphans", "--json"]), vec!["island"]);
}

#[test]
fn cyclic_dependencies_are_preserved_not_rejected() {
    let fixture = TestFixture::new(
        "cycle",
        r#"[
  {"package": {"key": "a", "package_name": "A"}, "dependencies": [{"key": "b"}]},
  {"package": {"key": "b", "package_name": "B"}, "dependencies": [{"key": "a"}]}
]"#,
    );
    assert_eq!(fixture.run_json(&["deps", "a", "--json"]), vec!["b"]);
    assert_eq!(fixture.run_json(&["deps", "b", "--json"]), vec!["a"]);
    assert_eq!(fixture.run_json(&["dependents", "a", "--json"]), vec!["b"]);
    let orphans = fixture.run_json(&["orphans", "--json"]);
    assert!(orphans.is_empty());
}

#[test]
fn dropped_references_are_warned_about_unless_quiet() {
    let fixture = TestFixture::new(
        "dropped-warn",
        r#"[
  {"package": {"key": "c", "package_name": "C"}, "dependencies": [{"key": "missing"}]}
]"#,
    );

    let output = fixture.run(&["orphans", "--json"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dropped 1 dependency reference"), "{stderr}");

    let quiet = fixture.run(&["--quiet", "orphans", "--json"]);
    assert!(quiet.status.success());
    assert!(quiet.stderr.is_empty());
    let orphans: Vec<String> = serde_json::from_slice(&quiet.stdout).expect("parse orphans");
    assert_eq!(orphans, vec!["c"]);
}
