use super::*;
use crate::plan::Planner;
use crate::resolver::Resolver;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use taskwright_config::{ProjectConfig, RuntimeOptions};
use taskwright_core::{TargetPolicy, TaskList};
use tempfile::TempDir;

/// Records invocations instead of starting processes
#[derive(Default)]
struct RecordingRunner {
    runs: Mutex<Vec<ToolInvocation>>,
    spawned: Mutex<Vec<ToolInvocation>>,
    exit_codes: HashMap<String, i32>,
}

impl RecordingRunner {
    fn failing(task: &str, code: i32) -> Self {
        Self {
            exit_codes: HashMap::from([(task.to_string(), code)]),
            ..Self::default()
        }
    }

    fn run_names(&self) -> Vec<String> {
        self.runs.lock().unwrap().iter().map(|i| i.task.to_string()).collect()
    }

    fn spawned_names(&self) -> Vec<String> {
        self.spawned.lock().unwrap().iter().map(|i| i.task.to_string()).collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<i32> {
        self.runs.lock().unwrap().push(invocation.clone());
        Ok(self.exit_codes.get(invocation.task.as_str()).copied().unwrap_or(0))
    }

    async fn spawn(&self, invocation: &ToolInvocation) -> Result<BackgroundProcess> {
        self.spawned.lock().unwrap().push(invocation.clone());
        Ok(BackgroundProcess::detached(invocation.task.clone()))
    }
}

struct Fixture {
    dir: TempDir,
    config: Arc<Config>,
    registry: Arc<TaskRegistry>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_project(ProjectConfig::default())
    }

    fn with_project(project: ProjectConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Arc::new(Config::new(dir.path(), project, RuntimeOptions::default()));
        let registry = Arc::new(TaskRegistry::from_config(&config).unwrap());
        Self {
            dir,
            config,
            registry,
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    async fn run(&self, runner: Arc<RecordingRunner>, tasks: &[&str]) -> Result<ExecutionReport> {
        let tasks: TaskList = tasks.iter().copied().collect();
        let plan =
            Planner::new(&self.registry, Resolver::new(TargetPolicy::Fallback)).plan(&tasks)?;
        TaskExecutor::new(self.config.clone(), self.registry.clone(), runner)
            .execute(&plan)
            .await
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[tokio::test]
async fn test_build_dev_runs_tools_and_builtins_in_order() {
    let fixture = Fixture::new();
    fixture.write("dev/stale.txt", "old");
    fixture.write("client/index.html", "<html></html>");
    fixture.write("client/assets/logo.png", "png");
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["build:dev"]).await.unwrap();

    assert_eq!(
        report.completed(),
        vec!["clean:dev", "less", "copy:html", "copy:dev", "browserify"]
    );
    assert_eq!(runner.run_names(), vec!["less", "browserify"]);
    assert!(!fixture.root().join("dev/stale.txt").exists());
    assert!(fixture.root().join("dev/public/index.html").exists());
    assert!(fixture.root().join("dev/public/assets/logo.png").exists());
}

#[tokio::test]
async fn test_tools_run_from_project_root() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    fixture.run(runner.clone(), &["less"]).await.unwrap();

    let runs = runner.runs.lock().unwrap();
    assert_eq!(runs[0].program, "npx");
    assert_eq!(runs[0].cwd, fixture.root());
    assert!(!runs[0].prefix_output);
}

#[tokio::test]
async fn test_node_env_reaches_later_tools_only() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    fixture
        .run(runner.clone(), &["lint:server", "set-env:production", "less"])
        .await
        .unwrap();

    let runs = runner.runs.lock().unwrap();
    assert_eq!(runs[0].env.get("NODE_ENV"), None);
    assert_eq!(runs[1].env.get("NODE_ENV").map(String::as_str), Some("production"));
}

#[tokio::test]
async fn test_first_failure_stops_the_run() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::failing("less", 2));

    let err = fixture.run(runner.clone(), &["build:dev"]).await.unwrap_err();

    assert_eq!(err.exit_code(), Some(2));
    assert!(err.to_string().contains("task 'less' failed"));
    assert_eq!(runner.run_names(), vec!["less"]);
    assert!(!fixture.root().join("dev/public").exists());
}

fn with_failure_hook() -> Fixture {
    let project: ProjectConfig = serde_json::from_str(
        r#"{ "notify": { "onFailure": { "program": "notify-send", "args": ["build failed"] } } }"#,
    )
    .unwrap();
    Fixture::with_project(project)
}

#[tokio::test]
async fn test_failure_hook_runs_after_a_failed_run() {
    let fixture = with_failure_hook();
    let runner = Arc::new(RecordingRunner::failing("browserify", 3));

    let err = fixture.run(runner.clone(), &["build:dev"]).await.unwrap_err();

    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(runner.run_names(), vec!["less", "browserify", "notify"]);
    let runs = runner.runs.lock().unwrap();
    let hook = &runs[2];
    assert_eq!(hook.program, "notify-send");
    assert_eq!(hook.args, vec!["build failed"]);
    assert_eq!(hook.env.get(FAILED_TASK_VAR).unwrap(), "browserify");
    assert!(hook.env.get(FAILURE_MESSAGE_VAR).unwrap().contains("task 'browserify' failed"));
}

#[tokio::test]
async fn test_failure_hook_is_skipped_on_success() {
    let fixture = with_failure_hook();
    let runner = Arc::new(RecordingRunner::default());

    fixture.run(runner.clone(), &["less"]).await.unwrap();

    assert_eq!(runner.run_names(), vec!["less"]);
}

#[tokio::test]
async fn test_failing_hook_keeps_the_original_error() {
    let fixture = with_failure_hook();
    let runner = Arc::new(RecordingRunner {
        exit_codes: HashMap::from([("less".to_string(), 2), ("notify".to_string(), 9)]),
        ..RecordingRunner::default()
    });

    let err = fixture.run(runner.clone(), &["less"]).await.unwrap_err();

    assert_eq!(err.exit_code(), Some(2));
    assert_eq!(runner.run_names(), vec!["less", "notify"]);
}

#[tokio::test]
async fn test_serve_dev_starts_server_in_background() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["serve:dev"]).await.unwrap();

    assert_eq!(runner.spawned_names(), vec!["start-server:dev"]);
    assert_eq!(runner.run_names(), vec!["less", "browserify", "watch-files"]);
    let server = report
        .timings
        .iter()
        .find(|t| t.task.as_str() == "start-server:dev")
        .unwrap();
    assert_eq!(server.outcome, TaskOutcome::Started);
    assert_eq!(
        runner.spawned.lock().unwrap()[0].env.get("NODE_ENV").map(String::as_str),
        Some("development")
    );
}

#[tokio::test]
async fn test_concurrent_group_runs_every_member_with_prefixed_output() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["serve:debug"]).await.unwrap();

    let mut names = runner.run_names();
    names.sort();
    assert_eq!(names, vec!["attach-inspector:custom", "start-debug-server"]);
    assert!(runner.runs.lock().unwrap().iter().all(|i| i.prefix_output));
    assert_eq!(
        report.completed(),
        vec!["set-env:development", "run-concurrently:debug"]
    );
}

#[tokio::test]
async fn test_concurrent_member_failure_fails_the_group() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::failing("attach-inspector:liveEdit", 1));

    let err = fixture
        .run(runner.clone(), &["run-concurrently:liveEdit"])
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(1));
    assert_eq!(runner.run_names().len(), 2);
}

#[tokio::test]
async fn test_disabled_tool_is_skipped() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["uglify"]).await.unwrap();

    assert!(runner.run_names().is_empty());
    assert_eq!(report.skipped(), vec!["uglify"]);
}

#[tokio::test]
async fn test_newer_skips_tool_with_fresh_outputs() {
    let fixture = Fixture::new();
    fixture.write("client/app/app.less", "body {}");
    fixture.write("dev/public/assets/app.css", "body{}");
    let now = SystemTime::now();
    set_mtime(
        &fixture.root().join("client/app/app.less"),
        now - std::time::Duration::from_secs(60),
    );
    set_mtime(&fixture.root().join("dev/public/assets/app.css"), now);
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["newer:less"]).await.unwrap();
    assert!(runner.run_names().is_empty());
    assert_eq!(report.skipped(), vec!["newer:less"]);

    set_mtime(
        &fixture.root().join("client/app/app.less"),
        now + std::time::Duration::from_secs(60),
    );
    fixture.run(runner.clone(), &["newer:less"]).await.unwrap();
    assert_eq!(runner.run_names(), vec!["less"]);
}

#[tokio::test]
async fn test_build_dist_copies_production_config() {
    let fixture = Fixture::new();
    fixture.write("server/config-prod.json", "{ \"port\": 80 }\n");
    fixture.write("client/index.html", "<html></html>");
    fixture.write("dist/old.js", "stale");
    let runner = Arc::new(RecordingRunner::default());

    let report = fixture.run(runner.clone(), &["build:dist"]).await.unwrap();

    assert_eq!(
        runner.run_names(),
        vec!["less", "browserify", "ngAnnotate", "exorcise", "html2js", "cssmin"]
    );
    assert_eq!(report.completed().last(), Some(&"config-prod"));
    assert!(!fixture.root().join("dist/old.js").exists());
    assert!(fixture.root().join("dist/public/index.html").exists());
    assert_eq!(
        fs::read_to_string(fixture.root().join("dist/server/config.json")).unwrap(),
        "{ \"port\": 80 }\n"
    );
}

#[tokio::test]
async fn test_missing_production_config_is_fatal() {
    let fixture = Fixture::new();
    let runner = Arc::new(RecordingRunner::default());

    let err = fixture.run(runner, &["config-prod"]).await.unwrap_err();

    assert!(matches!(err, Error::FileSystem { .. }));
}

#[tokio::test]
async fn test_tool_env_overrides_context_env() {
    let project: ProjectConfig = serde_json::from_str(
        r#"{ "tools": { "less": { "program": "lessc", "env": { "NODE_ENV": "test" } } } }"#,
    )
    .unwrap();
    let fixture = Fixture::with_project(project);
    let runner = Arc::new(RecordingRunner::default());

    fixture
        .run(runner.clone(), &["set-env:development", "less"])
        .await
        .unwrap();

    let runs = runner.runs.lock().unwrap();
    assert_eq!(runs[0].program, "lessc");
    assert_eq!(runs[0].env.get("NODE_ENV").map(String::as_str), Some("test"));
}
