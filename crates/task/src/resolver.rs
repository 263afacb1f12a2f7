//! Target task resolution
//!
//! Maps an intent and an optional target onto the fixed, ordered list of task
//! identifiers that make up that run. Lists are built fresh per call and never
//! mutated afterwards.

use std::fmt;
use std::str::FromStr;
use taskwright_core::{
    BuildTarget, Error, Result, ServeTarget, Target, TargetPolicy, TaskId, TaskList, TestTarget,
};

/// Identifiers of the tasks the resolver emits
pub mod names {
    pub const SET_ENV_DEV: &str = "set-env:development";
    pub const SET_ENV_PROD: &str = "set-env:production";
    pub const START_SERVER_DEV: &str = "start-server:dev";
    pub const START_DEBUG_SERVER: &str = "start-debug-server";
    pub const WATCH_FILES: &str = "watch-files";
    pub const RUN_CONCURRENTLY: &str = "run-concurrently";

    pub const LINT_SERVER: &str = "lint:server";
    pub const LINT_CLIENT: &str = "lint:client";
    pub const RUN_SERVER_TESTS: &str = "run-server-tests";
    pub const RUN_BROWSER_TESTS: &str = "run-browser-tests";
    pub const RUN_E2E_TESTS: &str = "run-e2e-tests";

    pub const CLEAN: &str = "clean";
    pub const LESS: &str = "less";
    pub const COPY_HTML: &str = "copy:html";
    pub const COPY_DEV: &str = "copy:dev";
    pub const COPY_DIST: &str = "copy:dist";
    pub const BROWSERIFY: &str = "browserify";
    pub const NEWER: &str = "newer";

    pub const NG_ANNOTATE: &str = "ngAnnotate";
    pub const EXORCISE: &str = "exorcise";
    pub const HTML2JS: &str = "html2js";
    pub const CSSMIN: &str = "cssmin";
    pub const CONFIG_PROD: &str = "config-prod";
    /// Registered but disabled; release builds never emit it
    pub const UGLIFY: &str = "uglify";

    /// Tasks appended to every release build, in order
    pub const RELEASE_TASKS: [&str; 6] =
        [NG_ANNOTATE, EXORCISE, HTML2JS, CSSMIN, COPY_DIST, CONFIG_PROD];
}

/// Top-level command families and their shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Serve,
    Test,
    Build,
    /// Run an already built app: server plus watcher
    Start,
    Dist,
    Dev,
    Default,
    LiveEdit,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Serve => "serve",
            Intent::Test => "test",
            Intent::Build => "build",
            Intent::Start => "start",
            Intent::Dist => "dist",
            Intent::Dev => "dev",
            Intent::Default => "default",
            Intent::LiveEdit => "liveEdit",
        }
    }

    /// Whether the intent reads a target argument
    pub fn takes_target(&self) -> bool {
        matches!(self, Intent::Serve | Intent::Test | Intent::Build)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serve" => Ok(Intent::Serve),
            "test" => Ok(Intent::Test),
            "build" => Ok(Intent::Build),
            "start" => Ok(Intent::Start),
            "dist" => Ok(Intent::Dist),
            "dev" => Ok(Intent::Dev),
            "default" => Ok(Intent::Default),
            "liveEdit" | "live-edit" => Ok(Intent::LiveEdit),
            other => Err(Error::configuration(format!("unknown command '{other}'"))),
        }
    }
}

/// Resolves intents to task lists under a target policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    policy: TargetPolicy,
}

impl Resolver {
    pub fn new(policy: TargetPolicy) -> Self {
        Self { policy }
    }

    pub fn resolve(&self, intent: Intent, target: Option<&str>) -> Result<TaskList> {
        if !intent.takes_target() {
            if let Some(target) = target {
                tracing::debug!(intent = %intent, ignored = %target, "intent takes no target");
            }
        }

        match intent {
            Intent::Serve => self.resolve_serve(target),
            Intent::Test => self.resolve_test(target),
            Intent::Build => self.resolve_build(target),
            Intent::Start => Ok(start_tasks()),
            Intent::Dist => Ok(composite(Intent::Build, "dist")),
            Intent::Dev | Intent::Default => Ok(composite(Intent::Build, "dev")),
            Intent::LiveEdit => Ok(composite(Intent::Serve, "liveEdit")),
        }
    }

    pub fn resolve_serve(&self, target: Option<&str>) -> Result<TaskList> {
        Ok(serve_tasks(ServeTarget::resolve(target, self.policy)?))
    }

    pub fn resolve_test(&self, target: Option<&str>) -> Result<TaskList> {
        Ok(test_tasks(TestTarget::resolve(target, self.policy)?))
    }

    pub fn resolve_build(&self, target: Option<&str>) -> Result<TaskList> {
        let target = BuildTarget::resolve(target, self.policy)?;
        tracing::info!(build_target = %target, "TARGET = {target}");
        Ok(build_tasks(&target))
    }
}

/// Single-entry list naming another intent's composite, e.g. `build:dist`
fn composite(intent: Intent, target: &str) -> TaskList {
    [TaskId::with_arg(intent.as_str(), target)].into_iter().collect()
}

fn concurrent(group: &str) -> TaskId {
    TaskId::with_arg(names::RUN_CONCURRENTLY, group)
}

pub fn serve_tasks(target: ServeTarget) -> TaskList {
    use names::*;

    match target {
        ServeTarget::Dev => [
            TaskId::from("build:dev"),
            SET_ENV_DEV.into(),
            START_SERVER_DEV.into(),
            WATCH_FILES.into(),
        ]
        .into_iter()
        .collect(),
        ServeTarget::Debug => [SET_ENV_DEV.into(), concurrent("debug")].into_iter().collect(),
        ServeTarget::LiveEdit => [
            TaskId::from("build:liveEdit"),
            SET_ENV_DEV.into(),
            concurrent("liveEdit"),
            WATCH_FILES.into(),
        ]
        .into_iter()
        .collect(),
    }
}

pub fn test_tasks(target: TestTarget) -> TaskList {
    use names::*;

    match target {
        TestTarget::Server => [LINT_SERVER, SET_ENV_DEV, RUN_SERVER_TESTS].into_iter().collect(),
        TestTarget::Client => [LINT_CLIENT, SET_ENV_DEV, RUN_BROWSER_TESTS].into_iter().collect(),
        TestTarget::E2e => [START_SERVER_DEV, RUN_E2E_TESTS].into_iter().collect(),
        TestTarget::All => ["test:server", "test:client"].into_iter().collect(),
    }
}

pub fn build_tasks(target: &BuildTarget) -> TaskList {
    use names::*;

    let mut tasks: TaskList = if target.is_incremental() {
        [
            TaskId::with_arg(NEWER, LESS),
            TaskId::with_arg(NEWER, COPY_HTML),
            TaskId::with_arg(NEWER, COPY_DEV),
            BROWSERIFY.into(),
        ]
        .into_iter()
        .collect()
    } else {
        [
            TaskId::with_arg(CLEAN, target),
            LESS.into(),
            COPY_HTML.into(),
            COPY_DEV.into(),
            BROWSERIFY.into(),
        ]
        .into_iter()
        .collect()
    };

    if target.is_release() {
        for task in RELEASE_TASKS {
            tasks.push(task);
        }
    }

    tasks
}

pub fn start_tasks() -> TaskList {
    use names::*;

    [SET_ENV_DEV, START_SERVER_DEV, WATCH_FILES].into_iter().collect()
}
