//! Per-tool command configuration
//!
//! Each external tool the build delegates to is described by a [`ToolCommand`].
//! Overriding a tool in `taskwright.json` replaces its whole command; fields
//! left out of an override take the [`ToolCommand`] defaults, not the tool's.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use taskwright_core::{EnvironmentVariables, Error, Result};

/// Command line of one external tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolCommand {
    /// Program to execute, looked up on `PATH`
    pub program: String,
    pub args: Vec<String>,
    /// Working directory relative to the project root
    pub cwd: Option<PathBuf>,
    /// Extra environment for this tool only
    pub env: EnvironmentVariables,
    /// Globs the tool reads, used by `newer:` freshness checks
    pub inputs: Vec<String>,
    /// Globs the tool writes, used by `newer:` freshness checks
    pub outputs: Vec<String>,
    /// Keep running in the background instead of blocking the sequence
    pub background: bool,
    /// Disabled tools stay registered but never run
    pub enabled: bool,
    pub description: Option<String>,
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            cwd: None,
            env: EnvironmentVariables::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            background: false,
            enabled: true,
            description: None,
        }
    }
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Run a locally installed node package binary
    pub fn npx(args: &[&str]) -> Self {
        Self::new("npx", args)
    }

    /// Run a shell snippet, for tools that only speak stdin/stdout
    pub fn shell(script: &str) -> Self {
        Self::new("sh", &["-c", script])
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn inputs(mut self, globs: &[&str]) -> Self {
        self.inputs = globs.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn outputs(mut self, globs: &[&str]) -> Self {
        self.outputs = globs.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn in_background(mut self) -> Self {
        self.background = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.enabled && self.program.trim().is_empty() {
            return Err(Error::configuration(format!(
                "tool '{name}' is enabled but has no program"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub server: ToolCommand,
    pub client: ToolCommand,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            server: ToolCommand::npx(&["eslint", "server"]).describe("Lint server sources"),
            client: ToolCommand::npx(&["eslint", "client"]).describe("Lint client sources"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub dev: ToolCommand,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dev: ToolCommand::new("node", &["server/app.js"])
                .in_background()
                .describe("Development HTTP server"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectorConfig {
    pub custom: ToolCommand,
    pub live_edit: ToolCommand,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            custom: ToolCommand::npx(&["node-inspector", "--web-port=8080"])
                .describe("Debugger front end"),
            live_edit: ToolCommand::npx(&[
                "node-inspector",
                "--web-port=8080",
                "--save-live-edit=true",
            ])
            .describe("Debugger front end with live edit saving"),
        }
    }
}

/// Options for every external tool, keyed like the tasks that run them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsConfig {
    pub eslint: LintConfig,
    pub less: ToolCommand,
    pub browserify: ToolCommand,
    pub ng_annotate: ToolCommand,
    pub exorcise: ToolCommand,
    pub html2js: ToolCommand,
    pub cssmin: ToolCommand,
    pub uglify: ToolCommand,
    pub karma: ToolCommand,
    pub mocha_test: ToolCommand,
    pub protractor: ToolCommand,
    pub express: ServerConfig,
    pub nodemon: ToolCommand,
    pub node_inspector: InspectorConfig,
    pub watch: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            eslint: LintConfig::default(),
            less: ToolCommand::npx(&["lessc", "client/app/app.less", "dev/public/assets/app.css"])
                .inputs(&["client/**/*.less"])
                .outputs(&["dev/public/assets/app.css"])
                .describe("Compile stylesheets"),
            browserify: ToolCommand::npx(&[
                "browserify",
                "client/app/app.js",
                "--debug",
                "-o",
                "dev/public/assets/bundle.js",
            ])
            .inputs(&["client/**/*.js"])
            .outputs(&["dev/public/assets/bundle.js"])
            .describe("Bundle client scripts"),
            ng_annotate: ToolCommand::npx(&[
                "ng-annotate",
                "-a",
                "dev/public/assets/bundle.js",
                "-o",
                "dev/public/assets/bundle.js",
            ])
            .describe("Make AngularJS injections minification safe"),
            exorcise: ToolCommand::shell(
                "npx exorcist dev/public/assets/bundle.js.map \
                 < dev/public/assets/bundle.js > dev/public/assets/bundle.out.js \
                 && mv dev/public/assets/bundle.out.js dev/public/assets/bundle.js",
            )
            .describe("Extract source maps from the bundle"),
            html2js: ToolCommand::npx(&[
                "html2js",
                "client/app",
                "-o",
                "dev/public/assets/templates.js",
            ])
            .describe("Cache HTML templates"),
            cssmin: ToolCommand::npx(&[
                "cleancss",
                "-o",
                "dev/public/assets/app.css",
                "dev/public/assets/app.css",
            ])
            .describe("Minify stylesheets"),
            uglify: ToolCommand::npx(&[
                "uglifyjs",
                "dev/public/assets/bundle.js",
                "-o",
                "dev/public/assets/bundle.js",
            ])
            .disabled()
            .describe("Minify scripts"),
            karma: ToolCommand::npx(&["karma", "start", "karma.conf.js", "--single-run"])
                .describe("Run browser unit tests"),
            mocha_test: ToolCommand::npx(&["mocha", "--recursive", "server/**/*.spec.js"])
                .describe("Run server unit tests"),
            protractor: ToolCommand::npx(&["protractor", "protractor.conf.js"])
                .describe("Run end-to-end tests"),
            express: ServerConfig::default(),
            nodemon: ToolCommand::npx(&["nodemon", "--inspect", "server/app.js"])
                .describe("Restarting debug server"),
            node_inspector: InspectorConfig::default(),
            watch: ToolCommand::npx(&["chokidar", "client/**/*", "-c", "taskwright build liveEdit"])
                .describe("Rebuild on client changes"),
        }
    }
}

impl ToolsConfig {
    /// Every tool with the name of the task that runs it
    pub fn entries(&self) -> Vec<(&'static str, &ToolCommand)> {
        vec![
            ("lint:server", &self.eslint.server),
            ("lint:client", &self.eslint.client),
            ("less", &self.less),
            ("browserify", &self.browserify),
            ("ngAnnotate", &self.ng_annotate),
            ("exorcise", &self.exorcise),
            ("html2js", &self.html2js),
            ("cssmin", &self.cssmin),
            ("uglify", &self.uglify),
            ("run-browser-tests", &self.karma),
            ("run-server-tests", &self.mocha_test),
            ("run-e2e-tests", &self.protractor),
            ("start-server:dev", &self.express.dev),
            ("start-debug-server", &self.nodemon),
            ("attach-inspector:custom", &self.node_inspector.custom),
            ("attach-inspector:liveEdit", &self.node_inspector.live_edit),
            ("watch-files", &self.watch),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        self.entries()
            .into_iter()
            .try_for_each(|(name, tool)| tool.validate(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tools = ToolsConfig::default();
        tools.validate().unwrap();
        assert!(!tools.uglify.enabled);
        assert!(tools.express.dev.background);
    }

    #[test]
    fn test_enabled_tool_without_program_is_rejected() {
        let tool = ToolCommand::default();
        let err = tool.validate("less").unwrap_err();
        assert!(err.to_string().contains("tool 'less'"));

        assert!(ToolCommand::default().disabled().validate("less").is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_tools() {
        let json = r#"{ "less": { "program": "lessc", "args": ["a.less", "a.css"] } }"#;
        let tools: ToolsConfig = serde_json::from_str(json).unwrap();

        assert_eq!(tools.less.program, "lessc");
        assert_eq!(tools.less.args, vec!["a.less", "a.css"]);
        assert!(tools.less.enabled);
        assert!(tools.less.inputs.is_empty());
        assert_eq!(tools.browserify, ToolsConfig::default().browserify);
    }

    #[test]
    fn test_nested_sections_use_camel_case() {
        let json = r#"{ "nodeInspector": { "liveEdit": { "program": "inspect" } } }"#;
        let tools: ToolsConfig = serde_json::from_str(json).unwrap();

        assert_eq!(tools.node_inspector.live_edit.program, "inspect");
        assert_eq!(tools.node_inspector.custom, InspectorConfig::default().custom);
    }
}
