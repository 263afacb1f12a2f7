use clap::{ArgAction, Args, Subcommand};
use std::path::PathBuf;

pub mod list;
pub mod run;

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Read settings from this file instead of <root>/taskwright.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print the tasks that would run without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Fail on unrecognized targets instead of using the default one
    #[arg(long, global = true)]
    pub strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build, then run the application (dev, debug, liveEdit)
    Serve {
        /// Serve target; unknown targets fall back to dev
        target: Option<String>,
    },

    /// Lint and run the test suites (server, client, e2e)
    Test {
        /// Test target; without one both server and client suites run
        target: Option<String>,
    },

    /// Build the application (dev, dist, liveEdit or a release name)
    Build {
        /// Build target; any other name is built like dist
        target: Option<String>,
    },

    /// Start the development server without building
    Start,

    /// Shortcut for `build dist`
    Dist,

    /// Shortcut for `build dev`
    Dev,

    /// Shortcut for `build dev`; runs when no command is given
    Default,

    /// Shortcut for `serve liveEdit`
    #[command(name = "live-edit", visible_alias = "liveEdit")]
    LiveEdit,

    /// Show the expanded plan for a command without running it
    Plan {
        /// Command to expand (serve, test, build, start, dist, dev, default, liveEdit)
        intent: String,

        /// Target passed to the command
        target: Option<String>,
    },

    /// List every registered task
    #[command(visible_alias = "ls")]
    List {
        /// Show descriptions
        #[arg(short, long)]
        long: bool,
    },

    /// Run tasks by identifier, e.g. `run lint:client newer:less`
    Run {
        #[arg(required = true, value_name = "TASK")]
        tasks: Vec<String>,
    },
}
