use crate::commands::{list, run, Commands, GlobalArgs};
use taskwright_core::Result;
use taskwright_task::{Intent, Resolver};

impl Commands {
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self {
            Commands::Serve { target } => run::execute_intent(global, Intent::Serve, target).await,
            Commands::Test { target } => run::execute_intent(global, Intent::Test, target).await,
            Commands::Build { target } => run::execute_intent(global, Intent::Build, target).await,
            Commands::Start => run::execute_intent(global, Intent::Start, None).await,
            Commands::Dist => run::execute_intent(global, Intent::Dist, None).await,
            Commands::Dev => run::execute_intent(global, Intent::Dev, None).await,
            Commands::Default => run::execute_intent(global, Intent::Default, None).await,
            Commands::LiveEdit => run::execute_intent(global, Intent::LiveEdit, None).await,

            Commands::Plan { intent, target } => {
                let intent: Intent = intent.parse()?;
                let config = run::load_config(global)?;
                let tasks = Resolver::new(config.target_policy())
                    .resolve(intent, target.as_deref())?;
                let (_, _, plan) = run::build_plan(config, &tasks)?;
                print!("{plan}");
                Ok(())
            }
            Commands::List { long } => list::execute(global, long),
            Commands::Run { tasks } => {
                run::execute_tasks(global, tasks.iter().map(String::as_str).collect()).await
            }
        }
    }
}
