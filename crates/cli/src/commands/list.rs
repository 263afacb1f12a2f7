use crate::commands::run::load_config;
use crate::commands::GlobalArgs;
use taskwright_core::Result;
use taskwright_task::TaskRegistry;

pub fn execute(global: &GlobalArgs, long: bool) -> Result<()> {
    let config = load_config(global)?;
    let registry = TaskRegistry::from_config(&config)?;

    let width = registry.iter().map(|t| t.id.len()).max().unwrap_or(0);
    for task in registry.iter() {
        match (&task.description, long) {
            (Some(description), true) => {
                println!("{:<width$}  {:<10}  {description}", task.id.as_str(), task.label())
            }
            _ => println!("{:<width$}  {}", task.id.as_str(), task.label()),
        }
    }

    if long {
        println!();
        println!("Composite tasks: build:<target>, serve:<target>, test:<target>");
        println!("Incremental runs: newer:<tool or copy task>");
    }
    Ok(())
}
