use anyhow::Result;

use super::Context;

pub async fn run(context: &Context) -> Result<()> {
    match context.store.get(&context.config.storage.state_key).await? {
        Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
        None => eprintln!("No workspace has been analyzed yet."),
    }
    Ok(())
}
