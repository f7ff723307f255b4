use anyhow::Result;

use super::Runtime;

pub fn show(runtime: &Runtime) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&runtime.config)?);
    Ok(())
}

pub fn init(runtime: &Runtime) -> Result<()> {
    let config = runtime.config_service.ensure_config_file()?;
    println!("Config ready (backend: {})", config.api_base());
    Ok(())
}
