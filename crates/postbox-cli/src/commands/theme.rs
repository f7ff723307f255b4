use anyhow::{Result, bail};

use super::Runtime;

pub fn list(runtime: &Runtime) {
    let settings = runtime.settings();
    let active = settings.current_theme().id;
    for theme in settings.themes() {
        let marker = if theme.id == active { "*" } else { " " };
        let mode = if theme.is_dark() { "dark" } else { "light" };
        println!("{marker} {:<10} {:<14} {mode}", theme.id, theme.name);
    }
}

pub fn show(runtime: &Runtime) -> Result<()> {
    let theme = runtime.settings().current_theme();
    println!("{}", serde_json::to_string_pretty(&theme)?);
    Ok(())
}

pub async fn set(runtime: &Runtime, id: &str) -> Result<()> {
    if !runtime.settings().switch_theme(id).await? {
        bail!("Unknown theme '{id}' (see `postbox theme list`)");
    }
    println!("Theme set to {id}");
    Ok(())
}
