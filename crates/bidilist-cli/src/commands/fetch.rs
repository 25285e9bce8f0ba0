use anyhow::Result;

use bidilist_core::{source::source_from_config, AppConfig};

pub async fn run(config: &AppConfig, page: u32, json: bool) -> Result<()> {
    let source = source_from_config(&config.source)?;
    let items = source.fetch_page(page, config.source.per_page).await?;
    tracing::info!(page, count = items.len(), source = %source.describe(), "Fetched page");

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("Page {} is empty.", page);
        return Ok(());
    }

    println!("Page {} from {} ({} items):\n", page, source.describe(), items.len());
    for item in &items {
        println!("  #{} {}", item.id, item.name);
        if !item.tagline.is_empty() {
            println!("    {}", item.tagline);
        }
    }

    Ok(())
}
