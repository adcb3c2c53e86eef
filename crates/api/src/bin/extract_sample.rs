use anyhow::Result;
use api::{config::CONFIG_FILE, AppConfig};
use extract::Extractor;
use std::path::Path;
use store::JsonStore;

const SAMPLE_TEXT: &str = "
    Rs 554.50 debited from your account via UPI to INDIANRAILWAYCA848140
    on 01 Apr at 18:23. Avl Bal: 7827.12
    ";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load(Path::new(CONFIG_FILE))?;
    let extractor = Extractor::new(config.llm.build_client()?);
    let store = JsonStore::new(config.store.path.clone());

    let extraction = extractor.extract_from_text(SAMPLE_TEXT).await?;
    println!("\nLLM OUTPUT:\n{}", extraction.reply);

    println!(
        "\nConverted to record:\n{}",
        serde_json::to_string_pretty(&extraction.record)?
    );

    let total = store.append(&extraction.record).await?;
    println!("\n✔ Saved transaction to {} ({} total)", store.path().display(), total);

    Ok(())
}
