//! Seed command - inserts the sample books

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::book::{seed_sample_books, SeedOutcome};
use crate::infrastructure::observability::init_logging;

/// Insert the sample books and report what happened to each
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let repository = crate::create_book_repository(&config).await?;
    let outcomes = seed_sample_books(repository.as_ref()).await?;

    for outcome in &outcomes {
        println!("{}", describe(outcome));
    }

    let created = outcomes
        .iter()
        .filter(|o| matches!(o, SeedOutcome::Created(_)))
        .count();
    info!(created, total = outcomes.len(), "Seeding finished");

    Ok(())
}

fn describe(outcome: &SeedOutcome) -> String {
    match outcome {
        SeedOutcome::Created(title) => format!("Created book: {}", title),
        SeedOutcome::AlreadyExists(title) => format!("Book already exists: {}", title),
    }
}
