//! unirate - browse and review universities from the terminal
//!
//! Thin presentation layer over the directory, review, and suggestion
//! clients. All operations are single request/response round trips against
//! the hosted store; the university collection is served from a local
//! five-minute cache when possible.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use unirate::cli::{Cli, Command};
use unirate::config::StoreConfig;
use unirate::data::{
    DirectoryClient, NewReview, NewSuggestion, Page, ReviewsClient, StoreClient,
    SuggestionsClient, University,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let store = StoreClient::new(&config)?;
    let directory = DirectoryClient::new(store.clone());

    match cli.command {
        Command::List => {
            let universities = directory.all_universities().await?;
            if universities.is_empty() {
                println!("No universities found.");
                return Ok(ExitCode::SUCCESS);
            }
            for university in &universities {
                println!("{:<10} {}", university.acronym, university.name);
            }
        }

        Command::Show { acronym } => {
            let Some(university) = directory.university_by_acronym(&acronym).await? else {
                println!("University not found: {}", acronym);
                return Ok(ExitCode::FAILURE);
            };
            print_university(&university);
        }

        Command::Reviews {
            acronym,
            page,
            page_size,
        } => {
            let Some(university) = directory.university_by_acronym(&acronym).await? else {
                println!("University not found: {}", acronym);
                return Ok(ExitCode::FAILURE);
            };

            let reviews = ReviewsClient::new(store);
            let page = page.map(|number| Page::new(number, page_size));
            let listing = reviews.list_reviews(university.id, page).await?;

            if listing.is_empty() {
                println!("No reviews yet for {}.", university.name);
                return Ok(ExitCode::SUCCESS);
            }
            println!("Reviews for {}:", university.name);
            for review in &listing {
                println!();
                println!(
                    "{}  {}  {}",
                    stars(review.rating),
                    review.author_label(),
                    review.created_at.format("%Y-%m-%d")
                );
                println!("  {}", review.comment);
            }
        }

        Command::Review {
            acronym,
            rating,
            comment,
            name,
        } => {
            let Some(university) = directory.university_by_acronym(&acronym).await? else {
                println!("University not found: {}", acronym);
                return Ok(ExitCode::FAILURE);
            };

            let reviews = ReviewsClient::new(store);
            let review = NewReview {
                university_id: university.id,
                author_name: name,
                rating,
                comment,
            };
            let created = reviews.submit_review(&review).await?;
            println!(
                "Review submitted for {} ({} by {}).",
                university.name,
                stars(created.rating),
                created.author_label()
            );
        }

        Command::Suggest {
            name,
            location,
            acronym,
            website,
        } => {
            let suggestions = SuggestionsClient::new(store);
            let suggestion = NewSuggestion {
                name: name.clone(),
                location,
                acronym,
                website,
            };
            suggestions.submit_suggestion(&suggestion).await?;
            println!("Thanks! \"{}\" was submitted for review.", name);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Renders a rating as a five-star bar
fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_university(university: &University) {
    println!("{} ({})", university.name, university.acronym);
    if let Some(location) = &university.location {
        println!("  {}", location);
    }
    if let Some(website) = &university.website {
        println!("  {}", website);
    }
}
