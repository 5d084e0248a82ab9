//! Command-line interface parsing for the unirate CLI
//!
//! This module handles parsing of CLI arguments using clap. Each subcommand
//! maps onto one client operation: directory reads, review listing and
//! submission, and suggestion-box submission.

use clap::{Parser, Subcommand};

/// Browse, review, and suggest universities from the terminal
#[derive(Parser, Debug)]
#[command(name = "unirate")]
#[command(about = "University directory, reviews, and suggestions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every university, ascending by name
    List,

    /// Show one university looked up by acronym (case-insensitive)
    Show {
        /// University acronym, e.g. "up" or "DLSU"
        acronym: String,
    },

    /// List reviews for a university, newest first
    Reviews {
        /// University acronym
        acronym: String,

        /// 1-based page to fetch; omit for the full listing
        #[arg(long)]
        page: Option<u32>,

        /// Rows per page when --page is given
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Submit a review for a university
    Review {
        /// University acronym
        acronym: String,

        /// Star rating from 1 to 5
        #[arg(long)]
        rating: u8,

        /// Review text
        #[arg(long)]
        comment: String,

        /// Author name; reviews without one show as "Anonymous"
        #[arg(long)]
        name: Option<String>,
    },

    /// Suggest a school missing from the directory
    Suggest {
        /// School name
        name: String,

        /// Where the school is, e.g. "Quezon City, Philippines"
        #[arg(long)]
        location: Option<String>,

        /// Short identifier, e.g. "UP", "UST", "DLSU"
        #[arg(long)]
        acronym: Option<String>,

        /// School website URL
        #[arg(long)]
        website: Option<String>,
    },
}
