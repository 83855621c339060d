//! fiqh - offline question answering over a curated Islamic law knowledge base.
//!
//! A question is normalized, split into words and scored against every
//! catalog entry using direct key containment, partial token/key containment
//! and a hand-curated stem table. The best entry is returned only when its
//! score reaches the confidence threshold; otherwise the caller gets a
//! fallback listing known topics and external search links.
//!
//! # Quick start
//!
//! ```no_run
//! use fiqh::Knowledge;
//! use fiqh::answer::{self, Answer};
//!
//! let knowledge = Knowledge::bundled().unwrap();
//!
//! match answer::resolve("Как делать намаз?", &knowledge) {
//!     Answer::Offline { title, answer } => println!("{title}\n{answer}"),
//!     Answer::NotFound { message, topics, .. } => {
//!         println!("{message}");
//!         for topic in topics {
//!             println!("  - {topic}");
//!         }
//!     }
//! }
//! ```

pub mod answer;
pub mod catalog;
pub mod cli;
pub mod config_db;
pub mod data_dir;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod mcp;
pub mod stems;
pub mod text_util;

pub use catalog::{Catalog, CatalogEntry};
pub use config_db::ConfigDb;
pub use data_dir::DataDir;
pub use error::{Error, Result};
pub use knowledge::Knowledge;
pub use matcher::{MatchOutcome, Matcher, Weights, find_match};
pub use stems::{StemDictionary, StemRule};
