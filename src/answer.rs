use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::info;

use crate::{
    knowledge::Knowledge,
    matcher::MatchOutcome,
    text_util::{normalize, tokenize},
};

/// Label attached to answers served from the local catalog.
pub const SOURCE_LABEL: &str = "Ответ из базы знаний";

pub const NOT_FOUND_MESSAGE: &str = "Тема не найдена в базе знаний.";

pub const TOO_VAGUE_MESSAGE: &str =
    "Задайте, пожалуйста, более конкретный вопрос.";

/// External search engines offered when nothing matched.
const SEARCH_ENGINES: &[(&str, &str)] = &[
    ("IslamQA", "https://islamqa.info/ru/search?q="),
    ("Umma.ru", "https://umma.ru/?s="),
    ("Google", "https://www.google.com/search?q="),
];

/// What the caller gets back for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Answer {
    /// A catalog entry matched confidently.
    Offline { title: String, answer: String },
    /// Nothing matched; point the user at known topics and outside search.
    NotFound {
        message: String,
        topics: Vec<String>,
        links: Vec<SearchLink>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchLink {
    pub name: String,
    pub url: String,
}

/// Answer `question` from the catalog, or build the fallback.
pub fn resolve(question: &str, knowledge: &Knowledge) -> Answer {
    let matcher = knowledge.matcher();

    match matcher.find(question) {
        MatchOutcome::Match(entry) => {
            info!(title = %entry.title, "answered from catalog");
            Answer::Offline {
                title: entry.title.clone(),
                answer: entry.answer.clone(),
            }
        }
        MatchOutcome::NoMatch => {
            let normalized = normalize(question);
            let message = if tokenize(&normalized).is_empty() {
                TOO_VAGUE_MESSAGE
            } else {
                NOT_FOUND_MESSAGE
            };
            Answer::NotFound {
                message: message.to_string(),
                topics: knowledge.catalog.titles().map(str::to_string).collect(),
                links: search_links(question),
            }
        }
    }
}

/// Search URLs for `question`; empty when the question has no text.
pub fn search_links(question: &str) -> Vec<SearchLink> {
    let question = question.trim();
    if question.is_empty() {
        return Vec::new();
    }

    let encoded = utf8_percent_encode(question, NON_ALPHANUMERIC).to_string();
    SEARCH_ENGINES
        .iter()
        .map(|(name, base)| SearchLink {
            name: name.to_string(),
            url: format!("{base}{encoded}"),
        })
        .collect()
}

/// Render an answer for a terminal.
pub fn format_human(answer: &Answer) -> String {
    match answer {
        Answer::Offline { title, answer } => {
            format!("{title}\n\n{answer}\n\n({SOURCE_LABEL})")
        }
        Answer::NotFound {
            message,
            topics,
            links,
        } => {
            let mut lines = vec![message.clone(), String::new()];
            lines.push("Известные темы:".to_string());
            for topic in topics {
                lines.push(format!("  - {topic}"));
            }
            if !links.is_empty() {
                lines.push(String::new());
                lines.push("Поиск в интернете:".to_string());
                for link in links {
                    lines.push(format!("  {}: {}", link.name, link.url));
                }
            }
            lines.join("\n")
        }
    }
}

pub fn format_json(answer: &Answer) -> serde_json::Result<String> {
    serde_json::to_string(answer)
}
