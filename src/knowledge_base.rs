//! Knowledge base model
//!
//! A static three-level tree loaded once at startup from a JSON file:
//! sections contain topics, topics contain subtopics, and every subtopic
//! points to an article link.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur while loading the knowledge base
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    /// The file does not exist
    #[error("knowledge base file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON or lacks a `sections` array
    #[error("invalid knowledge base structure: {0}")]
    InvalidStructure(#[from] serde_json::Error),
}

/// Root of the tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Top-level sections in display order
    pub sections: Vec<Section>,
}

/// First level of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Button label and menu heading
    pub name: String,
    /// Topics of the section
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Second level of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Button label and menu heading
    pub title: String,
    /// Subtopics of the topic
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

/// Leaf of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    /// Button label
    pub title: String,
    /// Article URL
    #[serde(default)]
    pub link: Option<String>,
}

impl KnowledgeBase {
    /// Parses a knowledge base from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `InvalidStructure` if the JSON is malformed or has no `sections` array.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads the knowledge base from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub async fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KnowledgeBaseError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&content)
    }

    /// Loads the knowledge base, falling back to an empty tree on any error
    pub async fn load_or_empty(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(kb) => {
                info!(
                    "Knowledge base loaded from {} ({} sections).",
                    path.display(),
                    kb.sections.len()
                );
                kb
            }
            Err(e) => {
                error!("Failed to load knowledge base: {e}");
                Self::default()
            }
        }
    }

    /// Returns `true` if there is nothing to navigate
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section by index
    #[must_use]
    pub fn section(&self, section: usize) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Topic by section and topic index
    #[must_use]
    pub fn topic(&self, section: usize, topic: usize) -> Option<&Topic> {
        self.section(section)?.topics.get(topic)
    }

    /// Subtopic by full path
    #[must_use]
    pub fn subtopic(&self, section: usize, topic: usize, subtopic: usize) -> Option<&Subtopic> {
        self.topic(section, topic)?.subtopics.get(subtopic)
    }
}
