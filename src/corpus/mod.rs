//! FAQ corpus loading.
//!
//! The corpus is a JSON file of categories, each holding question/answer
//! pairs. It is read once at startup and flattened into retrievable units;
//! nothing here is mutated afterwards.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqDocument {
    pub categories: Vec<FaqCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqCategory {
    pub title: String,
    pub faqs: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// One embeddable FAQ unit. The content keeps the question inline so the
/// embedding captures both sides of the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievableUnit {
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub title: String,
    pub faq_count: usize,
}

impl FaqDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read FAQ corpus at {}", path.display()))?;
        let document: FaqDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed FAQ corpus at {}", path.display()))?;
        Ok(document)
    }

    /// Flattens every entry into a unit, preserving document order.
    pub fn to_units(&self) -> Vec<RetrievableUnit> {
        self.categories
            .iter()
            .flat_map(|category| {
                category.faqs.iter().map(move |faq| RetrievableUnit {
                    content: format!("سوال: {}\n{}", faq.question, faq.answer),
                    category: category.title.clone(),
                })
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|category| CategorySummary {
                title: category.title.clone(),
                faq_count: category.faqs.len(),
            })
            .collect()
    }

    pub fn unit_count(&self) -> usize {
        self.categories.iter().map(|c| c.faqs.len()).sum()
    }
}
