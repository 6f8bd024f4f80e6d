//! View models rendered by the board endpoints.

use scraper::Html;
use serde::Serialize;

use crate::board::orchestrator::SearchStatus;
use crate::board::pagination::PageInfo;
use crate::models::{Application, Listing};

pub const NO_JOBS_MESSAGE: &str = "No Jobs Found";
pub const NO_DATA_MESSAGE: &str = "No data available";
pub const NO_APPLICATIONS_MESSAGE: &str = "No applications submitted.";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const ALREADY_APPLIED_MESSAGE: &str = "You have already applied for this job!";

/// Words shown in a collapsed job description.
pub const DESCRIPTION_PREVIEW_WORDS: usize = 75;

/// Category filter options offered by the search form, `(value, label)`.
pub const CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("all", "All Categories"),
    ("customer-support", "Customer Service"),
    ("data", "Data Analysis"),
    ("design", "Design"),
    ("finance-legal", "Finance / Legal"),
    ("hr", "Human Resources"),
    ("marketing", "Marketing"),
    ("qa", "QA"),
    ("sales-business", "Sales / Business"),
    ("software-dev", "Software Development"),
    ("writing", "Writing"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    pub id: i64,
    pub title: String,
    pub company_name: String,
    pub category: String,
    pub location: String,
}

impl From<&Listing> for JobCard {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            company_name: listing.company_name.clone(),
            category: listing.category.clone(),
            location: listing.required_location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardPage {
    pub query: String,
    pub category: String,
    pub search: SearchStatus,
    pub pagination: PageInfo,
    pub jobs: Vec<JobCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub categories: Vec<CategoryOption>,
}

impl BoardPage {
    pub fn new(
        query: String,
        category: String,
        search: SearchStatus,
        pagination: PageInfo,
        visible: &[Listing],
    ) -> Self {
        let message = (pagination.total_items == 0).then_some(NO_JOBS_MESSAGE);
        Self {
            query,
            category,
            search,
            pagination,
            jobs: visible.iter().map(JobCard::from).collect(),
            message,
            categories: CATEGORY_OPTIONS
                .iter()
                .map(|&(value, label)| CategoryOption { value, label })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub id: i64,
    pub title: String,
    pub company_name: String,
    pub category: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub description: String,
    /// True when the description is longer than the collapsed preview.
    pub has_more: bool,
    pub expanded: bool,
}

impl JobDetail {
    pub fn new(listing: &Listing, expanded: bool) -> Self {
        let cleaned = listing.description.as_deref().map(strip_html);
        let word_count = cleaned
            .as_deref()
            .map(|d| d.split_whitespace().count())
            .unwrap_or(0);
        let has_more = word_count > DESCRIPTION_PREVIEW_WORDS;

        let description = match cleaned {
            None => NO_DESCRIPTION.to_string(),
            Some(text) if text.trim().is_empty() => NO_DESCRIPTION.to_string(),
            Some(text) if expanded || !has_more => text,
            Some(text) => {
                let preview: Vec<&str> = text
                    .split_whitespace()
                    .take(DESCRIPTION_PREVIEW_WORDS)
                    .collect();
                format!("{}...", preview.join(" "))
            }
        };

        Self {
            id: listing.id,
            title: listing.title.clone(),
            company_name: listing.company_name.clone(),
            category: listing.category.clone(),
            location: listing.required_location.clone(),
            salary: listing.salary.clone(),
            description,
            has_more,
            expanded,
        }
    }
}

/// Removes all markup, keeping text content. Entities are decoded.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAnalysis {
    pub counts: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl CategoryAnalysis {
    /// Counts listings per category in order of first appearance. Listings with
    /// an empty category are skipped.
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for listing in listings.iter().filter(|l| !l.category.is_empty()) {
            match counts.iter_mut().find(|c| c.category == listing.category) {
                Some(entry) => entry.count += 1,
                None => counts.push(CategoryCount {
                    category: listing.category.clone(),
                    count: 1,
                }),
            }
        }

        let message = counts.is_empty().then_some(NO_DATA_MESSAGE);
        Self { counts, message }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedList {
    pub applications: Vec<Application>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl AppliedList {
    pub fn new(applications: Vec<Application>) -> Self {
        let message = applications.is_empty().then_some(NO_APPLICATIONS_MESSAGE);
        Self {
            applications,
            message,
        }
    }
}
