//! Stateless market search
//!
//! Six read-only lookups. Results are a pure function of the query text and
//! limit; nothing is persisted between requests.

use crate::{check_len, CoreError, CoreResult};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MAX_QUERY_LEN: usize = 200;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

text_enum! {
    pub enum SearchKind as "search kind" {
        Competitors => "competitors",
        Market => "market",
        Reviews => "reviews",
        Regulations => "regulations",
        Technology => "technology",
        Profitability => "profitability",
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: &str, limit: Option<i64>) -> CoreResult<Self> {
        check_len("q", text, 1, Some(MAX_QUERY_LEN))?;

        let limit = limit.unwrap_or(DEFAULT_LIMIT as i64);
        if !(1..=MAX_LIMIT as i64).contains(&limit) {
            return Err(CoreError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        Ok(Self {
            text: text.to_string(),
            limit: limit as usize,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorHit {
    pub name: String,
    pub description: String,
    pub website: String,
    pub market_share: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketHit {
    pub industry: String,
    pub market_size: String,
    pub growth_rate: String,
    pub key_players: Vec<String>,
    pub trends: Vec<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewHit {
    pub source: String,
    pub rating: f32,
    pub content: String,
    pub sentiment: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulationHit {
    pub title: String,
    pub description: String,
    pub authority: String,
    pub requirements: Vec<String>,
    pub penalties: String,
    pub effective_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyHit {
    pub technology: String,
    pub description: String,
    pub adoption_rate: String,
    pub key_players: Vec<String>,
    pub future_outlook: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityHit {
    pub industry: String,
    pub average_margin: String,
    pub roi_benchmark: String,
    pub cost_structure: BTreeMap<String, String>,
    pub success_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    Competitor(CompetitorHit),
    Market(MarketHit),
    Review(ReviewHit),
    Regulation(RegulationHit),
    Technology(TechnologyHit),
    Profitability(ProfitabilityHit),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Hits before truncation to the requested limit
    pub total: usize,
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn truncated(query: &SearchQuery, mut hits: Vec<SearchHit>) -> Self {
        let total = hits.len();
        hits.truncate(query.limit);
        Self {
            query: query.text.clone(),
            total,
            results: hits,
        }
    }
}

/// External search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, kind: SearchKind, query: &SearchQuery) -> CoreResult<SearchResponse>;
}

/// Returns fixed templates with the query text substituted in
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateSearch;

impl TemplateSearch {
    pub fn hits(kind: SearchKind, q: &str) -> Vec<SearchHit> {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match kind {
            SearchKind::Competitors => vec![
                SearchHit::Competitor(CompetitorHit {
                    name: format!("{q} competitor A"),
                    description: "Market leader with strong brand awareness".to_string(),
                    website: "https://example-a.com".to_string(),
                    market_share: "35%".to_string(),
                    strengths: strings(&["Brand awareness", "Large user base", "Technology"]),
                    weaknesses: strings(&["High price", "Slow innovation"]),
                }),
                SearchHit::Competitor(CompetitorHit {
                    name: format!("{q} competitor B"),
                    description: "Fast-growing startup".to_string(),
                    website: "https://example-b.com".to_string(),
                    market_share: "15%".to_string(),
                    strengths: strings(&["Innovative technology", "Reasonable pricing"]),
                    weaknesses: strings(&["Low brand awareness", "Limited resources"]),
                }),
            ],
            SearchKind::Market => vec![SearchHit::Market(MarketHit {
                industry: q.to_string(),
                market_size: "$12B".to_string(),
                growth_rate: "12.5%".to_string(),
                key_players: strings(&["Company A", "Company B", "Company C"]),
                trends: strings(&["Digital transformation", "AI adoption", "Subscription models"]),
                source: "Industry research institute".to_string(),
            })],
            SearchKind::Reviews => vec![
                SearchHit::Review(ReviewHit {
                    source: "App Store".to_string(),
                    rating: 4.5,
                    content: format!("The {q} service is really useful. Easy to use and accurate."),
                    sentiment: "positive".to_string(),
                    keywords: strings(&["useful", "easy", "accurate"]),
                }),
                SearchHit::Review(ReviewHit {
                    source: "Google Play".to_string(),
                    rating: 3.0,
                    content: "Good features but a bit expensive.".to_string(),
                    sentiment: "neutral".to_string(),
                    keywords: strings(&["features", "price"]),
                }),
            ],
            SearchKind::Regulations => vec![SearchHit::Regulation(RegulationHit {
                title: format!("Regulations for the {q} industry"),
                description: "Key rules businesses in this industry must follow.".to_string(),
                authority: "Relevant ministries".to_string(),
                requirements: strings(&["Licensing", "Periodic reporting", "Safety standards"]),
                penalties: "Fines on violation".to_string(),
                effective_date: "2024-01-01".to_string(),
            })],
            SearchKind::Technology => vec![SearchHit::Technology(TechnologyHit {
                technology: q.to_string(),
                description: format!(
                    "{q} is developing quickly and is being applied across industries."
                ),
                adoption_rate: "35%".to_string(),
                key_players: strings(&["OpenAI", "Google", "Microsoft"]),
                future_outlook: "Market expected to triple over five years".to_string(),
            })],
            SearchKind::Profitability => vec![SearchHit::Profitability(ProfitabilityHit {
                industry: q.to_string(),
                average_margin: "15-25%".to_string(),
                roi_benchmark: "18%".to_string(),
                cost_structure: [
                    ("labor", "40%"),
                    ("marketing", "20%"),
                    ("infrastructure", "15%"),
                    ("other", "25%"),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
                success_factors: strings(&[
                    "Lower customer acquisition cost",
                    "Better retention",
                    "Operational efficiency",
                ]),
            })],
        }
    }
}

#[async_trait]
impl SearchProvider for TemplateSearch {
    fn name(&self) -> &'static str {
        "template-search"
    }

    async fn search(&self, kind: SearchKind, query: &SearchQuery) -> CoreResult<SearchResponse> {
        let hits = Self::hits(kind, &query.text);
        Ok(SearchResponse::truncated(query, hits))
    }
}
