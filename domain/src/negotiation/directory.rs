//! Static client relationship directory
//!
//! Companies are grouped by industry. Within an industry every listed
//! competitor competes with every other; partner and neutral links are
//! explicit pairs. All lookups are symmetric.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Pharmaceutical,
    Automotive,
    Technology,
    General,
}

/// A regulatory regime that applies to every client in an industry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    pub name: String,
    pub description: String,
    pub requirements: Vec<String>,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Pharmaceutical => "pharmaceutical",
            Industry::Automotive => "automotive",
            Industry::Technology => "technology",
            Industry::General => "general",
        }
    }

    /// Industries whose clients are treated as rivals of each other
    pub fn is_competitive(&self) -> bool {
        !matches!(self, Industry::General)
    }

    pub fn regulations(&self) -> Vec<Regulation> {
        let table: &[(&str, &str, &[&str])] = match self {
            Industry::Pharmaceutical => &[
                (
                    "fda_compliance",
                    "FDA approval for medical advertising and claims",
                    &["pre-approval review", "medical accuracy", "side effect disclosure"],
                ),
                (
                    "ema_compliance",
                    "European Medicines Agency regulations",
                    &["ema approval", "european standards", "multilingual compliance"],
                ),
                (
                    "competitive_intelligence",
                    "Protection of competitive information",
                    &[
                        "information segregation",
                        "confidentiality agreements",
                        "access controls",
                    ],
                ),
            ],
            Industry::Automotive => &[(
                "safety_regulations",
                "Automotive safety and advertising standards",
                &[
                    "safety claims validation",
                    "crash test compliance",
                    "emissions standards",
                ],
            )],
            Industry::Technology => &[(
                "data_privacy",
                "Data protection and privacy regulations",
                &["gdpr compliance", "data encryption", "user consent"],
            )],
            Industry::General => &[],
        };
        table
            .iter()
            .map(|(name, description, requirements)| Regulation {
                name: name.to_string(),
                description: description.to_string(),
                requirements: requirements.iter().map(|r| r.to_string()).collect(),
            })
            .collect()
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Competitor,
    Partner,
    Neutral,
}

struct IndustryEntry {
    industry: Industry,
    competitors: &'static [&'static str],
    partners: &'static [(&'static str, &'static str)],
    neutral: &'static [(&'static str, &'static str)],
}

const DIRECTORY: &[IndustryEntry] = &[
    IndustryEntry {
        industry: Industry::Pharmaceutical,
        competitors: &["pfizer", "novartis", "roche", "merck", "astrazeneca", "sanofi"],
        partners: &[
            ("pfizer", "biontech"),
            ("pfizer", "moderna"),
            ("novartis", "alcon"),
            ("novartis", "sandoz"),
            ("roche", "genentech"),
            ("roche", "ventana"),
        ],
        neutral: &[
            ("pfizer", "johnson-johnson"),
            ("pfizer", "abbott"),
            ("novartis", "johnson-johnson"),
            ("novartis", "abbott"),
            ("roche", "johnson-johnson"),
            ("roche", "abbott"),
        ],
    },
    IndustryEntry {
        industry: Industry::Automotive,
        competitors: &["toyota", "honda", "ford", "gm", "volkswagen"],
        partners: &[],
        neutral: &[],
    },
    IndustryEntry {
        industry: Industry::Technology,
        competitors: &["apple", "google", "microsoft", "amazon", "samsung"],
        partners: &[],
        neutral: &[],
    },
];

fn pair_matches(pair: &(&str, &str), a: &str, b: &str) -> bool {
    (pair.0 == a && pair.1 == b) || (pair.0 == b && pair.1 == a)
}

/// Every client name the directory knows, in directory order
pub fn known_clients() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for entry in DIRECTORY {
        let linked = entry
            .partners
            .iter()
            .chain(entry.neutral.iter())
            .flat_map(|(a, b)| [*a, *b]);
        for name in entry.competitors.iter().copied().chain(linked) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Industry a known client belongs to
pub fn industry_of(client: &str) -> Option<Industry> {
    DIRECTORY
        .iter()
        .find(|entry| {
            entry.competitors.contains(&client)
                || entry
                    .partners
                    .iter()
                    .chain(entry.neutral.iter())
                    .any(|(a, b)| *a == client || *b == client)
        })
        .map(|entry| entry.industry)
}

/// Symmetric relationship lookup; unrelated clients are neutral
pub fn relationship(a: &str, b: &str) -> (Relationship, Option<Industry>) {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    for entry in DIRECTORY {
        if a != b && entry.competitors.contains(&a.as_str()) && entry.competitors.contains(&b.as_str()) {
            return (Relationship::Competitor, Some(entry.industry));
        }
        if entry.partners.iter().any(|p| pair_matches(p, &a, &b)) {
            return (Relationship::Partner, Some(entry.industry));
        }
        if entry.neutral.iter().any(|p| pair_matches(p, &a, &b)) {
            return (Relationship::Neutral, Some(entry.industry));
        }
    }
    (Relationship::Neutral, None)
}

/// Known clients mentioned in free text, matched on whole words
pub fn discover_clients(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .collect();
    known_clients()
        .into_iter()
        .filter(|client| words.contains(client))
        .map(str::to_string)
        .collect()
}

/// Industry named in the text, else the industry of the first known client
pub fn detect_industry(text: &str, clients: &[String]) -> Industry {
    let lower = text.to_lowercase();
    for industry in [
        Industry::Pharmaceutical,
        Industry::Automotive,
        Industry::Technology,
    ] {
        if lower.contains(industry.as_str()) {
            return industry;
        }
    }
    clients
        .iter()
        .find_map(|c| industry_of(c))
        .unwrap_or(Industry::General)
}
