//! All-pairs policy conflict detection
//!
//! Every unordered pair of documents is checked by four independent
//! detectors. Each detector is symmetric in its two arguments, so the
//! aggregate does not depend on the order documents are supplied in.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// A policy or client requirement document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub id: String,
    pub name: String,
    pub content: String,
}

impl PolicyDocument {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    DirectContradiction,
    TimelineConflict,
    RequirementOverlap,
    ScopeAmbiguity,
}

impl ConflictType {
    pub const ALL: [ConflictType; 4] = [
        ConflictType::DirectContradiction,
        ConflictType::TimelineConflict,
        ConflictType::RequirementOverlap,
        ConflictType::ScopeAmbiguity,
    ];

    pub fn severity_weight(&self) -> f64 {
        match self {
            ConflictType::DirectContradiction => 0.9,
            ConflictType::TimelineConflict => 0.7,
            ConflictType::RequirementOverlap => 0.6,
            ConflictType::ScopeAmbiguity => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::DirectContradiction => "direct_contradiction",
            ConflictType::TimelineConflict => "timeline_conflict",
            ConflictType::RequirementOverlap => "requirement_overlap",
            ConflictType::ScopeAmbiguity => "scope_ambiguity",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
}

impl SeverityLevel {
    pub fn from_average(average: f64) -> Self {
        if average <= 0.3 {
            SeverityLevel::Low
        } else if average <= 0.7 {
            SeverityLevel::Medium
        } else {
            SeverityLevel::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub conflict_type: ConflictType,
    pub severity: f64,
    pub involved_entities: Vec<String>,
    pub description: String,
}

impl ConflictRecord {
    fn between(conflict_type: ConflictType, a: &PolicyDocument, b: &PolicyDocument, description: String) -> Self {
        Self {
            conflict_type,
            severity: conflict_type.severity_weight(),
            involved_entities: vec![a.id.clone(), b.id.clone()],
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictAssessment {
    pub conflicts: Vec<ConflictRecord>,
    pub counts_by_type: BTreeMap<ConflictType, usize>,
    pub total_severity: f64,
    pub average_severity: f64,
    pub severity_level: SeverityLevel,
}

impl ConflictAssessment {
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

struct ContradictionPattern {
    pattern: Regex,
    opposite: Regex,
}

static CONTRADICTIONS: LazyLock<Vec<ContradictionPattern>> = LazyLock::new(|| {
    [
        (r"(?i)must|required|mandatory", r"(?i)prohibited|forbidden|not allowed"),
        (r"(?i)approve|allow|permit", r"(?i)deny|reject|prohibit"),
        (r"(?i)\d+\s*day", r"(?i)immediate|instant|same\s*day"),
    ]
    .into_iter()
    .filter_map(|(pattern, opposite)| {
        Some(ContradictionPattern {
            pattern: Regex::new(pattern).ok()?,
            opposite: Regex::new(opposite).ok()?,
        })
    })
    .collect()
});

static DURATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(day|hour|week|month)").ok());

static SCOPE_QUALIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(all|any|every|some|certain|specific)\b").ok());

const REQUIREMENT_KEYWORDS: [&str; 5] =
    ["approval", "review", "authorization", "consent", "permission"];

/// Compare every unordered pair of documents
pub fn detect_conflicts(documents: &[PolicyDocument]) -> ConflictAssessment {
    let mut conflicts = Vec::new();
    for (i, a) in documents.iter().enumerate() {
        for b in &documents[i + 1..] {
            conflicts.extend(compare_pair(a, b));
        }
    }
    aggregate(conflicts)
}

/// Run the four detectors over one pair
pub fn compare_pair(a: &PolicyDocument, b: &PolicyDocument) -> Vec<ConflictRecord> {
    let mut found = Vec::new();

    for ContradictionPattern { pattern, opposite } in CONTRADICTIONS.iter() {
        let a_to_b = pattern.is_match(&a.content) && opposite.is_match(&b.content);
        let b_to_a = pattern.is_match(&b.content) && opposite.is_match(&a.content);
        if a_to_b || b_to_a {
            found.push(ConflictRecord::between(
                ConflictType::DirectContradiction,
                a,
                b,
                format!("Direct contradiction found between {} and {}", a.name, b.name),
            ));
        }
    }

    let (a_lower, b_lower) = (a.content.to_lowercase(), b.content.to_lowercase());
    for keyword in REQUIREMENT_KEYWORDS {
        if a_lower.contains(keyword) && b_lower.contains(keyword) {
            found.push(ConflictRecord::between(
                ConflictType::RequirementOverlap,
                a,
                b,
                format!("Both policies have {} requirements that may conflict", keyword),
            ));
        }
    }

    if let Some(duration) = DURATION.as_ref()
        && duration.is_match(&a.content)
        && duration.is_match(&b.content)
    {
        found.push(ConflictRecord::between(
            ConflictType::TimelineConflict,
            a,
            b,
            format!("Conflicting timelines found between {} and {}", a.name, b.name),
        ));
    }

    if let Some(scope) = SCOPE_QUALIFIER.as_ref()
        && scope.is_match(&a.content)
        && scope.is_match(&b.content)
    {
        found.push(ConflictRecord::between(
            ConflictType::ScopeAmbiguity,
            a,
            b,
            format!("Scope ambiguity between {} and {} may cause confusion", a.name, b.name),
        ));
    }

    found
}

fn aggregate(conflicts: Vec<ConflictRecord>) -> ConflictAssessment {
    let mut counts_by_type = BTreeMap::new();
    for conflict in &conflicts {
        *counts_by_type.entry(conflict.conflict_type).or_insert(0) += 1;
    }

    // Summed per type so the total is independent of record order.
    let total_severity: f64 = ConflictType::ALL
        .iter()
        .map(|t| counts_by_type.get(t).copied().unwrap_or(0) as f64 * t.severity_weight())
        .sum();
    let average_severity = if conflicts.is_empty() {
        0.0
    } else {
        total_severity / conflicts.len() as f64
    };

    ConflictAssessment {
        conflicts,
        counts_by_type,
        total_severity,
        average_severity,
        severity_level: SeverityLevel::from_average(average_severity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str) -> PolicyDocument {
        PolicyDocument::new(id, format!("Policy {}", id), content)
    }

    #[test]
    fn test_direct_contradiction() {
        let a = doc("a", "Legal sign-off is mandatory for every asset");
        let b = doc("b", "Third-party tools are prohibited for this brand");
        let conflicts = compare_pair(&a, &b);
        assert!(
            conflicts
                .iter()
                .any(|c| c.conflict_type == ConflictType::DirectContradiction)
        );
    }

    #[test]
    fn test_contradiction_is_detected_in_either_direction() {
        let a = doc("a", "Use is forbidden");
        let b = doc("b", "Disclosure is required");
        let forward = compare_pair(&a, &b);
        let backward = compare_pair(&b, &a);
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward[0].severity, 0.9);
    }

    #[test]
    fn test_requirement_overlap_per_keyword() {
        let a = doc("a", "Needs manager approval and legal review");
        let b = doc("b", "Client approval plus brand review");
        let overlaps: Vec<_> = compare_pair(&a, &b)
            .into_iter()
            .filter(|c| c.conflict_type == ConflictType::RequirementOverlap)
            .collect();
        assert_eq!(overlaps.len(), 2);
        assert!(overlaps.iter().all(|c| c.severity == 0.6));
    }

    #[test]
    fn test_timeline_conflict() {
        let a = doc("a", "Responses within 2 weeks");
        let b = doc("b", "Escalate in 48 hours");
        let timeline: Vec<_> = compare_pair(&a, &b)
            .into_iter()
            .filter(|c| c.conflict_type == ConflictType::TimelineConflict)
            .collect();
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_scope_qualifiers_match_whole_words() {
        let a = doc("a", "Allowances are tracked");
        let b = doc("b", "Specific vendors only");
        assert!(
            !compare_pair(&a, &b)
                .iter()
                .any(|c| c.conflict_type == ConflictType::ScopeAmbiguity)
        );

        let a = doc("a", "Applies to all campaigns");
        assert!(
            compare_pair(&a, &b)
                .iter()
                .any(|c| c.conflict_type == ConflictType::ScopeAmbiguity)
        );
    }

    #[test]
    fn test_no_documents_or_single_document() {
        assert_eq!(detect_conflicts(&[]).conflict_count(), 0);
        let single = detect_conflicts(&[doc("a", "must be approved")]);
        assert_eq!(single.conflict_count(), 0);
        assert_eq!(single.average_severity, 0.0);
        assert_eq!(single.severity_level, SeverityLevel::Low);
    }

    #[test]
    fn test_symmetry() {
        let p1 = doc("p1", "All AI output must receive legal approval within 5 days");
        let p2 = doc("p2", "Generative tools are prohibited; any approval is immediate");
        let forward = detect_conflicts(&[p1.clone(), p2.clone()]);
        let backward = detect_conflicts(&[p2, p1]);
        assert_eq!(forward.conflict_count(), backward.conflict_count());
        assert_eq!(forward.total_severity, backward.total_severity);
        assert_eq!(forward.average_severity, backward.average_severity);
    }

    #[test]
    fn test_symmetry_over_three_documents() {
        let docs = vec![
            doc("a", "Client approval required within 3 days"),
            doc("b", "Use of stock imagery is forbidden for all campaigns"),
            doc("c", "Any review happens same day"),
        ];
        let mut reversed = docs.clone();
        reversed.reverse();
        let forward = detect_conflicts(&docs);
        let backward = detect_conflicts(&reversed);
        assert_eq!(forward.conflict_count(), backward.conflict_count());
        assert_eq!(forward.average_severity, backward.average_severity);
        assert_eq!(forward.counts_by_type, backward.counts_by_type);
    }

    #[test]
    fn test_average_and_level() {
        let a = doc("a", "All vendors");
        let b = doc("b", "Some vendors");
        let assessment = detect_conflicts(&[a, b]);
        assert_eq!(assessment.conflict_count(), 1);
        assert_eq!(assessment.average_severity, 0.4);
        assert_eq!(assessment.severity_level, SeverityLevel::Medium);
    }

    #[test]
    fn test_severity_level_thresholds() {
        assert_eq!(SeverityLevel::from_average(0.3), SeverityLevel::Low);
        assert_eq!(SeverityLevel::from_average(0.7), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::from_average(0.71), SeverityLevel::High);
    }
}
