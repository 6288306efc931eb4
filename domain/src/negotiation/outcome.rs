//! Multi-client negotiation
//!
//! Maps the relationships between the clients a request serves, derives
//! the policy conflicts those relationships imply, and proposes a
//! compromise with a feasibility verdict.

use crate::agent::outcome::DecisionLabel;
use crate::negotiation::directory::{
    Industry, Regulation, Relationship, detect_industry, discover_clients, relationship,
};
use crate::negotiation::tool::{ToolInfo, ToolKind, detect_tool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const COMPETITOR_SEVERITY: f64 = 0.9;
const REGULATORY_SEVERITY: f64 = 0.8;
const BRAND_SEVERITY: f64 = 0.7;
const TIMELINE_SEVERITY: f64 = 0.5;

const DEADLINE_SIGNALS: [&str; 5] = ["deadline", "launch", "urgent", "asap", "same week"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientAnalysis {
    pub clients: Vec<String>,
    pub industry: Industry,
    pub tool: ToolInfo,
}

impl ClientAnalysis {
    pub fn from_text(text: &str) -> Self {
        let clients = discover_clients(text);
        Self {
            industry: detect_industry(text, &clients),
            tool: detect_tool(text),
            clients,
        }
    }

    pub fn has_multiple_clients(&self) -> bool {
        self.clients.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPair {
    pub first: String,
    pub second: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationRisk {
    Low,
    Medium,
    High,
}

impl NegotiationRisk {
    pub fn from_max_severity(severity: f64) -> Self {
        if severity > 0.8 {
            NegotiationRisk::High
        } else if severity > 0.5 {
            NegotiationRisk::Medium
        } else {
            NegotiationRisk::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMap {
    pub competitors: Vec<ClientPair>,
    pub partners: Vec<ClientPair>,
    pub neutral: Vec<ClientPair>,
    pub risk_level: NegotiationRisk,
}

impl RelationshipMap {
    pub fn for_clients(clients: &[String]) -> Self {
        let mut map = Self {
            competitors: Vec::new(),
            partners: Vec::new(),
            neutral: Vec::new(),
            risk_level: NegotiationRisk::Low,
        };

        for (i, first) in clients.iter().enumerate() {
            for second in &clients[i + 1..] {
                let (kind, industry) = relationship(first, second);
                let pair = ClientPair {
                    first: first.clone(),
                    second: second.clone(),
                    industry,
                };
                match kind {
                    Relationship::Competitor => map.competitors.push(pair),
                    Relationship::Partner => map.partners.push(pair),
                    Relationship::Neutral => map.neutral.push(pair),
                }
            }
        }

        if !map.competitors.is_empty() {
            map.risk_level = NegotiationRisk::from_max_severity(COMPETITOR_SEVERITY);
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationConflictKind {
    CompetitiveIntelligence,
    Regulatory,
    BrandGuidelines,
    Timeline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationConflict {
    pub kind: NegotiationConflictKind,
    pub severity: f64,
    pub description: String,
    pub affected_clients: Vec<String>,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    Feasible,
    Challenging,
    Infeasible,
}

impl Feasibility {
    /// `<= 3` feasible, `<= 5` challenging, otherwise infeasible
    pub fn from_conflict_count(count: usize) -> Self {
        match count {
            0..=3 => Feasibility::Feasible,
            4..=5 => Feasibility::Challenging,
            _ => Feasibility::Infeasible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    InformationSegregation,
    RegulatoryCompliance,
    BrandSeparation,
    StaggeredDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompromiseRequirement {
    pub kind: RequirementKind,
    pub description: String,
    pub implementation: Vec<String>,
}

impl CompromiseRequirement {
    fn for_conflict(kind: NegotiationConflictKind) -> Self {
        let (kind, description, implementation): (RequirementKind, &str, &[&str]) = match kind {
            NegotiationConflictKind::CompetitiveIntelligence => (
                RequirementKind::InformationSegregation,
                "Strict separation of client information and competitive intelligence",
                &[
                    "Separate project workspaces for each client",
                    "Dedicated team members per client",
                    "Confidentiality agreements for all team members",
                    "Access controls and audit trails",
                ],
            ),
            NegotiationConflictKind::Regulatory => (
                RequirementKind::RegulatoryCompliance,
                "Highest common denominator compliance approach",
                &[
                    "Apply most stringent regulatory requirements across all clients",
                    "Pre-approval review for all content",
                    "Legal review for compliance with all applicable regulations",
                    "Regular compliance audits and reporting",
                ],
            ),
            NegotiationConflictKind::BrandGuidelines => (
                RequirementKind::BrandSeparation,
                "Clear brand separation and distinct visual identities",
                &[
                    "Distinct visual styles for each client",
                    "Separate brand guidelines and style guides",
                    "Clear attribution and branding requirements",
                    "Pre-approval of all visual elements",
                ],
            ),
            NegotiationConflictKind::Timeline => (
                RequirementKind::StaggeredDelivery,
                "Staggered delivery and priority management",
                &[
                    "Agree delivery order with each client",
                    "Separate review windows per client",
                ],
            ),
        };
        Self {
            kind,
            description: description.to_string(),
            implementation: implementation.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompromiseSolution {
    /// "compromise" or "escalation_required"
    pub approach: String,
    pub feasibility: Feasibility,
    pub requirements: Vec<CompromiseRequirement>,
    pub escalation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRequirements {
    pub specific_requirements: Vec<String>,
    pub guardrails: Vec<String>,
    pub approvals_required: Vec<String>,
    pub monitoring: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    Approved,
    ConditionalApproval,
    ConditionalApprovalWithEscalation,
    EscalationRequired,
}

impl NegotiationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationStatus::Approved => "approved",
            NegotiationStatus::ConditionalApproval => "conditional_approval",
            NegotiationStatus::ConditionalApprovalWithEscalation => {
                "conditional_approval_with_escalation"
            }
            NegotiationStatus::EscalationRequired => "escalation_required",
        }
    }

    /// Vote this status casts during synthesis
    pub fn decision_label(&self) -> DecisionLabel {
        match self {
            NegotiationStatus::Approved => DecisionLabel::Approved,
            NegotiationStatus::ConditionalApproval
            | NegotiationStatus::ConditionalApprovalWithEscalation => DecisionLabel::Conditional,
            NegotiationStatus::EscalationRequired => DecisionLabel::Rejected,
        }
    }

    pub fn requires_human(&self) -> bool {
        matches!(
            self,
            NegotiationStatus::ConditionalApprovalWithEscalation
                | NegotiationStatus::EscalationRequired
        )
    }

    fn reasoning(&self) -> &'static str {
        match self {
            NegotiationStatus::EscalationRequired => {
                "Too many conflicts detected - escalation required for resolution"
            }
            NegotiationStatus::ConditionalApprovalWithEscalation => {
                "Complex multi-client scenario requires senior management approval"
            }
            NegotiationStatus::ConditionalApproval => {
                "Compromise solution found with specific guardrails and requirements"
            }
            NegotiationStatus::Approved => "No conflicts detected - standard approval process",
        }
    }
}

impl fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    pub analysis: ClientAnalysis,
    pub relationships: RelationshipMap,
    pub conflicts: Vec<NegotiationConflict>,
    pub escalation_required: bool,
    pub solution: CompromiseSolution,
    pub client_requirements: BTreeMap<String, ClientRequirements>,
    pub status: NegotiationStatus,
    pub reasoning: String,
    pub next_steps: Vec<String>,
}

/// Negotiate the request described by `text`
pub fn negotiate(text: &str) -> NegotiationOutcome {
    let analysis = ClientAnalysis::from_text(text);
    let relationships = RelationshipMap::for_clients(&analysis.clients);
    let conflicts = detect_conflicts(text, &analysis, &relationships);

    let escalation_required =
        conflicts.len() > 2 || relationships.risk_level == NegotiationRisk::High;

    let feasibility = Feasibility::from_conflict_count(conflicts.len());
    let mut requirements: Vec<CompromiseRequirement> = Vec::new();
    for conflict in &conflicts {
        let requirement = CompromiseRequirement::for_conflict(conflict.kind);
        if !requirements.iter().any(|r| r.kind == requirement.kind) {
            requirements.push(requirement);
        }
    }
    let solution = CompromiseSolution {
        approach: if feasibility == Feasibility::Infeasible {
            "escalation_required".to_string()
        } else {
            "compromise".to_string()
        },
        feasibility,
        requirements,
        escalation: escalation_required,
    };

    let status = if solution.feasibility == Feasibility::Infeasible {
        NegotiationStatus::EscalationRequired
    } else if escalation_required {
        NegotiationStatus::ConditionalApprovalWithEscalation
    } else if !solution.requirements.is_empty() {
        NegotiationStatus::ConditionalApproval
    } else {
        NegotiationStatus::Approved
    };

    let client_requirements = client_requirements(&analysis, &solution);
    let next_steps = next_steps(&solution, &analysis.clients);

    NegotiationOutcome {
        analysis,
        relationships,
        conflicts,
        escalation_required,
        solution,
        client_requirements,
        status,
        reasoning: status.reasoning().to_string(),
        next_steps,
    }
}

fn detect_conflicts(
    text: &str,
    analysis: &ClientAnalysis,
    relationships: &RelationshipMap,
) -> Vec<NegotiationConflict> {
    let mut conflicts = Vec::new();

    for pair in &relationships.competitors {
        conflicts.push(NegotiationConflict {
            kind: NegotiationConflictKind::CompetitiveIntelligence,
            severity: COMPETITOR_SEVERITY,
            description: format!(
                "{} and {} are direct competitors; strict information segregation required",
                pair.first, pair.second
            ),
            affected_clients: vec![pair.first.clone(), pair.second.clone()],
            mitigation: "Implement strict information segregation and competitive intelligence safeguards"
                .to_string(),
        });
    }

    let regulations: Vec<Regulation> = analysis.industry.regulations();
    if !regulations.is_empty() && !analysis.clients.is_empty() {
        conflicts.push(NegotiationConflict {
            kind: NegotiationConflictKind::Regulatory,
            severity: REGULATORY_SEVERITY,
            description: format!(
                "Industry-specific regulations for {}: {}",
                analysis.industry,
                regulations
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            affected_clients: analysis.clients.clone(),
            mitigation: "Apply highest common denominator compliance approach".to_string(),
        });
    }

    if analysis.tool.kind == ToolKind::ImageGeneration && !analysis.clients.is_empty() {
        conflicts.push(NegotiationConflict {
            kind: NegotiationConflictKind::BrandGuidelines,
            severity: BRAND_SEVERITY,
            description: "Image generation for competing brands requires distinct visual identities"
                .to_string(),
            affected_clients: analysis.clients.clone(),
            mitigation: "Ensure clear brand separation and distinct visual identities".to_string(),
        });
    }

    let lower = text.to_lowercase();
    if analysis.has_multiple_clients() && DEADLINE_SIGNALS.iter().any(|s| lower.contains(s)) {
        conflicts.push(NegotiationConflict {
            kind: NegotiationConflictKind::Timeline,
            severity: TIMELINE_SEVERITY,
            description: "Conflicting deadlines or launch schedules".to_string(),
            affected_clients: analysis.clients.clone(),
            mitigation: "Staggered delivery and priority management".to_string(),
        });
    }

    conflicts
}

fn client_requirements(
    analysis: &ClientAnalysis,
    solution: &CompromiseSolution,
) -> BTreeMap<String, ClientRequirements> {
    let segregated = solution
        .requirements
        .iter()
        .any(|r| r.kind == RequirementKind::InformationSegregation);

    analysis
        .clients
        .iter()
        .map(|client| {
            let mut req = ClientRequirements::default();
            if analysis.industry == Industry::Pharmaceutical {
                req.specific_requirements.extend(
                    [
                        "FDA compliance review for all medical claims",
                        "EMA compliance for European markets",
                        "Medical accuracy validation",
                        "Side effect disclosure compliance",
                    ]
                    .map(String::from),
                );
                req.approvals_required.extend(
                    [
                        "Medical review board approval",
                        "Legal compliance review",
                        "Regulatory affairs approval",
                    ]
                    .map(String::from),
                );
            }
            if segregated {
                req.guardrails.extend(
                    [
                        "Client-specific workspace isolation",
                        "Confidentiality agreements for all team members",
                        "Access controls and audit trails",
                        "Competitive intelligence training",
                    ]
                    .map(String::from),
                );
            }
            if analysis.tool.kind == ToolKind::ImageGeneration {
                req.specific_requirements.extend(
                    [
                        "Visual compliance review",
                        "Brand guideline adherence",
                        "Copyright clearance",
                    ]
                    .map(String::from),
                );
            }
            req.monitoring.extend(
                [
                    "Real-time compliance monitoring",
                    "Regular audit reporting",
                    "Client satisfaction tracking",
                ]
                .map(String::from),
            );
            (client.clone(), req)
        })
        .collect()
}

fn next_steps(solution: &CompromiseSolution, clients: &[String]) -> Vec<String> {
    let mut steps = Vec::new();
    if solution.escalation {
        steps.extend(
            [
                "Escalate to senior management for approval",
                "Prepare conflict analysis documentation",
                "Schedule stakeholder review meeting",
            ]
            .map(String::from),
        );
    }
    steps.extend(
        [
            "Implement client-specific workspaces and access controls",
            "Set up monitoring and audit systems",
            "Schedule regular compliance reviews",
        ]
        .map(String::from),
    );
    steps.extend(
        clients
            .iter()
            .map(|c| format!("Coordinate with {} for specific requirements", c)),
    );
    steps
}
