//! OWASP Risk Rating factor catalogue
//!
//! Sixteen factors in four groups. Threat agent and vulnerability factors
//! drive the likelihood score; technical and business impact factors drive
//! the impact score. Declaration order is the canonical vector order.

use serde::Serialize;

/// Factor group as laid out by the OWASP methodology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorGroup {
    ThreatAgent,
    Vulnerability,
    TechnicalImpact,
    BusinessImpact,
}

impl FactorGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorGroup::ThreatAgent => "Threat agent factors",
            FactorGroup::Vulnerability => "Vulnerability factors",
            FactorGroup::TechnicalImpact => "Technical impact factors",
            FactorGroup::BusinessImpact => "Business impact factors",
        }
    }

    /// Whether this group feeds the likelihood score (otherwise impact)
    pub fn is_likelihood(&self) -> bool {
        matches!(self, FactorGroup::ThreatAgent | FactorGroup::Vulnerability)
    }
}

/// One of the sixteen rating factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    SkillLevel,
    Motive,
    Opportunity,
    Size,
    EaseOfDiscovery,
    EaseOfExploit,
    Awareness,
    IntrusionDetection,
    LossOfConfidentiality,
    LossOfIntegrity,
    LossOfAvailability,
    LossOfAccountability,
    FinancialDamage,
    ReputationDamage,
    NonCompliance,
    PrivacyViolation,
}

/// Suggested option for a factor: value plus its methodology description
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorOption {
    pub value: u8,
    pub description: &'static str,
}


impl Factor {
    /// All factors in canonical vector order
    pub const ALL: [Factor; 16] = [
        Factor::SkillLevel,
        Factor::Motive,
        Factor::Opportunity,
        Factor::Size,
        Factor::EaseOfDiscovery,
        Factor::EaseOfExploit,
        Factor::Awareness,
        Factor::IntrusionDetection,
        Factor::LossOfConfidentiality,
        Factor::LossOfIntegrity,
        Factor::LossOfAvailability,
        Factor::LossOfAccountability,
        Factor::FinancialDamage,
        Factor::ReputationDamage,
        Factor::NonCompliance,
        Factor::PrivacyViolation,
    ];

    /// The eight factors averaged into the likelihood score
    pub const LIKELIHOOD: [Factor; 8] = [
        Factor::SkillLevel,
        Factor::Motive,
        Factor::Opportunity,
        Factor::Size,
        Factor::EaseOfDiscovery,
        Factor::EaseOfExploit,
        Factor::Awareness,
        Factor::IntrusionDetection,
    ];

    /// The eight factors whose maximum is the impact score
    pub const IMPACT: [Factor; 8] = [
        Factor::LossOfConfidentiality,
        Factor::LossOfIntegrity,
        Factor::LossOfAvailability,
        Factor::LossOfAccountability,
        Factor::FinancialDamage,
        Factor::ReputationDamage,
        Factor::NonCompliance,
        Factor::PrivacyViolation,
    ];

    /// Position in the canonical order (0..16)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Short lowercase key used in vector text
    pub fn key(&self) -> &'static str {
        match self {
            Factor::SkillLevel => "sl",
            Factor::Motive => "m",
            Factor::Opportunity => "o",
            Factor::Size => "s",
            Factor::EaseOfDiscovery => "ed",
            Factor::EaseOfExploit => "ee",
            Factor::Awareness => "a",
            Factor::IntrusionDetection => "id",
            Factor::LossOfConfidentiality => "lc",
            Factor::LossOfIntegrity => "li",
            Factor::LossOfAvailability => "lav",
            Factor::LossOfAccountability => "lac",
            Factor::FinancialDamage => "fd",
            Factor::ReputationDamage => "rd",
            Factor::NonCompliance => "nc",
            Factor::PrivacyViolation => "pv",
        }
    }

    /// Look up a factor by key, ignoring ASCII case
    pub fn from_key(key: &str) -> Option<Factor> {
        Factor::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Factor::SkillLevel => "Skill level",
            Factor::Motive => "Motive",
            Factor::Opportunity => "Opportunity",
            Factor::Size => "Size",
            Factor::EaseOfDiscovery => "Ease of discovery",
            Factor::EaseOfExploit => "Ease of exploit",
            Factor::Awareness => "Awareness",
            Factor::IntrusionDetection => "Intrusion detection",
            Factor::LossOfConfidentiality => "Loss of confidentiality",
            Factor::LossOfIntegrity => "Loss of integrity",
            Factor::LossOfAvailability => "Loss of availability",
            Factor::LossOfAccountability => "Loss of accountability",
            Factor::FinancialDamage => "Financial damage",
            Factor::ReputationDamage => "Reputation damage",
            Factor::NonCompliance => "Non-compliance",
            Factor::PrivacyViolation => "Privacy violation",
        }
    }

    pub fn group(&self) -> FactorGroup {
        match self.index() {
            0..=3 => FactorGroup::ThreatAgent,
            4..=7 => FactorGroup::Vulnerability,
            8..=11 => FactorGroup::TechnicalImpact,
            _ => FactorGroup::BusinessImpact,
        }
    }

    /// Suggested values from the OWASP Risk Rating methodology
    pub fn options(&self) -> &'static [FactorOption] {
        match self {
            Factor::SkillLevel => &[
                FactorOption { value: 1, description: "No technical skills" },
                FactorOption { value: 3, description: "Some technical skills" },
                FactorOption { value: 5, description: "Advanced computer user" },
                FactorOption { value: 6, description: "Network and programming skills" },
                FactorOption { value: 9, description: "Security penetration skills" },
            ],
            Factor::Motive => &[
                FactorOption { value: 1, description: "Low or no reward" },
                FactorOption { value: 4, description: "Possible reward" },
                FactorOption { value: 9, description: "High reward" },
            ],
            Factor::Opportunity => &[
                FactorOption { value: 0, description: "Full access or expensive resources required" },
                FactorOption { value: 4, description: "Special access or resources required" },
                FactorOption { value: 7, description: "Some access or resources required" },
                FactorOption { value: 9, description: "No access or resources required" },
            ],
            Factor::Size => &[
                FactorOption { value: 2, description: "Developers or system administrators" },
                FactorOption { value: 4, description: "Intranet users" },
                FactorOption { value: 5, description: "Partners" },
                FactorOption { value: 6, description: "Authenticated users" },
                FactorOption { value: 9, description: "Anonymous Internet users" },
            ],
            Factor::EaseOfDiscovery => &[
                FactorOption { value: 1, description: "Practically impossible" },
                FactorOption { value: 3, description: "Difficult" },
                FactorOption { value: 7, description: "Easy" },
                FactorOption { value: 9, description: "Automated tools available" },
            ],
            Factor::EaseOfExploit => &[
                FactorOption { value: 1, description: "Theoretical" },
                FactorOption { value: 3, description: "Difficult" },
                FactorOption { value: 5, description: "Easy" },
                FactorOption { value: 9, description: "Automated tools available" },
            ],
            Factor::Awareness => &[
                FactorOption { value: 1, description: "Unknown" },
                FactorOption { value: 4, description: "Hidden" },
                FactorOption { value: 6, description: "Obvious" },
                FactorOption { value: 9, description: "Public knowledge" },
            ],
            Factor::IntrusionDetection => &[
                FactorOption { value: 1, description: "Active detection in application" },
                FactorOption { value: 3, description: "Logged and reviewed" },
                FactorOption { value: 8, description: "Logged without review" },
                FactorOption { value: 9, description: "Not logged" },
            ],
            Factor::LossOfConfidentiality => &[
                FactorOption { value: 2, description: "Minimal non-sensitive data disclosed" },
                FactorOption { value: 6, description: "Minimal critical data or extensive non-sensitive data disclosed" },
                FactorOption { value: 7, description: "Extensive critical data disclosed" },
                FactorOption { value: 9, description: "All data disclosed" },
            ],
            Factor::LossOfIntegrity => &[
                FactorOption { value: 1, description: "Minimal slightly corrupt data" },
                FactorOption { value: 3, description: "Minimal seriously corrupt data" },
                FactorOption { value: 5, description: "Extensive slightly corrupt data" },
                FactorOption { value: 7, description: "Extensive seriously corrupt data" },
                FactorOption { value: 9, description: "All data totally corrupt" },
            ],
            Factor::LossOfAvailability => &[
                FactorOption { value: 1, description: "Minimal secondary services interrupted" },
                FactorOption { value: 5, description: "Minimal primary or extensive secondary services interrupted" },
                FactorOption { value: 7, description: "Extensive primary services interrupted" },
                FactorOption { value: 9, description: "All services completely lost" },
            ],
            Factor::LossOfAccountability => &[
                FactorOption { value: 1, description: "Fully traceable" },
                FactorOption { value: 7, description: "Possibly traceable" },
                FactorOption { value: 9, description: "Completely anonymous" },
            ],
            Factor::FinancialDamage => &[
                FactorOption { value: 1, description: "Less than the cost to fix the vulnerability" },
                FactorOption { value: 3, description: "Minor effect on annual profit" },
                FactorOption { value: 7, description: "Significant effect on annual profit" },
                FactorOption { value: 9, description: "Bankruptcy" },
            ],
            Factor::ReputationDamage => &[
                FactorOption { value: 1, description: "Minimal damage" },
                FactorOption { value: 4, description: "Loss of major accounts" },
                FactorOption { value: 5, description: "Loss of goodwill" },
                FactorOption { value: 9, description: "Brand damage" },
            ],
            Factor::NonCompliance => &[
                FactorOption { value: 2, description: "Minor violation" },
                FactorOption { value: 5, description: "Clear violation" },
                FactorOption { value: 7, description: "High profile violation" },
            ],
            Factor::PrivacyViolation => &[
                FactorOption { value: 3, description: "One individual" },
                FactorOption { value: 5, description: "Hundreds of people" },
                FactorOption { value: 7, description: "Thousands of people" },
                FactorOption { value: 9, description: "Millions of people" },
            ],
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
