//! Declarative validation rules for the contact form.
//!
//! One immutable `ValidationRule` per `FieldName`, built once on first use.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The fixed set of contact form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Name,
    Email,
    Subject,
    Message,
    Company,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Subject,
        FieldName::Message,
        FieldName::Company,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::Subject => "subject",
            FieldName::Message => "message",
            FieldName::Company => "company",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// User-facing messages for each kind of rule failure.
/// A kind without a message is never checked for that field.
#[derive(Debug, Clone, Default)]
pub struct RuleMessages {
    pub required: Option<&'static str>,
    pub min_length: Option<&'static str>,
    pub max_length: Option<&'static str>,
    pub pattern: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub messages: RuleMessages,
}

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern compiles"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static RULES: Lazy<[ValidationRule; 5]> = Lazy::new(|| {
    [
        ValidationRule {
            required: true,
            min_length: Some(2),
            max_length: Some(50),
            pattern: Some(NAME_PATTERN.clone()),
            messages: RuleMessages {
                required: Some("Name is required"),
                min_length: Some("Name must be at least 2 characters"),
                max_length: Some("Name must be less than 50 characters"),
                pattern: Some("Name can only contain letters, spaces, hyphens, and apostrophes"),
            },
        },
        ValidationRule {
            required: true,
            min_length: None,
            max_length: Some(100),
            pattern: Some(EMAIL_PATTERN.clone()),
            messages: RuleMessages {
                required: Some("Email is required"),
                min_length: None,
                max_length: Some("Email must be less than 100 characters"),
                pattern: Some("Please enter a valid email address"),
            },
        },
        ValidationRule {
            required: true,
            min_length: Some(5),
            max_length: Some(100),
            pattern: None,
            messages: RuleMessages {
                required: Some("Subject is required"),
                min_length: Some("Subject must be at least 5 characters"),
                max_length: Some("Subject must be less than 100 characters"),
                pattern: None,
            },
        },
        ValidationRule {
            required: true,
            min_length: Some(20),
            max_length: Some(1000),
            pattern: None,
            messages: RuleMessages {
                required: Some("Message is required"),
                min_length: Some("Message must be at least 20 characters"),
                max_length: Some("Message must be less than 1000 characters"),
                pattern: None,
            },
        },
        ValidationRule {
            required: false,
            min_length: None,
            max_length: Some(100),
            pattern: None,
            messages: RuleMessages {
                max_length: Some("Company name must be less than 100 characters"),
                ..RuleMessages::default()
            },
        },
    ]
});

/// Returns the rule set for a field.
pub fn rule_for(field: FieldName) -> &'static ValidationRule {
    // RULES is laid out in `FieldName` declaration order.
    &RULES[field as usize]
}

/// Iterates every field declared in the rule table with its rule.
pub fn rule_table() -> impl Iterator<Item = (FieldName, &'static ValidationRule)> {
    FieldName::ALL.into_iter().map(|f| (f, rule_for(f)))
}
