/// Category given to anything no rule recognizes.
pub const DEFAULT_CATEGORY: &str = "Autre";

/// Built-in rules, in evaluation order.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("loyer", "Logement"),
    ("supermarché", "Alimentation"),
    ("restaurant", "Loisirs"),
    ("essence", "Transport"),
    ("salaire", "Revenus"),
];

/// A keyword and the category it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rule {
    keyword: String,
    category: String,
}

impl Rule {
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            category: category.to_string(),
        }
    }
}

/// Keyword classifier. Rules are evaluated in declaration order and the first one whose
/// keyword appears in the description wins, not the longest or most specific one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Categorizer {
    rules: Vec<Rule>,
    default: String,
}

impl Categorizer {
    pub fn new(rules: Vec<Rule>, default: &str) -> Self {
        Self {
            rules,
            default: default.to_string(),
        }
    }

    /// Case-insensitive substring lookup. Never fails; unknown descriptions get the
    /// default category.
    pub fn categorize(&self, description: &str) -> &str {
        let description = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| description.contains(&rule.keyword))
            .map(|rule| rule.category.as_str())
            .unwrap_or(&self.default)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(keyword, category)| Rule::new(keyword, category))
                .collect(),
            DEFAULT_CATEGORY,
        )
    }
}
