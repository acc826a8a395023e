use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Link categories, in the order they are reported.
///
/// Every link lands in exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Navigation,
    Ecommerce,
    Product,
    Account,
    Support,
    Social,
    Legal,
    Content,
    Business,
    Careers,
    External,
    Media,
    Utility,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Navigation,
        Category::Ecommerce,
        Category::Product,
        Category::Account,
        Category::Support,
        Category::Social,
        Category::Legal,
        Category::Content,
        Category::Business,
        Category::Careers,
        Category::External,
        Category::Media,
        Category::Utility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Ecommerce => "ecommerce",
            Category::Product => "product",
            Category::Account => "account",
            Category::Support => "support",
            Category::Social => "social",
            Category::Legal => "legal",
            Category::Content => "content",
            Category::Business => "business",
            Category::Careers => "careers",
            Category::External => "external",
            Category::Media => "media",
            Category::Utility => "utility",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }

    fn default_description(&self) -> &'static str {
        match self {
            Category::Navigation => "Navigation and menu links",
            Category::Ecommerce => "E-commerce and shopping links",
            Category::Product => "Product pages and listings",
            Category::Account => "User account and authentication links",
            Category::Support => "Support and help resources",
            Category::Social => "Social media links",
            Category::Legal => "Legal and policy pages",
            Category::Content => "Blog and content pages",
            Category::Business => "Business and marketing pages",
            Category::Careers => "Career and job opportunity links",
            Category::External => "External third-party links",
            Category::Media => "Media and downloadable content",
            Category::Utility => "Utility and functional pages",
        }
    }

    fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Navigation => &[
                "home", "about", "contact", "menu", "nav", "header", "footer", "sitemap",
            ],
            Category::Ecommerce => &[
                "shop", "store", "cart", "checkout", "buy", "purchase", "order", "product",
                "products", "item", "items",
            ],
            Category::Product => &[
                "product", "item", "catalog", "inventory", "merchandise", "goods", "sku",
            ],
            Category::Account => &[
                "login", "signup", "register", "account", "profile", "dashboard", "settings",
                "logout", "signin",
            ],
            Category::Support => &[
                "help", "support", "faq", "documentation", "docs", "tutorial", "guide",
                "contact", "service",
            ],
            Category::Social => &[
                "facebook", "twitter", "instagram", "linkedin", "youtube", "pinterest",
                "tiktok", "reddit", "social", "share",
            ],
            Category::Legal => &[
                "privacy", "terms", "disclaimer", "legal", "cookie", "policy", "gdpr",
                "compliance", "license",
            ],
            Category::Content => &[
                "blog", "article", "post", "news", "story", "press", "magazine", "publication",
            ],
            Category::Business => &[
                "pricing", "plans", "features", "case-study", "resources", "solutions",
                "enterprise", "demo",
            ],
            Category::Careers => &[
                "career", "careers", "jobs", "hiring", "employment", "work", "join", "team",
                "vacancy",
            ],
            Category::External => &[],
            Category::Media => &[
                "image", "video", "pdf", "download", "media", "gallery", "photo", "audio",
                "file",
            ],
            Category::Utility => &[
                "search", "filter", "tag", "category", "archive", "rss", "feed", "print",
                "email",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword rule for a single category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
    pub description: String,
}

/// The ordered keyword rules used by the classifier.
///
/// Declaration order is the tie-break when keyword sets overlap (e.g. "product"
/// is both an ecommerce and a product keyword, ecommerce wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    rules: Vec<CategoryRule>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        let rules = Category::ALL
            .into_iter()
            .map(|category| CategoryRule {
                category,
                keywords: category
                    .default_keywords()
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                description: category.default_description().to_string(),
            })
            .collect();
        Self { rules }
    }
}

impl Taxonomy {
    /// Builds the default taxonomy with the keyword lists of some categories replaced.
    ///
    /// Unknown category names are returned as an error so typos in config files surface.
    pub fn with_overrides(overrides: &HashMap<String, Vec<String>>) -> anyhow::Result<Self> {
        let mut taxonomy = Self::default();
        for (name, keywords) in overrides {
            let category = Category::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown link category in config: '{}'", name))?;
            if category == Category::External {
                anyhow::bail!("The 'external' category is decided by domain and takes no keywords");
            }
            if let Some(rule) = taxonomy.rules.iter_mut().find(|r| r.category == category) {
                rule.keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
            }
        }
        Ok(taxonomy)
    }

    /// Keyword rules in classification order (`external` excluded)
    pub fn keyword_rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules
            .iter()
            .filter(|rule| rule.category != Category::External)
    }

    pub fn description(&self, category: Category) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| rule.description.as_str())
            .unwrap_or_else(|| category.default_description())
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rules.iter().map(|rule| rule.category)
    }
}
