use serde::{Deserialize, Serialize};

pub const DOMAIN_WEIGHT: u32 = 3;
pub const URL_KEYWORD_WEIGHT: u32 = 2;
pub const TITLE_KEYWORD_WEIGHT: u32 = 2;

/// A named folder category and the substrings that pull bookmarks into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPattern {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub url_keywords: Vec<String>,
    #[serde(default)]
    pub title_keywords: Vec<String>,
}

impl CategoryPattern {
    fn from_static(
        name: &str,
        domains: &[&str],
        url_keywords: &[&str],
        title_keywords: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            domains: lowercased(domains),
            url_keywords: lowercased(url_keywords),
            title_keywords: lowercased(title_keywords),
        }
    }

    /// Copy with every match list lowercased, as [`CategoryPattern::score`] expects.
    pub fn lowercased(&self) -> Self {
        let lower = |list: &[String]| list.iter().map(|s| s.to_lowercase()).collect();
        Self {
            name: self.name.clone(),
            domains: lower(&self.domains),
            url_keywords: lower(&self.url_keywords),
            title_keywords: lower(&self.title_keywords),
        }
    }

    /// Each matching substring counts once, however often it occurs.
    /// Both inputs must already be lowercased.
    pub fn score(&self, url: &str, title: &str) -> u32 {
        let hits = |haystack: &str, needles: &[String]| {
            needles
                .iter()
                .filter(|needle| !needle.is_empty() && haystack.contains(needle.as_str()))
                .count() as u32
        };
        hits(url, &self.domains) * DOMAIN_WEIGHT
            + hits(url, &self.url_keywords) * URL_KEYWORD_WEIGHT
            + hits(title, &self.title_keywords) * TITLE_KEYWORD_WEIGHT
    }
}

fn lowercased(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_lowercase()).collect()
}

/// The fixed category table, in tie-break order.
pub fn builtin_catalog() -> Vec<CategoryPattern> {
    vec![
        CategoryPattern::from_static(
            "Development Tools",
            &[
                "github.com",
                "gitlab.com",
                "bitbucket.org",
                "stackoverflow.com",
                "npmjs.com",
                "crates.io",
                "docs.rs",
                "developer.mozilla.org",
                "codepen.io",
                "vercel.com",
            ],
            &["api", "docs", "dev", "code", "git"],
            &[
                "github",
                "code",
                "programming",
                "developer",
                "api",
                "documentation",
                "repo",
                "debug",
            ],
        ),
        CategoryPattern::from_static(
            "Social Media",
            &[
                "twitter.com",
                "facebook.com",
                "instagram.com",
                "linkedin.com",
                "reddit.com",
                "tiktok.com",
                "mastodon.social",
                "threads.net",
            ],
            &["social", "profile", "feed"],
            &["twitter", "facebook", "instagram", "linkedin", "reddit", "social"],
        ),
        CategoryPattern::from_static(
            "Design Resources",
            &[
                "dribbble.com",
                "behance.net",
                "figma.com",
                "canva.com",
                "unsplash.com",
                "fonts.google.com",
                "coolors.co",
            ],
            &["design", "icons", "fonts", "palette"],
            &["design", "inspiration", "icons", "typography", "mockup", "color"],
        ),
        CategoryPattern::from_static(
            "Finance & Business",
            &[
                "paypal.com",
                "stripe.com",
                "bloomberg.com",
                "wsj.com",
                "investopedia.com",
                "coinbase.com",
            ],
            &["finance", "invest", "bank", "stock", "crypto"],
            &["finance", "budget", "investing", "stocks", "banking", "business"],
        ),
        CategoryPattern::from_static(
            "Productivity",
            &[
                "notion.so",
                "trello.com",
                "asana.com",
                "todoist.com",
                "slack.com",
                "calendar.google.com",
                "docs.google.com",
                "drive.google.com",
            ],
            &["calendar", "tasks", "todo", "notes"],
            &["productivity", "todo", "planner", "notes", "workflow", "calendar"],
        ),
        CategoryPattern::from_static(
            "Entertainment",
            &[
                "youtube.com",
                "netflix.com",
                "spotify.com",
                "twitch.tv",
                "hulu.com",
                "imdb.com",
                "disneyplus.com",
            ],
            &["watch", "music", "video", "movie"],
            &["movie", "music", "video", "game", "watch", "stream"],
        ),
        CategoryPattern::from_static(
            "Shopping",
            &[
                "amazon.com",
                "ebay.com",
                "etsy.com",
                "walmart.com",
                "bestbuy.com",
                "aliexpress.com",
            ],
            &["shop", "cart", "product", "deal"],
            &["buy", "shop", "deal", "sale", "store"],
        ),
        CategoryPattern::from_static(
            "Learning & Resources",
            &[
                "coursera.org",
                "udemy.com",
                "khanacademy.org",
                "edx.org",
                "wikipedia.org",
                "medium.com",
                "freecodecamp.org",
            ],
            &["learn", "course", "tutorial", "wiki", "guide"],
            &["learn", "course", "tutorial", "guide", "how to"],
        ),
    ]
}
