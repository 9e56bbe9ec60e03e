use regex::Regex;

const KEGG_SEARCH: &str = "https://www.genome.jp/dbget-bin/www_bfind_sub";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Cog,
    Ec,
}

impl QueryKind {
    /// Search URL for `value`, or `None` when there is nothing to query.
    pub fn url(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match self {
            QueryKind::Cog => {
                let id = value.replace("COG", "");
                Some(format!(
                    "{KEGG_SEARCH}?mode=bfind&max_hit=1000&dbkey=kegg&keywords={id}"
                ))
            }
            QueryKind::Ec => Some(format!(
                "{KEGG_SEARCH}?mode=bfind&max_hit=1000&locale=en&serv=kegg&dbkey=kegg&keywords={value}&page=1"
            )),
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Cog => write!(f, "COG"),
            QueryKind::Ec => write!(f, "EC"),
        }
    }
}

/// Pulls KEGG orthology ids out of a search result page.
pub struct EntryExtractor {
    href: Regex,
}

impl EntryExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            href: Regex::new(r#"(?i)href\s*=\s*["']([^"']*)["']"#)?,
        })
    }

    /// Ids linked as `.../entry/<id>` that start with `K`, in page order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        self.href
            .captures_iter(html)
            .filter_map(|caps| {
                let href = caps.get(1)?.as_str();
                let id = href.split("/entry/").nth(1)?;
                id.starts_with('K').then(|| id.to_string())
            })
            .collect()
    }
}
