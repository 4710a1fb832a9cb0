//! Sitemap and robots.txt rendering.

use crate::types::Date;

/// Namespace required by the sitemap protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Site pages that exist regardless of database content.
pub const STATIC_PAGES: &[(&str, &str, &str)] = &[
    // (path, changefreq, priority)
    ("/", "daily", "1.0"),
    ("/movies", "daily", "0.9"),
    ("/articles", "daily", "0.9"),
    ("/about", "monthly", "0.5"),
    ("/contact", "monthly", "0.5"),
];

/// One `<url>` entry in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub path: String,
    pub last_modified: Option<Date>,
    pub change_frequency: &'static str,
    pub priority: &'static str,
}

impl SitemapEntry {
    /// Entry for a movie detail page.
    pub fn movie(id: i64, last_modified: Option<Date>) -> Self {
        Self {
            path: format!("/movies/{id}"),
            last_modified,
            change_frequency: "weekly",
            priority: "0.8",
        }
    }

    /// Entry for an article detail page.
    pub fn article(id: i64, last_modified: Option<Date>) -> Self {
        Self {
            path: format!("/articles/{id}"),
            last_modified,
            change_frequency: "weekly",
            priority: "0.7",
        }
    }
}

/// Static pages as sitemap entries, stamped with `today`.
pub fn static_entries(today: Date) -> Vec<SitemapEntry> {
    STATIC_PAGES
        .iter()
        .map(|&(path, change_frequency, priority)| SitemapEntry {
            path: path.to_string(),
            last_modified: Some(today),
            change_frequency,
            priority,
        })
        .collect()
}

/// Render a sitemap document for `base_url` (no trailing slash required).
pub fn render_sitemap(base_url: &str, entries: &[SitemapEntry]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::with_capacity(128 + entries.len() * 160);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NAMESPACE}\">\n"));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&format!("{base}{}", entry.path))
        ));
        if let Some(date) = entry.last_modified {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date.format("%Y-%m-%d")));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency
        ));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render robots.txt pointing crawlers at the sitemap.
pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /api/\n\
         Disallow: /admin\n\
         \n\
         Sitemap: {base}/sitemap.xml\n"
    )
}

/// Escape the five XML special characters.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sitemap_lists_entries_with_lastmod() {
        let mut entries = static_entries(day(2024, 5, 1));
        entries.push(SitemapEntry::movie(7, Some(day(2024, 4, 2))));
        entries.push(SitemapEntry::article(3, None));

        let xml = render_sitemap("https://example.com/", &entries);

        assert!(xml.contains(SITEMAP_NAMESPACE));
        assert!(xml.contains("<loc>https://example.com/movies/7</loc>"));
        assert!(xml.contains("<lastmod>2024-04-02</lastmod>"));
        assert!(xml.contains("<loc>https://example.com/articles/3</loc>"));
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len() + 2);
    }

    #[test]
    fn sitemap_escapes_locations() {
        let entries = vec![SitemapEntry {
            path: "/search?a=1&b=2".into(),
            last_modified: None,
            change_frequency: "never",
            priority: "0.1",
        }];
        let xml = render_sitemap("https://example.com", &entries);
        assert!(xml.contains("a=1&amp;b=2"));
    }

    #[test]
    fn robots_points_to_sitemap() {
        let robots = render_robots("https://example.com/");
        assert!(robots.starts_with("User-agent: *"));
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
        assert!(robots.contains("Disallow: /api/"));
    }
}
