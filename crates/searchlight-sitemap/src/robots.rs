//! robots.txt

use std::fmt::Write as _;

use crate::render::join_url;

/// Sitemaps advertised to crawlers
pub const ADVERTISED_SITEMAPS: &[&str] = &["/sitemap.xml", "/search-sitemap.xml"];

/// Allow everything and point crawlers at the sitemaps
pub fn robots_txt(base_url: &str) -> String {
    let mut out = String::from("User-Agent: *\nAllow: /\n\n");
    for path in ADVERTISED_SITEMAPS {
        let _ = writeln!(out, "Sitemap: {}", join_url(base_url, path));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots() {
        let txt = robots_txt("https://a.com/");
        assert!(txt.starts_with("User-Agent: *\nAllow: /\n"));
        assert!(txt.contains("Sitemap: https://a.com/sitemap.xml\n"));
        assert!(txt.contains("Sitemap: https://a.com/search-sitemap.xml\n"));
    }
}
