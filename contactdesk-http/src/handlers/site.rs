use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use super::AppState;

/// One sitemap entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePage {
    pub path: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// GET /sitemap.xml
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "site",
    responses((status = 200, description = "Sitemap of the static pages", body = String, content_type = "application/xml"))
)]
pub async fn sitemap(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pages = discover_pages(&state.site.public_dir);
    (
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.site.site_url, &pages),
    )
}

/// GET /robots.txt
#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "site",
    responses((status = 200, description = "Crawler rules", body = String, content_type = "text/plain"))
)]
pub async fn robots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.site.site_url),
    )
}

/// `/` plus every top-level `.html` file except `index.html`, sorted by path.
/// A missing directory yields just `/`.
pub fn discover_pages(public_dir: &Path) -> Vec<SitePage> {
    let modified = |path: &Path| {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    };

    let mut pages = vec![SitePage {
        path: "/".to_string(),
        last_modified: modified(&public_dir.join("index.html")),
    }];

    let entries = match public_dir.read_dir() {
        Ok(rd) => rd,
        Err(_) => return pages,
    };

    let mut others: Vec<SitePage> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| {
            let name = e.file_name().into_string().ok()?;
            if !name.ends_with(".html") || name == "index.html" || name.starts_with('.') {
                return None;
            }
            Some(SitePage {
                path: format!("/{}", name),
                last_modified: modified(&e.path()),
            })
        })
        .collect();
    others.sort_by(|a, b| a.path.cmp(&b.path));
    pages.extend(others);
    pages
}

pub fn render_sitemap(site_url: &str, pages: &[SitePage]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in pages {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&format!("{}{}", site_url, page.path))
        ));
        if let Some(ts) = page.last_modified {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", ts.format("%Y-%m-%d")));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn render_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /contact\nSitemap: {}/sitemap.xml\n",
        site_url
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_pages_missing_dir() {
        let pages = discover_pages(Path::new("/definitely/not/here"));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/");
        assert!(pages[0].last_modified.is_none());
    }

    #[test]
    fn test_discover_pages_lists_html_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["index.html", "services.html", "about.html", "style.css", ".draft.html"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("img.html")).unwrap();

        let paths: Vec<String> = discover_pages(dir.path())
            .into_iter()
            .map(|p| p.path)
            .collect();
        assert_eq!(paths, vec!["/", "/about.html", "/services.html"]);
    }

    #[test]
    fn test_render_sitemap() {
        let pages = vec![
            SitePage {
                path: "/".to_string(),
                last_modified: None,
            },
            SitePage {
                path: "/a&b.html".to_string(),
                last_modified: Some(
                    DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z")
                        .unwrap()
                        .with_timezone(&Utc),
                ),
            },
        ];
        let xml = render_sitemap("https://example.com", &pages);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/a&amp;b.html</loc>"));
        assert!(xml.contains("<lastmod>2024-03-05</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 2);
    }

    #[test]
    fn test_render_robots() {
        let robots = render_robots("https://example.com");
        assert!(robots.contains("Disallow: /contact\n"));
        assert!(robots.ends_with("Sitemap: https://example.com/sitemap.xml\n"));
    }
}
