//! Hyperlink extraction from directory-listing pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("anchor pattern is valid")
});

/// Absolute http(s) URLs of every anchor in `html` whose path ends with
/// `.extension` (case-insensitive). Relative targets are resolved against
/// `base`; duplicates are dropped, first occurrence wins.
pub fn links_with_extension(base: &Url, html: &str, extension: &str) -> Vec<String> {
    let suffix = format!(".{}", extension.trim_start_matches('.').to_ascii_lowercase());
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for caps in ANCHOR_HREF.captures_iter(html) {
        let Some(raw) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let target = raw.as_str().trim().replace("&amp;", "&");
        if target.is_empty() || target.starts_with('#') {
            continue;
        }
        let Ok(url) = base.join(&target) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        if !url.path().to_ascii_lowercase().ends_with(&suffix) {
            continue;
        }
        let url = url.to_string();
        if seen.insert(url.clone()) {
            found.push(url);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/data/").unwrap()
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let html = r#"<html><body>
            <a href="a.csv">a.csv</a>
            <a href="b.CSV">b.CSV</a>
            <a href="c.txt">c.txt</a>
        </body></html>"#;
        let links = links_with_extension(&base(), html, "csv");
        assert_eq!(
            links,
            vec![
                "http://example.com/data/a.csv".to_string(),
                "http://example.com/data/b.CSV".to_string(),
            ]
        );
    }

    #[test]
    fn apache_index_noise_is_skipped() {
        let html = r##"
            <a href="?C=N;O=D">Name</a>
            <a href="/">Parent Directory</a>
            <a href='sub/x.fits'>x</a>
            <A HREF=y.FITS>y</A>
            <a class="f" href="https://mirror.example.net/z.fits?dl=1">z</a>
            <a href="mailto:ops@example.com">mail</a>
            <a href="#top">top</a>
        "##;
        let links = links_with_extension(&base(), html, ".fits");
        assert_eq!(
            links,
            vec![
                "http://example.com/data/sub/x.fits".to_string(),
                "http://example.com/data/y.FITS".to_string(),
                "https://mirror.example.net/z.fits?dl=1".to_string(),
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let html = r#"<a href="a.csv">1</a><a href="./a.csv">2</a><a href="http://example.com/data/a.csv">3</a>"#;
        assert_eq!(links_with_extension(&base(), html, "csv").len(), 1);
    }
}
