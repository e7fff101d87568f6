//! PDF link classification and URL resolution.
//!
//! Pure functions over anchors read from a rendered page. An anchor yields a
//! `NormalizedLink` only if its href mentions `.pdf` (any case) and resolves
//! to an absolute `http`/`https` URL; everything else is dropped silently.

use url::Url;

use crate::store::{NormalizedLink, RawAnchor};

/// Normalize a single anchor against the page it was found on.
///
/// Resolution order:
/// 1. protocol-relative (`//host/a.pdf`) takes the base page's scheme
/// 2. absolute `http://` / `https://` hrefs pass through unchanged
/// 3. anything else is joined onto `base`
#[must_use]
pub fn normalize(anchor: &RawAnchor, base: &Url) -> Option<NormalizedLink> {
    let href = anchor.href.as_deref()?.trim();
    if href.is_empty() || !href.to_lowercase().contains(".pdf") {
        return None;
    }

    let link = if href.starts_with("//") {
        if !is_http_scheme(base.scheme()) {
            return None;
        }
        let candidate = format!("{}:{}", base.scheme(), href);
        // Reject hosts that cannot parse, but keep the text as written
        Url::parse(&candidate).ok()?;
        candidate
    } else if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href).ok()?;
        href.to_string()
    } else {
        let joined = base.join(href).ok()?;
        if !is_http_scheme(joined.scheme()) {
            return None;
        }
        joined.to_string()
    };

    Some(NormalizedLink::new(&anchor.text, link))
}

/// Normalize a page's anchors, keeping DOM order and duplicates.
#[must_use]
pub fn normalize_all(anchors: &[RawAnchor], base: &Url) -> Vec<NormalizedLink> {
    anchors.iter().filter_map(|a| normalize(a, base)).collect()
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::UNTITLED_PDF;

    fn base() -> Url {
        Url::parse("https://acme.example/reports/index.html").unwrap()
    }

    #[test]
    fn missing_or_empty_href_is_dropped() {
        let anchor = RawAnchor {
            href: None,
            text: "Q1".into(),
        };
        assert_eq!(normalize(&anchor, &base()), None);
        assert_eq!(normalize(&RawAnchor::new("", "Q1"), &base()), None);
        assert_eq!(normalize(&RawAnchor::new("   ", "Q1"), &base()), None);
    }

    #[test]
    fn non_pdf_href_is_dropped() {
        assert_eq!(normalize(&RawAnchor::new("/about", "About"), &base()), None);
        assert_eq!(normalize(&RawAnchor::new("/report.pdx", ""), &base()), None);
    }

    #[test]
    fn root_relative_href_resolves_against_host() {
        let link = normalize(&RawAnchor::new("/docs/q1.pdf", "Q1"), &base()).unwrap();
        assert_eq!(link.link, "https://acme.example/docs/q1.pdf");
        assert_eq!(link.title, "Q1");
    }

    #[test]
    fn document_relative_href_resolves_against_directory() {
        let link = normalize(&RawAnchor::new("q2.pdf", "Q2"), &base()).unwrap();
        assert_eq!(link.link, "https://acme.example/reports/q2.pdf");
    }

    #[test]
    fn protocol_relative_takes_base_scheme() {
        let link = normalize(&RawAnchor::new("//cdn.example/a.pdf", ""), &base()).unwrap();
        assert_eq!(link.link, "https://cdn.example/a.pdf");

        let http_base = Url::parse("http://acme.example/").unwrap();
        let link = normalize(&RawAnchor::new("//cdn.example/a.pdf", ""), &http_base).unwrap();
        assert_eq!(link.link, "http://cdn.example/a.pdf");
    }

    #[test]
    fn absolute_href_passes_through_unchanged() {
        let href = "https://cdn.example/q2.PDF?x=1";
        let link = normalize(&RawAnchor::new(href, ""), &base()).unwrap();
        assert_eq!(link.link, href);
        assert_eq!(link.title, UNTITLED_PDF);
    }

    #[test]
    fn pdf_with_query_string_qualifies() {
        let link = normalize(&RawAnchor::new("/get?file=annual.pdf&v=2", "Annual"), &base());
        assert_eq!(
            link.map(|l| l.link),
            Some("https://acme.example/get?file=annual.pdf&v=2".to_string())
        );
    }

    #[test]
    fn non_http_schemes_are_dropped() {
        for href in [
            "javascript:open('a.pdf')",
            "mailto:ir@acme.example?subject=a.pdf",
            "data:application/pdf;name=a.pdf,AAAA",
            "ftp://files.acme.example/a.pdf",
        ] {
            assert_eq!(normalize(&RawAnchor::new(href, ""), &base()), None, "{href}");
        }
    }

    #[test]
    fn malformed_href_is_dropped() {
        assert_eq!(normalize(&RawAnchor::new("http://[::1/a.pdf", ""), &base()), None);
        assert_eq!(normalize(&RawAnchor::new("//[bad/a.pdf", ""), &base()), None);
    }

    #[test]
    fn whitespace_title_defaults() {
        let link = normalize(&RawAnchor::new("/a.pdf", " \n\t "), &base()).unwrap();
        assert_eq!(link.title, UNTITLED_PDF);
        let link = normalize(&RawAnchor::new("/a.pdf", "  Annual report  "), &base()).unwrap();
        assert_eq!(link.title, "Annual report");
    }

    #[test]
    fn normalize_all_keeps_order_and_duplicates() {
        let anchors = vec![
            RawAnchor::new("/b.pdf", "B"),
            RawAnchor::new("/about", "About"),
            RawAnchor::new("/a.pdf", "A"),
            RawAnchor::new("/b.pdf", "B again"),
        ];
        let links: Vec<String> = normalize_all(&anchors, &base())
            .into_iter()
            .map(|l| l.link)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://acme.example/b.pdf",
                "https://acme.example/a.pdf",
                "https://acme.example/b.pdf",
            ]
        );
    }
}
