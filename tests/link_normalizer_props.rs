//! Property tests for PDF link normalization

use proptest::prelude::*;
use reportscrape::{RawAnchor, normalize, normalize_all};
use url::Url;

fn base() -> Url {
    Url::parse("https://acme.example/investors/reports.html").unwrap()
}

proptest! {
    #[test]
    fn every_result_is_an_absolute_http_url(href in "\\PC{0,40}", text in "\\PC{0,20}") {
        if let Some(link) = normalize(&RawAnchor::new(href, text), &base()) {
            let parsed = Url::parse(&link.link).unwrap();
            prop_assert!(matches!(parsed.scheme(), "http" | "https"));
        }
    }

    #[test]
    fn hrefs_without_pdf_are_always_dropped(href in "[a-zA-Z0-9/:._?=&-]{0,40}") {
        prop_assume!(!href.to_lowercase().contains(".pdf"));
        prop_assert!(normalize(&RawAnchor::new(href, "x"), &base()).is_none());
    }

    #[test]
    fn relative_pdf_resolves_next_to_page(name in "[a-z0-9_-]{1,16}", upper in any::<bool>()) {
        let ext = if upper { "PDF" } else { "pdf" };
        let href = format!("{name}.{ext}");
        let link = normalize(&RawAnchor::new(href.clone(), ""), &base()).unwrap();
        prop_assert_eq!(link.link, format!("https://acme.example/investors/{href}"));
    }

    #[test]
    fn title_is_trimmed_text_or_placeholder(text in "\\PC{0,30}") {
        let link = normalize(&RawAnchor::new("/a.pdf", text.clone()), &base()).unwrap();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            prop_assert_eq!(link.title, "Untitled PDF");
        } else {
            prop_assert_eq!(link.title, trimmed);
        }
    }

    #[test]
    fn normalize_all_preserves_dom_order(names in prop::collection::vec("[a-z]{1,8}", 0..12)) {
        let anchors: Vec<RawAnchor> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                if i % 2 == 0 {
                    RawAnchor::new(format!("/{n}.pdf"), n.clone())
                } else {
                    RawAnchor::new(format!("/{n}.html"), n.clone())
                }
            })
            .collect();

        let titles: Vec<String> = normalize_all(&anchors, &base())
            .into_iter()
            .map(|l| l.title)
            .collect();
        let expected: Vec<String> = names.iter().step_by(2).cloned().collect();
        prop_assert_eq!(titles, expected);
    }
}
