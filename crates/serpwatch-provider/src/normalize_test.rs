use chrono::{NaiveDate, TimeZone};
use serde_json::json;

use super::*;
use crate::types::{AiAnswerPage, OrganicPage};

fn stamp() -> Stamp<'static> {
    Stamp {
        keyword: "Acme Corp",
        collected_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
    }
}

fn organic(value: serde_json::Value) -> OrganicItem {
    serde_json::from_value(value).unwrap()
}

#[test]
fn organic_fields_map_through() {
    let item = organic(json!({
        "title": "Acme Corp wins award",
        "link": "https://acme.example/award",
        "snippet": "Ottimo risultato",
        "date": "2025-03-01"
    }));
    let result = normalize_organic(item, 3, Source::GoogleOrganic, stamp());
    assert_eq!(result.position, 3);
    assert_eq!(result.title, "Acme Corp wins award");
    assert_eq!(result.url, "https://acme.example/award");
    assert_eq!(result.snippet, "Ottimo risultato");
    assert_eq!(
        result.published_date,
        PublishedDate::Known(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    );
    assert_eq!(result.source, Source::GoogleOrganic);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.keyword, "Acme Corp");
}

#[test]
fn missing_fields_become_sentinel() {
    let result = normalize_organic(organic(json!({})), 1, Source::BingOrganic, stamp());
    assert_eq!(result.title, NOT_AVAILABLE);
    assert_eq!(result.url, NOT_AVAILABLE);
    assert_eq!(result.snippet, NOT_AVAILABLE);
    assert_eq!(result.published_date, PublishedDate::Unknown);
    assert!(!result.has_url());
}

#[test]
fn blank_fields_become_sentinel() {
    let result = normalize_organic(
        organic(json!({"title": "  ", "link": ""})),
        1,
        Source::GoogleOrganic,
        stamp(),
    );
    assert_eq!(result.title, NOT_AVAILABLE);
    assert_eq!(result.url, NOT_AVAILABLE);
}

#[test]
fn relative_rich_snippet_date_resolves_against_collection_time() {
    let item = organic(json!({
        "title": "x",
        "rich_snippet": {"top": {"detected_extensions": {"date": "3 days ago"}}}
    }));
    let result = normalize_organic(item, 1, Source::GoogleOrganic, stamp());
    assert_eq!(
        result.published_date,
        PublishedDate::Known(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    );
}

#[test]
fn page_positions_continue_from_offset() {
    let page: OrganicPage = serde_json::from_value(json!({
        "organic_results": [{"title": "a"}, {"title": "b"}, {"title": "c"}]
    }))
    .unwrap();
    let results =
        SearchResult::from_page(RawPage::Organic(page), 11, Source::GoogleOrganic, stamp());
    let positions: Vec<u32> = results.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![11, 12, 13]);
}

#[test]
fn mismatched_page_shape_yields_nothing() {
    let page =
        RawPage::decode(Source::GoogleNews, json!({"news_results": [{"title": "a"}]})).unwrap();
    assert!(SearchResult::from_page(page, 1, Source::GoogleOrganic, stamp()).is_empty());
}

#[test]
fn news_carries_outlet_name() {
    let item: NewsItem = serde_json::from_value(json!({
        "title": "Acme in crisi",
        "link": "https://news.example/1",
        "source": "Il Sole 24 Ore",
        "date": "Mar 4, 2025"
    }))
    .unwrap();
    let news = normalize_news(item, 1, stamp());
    assert_eq!(news.source_name, "Il Sole 24 Ore");
    assert_eq!(news.result.source, Source::GoogleNews);
    assert_eq!(news.result.published_date.to_string(), "2025-03-04");
}

#[test]
fn image_prefers_original_url() {
    let item: ImageItem = serde_json::from_value(json!({
        "title": "Logo",
        "link": "https://acme.example/about",
        "original": "https://cdn.acme.example/logo.png",
        "thumbnail": "https://thumbs.example/1.jpg"
    }))
    .unwrap();
    let image = normalize_image(item, 2, stamp());
    assert_eq!(image.url, "https://cdn.acme.example/logo.png");
    assert_eq!(image.source_url, "https://acme.example/about");
    assert_eq!(image.thumbnail, "https://thumbs.example/1.jpg");

    let bare: ImageItem = serde_json::from_value(json!({"link": "https://acme.example"})).unwrap();
    let image = normalize_image(bare, 1, stamp());
    assert_eq!(image.url, "https://acme.example");
    assert_eq!(image.thumbnail, NOT_AVAILABLE);
}

#[test]
fn ai_answer_joins_blocks_and_keeps_citations() {
    let page: AiAnswerPage = serde_json::from_value(json!({
        "text_blocks": [
            {"type": "paragraph", "snippet": "Acme Corp is a manufacturer."},
            {"type": "list", "list": [{"snippet": "Founded 1950"}, {"snippet": " "}]}
        ],
        "references": [
            {"title": "About Acme", "link": "https://acme.example", "source": "acme.example"},
            {"link": "https://wiki.example/acme"}
        ]
    }))
    .unwrap();
    let answer = normalize_ai_answer(page, stamp()).unwrap();
    assert_eq!(answer.text, "Acme Corp is a manufacturer.\n\nFounded 1950");
    assert_eq!(answer.citations.len(), 2);
    assert_eq!(answer.citations[1].title, NOT_AVAILABLE);
    assert_eq!(answer.keyword, "Acme Corp");
}

#[test]
fn ai_answer_without_text_is_none() {
    let page: AiAnswerPage =
        serde_json::from_value(json!({"references": [{"title": "x"}]})).unwrap();
    assert!(normalize_ai_answer(page, stamp()).is_none());
}
