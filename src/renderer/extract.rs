//! Static DOM extraction of forms and links
//!
//! Produces the same records the in-browser extraction script does, following
//! DOM property semantics:
//! - `action` is resolved against the document base; empty means the page URL
//! - `method` is lower-cased and falls back to `get`
//! - input `type` falls back to `text`; selects report `select-one`/`select-multiple`
//! - option entries are the option value, or its label text when no value is set

use super::PageSnapshot;
use crate::forms::{FieldRecord, FormRecord};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const INPUT_TYPES: &[&str] = &[
    "hidden",
    "text",
    "search",
    "tel",
    "url",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "range",
    "color",
    "checkbox",
    "radio",
    "file",
    "submit",
    "image",
    "reset",
    "button",
];

const FORM_METHODS: &[&str] = &["get", "post", "dialog"];

/// Href prefixes that never lead to a crawlable page (matched case-insensitively)
pub(crate) const SKIPPED_HREF_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Parses an HTML document loaded from `page_url` and extracts its forms and links
///
/// # Example
///
/// ```
/// use formscout::renderer::extract_page;
/// use url::Url;
///
/// let html = r#"<form action="/login" method="POST"><input name="user" required></form>"#;
/// let page = Url::parse("https://example.com/account").unwrap();
/// let snapshot = extract_page(html, &page);
///
/// assert_eq!(snapshot.forms[0].action, "https://example.com/login");
/// assert_eq!(snapshot.forms[0].method, "post");
/// assert!(snapshot.forms[0].fields[0].required);
/// ```
pub fn extract_page(html: &str, page_url: &Url) -> PageSnapshot {
    let document = Html::parse_document(html);
    let base_url = document_base(&document, page_url);

    PageSnapshot {
        url: page_url.to_string(),
        forms: extract_forms(&document, page_url, &base_url),
        links: extract_links(&document, &base_url),
    }
}

/// Honours a `<base href>` the way a browser does
fn document_base(document: &Html, page_url: &Url) -> Url {
    selector("base[href]")
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|el| el.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

fn extract_forms(document: &Html, page_url: &Url, base_url: &Url) -> Vec<FormRecord> {
    let (Some(form_sel), Some(field_sel)) = (selector("form"), selector("input, textarea, select"))
    else {
        return Vec::new();
    };

    document
        .select(&form_sel)
        .map(|form| {
            let fields = form.select(&field_sel).map(extract_field).collect();
            FormRecord {
                url: page_url.to_string(),
                action: form_action(form, page_url, base_url),
                method: form_method(form),
                fields,
            }
        })
        .collect()
}

fn form_action(form: ElementRef<'_>, page_url: &Url, base_url: &Url) -> String {
    match form.value().attr("action").map(str::trim) {
        None | Some("") => page_url.to_string(),
        Some(action) => base_url
            .join(action)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| action.to_string()),
    }
}

fn form_method(form: ElementRef<'_>) -> String {
    let method = form
        .value()
        .attr("method")
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if FORM_METHODS.contains(&method.as_str()) {
        method
    } else {
        "get".to_string()
    }
}

fn extract_field(element: ElementRef<'_>) -> FieldRecord {
    let el = element.value();
    let attr = |name: &str| el.attr(name).unwrap_or_default().to_string();

    let (field_type, options) = match el.name() {
        "textarea" => ("textarea".to_string(), None),
        "select" => {
            let kind = if el.attr("multiple").is_some() {
                "select-multiple"
            } else {
                "select-one"
            };
            (kind.to_string(), Some(select_options(element)))
        }
        _ => (input_type(el.attr("type")), None),
    };

    FieldRecord {
        field_type,
        name: attr("name"),
        id: attr("id"),
        placeholder: attr("placeholder"),
        required: el.attr("required").is_some(),
        options,
    }
}

fn input_type(raw: Option<&str>) -> String {
    let raw = raw.map(|t| t.trim().to_ascii_lowercase()).unwrap_or_default();
    if INPUT_TYPES.contains(&raw.as_str()) {
        raw
    } else {
        "text".to_string()
    }
}

fn select_options(select: ElementRef<'_>) -> Vec<String> {
    let Some(option_sel) = selector("option") else {
        return Vec::new();
    };

    select
        .select(&option_sel)
        .map(|option| match option.value().attr("value") {
            Some(value) => value.to_string(),
            None => collapse_whitespace(&option.text().collect::<String>()),
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts anchor targets as absolute http(s) URLs, in document order
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - invalid URLs, or non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_HREF_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
