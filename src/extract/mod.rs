use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::SummaryResult;

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Summary field a matched `<meta>` tag writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Url,
    Title,
    Description,
    Thumbnail,
    SiteName,
}

impl SummaryField {
    fn assign(self, result: &mut SummaryResult, value: &str) {
        let value = value.to_string();
        match self {
            SummaryField::Url => result.url = value,
            SummaryField::Title => result.title = Some(value),
            SummaryField::Description => result.description = Some(value),
            SummaryField::Thumbnail => result.thumbnail = Some(value),
            SummaryField::SiteName => result.sitename = Some(value),
        }
    }
}

/// `property` values recognised on `<meta>` tags.
pub const META_PROPERTIES: &[(&str, SummaryField)] = &[
    ("og:image", SummaryField::Thumbnail),
    ("og:url", SummaryField::Url),
    ("og:title", SummaryField::Title),
    ("og:description", SummaryField::Description),
    ("description", SummaryField::Description),
    ("og:site_name", SummaryField::SiteName),
];

fn lookup_property(property: &str) -> Option<SummaryField> {
    META_PROPERTIES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, field)| *field)
}

/// Field a `<meta>` element targets: its `property` first, then a bare
/// `name="description"`.
fn meta_field(meta: &ElementRef<'_>) -> Option<SummaryField> {
    let element = meta.value();
    element
        .attr("property")
        .and_then(lookup_property)
        .or_else(|| match element.attr("name") {
            Some("description") => Some(SummaryField::Description),
            _ => None,
        })
}

/// Build a `SummaryResult` from raw page bytes.
///
/// Total over all inputs: markup the parser cannot make sense of simply
/// yields a summary carrying only `base_url`. Meta tags are applied in
/// document order so later duplicates win; the first `<title>` element is
/// used only when no meta tag supplied a title. Values are passed through
/// untrimmed.
pub fn extract_summary(html: &[u8], base_url: &str) -> SummaryResult {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let mut result = SummaryResult::new(base_url);

    for meta in document.select(&META_SELECTOR) {
        let Some(field) = meta_field(&meta) else {
            continue;
        };
        if let Some(content) = meta.value().attr("content") {
            field.assign(&mut result, content);
        }
    }

    if result.title.is_none() {
        result.title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>());
    }

    result
}
