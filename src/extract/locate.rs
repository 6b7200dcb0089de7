//! Locate-or-default lookups over a parsed profile
//!
//! Every lookup is independent and returns an `Option`; a selector that
//! matches nothing is never an error. List-valued fields are described
//! declaratively by `ListLocator` entries and collected by one routine.
//! Selectors are compiled once, on first use.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid profile selector")
}

/// Where the containers of a `ListLocator` come from
#[derive(Debug)]
pub enum ContainerScope {
    /// Every match in the document
    All(Selector),
    /// Only the first `section` of the document; its `groups`, or the
    /// section itself when there are none
    First {
        section: Selector,
        groups: Option<Selector>,
    },
}

/// Which containers of a `ListLocator` contribute items
#[derive(Debug)]
pub enum ContainerFilter {
    /// Every container in scope
    Any,
    /// Containers whose first `heading` element reads exactly `text`
    HeadingEquals {
        heading: Selector,
        text: &'static str,
    },
    /// Containers whose text contains `needle`
    TextContains(&'static str),
}

/// Declarative description of a list-valued field
pub struct ListLocator {
    pub scope: ContainerScope,
    pub filter: ContainerFilter,
    pub item: Selector,
    pub clean: fn(&str) -> String,
}

pub static CREDENTIALS: LazyLock<ListLocator> = LazyLock::new(|| ListLocator {
    scope: ContainerScope::First {
        section: selector("h2.profile-suffix-heading"),
        groups: Some(selector("span.profile-suffix-container")),
    },
    filter: ContainerFilter::Any,
    item: selector("span.glossary-tooltip-link"),
    clean: keep,
});

pub static INSURANCE: LazyLock<ListLocator> = LazyLock::new(|| ListLocator {
    scope: ContainerScope::First {
        section: selector("div.insurance"),
        groups: None,
    },
    filter: ContainerFilter::Any,
    item: selector("span"),
    clean: keep,
});

pub static SPECIALTIES: LazyLock<ListLocator> = LazyLock::new(|| ListLocator {
    scope: ContainerScope::First {
        section: selector("div.specialty-attributes-section"),
        groups: Some(selector("div.attributes-group")),
    },
    filter: ContainerFilter::Any,
    item: selector("span.attribute_base"),
    clean: keep,
});

pub static THERAPY_TYPES: LazyLock<ListLocator> = LazyLock::new(|| ListLocator {
    scope: ContainerScope::All(selector("div.attributes-group")),
    filter: ContainerFilter::HeadingEquals {
        heading: selector("h3.attributes-group-title"),
        text: "Types of Therapy",
    },
    item: selector("ul.section-list li span.attribute_base"),
    clean: keep,
});

pub static CLIENT_AGES: LazyLock<ListLocator> = LazyLock::new(|| ListLocator {
    scope: ContainerScope::First {
        section: selector("div.client-focus-container-small"),
        groups: Some(selector("div.client-focus-tile")),
    },
    filter: ContainerFilter::TextContains("Age"),
    item: selector("div.client-focus-item span.client-focus-description"),
    clean: strip_trailing_separators,
});

pub static BREADCRUMB_LOCALITY: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[data-x="breadcrumb-City"] div[itemprop="name"]"#));
pub static DISPLAY_NAME: LazyLock<Selector> = LazyLock::new(|| selector("h1.profile-title"));
pub static TELEPHONE: LazyLock<Selector> = LazyLock::new(|| selector("a.phone-icon-ctr"));
pub static ADDRESS_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.address"));
pub static ADDRESS_LINE: LazyLock<Selector> = LazyLock::new(|| selector("p.address-line"));
pub static ADDRESS_POSTAL: LazyLock<Selector> = LazyLock::new(|| selector("span"));
pub static FEES: LazyLock<Selector> = LazyLock::new(|| selector("div.fees"));

/// Element text with runs of whitespace collapsed to single spaces
pub fn normalized_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Normalized text of the first element matching `selector`
///
/// Empty text counts as absent.
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(normalized_text)
        .filter(|text| !text.is_empty())
}

/// Normalized text of the first element matching `selector` below `scope`
pub fn first_text_in(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(normalized_text)
        .filter(|text| !text.is_empty())
}

/// All elements matching `selector`, in document order
pub fn select_all<'a>(document: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    document.select(selector).collect()
}

/// Collects a list field
///
/// Returns None when the field's section is missing, and `Some` (possibly
/// empty) otherwise. Items keep document order and are not deduplicated;
/// empty items are dropped.
pub fn collect_list(document: &Html, locator: &ListLocator) -> Option<Vec<String>> {
    let containers = match &locator.scope {
        ContainerScope::All(container) => {
            let all = select_all(document, container);
            if all.is_empty() {
                return None;
            }
            all
        }
        ContainerScope::First { section, groups } => {
            let section = document.select(section).next()?;
            match groups {
                Some(groups) => section.select(groups).collect(),
                None => vec![section],
            }
        }
    };

    let items = containers
        .into_iter()
        .filter(|container| accepts(&locator.filter, *container))
        .flat_map(|container| {
            container
                .select(&locator.item)
                .map(normalized_text)
                .map(|text| (locator.clean)(&text))
                .collect::<Vec<_>>()
        })
        .filter(|item| !item.is_empty())
        .collect();

    Some(items)
}

fn accepts(filter: &ContainerFilter, container: ElementRef<'_>) -> bool {
    match filter {
        ContainerFilter::Any => true,
        ContainerFilter::HeadingEquals { heading, text } => {
            first_text_in(container, heading).as_deref() == Some(*text)
        }
        ContainerFilter::TextContains(needle) => normalized_text(container).contains(needle),
    }
}

fn keep(text: &str) -> String {
    text.to_string()
}

/// "Adults (18 to 64)," -> "Adults (18 to 64)"
fn strip_trailing_separators(text: &str) -> String {
    text.trim_end_matches([' ', ',']).to_string()
}
