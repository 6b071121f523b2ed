use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Collects the text of an element, collapsing runs of whitespace.
///
/// Adjacent text nodes are concatenated as-is, so inline children split
/// across tags (`1,<i>200</i>`) read as one word.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the first element matched by any of `selectors`, tried in order.
///
/// An empty selector list refers to `scope` itself.
pub fn first_match<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    if selectors.is_empty() {
        return Some(scope);
    }

    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// Reads an attribute, treating blank values as absent
pub fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolves a possibly relative link against the source origin
pub fn resolve_link(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match origin.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            ::log::debug!("Could not resolve link {:?} against {}: {}", href, origin, e);
            None
        }
    }
}

/// Whether `selector` matches anything in the document
pub fn contains(html: &str, selector: &Selector) -> bool {
    let doc = Html::parse_document(html);
    doc.select(selector).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://www.noon.com").unwrap()
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let doc = Html::parse_fragment("<div>  EGP <strong>45,999</strong>\n  </div>");
        let selector = Selector::parse("div").unwrap();
        let div = doc.select(&selector).next().unwrap();
        assert_eq!(element_text(div), "EGP 45,999");
    }

    #[test]
    fn test_element_text_joins_inline_children() {
        let doc = Html::parse_fragment("<h2>Laptop<b>X</b>1,<i>200</i></h2>");
        let h2 = doc.select(&Selector::parse("h2").unwrap()).next().unwrap();
        assert_eq!(element_text(h2), "LaptopX1,200");

        let doc = Html::parse_fragment("<strong><span>EGP</span> <span>1,</span><span>299</span></strong>");
        let strong = doc.select(&Selector::parse("strong").unwrap()).next().unwrap();
        assert_eq!(element_text(strong), "EGP 1,299");
    }

    #[test]
    fn test_first_match_uses_fallback_order() {
        let doc = Html::parse_fragment(
            r#"<div class="card"><span class="b">second</span><span class="c">third</span></div>"#,
        );
        let card = doc.select(&Selector::parse("div.card").unwrap()).next().unwrap();
        let selectors = vec![
            Selector::parse("span.a").unwrap(),
            Selector::parse("span.c").unwrap(),
            Selector::parse("span.b").unwrap(),
        ];
        let found = first_match(card, &selectors).unwrap();
        assert_eq!(element_text(found), "third");

        // Empty list means the scope itself
        let found = first_match(card, &[]).unwrap();
        assert_eq!(found.value().name(), "div");
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link(&origin(), "/egypt-en/laptop-x/p/"),
            Some("https://www.noon.com/egypt-en/laptop-x/p/".to_string())
        );
        assert_eq!(
            resolve_link(&origin(), "https://cdn.example.com/a"),
            Some("https://cdn.example.com/a".to_string())
        );
        assert_eq!(resolve_link(&origin(), "   "), None);
    }

    #[test]
    fn test_non_empty_attr() {
        let doc = Html::parse_fragment(r#"<img src="" data-src="lazy.jpg">"#);
        let img = doc.select(&Selector::parse("img").unwrap()).next().unwrap();
        assert_eq!(non_empty_attr(img, "src"), None);
        assert_eq!(non_empty_attr(img, "data-src"), Some("lazy.jpg"));
        assert_eq!(non_empty_attr(img, "alt"), None);
    }
}
