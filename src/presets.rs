//! Built-in sources: the noon.com gaming-laptop listing (browser and static
//! variants) and the nawy.com property search.

use crate::config::{
    InfiniteScrollConfig, PaginatedConfig, RendererConfig, RendererKind, SourceConfig,
    TerminationMode, TraversalConfig,
};
use crate::parsers::{FeatureBlockSpec, FieldSpec, RecordSchema};
use std::collections::BTreeMap;
use std::path::PathBuf;

const NOON_ORIGIN: &str = "https://www.noon.com";
const NOON_LAPTOPS_URL: &str = "https://www.noon.com/egypt-en/eg-gaming-laptops/?page={page}";

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Mobile Safari/537.36";

/// Names accepted by [`preset`]
pub const PRESET_NAMES: &[&str] = &["noon-laptops", "noon-laptops-static", "nawy-properties"];

/// Look up a built-in source by name
pub fn preset(name: &str) -> Option<SourceConfig> {
    match name {
        "noon-laptops" => Some(noon_laptops()),
        "noon-laptops-static" => Some(noon_laptops_static()),
        "nawy-properties" => Some(nawy_properties()),
        _ => None,
    }
}

/// Product listing fields shared by both noon variants
fn listing_schema(container: &str, link_selectors: &[&str], rating: &str) -> RecordSchema {
    RecordSchema {
        container: container.to_string(),
        sentinel: "N/A".to_string(),
        fields: vec![
            FieldSpec::text("Product_name", &["h2.ProductDetailsSection_title__JorAV"]),
            FieldSpec::text("Rating", &[rating]),
            FieldSpec::text("Price", &["strong.Price_amount__2sXa7"]),
            FieldSpec::link("Product_link", link_selectors),
            FieldSpec::image("Image_link", &["img.ProductImageCarousel_productImage__jtsOn"]),
        ],
        features: None,
    }
}

/// Script-rendered noon listing, pages 1-5 through a browser
pub fn noon_laptops() -> SourceConfig {
    SourceConfig {
        name: "noon_gaming_laptops".to_string(),
        origin: NOON_ORIGIN.to_string(),
        traversal: TraversalConfig::Paginated(PaginatedConfig {
            url_template: NOON_LAPTOPS_URL.to_string(),
            first_page: 1,
            last_page: 5,
            readiness_selector: Some("div.ProductBoxLinkHandler_linkWrapper__b0qZ9".to_string()),
            readiness_timeout_secs: 10,
            politeness_delay_ms: 2000,
            termination: TerminationMode::SkipEmpty,
        }),
        renderer: RendererConfig {
            kind: RendererKind::Browser,
            user_agent: Some(DESKTOP_USER_AGENT.to_string()),
            ..RendererConfig::default()
        },
        schema: listing_schema(
            "div.ProductBoxLinkHandler_linkWrapper__b0qZ9",
            &["a.ProductBoxLinkHandler_productBoxLink__FPhjp"],
            "span.RatingPreviewStar_textCtr__sfsJG",
        ),
        output: Some(PathBuf::from("output/noon_gaming_laptops.csv")),
    }
}

/// Static noon listing over plain HTTP; the product anchor is the container
pub fn noon_laptops_static() -> SourceConfig {
    let mut headers = BTreeMap::new();
    headers.insert(
        "accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert(
        "accept-language".to_string(),
        "en,ar-AE;q=0.9,ar;q=0.8,en-US;q=0.7".to_string(),
    );
    headers.insert("cache-control".to_string(), "max-age=0".to_string());
    headers.insert("upgrade-insecure-requests".to_string(), "1".to_string());

    SourceConfig {
        name: "noon_gaming_laptops_v1".to_string(),
        origin: NOON_ORIGIN.to_string(),
        traversal: TraversalConfig::Paginated(PaginatedConfig {
            url_template: NOON_LAPTOPS_URL.to_string(),
            first_page: 1,
            last_page: 5,
            readiness_selector: None,
            readiness_timeout_secs: 10,
            politeness_delay_ms: 1000,
            termination: TerminationMode::StopOnFirstEmpty,
        }),
        renderer: RendererConfig {
            kind: RendererKind::Http,
            user_agent: Some(MOBILE_USER_AGENT.to_string()),
            headers,
            ..RendererConfig::default()
        },
        schema: listing_schema(
            "a.ProductBoxLinkHandler_productBoxLink__FPhjp",
            &[],
            "div.RatingPreviewStar_textCtr__sfsJG",
        ),
        output: Some(PathBuf::from("output/noon_gaming_laptops_v1.csv")),
    }
}

/// nawy.com search results, loaded by scrolling the results pane
pub fn nawy_properties() -> SourceConfig {
    SourceConfig {
        name: "real_estate_properties".to_string(),
        origin: "https://www.nawy.com".to_string(),
        traversal: TraversalConfig::InfiniteScroll(InfiniteScrollConfig {
            url: "https://www.nawy.com/search?page_number=1&category=property".to_string(),
            scroll_container: "div.sc-88b4dfdb-0.cgVQXi".to_string(),
            scroll_count: 100,
            scroll_wait_ms: 5000,
            scroll_distance: 1500,
            readiness_timeout_secs: 30,
        }),
        renderer: RendererConfig::default(),
        schema: RecordSchema {
            container: "div.sc-100c08da-0.eeBcMz".to_string(),
            sentinel: String::new(),
            fields: vec![
                FieldSpec::text("Location", &["div.area"]),
                FieldSpec::text("Name", &["div.name"]),
                FieldSpec::text("Description", &["h2.sc-4b9910fd-0.hyACaB"]),
                FieldSpec::feature("Area", "m2"),
                FieldSpec::feature("Beds", "beds"),
                FieldSpec::feature("Baths", "baths"),
                FieldSpec::text("Price", &["div.price-container span.price"]),
            ],
            features: Some(FeatureBlockSpec {
                block: "div.sc-234f71bd-0.bbWDeD".to_string(),
                label: "span.label".to_string(),
                value: "span.value".to_string(),
            }),
        },
        output: Some(PathBuf::from("output/real_estate_properties.csv")),
    }
}
