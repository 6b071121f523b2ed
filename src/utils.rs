/// Convert a source name or URL to a safe file stem
pub fn sanitize_filename(name: &str) -> String {
    let name = name
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    let mut sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '#' | '%' | '*' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    // Limit filename length
    if let Some((idx, _)) = sanitized.char_indices().nth(100) {
        sanitized.truncate(idx);
    }

    if sanitized.is_empty() {
        "scrape".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("noon-laptops"), "noon-laptops");
        assert_eq!(
            sanitize_filename("https://www.nawy.com/search?page_number=1"),
            "www.nawy.com_search_page_number_1"
        );
        assert_eq!(sanitize_filename("my source"), "my_source");
        assert_eq!(sanitize_filename("  "), "scrape");
        assert_eq!(sanitize_filename(&"x".repeat(300)).len(), 100);
    }
}
