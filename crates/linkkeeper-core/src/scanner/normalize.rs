use url::{Origin, Url};

/// Canonical form of a URL for equality comparison: origin + path (one
/// trailing slash stripped unless the path is just `/`) + query, lowercased,
/// fragment dropped. Unparseable input falls back to its lowercased self.
pub fn normalize_url(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return raw.to_lowercase(),
    };

    let mut normalized = match parsed.origin() {
        origin @ Origin::Tuple(..) => origin.ascii_serialization(),
        // chrome://, ssh:// and other non-web schemes still name a host
        Origin::Opaque(_) => match parsed.host_str().filter(|host| !host.is_empty()) {
            Some(host) => match parsed.port() {
                Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
                None => format!("{}://{}", parsed.scheme(), host),
            },
            // mailto:, data:, file:/// and friends
            None => format!("{}:", parsed.scheme()),
        },
    };

    let path = parsed.path();
    match path.strip_suffix('/') {
        Some(trimmed) if path.len() > 1 => normalized.push_str(trimmed),
        _ => normalized.push_str(path),
    }

    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }

    normalized.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_case_and_fragment_are_ignored() {
        let expected = normalize_url("https://example.com/docs/page");
        for variant in [
            "https://example.com/docs/page/",
            "HTTPS://EXAMPLE.COM/Docs/Page",
            "https://example.com/docs/page#section-2",
            "https://Example.com/docs/PAGE/#top",
        ] {
            assert_eq!(normalize_url(variant), expected, "variant {variant}");
        }
    }

    #[test]
    fn test_bare_origin_keeps_root_slash() {
        assert_eq!(normalize_url("http://a.com"), "http://a.com/");
        assert_eq!(normalize_url("http://a.com/"), "http://a.com/");
    }

    #[test]
    fn test_only_one_trailing_slash_is_stripped() {
        assert_eq!(normalize_url("http://a.com/x//"), "http://a.com/x/");
    }

    #[test]
    fn test_query_is_significant() {
        assert_ne!(
            normalize_url("https://example.com/search?q=rust"),
            normalize_url("https://example.com/search?q=go")
        );
        assert_ne!(
            normalize_url("https://example.com/search?q=rust"),
            normalize_url("https://example.com/search")
        );
        assert_eq!(
            normalize_url("https://example.com/search/?Q=Rust"),
            "https://example.com/search?q=rust"
        );
    }

    #[test]
    fn test_empty_query_is_dropped() {
        assert_eq!(normalize_url("https://example.com/a?"), "https://example.com/a");
    }

    #[test]
    fn test_default_port_is_elided() {
        assert_eq!(
            normalize_url("https://example.com:443/a"),
            normalize_url("https://example.com/a")
        );
        assert_eq!(normalize_url("http://example.com:8080/a"), "http://example.com:8080/a");
    }

    #[test]
    fn test_unparseable_input_is_lowercased() {
        assert_eq!(normalize_url("Not A URL/"), "not a url/");
        assert_eq!(normalize_url("example.com/Path"), "example.com/path");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn test_opaque_origin_schemes() {
        assert_eq!(
            normalize_url("mailto:Someone@Example.com"),
            "mailto:someone@example.com"
        );
        assert_eq!(normalize_url("file:///tmp/Notes/"), "file:/tmp/notes");
    }

    #[test]
    fn test_non_web_schemes_keep_their_host() {
        assert_eq!(normalize_url("chrome://settings/"), "chrome://settings/");
        assert_ne!(
            normalize_url("chrome://settings/"),
            normalize_url("chrome://history/")
        );
        assert_ne!(
            normalize_url("ssh://host-a/srv"),
            normalize_url("ssh://host-b/srv")
        );
        assert_eq!(normalize_url("ssh://Host-A:2222/srv/"), "ssh://host-a:2222/srv");
    }

    #[test]
    fn test_distinct_hosts_are_not_duplicates() {
        use crate::analysis::duplicates::find_duplicates;
        use crate::storage::models::Bookmark;

        let bookmarks = vec![
            Bookmark::new(1, "settings", "chrome://settings/"),
            Bookmark::new(2, "history", "chrome://history/"),
            Bookmark::new(3, "a", "ssh://host-a/srv"),
            Bookmark::new(4, "b", "ssh://host-b/srv"),
            Bookmark::new(5, "settings again", "chrome://settings/"),
        ];
        let ids: Vec<i64> = find_duplicates(&bookmarks).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![5]);
    }
}
