//! Plain-text rendering of status HTML.
//!
//! Only the markup Mastodon's renderer emits is handled: paragraphs, line
//! breaks and the `invisible`/`ellipsis` spans used to shorten links.
//! Entities are not decoded and anchors are left in place, since quote
//! detection reads them.

use once_cell::sync::Lazy;
use regex::Regex;

static ELLIPSIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="ellipsis">([^<]*)</span>"#).expect("ellipsis pattern"));

static STRIPPED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^<p>|</p>|<span class="invisible">[^<]*</span>|</?span[^>]*>"#)
        .expect("stripped tag pattern")
});

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br[^>]*>|<p>").expect("line break pattern"));

pub fn sanitize(html: &str) -> String {
    let text = ELLIPSIS.replace_all(html, "${1}...");
    let text = STRIPPED.replace_all(&text, "");
    LINE_BREAK.replace_all(&text, "\n").into_owned()
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ellipsis_before_paragraphs() {
        assert_eq!(
            sanitize(r#"<p>Hello<span class="ellipsis">...more</span></p>"#),
            "Hello...more..."
        );
    }

    #[test]
    fn shortened_link() {
        let html = concat!(
            r#"<p><a href="https://example.com/a/very/long/path">"#,
            r#"<span class="invisible">https://</span>"#,
            r#"<span class="ellipsis">example.com/a/very</span>"#,
            r#"<span class="invisible">/long/path</span></a></p>"#
        );

        assert_eq!(
            sanitize(html),
            r#"<a href="https://example.com/a/very/long/path">example.com/a/very...</a>"#
        );
    }

    #[test]
    fn paragraphs_and_breaks() {
        assert_eq!(sanitize("<p>one<br>two<br />three</p><p>four</p>"), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn mention_spans_lose_tags_only() {
        let html = r#"<p><span class="h-card"><a href="https://example.social/@bob" class="u-url mention">@<span>bob</span></a></span> hi</p>"#;
        assert_eq!(
            sanitize(html),
            r#"<a href="https://example.social/@bob" class="u-url mention">@bob</a> hi"#
        );
    }

    #[test]
    fn entities_are_kept() {
        assert_eq!(sanitize("<p>a &amp; b</p>"), "a &amp; b");
        assert_eq!(sanitize(""), "");
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9 .,!?]{0,12}",
            Just("<p>".to_string()),
            Just("</p>".to_string()),
            Just("<br>".to_string()),
            Just("<br />".to_string()),
            Just("<span>".to_string()),
            Just("</span>".to_string()),
            Just(r#"<span class="h-card">"#.to_string()),
            "[a-z/.]{0,8}".prop_map(|t| format!(r#"<span class="invisible">{}</span>"#, t)),
            "[a-z/.]{0,8}".prop_map(|t| format!(r#"<span class="ellipsis">{}</span>"#, t)),
        ]
    }

    proptest! {
        #[test]
        fn idempotent(parts in prop::collection::vec(fragment(), 0..16)) {
            let once = sanitize(&parts.concat());
            prop_assert_eq!(sanitize(&once), once);
        }
    }
}
