use std::time::{Duration, Instant};

use fluidic::{Namespaces, Preprocessor, Translate, UriTranslator};

#[test]
fn namespaces_register() {
    let mut namespaces = Namespaces::new();
    assert!(namespaces.register("f", Some("Vendor\\Fluid\\ViewHelpers")));
    assert!(namespaces.is_known("f"));
    assert!(!namespaces.is_ignored("f"));
    assert!(namespaces.is_valid_or_ignored("f"));
    assert_eq!(namespaces.target("f"), Some("Vendor\\Fluid\\ViewHelpers"));
    assert_eq!(namespaces.len(), 1);
}

#[test]
fn namespaces_register_overwrites() {
    let mut namespaces = Namespaces::new();
    namespaces.register("f", Some("First"));
    namespaces.register("f", Some("Second"));
    assert_eq!(namespaces.target("f"), Some("Second"));
    namespaces.ignore("f");
    assert!(!namespaces.is_known("f"));
    assert!(namespaces.is_ignored("f"));
    assert_eq!(namespaces.len(), 1);
}

#[test]
fn namespaces_register_rejects_uri() {
    let mut namespaces = Namespaces::new();
    assert!(!namespaces.register("html", Some("http://www.w3.org/1999/xhtml")));
    assert!(!namespaces.contains("html"));
    assert!(namespaces.is_empty());
}

#[test]
fn namespaces_register_without_target() {
    let mut namespaces = Namespaces::new();
    assert!(namespaces.register("foo", None::<String>));
    assert!(namespaces.is_ignored("foo"));
    assert!(!namespaces.is_known("foo"));
    assert_eq!(namespaces.target("foo"), None);
}

#[test]
fn namespaces_unknown() {
    let namespaces = Namespaces::new();
    assert!(!namespaces.is_known("x"));
    assert!(!namespaces.is_ignored("x"));
    assert!(!namespaces.is_valid_or_ignored("x"));
}

#[test]
fn namespaces_wildcard_ignore() {
    let mut namespaces = Namespaces::new();
    namespaces.ignore("foo*");
    assert!(namespaces.is_ignored("foo"));
    assert!(namespaces.is_ignored("foobar"));
    assert!(namespaces.is_ignored("foo.bar"));
    assert!(!namespaces.is_ignored("barfoo"));
    assert!(!namespaces.is_known("foobar"));
}

#[test]
fn namespaces_wildcard_does_not_override_known() {
    let mut namespaces = Namespaces::new();
    namespaces.ignore("f*");
    namespaces.register("fx", Some("Vendor\\Fx"));
    assert!(namespaces.is_known("fx"));
    assert!(!namespaces.is_ignored("fx"));
    assert!(namespaces.is_valid_or_ignored("fy"));
}

#[test]
fn namespaces_wildcard_only_when_ignored() {
    let mut namespaces = Namespaces::new();
    namespaces.register("a*", Some("Vendor\\A"));
    assert!(!namespaces.is_valid_or_ignored("ab"));
}

#[test]
fn namespaces_wildcard_many_stars() {
    let mut namespaces = Namespaces::new();
    namespaces.ignore(format!("{}b", "a*".repeat(32)));
    let now = Instant::now();
    assert!(!namespaces.is_ignored(&"a".repeat(200)));
    assert!(namespaces.is_ignored(&format!("{}b", "a".repeat(200))));
    assert!(now.elapsed() < Duration::from_secs(2));
}

#[test]
fn namespaces_wildcard_many_stars_declared_inline() {
    let source = format!("{{namespace {}b}}<{}:x/>", "a*".repeat(16), "a".repeat(40));
    let mut namespaces = Namespaces::new();
    let now = Instant::now();
    let err = Preprocessor::new()
        .preprocess(&source, &mut namespaces)
        .unwrap_err();
    assert!(now.elapsed() < Duration::from_secs(2));
    assert!(err.to_string().starts_with("unknown namespace: &lt;aaaa"));
}

#[test]
fn namespaces_wildcard_reregistered_with_target() {
    let mut namespaces = Namespaces::new();
    namespaces.ignore("foo*");
    namespaces.register("foo*", Some("Vendor\\Foo"));
    assert!(!namespaces.is_ignored("foobar"));
    assert_eq!(namespaces, {
        let mut expected = Namespaces::new();
        expected.register("foo*", Some("Vendor\\Foo"));
        expected
    });
}

#[test]
fn namespaces_iter_sorted() {
    let mut namespaces = Namespaces::new();
    namespaces.register("v", Some("Vendor\\V"));
    namespaces.ignore("a");
    namespaces.register("f", Some("Vendor\\F"));
    let bindings: Vec<_> = namespaces.iter().collect();
    assert_eq!(
        bindings,
        [
            ("a", None),
            ("f", Some("Vendor\\F")),
            ("v", Some("Vendor\\V"))
        ]
    );
}

#[test]
fn uri_translator_default() {
    let t = UriTranslator::default();
    assert_eq!(
        t.translate("http://typo3.org/ns/Vendor/Package/ViewHelpers"),
        "Vendor\\Package\\ViewHelpers"
    );
    assert_eq!(t.translate("Vendor\\Package"), "Vendor\\Package");
    assert_eq!(
        t.translate("http://www.w3.org/1999/xhtml"),
        "http://www.w3.org/1999/xhtml"
    );
    assert_eq!(
        t.translate("http://typo3.org/ns/Vendor/Package"),
        "http://typo3.org/ns/Vendor/Package"
    );
}

#[test]
fn uri_translator_custom() {
    let t = UriTranslator::new("urn:", "/Helpers");
    assert_eq!(t.translate("urn:Acme/Blog/Helpers"), "Acme\\Blog\\Helpers");
}

#[test]
fn translate_closure() {
    let t = |uri: &str| uri.to_uppercase();
    assert_eq!(t.translate("abc"), "ABC");
}
