use std::time::{Duration, Instant};

use fluidic::{ErrorKind, Namespaces, Patterns, Preprocessor};

fn line_count(s: &str) -> usize {
    s.matches('\n').count()
}

fn preprocess(source: &str) -> fluidic::Result<(String, Namespaces)> {
    let mut namespaces = Namespaces::new();
    let output = Preprocessor::new().preprocess(source, &mut namespaces)?;
    Ok((output, namespaces))
}

fn unknown(source: &str, namespaces: &mut Namespaces) -> (String, String) {
    let err = Preprocessor::new()
        .preprocess(source, namespaces)
        .unwrap_err();
    match err.kind() {
        ErrorKind::UnknownNamespace { identifier, text } => (identifier.clone(), text.clone()),
        kind => panic!("unexpected error kind {kind:?}"),
    }
}

#[test]
fn preprocess_empty() {
    let (output, namespaces) = preprocess("").unwrap();
    assert_eq!(output, "");
    assert!(namespaces.is_empty());
}

#[test]
fn preprocess_raw() {
    let (output, _) = preprocess("lorem ipsum {dolor} sit amet").unwrap();
    assert_eq!(output, "lorem ipsum {dolor} sit amet");
}

#[test]
fn preprocess_debug() {
    format!("{:?}", Preprocessor::new());
}

#[test]
fn mask_literal_block() {
    let masked = Preprocessor::new().mask_literals("a\n<![CDATA[\nb\n]]>\nc");
    assert_eq!(masked, "a\n\n\n\nc");
}

#[test]
fn mask_literal_block_nested() {
    let masked = Preprocessor::new().mask_literals("x<![CDATA[ a <![CDATA[ b ]]> c ]]>y");
    assert_eq!(masked, "xy");
}

#[test]
fn mask_literal_block_unterminated() {
    let masked = Preprocessor::new().mask_literals("x\n<![CDATA[\n<bad:tag/>\ny");
    assert_eq!(masked, "x\n\n\n");
}

#[test]
fn mask_literal_block_stray_end() {
    let masked = Preprocessor::new().mask_literals("a ]]> b <![CDATA[c]]> d");
    assert_eq!(masked, "a ]]> b  d");
}

#[test]
fn mask_literal_block_stray_end_before_block() {
    let source = "]]>\n<![CDATA[<bad:tag/>]]>";
    assert_eq!(Preprocessor::new().mask_literals(source), "]]>\n");
    preprocess(source).unwrap();
}

#[test]
fn mask_literal_block_custom_delimiters() {
    let patterns = Patterns::builder().literal("<!--", "-->").build();
    let masked = Preprocessor::with_patterns(patterns).mask_literals("a<!--\n<bad:tag/>-->b<![CDATA[c]]>");
    assert_eq!(masked, "a\nb<![CDATA[c]]>");
}

#[test]
fn preprocess_preserves_line_count() {
    let sources = [
        "",
        "\n\n",
        "lorem\nipsum\n",
        "a\r\n<![CDATA[\r\n]]>\r\nb",
        "<![CDATA[\n<![CDATA[\n]]>\n]]>\n",
        "<![CDATA[\n\n unterminated\n",
        "]]>\n<![CDATA[\n]]>\n]]>",
        "{namespace f=Vendor.Fluid}\n<f:render/>\n<![CDATA[\n<x:y/>\n]]>",
    ];
    for source in sources {
        let (output, _) = preprocess(source).unwrap();
        assert_eq!(line_count(&output), line_count(source), "{source:?}");
    }
}

#[test]
fn preprocess_literal_block_hides_unknown_namespace() {
    preprocess("before <![CDATA[<bad:tag>]]> after").unwrap();
    preprocess("<![CDATA[{x -> bad:helper()}]]>").unwrap();
}

#[test]
fn preprocess_literal_block_hides_declarations() {
    let (_, namespaces) = preprocess("<![CDATA[{namespace f=Vendor.Fluid}]]>").unwrap();
    assert!(!namespaces.contains("f"));
}

#[test]
fn preprocess_inline_declaration() {
    let (output, namespaces) = preprocess("{namespace f=Vendor.Fluid}\n<f:render/>").unwrap();
    assert_eq!(output, "{namespace f=Vendor.Fluid}\n<f:render/>");
    assert_eq!(output.lines().count(), 2);
    assert!(namespaces.is_known("f"));
    assert_eq!(namespaces.target("f"), Some("Vendor.Fluid"));
}

#[test]
fn preprocess_inline_declaration_symbol_namespace() {
    let (_, namespaces) = preprocess("{namespace  v = Vendor\\Package\\ViewHelpers }").unwrap();
    assert_eq!(namespaces.target("v"), Some("Vendor\\Package\\ViewHelpers"));
}

#[test]
fn preprocess_inline_declaration_without_target_ignores() {
    let (_, namespaces) = preprocess("{namespace foo}\n<foo:bar />{x -> foo:baz()}").unwrap();
    assert!(namespaces.is_ignored("foo"));
    assert!(!namespaces.is_known("foo"));
    assert_eq!(namespaces.target("foo"), None);
}

#[test]
fn preprocess_inline_declaration_wildcard() {
    let (_, namespaces) = preprocess("{namespace foo*}<foobar:x /><foo.baz:y></foo.baz:y>").unwrap();
    assert!(namespaces.is_ignored("foobar"));
}

#[test]
fn preprocess_inline_declaration_escaped() {
    let mut namespaces = Namespaces::new();
    let (identifier, _) = unknown("\\{namespace foo}<foo:bar />", &mut namespaces);
    assert_eq!(identifier, "foo");
    assert!(!namespaces.contains("foo"));
}

#[test]
fn preprocess_xmlns_declaration() {
    let (_, namespaces) = preprocess("<html xmlns:foo=\"Vendor\\Package\">\n<foo:bar />\n</html>").unwrap();
    assert!(namespaces.is_known("foo"));
    assert_eq!(namespaces.target("foo"), Some("Vendor\\Package"));
}

#[test]
fn preprocess_xmlns_declaration_conventional_uri() {
    let (_, namespaces) = preprocess(
        "<html xmlns:v=\"http://typo3.org/ns/Vendor/Package/ViewHelpers\" data-namespace-typo3-fluid=\"true\">",
    )
    .unwrap();
    assert_eq!(namespaces.target("v"), Some("Vendor\\Package\\ViewHelpers"));
}

#[test]
fn preprocess_xmlns_declaration_unresolvable() {
    let (_, namespaces) = preprocess("<html xmlns:foo=\"http://www.w3.org/1999/xhtml\">").unwrap();
    assert!(!namespaces.is_known("foo"));
    assert!(!namespaces.contains("foo"));
}

#[test]
fn preprocess_xmlns_declaration_single_quoted_case_insensitive() {
    let (_, namespaces) = preprocess("<div XMLNS:Foo='Vendor\\\\Escaped'></div>").unwrap();
    assert_eq!(namespaces.target("Foo"), Some("Vendor\\Escaped"));
}

#[test]
fn preprocess_xmlns_declaration_custom_translator() {
    let mut preprocessor = Preprocessor::new();
    preprocessor.set_translator(|uri: &str| format!("Translated\\{}", uri.replace('.', "\\")));
    let mut namespaces = Namespaces::new();
    preprocessor
        .preprocess("<div xmlns:x=\"a.b\"><x:y /></div>", &mut namespaces)
        .unwrap();
    assert_eq!(namespaces.target("x"), Some("Translated\\a\\b"));
}

#[test]
fn preprocess_xmlns_declaration_no_escape_mechanism() {
    let (_, namespaces) = preprocess("\\xmlns:foo=\"Vendor\\Package\"").unwrap();
    assert!(namespaces.is_known("foo"));
}

#[test]
fn preprocess_known_namespace_tags() {
    let mut namespaces = Namespaces::new();
    namespaces.register("f", Some("Vendor\\Fluid"));
    let source = "<f:if condition=\"{user.enabled}\">\n  <f:then>{user.name}</f:then>\n</f:if>";
    let output = Preprocessor::new()
        .preprocess(source, &mut namespaces)
        .unwrap();
    assert_eq!(output, source);
}

#[test]
fn preprocess_err_unknown_namespace_tag() {
    let mut namespaces = Namespaces::new();
    let (identifier, text) = unknown("<bad:tag/>", &mut namespaces);
    assert_eq!(identifier, "bad");
    assert_eq!(text, "&lt;bad:tag/&gt;");
}

#[test]
fn preprocess_unknown_namespace_tag_ignored_first() {
    let mut namespaces = Namespaces::new();
    namespaces.ignore("bad");
    Preprocessor::new()
        .preprocess("<bad:tag/>", &mut namespaces)
        .unwrap();
}

#[test]
fn preprocess_err_unknown_namespace_tag_with_attributes() {
    let mut namespaces = Namespaces::new();
    let (_, text) = unknown("<x:link href='a&b' title=\"t\">", &mut namespaces);
    assert_eq!(text, "&lt;x:link href=&#039;a&amp;b&#039; title=&quot;t&quot;&gt;");
}

#[test]
fn preprocess_unknown_namespace_closing_tag_skipped() {
    preprocess("</bad:tag>").unwrap();
}

#[test]
fn preprocess_err_unknown_namespace_first_in_document_order() {
    let mut namespaces = Namespaces::new();
    let (identifier, _) = unknown("{a -> second:x()}\n<first:y/>\n", &mut namespaces);
    assert_eq!(identifier, "second");
    let (identifier, _) = unknown("<first:y/> {a -> second:x()}", &mut namespaces);
    assert_eq!(identifier, "first");
}

#[test]
fn preprocess_err_unknown_namespace_shorthand() {
    let mut namespaces = Namespaces::new();
    namespaces.register("f", Some("Vendor\\Fluid"));
    let (identifier, text) = unknown("{post.title -> f:format.raw() -> g:wrap(tag: 'b')}", &mut namespaces);
    assert_eq!(identifier, "g");
    assert_eq!(text, "g");
}

#[test]
fn preprocess_shorthand_view_helper_without_object() {
    let mut namespaces = Namespaces::new();
    let (identifier, _) = unknown("Hello {x:format.date(date: now, format: 'Y')}", &mut namespaces);
    assert_eq!(identifier, "x");
}

#[test]
fn preprocess_shorthand_non_accessor_sections_skipped() {
    preprocess("{a: 1, b: 'x:y()'} {1 + 2} {'x:y()'}").unwrap();
}

#[test]
fn preprocess_registers_before_failing() {
    let mut namespaces = Namespaces::new();
    unknown("{namespace ok}\n<bad:x/>", &mut namespaces);
    assert!(namespaces.is_ignored("ok"));
}

#[test]
fn preprocess_err_unknown_namespace_display() {
    let mut namespaces = Namespaces::new();
    let err = Preprocessor::new()
        .preprocess("lorem <bad:tag/>", &mut namespaces)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown namespace: &lt;bad:tag/&gt; between bytes 6 and 16"
    );
}

#[test]
fn preprocess_err_unknown_namespace_pretty() {
    let mut namespaces = Namespaces::new();
    let err = Preprocessor::new()
        .preprocess("Hello\n{name -> x:y()}\n", &mut namespaces)
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 2 | {name -> x:y()}
   |          ^ unknown namespace: x
"
    );
}

#[test]
fn preprocess_err_unknown_namespace_pretty_after_literal_block() {
    let mut namespaces = Namespaces::new();
    let err = Preprocessor::new()
        .preprocess("<![CDATA[\n\n]]>\n<bad:tag/>", &mut namespaces)
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 4 | <bad:tag/>
   | ^^^^^^^^^^ unknown namespace: &lt;bad:tag/&gt;
"
    );
}

#[test]
fn preprocess_large_shorthand_sections() {
    let object = "a".repeat(100_000);
    let sources = [
        format!("{{{object} b}}"),
        format!("{{{object}}}"),
        format!("{{{object} -> f:x()}}"),
        format!("{}a;", "{".repeat(100_000)),
        format!("{{x -> {object}:y(}}"),
    ];
    let mut namespaces = Namespaces::new();
    namespaces.register("f", Some("Vendor\\Fluid"));
    for source in &sources {
        let now = Instant::now();
        Preprocessor::new()
            .preprocess(source, &mut namespaces)
            .unwrap();
        assert!(now.elapsed() < Duration::from_secs(2), "{}", &source[..16]);
    }
}
