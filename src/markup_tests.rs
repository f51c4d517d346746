#[cfg(test)]
mod tests {
    use crate::markup::{rewrite_jsx, rewrite_markup, scope_class_list};
    use crate::registry::ScopedNameRegistry;
    use crate::stylesheet::scope_stylesheet;

    #[test]
    fn test_html_class_and_style_name() {
        let mut registry = ScopedNameRegistry::new();
        let html = r#"<div class="title header"><span styleName="footer">x</span></div>"#;
        assert_eq!(
            rewrite_markup(html, &mut registry).unwrap(),
            r#"<div class="pp_0 pp_1"><span class="pp_2">x</span></div>"#
        );
    }

    #[test]
    fn test_html_merges_style_name_into_class() {
        let mut registry = ScopedNameRegistry::new();
        assert_eq!(
            rewrite_markup(r#"<p class="a" styleName="b">"#, &mut registry).unwrap(),
            r#"<p class="pp_0 pp_1">"#
        );
    }

    #[test]
    fn test_single_quotes_are_preserved() {
        let mut registry = ScopedNameRegistry::new();
        assert_eq!(
            rewrite_markup("<a href='/' class='link'>home</a>", &mut registry).unwrap(),
            "<a href='/' class='pp_0'>home</a>"
        );
    }

    #[test]
    fn test_markup_uses_stylesheet_tokens() {
        let mut registry = ScopedNameRegistry::new();
        scope_stylesheet(".footer {} .title {}", &mut registry).unwrap();
        assert_eq!(
            rewrite_markup(r#"<h1 class="title">Hi</h1>"#, &mut registry).unwrap(),
            r#"<h1 class="pp_1">Hi</h1>"#
        );
    }

    #[test]
    fn test_jsx_keeps_class_name_global() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<div className="global-x" styleName="title">{label}</div>"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<div className="global-x pp_0">{label}</div>"#
        );
        assert_eq!(registry.get("global-x"), None);
    }

    #[test]
    fn test_jsx_style_name_becomes_class_name() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<span styleName="a b" onClick={() => go()}>ok</span>"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<span className="pp_0 pp_1" onClick={() => go()}>ok</span>"#
        );
    }

    #[test]
    fn test_jsx_dynamic_class_name_is_left_alone() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<div className={styles.x} styleName="a">"#;
        assert_eq!(rewrite_jsx(jsx, &mut registry).unwrap(), jsx);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_text_without_attributes_is_unchanged() {
        let mut registry = ScopedNameRegistry::new();
        let html = "<!doctype html>\n<p>class=\"title\" in text</p>";
        assert_eq!(rewrite_markup(html, &mut registry).unwrap(), html);
    }

    #[test]
    fn test_class_list_splits_on_whitespace() {
        let mut registry = ScopedNameRegistry::new();
        assert_eq!(
            scope_class_list("  a\tb  a ", &mut registry).unwrap(),
            vec!["pp_0", "pp_1", "pp_0"]
        );
        assert!(scope_class_list("", &mut registry).unwrap().is_empty());
    }

    #[test]
    fn test_jsx_object_literal_attribute_keeps_tag() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<div style={{ color: "red" }} styleName="title">x</div>"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<div style={{ color: "red" }} className="pp_0">x</div>"#
        );
    }

    #[test]
    fn test_jsx_block_body_handler_keeps_tag() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<button onClick={() => { go(); }} styleName="btn">"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<button onClick={() => { go(); }} className="pp_0">"#
        );
    }

    #[test]
    fn test_attributes_inside_expressions_are_not_rewritten() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<List render={() => <b styleName="inner" />} styleName="row">"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<List render={() => <b styleName="inner" />} className="pp_0">"#
        );
        assert_eq!(registry.get("inner"), None);
    }

    #[test]
    fn test_template_literal_with_brace_in_handler() {
        let mut registry = ScopedNameRegistry::new();
        let jsx = r#"<a title={`}${n}`} styleName="link">"#;
        assert_eq!(
            rewrite_jsx(jsx, &mut registry).unwrap(),
            r#"<a title={`}${n}`} className="pp_0">"#
        );
    }
}
