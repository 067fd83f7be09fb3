#![cfg(test)]

use core::error::Error;
use css::{Stylesheet, parse_stylesheet};
use css_cascade::{
    CascadeResolver, CascadeVisitor, InheritPolicy, Layer, ResolvedStyle, ResolverOptions,
    VisitOutcome, resolve_all, resolve_all_with,
};
use html::{Document, ElementTree, ParseOptions, parse_document};
use indextree::NodeId;
use syntax::{TokenPool, Value};

fn load(markup: &str, css: &str) -> Result<(Document, Stylesheet), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let document = parse_document(markup, &mut pool, &ParseOptions::default())?;
    let sheet = parse_stylesheet(css, &mut pool)?;
    Ok((document, sheet))
}

fn text(value: &str) -> Value {
    Value::Text(value.to_owned())
}

/// Style of the first element with `tag`, in document order.
fn style_of<'all>(
    resolved: &'all [(usize, String, ResolvedStyle)],
    tag: &str,
) -> Option<&'all ResolvedStyle> {
    resolved
        .iter()
        .find(|entry| entry.1 == tag)
        .map(|entry| &entry.2)
}

#[test]
fn inline_beats_rule_beats_inherited() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let css = "section { color: red } p { color: blue }";

    let (document, sheet) = load(r#"<section><p style="color: green">x</p></section>"#, css)?;
    let resolved = resolve_all(&document.tree, &sheet);
    let para = style_of(&resolved, "p").ok_or("missing p")?;
    assert_eq!(para.get("color"), Some(&text("green")));
    assert_eq!(para.layer_of("color"), Some(Layer::Inline));

    let (document, sheet) = load("<section><p>x</p></section>", css)?;
    let resolved = resolve_all(&document.tree, &sheet);
    let para = style_of(&resolved, "p").ok_or("missing p")?;
    assert_eq!(para.get("color"), Some(&text("blue")));
    assert_eq!(para.layer_of("color"), Some(Layer::Rule));

    let (document, sheet) = load("<section><em>x</em></section>", css)?;
    let resolved = resolve_all(&document.tree, &sheet);
    let emphasis = style_of(&resolved, "em").ok_or("missing em")?;
    assert_eq!(emphasis.get("color"), Some(&text("red")));
    assert_eq!(emphasis.layer_of("color"), Some(Layer::Inherited));
    Ok(())
}

#[test]
fn inline_declaration_wins_and_parent_stays_clean() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        r#"<div class="a"><span id="x" style="color:red">hi</span></div>"#,
        ".a span { color: blue }",
    )?;
    let resolved = resolve_all(&document.tree, &sheet);
    let span = style_of(&resolved, "span").ok_or("missing span")?;
    assert_eq!(span.get("color"), Some(&text("red")));
    let div = style_of(&resolved, "div").ok_or("missing div")?;
    assert!(div.get("color").is_none());
    Ok(())
}

#[test]
fn later_rules_override_earlier_ones() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        r#"<p id="x" class="c">t</p>"#,
        "#x { color: red; width: 1px } p { color: blue } .c { width: 2px }",
    )?;
    let resolved = resolve_all(&document.tree, &sheet);
    let para = style_of(&resolved, "p").ok_or("missing p")?;
    assert_eq!(para.get("color"), Some(&text("blue")));
    assert_eq!(para.get("width").map(ToString::to_string), Some("2px".to_owned()));
    let names: Vec<&str> = para.iter().map(|entry| entry.0).collect();
    assert_eq!(names, ["color", "width"]);
    Ok(())
}

#[test]
fn descendant_rules_reach_any_depth_and_not_siblings() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        "<main class=k><div><div><div><b>deep</b></div></div></div></main><aside><b>out</b></aside>",
        ".k b { weight: 700 } aside { margin: 4 }",
    )?;
    let resolved = resolve_all(&document.tree, &sheet);
    let bold: Vec<&ResolvedStyle> = resolved
        .iter()
        .filter(|entry| entry.1 == "b")
        .map(|entry| &entry.2)
        .collect();
    assert_eq!(bold.len(), 2);
    assert_eq!(bold[0].get("weight"), Some(&Value::Number(700.0)));
    assert!(bold[0].get("margin").is_none());
    assert!(bold[1].get("weight").is_none());
    assert_eq!(bold[1].get("margin"), Some(&Value::Number(4.0)));
    let main = style_of(&resolved, "main").ok_or("missing main")?;
    assert!(main.is_empty());
    Ok(())
}

#[test]
fn css_policy_limits_what_descendants_inherit() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        "<div><span>x</span></div>",
        "div { color: red; border: 1px }",
    )?;
    let options = ResolverOptions {
        policy: InheritPolicy::css_defaults(),
        ..ResolverOptions::default()
    };
    let resolved = resolve_all_with(&document.tree, &sheet, options);
    let span = style_of(&resolved, "span").ok_or("missing span")?;
    assert_eq!(span.get("color"), Some(&text("red")));
    assert!(span.get("border").is_none());

    let everything = resolve_all(&document.tree, &sheet);
    let span_all = style_of(&everything, "span").ok_or("missing span")?;
    assert!(span_all.get("border").is_some());
    Ok(())
}

#[test]
fn resolution_is_idempotent_and_balanced() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        "<ul class=l><li>a</li><li class=x>b<i>c</i></li></ul><p>z</p>",
        ".l li { color: red } .x { color: blue } li i { size: 2em } * { visible: true }",
    )?;
    let first = resolve_all(&document.tree, &sheet);
    let second = resolve_all(&document.tree, &sheet);
    assert_eq!(first, second);
    assert_eq!(first.len(), document.tree.len());

    let mut resolver = CascadeResolver::new(&sheet);
    let mut counter = Counting::default();
    let report = resolver.resolve(&document.tree, &mut counter);
    assert!(resolver.scope_stack().is_balanced());
    assert_eq!(report.visited, 5);
    assert_eq!(report.max_depth, 3);
    assert_eq!(counter.entered, counter.left);
    let again = resolver.resolve(&document.tree, &mut counter);
    assert_eq!(report, again);
    Ok(())
}

#[derive(Default)]
struct Counting {
    entered: usize,
    left: usize,
}

impl CascadeVisitor for Counting {
    type Error = String;

    fn visit(
        &mut self,
        _tree: &ElementTree,
        _node: NodeId,
        _depth: usize,
        _style: &ResolvedStyle,
    ) -> Result<VisitOutcome, String> {
        self.entered += 1;
        Ok(VisitOutcome::Descend)
    }

    fn leave(&mut self, _tree: &ElementTree, _node: NodeId) {
        self.left += 1;
    }
}

/// Fails on `tag`, skips `hidden` subtrees, records everything else.
struct Picky {
    fail_on: &'static str,
    seen: Vec<(String, Option<Value>)>,
}

impl CascadeVisitor for Picky {
    type Error = String;

    fn visit(
        &mut self,
        tree: &ElementTree,
        node: NodeId,
        _depth: usize,
        style: &ResolvedStyle,
    ) -> Result<VisitOutcome, String> {
        let tag = tree.node(node).map(|element| element.tag().to_owned()).unwrap_or_default();
        if tag == self.fail_on {
            return Err(format!("cannot build {tag}"));
        }
        self.seen.push((tag, style.get("color").cloned()));
        if style.get("hidden").is_some() {
            return Ok(VisitOutcome::SkipChildren);
        }
        Ok(VisitOutcome::Descend)
    }
}

#[test]
fn failures_are_contained_to_their_subtree() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        "<div class=box><p>one</p><bad><p>lost</p></bad><p>two</p><q hidden><p>skip</p></q></div>",
        ".box p { color: red } bad { color: black }",
    )?;
    let mut resolver = CascadeResolver::new(&sheet);
    let mut picky = Picky {
        fail_on: "bad",
        seen: Vec::new(),
    };
    let report = resolver.resolve(&document.tree, &mut picky);
    assert!(resolver.scope_stack().is_balanced());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].tag, "bad");
    assert_eq!(report.failures[0].depth, 2);
    assert_eq!(report.skipped_subtrees, 1);
    let tags: Vec<&str> = picky.seen.iter().map(|entry| entry.0.as_str()).collect();
    assert_eq!(tags, ["div", "p", "p", "q"]);
    assert_eq!(picky.seen[2].1, Some(text("red")));
    assert!(!report.is_clean());
    Ok(())
}

#[test]
fn numeric_looking_ids_match_their_selector() -> Result<(), Box<dyn Error>> {
    let (document, sheet) = load(
        r#"<p id="007" class="1.0 x">a</p><p id="7">b</p>"#,
        "#007 { color: red } .x { width: 4px }",
    )?;
    let resolved = resolve_all(&document.tree, &sheet);
    assert_eq!(resolved[0].2.get("color"), Some(&text("red")));
    assert!(resolved[0].2.get("width").is_some());
    assert!(resolved[1].2.get("color").is_none());
    Ok(())
}
