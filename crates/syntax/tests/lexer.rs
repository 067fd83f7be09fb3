#![cfg(test)]

use core::error::Error;
use syntax::{LexError, Lexer, Literal, TokenKind, TokenPool, Unit, Value, classify};

/// Drain a lexer into `(kind, text-or-number)` pairs.
fn drain(mut lexer: Lexer<'_, '_>) -> Result<Vec<(TokenKind, String)>, LexError> {
    let mut out = Vec::new();
    loop {
        let mut token = lexer.next_token()?;
        let kind = token.kind();
        let payload = token
            .take_value()
            .map(|literal| literal.to_string())
            .unwrap_or_default();
        lexer.recycle(token);
        out.push((kind, payload));
        if kind == TokenKind::Eof {
            return Ok(out);
        }
    }
}

fn kinds(tokens: &[(TokenKind, String)]) -> Vec<TokenKind> {
    tokens.iter().map(|pair| pair.0).collect()
}

#[test]
fn markup_tokens_for_nested_tags() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::markup(
        "<div class=\"a\">\n  <span id=x>hi</span><br/>\n</div>",
        &mut pool,
    ))?;
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::TagOpen,
            TokenKind::AttrName,
            TokenKind::AttrValue,
            TokenKind::TagEnd,
            TokenKind::TagOpen,
            TokenKind::AttrName,
            TokenKind::AttrValue,
            TokenKind::TagEnd,
            TokenKind::Text,
            TokenKind::TagClose,
            TokenKind::TagOpen,
            TokenKind::SelfClose,
            TokenKind::TagClose,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].1, "div");
    assert_eq!(tokens[2].1, "a");
    assert_eq!(tokens[8].1, "hi");
    assert_eq!(tokens[9].1, "span");
    Ok(())
}

#[test]
fn comments_and_doctype_are_skipped() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::markup(
        "<!DOCTYPE html><!-- note --><p>x</p>",
        &mut pool,
    ))?;
    assert_eq!(tokens[0], (TokenKind::TagOpen, "p".to_owned()));
    assert_eq!(tokens.len(), 5);
    Ok(())
}

#[test]
fn tag_names_are_lowercased_and_entities_decoded() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::markup("<P>a &lt; b &amp;&amp; c</P>", &mut pool))?;
    assert_eq!(tokens[0].1, "p");
    assert_eq!(tokens[2], (TokenKind::Text, "a < b && c".to_owned()));
    assert_eq!(tokens[3], (TokenKind::TagClose, "p".to_owned()));
    Ok(())
}

#[test]
fn style_element_content_is_one_raw_text_token() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::markup(
        "<style>div > p { color: red }</style>",
        &mut pool,
    ))?;
    assert_eq!(
        tokens[2],
        (TokenKind::Text, "div > p { color: red }".to_owned())
    );
    assert_eq!(tokens[3], (TokenKind::TagClose, "style".to_owned()));
    Ok(())
}

#[test]
fn positions_are_one_based_lines_and_columns() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let mut lexer = Lexer::markup("<a>\n  <b>", &mut pool);
    let first = lexer.next_token()?;
    assert_eq!((first.line(), first.column()), (1, 1));
    lexer.recycle(first);
    let end = lexer.next_token()?;
    lexer.recycle(end);
    let second = lexer.next_token()?;
    assert_eq!((second.line(), second.column()), (2, 3));
    Ok(())
}

#[test]
fn peek_does_not_consume() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let mut lexer = Lexer::markup("<a>", &mut pool);
    assert_eq!(lexer.peek_kind()?, TokenKind::TagOpen);
    assert_eq!(lexer.peek_kind()?, TokenKind::TagOpen);
    let token = lexer.next_token()?;
    assert_eq!(token.text(), Some("a"));
    assert_eq!(lexer.peek_kind()?, TokenKind::TagEnd);
    Ok(())
}

#[test]
fn markup_errors_carry_positions() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let unterminated = drain(Lexer::markup("<a href=\"x>", &mut pool))
        .err()
        .ok_or("unterminated attribute value accepted")?;
    assert_eq!((unterminated.line, unterminated.column), (1, 9));

    let stray = drain(Lexer::markup("<a %>", &mut pool))
        .err()
        .ok_or("stray character in a tag accepted")?;
    assert!(stray.message.contains('%'));

    assert!(drain(Lexer::markup("<!-- open", &mut pool)).is_err());
    Ok(())
}

#[test]
fn inline_style_tokens_carry_units() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let mut lexer = Lexer::style("Width: 12dp; color:red;visible:true", &mut pool);
    let name = lexer.next_token()?;
    assert_eq!(name.kind(), TokenKind::Ident);
    assert_eq!(name.text(), Some("width"));
    assert_eq!(lexer.next_token()?.kind(), TokenKind::Colon);
    let width = lexer.next_token()?;
    assert_eq!(width.kind(), TokenKind::StyleValue);
    assert!((width.number() - 12.0).abs() < f64::EPSILON);
    assert_eq!(width.extra(), Some(Unit::Px));
    drop((name, width));

    let rest = drain(lexer)?;
    assert_eq!(
        kinds(&rest),
        vec![
            TokenKind::Semicolon,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::StyleValue,
            TokenKind::Semicolon,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::StyleValue,
            TokenKind::Eof,
        ]
    );
    assert_eq!(rest[3].1, "red");
    assert_eq!(rest[7].1, "true");
    Ok(())
}

#[test]
fn style_values_keep_quoted_and_parenthesised_separators() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::style(
        "background: url(a;b.png); content: 'x;y' !important",
        &mut pool,
    ))?;
    assert_eq!(tokens[2].1, "url(a;b.png)");
    assert_eq!(tokens[6].1, "x;y");
    Ok(())
}

#[test]
fn property_names_stop_at_the_colon() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::style("color:red;font-size:2em", &mut pool))?;
    assert_eq!(tokens[0], (TokenKind::Ident, "color".to_owned()));
    assert_eq!(tokens[1].0, TokenKind::Colon);
    assert_eq!(tokens[2], (TokenKind::StyleValue, "red".to_owned()));
    assert_eq!(tokens[4], (TokenKind::Ident, "font-size".to_owned()));
    assert_eq!(tokens[5].0, TokenKind::Colon);

    let block = drain(Lexer::stylesheet(".a span{color:blue}", &mut pool))?;
    assert_eq!(block[2], (TokenKind::Ident, "color".to_owned()));
    assert_eq!(block[3].0, TokenKind::Colon);
    assert_eq!(block[4], (TokenKind::StyleValue, "blue".to_owned()));
    Ok(())
}

#[test]
fn comments_inside_values_are_dropped() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let mut lexer = Lexer::stylesheet("p { color : red /* note */; width : 12px /* w */ }", &mut pool);
    let mut values = Vec::new();
    loop {
        let mut token = lexer.next_token()?;
        let kind = token.kind();
        if kind == TokenKind::StyleValue {
            values.push((token.take_value(), token.extra()));
        }
        lexer.recycle(token);
        if kind == TokenKind::Eof {
            break;
        }
    }
    assert_eq!(
        values,
        vec![
            (Some(Literal::Text("red".to_owned())), None),
            (Some(Literal::Number(12.0)), Some(Unit::Px)),
        ]
    );

    let inline = drain(Lexer::style("content: 'a /* kept */ b'", &mut pool))?;
    assert_eq!(inline[2].1, "a /* kept */ b");
    assert!(drain(Lexer::style("color: red /* open", &mut pool)).is_err());
    Ok(())
}

#[test]
fn identity_values_stay_text() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let markup = drain(Lexer::markup(r#"<p id="007" class="1.0 x" width="007">"#, &mut pool))?;
    let values: Vec<&str> = markup
        .iter()
        .filter(|pair| pair.0 == TokenKind::AttrValue)
        .map(|pair| pair.1.as_str())
        .collect();
    assert_eq!(values, ["007", "1.0 x", "7"]);

    let inline = drain(Lexer::style("id: 007; class: true; width: 007", &mut pool))?;
    assert_eq!(inline[2].1, "007");
    assert_eq!(inline[6].1, "true");
    assert_eq!(inline[10].1, "7");
    Ok(())
}

#[test]
fn style_errors() {
    let mut pool = TokenPool::default();
    assert!(drain(Lexer::style("color red", &mut pool)).is_err());
    assert!(drain(Lexer::style("color:", &mut pool)).is_err());
    assert!(drain(Lexer::style("color: red; $x: 1", &mut pool)).is_err());
    assert!(drain(Lexer::style("/* open", &mut pool)).is_err());
}

#[test]
fn stylesheet_rules() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let tokens = drain(Lexer::stylesheet(
        "/* header */ .a span { color: blue } #x{width:50%;}",
        &mut pool,
    ))?;
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Prelude,
            TokenKind::BlockOpen,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::StyleValue,
            TokenKind::BlockClose,
            TokenKind::Prelude,
            TokenKind::BlockOpen,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::StyleValue,
            TokenKind::Semicolon,
            TokenKind::BlockClose,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].1, ".a span");
    assert_eq!(tokens[6].1, "#x");
    Ok(())
}

#[test]
fn stylesheet_errors() {
    let mut pool = TokenPool::default();
    assert!(drain(Lexer::stylesheet("div", &mut pool)).is_err());
    assert!(drain(Lexer::stylesheet("div { color: red", &mut pool)).is_err());
    assert!(drain(Lexer::stylesheet("}", &mut pool)).is_err());
    assert!(drain(Lexer::stylesheet("@media print { }", &mut pool)).is_err());
    assert!(drain(Lexer::stylesheet("{ color: red }", &mut pool)).is_err());
}

#[test]
fn classification() {
    assert_eq!(classify("42"), (Literal::Number(42.0), None));
    assert_eq!(classify("1.5em"), (Literal::Number(1.5), Some(Unit::Em)));
    assert_eq!(classify("50%"), (Literal::Number(50.0), Some(Unit::Percent)));
    assert_eq!(classify("10dip"), (Literal::Number(10.0), Some(Unit::Px)));
    assert_eq!(classify(" true "), (Literal::Bool(true), None));
    assert_eq!(classify("\"quoted\""), (Literal::Text("quoted".to_owned()), None));
    assert_eq!(classify("3vh"), (Literal::Text("3vh".to_owned()), None));
    assert_eq!(classify("1px solid"), (Literal::Text("1px solid".to_owned()), None));
    assert_eq!(Value::parse("8px").to_string(), "8px");
}
