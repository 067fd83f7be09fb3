#![cfg(test)]

use core::error::Error;
use css_style_attr::{DeclarationError, parse_declaration_list, parse_style_attribute};
use syntax::{DeclarationMap, Lexer, TokenKind, TokenPool, Unit, Value};

#[test]
fn parses_typed_values_in_order() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pool = TokenPool::default();
    let map = parse_style_attribute(
        "COLOR: red; width: 10px; weight: 2; visible: false; font-size: 1.5em;",
        &mut pool,
    )?;
    let names: Vec<&str> = map.names().collect();
    assert_eq!(names, ["color", "width", "weight", "visible", "font-size"]);
    assert_eq!(map.get("color"), Some(&Value::Text("red".to_owned())));
    assert_eq!(map.get("width"), Some(&Value::Dimension(10.0, Unit::Px)));
    assert_eq!(map.get("weight"), Some(&Value::Number(2.0)));
    assert_eq!(map.get("visible"), Some(&Value::Bool(false)));
    assert_eq!(map.get("font-size"), Some(&Value::Dimension(1.5, Unit::Em)));
    Ok(())
}

#[test]
fn repeated_property_keeps_position_and_last_value() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let map = parse_style_attribute("color: red; margin: 0; color: blue", &mut pool)?;
    let entries: Vec<(&str, String)> = map
        .iter()
        .map(|(name, value)| (name, value.to_string()))
        .collect();
    assert_eq!(
        entries,
        [("color", "blue".to_owned()), ("margin", "0".to_owned())]
    );
    Ok(())
}

#[test]
fn empty_and_separator_only_inputs() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    assert!(parse_style_attribute("", &mut pool)?.is_empty());
    assert!(parse_style_attribute(" ;; ", &mut pool)?.is_empty());
    Ok(())
}

#[test]
fn malformed_input_reports_position() {
    let mut pool = TokenPool::default();
    let error = parse_style_attribute("color: red;\nwidth 10px", &mut pool);
    assert!(matches!(
        error.as_ref().map_err(DeclarationError::position),
        Err((2, 7))
    ));
}

#[test]
fn block_reading_stops_at_block_close() -> Result<(), Box<dyn Error>> {
    let mut pool = TokenPool::default();
    let mut lexer = Lexer::stylesheet("p { color: red; height: 50% } div {}", &mut pool);
    let prelude = lexer.next_token()?;
    assert_eq!(prelude.text(), Some("p"));
    let open = lexer.next_token()?;
    assert_eq!(open.kind(), TokenKind::BlockOpen);

    let mut declarations = DeclarationMap::new();
    parse_declaration_list(&mut lexer, &mut declarations)?;
    assert_eq!(lexer.peek_kind()?, TokenKind::BlockClose);
    assert_eq!(declarations.len(), 2);
    assert_eq!(
        declarations.get("height"),
        Some(&Value::Dimension(50.0, Unit::Percent))
    );
    Ok(())
}
