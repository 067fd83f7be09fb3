#![cfg(test)]

use core::error::Error;
use syntax::{Lexer, Literal, TokenKind, TokenPool, Unit};

#[test]
fn pool_never_holds_more_than_its_capacity() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pool = TokenPool::with_capacity(3);
    let tokens: Vec<_> = (0..5)
        .map(|index| pool.acquire(TokenKind::Text, Some(Literal::Number(f64::from(index))), 1, 1))
        .collect();
    assert_eq!(pool.stats().allocated, 5);
    for token in tokens {
        pool.release(token);
    }
    assert_eq!(pool.idle(), 3);
    assert_eq!(pool.stats().recycled, 3);
    assert_eq!(pool.stats().discarded, 2);
}

#[test]
fn reused_token_carries_no_stale_payload() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pool = TokenPool::default();
    let first = pool.acquire_with_extra(
        TokenKind::StyleValue,
        Some(Literal::Number(12.0)),
        4,
        9,
        Some(Unit::Px),
    );
    pool.release(first);

    let second = pool.acquire(TokenKind::Semicolon, None, 1, 2);
    assert_eq!(pool.stats().reused, 1);
    assert_eq!(second.kind(), TokenKind::Semicolon);
    assert!(second.value().is_none());
    assert!(second.extra().is_none());
    assert_eq!((second.line(), second.column()), (1, 2));
}

#[test]
fn default_capacity_is_twenty() {
    assert_eq!(TokenPool::default().capacity(), 20);
}

#[test]
fn lexing_with_recycling_stays_within_the_bound() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pool = TokenPool::with_capacity(4);
    let markup = "<div id=\"a\"><p>one</p><p>two</p><p>three</p></div>".repeat(10);
    let mut lexer = Lexer::markup(&markup, &mut pool);
    loop {
        let token = lexer.next_token()?;
        let kind = token.kind();
        lexer.recycle(token);
        if kind == TokenKind::Eof {
            break;
        }
    }
    assert!(pool.idle() <= 4);
    // A recycling consumer only ever needs one live token.
    assert_eq!(pool.stats().allocated, 1);
    Ok(())
}

#[test]
fn tokens_compare_structurally_without_the_unit_tag() {
    let mut pool = TokenPool::default();
    let with_unit = pool.acquire_with_extra(
        TokenKind::StyleValue,
        Some(Literal::Number(1.0)),
        1,
        1,
        Some(Unit::Em),
    );
    let without_unit = pool.acquire(TokenKind::StyleValue, Some(Literal::Number(1.0)), 1, 1);
    let elsewhere = pool.acquire(TokenKind::StyleValue, Some(Literal::Number(1.0)), 2, 1);
    assert_eq!(with_unit, without_unit);
    assert_ne!(with_unit, elsewhere);
}
