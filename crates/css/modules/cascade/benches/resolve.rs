use core::hint::black_box;
use criterion::{Criterion, criterion_group, criterion_main};
use css::parse_stylesheet;
use css_cascade::resolve_all;
use html::{ParseOptions, parse_document};
use syntax::TokenPool;

/// A list of `rows` nested cards, each with a few styled descendants.
fn synthetic_markup(rows: usize) -> String {
    let mut markup = String::from("<main class=\"page\">");
    for row in 0..rows {
        markup.push_str(&format!(
            "<div class=\"card c{row}\"><h2>title</h2><p class=\"body\">text <b>bold</b></p><img src=\"i{row}.png\"/></div>"
        ));
    }
    markup.push_str("</main>");
    markup
}

const SHEET: &str = "
    .page { color: black; font-size: 14px }
    .card { width: 100%; display: flex }
    .card h2 { font-size: 2em }
    .page .body b { weight: 700 }
    p.body { line-height: 1.5 }
    #missing { color: red }
";

fn bench_resolve(criterion: &mut Criterion) {
    let mut pool = TokenPool::default();
    let Ok(document) = parse_document(&synthetic_markup(200), &mut pool, &ParseOptions::default())
    else {
        return;
    };
    let Ok(sheet) = parse_stylesheet(SHEET, &mut pool) else {
        return;
    };
    criterion.bench_function("cascade_resolve_200_cards", |bencher| {
        bencher.iter(|| black_box(resolve_all(&document.tree, &sheet).len()));
    });
}

criterion_group!(cascade_benches, bench_resolve);
criterion_main!(cascade_benches);
