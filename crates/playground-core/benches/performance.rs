use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use playground_core::{
    Column, DiagnosticsSink, EvalOutput, EvalRequest, Evaluator, Line, Playground,
    PlaygroundConfig, Span, TextEdit, Token, TokenKind, TokenMap, WhitespaceRule, segment,
};
use ropey::Rope;
use std::convert::Infallible;

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        if i % 4 == 0 {
            out.push_str(&format!("binding{i} = {i} + 1\n"));
        } else {
            out.push_str(&format!("  where helper{i} = \"playground benchmark\"\n"));
        }
    }
    out
}

/// One `Other` token per whitespace separated word.
fn words(line: Line, column: Column, text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let (mut l, mut c) = (line, column);
    let mut start = None;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token::new(TokenKind::Other, Span::single_line(l, s, c)));
            }
            if ch == '\n' {
                l += 1;
                c = 1;
                continue;
            }
        } else if start.is_none() {
            start = Some(c);
        }
        c += 1;
    }
    if let Some(s) = start {
        tokens.push(Token::new(TokenKind::Other, Span::single_line(l, s, c)));
    }
    tokens
}

struct Constant;

impl Evaluator for Constant {
    type Error = Infallible;

    fn evaluate(
        &mut self,
        _request: EvalRequest<'_>,
        _diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<EvalOutput, Infallible> {
        Ok(EvalOutput::new("()", "()"))
    }
}

fn bench_token_map_build(c: &mut Criterion) {
    let rope = Rope::from_str(&large_text(50_000));
    c.bench_function("token_map_build/50k_lines", |b| {
        b.iter(|| {
            let map = TokenMap::build(black_box(&rope), &mut words);
            black_box(map.last_line());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || Playground::new(&text, PlaygroundConfig::new(), words, Constant),
            |mut playground| {
                let line = playground.token_map().last_line() / 2;
                let mut offset = playground
                    .token_map()
                    .line_index()
                    .start_of_line(line)
                    .unwrap_or(0);
                for _ in 0..100 {
                    playground
                        .apply_edit(&TextEdit::insert(offset, "x"))
                        .unwrap();
                    offset += 1;
                }
                black_box(playground.buffer().len_chars());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_highlight_viewport(c: &mut Criterion) {
    let rope = Rope::from_str(&large_text(50_000));
    let map = TokenMap::build(&rope, &mut words);
    c.bench_function("highlight_viewport/60_lines", |b| {
        b.iter(|| black_box(map.highlight_spans(black_box(25_000..25_060)).len()))
    });
}

fn bench_segment(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("segment/50k_lines", |b| {
        b.iter(|| black_box(segment(black_box(&text), WhitespaceRule::Ascii).count()))
    });
}

fn bench_run(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("run/10k_lines", |b| {
        b.iter_batched(
            || Playground::new(&text, PlaygroundConfig::new(), words, Constant),
            |mut playground| black_box(playground.run()),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_token_map_build,
    bench_typing_in_middle,
    bench_highlight_viewport,
    bench_segment,
    bench_run
);
criterion_main!(benches);
