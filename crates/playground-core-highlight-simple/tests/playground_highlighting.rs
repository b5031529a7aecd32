use playground_core::{
    DiagnosticsSink, EvalOutput, EvalRequest, Evaluator, Playground, PlaygroundConfig,
    PlaygroundEvent, TextEdit, TokenKind, TokenMap,
};
use playground_core_highlight_simple::SimpleTokenizer;
use pretty_assertions::assert_eq;
use ropey::Rope;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

struct Unit;

impl Evaluator for Unit {
    type Error = Infallible;

    fn evaluate(
        &mut self,
        _request: EvalRequest<'_>,
        _diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<EvalOutput, Infallible> {
        Ok(EvalOutput::new("", "IO ()"))
    }
}

const SOURCE: &str = "\
module Main where
{- The answer,
   computed slowly. -}
answer :: Int
answer = 42 -- trailing
main = print answer
";

fn playground(text: &str) -> Playground<SimpleTokenizer, Unit> {
    Playground::new(
        text,
        PlaygroundConfig::new(),
        SimpleTokenizer::haskell().unwrap(),
        Unit,
    )
}

fn rebuilt(text: &str) -> TokenMap {
    TokenMap::build(&Rope::from_str(text), &mut SimpleTokenizer::haskell().unwrap())
}

#[test]
fn test_block_comment_is_filed_on_every_line() {
    let playground = playground(SOURCE);
    let map = playground.token_map();

    let line2 = map.tokens_on_line(2);
    let line3 = map.tokens_on_line(3);
    assert_eq!(line2.len(), 1);
    assert_eq!(line2.last().map(|t| t.kind), Some(TokenKind::BlockComment));
    assert_eq!(line3.first(), line2.last());
    assert_eq!(line3[0].span.lines, 2);
    assert_eq!(map.rescan_offsets(3..4), (1, 1));
}

#[test]
fn test_highlight_spans_cover_comment_lines() {
    let playground = playground(SOURCE);
    let spans = playground.highlight_spans(2..=3);
    let comment_start = SOURCE.find("{-").unwrap();
    let comment_end = SOURCE.find("-}").unwrap() + 2;
    let line3_start = SOURCE.find("   computed").unwrap();

    assert_eq!(
        spans,
        vec![
            (TokenKind::BlockComment, comment_start..line3_start),
            (TokenKind::BlockComment, line3_start..comment_end),
        ]
    );
}

#[test]
fn test_edit_inside_comment_rescans_whole_comment() {
    let mut playground = playground(SOURCE);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    playground.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let offset = SOURCE.find("slowly").unwrap();
    let lines = playground
        .apply_edit(&TextEdit::replace(offset, "slowly", "quickly"))
        .unwrap();

    // The comment spans two lines, so the window grows by one line on each side.
    assert_eq!(lines, 2..=4);
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[PlaygroundEvent::LinesChanged(2..=4)]
    );
    let text = playground.text();
    assert!(text.contains("computed quickly. -}"));
    assert_eq!(playground.token_map(), &rebuilt(&text));
}

#[test]
fn test_edit_after_comment_shifts_following_lines() {
    let mut playground = playground(SOURCE);
    let offset = SOURCE.find("42").unwrap();
    playground
        .apply_edit(&TextEdit::replace(offset, "42", "6 * 7"))
        .unwrap();

    let text = playground.text();
    assert_eq!(playground.token_map(), &rebuilt(&text));
    let line6: Vec<_> = playground
        .highlight_spans(6..=6)
        .into_iter()
        .map(|(kind, range)| {
            let word: String = text.chars().skip(range.start).take(range.len()).collect();
            (kind, word)
        })
        .collect();
    assert_eq!(
        line6,
        vec![
            (TokenKind::Other, "main".to_string()),
            (TokenKind::Keyword, "=".to_string()),
            (TokenKind::Other, "print".to_string()),
            (TokenKind::Other, "answer".to_string()),
        ]
    );
}

#[test]
fn test_line_count_change_rebuilds() {
    let mut playground = playground(SOURCE);
    let offset = SOURCE.find("-}").unwrap();
    let lines = playground
        .apply_edit(&TextEdit::replace(offset, "-}", "\n-}"))
        .unwrap();

    assert_eq!(lines, 1..=playground.token_map().last_line());
    let map = playground.token_map();
    assert_eq!(map.tokens_on_line(4)[0].kind, TokenKind::BlockComment);
    assert_eq!(map, &rebuilt(&playground.text()));
}

#[test]
fn test_opening_comment_across_lines_rebuilds_on_line_change() {
    let mut playground = playground("a = 1\nb = 2\nc = 3\n");
    playground.apply_edit(&TextEdit::insert(6, "{-\n")).unwrap();
    let map = playground.token_map();
    assert_eq!(map.tokens_on_line(2)[0].kind, TokenKind::BlockComment);
    assert_eq!(map.tokens_on_line(5)[0].kind, TokenKind::BlockComment);
}

#[test]
fn test_opening_comment_widens_rescan_to_its_end() {
    let mut playground = playground("a = 1\nb = 2\nc = 3 -}\n");
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    playground.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let lines = playground.apply_edit(&TextEdit::insert(0, "{- ")).unwrap();

    assert_eq!(lines, 1..=4);
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[PlaygroundEvent::LinesChanged(1..=4)]
    );
    let map = playground.token_map();
    assert_eq!(map, &rebuilt(&playground.text()));
    assert_eq!(map.tokens_on_line(3).len(), 1);
    assert_eq!(map.tokens_on_line(3)[0].kind, TokenKind::BlockComment);
    assert_eq!(map.tokens_on_line(3)[0].span.lines, 3);
}

#[test]
fn test_removing_comment_end_widens_to_next_end() {
    let text = "{- a -}\nb\nc\nd -}\n";
    let mut playground = playground(text);
    assert_eq!(playground.token_map().tokens_on_line(4).len(), 3);

    let lines = playground.apply_edit(&TextEdit::delete(5, "-}")).unwrap();

    // Line 5 is the empty line after the final terminator and stays untouched.
    assert_eq!(lines, 1..=4);
    let map = playground.token_map();
    assert_eq!(map, &rebuilt(&playground.text()));
    assert_eq!(map.tokens_on_line(4).len(), 1);
    assert_eq!(map.tokens_on_line(4)[0].span.lines, 4);
}

#[test]
fn test_removing_inner_comment_end_joins_following_lines() {
    let text = "{- a\nb\nc -}\nd = 1 -}\n";
    let mut playground = playground(text);

    let lines = playground.apply_edit(&TextEdit::delete(9, "-}")).unwrap();

    assert_eq!(lines, 1..=5);
    let map = playground.token_map();
    assert_eq!(map, &rebuilt(&playground.text()));
    assert_eq!(map.tokens_on_line(4)[0].kind, TokenKind::BlockComment);
    assert_eq!(map.tokens_on_line(4)[0].span.lines, 4);
}

#[test]
fn test_window_never_starts_inside_earlier_comment() {
    // The edited line's comment starts on line 2, right after another comment ends there.
    let text = "{- a\n-} {- b\nc -} d\n";
    let mut playground = playground(text);
    let offset = text.rfind('d').unwrap();

    let lines = playground
        .apply_edit(&TextEdit::replace(offset, "d", "e"))
        .unwrap();

    assert_eq!(lines, 1..=3);
    assert_eq!(playground.token_map(), &rebuilt(&playground.text()));
}

#[test]
fn test_run_with_highlighting_tokenizer() {
    let mut playground = playground("main = print 1\n  where x = 2\nanswer = 42\n");
    let summary = playground.run();
    assert_eq!(summary.commands, 2);
    assert_eq!(playground.results().get(1).unwrap().type_name, "IO ()");
    assert_eq!(playground.presentation(0).map(|p| p.show_value), Some(false));
}
