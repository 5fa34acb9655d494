use std::io::{BufRead, Write};

use anyhow::Result;

use studydeck_lib::quiz::ItemProgress;
use studydeck_lib::StudyDeck;

use crate::app::App;
use crate::render::terminal::{paint, render_card, Color};

const HELP: &str =
    "n: next  p: previous  f: flip  a-d: choose  q: quit  (=text answers literally, e.g. =n)";

/// One parsed line of learner input
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Next,
    Prev,
    Flip,
    Choose(usize),
    Text(&'a str),
    Empty,
}

/// Bare `n`, `p`, `q` and `f` are commands. A leading `=` marks the rest of
/// the line as an answer, so `=n` picks option N or submits "n" as an essay.
fn parse_line<'a>(line: &'a str, progress: &ItemProgress) -> Input<'a> {
    let line = line.trim();
    if let Some(answer) = line.strip_prefix('=') {
        return parse_answer(answer.trim(), progress);
    }
    match line {
        "" => Input::Empty,
        "q" => Input::Quit,
        "n" => Input::Next,
        "p" => Input::Prev,
        "f" if matches!(progress, ItemProgress::Flashcard { .. }) => Input::Flip,
        _ => parse_answer(line, progress),
    }
}

fn parse_answer<'a>(answer: &'a str, progress: &ItemProgress) -> Input<'a> {
    match progress {
        _ if answer.is_empty() => Input::Empty,
        ItemProgress::Choice { .. } if answer.len() == 1 => {
            let letter = answer.as_bytes()[0].to_ascii_lowercase();
            if letter.is_ascii_lowercase() {
                Input::Choose((letter - b'a') as usize)
            } else {
                Input::Text(answer)
            }
        }
        _ => Input::Text(answer),
    }
}

pub fn run<R: BufRead, W: Write>(
    app: &mut App,
    favorites: bool,
    input: &mut R,
    output: &mut W,
    use_color: bool,
) -> Result<()> {
    if favorites {
        app.deck.filter.only_favorites = true;
    }
    drive(&mut app.deck, input, output, use_color)
}

/// Run a session over the deck's current filter until `q` or end of input
fn drive<R: BufRead, W: Write>(
    deck: &mut StudyDeck,
    input: &mut R,
    output: &mut W,
    use_color: bool,
) -> Result<()> {
    if !deck.start_session() {
        writeln!(output, "Nothing to study.")?;
        return Ok(());
    }
    writeln!(output, "{}", paint(HELP, Color::GRAY, use_color))?;

    let mut line = String::new();
    loop {
        let (Some(item), Some(progress), Some(position)) = (
            deck.session.current(),
            deck.session.progress(),
            deck.session.position(),
        ) else {
            break;
        };
        let outcome = deck.session.outcome();
        writeln!(output)?;
        writeln!(
            output,
            "{}",
            render_card(item, progress, outcome.as_ref(), position, use_color)
        )?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let accepted = match parse_line(&line, progress) {
            Input::Quit => break,
            Input::Empty => true,
            Input::Next => deck.session.next(),
            Input::Prev => deck.session.prev(),
            Input::Flip => deck.session.flip(),
            Input::Choose(index) => deck.session.choose_index(index),
            Input::Text(text) => deck.session.submit_essay(text),
        };
        if !accepted {
            writeln!(output, "{}", paint(HELP, Color::GRAY, use_color))?;
        }
    }

    deck.session.exit();
    writeln!(output, "Done.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydeck_lib::quiz::{ItemKind, ItemStore, MemoryBlobStore, NewItem, DEFAULT_STORAGE_KEY};

    fn deck() -> StudyDeck {
        let store = ItemStore::load(Box::new(MemoryBlobStore::new()), DEFAULT_STORAGE_KEY);
        StudyDeck::new(store, false)
    }

    fn play(deck: &mut StudyDeck, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        drive(deck, &mut input, &mut output, false).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_line() {
        let card = ItemProgress::Flashcard { flipped: false };
        let choice = ItemProgress::Choice { selected: None };
        let essay = ItemProgress::Essay { response: None };

        assert_eq!(parse_line("q\n", &card), Input::Quit);
        assert_eq!(parse_line("f", &card), Input::Flip);
        assert_eq!(parse_line("B", &choice), Input::Choose(1));
        assert_eq!(parse_line("f", &essay), Input::Text("f"));
        assert_eq!(parse_line("  ownership moves \n", &essay), Input::Text("ownership moves"));
        assert_eq!(parse_line("   ", &essay), Input::Empty);
    }

    #[test]
    fn test_escaped_answers_are_not_commands() {
        let choice = ItemProgress::Choice { selected: None };
        let essay = ItemProgress::Essay { response: None };

        assert_eq!(parse_line("n", &essay), Input::Next);
        assert_eq!(parse_line("=n", &essay), Input::Text("n"));
        assert_eq!(parse_line("= q ", &essay), Input::Text("q"));
        assert_eq!(parse_line("=n", &choice), Input::Choose(13));
        assert_eq!(parse_line("=P", &choice), Input::Choose(15));
        assert_eq!(parse_line("=", &essay), Input::Empty);
    }

    #[test]
    fn test_essay_answer_matching_a_command() {
        let mut deck = deck();
        deck.store
            .add(NewItem::new(ItemKind::Essay, "Next letter after m?", "n"))
            .unwrap();

        let out = play(&mut deck, "=n\nq\n");
        assert!(out.contains("Your answer: n"));
        assert!(out.contains("Question 1 of 4"));
        assert!(!out.contains("Question 2 of 4"));
    }

    #[test]
    fn test_walk_through_seed() {
        let mut deck = deck();
        let out = play(&mut deck, "f\nn\nd\nn\nb\nq\n");

        assert!(out.contains("Sự đổi mới, sáng tạo"));
        assert!(out.contains("The correct answer is: Hà Nội"));
        assert!(out.contains("Question 3 of 3"));
        assert!(out.contains("Correct!"));
        assert!(out.ends_with("Done.\n"));
        assert!(!deck.session.is_active());
    }

    #[test]
    fn test_essay_reveals_reference() {
        let mut deck = deck();
        deck.store
            .add(NewItem::new(ItemKind::Essay, "Explain borrowing", "References without ownership"))
            .unwrap();

        let out = play(&mut deck, "Shared access\n");
        assert!(out.contains("Your answer: Shared access"));
        assert!(out.contains("References without ownership"));
    }

    #[test]
    fn test_empty_favorites() {
        let mut deck = deck();
        deck.store.toggle_favorite(&"1".into());
        deck.filter.only_favorites = true;

        let out = play(&mut deck, "n\n");
        assert_eq!(out, "Nothing to study.\n");
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut deck = deck();
        let out = play(&mut deck, "n\np\n");
        assert_eq!(out.matches("Question 1 of 3").count(), 2);
        assert!(out.ends_with("Done.\n"));
    }
}
