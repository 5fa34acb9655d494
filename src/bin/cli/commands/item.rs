use anyhow::{bail, Result};

use studydeck_lib::quiz::{ItemKind, NewItem, TRUE_FALSE_OPTIONS};

use crate::app::App;
use crate::{KindArg, OutputFormat};

fn kind_from_arg(kind: KindArg, options: Vec<String>) -> Result<ItemKind> {
    let kind = match kind {
        KindArg::Flashcard => ItemKind::Flashcard,
        KindArg::Essay => ItemKind::Essay,
        KindArg::MultipleChoice => ItemKind::from_parts("multipleChoice", Some(options))?,
        KindArg::TrueFalse => {
            let options = if options.is_empty() {
                TRUE_FALSE_OPTIONS.iter().map(|o| o.to_string()).collect()
            } else {
                options
            };
            ItemKind::from_parts("trueFalse", Some(options))?
        }
    };
    Ok(kind)
}

pub fn run_add(
    app: &mut App,
    kind: KindArg,
    question: String,
    answer: String,
    options: Vec<String>,
    favorite: bool,
    format: &OutputFormat,
) -> Result<()> {
    let kind = kind_from_arg(kind, options)?;
    let id = app
        .deck
        .store
        .add(NewItem::new(kind, question, answer).favorite(favorite))?;

    let Some(item) = app.deck.store.get(&id) else {
        bail!("Item {} vanished after insert", id);
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        OutputFormat::Plain => {
            println!("Added {}: \"{}\"", item.kind().tag(), item.question());
            println!("  ID: {}", item.id());
        }
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    let id = app.resolve_id(id)?;
    let removed = app.deck.store.remove(&id);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "id": id, "removed": removed });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Removed {}", id);
        }
    }

    Ok(())
}

pub fn run_favorite(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    let id = app.resolve_id(id)?;
    let Some(is_favorite) = app.deck.store.toggle_favorite(&id) else {
        bail!("No item matches '{}'", id);
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "id": id, "isFavorite": is_favorite });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if is_favorite {
                println!("Starred {}", id);
            } else {
                println!("Unstarred {}", id);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_false_defaults_options() {
        assert_eq!(kind_from_arg(KindArg::TrueFalse, vec![]).unwrap(), ItemKind::TrueFalse);
    }

    #[test]
    fn test_multiple_choice_needs_options() {
        assert!(kind_from_arg(KindArg::MultipleChoice, vec![]).is_err());

        let kind = kind_from_arg(
            KindArg::MultipleChoice,
            vec!["Borrow".to_string(), " Move ".to_string()],
        )
        .unwrap();
        assert_eq!(kind.options(), Some(vec!["Borrow", "Move"]));
    }
}
