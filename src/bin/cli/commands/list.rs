use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{kind_label, paint, truncate, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, favorites: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let only_favorites = favorites || app.deck.filter.only_favorites;
    let items = app.visible(favorites);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = items
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "id": item.id(),
                        "kind": item.kind().tag(),
                        "question": item.question(),
                        "answer": item.answer(),
                        "options": item.options(),
                        "isFavorite": item.is_favorite(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                if only_favorites {
                    println!("No starred items.");
                } else {
                    println!("No items yet.");
                }
                return Ok(());
            }

            let id_width = 8;
            let kind_width = 9;
            let question_width = items
                .iter()
                .map(|i| i.question().chars().count())
                .max()
                .unwrap_or(8)
                .clamp(8, 50);

            println!(
                "  {:<iw$} {:<kw$} {}",
                "ID",
                "Kind",
                "Question",
                iw = id_width,
                kw = kind_width
            );
            println!(
                "  {} {} {}",
                "\u{2500}".repeat(id_width),
                "\u{2500}".repeat(kind_width),
                "\u{2500}".repeat(question_width)
            );

            for item in &items {
                let star = if item.is_favorite() {
                    paint("\u{2605}", Color::YELLOW, use_color)
                } else {
                    " ".to_string()
                };
                println!(
                    "{} {:<iw$} {:<kw$} {}",
                    star,
                    truncate(item.id().as_str(), id_width),
                    kind_label(item.kind()),
                    truncate(item.question(), question_width),
                    iw = id_width,
                    kw = kind_width
                );
            }

            println!("\n{} items total", items.len());
        }
    }

    Ok(())
}
