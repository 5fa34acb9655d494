use anyhow::{bail, Context, Result};

use studydeck_lib::quiz::reply;
use studydeck_lib::quiz::{Batch, IngestReport};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// Where a batch came from
enum Source {
    /// A bare JSON array
    Array,
    /// An assistant reply carrying a tagged block
    Reply(String),
}

fn parse_input(text: &str) -> Result<(Batch, Source)> {
    if let Ok(batch) = serde_json::from_str::<Batch>(text) {
        return Ok((batch, Source::Array));
    }
    match reply::extract_batch(text).context("Failed to read quiz data block")? {
        Some(batch) => Ok((batch, Source::Reply(text.to_string()))),
        None => bail!("Input is neither a JSON array nor a reply with a [QUIZ_DATA] block"),
    }
}

pub fn run(app: &mut App, text: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let (batch, source) = parse_input(text)?;

    let sender = app.deck.ingest_sender();
    if !sender.send(batch) {
        bail!("Ingestion channel closed");
    }
    let reports = app.deck.pump_ingestion();

    let accepted: usize = reports.iter().map(IngestReport::accepted_count).sum();
    let rejected: usize = reports.iter().map(IngestReport::rejected_count).sum();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = reports
                .iter()
                .map(|report| {
                    serde_json::json!({
                        "accepted": report.accepted,
                        "rejected": report.rejected.iter().map(|r| {
                            serde_json::json!({
                                "index": r.index,
                                "reason": r.reason.to_string(),
                            })
                        }).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if let Source::Reply(original) = &source {
                let notice = paint(
                    &format!("(Added {} new items to the study deck)", accepted),
                    Color::GREEN,
                    use_color,
                );
                println!("{}", reply::replace_block(original, &notice).trim());
                println!();
            }

            println!("{} accepted, {} rejected", accepted, rejected);
            for report in &reports {
                for rejection in &report.rejected {
                    println!(
                        "  {} #{}: {}",
                        paint("skipped", Color::RED, use_color),
                        rejection.index,
                        rejection.reason
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let (batch, source) = parse_input(r#"[{"kind": "essay", "question": "q", "answer": "a"}]"#).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(matches!(source, Source::Array));
    }

    #[test]
    fn test_parse_reply() {
        let text = "Sure!\n[QUIZ_DATA][{\"type\": \"flashcard\", \"question\": \"q\", \"answer\": \"a\"}][/QUIZ_DATA]";
        let (batch, source) = parse_input(text).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(matches!(source, Source::Reply(_)));
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(parse_input("no quiz here").is_err());
        assert!(parse_input("[QUIZ_DATA]{oops}[/QUIZ_DATA]").is_err());
    }
}
