use studydeck_lib::quiz::{ItemKind, ItemProgress, Outcome, StudyItem};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Cut text to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let kept: String = flat.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Short kind label for listings
pub fn kind_label(kind: &ItemKind) -> &'static str {
    match kind {
        ItemKind::Flashcard => "Flashcard",
        ItemKind::MultipleChoice { .. } => "MCQ",
        ItemKind::TrueFalse => "T/F",
        ItemKind::Essay => "Essay",
    }
}

/// Letter shown before the option at `index`
pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Render the current study card with its progress and result
pub fn render_card(
    item: &StudyItem,
    progress: &ItemProgress,
    outcome: Option<&Outcome>,
    position: (usize, usize),
    use_color: bool,
) -> String {
    let mut lines = Vec::new();

    lines.push(paint(
        &format!("Mode: {} | Question {} of {}", item.kind().tag(), position.0, position.1),
        Color::GRAY,
        use_color,
    ));
    lines.push(String::new());
    lines.push(paint(item.question(), Color::BOLD, use_color));
    lines.push(String::new());

    match progress {
        ItemProgress::Flashcard { flipped } => {
            if *flipped {
                lines.push(paint(item.answer(), Color::BLUE, use_color));
            } else {
                lines.push(paint("(f to flip)", Color::DIM, use_color));
            }
        }
        ItemProgress::Choice { selected } => {
            for (i, option) in item.options().unwrap_or_default().into_iter().enumerate() {
                let line = format!("  {}. {}", option_letter(i), option);
                let color = match selected {
                    Some(_) if option == item.answer() => Color::GREEN,
                    Some(choice) if choice == option => Color::RED,
                    Some(_) => Color::DIM,
                    None => Color::RESET,
                };
                lines.push(if selected.is_some() {
                    paint(&line, color, use_color)
                } else {
                    line
                });
            }
        }
        ItemProgress::Essay { response } => {
            if response.is_none() {
                lines.push(paint("(type your answer and press enter)", Color::DIM, use_color));
            }
        }
    }

    match outcome {
        Some(Outcome::Correct) => {
            lines.push(String::new());
            lines.push(paint("Correct!", Color::GREEN, use_color));
        }
        Some(Outcome::Incorrect { expected }) => {
            lines.push(String::new());
            lines.push(paint(
                &format!("Wrong. The correct answer is: {}", expected),
                Color::RED,
                use_color,
            ));
        }
        Some(Outcome::SelfAssess { response, reference }) => {
            lines.push(format!("Your answer: {}", response));
            lines.push(String::new());
            lines.push(paint("Reference answer:", Color::GREEN, use_color));
            lines.push(paint(reference, Color::ITALIC, use_color));
        }
        None => {}
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydeck_lib::quiz::seed_items;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("What is the capital?", 10), "What is...");
        assert_eq!(truncate("two\nlines", 20), "two lines");
    }

    #[test]
    fn test_option_letters() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }

    #[test]
    fn test_render_answered_choice() {
        let items = seed_items();
        let progress = ItemProgress::Choice {
            selected: Some("Huế".to_string()),
        };
        let outcome = Outcome::Incorrect {
            expected: "Hà Nội".to_string(),
        };
        let text = render_card(&items[1], &progress, Some(&outcome), (2, 3), false);

        assert!(text.contains("Question 2 of 3"));
        assert!(text.contains("  A. Hà Nội"));
        assert!(text.contains("  D. Huế"));
        assert!(text.contains("The correct answer is: Hà Nội"));
    }

    #[test]
    fn test_render_flashcard_faces() {
        let items = seed_items();
        let front = render_card(&items[0], &ItemProgress::Flashcard { flipped: false }, None, (1, 3), false);
        assert!(!front.contains("Sự đổi mới"));

        let back = render_card(&items[0], &ItemProgress::Flashcard { flipped: true }, None, (1, 3), false);
        assert!(back.contains("Sự đổi mới, sáng tạo"));
    }
}
