//! Plain-text rendering of the notes page.

use std::fmt::Write;

use notekeeper_core::models::Stats;
use notekeeper_view::card::NoteCard;

/// Stats keys shown in the summary line, in display order.
const SUMMARY_KEYS: [&str; 3] = ["total", "active", "archived"];

/// One block per card, separated by a blank line.
pub fn render_cards(cards: &[NoteCard]) -> String {
    if cards.is_empty() {
        return "No notes found.\n".to_string();
    }

    let mut out = String::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let archived = if card.is_archived { " [archived]" } else { "" };
        let _ = writeln!(out, "#{} {}{archived}", card.id, card.title);
        let _ = writeln!(out, "   {} | {}", card.category_label, card.created_label);
        for line in card.content.lines() {
            let _ = writeln!(out, "   {line}");
        }
    }
    out
}

/// `key: value` pairs for the stats the server reported. Missing keys
/// are skipped; `None` when nothing is known.
pub fn render_stats(stats: Option<&Stats>) -> Option<String> {
    let stats = stats?;
    let parts: Vec<String> = SUMMARY_KEYS
        .iter()
        .filter_map(|key| stats.get(key).map(|value| format!("{key}: {value}")))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
