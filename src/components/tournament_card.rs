use stapubox_api::{Match, Tournament};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};

const INDENT: &str = "    ";

/// Text lines for one tournament in the list. Cards are separated by a blank
/// trailing line, which is included in the returned lines.
pub fn card_lines(tournament: &Tournament, selected: bool, expanded: bool) -> Vec<Line<'static>> {
    let marker = if selected { "▸ " } else { "  " };
    let title_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::raw(marker),
            Span::styled(tournament.name.clone(), title_style),
            Span::styled(format!("  [{}]", tournament.level_label()), dim),
        ]),
        Line::from(vec![
            Span::raw(INDENT),
            Span::styled(tournament.sport_label().to_owned(), Style::default().fg(Color::Cyan)),
            Span::styled("  ·  ", dim),
            Span::raw(tournament.date_range_label()),
        ]),
    ];

    if tournament.has_matches() {
        if expanded {
            lines.extend(tournament.matches.iter().flat_map(match_lines));
        } else {
            let count = tournament.matches.len();
            let noun = if count == 1 { "match" } else { "matches" };
            lines.push(Line::styled(format!("{INDENT}▾ {count} {noun}"), dim));
        }
    }

    lines.push(Line::from(""));
    lines
}

fn match_lines(m: &Match) -> [Line<'static>; 2] {
    let dim = Style::default().fg(Color::DarkGray);
    let mut heading = vec![
        Span::raw(format!("{INDENT}• ")),
        Span::raw(m.title()),
        Span::styled(format!("  ({})", m.stage_label()), Style::default().fg(Color::Magenta)),
    ];
    if let Some(status) = m.status_label() {
        heading.push(Span::styled(format!("  [{status}]"), Style::default().fg(Color::Green)));
    }
    [
        Line::from(heading),
        Line::styled(
            format!("{INDENT}  {}  {}  @ {}", m.date_label(), m.time_label(), m.venue_label()),
            dim,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    fn tournament() -> Tournament {
        Tournament {
            id: 7,
            name: "Open".into(),
            start_date: "2025-09-15T10:00:00Z".into(),
            matches: vec![Match { id: 1, ..Default::default() }],
            ..Default::default()
        }
    }

    #[test]
    fn collapsed_card_uses_fallback_labels() {
        let lines = text(&card_lines(&tournament(), false, false));
        assert!(lines[0].contains("Open") && lines[0].contains("[Domestic]"), "{lines:?}");
        assert!(lines[1].contains("Unknown Sport"), "{lines:?}");
        assert!(lines[2].contains("1 match"), "{lines:?}");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn expanded_card_lists_matches_with_placeholders() {
        let lines = text(&card_lines(&tournament(), true, true));
        assert!(lines[0].starts_with("▸ "));
        assert!(lines[2].contains("Team A vs Team B") && lines[2].contains("(Stage)"), "{lines:?}");
        assert!(lines[3].contains("TBD"), "{lines:?}");
        assert!(!lines[2].contains('['), "no status, no tag: {lines:?}");
    }

    #[test]
    fn expanded_match_shows_its_status() {
        let mut t = tournament();
        t.matches[0].status = Some("live".into());
        t.matches.push(Match { id: 2, status: Some("  ".into()), ..Default::default() });
        let lines = text(&card_lines(&t, false, true));
        assert!(lines[2].ends_with("(Stage)  [live]"), "{lines:?}");
        assert!(lines[4].ends_with("(Stage)"), "blank status is hidden: {lines:?}");
    }

    #[test]
    fn cards_without_matches_have_no_expander() {
        let t = Tournament { matches: Vec::new(), ..tournament() };
        assert_eq!(card_lines(&t, false, true).len(), 3);
    }
}
