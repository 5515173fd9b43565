// ============================================================================
// Rendu de l'interface
// ============================================================================
// Dessine les trois écrans (login, onboarding, dashboard) avec ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, List)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoginField, Screen};
use crate::ledger::Vote;
use crate::models::Section;
use crate::session::StatusLine;
use crate::view_model::{DashboardView, VoteState, VoteTarget};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit que tous les écrans sont gérés
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Login => render_login(frame, app, chunks[1]),
        Screen::Onboarding => render_onboarding(frame, app, chunks[1]),
        Screen::Dashboard => render_dashboard(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Header (3 lignes), contenu, footer (4 lignes : statut + raccourcis)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area)
        .to_vec()
}

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" HodlBoard ")
        .title_alignment(Alignment::Center);

    let subtitle = match (&app.current_screen, &app.view) {
        (Screen::Dashboard, Some(view)) => {
            let date = view
                .snapshot_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("Snapshot #{} du {}", view.snapshot_id, date)
        }
        (Screen::Dashboard, None) => "Aucun snapshot chargé".to_string(),
        (Screen::Onboarding, _) => "Onboarding : choisissez vos coins et votre profil".to_string(),
        (Screen::Login, _) => "Crypto advisor : connexion".to_string(),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(subtitle, key_style(Color::Green))))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Écran : Login
// ============================================================================

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Auth ");

    let field = |label: &str, value: String, focused: bool| {
        let style = if focused {
            key_style(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "█" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<10}", label), style),
            Span::styled(value, Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    };

    // Le mot de passe n'est jamais affiché en clair
    let masked = "•".repeat(app.password.chars().count());

    let text = vec![
        Line::from(""),
        field("Username", app.username.clone(), app.focused_field == LoginField::Username),
        field("Password", masked, app.focused_field == LoginField::Password),
        Line::from(""),
        Line::from(Span::styled(
            "HTTP Basic : les identifiants sont renvoyés à chaque appel.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Écran : Onboarding
// ============================================================================

fn render_onboarding(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // Liste des assets avec cases à cocher
    let items: Vec<ListItem> = app
        .options
        .crypto_asset_suggestions
        .iter()
        .enumerate()
        .map(|(index, asset)| {
            let checked = if app.draft.has_asset(asset) { "[x]" } else { "[ ]" };
            let mut style = if app.draft.has_asset(asset) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            if index == app.asset_cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            ListItem::new(format!(" {} {}", checked, asset)).style(style)
        })
        .collect();

    let assets = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Coins "),
    );
    frame.render_widget(assets, columns[0]);

    let toggle = |key: &str, label: &str, on: bool| {
        Line::from(vec![
            Span::styled(format!("[{}] ", key), key_style(Color::Yellow)),
            Span::raw(format!("{:<12}", label)),
            if on {
                Span::styled("on", key_style(Color::Green))
            } else {
                Span::styled("off", Style::default().fg(Color::DarkGray))
            },
        ])
    };

    let investor = if app.draft.investor_type.is_empty() {
        "Select...".to_string()
    } else {
        app.draft.investor_type.clone()
    };

    let text = vec![
        Line::from(vec![
            Span::styled("[← →] ", key_style(Color::Yellow)),
            Span::raw("Investor type : "),
            Span::styled(investor, key_style(Color::Magenta)),
        ]),
        Line::from(""),
        toggle("n", "Market news", app.draft.market_news),
        toggle("c", "Charts", app.draft.charts),
        toggle("s", "Social", app.draft.social),
        toggle("f", "Fun", app.draft.fun),
        Line::from(""),
        Line::from(Span::styled(
            "L'AI insight est toujours affiché.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let prefs = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Préférences "),
    );
    frame.render_widget(prefs, columns[1]);
}

// ============================================================================
// Écran : Dashboard
// ============================================================================

/// Libellé de vote : boutons si ouvert, seul le vote choisi sinon
fn vote_badge(target: Option<&VoteTarget>) -> Span<'static> {
    match target.map(|t| t.state) {
        Some(VoteState::Open) => Span::styled(
            format!("  [{} {} {}]", Vote::Up.symbol(), Vote::Neutral.symbol(), Vote::Down.symbol()),
            Style::default().fg(Color::DarkGray),
        ),
        Some(VoteState::Locked(vote)) => {
            Span::styled(format!("  {}", vote.symbol()), key_style(Color::Green))
        }
        None => Span::raw(""),
    }
}

/// Compteur partagé entre les sections pour retrouver la cible sélectionnée
struct Selection {
    selected: usize,
    next: usize,
}

impl Selection {
    /// Avance si l'item a une cible ; true si c'est la cible sélectionnée
    fn advance(&mut self, target: Option<&VoteTarget>) -> bool {
        if target.is_none() {
            return false;
        }
        let hit = self.next == self.selected;
        self.next += 1;
        hit
    }
}

fn section_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title))
}

fn highlight(style: Style, selected: bool) -> Style {
    if selected {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        style
    }
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let view = match &app.view {
        Some(view) => view,
        None => {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Appuyez sur [r] pour charger le dashboard",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(section_block("Dashboard"))
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut selection = Selection {
        selected: app.selected_target,
        next: 0,
    };

    // Colonne gauche : news (optionnel) + insight ; droite : prix + meme
    // L'ordre de rendu suit celui de DashboardView::vote_targets()
    let left_constraints = if view.visibility.market_news {
        vec![Constraint::Percentage(60), Constraint::Percentage(40)]
    } else {
        vec![Constraint::Percentage(100)]
    };
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints(left_constraints)
        .split(columns[0]);

    let right_panels = [view.visibility.coin_prices, view.visibility.meme]
        .iter()
        .filter(|v| **v)
        .count()
        .max(1);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, right_panels as u32); right_panels])
        .split(columns[1]);

    let mut left_slot = 0;
    if view.visibility.market_news {
        render_news(frame, view, &mut selection, left[left_slot]);
        left_slot += 1;
    }

    let mut right_slot = 0;
    if view.visibility.coin_prices {
        render_prices(frame, view, &mut selection, right[right_slot]);
        right_slot += 1;
    }

    render_insights(frame, view, &mut selection, left[left_slot]);

    if view.visibility.meme {
        render_meme(frame, view, &mut selection, right[right_slot]);
    } else if right_slot == 0 {
        let hidden = Paragraph::new(Span::styled(
            "Prix et meme masqués par vos préférences",
            Style::default().fg(Color::DarkGray),
        ))
        .block(section_block("…"))
        .alignment(Alignment::Center);
        frame.render_widget(hidden, right[0]);
    }
}

fn render_news(frame: &mut Frame, view: &DashboardView, selection: &mut Selection, area: Rect) {
    let block = section_block(Section::MarketNews.title());

    if view.news.is_empty() {
        let empty = Paragraph::new(Span::styled("No news today.", Style::default().fg(Color::Gray)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view
        .news
        .iter()
        .map(|item| {
            let target = item.target.as_ref();
            let selected = selection.advance(target);
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{:<6}", item.row.asset), key_style(Color::Yellow)),
                Span::styled(item.row.title.clone(), highlight(Style::default(), selected)),
                vote_badge(target),
            ])];
            if let Some(published) = &item.row.published_at {
                lines.push(Line::from(Span::styled(
                    format!("      {}", published),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_prices(frame: &mut Frame, view: &DashboardView, selection: &mut Selection, area: Rect) {
    let target = view.prices_vote.as_ref();
    let selected = selection.advance(target);

    let title = match target.map(|t| t.state) {
        Some(VoteState::Locked(vote)) => format!("{} {}", Section::CoinPrices.title(), vote.symbol()),
        _ => Section::CoinPrices.title().to_string(),
    };

    let mut lines: Vec<Line> = view
        .prices
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("{:<12}", row.asset), key_style(Color::Yellow)),
                Span::styled(format!("{:>14}", row.price.to_string()), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No prices.", Style::default().fg(Color::Gray))));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Bloc des prix", highlight(Style::default().fg(Color::Gray), selected)),
            vote_badge(target),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(section_block(&title)), area);
}

fn render_insights(frame: &mut Frame, view: &DashboardView, selection: &mut Selection, area: Rect) {
    let block = section_block(Section::AiInsight.title());

    if !view.has_insight() {
        let empty = Paragraph::new(Span::styled(
            "No insight available today.",
            Style::default().fg(Color::Gray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for item in &view.insights {
        let target = item.target.as_ref();
        let selected = selection.advance(target);
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", item.row.asset), key_style(Color::Magenta)),
            Span::styled(item.row.summary.clone(), highlight(Style::default(), selected)),
            vote_badge(target),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_meme(frame: &mut Frame, view: &DashboardView, selection: &mut Selection, area: Rect) {
    let block = section_block(Section::Meme.title());

    let meme = match &view.meme {
        Some(meme) => meme,
        None => {
            let empty = Paragraph::new(Span::styled("No meme today.", Style::default().fg(Color::Gray)))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }
    };

    let target = meme.target.as_ref();
    let selected = selection.advance(target);
    let title = meme.row.title.clone().unwrap_or_else(|| "Meme".to_string());

    // Les data URI SVG sont longues : on n'en montre que le début
    let url: String = meme.row.url.chars().take(60).collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(title, highlight(key_style(Color::White), selected)),
            vote_badge(target),
        ]),
        Line::from(Span::styled(url, Style::default().fg(Color::Blue))),
        Line::from(Span::styled(
            format!("asset : {}", meme.row.asset),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

// ============================================================================
// Footer : statut + raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let status = match &app.status {
        StatusLine::Idle if app.is_loading => {
            Line::from(Span::styled("⏳ ...", Style::default().fg(Color::Yellow)))
        }
        StatusLine::Idle => Line::from(""),
        StatusLine::Info(msg) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Green))),
        StatusLine::Error(msg) => Line::from(Span::styled(msg.clone(), key_style(Color::Red))),
    };

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        let key = if app.current_screen == Screen::Login { "[Esc]" } else { "[q]" };
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key_style(Color::Yellow)),
            Span::styled(key, key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK)),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                key_style(Color::Yellow),
            ),
        ])
    } else {
        let pairs: &[(&str, &str)] = match app.current_screen {
            Screen::Login => &[
                ("[Tab]", " Champ  "),
                ("[Enter]", " Login  "),
                ("[F2]", " Register  "),
                ("[Esc]", " Quit"),
            ],
            Screen::Onboarding => &[
                ("[↑↓]", " Coin  "),
                ("[Space]", " Select  "),
                ("[← →]", " Profil  "),
                ("[n c s f]", " Sections  "),
                ("[Enter]", " Save  "),
                ("[L]", " Logout  "),
                ("[q]", " Quit"),
            ],
            Screen::Dashboard => &[
                ("[↑↓]", " Item  "),
                ("[+ 0 -]", " Vote  "),
                ("[r]", " Refresh  "),
                ("[L]", " Logout  "),
                ("[q]", " Quit"),
            ],
        };
        Line::from(
            pairs
                .iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style(Color::Yellow)), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    };

    let paragraph = Paragraph::new(vec![status, shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
