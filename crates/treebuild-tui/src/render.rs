use crate::app::{App, Focus};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io;
use treebuild_core::{Difficulty, SessionState};

/// Character width of the tree drawing area (16 leaf positions, 4 apart)
const TREE_WIDTH: u16 = 64;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;

    match app.session.state() {
        SessionState::Start => render_start_screen(stdout, app, term_width, term_height)?,
        SessionState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        SessionState::Won => render_win_screen(stdout, app, term_width, term_height)?,
        SessionState::Quit => {}
    }

    execute!(stdout, Show)?;
    Ok(())
}

/// Column of a slot's cell inside the tree area.
///
/// Depth `d` splits the area into `2^(d+1)` half-intervals; the node for
/// in-row index `i` sits at the center of interval `2i + 1`. This is the
/// same geometry the slot formula encodes, so layout needs no recursion.
fn slot_x(slot: usize, depth: usize) -> u16 {
    let in_row = slot - ((1 << depth) - 1);
    let half = (TREE_WIDTH as usize) >> (depth + 1);
    ((2 * in_row + 1) * half) as u16 - 1
}

fn slot_y(depth: usize) -> u16 {
    (depth * 2) as u16
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, SetBackgroundColor(theme.bg), Clear(ClearType::All))?;

    let left = if term_width > TREE_WIDTH + 2 {
        (term_width - TREE_WIDTH) / 2
    } else {
        1
    };
    let top = 2u16;

    let Some(tree) = app.session.tree() else {
        return Ok(());
    };
    let Some(board) = app.session.board() else {
        return Ok(());
    };

    // Edges first so the node cells draw over their endpoints
    execute!(stdout, SetForegroundColor(theme.edge))?;
    for node in tree.nodes() {
        for (child, glyph) in [(node.left(), "/"), (node.right(), "\\")] {
            if let Some(child) = child {
                let px = slot_x(node.slot(), node.depth());
                let cx = slot_x(child.slot(), child.depth());
                let mid = left + (px + cx) / 2;
                execute!(
                    stdout,
                    MoveTo(mid, top + slot_y(node.depth()) + 1),
                    Print(glyph)
                )?;
            }
        }
    }

    // Board cells: placed value, or a blank to fill in
    let populated = app.populated_slots();
    let cursor_slot = populated.get(app.cursor).copied();
    for node in tree.nodes() {
        let slot = node.slot();
        let x = left + slot_x(slot, node.depth());
        let y = top + slot_y(node.depth());

        let highlighted = app.focus == Focus::Tree && cursor_slot == Some(slot);
        let bg = if highlighted { theme.cursor_bg } else { theme.bg };
        let (text, fg) = match board.piece_at(slot).and_then(|p| piece_value(app, p)) {
            Some(value) => (format!("{:>2}", value), theme.placed),
            None => ("__".to_string(), theme.empty_slot),
        };
        execute!(
            stdout,
            MoveTo(x, y),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(text),
            SetBackgroundColor(theme.bg)
        )?;
    }

    render_tray(stdout, app, left, top + 11)?;
    render_status(stdout, app, left, top + 14, term_width)?;
    render_controls(stdout, app, left, term_height.saturating_sub(2))?;

    if let Some(ref msg) = app.message {
        execute!(
            stdout,
            MoveTo(left, top + 16),
            SetForegroundColor(theme.error),
            Print(msg)
        )?;
    }

    Ok(())
}

fn piece_value(app: &App, original_slot: usize) -> Option<u8> {
    app.session
        .pieces()
        .iter()
        .find(|p| p.original_slot == original_slot)
        .map(|p| p.value)
}

fn render_tray(stdout: &mut io::Stdout, app: &App, left: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(left, y),
        SetForegroundColor(theme.info),
        Print("Pieces:")
    )?;

    let unplaced = app.unplaced();
    for (i, piece) in unplaced.iter().enumerate() {
        let x = left + 8 + (i as u16) * 4;
        let highlighted = app.focus == Focus::Tray && i == app.tray_cursor;
        let picked = app.selected_piece == Some(piece.original_slot);
        let bg = if highlighted { theme.cursor_bg } else { theme.bg };
        let fg = if picked { theme.selected } else { theme.piece };
        execute!(
            stdout,
            MoveTo(x, y),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!("{:>2}", piece.value)),
            SetBackgroundColor(theme.bg)
        )?;
    }
    Ok(())
}

fn render_status(
    stdout: &mut io::Stdout,
    app: &App,
    left: u16,
    y: u16,
    _term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let board = app.session.board();
    let placed = board.map_or(0, |b| b.placed_count());
    let total = app.session.pieces().len();
    let difficulty = app
        .session
        .difficulty()
        .map_or_else(String::new, |d| d.to_string());

    let mut status = format!(
        "{}   {}   placed {}/{}",
        difficulty,
        app.elapsed_string(),
        placed,
        total
    );
    if let Some(piece) = app.selected_piece.and_then(|p| piece_value(app, p)) {
        status.push_str(&format!("   holding {}", piece));
    }
    execute!(
        stdout,
        MoveTo(left, y),
        SetForegroundColor(theme.info),
        Print(status)
    )?;
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, left: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let bindings = [
        ("tab", "focus"),
        ("arrows", "move"),
        ("enter", "pick/place/clear"),
        ("r", "reset"),
        ("n", "new"),
        ("t", "theme"),
        ("esc", "menu"),
        ("q", "quit"),
    ];
    execute!(stdout, MoveTo(left, y))?;
    for (key, label) in bindings {
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(key),
            SetForegroundColor(theme.info),
            Print(format!(" {}  ", label))
        )?;
    }
    Ok(())
}

fn render_start_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    _term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, SetBackgroundColor(theme.bg), Clear(ClearType::All))?;

    let center = term_width / 2;
    let title = "T R E E B U I L D";
    let subtitle = "Put every value back in its place";
    execute!(
        stdout,
        MoveTo(center.saturating_sub(title.len() as u16 / 2), 3),
        SetForegroundColor(theme.placed),
        Print(title),
        MoveTo(center.saturating_sub(subtitle.len() as u16 / 2), 5),
        SetForegroundColor(theme.info),
        Print(subtitle)
    )?;

    for (i, difficulty) in Difficulty::all_levels().iter().enumerate() {
        let row = format!(
            "{}  {:<8} {:>2} nodes",
            i + 1,
            difficulty.to_string(),
            difficulty.node_count()
        );
        let y = 8 + i as u16 * 2;
        let selected = app.menu_selection == i;
        execute!(
            stdout,
            MoveTo(center.saturating_sub(12), y),
            SetBackgroundColor(if selected { theme.cursor_bg } else { theme.bg }),
            SetForegroundColor(if selected { theme.fg } else { theme.info }),
            Print(row),
            SetBackgroundColor(theme.bg)
        )?;
    }

    let hint = "up/down + enter to start, q to quit";
    execute!(
        stdout,
        MoveTo(center.saturating_sub(hint.len() as u16 / 2), 15),
        SetForegroundColor(theme.key),
        Print(hint)
    )?;
    Ok(())
}

fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, SetBackgroundColor(theme.bg), Clear(ClearType::All))?;

    // Confetti positions hold for a few frames, then re-scatter
    let mut rng = StdRng::seed_from_u64(app.frame / 4);
    let glyphs = ['*', '+', '.', 'o'];
    let colors = [
        Color::Rgb { r: 255, g: 120, b: 120 },
        Color::Rgb { r: 120, g: 255, b: 150 },
        Color::Rgb { r: 120, g: 170, b: 255 },
        Color::Rgb { r: 255, g: 220, b: 110 },
    ];
    for _ in 0..120 {
        let x = rng.gen_range(0..term_width.max(1));
        let y = rng.gen_range(0..term_height.max(1));
        let glyph = glyphs[rng.gen_range(0..glyphs.len())];
        let color = colors[rng.gen_range(0..colors.len())];
        execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(color),
            Print(glyph)
        )?;
    }

    let center_x = term_width / 2;
    let center_y = term_height / 2;
    let banner = "Y O U   W I N";
    let stats = format!(
        "{} puzzle solved in {}",
        app.session
            .difficulty()
            .map_or_else(String::new, |d| d.to_string()),
        app.elapsed_string()
    );
    let hint = "enter  play again    q  quit";
    execute!(
        stdout,
        MoveTo(
            center_x.saturating_sub(banner.len() as u16 / 2),
            center_y.saturating_sub(2)
        ),
        SetForegroundColor(theme.success),
        Print(banner),
        MoveTo(center_x.saturating_sub(stats.len() as u16 / 2), center_y),
        SetForegroundColor(theme.fg),
        Print(stats),
        MoveTo(center_x.saturating_sub(hint.len() as u16 / 2), center_y + 2),
        SetForegroundColor(theme.key),
        Print(hint)
    )?;
    Ok(())
}
