use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let heading = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    let good = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(good)
        .valid(good)
        .invalid(bad)
        .error(bad)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Colors
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const MAGENTA: Color = Color::Rgb {
        r: 255,
        g: 0,
        b: 255,
    };
    pub const PURPLE: Color = Color::Rgb {
        r: 180,
        g: 100,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 100,
        g: 149,
        b: 237,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Line colors of chart series, cycled per artist.
    pub const SERIES: [Color; 5] = [CYAN, MAGENTA, GREEN, ORANGE, BLUE];
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CROSS_MARK: &str = "✗";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        "ℹ".with(colors::BLUE).bold(),
        message.with(colors::BLUE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Section Headers
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 60;

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let rest = SECTION_WIDTH.saturating_sub(title_len + 4 + padding);

    println!();
    println!(
        "{}{} {} {}{}",
        box_chars::ROUND_TOP_LEFT.with(colors::CYAN),
        box_chars::SINGLE_HORIZONTAL
            .repeat(padding)
            .with(colors::CYAN),
        title.with(colors::CYAN).bold().attribute(Attribute::Italic),
        box_chars::SINGLE_HORIZONTAL.repeat(rest).with(colors::CYAN),
        box_chars::ROUND_TOP_RIGHT.with(colors::CYAN)
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        box_chars::ROUND_BOTTOM_LEFT.with(colors::CYAN),
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH)
            .with(colors::CYAN),
        box_chars::ROUND_BOTTOM_RIGHT.with(colors::CYAN)
    );
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key-Value Display
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::PURPLE),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

/// Boxed table with left-aligned text columns and right-aligned numeric ones.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
    right_aligned: Vec<bool>,
    colored: bool,
}

impl TableBuilder {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        TableBuilder {
            col_widths: headers.iter().map(|h| h.width()).collect(),
            right_aligned: vec![false; headers.len()],
            headers,
            rows: Vec::new(),
            colored: true,
        }
    }

    /// Renders without ANSI escapes.
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self
    }

    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(column) {
            *flag = true;
        }
        self
    }

    pub fn add_row<S: Into<String>>(&mut self, row: Vec<S>) {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        for (i, cell) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(cell.width());
            }
        }
        self.rows.push(row);
    }

    fn paint(&self, text: &str, color: CtColor, bold: bool) -> String {
        match (self.colored, bold) {
            (false, _) => text.to_string(),
            (true, false) => text.with(color).to_string(),
            (true, true) => text.with(color).bold().to_string(),
        }
    }

    fn border(&self, left: &str, junction: &str, right: &str) -> String {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::SINGLE_HORIZONTAL.repeat(w + 2))
            .collect();
        let line = format!("{}{}{}", left, segments.join(junction), right);
        self.paint(&line, colors::CYAN, false)
    }

    fn line(&self, cells: &[String], color: CtColor, bold: bool) -> String {
        let separator = self.paint(box_chars::SINGLE_VERTICAL, colors::CYAN, false);
        let mut out = separator.clone();
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            let painted = self.paint(cell, color, bold);
            if self.right_aligned[i] {
                out.push_str(&format!(" {}{} ", padding, painted));
            } else {
                out.push_str(&format!(" {}{} ", painted, padding));
            }
            out.push_str(&separator);
        }
        out
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            self.border(box_chars::ROUND_TOP_LEFT, box_chars::T_TOP, box_chars::ROUND_TOP_RIGHT),
            self.line(&self.headers, colors::CYAN, true),
            self.border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT),
        ];
        for row in &self.rows {
            lines.push(self.line(row, colors::WHITE, false));
        }
        lines.push(self.border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        ));
        lines.join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{}{} ",
        "❯".with(colors::CYAN).bold(),
        "❯".with(colors::PURPLE).bold(),
        "❯".with(colors::MAGENTA).bold(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welcome Message
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_welcome(db_path: &str, artist_count: usize, song_count: usize) {
    let box_width: usize = 64;
    let version = format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"));
    let artists = artist_count.to_string();
    let songs = song_count.to_string();

    let boxed = |content: String, visible_len: usize| {
        println!(
            "  {}{}{}{}",
            box_chars::DOUBLE_VERTICAL.with(colors::PURPLE),
            content,
            " ".repeat(box_width.saturating_sub(visible_len)),
            box_chars::DOUBLE_VERTICAL.with(colors::PURPLE)
        );
    };

    println!();
    println!(
        "  {}{}{}",
        box_chars::DOUBLE_TOP_LEFT.with(colors::PURPLE),
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::PURPLE),
        box_chars::DOUBLE_TOP_RIGHT.with(colors::PURPLE)
    );

    let title = "Top Artists Explorer";
    boxed(
        format!("  {}", title.with(colors::CYAN).bold()),
        title.width() + 2,
    );
    boxed(String::new(), 0);

    for (key, value) in [
        ("Catalog", db_path),
        ("Artists", artists.as_str()),
        ("Songs", songs.as_str()),
        ("Version", version.as_str()),
    ] {
        boxed(
            format!("  {} {}", format!("{}:", key).with(colors::DIM), value),
            key.width() + value.width() + 4,
        );
    }

    boxed(String::new(), 0);
    let help_msg = "  Type 'help' for available commands";
    boxed(help_msg.with(colors::DIM).to_string(), help_msg.width());

    println!(
        "  {}{}{}",
        box_chars::DOUBLE_BOTTOM_LEFT.with(colors::PURPLE),
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::PURPLE),
        box_chars::DOUBLE_BOTTOM_RIGHT.with(colors::PURPLE)
    );
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub fn print_help(commands: &[CommandHelp]) {
    print_section_header("Available Commands");
    println!();

    fn print_command_group(title: &str, commands: &[&CommandHelp], color: CtColor) {
        if commands.is_empty() {
            return;
        }
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(color),
            title.with(color).bold()
        );
        for cmd in commands {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::GREEN).bold(),
                cmd.args.with(colors::DIM),
                cmd.description.with(colors::WHITE)
            );
        }
        println!();
    }

    fn group<'a>(commands: &'a [CommandHelp], names: &[&str]) -> Vec<&'a CommandHelp> {
        commands.iter().filter(|c| names.contains(&c.name)).collect()
    }

    print_command_group("Rankings", &group(commands, &["top"]), colors::CYAN);
    print_command_group(
        "Genres",
        &group(commands, &["artist", "year"]),
        colors::MAGENTA,
    );
    print_command_group(
        "System",
        &group(commands, &["config", "help", "exit"]),
        colors::ORANGE,
    );

    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Goodbye Message
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_goodbye() {
    println!();
    println!(
        "  {} {}",
        "👋".with(colors::CYAN),
        "Goodbye! Thanks for exploring the charts."
            .with(colors::PURPLE)
            .bold()
    );
    println!();
}

pub fn flush() {
    let _ = io::stdout().flush();
}
