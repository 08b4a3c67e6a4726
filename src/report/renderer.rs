use crate::config::ColorMode;
use crate::git::{ChangeLabel, ConditionFlags, Repository, StatusState};
use crossterm::style::{Color, Stylize, style};
use crossterm::tty::IsTty;
use std::io::{self, Write};
use std::path::Path;

/// Line printed when a scan found nothing
pub const NO_REPOSITORIES: &str = "No repositories found...";

const INFO_COLOR: Color = Color::Magenta;
const DIRTY_COLOR: Color = Color::Yellow;
const UNKNOWN_COLOR: Color = Color::DarkGrey;
const GAP: &str = "    ";

/// Turns queried repositories into report lines
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Pick color output according to `mode` and the current stdout
    pub fn from_mode(mode: ColorMode) -> Self {
        Self::new(use_color(mode, io::stdout().is_tty()))
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Line announcing which directory is being searched
    pub fn header(&self, root: &Path) -> String {
        let text = format!("Looking for git repositories in \"{}\"", root.display());
        self.paint(&text, INFO_COLOR)
    }

    /// Render one line per repository, in the given order
    ///
    /// Only stored state is read; nothing is classified here.
    pub fn render(&self, repositories: &[Repository]) -> Vec<String> {
        if repositories.is_empty() {
            return vec![NO_REPOSITORIES.to_string()];
        }

        let width = repositories
            .iter()
            .map(|repo| repo.path().display().to_string().chars().count())
            .max()
            .unwrap_or(0);

        repositories
            .iter()
            .map(|repo| self.render_line(repo, width))
            .collect()
    }

    /// Write the rendered report, one line each
    pub fn write_report<W: Write>(&self, out: &mut W, repositories: &[Repository]) -> io::Result<()> {
        for line in self.render(repositories) {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    fn render_line(&self, repo: &Repository, width: usize) -> String {
        let path = repo.path().display().to_string();

        match repo.state() {
            // Clean repositories keep the terminal's default color
            StatusState::Known(flags) if flags.clean => path,
            StatusState::Known(flags) => {
                let padded = format!("{:<width$}", path, width = width);
                format!("{}{}{}", self.paint(&padded, DIRTY_COLOR), GAP, self.details(flags))
            }
            StatusState::Unknown(_) => {
                let padded = format!("{:<width$}", path, width = width);
                format!(
                    "{}{}{}",
                    self.paint(&padded, UNKNOWN_COLOR),
                    GAP,
                    self.paint("[ status unknown ]", UNKNOWN_COLOR)
                )
            }
            StatusState::Pending => {
                let padded = format!("{:<width$}", path, width = width);
                format!("{}{}[ not queried ]", padded, GAP)
            }
        }
    }

    /// Bracketed label list, e.g. `[ modified  untracked ]`
    fn details(&self, flags: &ConditionFlags) -> String {
        let mut text = String::from("[");
        for label in flags.labels() {
            let item = format!(" {} ", label);
            text.push_str(&self.paint(&item, label_color(label)));
        }
        text.push(']');
        text
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

fn label_color(label: ChangeLabel) -> Color {
    match label {
        ChangeLabel::Modified => Color::Blue,
        ChangeLabel::Deleted => Color::Red,
        ChangeLabel::Untracked => Color::Cyan,
        ChangeLabel::Renamed => Color::Green,
    }
}

/// Decide whether to emit ANSI colors
///
/// `Auto` colors only terminals, and backs off for `NO_COLOR` and dumb
/// terminals.
pub fn use_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if !is_terminal {
                return false;
            }

            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }

            !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
        }
    }
}
