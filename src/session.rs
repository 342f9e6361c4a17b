//! Terminal session: turns commands and lookup completions into text.

use weatherdesk_services::{
    Activation, Completion, Desk, FavoriteRecord, HistoryRecord, LookupMessage, View,
};
use weatherdesk_weather::{WeatherGateway, WeatherReport, TEMPERATURE_SYMBOL};

use crate::command::{Command, HELP};
use crate::error_mapping;

/// What the event loop should do after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue(Option<String>),
    Quit,
}

pub struct Session<G: WeatherGateway> {
    desk: Desk<G>,
}

impl<G: WeatherGateway> Session<G> {
    pub fn new(desk: Desk<G>) -> Self {
        Self { desk }
    }

    pub fn run_line(&mut self, line: &str) -> Step {
        match Command::parse(line) {
            Ok(Some(Command::Quit)) => Step::Quit,
            Ok(Some(command)) => Step::Continue(Some(self.execute(command))),
            Ok(None) => Step::Continue(None),
            Err(usage) => Step::Continue(Some(usage)),
        }
    }

    fn execute(&mut self, command: Command) -> String {
        let result = match command {
            Command::Search(name) => Ok(activation_text(self.desk.search(&name), None)),
            Command::Save => self
                .desk
                .save_current()
                .map(|f| format!("Saved {}, {}.", f.name, f.country)),
            Command::Favorites => Ok(self.render_favorites()),
            Command::Open(i) => {
                let name = self.desk.favorites().get(i).map(|f| f.name.clone());
                self.desk
                    .open_favorite(i)
                    .map(|a| activation_text(a, name.as_deref()))
            }
            Command::Recent => Ok(self.render_history()),
            Command::View(i) => {
                let name = self.desk.history().get(i).map(|h| h.name.clone());
                self.desk
                    .open_recent(i)
                    .map(|a| activation_text(a, name.as_deref()))
            }
            Command::Go(i) => self.desk.search_favorite(i).map(|a| activation_text(a, None)),
            Command::Remove(i) => self
                .desk
                .remove_favorite(i)
                .map(|f| format!("Removed {}, {}.", f.name, f.country)),
            Command::Close => {
                for view in View::ALL {
                    self.desk.collapse(view);
                }
                Ok("Details hidden.".to_string())
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        };

        result.unwrap_or_else(|e| {
            let app_error = error_mapping::from_desk(e);
            tracing::debug!("Command failed: {}", app_error);
            app_error.user_message()
        })
    }

    /// Apply a finished lookup. Returns text only when something changed.
    pub fn on_lookup(&mut self, message: LookupMessage) -> Option<String> {
        let LookupMessage::Done { view, .. } = &message;
        let view = *view;
        match self.desk.handle(message) {
            Completion::Applied(report) => Some(render_detail(&report, view)),
            Completion::Failed(label) => Some(error_mapping::lookup_failed(label).user_message()),
            Completion::Stale => None,
        }
    }

    fn render_favorites(&self) -> String {
        render_favorites(
            self.desk.favorites(),
            self.desk.controller(View::Favorites).detail(),
        )
    }

    fn render_history(&self) -> String {
        render_history(
            self.desk.history(),
            self.desk.controller(View::History).detail(),
        )
    }
}

fn activation_text(activation: Activation, name: Option<&str>) -> String {
    match activation {
        Activation::Fetch { query, .. } => {
            format!("Looking up {}...", name.map_or_else(|| query.label(), str::to_string))
        }
        Activation::Collapsed => "Details hidden.".to_string(),
    }
}

fn view_title(view: View) -> &'static str {
    match view {
        View::Search => "Search",
        View::Favorites => "Favorites",
        View::History => "Recently viewed",
    }
}

pub fn render_detail(report: &WeatherReport, view: View) -> String {
    format!(
        "[{}] {}, {}\n    {:.1}{}  {}\n    Humidity: {}%",
        view_title(view),
        report.name,
        report.country,
        report.temp,
        TEMPERATURE_SYMBOL,
        report.description,
        report.humidity
    )
}

pub fn render_favorites(
    favorites: &[FavoriteRecord],
    expanded: Option<&WeatherReport>,
) -> String {
    if favorites.is_empty() {
        return "No favorites yet. Search for a city and type 'save'.".to_string();
    }

    let mut out = format!("Favorites ({})", favorites.len());
    for (n, fav) in favorites.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}, {}", n + 1, fav.name, fav.country));
        if let Some(report) = expanded.filter(|r| r.id == fav.id) {
            out.push_str(&format!(
                "\n       {:.1}{}  {}  humidity {}%",
                report.temp,
                TEMPERATURE_SYMBOL,
                report.description,
                report.humidity
            ));
        }
    }
    out
}

pub fn render_history(
    history: &[HistoryRecord],
    expanded: Option<&WeatherReport>,
) -> String {
    if history.is_empty() {
        return "No recently viewed cities.".to_string();
    }

    let mut out = "Recently viewed".to_string();
    for (n, entry) in history.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {}, {}  {:.1}{}",
            n + 1,
            entry.name,
            entry.country,
            entry.temp,
            TEMPERATURE_SYMBOL
        ));
        if let Some(report) = expanded.filter(|r| r.id == entry.id) {
            out.push_str(&format!(
                "\n       now {:.1}{}  {}  humidity {}%",
                report.temp,
                TEMPERATURE_SYMBOL,
                report.description,
                report.humidity
            ));
        }
    }
    out
}
