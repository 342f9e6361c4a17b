//! One line of user input.

/// A parsed command. Positions are already converted to 0-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Save,
    Favorites,
    Open(usize),
    Recent,
    View(usize),
    Go(usize),
    Remove(usize),
    Close,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <city>   look up the current weather for a city
  save            save the city shown by the last search
  favorites       list saved cities
  open <n>        show or hide details for saved city n
  go <n>          search for saved city n by name
  remove <n>      delete saved city n
  recent          list recently viewed cities
  view <n>        show or hide details for recent city n
  close           hide all details
  help            show this list
  quit            exit";

impl Command {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => {
                if rest.is_empty() {
                    return Err("Usage: search <city>".to_string());
                }
                Command::Search(rest.to_string())
            }
            "save" => Command::Save,
            "favorites" | "favs" => Command::Favorites,
            "open" => Command::Open(position("open", rest)?),
            "recent" | "history" => Command::Recent,
            "view" => Command::View(position("view", rest)?),
            "go" => Command::Go(position("go", rest)?),
            "remove" | "rm" => Command::Remove(position("remove", rest)?),
            "close" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }
}

fn position(word: &str, arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Usage: {} <n>, where n is a list number", word)),
    }
}
