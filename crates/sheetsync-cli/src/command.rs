#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick a file without uploading it.
    File(String),
    /// Upload the given path, or the picked file.
    Upload(Option<String>),
    View,
    Search(String),
    Next,
    Prev,
    /// 1-based position in the displayed rows.
    Delete(usize),
    Show,
    Json,
    /// Hold further input until every request has finished.
    Wait,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  file <path>      pick a spreadsheet
  upload [path]    upload the picked (or given) file
  view             show page 1 of the stored records
  search [term]    filter the loaded page by ID; blank reloads the page
  next | prev      move between pages
  delete <row>     delete the row at that position
  show | json      print the table, or the view state as JSON
  wait             wait for outstanding requests
  help | quit";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "file" if !rest.is_empty() => Command::File(rest.to_string()),
        "file" => return Err("usage: file <path>".into()),
        "upload" => Command::Upload((!rest.is_empty()).then(|| rest.to_string())),
        "view" => Command::View,
        "search" => Command::Search(rest.to_string()),
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "delete" | "del" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Delete(n),
            _ => return Err("usage: delete <row number>".into()),
        },
        "show" | "" => Command::Show,
        "json" => Command::Json,
        "wait" => Command::Wait,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(command)
}
