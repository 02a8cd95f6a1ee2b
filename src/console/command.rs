use crate::api::{CaseForm, FormField};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(String),
    Submit(Vec<FieldSpec>),
    Logout,
    Show,
    Help,
    Quit,
}

/// One `name=value` or `name=@path` argument of `submit`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    Text { name: String, value: String },
    File { name: String, path: PathBuf },
}

pub const HELP: &str = "\
commands:
  new                          show the New Case view
  history                      show the History view (reloads history)
  submit name=value name=@file submit the case form
  logout                       clear the session and leave
  show                         print the active view
  help                         this text
  quit                         exit";

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let words = shell_words::split(line).map_err(|e| e.to_string())?;
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.as_str() {
        "new" => Command::Navigate("newCaseLink".to_string()),
        "history" => Command::Navigate("historyLink".to_string()),
        "nav" => match rest {
            [link] => Command::Navigate(link.clone()),
            _ => return Err("usage: nav <link-id>".to_string()),
        },
        "submit" => Command::Submit(
            rest.iter()
                .map(|word| parse_field(word))
                .collect::<Result<_, _>>()?,
        ),
        "logout" => Command::Logout,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {} (try `help`)", other)),
    };

    Ok(Some(command))
}

fn parse_field(word: &str) -> Result<FieldSpec, String> {
    let (name, value) = word
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", word))?;
    if name.is_empty() {
        return Err(format!("missing field name in {:?}", word));
    }

    Ok(match value.strip_prefix('@') {
        Some(path) => FieldSpec::File {
            name: name.to_string(),
            path: PathBuf::from(path),
        },
        None => FieldSpec::Text {
            name: name.to_string(),
            value: value.to_string(),
        },
    })
}

/// Read file fields from disk, keeping declaration order.
pub async fn build_form(specs: &[FieldSpec]) -> std::io::Result<CaseForm> {
    let mut form = CaseForm::new();
    for spec in specs {
        let field = match spec {
            FieldSpec::Text { name, value } => FormField::Text {
                name: name.clone(),
                value: value.clone(),
            },
            FieldSpec::File { name, path } => FormField::File {
                name: name.clone(),
                file_name: file_name(path),
                content: tokio::fs::read(path).await?,
                mime: guess_mime(path).map(str::to_string),
            },
        };
        form.fields.push(field);
    }
    Ok(form)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        _ => None,
    }
}
