// Interactive menu loop wiring the store and the text capture together

use crate::capture::{CancelToken, capture_text};
use crate::models::Task;
use crate::store::Store;
use colored::Colorize;
use eyre::Result;
use std::io::{self, BufRead, Write};
use tracing::error;

const MENU_MIN: i64 = 0;
const MENU_MAX: i64 = 5;

/// Run the menu loop until the user picks Exit or stdin closes.
///
/// Every recoverable failure becomes a one-line message shown atop the
/// next menu render, then cleared. Only store initialization is fatal,
/// and that happens before this loop starts.
pub fn run(store: &mut Store) -> Result<()> {
    let mut message = String::new();

    loop {
        clear_console();

        if !message.is_empty() {
            println!("{}\n", message.yellow());
            message.clear();
        }

        print_menu();
        print!("> ");
        io::stdout().flush()?;

        let line = match read_line(&mut io::stdin().lock())? {
            Some(line) => line,
            None => break, // stdin closed
        };

        let selection = match parse_selection(&line) {
            Some(selection) => selection,
            None => {
                message = "Please, enter a valid option.".to_string();
                continue;
            }
        };

        if selection == 0 {
            break;
        }

        clear_console();
        message = dispatch(store, selection)?;
    }

    clear_console();
    Ok(())
}

fn dispatch(store: &mut Store, selection: i64) -> Result<String> {
    let msg = match selection {
        1 => {
            let content = capture_note_content("Type your note.")?;
            create_note(store, &content)
        }
        2 => match read_note_id("Id of the note to edit: ")? {
            Some(id) => match store.exists(id) {
                Ok(true) => {
                    let content = capture_note_content("Type the new content.")?;
                    edit_note(store, id, &content)
                }
                Ok(false) => format!("Note {} was not found.", id),
                Err(err) => {
                    error!(id, %err, "Failed to look up note");
                    "Could not read the note.".to_string()
                }
            },
            None => "Please, enter a valid note id.".to_string(),
        },
        3 => match read_note_id("Id of the note to delete: ")? {
            Some(id) => delete_note(store, id),
            None => "Please, enter a valid note id.".to_string(),
        },
        4 => match read_note_id("Id of the note to read: ")? {
            Some(id) => match store.get(id) {
                Ok(Some(task)) => {
                    println!("{}", render_task(&task));
                    prompt_and_wait()?;
                    String::new()
                }
                Ok(None) => format!("Note {} was not found.", id),
                Err(err) => {
                    error!(id, %err, "Failed to read note");
                    "Could not read the note.".to_string()
                }
            },
            None => "Please, enter a valid note id.".to_string(),
        },
        5 => match store.list() {
            Ok(tasks) if tasks.is_empty() => "No notes were found.".to_string(),
            Ok(tasks) => {
                println!("{}", render_all(&tasks));
                prompt_and_wait()?;
                String::new()
            }
            Err(err) => {
                error!(%err, "Failed to list notes");
                "Could not read the notes.".to_string()
            }
        },
        _ => "Please, enter a valid option.".to_string(),
    };

    Ok(msg)
}

/// Persist freshly captured content. Blank input aborts the operation
/// without touching the store.
pub(crate) fn create_note(store: &mut Store, content: &str) -> String {
    if content.trim().is_empty() {
        return "No content provided, nothing was saved.".to_string();
    }

    match store.insert(content) {
        Ok(id) => format!("Note {} created.", id),
        Err(err) => {
            error!(%err, "Failed to create note");
            "Could not save the note.".to_string()
        }
    }
}

pub(crate) fn edit_note(store: &mut Store, id: i64, content: &str) -> String {
    if content.trim().is_empty() {
        return "No content provided, the note was left unchanged.".to_string();
    }

    match store.update(id, content) {
        Ok(true) => format!("Note {} updated.", id),
        Ok(false) => format!("Note {} was not found.", id),
        Err(err) => {
            error!(id, %err, "Failed to update note");
            "Could not update the note.".to_string()
        }
    }
}

pub(crate) fn delete_note(store: &mut Store, id: i64) -> String {
    match store.delete(id) {
        Ok(true) => format!("Note {} deleted.", id),
        Ok(false) => format!("Note {} was not found.", id),
        Err(err) => {
            error!(id, %err, "Failed to delete note");
            "Could not delete the note.".to_string()
        }
    }
}

/// Parse a menu selection, `None` when unparsable or out of range.
pub(crate) fn parse_selection(line: &str) -> Option<i64> {
    let selection: i64 = line.trim().parse().ok()?;
    (MENU_MIN..=MENU_MAX).contains(&selection).then_some(selection)
}

pub(crate) fn render_task(task: &Task) -> String {
    format!(
        "--- Note {} ({}) ---\n{}",
        task.id,
        task.created_at_display(),
        task.content
    )
}

pub(crate) fn render_all(tasks: &[Task]) -> String {
    let rule = "=".repeat(20);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    for task in tasks {
        out.push_str(&render_task(task));
        out.push('\n');
    }
    out.push_str(&rule);

    out
}

fn print_menu() {
    println!("{}", "Welcome to tasknote!".bold());
    println!("Select one of the options below:");
    println!("1. Create a new note.");
    println!("2. Edit a note.");
    println!("3. Delete a note.");
    println!("4. Read a specific note.");
    println!("5. Read all notes.");
    println!("0. Exit.");
}

fn capture_note_content(header: &str) -> Result<String> {
    println!("{} Press Ctrl+Z to finish.", header);

    let token = CancelToken::for_suspend_signal();
    Ok(capture_text(io::stdin().lock(), &token))
}

fn read_note_id(prompt: &str) -> Result<Option<i64>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let line = match read_line(&mut io::stdin().lock())? {
        Some(line) => line,
        None => return Ok(None),
    };

    Ok(line.trim().parse().ok())
}

fn prompt_and_wait() -> Result<()> {
    println!("Press Enter to continue.");
    read_line(&mut io::stdin().lock())?;
    Ok(())
}

/// `Ok(None)` means end-of-input.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 { Ok(None) } else { Ok(Some(line)) }
}

fn clear_console() {
    // ANSI clear-screen plus cursor home
    print!("\x1b[2J\x1b[H");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp_store() -> (TempDir, Store) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join("tasknote.db")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_parse_selection_in_range() {
        assert_eq!(parse_selection("0\n"), Some(0));
        assert_eq!(parse_selection(" 3 "), Some(3));
        assert_eq!(parse_selection("5"), Some(5));
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_selection("6"), None);
        assert_eq!(parse_selection("-1"), None);
        assert_eq!(parse_selection("abc"), None);
        assert_eq!(parse_selection(""), None);
    }

    #[test]
    fn test_create_note_persists_content() {
        let (_temp, mut store) = open_temp_store();

        let msg = create_note(&mut store, "Buy milk");
        assert!(msg.contains("created"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_create_note_rejects_blank_content() {
        let (_temp, mut store) = open_temp_store();

        let msg = create_note(&mut store, "   \n  ");
        assert!(msg.contains("nothing was saved"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_edit_note_reports_missing_id() {
        let (_temp, mut store) = open_temp_store();

        let msg = edit_note(&mut store, 99, "new content");
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_edit_note_replaces_content() {
        let (_temp, mut store) = open_temp_store();

        let id = store.insert("old").unwrap();
        let msg = edit_note(&mut store, id, "new");
        assert!(msg.contains("updated"));
        assert_eq!(store.get(id).unwrap().unwrap().content, "new");
    }

    #[test]
    fn test_delete_note_messages() {
        let (_temp, mut store) = open_temp_store();

        let id = store.insert("ephemeral").unwrap();
        assert!(delete_note(&mut store, id).contains("deleted"));
        assert!(delete_note(&mut store, id).contains("not found"));
    }

    #[test]
    fn test_render_all_frames_every_note() {
        let (_temp, mut store) = open_temp_store();

        store.insert("first").unwrap();
        store.insert("second").unwrap();

        let out = render_all(&store.list().unwrap());
        assert!(out.starts_with(&"=".repeat(20)));
        assert!(out.ends_with(&"=".repeat(20)));
        assert!(out.contains("--- Note 1"));
        assert!(out.contains("first"));
        assert!(out.contains("--- Note 2"));
        assert!(out.contains("second"));
    }
}
