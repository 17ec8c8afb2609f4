use crate::directory::NameDirectory;

/// Shown in place of a mention when the author cell is blank.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Turn an author cell into something that pings them on Discord.
///
/// Blank → [`UNKNOWN_AUTHOR`]; a known name → `<@id>`; an unknown name is
/// passed through trimmed so the alert still says who it is about.
pub fn resolve_mention(author_name: &str, directory: &NameDirectory) -> String {
    let name = author_name.trim();
    if name.is_empty() {
        return UNKNOWN_AUTHOR.to_string();
    }
    match directory.get(name) {
        Some(id) => format!("<@{id}>"),
        None => name.to_string(),
    }
}
