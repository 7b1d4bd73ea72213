//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No business logic, no domain types — pure SQL.

pub mod artists;
pub mod artworks;
pub mod exhibitions;
pub mod events;
pub mod notices;
pub mod sync_runs;

/// Escape `ILIKE` metacharacters in user-supplied filter text so it only
/// matches literally.  Postgres treats `\` as the default escape character.
pub(crate) fn escape_like(q: &str) -> String {
    q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain text"), "plain text");
    }
}
