// subtreerestore/src/restore/node_id.rs
use sqlx::PgConnection;

use crate::errors::Result;

/// Swaps the identifier of the live tree row `from_id` to `to_id`, rewriting
/// the row's own path string and repointing every `main_node_id` reference.
///
/// Caller guarantees `to_id` is free (or is the id being vacated), so node
/// ids stay unique. Descendant path strings are NOT rewritten: this is only
/// safe for freshly restored nodes, whose descendants are restored by the
/// same depth-ordered pass and get their paths from their own trash records.
pub(crate) async fn change_node_id(
    conn: &mut PgConnection,
    from_id: i64,
    to_id: i64,
) -> Result<()> {
    if from_id == to_id {
        return Ok(());
    }

    let path_string: Option<String> =
        sqlx::query_scalar("SELECT path_string FROM content_tree WHERE node_id = $1")
            .bind(from_id)
            .fetch_optional(&mut *conn)
            .await?;
    let Some(path_string) = path_string else {
        eprintln!("⚠️ No live node {} to renumber, skipping", from_id);
        return Ok(());
    };

    let new_path = replace_path_segment(&path_string, from_id, to_id);
    sqlx::query("UPDATE content_tree SET node_id = $1, path_string = $2 WHERE node_id = $3")
        .bind(to_id)
        .bind(&new_path)
        .bind(from_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE content_tree SET main_node_id = $1 WHERE main_node_id = $2")
        .bind(to_id)
        .bind(from_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Replaces the exact `/{from_id}/` segment of `path_string` with
/// `/{to_id}/`. The surrounding slashes are part of the match, so renaming
/// id 12 can never corrupt a `/120/` segment elsewhere in the path. A node
/// id occurs at most once on any root-to-node chain.
pub(crate) fn replace_path_segment(path_string: &str, from_id: i64, to_id: i64) -> String {
    path_string.replace(&format!("/{}/", from_id), &format!("/{}/", to_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_only_the_exact_segment() {
        assert_eq!(replace_path_segment("/1/12/", 12, 99), "/1/99/");
        assert_eq!(replace_path_segment("/1/120/12/", 12, 99), "/1/120/99/");
        assert_eq!(replace_path_segment("/1/112/12/", 12, 99), "/1/112/99/");
    }

    #[test]
    fn test_numeric_substrings_are_left_alone() {
        assert_eq!(replace_path_segment("/1/120/", 12, 99), "/1/120/");
        assert_eq!(replace_path_segment("/1/512/", 12, 99), "/1/512/");
    }

    #[test]
    fn test_absent_segment_leaves_path_unchanged() {
        assert_eq!(replace_path_segment("/1/2/3/", 12, 99), "/1/2/3/");
    }
}
