//! Track catalog queries
//!
//! Resolves track IDs to metadata and evaluates smart playlist queries.

use crate::from_unix;
use setlist_core::{
    error::Result,
    types::{
        MatchMode, PlaylistStats, RuleField, RuleOperator, RuleValue, SmartQuery, SmartRule,
        SortDirection, Track, TrackId,
    },
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection};
use std::collections::HashMap;
use std::time::Duration;

/// Bound parameters per `IN (...)` lookup, well under SQLite's variable limit
const LOOKUP_CHUNK: usize = 500;

const TRACK_COLUMNS: &str =
    "SELECT id, title, artist, album, genre, year, duration_ms, created_at FROM tracks";

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        genre: row.get("genre"),
        year: row.get::<Option<i64>, _>("year").map(|y| y as i32),
        duration_ms: row.get::<i64, _>("duration_ms").max(0) as u64,
        created_at: from_unix(row.get("created_at"))?,
    })
}

/// Add a track to the catalog
pub async fn create(conn: &mut SqliteConnection, track: &Track) -> Result<()> {
    sqlx::query(
        "INSERT INTO tracks (id, title, artist, album, genre, year, duration_ms, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&track.id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.genre)
    .bind(track.year)
    .bind(track.duration_ms as i64)
    .bind(track.created_at.timestamp())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Remove a track from the catalog
///
/// Playlist entries that reference it are kept and simply stop resolving.
pub async fn delete(conn: &mut SqliteConnection, id: &TrackId) -> Result<()> {
    sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Resolve a set of track IDs
///
/// IDs missing from the catalog are absent from the returned map.
pub async fn get_by_ids(
    conn: &mut SqliteConnection,
    ids: &[TrackId],
) -> Result<HashMap<TrackId, Track>> {
    let mut found = HashMap::with_capacity(ids.len());

    for chunk in ids.chunks(LOOKUP_CHUNK) {
        let mut builder = QueryBuilder::<Sqlite>::new(TRACK_COLUMNS);
        builder.push(" WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        for row in builder.build().fetch_all(&mut *conn).await? {
            let track = track_from_row(&row)?;
            found.insert(track.id.clone(), track);
        }
    }

    Ok(found)
}

/// Evaluate a smart query against the current catalog
pub async fn evaluate(conn: &mut SqliteConnection, query: &SmartQuery) -> Result<Vec<Track>> {
    let mut builder = QueryBuilder::<Sqlite>::new("");
    push_smart_select(&mut builder, query);

    let rows = builder.build().fetch_all(&mut *conn).await?;
    rows.iter().map(track_from_row).collect()
}

/// Count and total length of a smart query's current result
pub async fn smart_stats(conn: &mut SqliteConnection, query: &SmartQuery) -> Result<PlaylistStats> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) AS song_count, COALESCE(SUM(duration_ms), 0) AS duration_ms FROM (",
    );
    push_smart_select(&mut builder, query);
    builder.push(")");

    let row = builder.build().fetch_one(&mut *conn).await?;
    Ok(PlaylistStats {
        song_count: row.get::<i64, _>("song_count") as u32,
        duration: Duration::from_millis(row.get::<i64, _>("duration_ms").max(0) as u64),
    })
}

fn push_smart_select(builder: &mut QueryBuilder<'_, Sqlite>, query: &SmartQuery) {
    builder.push(TRACK_COLUMNS);

    if !query.rules.is_empty() {
        let joiner = match query.match_mode {
            MatchMode::All => " AND ",
            MatchMode::Any => " OR ",
        };
        builder.push(" WHERE (");
        for (i, rule) in query.rules.iter().enumerate() {
            if i > 0 {
                builder.push(joiner);
            }
            push_rule(builder, rule);
        }
        builder.push(")");
    }

    builder.push(" ORDER BY ");
    if let Some(sort) = query.sort {
        builder.push(column(sort.field));
        builder.push(match sort.direction {
            SortDirection::Asc => " ASC, ",
            SortDirection::Desc => " DESC, ",
        });
    }
    builder.push("title COLLATE NOCASE, id");

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
    }
}

fn push_rule(builder: &mut QueryBuilder<'_, Sqlite>, rule: &SmartRule) {
    let column = column(rule.field);
    let nocase = if rule.field.is_numeric() {
        ""
    } else {
        " COLLATE NOCASE"
    };

    builder.push("(");
    builder.push(column);
    match rule.operator {
        RuleOperator::Is => {
            builder.push(" = ");
            push_value(builder, &rule.value);
            builder.push(nocase);
        }
        RuleOperator::IsNot => {
            builder.push(" <> ");
            push_value(builder, &rule.value);
            builder.push(nocase);
        }
        RuleOperator::Contains => {
            builder.push(" LIKE ");
            builder.push_bind(format!("%{}%", escape_like(&rule.value)));
            builder.push(" ESCAPE '\\'");
        }
        RuleOperator::NotContains => {
            builder.push(" NOT LIKE ");
            builder.push_bind(format!("%{}%", escape_like(&rule.value)));
            builder.push(" ESCAPE '\\'");
        }
        RuleOperator::StartsWith => {
            builder.push(" LIKE ");
            builder.push_bind(format!("{}%", escape_like(&rule.value)));
            builder.push(" ESCAPE '\\'");
        }
        RuleOperator::GreaterThan => {
            builder.push(" > ");
            push_value(builder, &rule.value);
        }
        RuleOperator::LessThan => {
            builder.push(" < ");
            push_value(builder, &rule.value);
        }
    }
    builder.push(")");
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &RuleValue) {
    match value {
        RuleValue::Number(n) => builder.push_bind(*n),
        RuleValue::Text(s) => builder.push_bind(s.clone()),
    };
}

/// SQL expression for a rule field; NULLs compare as empty / zero
fn column(field: RuleField) -> &'static str {
    match field {
        RuleField::Title => "title",
        RuleField::Artist => "COALESCE(artist, '')",
        RuleField::Album => "COALESCE(album, '')",
        RuleField::Genre => "COALESCE(genre, '')",
        RuleField::Year => "COALESCE(year, 0)",
        RuleField::Duration => "(duration_ms / 1000)",
    }
}

fn escape_like(value: &RuleValue) -> String {
    let raw = match value {
        RuleValue::Number(n) => n.to_string(),
        RuleValue::Text(s) => s.clone(),
    };
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
