use sqlx::SqlitePool;

use crate::bot::state::def::BotResult;

pub const TAGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS tags (
        guild_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        content TEXT NOT NULL,
        author_id INTEGER NOT NULL,
        PRIMARY KEY (guild_id, name)
    );
";

// Direct messages have no guild, they share this key.
const NO_GUILD: i64 = 0;

fn guild_key(guild_id: Option<u64>) -> i64 {
    guild_id.map(|g| g as i64).unwrap_or(NO_GUILD)
}

pub async fn save_tag(pool: &SqlitePool, guild_id: Option<u64>, name: &str, content: &str, author_id: u64) -> BotResult<()> {
    sqlx::query(
        "INSERT INTO tags (guild_id, name, content, author_id)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT (guild_id, name)
        DO UPDATE SET content = excluded.content, author_id = excluded.author_id",
    )
    .bind(guild_key(guild_id))
    .bind(name.to_lowercase())
    .bind(content)
    .bind(author_id as i64)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_tag(pool: &SqlitePool, guild_id: Option<u64>, name: &str) -> BotResult<Option<String>> {
    let content = sqlx::query_scalar::<_, String>("SELECT content FROM tags WHERE guild_id = ?1 AND name = ?2")
        .bind(guild_key(guild_id))
        .bind(name.to_lowercase())
        .fetch_optional(pool)
        .await?;

    Ok(content)
}
