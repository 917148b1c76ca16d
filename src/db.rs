use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::parser::extract::{ExtractMode, ExtractedData};

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS recipes (
            id           INTEGER PRIMARY KEY,
            url          TEXT UNIQUE NOT NULL,
            mode         TEXT NOT NULL CHECK(mode IN ('recipe','news')),
            title        TEXT NOT NULL,
            description  TEXT,
            content      TEXT,
            image        TEXT NOT NULL DEFAULT '',
            author       TEXT NOT NULL DEFAULT '',
            category     TEXT NOT NULL,
            cooking_time TEXT,
            servings     INTEGER,
            ingredients  TEXT,
            instructions TEXT,
            imported_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);

        CREATE TABLE IF NOT EXISTS import_failures (
            id         INTEGER PRIMARY KEY,
            url        TEXT NOT NULL,
            error      TEXT NOT NULL,
            failed_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Writes ──

/// Insert or refresh the record for `url`. Returns its row id.
pub fn save_recipe(
    conn: &Connection,
    url: &str,
    mode: ExtractMode,
    data: &ExtractedData,
) -> Result<i64> {
    let imported_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO recipes (url, mode, title, description, content, image, author, category,
                              cooking_time, servings, ingredients, instructions, imported_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(url) DO UPDATE SET
            mode = excluded.mode, title = excluded.title, description = excluded.description,
            content = excluded.content, image = excluded.image, author = excluded.author,
            category = excluded.category, cooking_time = excluded.cooking_time,
            servings = excluded.servings, ingredients = excluded.ingredients,
            instructions = excluded.instructions, imported_at = excluded.imported_at",
        params![
            url,
            mode.as_str(),
            data.title,
            data.description,
            data.content,
            data.image,
            data.author,
            data.category,
            data.cooking_time,
            data.servings,
            data.ingredients,
            data.instructions,
            imported_at,
        ],
    )?;
    let id = conn.query_row("SELECT id FROM recipes WHERE url = ?1", [url], |row| {
        row.get(0)
    })?;
    Ok(id)
}

pub fn log_failure(conn: &Connection, url: &str, error: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO import_failures (url, error) VALUES (?1, ?2)",
        params![url, error],
    )?;
    Ok(())
}

// ── Reads ──

pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub mode: String,
    pub cooking_time: Option<String>,
    pub servings: Option<u32>,
    pub url: String,
}

pub fn list_recipes(
    conn: &Connection,
    category: Option<&str>,
    limit: usize,
) -> Result<Vec<RecipeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, category, mode, cooking_time, servings, url
         FROM recipes
         WHERE (?1 IS NULL OR category = ?1)
         ORDER BY id DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![category, limit as i64], |row| {
            Ok(RecipeRow {
                id: row.get(0)?,
                title: row.get(1)?,
                category: row.get(2)?,
                mode: row.get(3)?,
                cooking_time: row.get(4)?,
                servings: row.get(5)?,
                url: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct StoredRecipe {
    pub id: i64,
    pub url: String,
    pub data: ExtractedData,
}

/// Load full records by id, in the order the ids were given. Unknown ids are skipped.
pub fn fetch_recipes(conn: &Connection, ids: &[i64]) -> Result<Vec<StoredRecipe>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, title, description, content, image, author, category,
                cooking_time, servings, ingredients, instructions
         FROM recipes WHERE id = ?1",
    )?;
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let found = stmt
            .query_row([id], |row| {
                Ok(StoredRecipe {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    data: ExtractedData {
                        title: row.get(2)?,
                        description: row.get(3)?,
                        content: row.get(4)?,
                        image: row.get(5)?,
                        author: row.get(6)?,
                        category: row.get(7)?,
                        cooking_time: row.get(8)?,
                        servings: row.get(9)?,
                        ingredients: row.get(10)?,
                        instructions: row.get(11)?,
                    },
                })
            })
            .optional()?;
        if let Some(r) = found {
            out.push(r);
        }
    }
    Ok(out)
}

pub struct Stats {
    pub total: i64,
    pub recipes: i64,
    pub news: i64,
    pub failures: i64,
    pub categories: Vec<(String, i64)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };

    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) FROM recipes GROUP BY category ORDER BY COUNT(*) DESC, category",
    )?;
    let categories = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stats {
        total: count("SELECT COUNT(*) FROM recipes")?,
        recipes: count("SELECT COUNT(*) FROM recipes WHERE mode = 'recipe'")?,
        news: count("SELECT COUNT(*) FROM recipes WHERE mode = 'news'")?,
        failures: count("SELECT COUNT(*) FROM import_failures")?,
        categories,
    })
}
