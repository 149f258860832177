// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema parity between `migrations/` and `migrations_mysql/`.
//!
//! Both migration sets are applied to empty databases and each resulting
//! schema is read back into a backend-neutral [`Schema`]. Column types are
//! reduced to `integer` or `text`, which is all the Fleetdesk schema uses.
//! Unique constraints are compared by their columns because the two
//! backends name their indexes differently.

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::{
    Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection,
    sql_types::{BigInt, Text},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::collections::{BTreeMap, BTreeSet};

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

/// Diesel's own bookkeeping table, excluded from comparison.
const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: BTreeMap<String, Column>,
    primary_key: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique: BTreeSet<Vec<String>>,
}

#[derive(Debug, PartialEq, Eq)]
struct Column {
    kind: &'static str,
    nullable: bool,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    column: String,
    references: String,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct IndexColumnRow {
    #[diesel(sql_type = Text)]
    index_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    from_column: String,
    #[diesel(sql_type = Text)]
    to_table: String,
    #[diesel(sql_type = Text)]
    to_column: String,
}

impl From<ForeignKeyRow> for ForeignKey {
    fn from(row: ForeignKeyRow) -> Self {
        Self {
            column: row.from_column,
            references: format!("{}.{}", row.to_table, row.to_column),
        }
    }
}

/// Reduces a backend type name to `integer` or `text`.
fn normalize_type(raw: &str) -> &'static str {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("int") {
        "integer"
    } else if lower.contains("char") || lower.contains("text") {
        "text"
    } else {
        "other"
    }
}

/// Groups `(index, column)` rows into one column list per index.
fn unique_sets(rows: Vec<IndexColumnRow>) -> BTreeSet<Vec<String>> {
    let mut by_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        by_index.entry(row.index_name).or_default().push(row.column_name);
    }
    by_index.into_values().collect()
}

// ------------------------------------------------------------------------
// SQLite
// ------------------------------------------------------------------------

#[derive(QueryableByName)]
struct SqliteColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    column_type: String,
    #[diesel(sql_type = BigInt)]
    not_null: i64,
    #[diesel(sql_type = BigInt)]
    pk: i64,
}

/// Applies `migrations/` to an in-memory `SQLite` database and reads the
/// schema back.
pub fn migrated_sqlite_schema() -> Result<Schema> {
    let mut conn =
        SqliteConnection::establish(":memory:").wrap_err("Failed to open SQLite database")?;
    conn.run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    tracing::info!("SQLite migrations applied");

    let tables: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != ?",
    )
    .bind::<Text, _>(MIGRATIONS_TABLE)
    .load(&mut conn)?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in tables {
        let mut table = Table::default();

        let columns: Vec<SqliteColumnRow> = diesel::sql_query(
            "SELECT name, type AS column_type, \"notnull\" AS not_null, pk \
             FROM pragma_table_info(?)",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        for column in columns {
            // INTEGER PRIMARY KEY reports notnull = 0 but can never be NULL.
            let is_pk = column.pk > 0;
            if is_pk {
                table.primary_key.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                Column {
                    kind: normalize_type(&column.column_type),
                    nullable: column.not_null == 0 && !is_pk,
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(
            "SELECT \"from\" AS from_column, \"table\" AS to_table, \"to\" AS to_column \
             FROM pragma_foreign_key_list(?)",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        table.foreign_keys = foreign_keys.into_iter().map(ForeignKey::from).collect();

        let unique: Vec<IndexColumnRow> = diesel::sql_query(
            "SELECT il.name AS index_name, ii.name AS column_name \
             FROM pragma_index_list(?) AS il, pragma_index_info(il.name) AS ii \
             WHERE il.\"unique\" = 1 AND il.origin != 'pk' \
             ORDER BY il.name, ii.seqno",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        table.unique = unique_sets(unique);

        schema.tables.insert(table_name, table);
    }
    Ok(schema)
}

// ------------------------------------------------------------------------
// MySQL / MariaDB
// ------------------------------------------------------------------------

#[derive(QueryableByName)]
struct MysqlColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    column_type: String,
    #[diesel(sql_type = Text)]
    nullable: String,
    #[diesel(sql_type = Text)]
    column_key: String,
}

/// Applies `migrations_mysql/` to the database at `url` and reads the
/// schema back.
pub fn migrated_mysql_schema(url: &str) -> Result<Schema> {
    let mut conn = MysqlConnection::establish(url).wrap_err("Failed to connect to MariaDB")?;
    conn.run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;
    tracing::info!("MySQL migrations applied");

    let tables: Vec<NameRow> = diesel::sql_query(
        "SELECT table_name AS name FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_name != ?",
    )
    .bind::<Text, _>(MIGRATIONS_TABLE)
    .load(&mut conn)?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in tables {
        let mut table = Table::default();

        let columns: Vec<MysqlColumnRow> = diesel::sql_query(
            "SELECT column_name AS name, data_type AS column_type, \
                    is_nullable AS nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND table_name = ?",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        for column in columns {
            if column.column_key == "PRI" {
                table.primary_key.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                Column {
                    kind: normalize_type(&column.column_type),
                    nullable: column.nullable == "YES",
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(
            "SELECT column_name AS from_column, referenced_table_name AS to_table, \
                    referenced_column_name AS to_column \
             FROM information_schema.key_column_usage \
             WHERE table_schema = DATABASE() AND table_name = ? \
               AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        table.foreign_keys = foreign_keys.into_iter().map(ForeignKey::from).collect();

        let unique: Vec<IndexColumnRow> = diesel::sql_query(
            "SELECT index_name, column_name FROM information_schema.statistics \
             WHERE table_schema = DATABASE() AND table_name = ? \
               AND non_unique = 0 AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(table_name.as_str())
        .load(&mut conn)?;
        table.unique = unique_sets(unique);

        schema.tables.insert(table_name, table);
    }
    Ok(schema)
}

// ------------------------------------------------------------------------
// Comparison
// ------------------------------------------------------------------------

/// Fails with every difference found, not just the first.
pub fn compare(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let mut problems = Vec::new();

    for name in sqlite.tables.keys() {
        if !mysql.tables.contains_key(name) {
            problems.push(format!("table `{name}` exists only in SQLite"));
        }
    }
    for name in mysql.tables.keys() {
        if !sqlite.tables.contains_key(name) {
            problems.push(format!("table `{name}` exists only in MySQL"));
        }
    }

    for (name, lite) in &sqlite.tables {
        let Some(my) = mysql.tables.get(name) else {
            continue;
        };
        compare_table(name, lite, my, &mut problems);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        for problem in &problems {
            tracing::error!("{problem}");
        }
        Err(eyre!(
            "Schema parity check failed with {} difference(s)",
            problems.len()
        ))
    }
}

fn compare_table(name: &str, lite: &Table, my: &Table, problems: &mut Vec<String>) {
    for (column, lite_col) in &lite.columns {
        match my.columns.get(column) {
            None => problems.push(format!("`{name}.{column}` exists only in SQLite")),
            Some(my_col) if my_col != lite_col => problems.push(format!(
                "`{name}.{column}` differs: SQLite {lite_col:?}, MySQL {my_col:?}"
            )),
            Some(_) => {}
        }
    }
    for column in my.columns.keys() {
        if !lite.columns.contains_key(column) {
            problems.push(format!("`{name}.{column}` exists only in MySQL"));
        }
    }
    if lite.primary_key != my.primary_key {
        problems.push(format!(
            "`{name}` primary key differs: SQLite {:?}, MySQL {:?}",
            lite.primary_key, my.primary_key
        ));
    }
    if lite.foreign_keys != my.foreign_keys {
        problems.push(format!(
            "`{name}` foreign keys differ: SQLite {:?}, MySQL {:?}",
            lite.foreign_keys, my.foreign_keys
        ));
    }
    if lite.unique != my.unique {
        problems.push(format!(
            "`{name}` unique constraints differ: SQLite {:?}, MySQL {:?}",
            lite.unique, my.unique
        ));
    }
}
