use std::time::Duration;

use diesel::mysql::MysqlConnection;
use diesel::r2d2::{self, ConnectionManager, PoolError};
use diesel_migrations::RunMigrationsError;

pub(crate) type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;

const DB_POOL_CONNECTION_TIMEOUT_SECONDS: u64 = 5;

// Bakes migrations/ into the binary, so a deployed build carries its own schema history.
embed_migrations!();

pub(crate) fn create_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<MysqlConnection>::new(database_url);
    r2d2::Pool::builder()
        .connection_timeout(Duration::from_secs(DB_POOL_CONNECTION_TIMEOUT_SECONDS))
        .build(manager)
}

/// Applies every revision not yet recorded in `__diesel_schema_migrations`, in order.
///
/// Revisions that were already applied are skipped, so calling this on an up to
/// date schema changes nothing.
pub(crate) fn run_migrations(conn: &MysqlConnection) -> Result<(), RunMigrationsError> {
    let mut output = Vec::new();
    embedded_migrations::run_with_output(conn, &mut output)?;

    let output = String::from_utf8_lossy(&output);
    if output.trim().is_empty() {
        log::info!("database schema is up to date");
    }
    for line in output.lines() {
        log::info!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::units::Quantity;

    const ADD_NUTRIENTS_UP: &str = include_str!("../migrations/0007_add_foodlog_nutrients/up.sql");
    const ALTER_QUANTITY_UP: &str = include_str!("../migrations/0008_alter_foodlog_quantity/up.sql");
    const ALTER_QUANTITY_DOWN: &str =
        include_str!("../migrations/0008_alter_foodlog_quantity/down.sql");

    fn checked_tokens(sql: &str) -> Vec<String> {
        let start = sql.find("IN (").expect("check constraint lists its values") + "IN (".len();
        let end = start + sql[start..].find(')').unwrap();
        sql[start..end]
            .split(',')
            .map(|token| token.trim().trim_matches('\'').to_string())
            .collect()
    }

    #[test]
    fn check_constraint_lists_every_unit() {
        let expected: Vec<String> = Quantity::ALL
            .iter()
            .map(|unit| unit.token().to_string())
            .collect();
        assert_eq!(checked_tokens(ALTER_QUANTITY_UP), expected);
    }

    #[test]
    fn quantity_column_stays_fifty_wide() {
        assert!(ALTER_QUANTITY_UP.contains("MODIFY COLUMN quantity VARCHAR(50) NOT NULL"));
        assert!(ALTER_QUANTITY_UP.contains("ADD CONSTRAINT foodlog_quantity_check"));
    }

    #[test]
    fn nutrient_columns_are_added_before_the_quantity_check() {
        for column in [
            "calcium", "calories", "carbs", "fat", "fiber", "protein", "sodium", "sugar",
        ] {
            let added = format!("ADD COLUMN {} DOUBLE NULL", column);
            assert!(ADD_NUTRIENTS_UP.contains(&added), "missing {}", added);
        }

        let mut revisions: Vec<String> = std::fs::read_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        revisions.sort();
        let position = |name: &str| revisions.iter().position(|r| r == name).unwrap();
        assert_eq!(
            position("0007_add_foodlog_nutrients") + 1,
            position("0008_alter_foodlog_quantity")
        );
    }

    #[test]
    fn down_drops_only_the_check() {
        assert_eq!(
            ALTER_QUANTITY_DOWN.trim(),
            "ALTER TABLE foodlog DROP CHECK foodlog_quantity_check;"
        );
    }
}
