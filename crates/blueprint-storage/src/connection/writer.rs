//! Write transactions: BEGIN IMMEDIATE, rollback on drop.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use blueprint_core::errors::BlueprintResult;

use crate::to_storage_err;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
///
/// The write lock is taken at transaction start, so eligibility queries run
/// inside `f` see a state no concurrent writer can change before commit.
/// If `f` returns an error the transaction is rolled back when dropped.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> BlueprintResult<T>
where
    F: FnOnce(&Transaction<'_>) -> BlueprintResult<T>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("failed to begin immediate transaction: {e}")))?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("failed to commit: {e}")))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::errors::BlueprintError;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL);").unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn commits_on_success() {
        let conn = setup();
        with_immediate_transaction(&conn, |tx| {
            tx.execute("INSERT INTO t (v) VALUES (1)", [])
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&conn), 1);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn rolls_back_every_statement_on_error() {
        let conn = setup();
        let result: BlueprintResult<()> = with_immediate_transaction(&conn, |tx| {
            tx.execute("INSERT INTO t (v) VALUES (1)", [])
                .map_err(|e| to_storage_err(e.to_string()))?;
            tx.execute("INSERT INTO missing (v) VALUES (2)", [])
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        });
        assert!(matches!(result, Err(BlueprintError::Storage(_))));
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit(), "transaction must be closed after rollback");
    }
}
