use log::warn;
use rusqlite::Connection;

/// Explicit transaction boundaries over one connection.
///
/// The import pipeline opens, commits and reopens transactions as it goes;
/// this keeps those steps visible at the call site. Dropping a unit of work
/// with a transaction still open rolls it back.
pub struct UnitOfWork<'c> {
    conn: &'c Connection,
}

impl<'c> UnitOfWork<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    pub fn is_open(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Starts a transaction unless one is already open.
    pub fn begin(&mut self) -> rusqlite::Result<()> {
        if self.is_open() {
            return Ok(());
        }
        self.conn.execute_batch("BEGIN")
    }

    pub fn commit(&mut self) -> rusqlite::Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        self.conn.execute_batch("COMMIT")
    }

    pub fn rollback(&mut self) -> rusqlite::Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")
    }

    /// Commits what has been written so far and opens a new transaction.
    pub fn checkpoint(&mut self) -> rusqlite::Result<()> {
        self.commit()?;
        self.begin()
    }

    /// Runs `work` inside a savepoint: its writes are kept only if it succeeds.
    pub fn savepoint<T, E>(
        &mut self,
        name: &str,
        work: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        self.conn.execute_batch(&format!("SAVEPOINT {name}"))?;
        match work(self.conn) {
            Ok(value) => {
                self.conn.execute_batch(&format!("RELEASE {name}"))?;
                Ok(value)
            }
            Err(err) => {
                // The savepoint is gone when `work` aborted the whole
                // transaction; the caller still needs the original error.
                if let Err(rollback_err) = self
                    .conn
                    .execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))
                {
                    warn!("Could not roll back to savepoint {}: {}", name, rollback_err);
                }
                Err(err)
            }
        }
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(err) = self.conn.execute_batch("ROLLBACK") {
                warn!("Rollback on drop failed: {}", err);
            }
        }
    }
}
