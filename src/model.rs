//! Generic record-mapping layer.
//!
//! [`Model`] binds a table name and primary-key column and composes the
//! statement builder into the usual row operations. The session handle is
//! passed explicitly to every call; models hold no connection state of
//! their own.

use crate::cond::{Cmp, Cond};
use crate::error::Result;
use crate::expr::Expr;
use crate::session::{Row, Session};
use crate::sql::{Limit, Sql};
use crate::value::Value;

/// A table binding: name plus primary-key column.
#[derive(Debug, Clone)]
pub struct Model {
    table: String,
    pk: String,
}

/// The outcome of [`Model::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    /// A row was inserted; carries the last insert id.
    Inserted(u64),
    /// An existing row was updated; carries the affected row count.
    Updated(u64),
}

impl Model {
    pub fn new(table: impl Into<String>, pk: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            pk: pk.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pk(&self) -> &str {
        &self.pk
    }

    /// `SELECT <expr> FROM <table>` starting point for custom queries.
    pub fn select_sql(&self, expr: impl Into<Expr>) -> Sql {
        let mut q = Sql::empty();
        q.select(expr).from(self.table.as_str());
        q
    }

    /// Fetch one row by primary key.
    pub fn get(
        &self,
        session: &mut Session,
        pk: impl Into<Value>,
        expr: impl Into<Expr>,
    ) -> Result<Option<Row>> {
        let pk: Value = pk.into();
        let mut q = self.select_sql(expr);
        q.where_(Cmp::eq(self.pk.as_str(), pk)).limit(1);
        Ok(session.execute(&q)?.into_rows().into_iter().next())
    }

    /// Fetch the first row matching a condition.
    pub fn one(
        &self,
        session: &mut Session,
        expr: impl Into<Expr>,
        cond: impl Into<Cond>,
    ) -> Result<Option<Row>> {
        let mut q = self.select_sql(expr);
        q.where_(cond).limit(1);
        Ok(session.execute(&q)?.into_rows().into_iter().next())
    }

    /// Fetch the row with the smallest primary key.
    pub fn first(&self, session: &mut Session, expr: impl Into<Expr>) -> Result<Option<Row>> {
        let mut q = self.select_sql(expr);
        q.order_by(self.pk.as_str()).limit(1);
        Ok(session.execute(&q)?.into_rows().into_iter().next())
    }

    /// Fetch the row with the largest primary key.
    pub fn last(&self, session: &mut Session, expr: impl Into<Expr>) -> Result<Option<Row>> {
        let mut q = self.select_sql(expr);
        q.order_by(format!("{} DESC", self.pk)).limit(1);
        Ok(session.execute(&q)?.into_rows().into_iter().next())
    }

    /// True when at least one row matches the condition.
    pub fn exists(&self, session: &mut Session, cond: impl Into<Cond>) -> Result<bool> {
        Ok(self.one(session, "1", cond)?.is_some())
    }

    /// Fetch all rows matching a condition, with optional ordering and limit.
    pub fn all(
        &self,
        session: &mut Session,
        expr: impl Into<Expr>,
        cond: impl Into<Cond>,
        order_by: impl Into<Expr>,
        limit: impl Into<Limit>,
    ) -> Result<Vec<Row>> {
        let mut q = self.select_sql(expr);
        q.where_(cond).order_by(order_by).limit(limit);
        Ok(session.execute(&q)?.into_rows())
    }

    /// Count rows matching a condition.
    pub fn count(&self, session: &mut Session, cond: impl Into<Cond>) -> Result<u64> {
        let mut q = self.select_sql("COUNT(*)");
        q.where_(cond);
        let result = session.execute(&q)?;
        Ok(result
            .fetch_one()
            .and_then(|row| row.values().next())
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Insert a row; returns the last insert id.
    pub fn add<K, V>(
        &self,
        session: &mut Session,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs: Vec<(String, Value)> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut q = Sql::empty();
        q.insert(&self.table).set(pairs);
        Ok(session.execute(&q)?.last_insert_id.unwrap_or(0))
    }

    /// Update matching rows; returns the affected row count.
    pub fn update<K, V>(
        &self,
        session: &mut Session,
        fields: impl IntoIterator<Item = (K, V)>,
        cond: impl Into<Cond>,
    ) -> Result<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs: Vec<(String, Value)> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut q = Sql::empty();
        q.update(&self.table).set(pairs).where_(cond);
        Ok(session.execute(&q)?.row_count)
    }

    /// Delete matching rows; returns the affected row count.
    ///
    /// With [`Cond::Empty`] this deletes every row in the table.
    pub fn delete(&self, session: &mut Session, cond: impl Into<Cond>) -> Result<u64> {
        let mut q = Sql::empty();
        q.delete().from(self.table.as_str()).where_(cond);
        Ok(session.execute(&q)?.row_count)
    }

    /// Upsert: insert when the primary key is absent from `fields` or when
    /// `force_insert` is set, otherwise update the row with that key.
    pub fn save<K, V>(
        &self,
        session: &mut Session,
        fields: impl IntoIterator<Item = (K, V)>,
        force_insert: bool,
    ) -> Result<Saved>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs: Vec<(String, Value)> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let pk_value = pairs
            .iter()
            .find(|(k, _)| *k == self.pk)
            .map(|(_, v)| v.clone());

        match pk_value {
            Some(pk) if !force_insert => {
                let affected = self.update(session, pairs, Cmp::eq(self.pk.as_str(), pk))?;
                Ok(Saved::Updated(affected))
            }
            _ => {
                let id = self.add(session, pairs)?;
                Ok(Saved::Inserted(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::{Driver, ExecResult};

    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(String, Vec<Value>)>>>;

    /// A driver that records executed statements and replays canned results.
    struct FakeDriver {
        log: Log,
        results: Vec<ExecResult>,
    }

    impl Driver for FakeDriver {
        fn execute(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
            self.log.borrow_mut().push((sql.to_string(), args.to_vec()));
            if self.results.is_empty() {
                Ok(ExecResult::default())
            } else {
                Ok(self.results.remove(0))
            }
        }

        fn commit(&mut self) -> Result<()> {
            Ok(())
        }

        fn rollback(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn session_with(results: Vec<ExecResult>) -> (Session, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let session = Session::new(FakeDriver {
            log: Rc::clone(&log),
            results,
        });
        (session, log)
    }

    fn song_model() -> Model {
        Model::new("song", "id")
    }

    #[test]
    fn select_sql_builds_projection() {
        let m = song_model();
        assert_eq!(m.select_sql("id").as_str(), "SELECT id FROM song");
        assert_eq!(
            m.select_sql(["id", "name"]).as_str(),
            "SELECT id, name FROM song"
        );
    }

    #[test]
    fn get_queries_by_primary_key() {
        let expected = row(&[("id", Value::Int(1)), ("name", Value::from("secret"))]);
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            last_insert_id: None,
            rows: vec![expected.clone()],
        }]);

        let found = song_model().get(&mut session, 1, "*").unwrap();
        assert_eq!(found, Some(expected));

        let executed = log.borrow();
        assert_eq!(
            executed[0].0,
            "SELECT * FROM song WHERE (id = %s) LIMIT 1"
        );
        assert_eq!(executed[0].1, vec![Value::Int(1)]);
    }

    #[test]
    fn get_returns_none_on_miss() {
        let (mut session, _log) = session_with(vec![ExecResult::default()]);
        let found = song_model().get(&mut session, 0, "*").unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn one_limits_to_single_row() {
        let (mut session, log) = session_with(vec![ExecResult::default()]);
        song_model()
            .one(&mut session, ["id", "name"], Cmp::eq("id", 1))
            .unwrap();
        assert_eq!(
            log.borrow()[0].0,
            "SELECT id, name FROM song WHERE (id = %s) LIMIT 1"
        );
    }

    #[test]
    fn first_and_last_order_by_pk() {
        let (mut session, log) = session_with(vec![ExecResult::default(), ExecResult::default()]);
        let m = song_model();
        m.first(&mut session, "*").unwrap();
        m.last(&mut session, "*").unwrap();

        let executed = log.borrow();
        assert_eq!(executed[0].0, "SELECT * FROM song ORDER BY id LIMIT 1");
        assert_eq!(executed[1].0, "SELECT * FROM song ORDER BY id DESC LIMIT 1");
    }

    #[test]
    fn all_composes_condition_order_and_limit() {
        let (mut session, log) = session_with(vec![ExecResult::default()]);
        song_model()
            .all(
                &mut session,
                ["id", "name"],
                Cmp::parse("id", "!=", 0).unwrap(),
                "id",
                (0, 2),
            )
            .unwrap();
        assert_eq!(
            log.borrow()[0].0,
            "SELECT id, name FROM song WHERE (id != %s) ORDER BY id LIMIT 0, 2"
        );
    }

    #[test]
    fn count_reads_first_column() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            last_insert_id: None,
            rows: vec![row(&[("COUNT(*)", Value::Int(3))])],
        }]);
        let n = song_model().count(&mut session, Cond::Empty).unwrap();
        assert_eq!(n, 3);
        assert_eq!(log.borrow()[0].0, "SELECT COUNT(*) FROM song");
    }

    #[test]
    fn add_returns_last_insert_id() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            last_insert_id: Some(7),
            rows: vec![],
        }]);
        let id = song_model()
            .add(&mut session, [("singer", "Jay Chou")])
            .unwrap();
        assert_eq!(id, 7);

        let executed = log.borrow();
        assert_eq!(executed[0].0, "INSERT INTO `song` SET `singer`=%s");
        assert_eq!(executed[0].1, vec![Value::from("Jay Chou")]);
    }

    #[test]
    fn update_returns_affected_rows() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            ..Default::default()
        }]);
        let affected = song_model()
            .update(&mut session, [("singer", "Mayday")], Cmp::eq("id", 3))
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            log.borrow()[0].0,
            "UPDATE `song` SET `singer`=%s WHERE (id = %s)"
        );
    }

    #[test]
    fn delete_without_condition_clears_table() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 5,
            ..Default::default()
        }]);
        let affected = song_model().delete(&mut session, Cond::Empty).unwrap();
        assert_eq!(affected, 5);
        assert_eq!(log.borrow()[0].0, "DELETE FROM song");
    }

    #[test]
    fn save_inserts_when_pk_absent() {
        let (mut session, _log) = session_with(vec![ExecResult {
            row_count: 1,
            last_insert_id: Some(5),
            rows: vec![],
        }]);
        let saved = song_model()
            .save(&mut session, [("singer", "Jay Chou")], false)
            .unwrap();
        assert_eq!(saved, Saved::Inserted(5));
    }

    #[test]
    fn save_updates_when_pk_present() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            ..Default::default()
        }]);
        let fields: Vec<(&str, Value)> = vec![
            ("id", Value::Int(5)),
            ("singer", Value::from("Mayday")),
            ("tag", Value::from("band")),
        ];
        let saved = song_model().save(&mut session, fields, false).unwrap();
        assert_eq!(saved, Saved::Updated(1));
        assert_eq!(
            log.borrow()[0].0,
            "UPDATE `song` SET `id`=%s, `singer`=%s, `tag`=%s WHERE (id = %s)"
        );
    }

    #[test]
    fn save_forced_insert_keeps_pk_column() {
        let (mut session, log) = session_with(vec![ExecResult {
            row_count: 1,
            last_insert_id: Some(9),
            rows: vec![],
        }]);
        let fields: Vec<(&str, Value)> = vec![("id", Value::Int(9)), ("singer", Value::from("X"))];
        let saved = song_model().save(&mut session, fields, true).unwrap();
        assert_eq!(saved, Saved::Inserted(9));
        assert_eq!(log.borrow()[0].0, "INSERT INTO `song` SET `id`=%s, `singer`=%s");
    }

    #[test]
    fn session_rejects_parity_violation() {
        let (mut session, log) = session_with(vec![]);
        let bad = Sql::with_args("SELECT * FROM song WHERE id = %s", vec![]);
        let err = session.execute(&bad).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn exists_reflects_match() {
        let (mut session, _log) = session_with(vec![
            ExecResult {
                row_count: 1,
                last_insert_id: None,
                rows: vec![row(&[("1", Value::Int(1))])],
            },
            ExecResult::default(),
        ]);
        let m = song_model();
        assert!(m.exists(&mut session, Cmp::eq("singer", "kuga")).unwrap());
        assert!(!m.exists(&mut session, "id=0").unwrap());
    }
}
