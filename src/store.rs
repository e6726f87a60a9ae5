// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user key/value repository. Each collection is kept as one JSON
//! array under `user:<id>:<collection>`.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::finance::{IncomeBasis, SplitRequest, calculate_shares};
use crate::models::{
    BudgetEntry, BudgetSheet, Investment, Share, ShareStatus, SplitExpense, Transaction,
};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Writes every pair or none of them.
    fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        (**self).set_many(pairs)
    }
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

const UPSERT: &str = "INSERT INTO kv(key, value) VALUES(?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')";

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(UPSERT, params![key, value])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }

    fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in pairs {
            tx.execute(UPSERT, params![key, value])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }

    fn set_many(&self, pairs: &[(String, String)]) -> StoreResult<()> {
        let mut values = self.values.borrow_mut();
        for (key, value) in pairs {
            values.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisSetting {
    #[default]
    Transactions,
    Stated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub currency: String,
    pub stated_income: Option<Decimal>,
    pub income_basis: BasisSetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            stated_income: None,
            income_basis: BasisSetting::Transactions,
        }
    }
}

impl Settings {
    /// The stated income only applies when it is both selected and set.
    pub fn income_basis(&self) -> IncomeBasis {
        match (self.income_basis, self.stated_income) {
            (BasisSetting::Stated, Some(income)) => IncomeBasis::Stated(income),
            _ => IncomeBasis::Transactions,
        }
    }
}

const TRANSACTIONS: &str = "transactions";
const INVESTMENTS: &str = "investments";
const SHEETS: &str = "budget_sheets";
const ENTRIES: &str = "budget_entries";
const SPLITS: &str = "splits";
const CATEGORIES: &str = "categories";
const SETTINGS: &str = "settings";

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn not_found(kind: &'static str, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

pub struct UserStore<S> {
    inner: S,
    user: String,
}

impl<S: KeyValueStore> UserStore<S> {
    pub fn new(inner: S, user: impl Into<String>) -> Self {
        Self {
            inner,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn key(&self, collection: &str) -> String {
        format!("user:{}:{}", self.user, collection)
    }

    fn load<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        match self.inner.get(&self.key(collection))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, collection: &str, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.inner.set(&self.key(collection), &raw)?;
        debug!(user = %self.user, collection, rows = items.len(), "collection saved");
        Ok(())
    }

    pub fn settings(&self) -> StoreResult<Settings> {
        match self.inner.get(&self.key(SETTINGS))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let raw = serde_json::to_string(settings)?;
        self.inner.set(&self.key(SETTINGS), &raw)
    }

    pub fn transactions(&self) -> StoreResult<Vec<Transaction>> {
        self.load(TRANSACTIONS)
    }

    /// Stores `tx` under a fresh id and returns the stored record.
    pub fn add_transaction(&self, mut tx: Transaction) -> StoreResult<Transaction> {
        let mut all = self.transactions()?;
        tx.id = next_id(all.iter().map(|t| t.id));
        all.push(tx.clone());
        self.save(TRANSACTIONS, &all)?;
        info!(user = %self.user, id = tx.id, kind = %tx.kind, "transaction added");
        Ok(tx)
    }

    /// Replaces the whole record with the same id.
    pub fn replace_transaction(&self, tx: Transaction) -> StoreResult<()> {
        let mut all = self.transactions()?;
        let slot = all
            .iter_mut()
            .find(|t| t.id == tx.id)
            .ok_or_else(|| not_found("Transaction", tx.id))?;
        *slot = tx;
        self.save(TRANSACTIONS, &all)
    }

    pub fn remove_transaction(&self, id: i64) -> StoreResult<()> {
        let mut all = self.transactions()?;
        let before = all.len();
        all.retain(|t| t.id != id);
        if all.len() == before {
            return Err(not_found("Transaction", id));
        }
        self.save(TRANSACTIONS, &all)?;
        info!(user = %self.user, id, "transaction removed");
        Ok(())
    }

    pub fn investments(&self) -> StoreResult<Vec<Investment>> {
        self.load(INVESTMENTS)
    }

    pub fn add_investment(&self, mut inv: Investment) -> StoreResult<Investment> {
        let mut all = self.investments()?;
        inv.id = next_id(all.iter().map(|i| i.id));
        all.push(inv.clone());
        self.save(INVESTMENTS, &all)?;
        info!(user = %self.user, id = inv.id, name = %inv.name, "investment added");
        Ok(inv)
    }

    pub fn remove_investment(&self, id: i64) -> StoreResult<()> {
        let mut all = self.investments()?;
        let before = all.len();
        all.retain(|i| i.id != id);
        if all.len() == before {
            return Err(not_found("Investment", id));
        }
        self.save(INVESTMENTS, &all)
    }

    pub fn budget_sheets(&self) -> StoreResult<Vec<BudgetSheet>> {
        self.load(SHEETS)
    }

    pub fn sheet_by_name(&self, name: &str) -> StoreResult<BudgetSheet> {
        self.budget_sheets()?
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| not_found("Budget sheet", name.trim()))
    }

    pub fn create_sheet(&self, name: &str) -> StoreResult<BudgetSheet> {
        let name = name.trim();
        let mut all = self.budget_sheets()?;
        if all.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(StoreError::Duplicate {
                kind: "Budget sheet",
                name: name.to_string(),
            });
        }
        let sheet = BudgetSheet {
            id: next_id(all.iter().map(|s| s.id)),
            name: name.to_string(),
        };
        all.push(sheet.clone());
        self.save(SHEETS, &all)?;
        info!(user = %self.user, id = sheet.id, name = %sheet.name, "budget sheet created");
        Ok(sheet)
    }

    /// Removes the sheet together with every entry it holds.
    pub fn remove_sheet(&self, id: i64) -> StoreResult<()> {
        let mut sheets = self.budget_sheets()?;
        let before = sheets.len();
        sheets.retain(|s| s.id != id);
        if sheets.len() == before {
            return Err(not_found("Budget sheet", id));
        }
        let mut entries: Vec<BudgetEntry> = self.load(ENTRIES)?;
        entries.retain(|e| e.sheet_id != id);
        self.inner.set_many(&[
            (self.key(ENTRIES), serde_json::to_string(&entries)?),
            (self.key(SHEETS), serde_json::to_string(&sheets)?),
        ])?;
        info!(user = %self.user, id, "budget sheet removed");
        Ok(())
    }

    pub fn budget_entries(&self, sheet_id: i64) -> StoreResult<Vec<BudgetEntry>> {
        let all: Vec<BudgetEntry> = self.load(ENTRIES)?;
        Ok(all.into_iter().filter(|e| e.sheet_id == sheet_id).collect())
    }

    pub fn add_entry(&self, mut entry: BudgetEntry) -> StoreResult<BudgetEntry> {
        if !self.budget_sheets()?.iter().any(|s| s.id == entry.sheet_id) {
            return Err(not_found("Budget sheet", entry.sheet_id));
        }
        let mut all: Vec<BudgetEntry> = self.load(ENTRIES)?;
        entry.id = next_id(all.iter().map(|e| e.id));
        all.push(entry.clone());
        self.save(ENTRIES, &all)?;
        Ok(entry)
    }

    pub fn remove_entry(&self, id: i64) -> StoreResult<()> {
        let mut all: Vec<BudgetEntry> = self.load(ENTRIES)?;
        let before = all.len();
        all.retain(|e| e.id != id);
        if all.len() == before {
            return Err(not_found("Budget entry", id));
        }
        self.save(ENTRIES, &all)
    }

    pub fn splits(&self) -> StoreResult<Vec<SplitExpense>> {
        self.load(SPLITS)
    }

    /// Creates a split owned by this store's user. Every share starts out
    /// pending.
    pub fn create_split(
        &self,
        description: &str,
        total: Decimal,
        members: &[String],
        request: &SplitRequest,
        created: NaiveDate,
    ) -> StoreResult<SplitExpense> {
        let shares = calculate_shares(total, members, request)?
            .into_iter()
            .map(|s| Share {
                user_id: s.user_id,
                amount: s.amount,
                status: ShareStatus::Pending,
            })
            .collect();
        let mut all = self.splits()?;
        let split = SplitExpense {
            id: next_id(all.iter().map(|s| s.id)),
            creator_id: self.user.clone(),
            description: description.trim().to_string(),
            total_amount: total,
            mode: request.mode(),
            shares,
            created,
        };
        all.push(split.clone());
        self.save(SPLITS, &all)?;
        info!(user = %self.user, id = split.id, mode = %split.mode, "split expense created");
        Ok(split)
    }

    pub fn settle_share(
        &self,
        split_id: i64,
        member: &str,
        status: ShareStatus,
    ) -> StoreResult<Share> {
        let mut all = self.splits()?;
        let split = all
            .iter_mut()
            .find(|s| s.id == split_id)
            .ok_or_else(|| not_found("Split expense", split_id))?;
        let share = split
            .shares
            .iter_mut()
            .find(|s| s.user_id == member)
            .ok_or_else(|| not_found("Share", format!("{}/{}", split_id, member)))?;
        share.status = share.status.transition(status)?;
        let settled = share.clone();
        self.save(SPLITS, &all)?;
        info!(user = %self.user, split_id, member, status = %settled.status, "share settled");
        Ok(settled)
    }

    pub fn categories(&self) -> StoreResult<Vec<String>> {
        self.load(CATEGORIES)
    }

    pub fn add_category(&self, name: &str) -> StoreResult<()> {
        let name = name.trim();
        let mut all = self.categories()?;
        if all.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            return Err(StoreError::Duplicate {
                kind: "Category",
                name: name.to_string(),
            });
        }
        all.push(name.to_string());
        all.sort_by_key(|c| c.to_lowercase());
        self.save(CATEGORIES, &all)
    }

    pub fn remove_category(&self, name: &str) -> StoreResult<()> {
        let mut all = self.categories()?;
        let before = all.len();
        all.retain(|c| !c.eq_ignore_ascii_case(name.trim()));
        if all.len() == before {
            return Err(not_found("Category", name.trim()));
        }
        self.save(CATEGORIES, &all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlowKind;

    fn store() -> UserStore<MemoryStore> {
        UserStore::new(MemoryStore::new(), "alice")
    }

    fn tx(amount: i64) -> Transaction {
        Transaction {
            id: 0,
            amount: Decimal::from(amount),
            description: "Coffee".into(),
            category: "Food".into(),
            kind: FlowKind::Expense,
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    #[test]
    fn ids_are_assigned_after_the_largest_existing() {
        let s = store();
        assert_eq!(s.add_transaction(tx(1)).unwrap().id, 1);
        assert_eq!(s.add_transaction(tx(2)).unwrap().id, 2);
        s.remove_transaction(1).unwrap();
        assert_eq!(s.add_transaction(tx(3)).unwrap().id, 3);
    }

    #[test]
    fn users_do_not_see_each_other() {
        let inner = MemoryStore::new();
        let alice = UserStore::new(&inner, "alice");
        alice.add_transaction(tx(5)).unwrap();
        let bob = UserStore::new(&inner, "bob");
        assert!(bob.transactions().unwrap().is_empty());
        assert_eq!(alice.transactions().unwrap().len(), 1);
    }

    #[test]
    fn replace_swaps_the_whole_record() {
        let s = store();
        let mut saved = s.add_transaction(tx(5)).unwrap();
        saved.amount = Decimal::from(9);
        saved.kind = FlowKind::Income;
        s.replace_transaction(saved.clone()).unwrap();
        assert_eq!(s.transactions().unwrap(), vec![saved]);
    }

    #[test]
    fn missing_rows_report_not_found() {
        let s = store();
        assert!(matches!(
            s.remove_transaction(42),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            s.remove_investment(1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn sqlite_set_many_is_all_or_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_b BEFORE INSERT ON kv WHEN NEW.key = 'b'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
        let kv = SqliteStore::new(&conn);
        let pairs = [
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        assert!(kv.set_many(&pairs).is_err());
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set_many(&pairs[..1]).unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn settings_default_to_transaction_income() {
        let s = store();
        let mut settings = s.settings().unwrap();
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.income_basis(), IncomeBasis::Transactions);

        settings.income_basis = BasisSetting::Stated;
        assert_eq!(settings.income_basis(), IncomeBasis::Transactions);
        settings.stated_income = Some(Decimal::from(4000));
        s.save_settings(&settings).unwrap();
        assert_eq!(
            s.settings().unwrap().income_basis(),
            IncomeBasis::Stated(Decimal::from(4000))
        );
    }
}
