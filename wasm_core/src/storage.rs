//! Key-value persistence for the few tools that survive a reload.
//!
//! Every document lives under one fixed key; writes are last-write-wins and
//! there is no versioning.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const NOTEPAD_KEY: &str = "notepad-content";
pub const INVOICE_SEQUENCE_KEY: &str = "invoice-sequence";
pub const INVOICE_LIST_KEY: &str = "invoice-list";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
    #[error("stored value under `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store used in tests and when the browser blocks storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Rejected(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// Single free-text document.
pub struct Notepad {
    store: Rc<dyn KeyValueStore>,
}

impl Notepad {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored text exactly as written, or empty when nothing was saved.
    pub fn load(&self) -> Result<String, StorageError> {
        Ok(self.store.get(NOTEPAD_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, text: &str) -> Result<(), StorageError> {
        self.store.set(NOTEPAD_KEY, text).inspect_err(|err| {
            warn!(error = %err, "failed to save notepad");
        })
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(NOTEPAD_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub number: String,
    pub client: String,
    pub amount: f64,
    pub issued_on: String,
}

/// Invoice numbering sequence plus the list of issued invoices.
pub struct InvoiceLedger {
    store: Rc<dyn KeyValueStore>,
}

pub fn format_invoice_number(sequence: u64) -> String {
    format!("INV-{sequence:04}")
}

impl InvoiceLedger {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last allocated sequence number; zero before the first invoice.
    pub fn sequence(&self) -> Result<u64, StorageError> {
        match self.store.get(INVOICE_SEQUENCE_KEY)? {
            None => Ok(0),
            Some(raw) => raw.trim().parse().map_err(|_| StorageError::Corrupt {
                key: INVOICE_SEQUENCE_KEY.into(),
                reason: format!("not a number: {raw}"),
            }),
        }
    }

    /// Number the next invoice will receive.
    pub fn peek_next(&self) -> Result<String, StorageError> {
        Ok(format_invoice_number(self.sequence()? + 1))
    }

    pub fn invoices(&self) -> Result<Vec<InvoiceRecord>, StorageError> {
        match self.store.get(INVOICE_LIST_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt {
                key: INVOICE_LIST_KEY.into(),
                reason: err.to_string(),
            }),
        }
    }

    /// Allocates the next number and appends the invoice.
    pub fn issue(
        &self,
        client: &str,
        amount: f64,
        issued_on: &str,
    ) -> Result<InvoiceRecord, StorageError> {
        let next = self.sequence()? + 1;
        let mut list = self.invoices()?;
        let record = InvoiceRecord {
            number: format_invoice_number(next),
            client: client.trim().to_string(),
            amount,
            issued_on: issued_on.trim().to_string(),
        };
        list.push(record.clone());
        let encoded =
            serde_json::to_string(&list).map_err(|err| StorageError::Rejected(err.to_string()))?;
        self.store.set(INVOICE_LIST_KEY, &encoded)?;
        self.store.set(INVOICE_SEQUENCE_KEY, &next.to_string())?;
        Ok(record)
    }

    /// Drops every stored invoice and restarts numbering.
    pub fn reset(&self) -> Result<(), StorageError> {
        self.store.remove(INVOICE_LIST_KEY)?;
        self.store.remove(INVOICE_SEQUENCE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> Rc<dyn KeyValueStore> {
        Rc::new(MemoryStore::new())
    }

    #[test]
    fn notepad_round_trips_exact_text() {
        let store = shared();
        Notepad::open(Rc::clone(&store)).save("draft text").unwrap();
        let reopened = Notepad::open(store);
        assert_eq!(reopened.load().unwrap(), "draft text");
    }

    #[test]
    fn notepad_keeps_whitespace_and_unicode() {
        let store = shared();
        let pad = Notepad::open(store);
        let text = "  line one\n\tline two  \n😀 ünïcode\n";
        pad.save(text).unwrap();
        assert_eq!(pad.load().unwrap(), text);
        pad.clear().unwrap();
        assert_eq!(pad.load().unwrap(), "");
    }

    #[test]
    fn ledger_allocates_sequential_numbers() {
        let store = shared();
        let ledger = InvoiceLedger::open(Rc::clone(&store));
        assert_eq!(ledger.peek_next().unwrap(), "INV-0001");
        let first = ledger.issue(" Acme ", 120.5, "2026-10-01").unwrap();
        let second = ledger.issue("Globex", 80.0, "2026-10-02").unwrap();
        assert_eq!(first.number, "INV-0001");
        assert_eq!(first.client, "Acme");
        assert_eq!(second.number, "INV-0002");

        let reopened = InvoiceLedger::open(store);
        assert_eq!(reopened.sequence().unwrap(), 2);
        assert_eq!(reopened.invoices().unwrap(), vec![first, second]);
    }

    #[test]
    fn ledger_reports_corrupt_payloads() {
        let store = shared();
        store.set(INVOICE_SEQUENCE_KEY, "abc").unwrap();
        store.set(INVOICE_LIST_KEY, "{").unwrap();
        let ledger = InvoiceLedger::open(store);
        assert!(matches!(ledger.sequence(), Err(StorageError::Corrupt { .. })));
        assert!(matches!(ledger.invoices(), Err(StorageError::Corrupt { .. })));
        ledger.reset().unwrap();
        assert_eq!(ledger.sequence().unwrap(), 0);
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }
}
