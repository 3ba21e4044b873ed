//! In-memory stand-in for the inventory backend, used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{ApiError, Backend};

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    requests: usize,
    fail_next: Option<ApiError>,
    silent_upload: bool,
}

impl State {
    /// Count the request and hand back an injected failure, if any.
    fn enter(&mut self) -> Result<(), ApiError> {
        self.requests += 1;
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn rows_mut(&mut self, path: &str) -> Result<&mut Vec<Value>, ApiError> {
        self.collections
            .get_mut(path)
            .ok_or_else(|| ApiError::NotFound(path.to_string()))
    }

    fn insert(&mut self, path: &str, body: Value) -> Result<Value, ApiError> {
        let Value::Object(mut fields) = body else {
            return Err(ApiError::Rejected("body must be an object".into()));
        };
        self.next_id += 1;
        fields.insert("id".into(), json!(self.next_id));
        let row = Value::Object(fields);
        self.rows_mut(path)?.push(row.clone());
        Ok(row)
    }
}

/// Splits `/api/items/7` into (`/api/items`, 7).
fn split_row_path(path: &str) -> Result<(&str, i64), ApiError> {
    path.rsplit_once('/')
        .and_then(|(collection, id)| id.parse().ok().map(|id| (collection, id)))
        .ok_or_else(|| ApiError::NotFound(path.to_string()))
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn item_matches(row: &Value, query: &[(&'static str, String)]) -> bool {
    query.iter().all(|(key, wanted)| match *key {
        "search" => row
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| name.to_lowercase().contains(&wanted.to_lowercase())),
        "status" => row.get("status").and_then(Value::as_str) == Some(wanted.as_str()),
        _ => true,
    })
}

pub(crate) struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub(crate) fn empty() -> Self {
        let mut state = State { next_id: 100, ..Default::default() };
        for path in ["/api/groups", "/api/categories", "/api/items", "/api/leaders", "/api/scouts"] {
            state.collections.insert(path.to_string(), Vec::new());
        }
        Self { state: Mutex::new(state) }
    }

    /// Two troops, a handful of gear, two leaders and three scouts.
    pub(crate) fn seeded() -> Self {
        let backend = Self::empty();
        {
            let mut state = backend.lock();
            let mut seed = |path: &str, rows: Vec<Value>| {
                state.collections.insert(path.to_string(), rows);
            };
            seed(
                "/api/groups",
                vec![
                    json!({"id": 1, "name": "Troop 7", "description": null}),
                    json!({"id": 2, "name": "Troop 12", "description": "Sea scouts"}),
                ],
            );
            seed(
                "/api/categories",
                vec![
                    json!({"id": 1, "name": "Camping", "sort_order": 1, "is_active": true}),
                    json!({"id": 2, "name": "Cooking", "sort_order": 2, "is_active": true}),
                    json!({"id": 3, "name": "First aid", "sort_order": 3, "is_active": true}),
                    json!({"id": 4, "name": "Retired", "sort_order": 9, "is_active": false}),
                ],
            );
            seed(
                "/api/items",
                vec![
                    json!({"id": 1, "name": "Dome tent", "category": "Camping", "status": "stored",
                           "quantity": 3, "bring_to_event": true, "location": "Shed A",
                           "owner_group_id": 1, "note": null}),
                    json!({"id": 2, "name": "Camp stove", "category": "Cooking", "status": "needs-maintenance",
                           "quantity": 1, "bring_to_event": false, "location": "Shed B",
                           "owner_group_id": 2, "note": "Leaking valve"}),
                    json!({"id": 3, "name": "Lantern", "category": "Camping", "status": "borrowed",
                           "quantity": 4, "bring_to_event": true, "location": "Shed A",
                           "owner_group_id": 1, "note": null}),
                    json!({"id": 4, "name": "Stove fuel", "category": "Cooking", "status": "stored",
                           "quantity": 6, "bring_to_event": false, "location": "Cage",
                           "owner_group_id": 2, "note": null}),
                ],
            );
            seed(
                "/api/leaders",
                vec![
                    json!({"id": 1, "name": "Aoki Hiro", "group_id": 1, "role": "Scoutmaster",
                           "gender": "M", "phone": "09012345678", "email": "aoki@example.org",
                           "is_deleted": false}),
                    json!({"id": 2, "name": "Mori Yui", "group_id": 2, "role": null,
                           "gender": "F", "phone": null, "email": null, "is_deleted": false}),
                ],
            );
            seed(
                "/api/scouts",
                vec![
                    json!({"id": 1, "name": "Sato Ken", "name_kana": "さとう けん", "group_id": 1,
                           "grade": "6", "rank": "Scout", "gender": "M", "patrol": "Hawk", "is_deleted": false}),
                    json!({"id": 2, "name": "Suzuki Aya", "name_kana": "すずき あや", "group_id": 2,
                           "grade": "5", "rank": "Tenderfoot", "gender": "F", "patrol": "Owl", "is_deleted": false}),
                    json!({"id": 3, "name": "Mori Kenji", "name_kana": "もり けんじ", "group_id": 2,
                           "grade": "6", "rank": null, "gender": "M", "patrol": null, "is_deleted": false}),
                ],
            );
        }
        backend
    }

    /// Upload responses carry no `message`.
    pub(crate) fn with_silent_upload(self) -> Self {
        self.lock().silent_upload = true;
        self
    }

    /// The next request fails with `error`.
    pub(crate) fn fail_next(&self, error: ApiError) {
        self.lock().fail_next = Some(error);
    }

    /// Requests received so far, failed ones included.
    pub(crate) fn request_count(&self) -> usize {
        self.lock().requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test poisons the lock; the data is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError> {
        let mut state = self.lock();
        state.enter()?;
        let rows = state.rows_mut(path)?;
        let rows: Vec<Value> = rows.iter().filter(|row| item_matches(row, query)).cloned().collect();
        Ok(Value::Array(rows))
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let mut state = self.lock();
        state.enter()?;
        state.insert(path, body)
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let mut state = self.lock();
        state.enter()?;
        let (collection, id) = split_row_path(path)?;
        let Value::Object(patch) = body else {
            return Err(ApiError::Rejected("body must be an object".into()));
        };

        let rows = state.rows_mut(collection)?;
        let row = rows
            .iter_mut()
            .find(|row| row_id(row) == Some(id))
            .ok_or_else(|| ApiError::NotFound(path.to_string()))?;
        if let Value::Object(fields) = row {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.enter()?;
        let (collection, id) = split_row_path(path)?;
        let rows = state.rows_mut(collection)?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        if rows.len() == before {
            return Err(ApiError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn upload(
        &self,
        path: &str,
        _field: &'static str,
        _file_name: String,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError> {
        let mut state = self.lock();
        state.enter()?;
        let collection = path.strip_suffix("/upload-csv").unwrap_or(path).to_string();

        let text = String::from_utf8(bytes).map_err(|e| ApiError::Rejected(e.to_string()))?;
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header: Vec<&str> = lines
            .next()
            .ok_or_else(|| ApiError::Rejected("empty file".into()))?
            .split(',')
            .map(str::trim)
            .collect();

        let mut imported = 0;
        for line in lines {
            let mut fields = Map::new();
            for (key, value) in header.iter().zip(line.split(',')) {
                let value = value.trim();
                let value = match *key {
                    "group_id" => json!(value.parse::<i64>().map_err(|e| ApiError::Rejected(e.to_string()))?),
                    _ => json!(value),
                };
                fields.insert((*key).to_string(), value);
            }
            fields.insert("is_deleted".into(), json!(false));
            state.insert(&collection, Value::Object(fields))?;
            imported += 1;
        }

        if state.silent_upload {
            Ok(json!({}))
        } else {
            Ok(json!({"message": format!("Imported {imported} scouts")}))
        }
    }
}
