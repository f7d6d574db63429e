//! In-memory remote service for tests.
//!
//! Holds accounts, sessions, table rows and stored objects behind one mutex and
//! records every trait call by name, so tests can assert that an action made
//! no remote call at all. Failures can be injected per operation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use account::{Row, User};
use serde_json::{Map, Value, json};

use super::query::Query;
use super::types::{RemoteError, RemoteService, RemoteSession, UploadOptions};

pub const PUBLIC_BASE: &str = "https://remote.test/storage/v1/object/public";

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
    nickname: String,
}

impl Account {
    fn user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            user_metadata: json!({ "nickname": self.nickname }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub cache_control_secs: u32,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    /// access token -> user id
    sessions: HashMap<String, String>,
    /// refresh token -> (access token it was issued with, user id)
    refresh: HashMap<String, (String, String)>,
    tables: HashMap<String, Vec<Row>>,
    /// `bucket/path` -> object
    objects: HashMap<String, StoredObject>,
    /// auth code -> (verifier, user id)
    oauth_codes: HashMap<String, (String, String)>,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, RemoteError>,
    signup_without_session: bool,
    next_id: u64,
}

impl Inner {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn open_session(&mut self, account: &Account) -> RemoteSession {
        let n = self.next();
        let token = format!("token-{n}");
        let refresh = format!("refresh-{n}");
        self.sessions.insert(token.clone(), account.id.clone());
        self.refresh.insert(refresh.clone(), (token.clone(), account.id.clone()));
        RemoteSession {
            access_token: token,
            refresh_token: refresh,
            expires_in: Some(3600),
            user: account.user(),
        }
    }

    fn account_for(&self, access_token: &str) -> Result<&Account, RemoteError> {
        let unauthorized = || RemoteError::Api { status: 401, message: "invalid JWT".into() };
        let user_id = self.sessions.get(access_token).ok_or_else(unauthorized)?;
        self.accounts
            .iter()
            .find(|a| &a.id == user_id)
            .ok_or_else(unauthorized)
    }
}

pub struct MemoryRemote {
    inner: Mutex<Inner>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Record the call and return the injected failure for `op`, if any.
    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, Inner>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(op);
        if let Some(err) = inner.failures.get(op) {
            return Err(err.clone());
        }
        Ok(inner)
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    /// Register an account and its `user_info` row. Returns the user id.
    pub fn add_account(&self, email: &str, password: &str, nickname: &str) -> String {
        let mut inner = self.lock();
        let id = format!("user-{}", inner.next());
        inner.accounts.push(Account {
            id: id.clone(),
            email: email.to_owned(),
            password: password.to_owned(),
            nickname: nickname.to_owned(),
        });
        inner.tables.entry("user_info".into()).or_default().push(json!({
            "user_id": id,
            "user_nickname": nickname,
            "user_avatar": null,
        }));
        id
    }

    /// Issue a session for an existing account. Returns the access token.
    pub fn sign_in_as(&self, user_id: &str) -> String {
        self.open_session_for(user_id).access_token
    }

    /// Issue a session for an existing account, refresh token included.
    pub fn open_session_for(&self, user_id: &str) -> RemoteSession {
        let mut inner = self.lock();
        let account = inner
            .accounts
            .iter()
            .find(|a| a.id == user_id)
            .cloned()
            .unwrap();
        inner.open_session(&account)
    }

    /// Drop an access token as if it had expired; its refresh token stays good.
    pub fn expire_access(&self, access_token: &str) {
        self.lock().sessions.remove(access_token);
    }

    pub fn insert_row(&self, table: &str, row: Row) {
        self.lock().tables.entry(table.to_owned()).or_default().push(row);
    }

    pub fn add_oauth_code(&self, code: &str, verifier: &str, user_id: &str) {
        self.lock()
            .oauth_codes
            .insert(code.to_owned(), (verifier.to_owned(), user_id.to_owned()));
    }

    /// Make every later call to `op` fail with `err`.
    pub fn fail(&self, op: &'static str, err: RemoteError) {
        self.lock().failures.insert(op, err);
    }

    /// Sign-up returns a bare user instead of a session.
    pub fn require_email_confirmation(&self) {
        self.lock().signup_without_session = true;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.lock().objects.get(&object_key(bucket, path)).cloned()
    }

    #[must_use]
    pub fn is_session_open(&self, access_token: &str) -> bool {
        self.lock().sessions.contains_key(access_token)
    }

    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.lock().sessions.len()
    }
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{}", path.trim_start_matches('/'))
}

/// Text form of a column value as filters see it; `null`/missing is `None`.
fn rendered(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn row_matches(row: &Row, query: &Query) -> bool {
    query
        .filters()
        .iter()
        .all(|f| f.matches(rendered(row, f.column()).as_deref()))
}

/// Apply the select list: `*`, plain columns, and `table(*)` embeds joined on
/// `<singular>_id = table.id` (`posts(*)` reads `post_id`).
fn project(row: &Row, columns: &str, tables: &HashMap<String, Vec<Row>>) -> Row {
    let mut out = Map::new();
    for part in columns.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part == "*" {
            if let Some(obj) = row.as_object() {
                out.extend(obj.clone());
            }
        } else if let Some(embed) = part.strip_suffix("(*)") {
            let fk = format!("{}_id", embed.trim_end_matches('s'));
            let joined = rendered(row, &fk).and_then(|id| {
                tables
                    .get(embed)?
                    .iter()
                    .find(|r| rendered(r, "id").as_deref() == Some(id.as_str()))
                    .cloned()
            });
            out.insert(embed.to_owned(), joined.unwrap_or(Value::Null));
        } else if let Some(value) = row.get(part) {
            out.insert(part.to_owned(), value.clone());
        }
    }
    Value::Object(out)
}

#[async_trait::async_trait]
impl RemoteService for MemoryRemote {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<RemoteSession, RemoteError> {
        let mut inner = self.enter("sign_in_with_password")?;
        let account = inner
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned()
            .ok_or_else(|| RemoteError::Api { status: 400, message: "Invalid login credentials".into() })?;
        Ok(inner.open_session(&account))
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> Result<Option<RemoteSession>, RemoteError> {
        let mut inner = self.enter("sign_up")?;
        if inner.accounts.iter().any(|a| a.email == email) {
            return Err(RemoteError::Api { status: 422, message: "User already registered".into() });
        }
        let nickname = metadata
            .get("nickname")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let account = Account {
            id: format!("user-{}", inner.next()),
            email: email.to_owned(),
            password: password.to_owned(),
            nickname: nickname.clone(),
        };
        inner.accounts.push(account.clone());
        inner.tables.entry("user_info".into()).or_default().push(json!({
            "user_id": account.id,
            "user_nickname": nickname,
            "user_avatar": null,
        }));
        if inner.signup_without_session {
            return Ok(None);
        }
        Ok(Some(inner.open_session(&account)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), RemoteError> {
        let mut inner = self.enter("sign_out")?;
        inner.refresh.retain(|_, (access, _)| access != access_token);
        inner
            .sessions
            .remove(access_token)
            .map(|_| ())
            .ok_or(RemoteError::Api { status: 401, message: "invalid JWT".into() })
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> Result<String, RemoteError> {
        self.enter("authorize_url")?;
        Ok(format!(
            "https://remote.test/auth/v1/authorize?provider={provider}&redirect_to={redirect_to}&code_challenge={code_challenge}&code_challenge_method=plain"
        ))
    }

    async fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> Result<RemoteSession, RemoteError> {
        let mut inner = self.enter("exchange_code")?;
        let (verifier, user_id) = inner
            .oauth_codes
            .remove(auth_code)
            .ok_or_else(|| RemoteError::Api { status: 404, message: "invalid flow state".into() })?;
        if verifier != code_verifier {
            return Err(RemoteError::Api {
                status: 400,
                message: "code challenge does not match previously saved code verifier".into(),
            });
        }
        let account = inner
            .accounts
            .iter()
            .find(|a| a.id == user_id)
            .cloned()
            .ok_or_else(|| RemoteError::Api { status: 404, message: "user not found".into() })?;
        Ok(inner.open_session(&account))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<RemoteSession, RemoteError> {
        let mut inner = self.enter("refresh_session")?;
        let (access, user_id) = inner
            .refresh
            .remove(refresh_token)
            .ok_or_else(|| RemoteError::Api { status: 400, message: "Invalid Refresh Token: Refresh Token Not Found".into() })?;
        inner.sessions.remove(&access);
        let account = inner
            .accounts
            .iter()
            .find(|a| a.id == user_id)
            .cloned()
            .ok_or_else(|| RemoteError::Api { status: 404, message: "user not found".into() })?;
        Ok(inner.open_session(&account))
    }

    async fn get_user(&self, access_token: &str) -> Result<User, RemoteError> {
        let inner = self.enter("get_user")?;
        inner.account_for(access_token).map(Account::user)
    }

    async fn select(&self, access_token: &str, table: &str, query: &Query) -> Result<Vec<Row>, RemoteError> {
        let inner = self.enter("select")?;
        inner.account_for(access_token)?;
        let rows = inner.tables.get(table).map(Vec::as_slice).unwrap_or_default();
        Ok(rows
            .iter()
            .filter(|row| row_matches(row, query))
            .take(query.limit_value().unwrap_or(usize::MAX))
            .map(|row| project(row, query.columns(), &inner.tables))
            .collect())
    }

    async fn update(&self, access_token: &str, table: &str, query: &Query, patch: Value) -> Result<Vec<Row>, RemoteError> {
        let mut inner = self.enter("update")?;
        inner.account_for(access_token)?;
        let Some(fields) = patch.as_object() else {
            return Err(RemoteError::Api { status: 400, message: "patch must be an object".into() });
        };
        let mut updated = Vec::new();
        for row in inner.tables.entry(table.to_owned()).or_default() {
            if !row_matches(row, query) {
                continue;
            }
            if let Some(obj) = row.as_object_mut() {
                obj.extend(fields.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn upload(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), RemoteError> {
        let mut inner = self.enter("upload")?;
        inner.account_for(access_token)?;
        let key = object_key(bucket, path);
        if !options.upsert && inner.objects.contains_key(&key) {
            return Err(RemoteError::Api { status: 409, message: "The resource already exists".into() });
        }
        inner.objects.insert(
            key,
            StoredObject {
                body,
                content_type: options.content_type.clone(),
                cache_control_secs: options.cache_control_secs,
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, RemoteError> {
        self.enter("public_url")?;
        Ok(format!("{PUBLIC_BASE}/{}", object_key(bucket, path)))
    }
}
