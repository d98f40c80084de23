//! In-memory directory used by the controller and workflow tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use userdesk_core::{UserId, UserPatch, UserRecord};

use crate::client::DirectoryApi;
use crate::error::DirectoryError;
use crate::types::{LoginResponse, UpdateAck, UserPage};

pub(crate) fn user(id: i64, first: &str, last: &str) -> UserRecord {
    UserRecord {
        id: UserId::new(id),
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

pub(crate) fn page_one() -> Vec<UserRecord> {
    vec![
        user(1, "George", "Bluth"),
        user(2, "Janet", "Weaver"),
        user(3, "Emma", "Wong"),
    ]
}

pub(crate) fn page_two() -> Vec<UserRecord> {
    vec![user(7, "Michael", "Lawson"), user(8, "Lindsay", "Ferguson")]
}

#[derive(Debug, Default)]
struct State {
    pages: HashMap<u32, Vec<UserRecord>>,
    failing_pages: HashSet<u32>,
    failing_mutations: HashSet<UserId>,
    requests: Vec<String>,
}

/// Scriptable directory. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDirectory {
    state: Arc<Mutex<State>>,
}

impl FakeDirectory {
    pub(crate) fn two_pages() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.pages.insert(1, page_one());
            state.pages.insert(2, page_two());
        }
        fake
    }

    pub(crate) fn fail_page(&self, page: u32) {
        self.state.lock().unwrap().failing_pages.insert(page);
    }

    pub(crate) fn fail_mutations_of(&self, id: i64) {
        self.state.lock().unwrap().failing_mutations.insert(UserId::new(id));
    }

    pub(crate) fn heal_mutations_of(&self, id: i64) {
        self.state.lock().unwrap().failing_mutations.remove(&UserId::new(id));
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn record(&self, request: String) {
        self.state.lock().unwrap().requests.push(request);
    }
}

impl DirectoryApi for FakeDirectory {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, DirectoryError> {
        self.record(format!("POST /login {email}"));
        if email == "eve.holt@reqres.in" && password == "cityslicka" {
            Ok(LoginResponse {
                token: Some("QpwL5tke4Pnpja7X4".to_string()),
            })
        } else {
            Err(DirectoryError::auth(Some(400), "user not found"))
        }
    }

    async fn list_users(&self, page: u32) -> Result<UserPage, DirectoryError> {
        self.record(format!("GET /users?page={page}"));
        let state = self.state.lock().unwrap();
        if state.failing_pages.contains(&page) {
            return Err(DirectoryError::fetch(Some(500), "directory returned 500"));
        }
        let total_pages = state.pages.len() as u32;
        let data = state.pages.get(&page).cloned().unwrap_or_default();
        Ok(UserPage::new(data, total_pages))
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord, DirectoryError> {
        self.record(format!("GET /users/{id}"));
        let state = self.state.lock().unwrap();
        state
            .pages
            .values()
            .flatten()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::fetch(Some(404), format!("user not found: {id}")))
    }

    async fn update_user(&self, id: UserId, _patch: &UserPatch) -> Result<UpdateAck, DirectoryError> {
        self.record(format!("PUT /users/{id}"));
        if self.state.lock().unwrap().failing_mutations.contains(&id) {
            return Err(DirectoryError::mutation(Some(500), "directory returned 500"));
        }
        Ok(UpdateAck::default())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DirectoryError> {
        self.record(format!("DELETE /users/{id}"));
        if self.state.lock().unwrap().failing_mutations.contains(&id) {
            return Err(DirectoryError::mutation(Some(500), "directory returned 500"));
        }
        Ok(())
    }
}
