use crate::models::{Job, User};
use std::collections::BTreeMap;
use tokio::sync::{Mutex, MutexGuard};

/// In-memory record store.
///
/// Handlers never share a long-lived handle: each request calls
/// [`Store::session`] once and holds the returned guard for the span of work
/// that must see consistent state. Dropping the guard releases it on every
/// exit path.
#[derive(Default)]
pub struct Store {
    tables: Mutex<Tables>,
}

#[derive(Default)]
pub struct Tables {
    users: BTreeMap<i64, User>,
    jobs: BTreeMap<i64, Job>,
    last_user_id: i64,
    last_job_id: i64,
}

pub type Session<'a> = MutexGuard<'a, Tables>;

impl Store {
    pub async fn session(&self) -> Session<'_> {
        self.tables.lock().await
    }
}

impl Tables {
    pub fn users(&self, skip: usize, limit: usize) -> Vec<&User> {
        self.users.values().skip(skip).take(limit).collect()
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// Assigns the next id and stores the record. Caller checks uniqueness
    /// under the same session.
    pub fn insert_user(&mut self, mut user: User) -> &User {
        self.last_user_id += 1;
        user.id = self.last_user_id;
        self.users.entry(user.id).or_insert(user)
    }

    pub fn user_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    pub fn remove_user(&mut self, id: i64) -> Option<User> {
        self.users.remove(&id)
    }

    pub fn jobs(&self, skip: usize, limit: usize) -> Vec<&Job> {
        self.jobs.values().skip(skip).take(limit).collect()
    }

    pub fn job(&self, id: i64) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn insert_job(&mut self, mut job: Job) -> &Job {
        self.last_job_id += 1;
        job.id = self.last_job_id;
        self.jobs.entry(job.id).or_insert(job)
    }

    pub fn job_mut(&mut self, id: i64) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    pub fn remove_job(&mut self, id: i64) -> Option<Job> {
        self.jobs.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Role};

    fn user(username: &str) -> User {
        User {
            id: 0,
            username: username.to_string(),
            password: "$2b$04$digest".to_string(),
            first_name: username.to_string(),
            last_name: None,
            phone: None,
            gender: Gender::Other,
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_and_not_reused() {
        let store = Store::default();
        let mut session = store.session().await;

        assert_eq!(session.insert_user(user("a")).id, 1);
        assert_eq!(session.insert_user(user("b")).id, 2);
        assert!(session.remove_user(2).is_some());
        assert_eq!(session.insert_user(user("c")).id, 3);
    }

    #[tokio::test]
    async fn lookups_by_username_and_page() {
        let store = Store::default();
        {
            let mut session = store.session().await;
            for name in ["a", "b", "c"] {
                session.insert_user(user(name));
            }
        }

        let session = store.session().await;
        assert_eq!(session.user_by_username("b").map(|u| u.id), Some(2));
        assert!(session.user_by_username("ghost").is_none());
        let page: Vec<_> = session.users(1, 1).into_iter().map(|u| u.username.as_str()).collect();
        assert_eq!(page, ["b"]);
    }
}
