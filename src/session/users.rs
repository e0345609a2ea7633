use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Role, Session};

/// Credential-checking collaborator behind [`super::SessionStore`]. A real
/// deployment would back this with an identity provider; the seeded
/// implementation below is the development mock.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Some(session)` when email and password match a known user.
    async fn authenticate(&self, email: &str, password: &str) -> Option<Session>;
    async fn list(&self) -> Vec<Session>;
    async fn update_role(&self, user_id: u32, role: Role) -> bool;
    async fn delete(&self, user_id: u32) -> bool;
}

struct UserRecord {
    id: u32,
    email: &'static str,
    password: &'static str,
    display_name: &'static str,
    role: Role,
    avatar_url: &'static str,
}

impl UserRecord {
    fn session(&self) -> Session {
        Session {
            user_id: self.id,
            email: self.email.to_string(),
            display_name: self.display_name.to_string(),
            role: self.role,
            avatar_url: self.avatar_url.to_string(),
        }
    }
}

/// Fixed development user set, one per role.
pub struct SeededUserDirectory {
    users: RwLock<Vec<UserRecord>>,
}

impl Default for SeededUserDirectory {
    fn default() -> Self {
        Self {
            users: RwLock::new(vec![
                UserRecord {
                    id: 1,
                    email: "admin@company.com",
                    password: "admin123",
                    display_name: "Admin User",
                    role: Role::Admin,
                    avatar_url: "https://i.pravatar.cc/150?u=1",
                },
                UserRecord {
                    id: 2,
                    email: "analyst@company.com",
                    password: "analyst123",
                    display_name: "Data Analyst",
                    role: Role::Analyst,
                    avatar_url: "https://i.pravatar.cc/150?u=2",
                },
                UserRecord {
                    id: 3,
                    email: "viewer@company.com",
                    password: "viewer123",
                    display_name: "Report Viewer",
                    role: Role::Viewer,
                    avatar_url: "https://i.pravatar.cc/150?u=3",
                },
            ]),
        }
    }
}

#[async_trait]
impl UserDirectory for SeededUserDirectory {
    async fn authenticate(&self, email: &str, password: &str) -> Option<Session> {
        self.users
            .read()
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(UserRecord::session)
    }

    async fn list(&self) -> Vec<Session> {
        self.users.read().iter().map(UserRecord::session).collect()
    }

    async fn update_role(&self, user_id: u32, role: Role) -> bool {
        let mut users = self.users.write();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    async fn delete(&self, user_id: u32) -> bool {
        let mut users = self.users.write();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        users.len() != before
    }
}
