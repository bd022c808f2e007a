#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use gradewatch::error::AppError;
use gradewatch::gradebook::GradebookClient;
use gradewatch::models::{Assignment, ClassPeriod, Snapshot};
use gradewatch::session::{Credentials, Session};

/// Serves queued snapshots in order. `None` in the queue simulates an outage.
/// Once the queue is drained the last served snapshot is repeated.
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Option<Snapshot>>>,
    last: Mutex<Snapshot>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Option<Snapshot>>) -> Self {
        Self {
            queue: Mutex::new(script.into()),
            last: Mutex::new(Snapshot::default()),
        }
    }
}

#[async_trait]
impl GradebookClient for ScriptedClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        if credentials.password == "wrong" {
            return Err(AppError::Unauthorized);
        }
        Ok(Session::new(credentials.username.clone(), "scripted"))
    }

    async fn fetch_snapshot(&self, _session: &Session) -> Result<Snapshot, AppError> {
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(Some(snapshot)) => {
                *self.last.lock().unwrap() = snapshot.clone();
                Ok(snapshot)
            }
            Some(None) => Err(AppError::Upstream {
                status: 503,
                body: "maintenance".to_string(),
            }),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "s123456".to_string(),
        password: "correct horse".to_string(),
    }
}

pub fn gradebook(quiz_points: &str) -> Snapshot {
    Snapshot::new(vec![
        ClassPeriod::new("Algebra II", "Mr. Lind").with_assignments(vec![
            Assignment::named("Quiz 1").kind("Quiz").points(quiz_points),
        ]),
        ClassPeriod::new("Chemistry", "Ms. Okafor").with_assignments(vec![
            Assignment::named("Lab 1").kind("Lab").points("18/20"),
        ]),
        ClassPeriod::new("English 10", "Mrs. Duarte").with_assignments(vec![
            Assignment::named("Essay").kind("Writing").notes("Draft due Friday"),
        ]),
    ])
}
