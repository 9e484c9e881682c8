use crate::client::{ClientError, Notice, NoticeKind, Operation, RosterApi};
use crate::config::ClientConfig;
use crate::models::{Person, SpinResult, UpdatePersonRequest, Winner};
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Read-only view of the roster handed to rendering code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub persons: Vec<Person>,
    pub history: Vec<Winner>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl RosterSnapshot {
    pub fn person(&self, id: i64) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    pub fn present_count(&self) -> usize {
        self.persons.iter().filter(|p| p.present).count()
    }

    /// Present persons in roster order, i.e. the wheel's wedges.
    pub fn eligible(&self) -> Vec<Person> {
        self.persons.iter().filter(|p| p.present).cloned().collect()
    }
}

/// Owned, single-writer roster state synchronized with a [`RosterApi`].
///
/// Local state is only written after the remote store confirmed a mutation,
/// so a failed call leaves the snapshot untouched. Failures are turned into
/// an error [`Notice`] and also returned to the caller. Views subscribe via
/// [`Roster::subscribe`] and never write.
pub struct Roster<A> {
    api: A,
    state: Arc<watch::Sender<RosterSnapshot>>,
    in_flight: Mutex<HashSet<Operation>>,
    next_notice: AtomicU64,
    notice_ttl: Duration,
}

/// Marks an operation as running until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<Operation>>,
    op: Operation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.op);
    }
}

impl<A: RosterApi> Roster<A> {
    pub fn new(api: A, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(RosterSnapshot::default());
        Self {
            api,
            state: Arc::new(state),
            in_flight: Mutex::new(HashSet::new()),
            next_notice: AtomicU64::new(0),
            notice_ttl: config.notice_ttl(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<RosterSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&op)
    }

    /// 全量加载成员列表
    pub async fn load(&self) -> Result<(), ClientError> {
        self.guarded(Operation::Load, async {
            self.state.send_modify(|s| s.loading = true);
            let result = self.api.list_persons().await;
            self.state.send_modify(|s| s.loading = false);
            let persons = result?;
            self.state.send_modify(|s| s.persons = persons);
            Ok(())
        })
        .await
    }

    pub async fn load_history(&self) -> Result<(), ClientError> {
        let history = self
            .guarded(Operation::LoadHistory, self.api.win_history())
            .await?;
        self.state.send_modify(|s| s.history = history);
        Ok(())
    }

    /// 新增成员，只追加服务端返回的记录，不重新加载列表
    pub async fn add(&self, name: &str) -> Result<Person, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(Operation::Add, ClientError::InvalidName));
        }

        let person = self
            .guarded(Operation::Add, self.api.create_person(name))
            .await?;
        self.state.send_modify(|s| s.persons.push(person.clone()));
        self.post_notice(NoticeKind::Success, "Personne ajoutée avec succès".to_string());
        Ok(person)
    }

    pub async fn edit(&self, id: i64, name: &str) -> Result<Person, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(Operation::Edit, ClientError::InvalidName));
        }

        let update = UpdatePersonRequest {
            name: Some(name.to_string()),
            present: None,
        };
        let person = self
            .guarded(Operation::Edit, self.api.update_person(id, &update))
            .await?;
        self.replace(&person);
        self.post_notice(NoticeKind::Success, "Personne modifiée avec succès".to_string());
        Ok(person)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.guarded(Operation::Delete, self.api.delete_person(id))
            .await?;
        self.state.send_modify(|s| s.persons.retain(|p| p.id != id));
        self.post_notice(NoticeKind::Success, "Personne supprimée avec succès".to_string());
        Ok(())
    }

    /// Flips the presence flag currently held locally for `id`.
    pub async fn toggle_presence(&self, id: i64) -> Result<Person, ClientError> {
        let current = self.state.borrow().person(id).map(|p| p.present);
        let Some(present) = current else {
            return Err(self.reject(Operation::TogglePresence, ClientError::UnknownPerson(id)));
        };

        let person = self
            .guarded(Operation::TogglePresence, self.api.set_presence(id, !present))
            .await?;
        self.replace(&person);
        Ok(person)
    }

    /// 批量设置出席状态，成功后全量重新加载
    pub async fn set_all_presence(&self, present: bool) -> Result<(), ClientError> {
        let persons = self
            .guarded(Operation::SetAllPresence, async {
                self.api.set_all_presence(present).await?;
                self.api.list_persons().await
            })
            .await?;
        self.state.send_modify(|s| s.persons = persons);
        Ok(())
    }

    pub async fn reset_wins(&self, id: i64) -> Result<Person, ClientError> {
        let person = self
            .guarded(Operation::ResetWins, self.api.reset_person_wins(id))
            .await?;
        self.replace(&person);
        self.post_notice(
            NoticeKind::Success,
            format!("Les victoires de {} ont été réinitialisées", person.name),
        );
        Ok(person)
    }

    /// 清零全部中奖次数，成功后全量重新加载
    pub async fn reset_all_wins(&self) -> Result<(), ClientError> {
        let persons = self
            .guarded(Operation::ResetAllWins, async {
                self.api.reset_all_wins().await?;
                self.api.list_persons().await
            })
            .await?;
        self.state.send_modify(|s| s.persons = persons);
        self.post_notice(
            NoticeKind::Success,
            "Les compteurs de victoires ont été réinitialisés".to_string(),
        );
        Ok(())
    }

    /// Asks the remote store for a winner. Fails locally when nobody is
    /// present. Counters are not refreshed here; call [`Roster::load`].
    pub async fn draw(&self) -> Result<SpinResult, ClientError> {
        let present = self.state.borrow().present_count();
        if present == 0 {
            return Err(self.reject(Operation::Spin, ClientError::NoEligible));
        }
        self.guarded(Operation::Spin, self.api.spin()).await
    }

    pub fn dismiss_notice(&self) {
        self.state.send_if_modified(|s| s.notice.take().is_some());
    }

    /// Surfaces `err` as the notice for `op` and hands it back.
    pub(crate) fn reject(&self, op: Operation, err: ClientError) -> ClientError {
        self.post_failure(op, &err);
        err
    }

    async fn guarded<T, F>(&self, op: Operation, call: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let result = match self.begin(op) {
            Ok(_guard) => call.await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            self.post_failure(op, e);
        }
        result
    }

    fn begin(&self, op: Operation) -> Result<InFlight<'_>, ClientError> {
        let mut running = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !running.insert(op) {
            return Err(ClientError::Busy(op));
        }
        Ok(InFlight {
            set: &self.in_flight,
            op,
        })
    }

    fn replace(&self, person: &Person) {
        self.state.send_modify(|s| {
            if let Some(slot) = s.persons.iter_mut().find(|p| p.id == person.id) {
                *slot = person.clone();
            }
        });
    }

    fn post_failure(&self, op: Operation, err: &ClientError) {
        log::warn!("Roster operation {op:?} failed: {err}");
        self.post_notice(NoticeKind::Error, err.notice_text(op));
    }

    fn post_notice(&self, kind: NoticeKind, text: String) {
        let id = self.next_notice.fetch_add(1, Ordering::Relaxed) + 1;
        self.state
            .send_modify(|s| s.notice = Some(Notice { id, kind, text }));

        let state = Arc::clone(&self.state);
        let ttl = self.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            state.send_if_modified(|s| {
                if s.notice.as_ref().is_some_and(|n| n.id == id) {
                    s.notice = None;
                    true
                } else {
                    false
                }
            });
        });
    }
}
