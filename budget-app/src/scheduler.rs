//! Timed work: the staged generation progress and the periodic autosave.

use std::sync::Arc;
use std::time::Duration;

use budget_core::store::AutosaveStore;
use budget_core::{AutosaveSnapshot, FormState};
use chrono::Utc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::dialogs::{Dialogs, ToastKind};

pub const PROGRESS_STEPS: [&str; 4] = [
    "Analisando dados...",
    "Processando com IA...",
    "Otimizando conteúdo...",
    "Finalizando orçamento...",
];

pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_AUTOSAVE_PERIOD: Duration = Duration::from_secs(30);

pub const AUTOSAVE_TOAST: &str = "Dados salvos automaticamente";

/// Status messages shown while a proposal is generated. Each step appears
/// after one delay and composition starts one delay after the last step.
#[derive(Debug, Clone)]
pub struct ProgressSequence {
    step_delay: Duration,
}

impl ProgressSequence {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub async fn run(
        &self,
        mut on_step: impl FnMut(&str),
    ) {
        for step in PROGRESS_STEPS {
            tokio::time::sleep(self.step_delay).await;
            on_step(step);
        }
        tokio::time::sleep(self.step_delay).await;
    }
}

impl Default for ProgressSequence {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

/// Handle to the running autosave task.
///
/// [`AutosaveHandle::shutdown`] stops it cleanly; dropping the handle aborts
/// it.
pub struct AutosaveHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    pub async fn shutdown(mut self) {
        if let Some(signal) = self.shutdown.take() {
            let _ = signal.send(());
        }
        if let Err(err) = (&mut self.task).await {
            if !err.is_cancelled() {
                tracing::error!(%err, "autosave task panicked");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Persists the latest form every `period`, first after one full period.
pub struct AutosaveTask {
    store: AutosaveStore,
    form: watch::Receiver<FormState>,
    dialogs: Arc<dyn Dialogs>,
    period: Duration,
}

impl AutosaveTask {
    pub fn new(
        store: AutosaveStore,
        form: watch::Receiver<FormState>,
        dialogs: Arc<dyn Dialogs>,
        period: Duration,
    ) -> Self {
        Self {
            store,
            form,
            dialogs,
            period,
        }
    }

    pub fn spawn(self) -> AutosaveHandle {
        let (shutdown, stop) = oneshot::channel();
        let task = tokio::spawn(self.run(stop));
        AutosaveHandle {
            shutdown: Some(shutdown),
            task,
        }
    }

    async fn run(
        self,
        mut stop: oneshot::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(period = ?self.period, "autosave started");

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => self.save_once().await,
            }
        }

        tracing::debug!("autosave stopped");
    }

    async fn save_once(&self) {
        let form = self.form.borrow().clone();
        let snapshot = AutosaveSnapshot::new(form, Utc::now());
        match self.store.save(&snapshot).await {
            Ok(()) => {
                tracing::debug!(at = %snapshot.timestamp, "form autosaved");
                self.dialogs.toast(ToastKind::Info, AUTOSAVE_TOAST);
            }
            Err(err) => tracing::error!(%err, "autosave failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use budget_core::store::{KeyValueStore, MemoryStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialogs::RecordingDialogs;

    #[tokio::test(start_paused = true)]
    async fn progress_shows_four_steps_then_waits() {
        let started = Instant::now();
        let seen = Mutex::new(Vec::new());

        ProgressSequence::default()
            .run(|step| {
                seen.lock().unwrap().push((step.to_string(), started.elapsed()));
            })
            .await;

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>(),
            PROGRESS_STEPS.to_vec()
        );
        assert_eq!(seen[0].1, Duration::from_millis(800));
        assert_eq!(seen[3].1, Duration::from_millis(3200));
        assert_eq!(started.elapsed(), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_waits_one_full_period() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let store = AutosaveStore::new(kv);
        let (_tx, rx) = watch::channel(FormState::default());
        let dialogs = Arc::new(RecordingDialogs::new());

        let handle = AutosaveTask::new(store.clone(), rx, dialogs.clone(), DEFAULT_AUTOSAVE_PERIOD).spawn();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(store.load().await, Ok(None));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.load().await.unwrap().is_some());
        assert_eq!(dialogs.toasts(), vec![(ToastKind::Info, AUTOSAVE_TOAST.to_string())]);

        handle.shutdown().await;
    }
}
