use crate::client::{ClientError, Operation, Roster, RosterApi};
use crate::config::ClientConfig;
use crate::models::Person;
use crate::wheel::{SpinPhase, Spinner, Wedge, WheelFrame, WheelLayout, wedges};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOutcome {
    pub winner: Person,
    pub total_participants: u64,
    /// `None` when the winner was not on the wheel when it started spinning.
    pub final_rotation: Option<f64>,
}

/// Settles the wheel without a winner if a draw is abandoned mid-spin.
struct SettleOnDrop<'a> {
    spinner: &'a mut Spinner,
    armed: bool,
}

impl<'a> SettleOnDrop<'a> {
    fn new(spinner: &'a mut Spinner) -> Self {
        Self {
            spinner,
            armed: true,
        }
    }

    fn settle(mut self, eligible: &[Person], winner_id: Option<i64>) -> Option<f64> {
        self.armed = false;
        self.spinner.stop(eligible, winner_id)
    }
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            log::warn!("Draw abandoned while spinning, stopping the wheel");
            self.spinner.stop(&[], None);
        }
    }
}

/// Runs one draw end to end: free spin, remote pick, settle, counter reload.
pub struct DrawController<A> {
    roster: Arc<Roster<A>>,
    spinner: Spinner,
    spin_delay: Duration,
    winner: Option<i64>,
}

impl<A: RosterApi> DrawController<A> {
    pub fn new(roster: Arc<Roster<A>>, config: &ClientConfig) -> Self {
        Self {
            roster,
            spinner: Spinner::new(config),
            spin_delay: config.spin_delay(),
            winner: None,
        }
    }

    pub fn roster(&self) -> &Arc<Roster<A>> {
        &self.roster
    }

    pub fn frames(&self) -> watch::Receiver<WheelFrame> {
        self.spinner.subscribe()
    }

    pub fn frame(&self) -> WheelFrame {
        self.spinner.frame()
    }

    /// 抽奖
    ///
    /// The wedge order is captured when the spin starts. The remote pick
    /// happens after `spin_delay`; a failed pick settles the wheel where it is.
    pub async fn run(&mut self) -> Result<DrawOutcome, ClientError> {
        let eligible = self.roster.snapshot().eligible();
        if eligible.is_empty() {
            return Err(self.roster.reject(Operation::Spin, ClientError::NoEligible));
        }
        if !self.spinner.start() {
            return Err(self
                .roster
                .reject(Operation::Spin, ClientError::Busy(Operation::Spin)));
        }
        self.winner = None;
        let spin = SettleOnDrop::new(&mut self.spinner);

        tokio::time::sleep(self.spin_delay).await;

        match self.roster.draw().await {
            Ok(result) => {
                let final_rotation = spin.settle(&eligible, Some(result.winner.id));
                self.winner = Some(result.winner.id);
                log::info!(
                    "Draw settled on person {} among {}",
                    result.winner.id,
                    result.total_participants
                );
                if let Err(e) = self.roster.load().await {
                    log::warn!("Failed to refresh roster after draw: {e}");
                }
                Ok(DrawOutcome {
                    winner: result.winner,
                    total_participants: result.total_participants,
                    final_rotation,
                })
            }
            Err(e) => {
                spin.settle(&eligible, None);
                Err(e)
            }
        }
    }

    /// Dismisses the result and returns the wheel to Idle.
    pub fn close(&mut self) {
        self.winner = None;
        self.spinner.close();
    }

    /// Current wedges; the winner is only highlighted once the wheel stopped.
    pub fn wedges(&self, layout: &WheelLayout) -> Vec<Wedge> {
        let winner = match self.spinner.phase() {
            SpinPhase::Spinning => None,
            _ => self.winner,
        };
        wedges(&self.roster.snapshot().eligible(), winner, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::roster::tests::FakeApi;
    use tokio::time::Instant;

    async fn controller(people: &[(&str, bool)]) -> DrawController<FakeApi> {
        let config = ClientConfig::default();
        let roster = Arc::new(Roster::new(FakeApi::with(people), &config));
        roster.load().await.unwrap();
        DrawController::new(roster, &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_settles_on_winner_and_reloads() {
        let mut draw = controller(&[("A", true), ("B", false), ("C", true), ("D", true)]).await;
        let started = Instant::now();

        let outcome = draw.run().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(5_000));
        // 出席三人，D 位于第 3 个扇区
        assert_eq!(outcome.winner.id, 4);
        assert_eq!(outcome.total_participants, 3);
        assert_eq!(outcome.final_rotation, Some(3660.0));
        assert_eq!(draw.frame().rotation, 3660.0);
        assert_eq!(draw.frame().phase, SpinPhase::Settling);

        let roster = draw.roster();
        assert_eq!(roster.api().calls(), vec!["list", "spin", "list"]);
        assert_eq!(roster.snapshot().person(4).unwrap().win_count, 1);

        let wedges = draw.wedges(&WheelLayout::default());
        assert_eq!(wedges.len(), 3);
        assert!(wedges[2].winner);

        draw.close();
        assert_eq!(draw.frame().phase, SpinPhase::Idle);
        assert!(draw.wedges(&WheelLayout::default()).iter().all(|w| !w.winner));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_without_present_persons() {
        let mut draw = controller(&[("A", false)]).await;

        let err = draw.run().await.unwrap_err();

        assert!(matches!(err, ClientError::NoEligible));
        assert_eq!(draw.frame().phase, SpinPhase::Idle);
        assert_eq!(draw.roster().api().calls(), vec!["list"]);
        assert_eq!(
            draw.roster().snapshot().notice.unwrap().text,
            "Aucune personne présente pour le tirage"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_draw_stops_wheel_and_reports() {
        let mut draw = controller(&[("A", true)]).await;
        draw.roster().api().fail("spin");

        let err = draw.run().await.unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        let frame = draw.frame();
        assert_eq!(frame.phase, SpinPhase::Settling);
        assert!(frame.rotation < 3600.0);
        let notice = draw.roster().snapshot().notice.unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.text, "Database error");
        assert_eq!(draw.roster().api().calls(), vec!["list", "spin"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_draw_stops_the_wheel() {
        let mut draw = controller(&[("A", true), ("B", true)]).await;

        let abandoned = tokio::time::timeout(Duration::from_secs(1), draw.run()).await;
        assert!(abandoned.is_err());

        let stopped = draw.frame();
        assert_eq!(stopped.phase, SpinPhase::Settling);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(draw.frame().rotation, stopped.rotation);
        assert_eq!(draw.roster().api().calls(), vec!["list"]);

        let outcome = draw.run().await.unwrap();
        assert_eq!(outcome.winner.id, 2);
    }
}
