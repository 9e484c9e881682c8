use crate::config::ClientConfig;
use crate::models::Person;
use crate::wheel::rotation::final_rotation;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Settling,
}

/// CSS `cubic-bezier()` control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier(pub f64, pub f64, pub f64, pub f64);

pub const SETTLE_CURVE: CubicBezier = CubicBezier(0.17, 0.67, 0.12, 0.99);

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cubic-bezier({}, {}, {}, {})", self.0, self.1, self.2, self.3)
    }
}

/// How the renderer should move to the frame's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transition {
    /// Jump; used while spinning.
    #[default]
    None,
    Eased { duration: Duration, curve: CubicBezier },
}

impl Transition {
    pub fn to_css(&self) -> String {
        match self {
            Transition::None => "none".to_string(),
            Transition::Eased { duration, curve } => {
                format!("transform {}s {curve}", duration.as_secs_f64())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelFrame {
    /// Degrees, clockwise, accumulated over the session.
    pub rotation: f64,
    pub phase: SpinPhase,
    pub transition: Transition,
}

/// Wheel state machine: Idle -> Spinning -> Settling -> Idle.
///
/// While spinning a single owned timer task advances the rotation by a fixed
/// step each tick. Leaving Spinning, closing, or dropping the spinner aborts
/// that task.
pub struct Spinner {
    frame: Arc<watch::Sender<WheelFrame>>,
    timer: Option<JoinHandle<()>>,
    tick: Duration,
    step: f64,
    settle: Duration,
}

impl Spinner {
    pub fn new(config: &ClientConfig) -> Self {
        let (frame, _) = watch::channel(WheelFrame::default());
        Self {
            frame: Arc::new(frame),
            timer: None,
            // interval() 不接受零周期
            tick: config.spin_tick().max(Duration::from_millis(1)),
            step: config.spin_step_deg,
            settle: config.settle_duration(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WheelFrame> {
        self.frame.subscribe()
    }

    pub fn frame(&self) -> WheelFrame {
        *self.frame.borrow()
    }

    pub fn phase(&self) -> SpinPhase {
        self.frame.borrow().phase
    }

    /// Starts the free spin. Returns `false` when already spinning.
    pub fn start(&mut self) -> bool {
        if self.phase() == SpinPhase::Spinning {
            return false;
        }
        self.cancel_timer();
        self.frame.send_modify(|f| {
            f.phase = SpinPhase::Spinning;
            f.transition = Transition::None;
        });

        let frame = Arc::clone(&self.frame);
        let (tick, step) = (self.tick, self.step);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                ticker.tick().await;
                frame.send_if_modified(|f| {
                    if f.phase != SpinPhase::Spinning {
                        return false;
                    }
                    f.rotation += step;
                    true
                });
            }
        }));
        log::debug!("Wheel spinning");
        true
    }

    /// Stops the free spin and settles on `winner_id`.
    ///
    /// `eligible` must be the wedge order used while spinning. Without a
    /// winner, or when the winner is not a wedge, the wheel settles where it
    /// is. Returns the resting rotation when one was computed.
    pub fn stop(&mut self, eligible: &[Person], winner_id: Option<i64>) -> Option<f64> {
        self.cancel_timer();
        let target = winner_id.and_then(|id| final_rotation(eligible, id));
        let settle = self.settle;
        self.frame.send_modify(|f| {
            if let Some(rotation) = target {
                f.rotation = rotation;
            }
            f.phase = SpinPhase::Settling;
            f.transition = Transition::Eased {
                duration: settle,
                curve: SETTLE_CURVE,
            };
        });
        if target.is_none() && winner_id.is_some() {
            log::warn!("Winner {winner_id:?} is not on the wheel, keeping current rotation");
        }
        target
    }

    /// Back to Idle, keeping the rotation.
    pub fn close(&mut self) {
        self.cancel_timer();
        self.frame.send_modify(|f| {
            f.phase = SpinPhase::Idle;
            f.transition = Transition::None;
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::roster::tests::person;
    use tokio::time::sleep;

    fn spinner() -> Spinner {
        Spinner::new(&ClientConfig::default())
    }

    fn wedges() -> Vec<Person> {
        (1..=4).map(|id| person(id, "P", true)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinning_advances_each_tick() {
        let mut spinner = spinner();
        assert!(spinner.start());

        sleep(Duration::from_millis(95)).await;

        let frame = spinner.frame();
        assert_eq!(frame.rotation, 45.0);
        assert_eq!(frame.phase, SpinPhase::Spinning);
        assert_eq!(frame.transition, Transition::None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_rejected() {
        let mut spinner = spinner();
        assert!(spinner.start());
        assert!(!spinner.start());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_settles_on_winner() {
        let mut spinner = spinner();
        spinner.start();
        sleep(Duration::from_millis(65)).await;

        assert_eq!(spinner.stop(&wedges(), Some(3)), Some(3735.0));
        sleep(Duration::from_millis(300)).await;

        let frame = spinner.frame();
        assert_eq!(frame.rotation, 3735.0);
        assert_eq!(frame.phase, SpinPhase::Settling);
        assert_eq!(
            frame.transition.to_css(),
            "transform 4.5s cubic-bezier(0.17, 0.67, 0.12, 0.99)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_without_winner_keeps_rotation() {
        let mut spinner = spinner();
        spinner.start();
        sleep(Duration::from_millis(65)).await;

        assert_eq!(spinner.stop(&wedges(), None), None);
        assert_eq!(spinner.stop(&wedges(), Some(99)), None);
        sleep(Duration::from_millis(300)).await;

        let frame = spinner.frame();
        assert_eq!(frame.rotation, 30.0);
        assert_eq!(frame.phase, SpinPhase::Settling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_returns_to_idle() {
        let mut spinner = spinner();
        spinner.start();
        spinner.stop(&wedges(), Some(1));
        spinner.close();

        let frame = spinner.frame();
        assert_eq!(frame.phase, SpinPhase::Idle);
        assert_eq!(frame.transition, Transition::None);
        assert_eq!(frame.rotation, 3915.0);
        assert!(spinner.start());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let mut spinner = spinner();
        let view = spinner.subscribe();
        spinner.start();
        sleep(Duration::from_millis(35)).await;
        drop(spinner);

        sleep(Duration::from_millis(200)).await;

        assert_eq!(view.borrow().rotation, 15.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_tick_is_clamped() {
        let config = ClientConfig {
            spin_tick_ms: 0,
            ..ClientConfig::default()
        };
        let mut spinner = Spinner::new(&config);
        assert!(spinner.start());

        sleep(Duration::from_millis(5)).await;

        assert!(spinner.frame().rotation > 0.0);
    }
}
