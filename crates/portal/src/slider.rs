//! Rotating hero slideshow.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::presenter::Presenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Goto(usize),
}

/// Starts slideshows.
#[derive(Debug, Clone, Copy)]
pub struct HeroSlider {
    interval: Duration,
}

impl HeroSlider {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Show slide 0 and rotate every interval.
    ///
    /// Returns `None` when there are no slides. Must be called from within a
    /// tokio runtime. Dropping the handle leaves the slideshow running
    /// without control; use [`SliderHandle::stop`] to end it.
    pub fn start<P: Presenter + 'static>(
        &self,
        presenter: Arc<P>,
        slide_count: usize,
    ) -> Option<SliderHandle> {
        if slide_count == 0 {
            info!("No hero slides found");
            return None;
        }

        let (commands, receiver) = mpsc::unbounded_channel();
        let current = Arc::new(AtomicUsize::new(0));
        let task = tokio::spawn(run(
            presenter,
            slide_count,
            self.interval,
            receiver,
            Arc::clone(&current),
        ));

        Some(SliderHandle {
            commands,
            current,
            slide_count,
            task,
        })
    }
}

/// Control for a running slideshow.
#[derive(Debug)]
pub struct SliderHandle {
    commands: mpsc::UnboundedSender<Command>,
    current: Arc<AtomicUsize>,
    slide_count: usize,
    task: JoinHandle<()>,
}

impl SliderHandle {
    /// Stop advancing. The current slide stays up.
    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    /// Advance again, one full interval from now. No-op unless paused.
    pub fn resume(&self) {
        self.send(Command::Resume);
    }

    /// Jump to slide `index`, wrapped to the slide count.
    pub fn goto(&self, index: usize) {
        self.send(Command::Goto(index));
    }

    /// Slide currently shown.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// End the slideshow.
    pub fn stop(self) {
        self.task.abort();
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!(?command, "Slider task has ended");
        }
    }
}

async fn run<P: Presenter>(
    presenter: Arc<P>,
    total: usize,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    current: Arc<AtomicUsize>,
) {
    let show = |index: usize| {
        current.store(index, Ordering::Release);
        presenter.show_slide(index, total);
        debug!("Showing slide {} of {total}", index + 1);
    };

    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut index = 0;
    let mut paused = false;
    let mut detached = false;
    show(index);

    loop {
        tokio::select! {
            _ = ticker.tick(), if !paused => {
                index = (index + 1) % total;
                show(index);
            }
            command = commands.recv(), if !detached => match command {
                Some(Command::Pause) => paused = true,
                Some(Command::Resume) => {
                    if paused {
                        paused = false;
                        ticker.reset();
                    }
                }
                Some(Command::Goto(target)) => {
                    index = target % total;
                    show(index);
                }
                None => detached = true,
            },
            else => break,
        }
    }
}
