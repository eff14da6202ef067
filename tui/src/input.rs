//! Input handling for the Rankwise TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::{self, JoinHandle},
    time,
};
use tracing::debug;

use rankwise_engine::App;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a send blocked on capacity returns.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued terminal events into `app`. Returns `true` once the app
/// should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, &ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

pub(crate) fn apply_event(app: &mut App, event: &Event) -> bool {
    let Event::Key(key) = event else {
        return app.should_quit();
    };

    // Handle press + repeat events (ignore releases)
    if matches!(key.kind, KeyEventKind::Release) {
        return app.should_quit();
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        debug!("Ctrl+C: quitting");
        app.request_quit();
        return true;
    }

    if app.view().show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter) {
            app.toggle_help();
        }
        return app.should_quit();
    }

    if key.code == KeyCode::Char('?') {
        app.toggle_help();
    } else if app.is_done() {
        handle_results_key(app, *key);
    } else {
        handle_question_key(app, *key);
    }
    app.should_quit()
}

fn handle_question_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('1' | 'h') | KeyCode::Left => app.answer_first(),
        KeyCode::Char('2' | 'l') | KeyCode::Right => app.answer_second(),
        KeyCode::Char('=' | 'e') | KeyCode::Down => app.answer_equal(),
        KeyCode::Char('u') | KeyCode::Backspace => app.undo(),
        KeyCode::Char('s') | KeyCode::Esc => app.stop(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.request_quit(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_results_up(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_results_down(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use rankwise_engine::{App, ItemList, RankwiseConfig};
    use tokio::task;

    use super::apply_event;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..200 {
            app.tick();
            if done(app) {
                return;
            }
            task::yield_now().await;
        }
        panic!("app did not settle");
    }

    fn start(raw: &str) -> App {
        App::start(ItemList::parse(raw).unwrap(), &RankwiseConfig::default())
    }

    #[tokio::test]
    async fn number_keys_answer_and_finish() {
        let mut app = start("b\na");
        settle(&mut app, App::is_asking).await;

        assert!(!apply_event(&mut app, &press(KeyCode::Char('2'))));
        settle(&mut app, App::is_done).await;

        let ranked: Vec<&str> = app
            .result()
            .unwrap()
            .items()
            .iter()
            .map(|item| item.as_str())
            .collect();
        assert_eq!(ranked, ["b", "a"]);

        assert!(apply_event(&mut app, &press(KeyCode::Char('q'))));
    }

    #[tokio::test]
    async fn arrow_keys_and_undo() {
        let mut app = start("c\nb\na");
        settle(&mut app, App::is_asking).await;

        apply_event(&mut app, &press(KeyCode::Left));
        assert_eq!(app.answered(), 1);
        settle(&mut app, App::is_asking).await;

        apply_event(&mut app, &press(KeyCode::Backspace));
        assert_eq!(app.answered(), 0);
        settle(&mut app, App::is_asking).await;

        apply_event(&mut app, &press(KeyCode::Down));
        assert_eq!(app.answered(), 1);
    }

    #[tokio::test]
    async fn escape_stops_the_sort() {
        let mut app = start("x\ny\nz");
        settle(&mut app, App::is_asking).await;

        assert!(!apply_event(&mut app, &press(KeyCode::Esc)));
        settle(&mut app, App::is_done).await;
        assert!(!app.result().unwrap().is_sorted());
    }

    #[tokio::test]
    async fn q_does_not_quit_mid_question() {
        let mut app = start("x\ny");
        settle(&mut app, App::is_asking).await;

        assert!(!apply_event(&mut app, &press(KeyCode::Char('q'))));
        assert!(app.is_asking());
    }

    #[tokio::test]
    async fn ctrl_c_quits_immediately() {
        let mut app = start("x\ny");
        settle(&mut app, App::is_asking).await;

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(apply_event(&mut app, &ctrl_c));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn help_overlay_swallows_answer_keys() {
        let mut app = start("x\ny");
        settle(&mut app, App::is_asking).await;

        apply_event(&mut app, &press(KeyCode::Char('?')));
        assert!(app.view().show_help);
        apply_event(&mut app, &press(KeyCode::Char('1')));
        assert_eq!(app.answered(), 0);
        assert!(app.is_asking());

        apply_event(&mut app, &press(KeyCode::Esc));
        assert!(!app.view().show_help);
        assert!(app.is_asking());
    }

    #[tokio::test]
    async fn key_release_is_ignored() {
        let mut app = start("x\ny");
        settle(&mut app, App::is_asking).await;

        let mut release = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        apply_event(&mut app, &Event::Key(release));
        assert!(app.is_asking());
    }
}
