//! `unveil preview`
//!
//! Runs a reveal against the headless viewport and tween engine: the text
//! container starts below the fold, scrolls into view, and frames are ticked
//! at a fixed rate until the completion event fires.

use anyhow::{bail, Context, Result};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use unveil_animation::TweenEngine;
use unveil_core::{Rect, ViewportObserver};
use unveil_split::{Granularity, RevealPreset, SplitText, SplitTextConfig};

use super::init::CONFIG_FILE;
use crate::render;

const DEFAULT_TEXT: &str = "Unveil the text, one piece at a time";

/// Viewport size in terminal cells
const COLS: f32 = 80.0;
const ROWS: f32 = 24.0;

/// Scroll positions with the container out of and inside the view
const SCROLL_AWAY: f32 = 0.0;
const SCROLL_IN: f32 = ROWS * 1.5;

/// Interval between printed frames
const SAMPLE_SECS: f32 = 0.1;

pub struct PreviewArgs {
    pub config: Option<PathBuf>,
    pub text: Option<String>,
    pub mode: Option<Granularity>,
    pub preset: Option<RevealPreset>,
    pub fps: u32,
    pub once: bool,
    pub leave: bool,
}

pub fn run(args: PreviewArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let preview = Preview::new(config)?;

    let count = preview.split.fragments().len();
    if count == 0 {
        println!("nothing to reveal");
        return Ok(());
    }

    let config = preview.split.config();
    let expected = config.run_length_secs(count);
    println!(
        "{} {} fragment(s), stagger {}ms, duration {}s, ease {}",
        count, config.split, config.delay, config.duration, config.ease
    );

    let dt = 1.0 / args.fps.max(1) as f32;
    let mut print = |t: f32, progress: f32, body: String| print_frame(t, progress, &body);

    report(preview.enter(dt, &mut print), expected);

    if args.leave {
        println!("-- scrolled out");
        preview.leave(&mut print);
        println!("-- scrolled back in");
        if config.animate_only_once {
            preview.enter(dt, &mut print);
            println!("once-only: fragments stay revealed");
        } else {
            report(preview.enter(dt, &mut print), expected);
        }
    }

    info!(
        runs = preview.split.runs_started(),
        completed = preview.split.completed_runs(),
        "preview finished"
    );
    Ok(())
}

/// Config file (explicit, or ./unveil.toml when present), then preset, then
/// command-line overrides
fn resolve_config(args: &PreviewArgs) -> Result<SplitTextConfig> {
    let mut config = match &args.config {
        Some(path) => load(path)?,
        None if Path::new(CONFIG_FILE).exists() => load(Path::new(CONFIG_FILE))?,
        None => SplitTextConfig::default(),
    };

    if let Some(preset) = args.preset {
        config = preset.apply(config);
    }
    match &args.text {
        Some(text) => config.text = text.clone(),
        None if config.text.is_empty() => config.text = DEFAULT_TEXT.to_string(),
        None => {}
    }
    if let Some(mode) = args.mode {
        config.split = mode;
    }
    if args.once {
        config.animate_only_once = true;
    }
    Ok(config)
}

fn load(path: &Path) -> Result<SplitTextConfig> {
    SplitTextConfig::load_from_path(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn report(completed_after: Option<f32>, expected: f32) {
    match completed_after {
        Some(secs) => println!("complete after {:.2}s (expected {:.2}s)", secs, expected),
        None => warn!("reveal did not complete"),
    }
}

fn print_frame(t: f32, progress: f32, body: &str) {
    for (row, line) in body.split('\n').enumerate() {
        if row == 0 {
            println!("{:>6.2}s {:>4.0}%  |{}|", t, progress * 100.0, line);
        } else {
            println!("{:>14}|{}|", "", line);
        }
    }
}

/// A reveal wired to the headless viewport and engine
struct Preview {
    engine: Rc<TweenEngine>,
    viewport: Rc<ViewportObserver>,
    split: SplitText,
    completed_at: Rc<Cell<Option<f32>>>,
}

impl Preview {
    fn new(config: SplitTextConfig) -> Result<Self> {
        let engine = Rc::new(TweenEngine::new());
        let viewport = Rc::new(ViewportObserver::new(Rect::new(0.0, SCROLL_AWAY, COLS, ROWS)));
        let rows = match config.split {
            Granularity::Lines => config.text.lines().count().max(1),
            _ => 1,
        };
        let split = SplitText::new(config, engine.clone());

        let completed_at = Rc::new(Cell::new(None));
        let done = completed_at.clone();
        let clock = engine.clone();
        split.on_complete(move || done.set(Some(clock.clock())));

        // Just below the fold
        viewport.set_target_rect(
            split.root_target(),
            Rect::new(0.0, ROWS * 2.0, COLS, rows as f32),
        );
        if !split.attach(viewport.clone()) {
            bail!("viewport observer refused the text container");
        }
        viewport.update();

        Ok(Self {
            engine,
            viewport,
            split,
            completed_at,
        })
    }

    fn draw(&self, sink: &mut dyn FnMut(f32, f32, String), t: f32) {
        let states: Vec<_> = self
            .split
            .rendered()
            .into_iter()
            .map(|(target, fragment)| (fragment, self.engine.value(target)))
            .collect();
        let mode = self.split.config().split;
        sink(t, render::mean_opacity(&states), render::frame(&states, mode));
    }

    /// Scroll the container into view and tick until the run completes.
    /// Returns the time from entry to completion, or `None` when no run
    /// started or it did not finish in time.
    fn enter(&self, dt: f32, sink: &mut dyn FnMut(f32, f32, String)) -> Option<f32> {
        let runs_before = self.split.runs_started();
        let started = self.engine.clock();

        self.viewport.scroll_to(SCROLL_IN);
        self.viewport.update();
        if self.split.runs_started() == runs_before {
            self.draw(sink, 0.0);
            return None;
        }

        let count = self.split.fragments().len();
        let timeout = self.split.config().run_length_secs(count) + 1.0;
        let mut next_sample = 0.0;

        loop {
            self.engine.tick(dt);
            let t = self.engine.clock() - started;
            let done = self.completed_at.take();

            if t >= next_sample || done.is_some() {
                self.draw(sink, t);
                next_sample += SAMPLE_SECS;
            }
            if let Some(at) = done {
                return Some(at - started);
            }
            if t > timeout {
                return None;
            }
        }
    }

    /// Scroll the container out of view
    fn leave(&self, sink: &mut dyn FnMut(f32, f32, String)) {
        self.viewport.scroll_to(SCROLL_AWAY);
        self.viewport.update();
        self.draw(sink, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PreviewArgs {
        PreviewArgs {
            config: None,
            text: Some("abc".to_string()),
            mode: None,
            preset: None,
            fps: 60,
            once: false,
            leave: false,
        }
    }

    fn quiet() -> impl FnMut(f32, f32, String) {
        |_, _, _| {}
    }

    #[test]
    fn test_overrides_apply_after_preset() {
        let config = resolve_config(&PreviewArgs {
            mode: Some(Granularity::Words),
            preset: Some(RevealPreset::FadeIn),
            once: true,
            ..args()
        })
        .unwrap();

        assert_eq!(config.text, "abc");
        assert_eq!(config.split, Granularity::Words);
        assert_eq!(config.ease, "power2.out");
        assert!(config.animate_only_once);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = resolve_config(&PreviewArgs {
            config: Some(PathBuf::from("/nonexistent/unveil.toml")),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_enter_completes_after_run_length() {
        let preview = Preview::new(SplitTextConfig::new("abc")).unwrap();
        let mut frames = 0;
        let mut sink = |_: f32, _: f32, _: String| frames += 1;

        let secs = preview.enter(1.0 / 60.0, &mut sink).unwrap();
        assert!(secs >= 2.1 - 1e-3 && secs < 2.15, "{secs}");
        assert!(frames > 20);
    }

    #[test]
    fn test_leave_and_reenter_repeats() {
        let preview = Preview::new(SplitTextConfig::new("ab")).unwrap();
        let mut sink = quiet();

        assert!(preview.enter(0.05, &mut sink).is_some());
        preview.leave(&mut sink);
        assert!(!preview.split.is_visible());
        assert!(preview.enter(0.05, &mut sink).is_some());
        assert_eq!(preview.split.completed_runs(), 2);
    }

    #[test]
    fn test_once_only_does_not_reenter() {
        let preview =
            Preview::new(SplitTextConfig::new("ab").animate_only_once(true)).unwrap();
        let mut sink = quiet();

        assert!(preview.enter(0.05, &mut sink).is_some());
        preview.leave(&mut sink);
        assert_eq!(preview.enter(0.05, &mut sink), None);
        assert_eq!(preview.split.runs_started(), 1);
    }
}
