//! Scripted input for headless runs.
//!
//! A script is a comma-separated list of `actions:ticks` segments, where
//! `actions` joins action names with `+`, for example
//! `right:30,down+attack:10,idle:5,escape:1`. Once the script is exhausted the
//! player stands still.

use anyhow::{bail, Context, Result};
use dungeon_crawler_core::{Action, FrameInput};
use dungeon_crawler_simulation::InputProvider;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    input: FrameInput,
    ticks: u32,
}

/// Input provider replaying a parsed script one tick at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ScriptedInput {
    segments: Vec<Segment>,
    segment: usize,
    used: u32,
    current: FrameInput,
}

impl ScriptedInput {
    /// Parses a script; an empty string yields an idle script.
    pub(crate) fn parse(script: &str) -> Result<Self> {
        let segments = script
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(parse_segment)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            segments,
            ..Self::default()
        })
    }
}

fn parse_segment(segment: &str) -> Result<Segment> {
    let (actions, ticks) = segment
        .split_once(':')
        .with_context(|| format!("segment `{segment}` is missing `:ticks`"))?;
    let ticks = ticks
        .trim()
        .parse()
        .with_context(|| format!("segment `{segment}` has an invalid tick count"))?;

    let mut input = FrameInput::default();
    for name in actions.split('+').map(str::trim) {
        let action = match name {
            "idle" => continue,
            "left" => Action::MoveLeft,
            "right" => Action::MoveRight,
            "up" => Action::MoveUp,
            "down" => Action::MoveDown,
            "attack" => Action::Attack,
            "escape" => Action::Escape,
            other => bail!("unknown action `{other}` in segment `{segment}`"),
        };
        input = input.with_action(action);
    }
    Ok(Segment { input, ticks })
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self) {
        while let Some(segment) = self.segments.get(self.segment) {
            if self.used < segment.ticks {
                self.used += 1;
                self.current = segment.input;
                return;
            }
            self.segment += 1;
            self.used = 0;
        }
        self.current = FrameInput::default();
    }

    fn is_active(&self, action: Action) -> bool {
        self.current.is_active(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_play_for_their_tick_count() {
        let mut input = ScriptedInput::parse("right:2, up+attack:1").expect("script parses");

        input.poll();
        assert!(input.is_active(Action::MoveRight));
        input.poll();
        assert!(input.is_active(Action::MoveRight));
        input.poll();
        assert!(!input.is_active(Action::MoveRight));
        assert!(input.is_active(Action::MoveUp) && input.is_active(Action::Attack));
        input.poll();
        assert_eq!(input.sample(), FrameInput::default());
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let mut input = ScriptedInput::parse("left:0,idle:1,escape:1").expect("script parses");

        input.poll();
        assert_eq!(input.sample(), FrameInput::default());
        input.poll();
        assert!(input.is_active(Action::Escape));
    }

    #[test]
    fn malformed_scripts_are_rejected() {
        assert!(ScriptedInput::parse("").expect("empty script").segments.is_empty());
        assert!(ScriptedInput::parse("right").is_err());
        assert!(ScriptedInput::parse("right:x").is_err());
        assert!(ScriptedInput::parse("jump:3").is_err());
    }
}
