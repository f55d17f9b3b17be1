// src/update.rs
//
// The animator proper: a pure reducer from `Message` to state changes plus
// the `Command`s the caller must execute, in order.
//
use crate::debug_log;
use crate::events::ProgressEvent;
use crate::messages::{Command, Message};
use crate::models::{Goal, RunId};
use crate::state::{Phase, ProgressState};

pub fn update(state: &mut ProgressState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new();

    if state.destroyed {
        debug_log!("ignoring {:?} on a destroyed progress bar", msg);
        return commands;
    }

    match msg {
        Message::Go { goal, now } => go(state, &mut commands, goal, now),

        Message::Start { now } => {
            commands.push(Command::CancelFrame);
            commands.push(Command::Notify(ProgressEvent::Start));
            go(state, &mut commands, Goal::Default, now);
        }

        Message::Tick { run, time } => tick(state, &mut commands, run, time),

        Message::Reset => {
            commands.push(Command::CancelFrame);
            state.phase = Phase::Idle;
            let first = state.first;
            apply(state, &mut commands, first);
            commands.push(Command::Notify(ProgressEvent::Reset));
        }

        Message::Stop => {
            commands.push(Command::CancelFrame);
            state.phase = Phase::Idle;
            commands.push(Command::Notify(ProgressEvent::Stop));
        }

        Message::Finish => {
            commands.push(Command::CancelFrame);
            let target = state.range.clamp(state.goal);
            apply(state, &mut commands, target);
            state.phase = Phase::Finished;
            commands.push(Command::Notify(ProgressEvent::Finish));
        }

        Message::Destroy => {
            commands.push(Command::CancelFrame);
            state.phase = Phase::Idle;
            state.destroyed = true;
            commands.push(Command::Notify(ProgressEvent::Destroy));
        }
    }

    commands
}

fn go(state: &mut ProgressState, commands: &mut Vec<Command>, goal: Goal, now: f64) {
    commands.push(Command::CancelFrame);

    let target = goal.resolve(&state.range, state.goal);
    let run = state.begin_run(target, now);
    debug_log!("{} from {} toward {} at t={}", run.id, run.start_value, run.goal, now);

    commands.push(Command::RequestFrame(run.id));
}

fn tick(state: &mut ProgressState, commands: &mut Vec<Command>, run: RunId, time: f64) {
    let active = match state.active_run() {
        Some(active) if active.id == run => *active,
        _ => {
            debug_log!("dropping stale frame for {}", run);
            return;
        }
    };

    let next = active.value_at(time, &state.range, state.speed);
    apply(state, commands, next);

    if next == active.goal {
        // The frame that got us here has already fired; nothing to cancel.
        state.phase = Phase::Finished;
        debug_log!("{} reached {}", run, next);

        // Only the configured goal counts as finished.
        if state.current == state.goal {
            commands.push(Command::Notify(ProgressEvent::Finish));
        }
    } else {
        commands.push(Command::RequestFrame(run));
    }
}

/// Set the current value and ask for it to be rendered and announced.
fn apply(state: &mut ProgressState, commands: &mut Vec<Command>, value: f64) {
    state.current = value;
    commands.push(Command::Render { value, percentage: state.percentage(value) });
    commands.push(Command::Notify(ProgressEvent::Update(value)));
}
