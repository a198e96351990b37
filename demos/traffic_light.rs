//! Minimal machine demo: a traffic light cycling through its phases.
//!
//! Run with: cargo run --example traffic_light

use gearshift::core::TableBuilder;
use gearshift::machine::Machine;
use gearshift::tags_for;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum LightState {
    Red,
    Green,
    Yellow,
}

tags_for! {
    State for LightState {
        Red => "RED",
        Green => "GREEN",
        Yellow => "YELLOW",
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum LightAction {
    Advance,
}

tags_for! {
    Action for LightAction {
        Advance => "ADVANCE",
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum LightCommand {
    Announce { phase: String },
}

tags_for! {
    Command for LightCommand {
        Announce => "ANNOUNCE",
    }
}

fn main() {
    let table = Arc::new(
        TableBuilder::new()
            .on("RED", "ADVANCE", |_s, _a| {
                gearshift::Outcome::NextWith(
                    LightState::Green,
                    LightCommand::Announce {
                        phase: "green".into(),
                    },
                )
            })
            .on("GREEN", "ADVANCE", |_s, _a| {
                gearshift::Outcome::NextWith(
                    LightState::Yellow,
                    LightCommand::Announce {
                        phase: "yellow".into(),
                    },
                )
            })
            .on("YELLOW", "ADVANCE", |_s, _a| {
                gearshift::Outcome::NextWith(
                    LightState::Red,
                    LightCommand::Announce {
                        phase: "red".into(),
                    },
                )
            })
            .build()
            .expect("table is well-formed"),
    );

    let mut machine = Machine::new("light", LightState::Red, table);

    for _ in 0..6 {
        if let Some(LightCommand::Announce { phase }) = machine.dispatch(LightAction::Advance) {
            println!("light is now {phase} ({:?})", machine.state());
        }
    }
}
