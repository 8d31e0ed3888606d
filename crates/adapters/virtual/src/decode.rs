//! Raise a flat [`Submission`] back into a [`GameCommand`].

use serde::Deserialize;

use marshal_domain::command::{ActionCode, GameCommand, Submission};
use marshal_domain::id::{BuildingId, ParticipantId};
use marshal_domain::roster::{Roster, UnitType};
use marshal_domain::zone::{Grid, Zone};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payload {
    zone: Option<Zone>,
    participant: Option<ParticipantId>,
    participants: Vec<ParticipantId>,
    from: Option<Grid>,
    roster: Roster,
    target: Option<BuildingId>,
    item: Option<String>,
    unit: Option<UnitType>,
}

pub(crate) fn decode(submission: &Submission) -> Result<GameCommand, String> {
    let payload: Payload = if submission.payload.is_null() {
        Payload::default()
    } else {
        serde_json::from_value(submission.payload.clone())
            .map_err(|err| format!("malformed payload: {err}"))?
    };
    let grid = || submission.target_grid.ok_or("missing target grid");

    let command = match submission.action_code {
        ActionCode::Travel => GameCommand::Travel {
            zone: payload.zone.ok_or("missing zone")?,
        },
        ActionCode::Move => GameCommand::Move {
            participant: payload.participant.ok_or("missing participant")?,
            from: payload.from,
            to: grid()?,
        },
        ActionCode::Load => GameCommand::Load {
            participant: payload.participant.ok_or("missing participant")?,
            roster: payload.roster,
        },
        ActionCode::UnassignAll => GameCommand::UnassignAll {
            participants: payload.participants,
        },
        ActionCode::Attack => GameCommand::Attack {
            participant: payload.participant.ok_or("missing participant")?,
            target: payload.target.ok_or("missing target")?,
            grid: grid()?,
        },
        ActionCode::ApplyBoost => GameCommand::ApplyBoost {
            participant: payload.participant,
            item: payload.item.ok_or("missing item")?,
            target: payload.target,
            grid: submission.target_grid,
        },
        ActionCode::Produce => GameCommand::Produce {
            item: payload.item.ok_or("missing item")?,
            amount: submission.amount,
        },
        ActionCode::Recruit => GameCommand::Recruit {
            unit: payload.unit.ok_or("missing unit")?,
            amount: submission.amount,
        },
        ActionCode::CollectAll => GameCommand::CollectAll,
        ActionCode::ReturnHome => GameCommand::ReturnHome,
    };
    Ok(command)
}
