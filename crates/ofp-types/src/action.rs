//! Flow actions and the instructions that carry them.

use crate::group::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Reserved port: send to controller.
pub const OFPP_CONTROLLER: u32 = 0xffff_fffd;
/// Max bytes sent to the controller when no buffering is requested.
pub const OFPCML_NO_BUFFER: u16 = 0xffff;

/// OXM field rewritten by a set-field action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    EthSrc([u8; 6]),
    EthDst([u8; 6]),
    VlanVid(u16),
    Ipv4Src(Ipv4Addr),
    Ipv4Dst(Ipv4Addr),
    TunnelId(u64),
}

/// Forwarding action (`ofp_action_*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Output { port: u32, max_len: u16 },
    Group { group_id: GroupId },
    PushVlan { ethertype: u16 },
    PopVlan,
    SetField { field: SetField },
}

impl Action {
    /// Output to `port`; the max length only matters for the controller port.
    pub fn output(port: u32) -> Self {
        let max_len = if port == OFPP_CONTROLLER {
            OFPCML_NO_BUFFER
        } else {
            0
        };
        Action::Output { port, max_len }
    }

    pub fn group(group_id: GroupId) -> Self {
        Action::Group { group_id }
    }

    pub fn set_field(field: SetField) -> Self {
        Action::SetField { field }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Output { .. } => ActionType::Output,
            Action::Group { .. } => ActionType::Group,
            Action::PushVlan { .. } => ActionType::PushVlan,
            Action::PopVlan => ActionType::PopVlan,
            Action::SetField { .. } => ActionType::SetField,
        }
    }
}

/// Action kind tag as used by the flow layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Output,
    Group,
    PushVlan,
    PopVlan,
    SetField,
}

impl ActionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionType::Output => "output",
            ActionType::Group => "group",
            ActionType::PushVlan => "pushVlan",
            ActionType::PopVlan => "popVlan",
            ActionType::SetField => "setField",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flow instruction (`ofp_instruction_*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    ApplyActions { actions: Vec<Action> },
    WriteActions { actions: Vec<Action> },
    ClearActions,
    GotoTable { table_id: u8 },
}

impl Instruction {
    /// Creates an empty apply-actions instruction.
    pub fn apply_actions() -> Self {
        Instruction::ApplyActions {
            actions: Vec::new(),
        }
    }

    /// Returns the action list for instructions that carry one.
    pub fn actions(&self) -> Option<&[Action]> {
        match self {
            Instruction::ApplyActions { actions } | Instruction::WriteActions { actions } => {
                Some(actions)
            }
            Instruction::ClearActions | Instruction::GotoTable { .. } => None,
        }
    }

    /// Appends (or prepends) an action.
    ///
    /// Returns `false` when the instruction carries no action list.
    pub fn add_action(&mut self, action: Action, prepend: bool) -> bool {
        match self {
            Instruction::ApplyActions { actions } | Instruction::WriteActions { actions } => {
                if prepend {
                    actions.insert(0, action);
                } else {
                    actions.push(action);
                }
                true
            }
            Instruction::ClearActions | Instruction::GotoTable { .. } => false,
        }
    }
}
