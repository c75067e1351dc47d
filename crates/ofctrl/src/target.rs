//! Forwarding targets usable in a flow entry's instruction set.

use ofp_types::{Action, ActionType, Instruction};

/// Something a flow can forward to.
///
/// Implementors render themselves as a single action and as an
/// apply-actions instruction holding that action.
pub trait FlowTarget {
    /// Short kind name, e.g. "group" or "output".
    fn type_name(&self) -> &'static str;

    fn action_type(&self) -> ActionType;

    fn action_message(&self) -> Action;

    fn flow_instr(&self) -> Instruction {
        let mut instr = Instruction::apply_actions();
        instr.add_action(self.action_message(), false);
        instr
    }
}

/// Output to a switch port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputPort {
    pub port_no: u32,
}

impl OutputPort {
    pub fn new(port_no: u32) -> Self {
        Self { port_no }
    }
}

impl FlowTarget for OutputPort {
    fn type_name(&self) -> &'static str {
        "output"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Output
    }

    fn action_message(&self) -> Action {
        Action::output(self.port_no)
    }
}
